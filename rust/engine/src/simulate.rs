//! Monte Carlo estimation of starting-hand win rates.
//!
//! Each trial deals every player two cards and a full board from a fresh
//! shuffle, scores the seven-card hands, and credits the first player's hand
//! class with its share of the pot: a whole win, or `1/k` on a `k`-way tie.
//! Trials are split into shards that run on the rayon pool, each with its own
//! deck and tally, and the tallies are summed at the end.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::cards::Card;
use crate::config::{validate_players, SimulationConfig};
use crate::deck::Deck;
use crate::errors::GameError;
use crate::game::ShowdownHand;
use crate::hand::{evaluate, score_seven, winning_indices, Score};
use crate::odds::{HandClass, OddsRow, OddsTable, CLASS_COUNT};
use crate::player::PocketCards;

/// Win credit for one whole pot. Divisible by every tie size from 1 to 10,
/// so split credit stays exact.
pub const CREDIT_UNIT: u64 = 2520;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassStats {
    pub trials: u64,
    /// In units of [`CREDIT_UNIT`]
    pub credit: u64,
}

impl ClassStats {
    pub fn wins(&self) -> f64 {
        self.credit as f64 / CREDIT_UNIT as f64
    }

    pub fn win_rate(&self) -> Option<f64> {
        (self.trials > 0).then(|| self.wins() / self.trials as f64)
    }
}

/// Per-class trial counts and win credit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTally {
    stats: Vec<ClassStats>,
}

impl Default for ClassTally {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassTally {
    pub fn new() -> Self {
        Self {
            stats: vec![ClassStats::default(); CLASS_COUNT],
        }
    }

    pub fn record(&mut self, class: HandClass, credit: u64) {
        let s = &mut self.stats[class.index()];
        s.trials += 1;
        s.credit += credit;
    }

    pub fn merge(mut self, other: ClassTally) -> ClassTally {
        for (mine, theirs) in self.stats.iter_mut().zip(other.stats) {
            mine.trials += theirs.trials;
            mine.credit += theirs.credit;
        }
        self
    }

    pub fn get(&self, class: HandClass) -> ClassStats {
        self.stats[class.index()]
    }

    pub fn trials(&self) -> u64 {
        self.stats.iter().map(|s| s.trials).sum()
    }

    /// Observed classes as an odds table for `players`.
    pub fn into_table(self, players: usize) -> Result<OddsTable, GameError> {
        let rows = self
            .stats
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                let class = HandClass::from_index(i)?;
                Some(OddsRow {
                    class,
                    win_rate: s.win_rate()?,
                    trials: s.trials,
                })
            })
            .collect();
        OddsTable::new(players, rows)
    }
}

pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn run(&self) -> Result<OddsTable, GameError> {
        self.run_until(&AtomicBool::new(false))
    }

    /// Like [`Simulator::run`], but shards stop as soon as `stop` is set and
    /// report what they finished.
    pub fn run_until(&self, stop: &AtomicBool) -> Result<OddsTable, GameError> {
        self.tally_until(stop)?.into_table(self.config.players)
    }

    pub fn tally_until(&self, stop: &AtomicBool) -> Result<ClassTally, GameError> {
        let SimulationConfig {
            trials,
            players,
            seed,
            shards,
        } = self.config;
        let shards = match shards {
            0 => rayon::current_num_threads(),
            n => n,
        } as u64;
        let shards = shards.clamp(1, trials.max(1));
        let seed = seed.unwrap_or_else(rand::random);
        info!(trials, players, shards, seed, "simulation started");

        let partials: Vec<ClassTally> = (0..shards)
            .into_par_iter()
            .map(|shard| {
                let count = trials / shards + u64::from(shard < trials % shards);
                let mut rng = ChaCha20Rng::seed_from_u64(seed);
                rng.set_stream(shard);
                run_shard(Deck::from_rng(rng), players, count, stop)
            })
            .collect::<Result<_, _>>()?;
        let tally = partials
            .into_iter()
            .fold(ClassTally::new(), ClassTally::merge);

        let done = tally.trials();
        if done < trials {
            warn!(done, requested = trials, "simulation stopped early");
        }
        info!(trials = done, "simulation finished");
        Ok(tally)
    }
}

fn run_shard(
    mut deck: Deck,
    players: usize,
    count: u64,
    stop: &AtomicBool,
) -> Result<ClassTally, GameError> {
    let mut tally = ClassTally::new();
    let mut pockets: Vec<[Card; 2]> = Vec::with_capacity(players);
    let mut scores: Vec<Score> = Vec::with_capacity(players);
    for _ in 0..count {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        deck.shuffle();
        pockets.clear();
        for _ in 0..players {
            pockets.push(deck.draw_array::<2>()?);
        }
        let [b0, b1, b2, b3, b4] = deck.draw_array::<5>()?;

        scores.clear();
        scores.extend(
            pockets
                .iter()
                .map(|&[a, b]| score_seven(&[a, b, b0, b1, b2, b3, b4])),
        );
        let best = scores.iter().max().copied();
        let credit = match best {
            Some(best) if scores[0] == best => {
                let k = scores.iter().filter(|&&s| s == best).count() as u64;
                CREDIT_UNIT / k
            }
            _ => 0,
        };
        let [a, b] = pockets[0];
        tally.record(HandClass::from_pocket(a, b), credit);
    }
    debug!(trials = tally.trials(), "shard finished");
    Ok(tally)
}

/// Odds table from `trials` random `players`-handed deals.
pub fn run(trials: u64, players: usize) -> Result<OddsTable, GameError> {
    Simulator::new(SimulationConfig {
        trials,
        players,
        ..SimulationConfig::default()
    })?
    .run()
}

/// One dealt-out game, split into the hands that won and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub winners: Vec<ShowdownHand>,
    pub losers: Vec<ShowdownHand>,
    pub board: [Card; 5],
}

/// Deals a single `players`-handed game straight to showdown.
pub fn play_game(players: usize, seed: Option<u64>) -> Result<GameSummary, GameError> {
    validate_players(players)?;
    let mut deck = Deck::new(seed);
    let mut pockets = Vec::with_capacity(players);
    for _ in 0..players {
        pockets.push(PocketCards(deck.draw_array::<2>()?));
    }
    let board = deck.draw_array::<5>()?;
    let [b0, b1, b2, b3, b4] = board;

    let hands: Vec<ShowdownHand> = pockets
        .into_iter()
        .enumerate()
        .map(|(seat, pocket)| {
            let [a, b] = pocket.cards();
            let (hand, score) = evaluate(&[a, b, b0, b1, b2, b3, b4]);
            ShowdownHand {
                seat,
                pocket,
                hand,
                score,
            }
        })
        .collect();
    let scores: Vec<Score> = hands.iter().map(|h| h.score).collect();
    let winning = winning_indices(&scores);
    let (winners, losers): (Vec<_>, Vec<_>) = hands
        .into_iter()
        .partition(|h| winning.contains(&h.seat));
    Ok(GameSummary {
        winners,
        losers,
        board,
    })
}

fn write_hand(f: &mut fmt::Formatter<'_>, h: &ShowdownHand) -> fmt::Result {
    let cards: Vec<String> = h.hand.cards().iter().map(Card::to_string).collect();
    writeln!(
        f,
        "Player {} {} {} [{}]",
        h.seat + 1,
        h.pocket,
        h.score,
        cards.join(" ")
    )
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board: Vec<String> = self.board.iter().map(Card::to_string).collect();
        writeln!(f, "Board {}", board.join(" "))?;
        writeln!(f, "{}", if self.winners.len() == 1 { "Winner" } else { "Winners" })?;
        for h in &self.winners {
            write_hand(f, h)?;
        }
        writeln!(f, "Losers")?;
        for h in &self.losers {
            write_hand(f, h)?;
        }
        Ok(())
    }
}
