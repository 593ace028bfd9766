use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cards::{full_deck, Card};
use crate::config::{validate_chip_total, validate_players, TableConfig, MIN_PLAYERS};
use crate::deck::Deck;
use crate::errors::{GameError, IllegalAction};
use crate::hand::{evaluate, winning_indices, Hand, Score};
use crate::logger::{ActionRecord, HandRecord, ShowdownInfo};
use crate::player::{Player, PlayerAction, PocketCards, Position};
use crate::pot::PotManager;
use crate::rules::{self, ActionKind, ValidatedAction};

/// A betting street in Texas Hold'em.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Street {
    /// Pocket cards dealt, no board
    Preflop,
    /// Three community cards
    Flop,
    /// Fourth community card
    Turn,
    /// Fifth community card
    River,
}

impl Street {
    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    /// Community cards showing on this street.
    pub fn board_len(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Street::Preflop => "Preflop",
            Street::Flop => "Flop",
            Street::Turn => "Turn",
            Street::River => "River",
        };
        f.write_str(s)
    }
}

/// Community cards. A turn without a flop cannot be represented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    flop: Option<[Card; 3]>,
    turn: Option<Card>,
    river: Option<Card>,
}

impl Board {
    /// Board from 0, 3, 4 or 5 cards in deal order.
    pub fn from_cards(cards: &[Card]) -> Result<Board, GameError> {
        match *cards {
            [] => Ok(Board::default()),
            [a, b, c] => Ok(Board {
                flop: Some([a, b, c]),
                ..Board::default()
            }),
            [a, b, c, t] => Ok(Board {
                flop: Some([a, b, c]),
                turn: Some(t),
                river: None,
            }),
            [a, b, c, t, r] => Ok(Board {
                flop: Some([a, b, c]),
                turn: Some(t),
                river: Some(r),
            }),
            _ => Err(GameError::InvalidState(format!(
                "board of {} cards",
                cards.len()
            ))),
        }
    }

    pub fn flop(&self) -> Option<[Card; 3]> {
        self.flop
    }
    pub fn turn(&self) -> Option<Card> {
        self.turn
    }
    pub fn river(&self) -> Option<Card> {
        self.river
    }

    pub fn cards(&self) -> Vec<Card> {
        let mut cards = Vec::with_capacity(5);
        if let Some(flop) = self.flop {
            cards.extend(flop);
        }
        cards.extend(self.turn);
        cards.extend(self.river);
        cards
    }

    pub fn len(&self) -> usize {
        self.flop.map_or(0, |_| 3) + self.turn.map_or(0, |_| 1) + self.river.map_or(0, |_| 1)
    }

    pub fn is_empty(&self) -> bool {
        self.flop.is_none()
    }

    fn complete(&self) -> Option<[Card; 5]> {
        match (self.flop, self.turn, self.river) {
            (Some([a, b, c]), Some(t), Some(r)) => Some([a, b, c, t, r]),
            _ => None,
        }
    }

    fn matches(&self, street: Street) -> bool {
        let shape = (self.flop.is_some(), self.turn.is_some(), self.river.is_some());
        let expected = match street {
            Street::Preflop => (false, false, false),
            Street::Flop => (true, false, false),
            Street::Turn => (true, true, false),
            Street::River => (true, true, true),
        };
        shape == expected
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards().iter().map(Card::to_string).collect();
        f.write_str(&cards.join(" "))
    }
}

/// A hand revealed at showdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownHand {
    pub seat: usize,
    pub pocket: PocketCards,
    pub hand: Hand,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandOutcome {
    /// Seats holding the best hand, or the last player standing
    pub winners: Vec<usize>,
    /// Chips awarded per seat, side pots included
    pub payouts: Vec<u32>,
    /// Empty when everyone else folded
    pub showdown: Vec<ShowdownHand>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameMode {
    InProgress,
    Complete(HandOutcome),
}

/// Serializable image of a table, accepted back by [`GameState::start`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub players: Vec<Player>,
    pub button: usize,
    pub small_blind: u32,
    pub big_blind: u32,
    pub street: Street,
    pub board: Board,
    pub pot: u32,
    pub active_bet: u32,
    pub min_raise: u32,
    pub player_turn: usize,
    /// Undealt cards in deal order
    pub deck: Vec<Card>,
    #[serde(default)]
    pub history: Vec<ActionRecord>,
    pub hand_number: u64,
    pub seed: u64,
    #[serde(default)]
    pub outcome: Option<HandOutcome>,
}

/// One no-limit hold'em hand at a table of 2 to 10 seats.
///
/// Every transition returns a new state; a rejected action leaves the state
/// it was applied to exactly as it was.
///
/// # Examples
///
/// ```
/// use holdem_engine::game::{GameState, Street};
/// use holdem_engine::player::PlayerAction;
///
/// let state = GameState::make(3, 200, 1, 2).unwrap();
/// assert_eq!(state.pot(), 3);
/// assert_eq!(state.player_turn(), Some(0));
///
/// let state = state.apply_action(PlayerAction::Call).unwrap();
/// let state = state.apply_action(PlayerAction::Call).unwrap();
/// let state = state.apply_action(PlayerAction::Check).unwrap();
/// assert_eq!(state.street(), Street::Flop);
/// assert_eq!(state.board().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct GameState {
    players: Vec<Player>,
    pot: u32,
    active_bet: u32,
    street: Street,
    board: Board,
    player_turn: usize,
    button: usize,
    small_blind: u32,
    big_blind: u32,
    /// Smallest legal raise increment this round
    min_raise: u32,
    deck: Deck,
    history: Vec<ActionRecord>,
    hand_number: u64,
    seed: u64,
    mode: GameMode,
}

/// Deck for the `hand_number`-th hand of a table seeded with `seed`.
fn hand_deck(seed: u64, hand_number: u64) -> Deck {
    Deck::new(Some(seed.wrapping_add(hand_number)))
}

/// Seats clockwise starting at `start`.
fn clockwise(start: usize, seats: usize) -> impl Iterator<Item = usize> {
    (0..seats).map(move |i| (start + i) % seats)
}

impl GameState {
    /// New table with `players` equal stacks, button on seat 0, first hand dealt.
    pub fn make(
        players: usize,
        starting_stack: u32,
        small_blind: u32,
        big_blind: u32,
    ) -> Result<GameState, GameError> {
        Self::make_with_config(&TableConfig {
            players,
            starting_stack,
            small_blind,
            big_blind,
            seed: None,
        })
    }

    pub fn make_with_config(config: &TableConfig) -> Result<GameState, GameError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let config = TableConfig {
            seed: Some(seed),
            ..config.clone()
        };
        Self::make_with_deck(&config, hand_deck(seed, 0))
    }

    /// Like [`GameState::make_with_config`] but deals the first hand from
    /// `deck` as given. Later hands shuffle from the config seed.
    pub fn make_with_deck(config: &TableConfig, deck: Deck) -> Result<GameState, GameError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let players = (0..config.players)
            .map(|seat| Player::new(seat, format!("Player {}", seat + 1), config.starting_stack))
            .collect();
        Self::deal(
            players,
            0,
            config.small_blind,
            config.big_blind,
            deck,
            0,
            seed,
        )
    }

    /// Deals a hand to an existing seating, e.g. players with uneven stacks.
    /// Seats are renumbered in order; players without chips sit out.
    pub fn with_players(
        mut players: Vec<Player>,
        button: usize,
        small_blind: u32,
        big_blind: u32,
        deck: Deck,
        seed: u64,
    ) -> Result<GameState, GameError> {
        validate_players(players.len())?;
        validate_chip_total(players.iter().map(|p| u64::from(p.stack())))?;
        if small_blind == 0 || big_blind < small_blind {
            return Err(GameError::InvalidTable(format!(
                "blinds {}/{}",
                small_blind, big_blind
            )));
        }
        if button >= players.len() {
            return Err(GameError::InvalidTable(format!(
                "button {} outside {} seats",
                button,
                players.len()
            )));
        }
        for (seat, player) in players.iter_mut().enumerate() {
            player.set_seat(seat);
        }
        Self::deal(players, button, small_blind, big_blind, deck, 0, seed)
    }

    /// Rebuilds a state from a snapshot, recomputing everything derivable:
    /// pot, active bet, positions, and the seat to act. Applying it to its own
    /// snapshot changes nothing.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] when the snapshot cannot come from a legal
    /// hand: wrong seat count, cards that are not exactly one deck, a board that
    /// does not match the street, or nobody left in the hand.
    pub fn start(snapshot: TableSnapshot) -> Result<GameState, GameError> {
        let TableSnapshot {
            mut players,
            button,
            small_blind,
            big_blind,
            street,
            board,
            pot: _,
            active_bet: _,
            min_raise,
            player_turn,
            deck,
            history,
            hand_number,
            seed,
            outcome,
        } = snapshot;

        validate_players(players.len()).map_err(|e| GameError::InvalidState(e.to_string()))?;
        validate_chip_total(
            players
                .iter()
                .map(|p| u64::from(p.stack()) + u64::from(p.hand_contribution())),
        )
        .map_err(|e| GameError::InvalidState(e.to_string()))?;
        let n = players.len();
        if small_blind == 0 || big_blind < small_blind {
            return Err(GameError::InvalidState(format!(
                "blinds {}/{}",
                small_blind, big_blind
            )));
        }
        if button >= n || player_turn >= n {
            return Err(GameError::InvalidState(format!(
                "button {} / turn {} outside {} seats",
                button, player_turn, n
            )));
        }
        if players[button].pocket().is_none() {
            return Err(GameError::InvalidState("button seat holds no cards".into()));
        }
        if !board.matches(street) {
            return Err(GameError::InvalidState(format!(
                "{} board on the {}",
                board.len(),
                street
            )));
        }
        if let Some(p) = players
            .iter()
            .find(|p| p.round_contribution() > p.hand_contribution())
        {
            return Err(GameError::InvalidState(format!(
                "{} bet more this round than this hand",
                p.name()
            )));
        }

        let mut seen: Vec<Card> = players
            .iter()
            .filter_map(Player::pocket)
            .flat_map(|p| p.cards())
            .chain(board.cards())
            .chain(deck.iter().copied())
            .collect();
        seen.sort_unstable();
        let mut expected = full_deck();
        expected.sort_unstable();
        if seen != expected {
            return Err(GameError::InvalidState(
                "pockets, board and deck are not exactly one deck".into(),
            ));
        }

        for (seat, player) in players.iter_mut().enumerate() {
            player.set_seat(seat);
        }
        let mut state = GameState {
            players,
            pot: 0,
            active_bet: 0,
            street,
            board,
            player_turn,
            button,
            small_blind,
            big_blind,
            min_raise: min_raise.max(big_blind),
            deck: Deck::from_cards(deck),
            history,
            hand_number,
            seed,
            mode: GameMode::InProgress,
        };
        state.assign_positions();
        state.pot = state.total_contributions();
        let highest = state
            .players
            .iter()
            .filter(|p| p.is_live())
            .map(Player::round_contribution)
            .max()
            .unwrap_or(0);
        state.active_bet = match street {
            Street::Preflop => highest.max(big_blind),
            _ => highest,
        };

        match outcome {
            Some(outcome) => state.mode = GameMode::Complete(outcome),
            None => {
                if state.live_seats().is_empty() {
                    return Err(GameError::InvalidState("no live players".into()));
                }
                state.settle(player_turn)?;
            }
        }
        Ok(state)
    }

    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            players: self.players.clone(),
            button: self.button,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            street: self.street,
            board: self.board,
            pot: self.pot,
            active_bet: self.active_bet,
            min_raise: self.min_raise,
            player_turn: self.player_turn,
            deck: self.deck.remaining_cards().to_vec(),
            history: self.history.clone(),
            hand_number: self.hand_number,
            seed: self.seed,
            outcome: self.outcome().cloned(),
        }
    }

    /// Replays recorded actions on top of a snapshot.
    pub fn replay(snapshot: TableSnapshot, actions: &[ActionRecord]) -> Result<GameState, GameError> {
        actions
            .iter()
            .try_fold(Self::start(snapshot)?, |state, record| {
                state.apply_action_for(record.player_id, record.action)
            })
    }

    /// Applies `action` for the seat whose turn it is.
    pub fn apply_action(&self, action: PlayerAction) -> Result<GameState, GameError> {
        self.apply_action_for(self.player_turn, action)
    }

    /// Applies `action` on behalf of `seat`, rejecting it when it is not that
    /// seat's turn. On success the returned state has the turn advanced, and
    /// any street that closed dealt.
    pub fn apply_action_for(&self, seat: usize, action: PlayerAction) -> Result<GameState, GameError> {
        if self.is_complete() {
            return Err(IllegalAction::HandComplete.into());
        }
        if seat != self.player_turn {
            return Err(IllegalAction::NotPlayersTurn {
                expected: self.player_turn,
                actual: seat,
            }
            .into());
        }
        let player = &self.players[seat];
        let validated =
            rules::validate_action(player.stack(), self.to_call(seat), self.min_raise, action)?;

        let mut next = self.clone();
        next.history.push(ActionRecord {
            player_id: seat,
            street: self.street,
            action,
        });
        match validated {
            ValidatedAction::Fold => next.players[seat].fold(),
            ValidatedAction::Check => {}
            ValidatedAction::Call(chips) => {
                next.players[seat].commit(chips);
            }
            ValidatedAction::Raise(chips) => {
                next.players[seat].commit(chips);
                let bet = next.players[seat].round_contribution();
                let increment = bet.saturating_sub(self.active_bet);
                // a short all-in raise reopens action but keeps the old minimum
                if increment >= self.min_raise {
                    next.min_raise = increment;
                }
                next.active_bet = bet;
                for (other, p) in next.players.iter_mut().enumerate() {
                    if other != seat {
                        p.set_acted(false);
                    }
                }
            }
        }
        next.players[seat].set_acted(true);
        next.pot = next.total_contributions();
        debug!(hand = next.hand_number, seat, ?action, pot = next.pot, "action applied");

        next.settle((seat + 1) % next.players.len())?;
        Ok(next)
    }

    /// Deals the next hand: stacks carry over, the button moves to the next
    /// seat with chips, and busted seats sit out.
    ///
    /// # Errors
    ///
    /// [`GameError::InsufficientPlayers`] when fewer than two seats have chips,
    /// [`GameError::InvalidState`] while the current hand is still running.
    pub fn reset(&self) -> Result<GameState, GameError> {
        if !self.is_complete() {
            return Err(GameError::InvalidState("hand still in progress".into()));
        }
        let n = self.players.len();
        let available = self.players.iter().filter(|p| p.stack() > 0).count();
        if available < MIN_PLAYERS {
            return Err(GameError::InsufficientPlayers { available });
        }
        let button = clockwise((self.button + 1) % n, n)
            .find(|&s| self.players[s].stack() > 0)
            .unwrap_or(self.button);
        let hand_number = self.hand_number + 1;
        Self::deal(
            self.players.clone(),
            button,
            self.small_blind,
            self.big_blind,
            hand_deck(self.seed, hand_number),
            hand_number,
            self.seed,
        )
    }

    fn deal(
        players: Vec<Player>,
        button: usize,
        small_blind: u32,
        big_blind: u32,
        deck: Deck,
        hand_number: u64,
        seed: u64,
    ) -> Result<GameState, GameError> {
        let n = players.len();
        let seated: Vec<usize> = clockwise(button, n)
            .filter(|&s| players[s].stack() > 0)
            .collect();
        if seated.len() < MIN_PLAYERS {
            return Err(GameError::InsufficientPlayers {
                available: seated.len(),
            });
        }
        if seated[0] != button {
            return Err(GameError::InvalidState("button seat has no chips".into()));
        }

        let mut state = GameState {
            players,
            pot: 0,
            active_bet: 0,
            street: Street::Preflop,
            board: Board::default(),
            player_turn: button,
            button,
            small_blind,
            big_blind,
            min_raise: big_blind,
            deck,
            history: Vec::new(),
            hand_number,
            seed,
            mode: GameMode::InProgress,
        };

        // one card at a time, starting left of the button
        let order: Vec<usize> = seated[1..].iter().chain(&seated[..1]).copied().collect();
        let mut dealt: Vec<Vec<Card>> = vec![Vec::with_capacity(2); n];
        for _ in 0..2 {
            for &seat in &order {
                let card = state.next_card()?;
                dealt[seat].push(card);
            }
        }
        for (player, cards) in state.players.iter_mut().zip(&dealt) {
            let pocket = match cards.as_slice() {
                [a, b] => Some(PocketCards([*a, *b])),
                _ => None,
            };
            player.start_hand(pocket);
        }
        state.assign_positions();

        let (sb, bb, first) = if seated.len() == 2 {
            (seated[0], seated[1], seated[0])
        } else {
            (seated[1], seated[2], seated[3 % seated.len()])
        };
        state.players[sb].commit(small_blind);
        state.players[bb].commit(big_blind);
        // a short big blind is all-in for less; the others still owe the full blind
        state.active_bet = state
            .players
            .iter()
            .map(Player::round_contribution)
            .max()
            .unwrap_or(0)
            .max(big_blind);
        state.pot = state.total_contributions();
        debug!(hand = hand_number, button, sb, bb, "hand dealt");

        state.settle(first)?;
        Ok(state)
    }

    fn next_card(&mut self) -> Result<Card, GameError> {
        let [card] = self.deck.draw_array::<1>()?;
        Ok(card)
    }

    fn assign_positions(&mut self) {
        let seated: Vec<usize> = clockwise(self.button, self.players.len())
            .filter(|&s| self.players[s].pocket().is_some())
            .collect();
        for (offset, &seat) in seated.iter().enumerate() {
            self.players[seat].set_position(Position::from_offset(offset, seated.len()));
        }
    }

    fn total_contributions(&self) -> u32 {
        self.players.iter().map(Player::hand_contribution).sum()
    }

    fn live_seats(&self) -> Vec<usize> {
        (0..self.players.len())
            .filter(|&s| self.players[s].is_live())
            .collect()
    }

    fn needs_action(&self, seat: usize) -> bool {
        let p = &self.players[seat];
        p.can_act() && (!p.has_acted() || p.round_contribution() < self.active_bet)
    }

    fn round_closed(&self) -> bool {
        let actors: Vec<&Player> = self.players.iter().filter(|p| p.can_act()).collect();
        match actors.as_slice() {
            [] => true,
            // nobody left to bet against
            [only] => only.round_contribution() >= self.active_bet,
            _ => !(0..self.players.len()).any(|s| self.needs_action(s)),
        }
    }

    /// Moves the hand forward from `from`: hands the turn to the next seat
    /// owing action, or closes the round and deals on until someone can act
    /// or the hand is over.
    fn settle(&mut self, mut from: usize) -> Result<(), GameError> {
        let n = self.players.len();
        loop {
            if self.live_seats().len() <= 1 {
                self.award_uncontested();
                return Ok(());
            }
            if !self.round_closed() {
                if let Some(seat) = clockwise(from, n).find(|&s| self.needs_action(s)) {
                    self.player_turn = seat;
                    return Ok(());
                }
            }
            match self.street.next() {
                Some(street) => {
                    self.begin_street(street)?;
                    from = (self.button + 1) % n;
                }
                None => return self.showdown(),
            }
        }
    }

    fn begin_street(&mut self, street: Street) -> Result<(), GameError> {
        for p in &mut self.players {
            p.end_round();
        }
        self.active_bet = 0;
        self.min_raise = self.big_blind;
        self.street = street;
        match street {
            Street::Preflop => {}
            Street::Flop => self.board.flop = Some(self.deck.draw_array::<3>()?),
            Street::Turn => self.board.turn = Some(self.next_card()?),
            Street::River => self.board.river = Some(self.next_card()?),
        }
        debug!(hand = self.hand_number, street = %street, board = %self.board, "street dealt");
        Ok(())
    }

    fn award_uncontested(&mut self) {
        let winners = self.live_seats();
        let payouts = self.pay_out(&vec![None; self.players.len()]);
        self.finish(winners, payouts, Vec::new());
    }

    fn showdown(&mut self) -> Result<(), GameError> {
        let [f1, f2, f3, t, r] = self.board.complete().ok_or_else(|| {
            GameError::InvalidState(format!("showdown with {} board cards", self.board.len()))
        })?;
        let n = self.players.len();
        let mut scores: Vec<Option<Score>> = vec![None; n];
        let mut shown = Vec::new();
        for seat in clockwise((self.button + 1) % n, n) {
            let player = &self.players[seat];
            if !player.is_live() {
                continue;
            }
            let Some(pocket) = player.pocket() else {
                continue;
            };
            let [a, b] = pocket.cards();
            let (hand, score) = evaluate(&[a, b, f1, f2, f3, t, r]);
            scores[seat] = Some(score);
            shown.push(ShowdownHand {
                seat,
                pocket,
                hand,
                score,
            });
        }
        let shown_scores: Vec<Score> = shown.iter().map(|h| h.score).collect();
        let mut winners: Vec<usize> = winning_indices(&shown_scores)
            .into_iter()
            .map(|i| shown[i].seat)
            .collect();
        winners.sort_unstable();

        let payouts = self.pay_out(&scores);
        self.finish(winners, payouts, shown);
        Ok(())
    }

    fn pay_out(&mut self, scores: &[Option<Score>]) -> Vec<u32> {
        let n = self.players.len();
        let contributions: Vec<u32> = self.players.iter().map(Player::hand_contribution).collect();
        let folded: Vec<bool> = self.players.iter().map(|p| !p.is_live()).collect();
        let odd_chip_order: Vec<usize> = clockwise((self.button + 1) % n, n).collect();
        let payouts = PotManager::new(&contributions, &folded).distribute(scores, &odd_chip_order);
        for (player, &won) in self.players.iter_mut().zip(&payouts) {
            player.add_chips(won);
        }
        payouts
    }

    fn finish(&mut self, winners: Vec<usize>, payouts: Vec<u32>, showdown: Vec<ShowdownHand>) {
        info!(
            hand = self.hand_number,
            ?winners,
            pot = self.pot,
            showdown = !showdown.is_empty(),
            "hand complete"
        );
        self.mode = GameMode::Complete(HandOutcome {
            winners,
            payouts,
            showdown,
        });
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }
    /// Chips committed this hand by every seat.
    pub fn pot(&self) -> u32 {
        self.pot
    }
    /// Amount every live player must match this round; never below the big
    /// blind preflop, even when the big blind posted short.
    pub fn active_bet(&self) -> u32 {
        self.active_bet
    }
    pub fn min_raise(&self) -> u32 {
        self.min_raise
    }
    pub fn street(&self) -> Street {
        self.street
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn button(&self) -> usize {
        self.button
    }
    pub fn blinds(&self) -> (u32, u32) {
        (self.small_blind, self.big_blind)
    }
    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }
    pub fn seed(&self) -> u64 {
        self.seed
    }
    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }
    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }
    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    /// Seat to act, or `None` once the hand is over.
    pub fn player_turn(&self) -> Option<usize> {
        match self.mode {
            GameMode::InProgress => Some(self.player_turn),
            GameMode::Complete(_) => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.mode, GameMode::Complete(_))
    }

    pub fn outcome(&self) -> Option<&HandOutcome> {
        match &self.mode {
            GameMode::Complete(outcome) => Some(outcome),
            GameMode::InProgress => None,
        }
    }

    pub fn winners(&self) -> Option<&[usize]> {
        self.outcome().map(|o| o.winners.as_slice())
    }

    /// Stacks plus chips still in the middle.
    pub fn total_chips(&self) -> u32 {
        let stacks: u32 = self.players.iter().map(Player::stack).sum();
        if self.is_complete() {
            stacks
        } else {
            stacks + self.pot
        }
    }

    pub fn to_call(&self, seat: usize) -> u32 {
        self.players
            .get(seat)
            .map_or(0, |p| self.active_bet.saturating_sub(p.round_contribution()))
    }

    /// Legal actions for the seat to act; empty once the hand is over.
    pub fn available_actions(&self) -> Vec<ActionKind> {
        if self.is_complete() {
            return Vec::new();
        }
        let p = &self.players[self.player_turn];
        rules::available_actions(p.stack(), self.to_call(self.player_turn))
    }

    /// Chips a raise by the seat to act may put in, call included.
    pub fn raise_range(&self) -> Option<(u32, u32)> {
        if self.is_complete() {
            return None;
        }
        let p = &self.players[self.player_turn];
        rules::raise_range(p.stack(), self.to_call(self.player_turn), self.min_raise)
    }

    /// Human-readable line for `action` by the seat to act.
    pub fn describe_action(&self, action: PlayerAction) -> String {
        let Some(player) = self.players.get(self.player_turn) else {
            return String::new();
        };
        let name = player.name();
        let all_in = |chips: u32| if chips >= player.stack() { " (all-in)" } else { "" };
        match action {
            PlayerAction::Check => format!("{} checks", name),
            PlayerAction::Fold => format!("{} folds", name),
            PlayerAction::Call => {
                let chips = self.to_call(self.player_turn).min(player.stack());
                format!("{} calls {}{}", name, chips, all_in(chips))
            }
            PlayerAction::Raise(chips) if self.active_bet == 0 => {
                format!("{} bets {}{}", name, chips, all_in(chips))
            }
            PlayerAction::Raise(chips) => format!(
                "{} raises to {}{}",
                name,
                player.round_contribution().saturating_add(chips),
                all_in(chips)
            ),
        }
    }

    /// One-line result such as "Player 1 wins 30 with Pair of Aces".
    pub fn result(&self) -> Option<String> {
        let outcome = self.outcome()?;
        let parts: Vec<String> = outcome
            .payouts
            .iter()
            .enumerate()
            .filter(|&(_, &won)| won > 0)
            .map(|(seat, won)| {
                let name = self.players[seat].name();
                match outcome.showdown.iter().find(|h| h.seat == seat) {
                    Some(h) => format!("{} wins {} with {}", name, won, h.score),
                    None => format!("{} wins {}", name, won),
                }
            })
            .collect();
        Some(parts.join("; "))
    }

    /// Hand history entry for the JSONL log.
    pub fn hand_record(&self, hand_id: impl Into<String>) -> HandRecord {
        let showdown = self
            .outcome()
            .filter(|o| !o.showdown.is_empty())
            .map(|o| {
                let best = o
                    .showdown
                    .iter()
                    .find(|h| o.winners.contains(&h.seat))
                    .map(|h| h.score.describe());
                let notes = match (o.winners.len(), best) {
                    (1, best) => best,
                    (_, Some(best)) => Some(format!("split pot, {}", best)),
                    (_, None) => None,
                };
                ShowdownInfo {
                    winners: o.winners.clone(),
                    notes,
                }
            });
        HandRecord {
            hand_id: hand_id.into(),
            seed: Some(self.seed),
            actions: self.history.clone(),
            board: self.board.cards(),
            result: self.result(),
            ts: None,
            meta: Some(serde_json::json!({
                "hand_number": self.hand_number,
                "button": self.button,
                "players": self.players.len(),
                "blinds": [self.small_blind, self.big_blind],
                "pot": self.pot,
            })),
            showdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    #[test]
    fn streets_advance_in_order() {
        let mut street = Street::Preflop;
        let mut seen = vec![street];
        while let Some(next) = street.next() {
            seen.push(next);
            street = next;
        }
        assert_eq!(
            seen,
            vec![Street::Preflop, Street::Flop, Street::Turn, Street::River]
        );
        assert_eq!(Street::Turn.board_len(), 4);
    }

    #[test]
    fn board_shape_follows_card_count() {
        let cards = parse_cards("2c7d9sJhKc").unwrap();
        let board = Board::from_cards(&cards[..4]).unwrap();
        assert_eq!(board.len(), 4);
        assert!(board.matches(Street::Turn));
        assert!(!board.matches(Street::River));
        assert_eq!(board.cards(), &cards[..4]);
        assert!(Board::from_cards(&cards[..2]).is_err());
    }

    #[test]
    fn blinds_posted_and_first_to_act_after_big_blind() {
        let state = GameState::make(4, 100, 1, 2).unwrap();
        assert_eq!(state.players()[1].round_contribution(), 1);
        assert_eq!(state.players()[2].round_contribution(), 2);
        assert_eq!(state.player_turn(), Some(3));
        assert_eq!(state.active_bet(), 2);
        assert_eq!(state.players()[0].position(), Position::Button);
        assert_eq!(state.deck_remaining(), 52 - 8);
    }

    #[test]
    fn clockwise_wraps() {
        let seats: Vec<usize> = clockwise(2, 4).collect();
        assert_eq!(seats, vec![2, 3, 0, 1]);
    }
}
