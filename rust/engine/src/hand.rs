use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

/// Totally ordered hand value: category first, then the tiebreak ranks.
///
/// `kickers` holds rank values (2..=14) ordered by significance and padded
/// with zeros: grouped ranks first (quad, trip, pairs), then single kickers
/// high to low. Straights store only their high card, with the wheel
/// (A-2-3-4-5) stored as 5. Two scores are equal only for identical rank
/// compositions, i.e. a split pot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Score {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: [u8; 5],
}

/// The best five cards, ordered by significance.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Hand(pub [Card; 5]);

impl Hand {
    pub fn cards(&self) -> &[Card; 5] {
        &self.0
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Every 5-card subset of 7 card positions.
const SUBSETS: [[usize; 5]; 21] = [
    [0, 1, 2, 3, 4],
    [0, 1, 2, 3, 5],
    [0, 1, 2, 3, 6],
    [0, 1, 2, 4, 5],
    [0, 1, 2, 4, 6],
    [0, 1, 2, 5, 6],
    [0, 1, 3, 4, 5],
    [0, 1, 3, 4, 6],
    [0, 1, 3, 5, 6],
    [0, 1, 4, 5, 6],
    [0, 2, 3, 4, 5],
    [0, 2, 3, 4, 6],
    [0, 2, 3, 5, 6],
    [0, 2, 4, 5, 6],
    [0, 3, 4, 5, 6],
    [1, 2, 3, 4, 5],
    [1, 2, 3, 4, 6],
    [1, 2, 3, 5, 6],
    [1, 2, 4, 5, 6],
    [1, 3, 4, 5, 6],
    [2, 3, 4, 5, 6],
];

/// Picks the best 5-card hand out of 7 cards by scoring all 21 subsets.
///
/// # Examples
///
/// ```
/// use holdem_engine::cards::parse_cards;
/// use holdem_engine::hand::{evaluate, Category};
///
/// let cards: [_; 7] = parse_cards("AsAdKcKh2s7d9c").unwrap().try_into().unwrap();
/// let (hand, score) = evaluate(&cards);
/// assert_eq!(score.category, Category::TwoPair);
/// assert_eq!(score.kickers, [14, 13, 9, 0, 0]);
/// assert_eq!(hand.cards().len(), 5);
/// ```
pub fn evaluate(cards: &[Card; 7]) -> (Hand, Score) {
    let mut best_idx = 0;
    let mut best = score_subset(cards, &SUBSETS[0]);
    for (i, subset) in SUBSETS.iter().enumerate().skip(1) {
        let s = score_subset(cards, subset);
        if s > best {
            best = s;
            best_idx = i;
        }
    }
    let five = pick(cards, &SUBSETS[best_idx]);
    (order_by_significance(five, &best), best)
}

fn pick(cards: &[Card; 7], idx: &[usize; 5]) -> [Card; 5] {
    [
        cards[idx[0]],
        cards[idx[1]],
        cards[idx[2]],
        cards[idx[3]],
        cards[idx[4]],
    ]
}

fn score_subset(cards: &[Card; 7], idx: &[usize; 5]) -> Score {
    score_five(&pick(cards, idx))
}

/// Scores exactly five cards.
pub fn score_five(cards: &[Card; 5]) -> Score {
    let mut rank_counts = [0u8; 15];
    let mut rank_mask: u16 = 0;
    let first_suit = cards[0].suit;
    let mut flush = true;
    for c in cards {
        let r = c.rank.value();
        rank_counts[r as usize] += 1;
        rank_mask |= 1 << r;
        flush &= c.suit == first_suit;
    }

    // distinct ranks ordered by (count desc, rank desc)
    let mut groups = [(0u8, 0u8); 5];
    let mut n = 0;
    for count in (1..=4).rev() {
        for r in (2..=14u8).rev() {
            if rank_counts[r as usize] == count {
                groups[n] = (count, r);
                n += 1;
            }
        }
    }
    let mut kickers = [0u8; 5];
    for (k, g) in kickers.iter_mut().zip(groups.iter()).take(n) {
        *k = g.1;
    }

    let straight = if n == 5 {
        straight_high_from_mask(rank_mask)
    } else {
        None
    };

    let category = match (straight, flush, groups[0].0, groups[1].0) {
        (Some(high), true, _, _) => {
            return Score {
                category: Category::StraightFlush,
                kickers: [high, 0, 0, 0, 0],
            }
        }
        (_, _, 4, _) => Category::FourOfAKind,
        (_, _, 3, 2) => Category::FullHouse,
        (_, true, _, _) => Category::Flush,
        (Some(high), _, _, _) => {
            return Score {
                category: Category::Straight,
                kickers: [high, 0, 0, 0, 0],
            }
        }
        (_, _, 3, _) => Category::ThreeOfAKind,
        (_, _, 2, 2) => Category::TwoPair,
        (_, _, 2, _) => Category::OnePair,
        _ => Category::HighCard,
    };
    Score { category, kickers }
}

/// Closed-form 7-card scorer built on rank counts and suit bitmasks.
/// Produces the same score as [`evaluate`] without examining subsets and
/// without allocating, which makes it the simulator's hot path.
pub fn score_seven(cards: &[Card; 7]) -> Score {
    let mut rank_counts = [0u8; 15];
    let mut rank_mask: u16 = 0;
    let mut suit_counts = [0u8; 4];
    let mut by_suit_mask = [0u16; 4];
    for c in cards {
        let r = c.rank.value();
        let s = c.suit.index();
        rank_counts[r as usize] += 1;
        rank_mask |= 1 << r;
        suit_counts[s] += 1;
        by_suit_mask[s] |= 1 << r;
    }

    // Seven cards hold at most one suit with five or more.
    let flush_suit = suit_counts.iter().position(|&n| n >= 5);
    if let Some(s) = flush_suit {
        if let Some(high) = straight_high_from_mask(by_suit_mask[s]) {
            return Score {
                category: Category::StraightFlush,
                kickers: [high, 0, 0, 0, 0],
            };
        }
    }

    let mut quad = 0u8;
    let mut trips = [0u8; 2];
    let mut pairs = [0u8; 3];
    let (mut n_trips, mut n_pairs) = (0, 0);
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            4 if quad == 0 => quad = r,
            3 if n_trips < 2 => {
                trips[n_trips] = r;
                n_trips += 1;
            }
            2 if n_pairs < 3 => {
                pairs[n_pairs] = r;
                n_pairs += 1;
            }
            _ => {}
        }
    }

    if quad != 0 {
        let mut kickers = [quad, 0, 0, 0, 0];
        fill_top_ranks(rank_mask & !(1 << quad), &mut kickers[1..2]);
        return Score {
            category: Category::FourOfAKind,
            kickers,
        };
    }

    if n_trips > 0 && (n_trips > 1 || n_pairs > 0) {
        let pair = trips[1].max(pairs[0]);
        return Score {
            category: Category::FullHouse,
            kickers: [trips[0], pair, 0, 0, 0],
        };
    }

    if let Some(s) = flush_suit {
        let mut kickers = [0u8; 5];
        fill_top_ranks(by_suit_mask[s], &mut kickers);
        return Score {
            category: Category::Flush,
            kickers,
        };
    }

    if let Some(high) = straight_high_from_mask(rank_mask) {
        return Score {
            category: Category::Straight,
            kickers: [high, 0, 0, 0, 0],
        };
    }

    let mut kickers = [0u8; 5];
    let category = if n_trips > 0 {
        kickers[0] = trips[0];
        fill_top_ranks(rank_mask & !(1 << trips[0]), &mut kickers[1..3]);
        Category::ThreeOfAKind
    } else if n_pairs >= 2 {
        kickers[0] = pairs[0];
        kickers[1] = pairs[1];
        let used = (1 << pairs[0]) | (1 << pairs[1]);
        fill_top_ranks(rank_mask & !used, &mut kickers[2..3]);
        Category::TwoPair
    } else if n_pairs == 1 {
        kickers[0] = pairs[0];
        fill_top_ranks(rank_mask & !(1 << pairs[0]), &mut kickers[1..4]);
        Category::OnePair
    } else {
        fill_top_ranks(rank_mask, &mut kickers);
        Category::HighCard
    };
    Score { category, kickers }
}

/// Writes the highest ranks present in `mask` into `out`, high to low.
fn fill_top_ranks(mask: u16, out: &mut [u8]) {
    let mut i = 0;
    for r in (2..=14u8).rev() {
        if i == out.len() {
            break;
        }
        if mask & (1 << r) != 0 {
            out[i] = r;
            i += 1;
        }
    }
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    // Treat Ace as 14 and additionally as 1
    let mut m = mask;
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    // Sliding 5-bit window from Ace(14) down to 5
    for high in (5..=14u8).rev() {
        let window = 0b1_1111u16 << (high - 4);
        if (m & window) == window {
            return Some(high);
        }
    }
    None
}

/// Orders five cards the way the score reads: grouped ranks first, then
/// kickers high to low; a wheel puts its Ace last.
fn order_by_significance(mut five: [Card; 5], score: &Score) -> Hand {
    let mut counts = [0u8; 15];
    for c in &five {
        counts[c.rank.value() as usize] += 1;
    }
    let wheel = matches!(
        score.category,
        Category::Straight | Category::StraightFlush
    ) && score.kickers[0] == 5;
    let key = |c: &Card| {
        let r = c.rank.value();
        let r = if wheel && r == 14 { 1 } else { r };
        (counts[c.rank.value() as usize], r, c.suit)
    };
    five.sort_by(|a, b| key(b).cmp(&key(a)));
    Hand(five)
}

/// Indices of every score equal to the maximum (several on a split pot).
pub fn winning_indices(scores: &[Score]) -> Vec<usize> {
    let Some(best) = scores.iter().max() else {
        return Vec::new();
    };
    scores
        .iter()
        .enumerate()
        .filter(|(_, s)| *s == best)
        .map(|(i, _)| i)
        .collect()
}

fn rank_of(v: u8) -> Rank {
    Rank::from_u8(v).unwrap_or(Rank::Two)
}

impl Score {
    /// Readable name such as "Pair of Aces" or "Straight, Five high".
    pub fn describe(&self) -> String {
        let k = |i: usize| rank_of(self.kickers[i]);
        match self.category {
            Category::HighCard => format!("High Card, {}", k(0).name()),
            Category::OnePair => format!("Pair of {}", k(0).plural()),
            Category::TwoPair => {
                format!("Two Pair, {} and {}", k(0).plural(), k(1).plural())
            }
            Category::ThreeOfAKind => format!("Three of a Kind, {}", k(0).plural()),
            Category::Straight => format!("Straight, {} high", k(0).name()),
            Category::Flush => format!("Flush, {} high", k(0).name()),
            Category::FullHouse => {
                format!("Full House, {} full of {}", k(0).plural(), k(1).plural())
            }
            Category::FourOfAKind => format!("Four of a Kind, {}", k(0).plural()),
            Category::StraightFlush if self.kickers[0] == 14 => "Royal Flush".to_string(),
            Category::StraightFlush => format!("Straight Flush, {} high", k(0).name()),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
