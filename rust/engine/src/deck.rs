use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// Seed used when a stacked deck needs an RNG for later reshuffles.
const STACKED_SEED: u64 = 0xA1A2_A3A4;

/// The 52-card deck for one hand. Cards come off the front and are never
/// returned until the next [`Deck::shuffle`].
///
/// # Examples
///
/// ```
/// use holdem_engine::deck::Deck;
///
/// let mut a = Deck::new(Some(7));
/// let mut b = Deck::new(Some(7));
/// assert_eq!(a.draw(5).unwrap(), b.draw(5).unwrap());
/// assert_eq!(a.remaining(), 47);
/// ```
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
    rng: ChaCha20Rng,
}

impl Deck {
    /// A freshly shuffled deck. Without a seed one is drawn at random.
    pub fn new(seed: Option<u64>) -> Self {
        let mut deck = Self::new_with_seed(seed.unwrap_or_else(rand::random));
        deck.shuffle();
        deck
    }

    pub fn new_with_seed(seed: u64) -> Self {
        Self::from_rng(ChaCha20Rng::seed_from_u64(seed))
    }

    /// Unshuffled deck driven by a caller-supplied generator.
    pub fn from_rng(rng: ChaCha20Rng) -> Self {
        // Keep initial order until shuffle is called explicitly
        Self {
            cards: full_deck(),
            position: 0,
            rng,
        }
    }

    /// Deck that deals `cards` in exactly the given order. Used for replay and
    /// for stacking specific deals in tests.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            position: 0,
            rng: ChaCha20Rng::seed_from_u64(STACKED_SEED),
        }
    }

    /// Gathers all 52 cards back and shuffles them, reusing the buffer.
    pub fn shuffle(&mut self) {
        self.cards.clear();
        self.cards.extend(full_deck());
        self.cards.shuffle(&mut self.rng);
        self.position = 0;
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    /// Removes and returns the next `n` cards.
    pub fn draw(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        let drawn = self.peek(n)?.to_vec();
        self.position += n;
        Ok(drawn)
    }

    /// Draws into a fixed-size array without allocating.
    pub fn draw_array<const N: usize>(&mut self) -> Result<[Card; N], GameError> {
        let slice = self.peek(N)?;
        let out = std::array::from_fn(|i| slice[i]);
        self.position += N;
        Ok(out)
    }

    fn peek(&self, n: usize) -> Result<&[Card], GameError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(GameError::DeckExhausted {
                requested: n,
                remaining,
            });
        }
        Ok(&self.cards[self.position..self.position + n])
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }

    /// The undealt cards in dealing order.
    pub fn remaining_cards(&self) -> &[Card] {
        &self.cards[self.position.min(self.cards.len())..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_past_the_end_is_deck_exhausted() {
        let mut deck = Deck::new(Some(3));
        deck.draw(50).unwrap();
        let err = deck.draw(3).unwrap_err();
        assert!(matches!(
            err,
            GameError::DeckExhausted {
                requested: 3,
                remaining: 2
            }
        ));
        // failed draw consumes nothing
        assert_eq!(deck.remaining(), 2);
    }

    #[test]
    fn draw_array_matches_draw() {
        let mut a = Deck::new(Some(11));
        let mut b = Deck::new(Some(11));
        let arr: [Card; 5] = a.draw_array().unwrap();
        assert_eq!(arr.to_vec(), b.draw(5).unwrap());
    }

    #[test]
    fn stacked_deck_deals_in_order() {
        let cards = vec![
            "As".parse().unwrap(),
            "Kd".parse().unwrap(),
            "2c".parse().unwrap(),
        ];
        let mut deck = Deck::from_cards(cards.clone());
        assert_eq!(deck.remaining_cards(), cards.as_slice());
        assert_eq!(deck.deal_card(), Some(cards[0]));
        assert_eq!(deck.remaining_cards(), &cards[1..]);
    }
}
