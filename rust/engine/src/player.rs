use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::rules::ActionKind;

/// Table position, derived from the seat's distance to the button.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Position {
    SmallBlind,
    BigBlind,
    /// First seats to act after the big blind
    Early,
    Middle,
    /// Seats just before the button
    Late,
    /// Dealer button (also posts the small blind heads-up)
    Button,
}

impl Position {
    /// Position of the seat `offset` places left of the button at a table
    /// of `seated` players with chips.
    pub fn from_offset(offset: usize, seated: usize) -> Position {
        if seated <= 2 {
            return if offset == 0 {
                Position::Button
            } else {
                Position::BigBlind
            };
        }
        match offset {
            0 => Position::Button,
            1 => Position::SmallBlind,
            2 => Position::BigBlind,
            _ => {
                let rest = seated - 3;
                match (offset - 3) * 3 / rest {
                    0 => Position::Early,
                    1 => Position::Middle,
                    _ => Position::Late,
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Position::SmallBlind => "Small Blind",
            Position::BigBlind => "Big Blind",
            Position::Early => "Early Position",
            Position::Middle => "Middle Position",
            Position::Late => "Late Position",
            Position::Button => "Button",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A player action during a betting round.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Check (no bet, only valid if no bet to call)
    Check,
    /// Call the current bet, all-in for less if the stack is short
    Call,
    /// Put this many chips in, the call included
    Raise(u32),
    /// Fold and forfeit the hand
    Fold,
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::Check => ActionKind::Check,
            PlayerAction::Call => ActionKind::Call,
            PlayerAction::Raise(_) => ActionKind::Raise,
            PlayerAction::Fold => ActionKind::Fold,
        }
    }
}

/// The two cards dealt to one player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PocketCards(pub [Card; 2]);

impl PocketCards {
    pub fn cards(&self) -> [Card; 2] {
        self.0
    }
}

impl fmt::Display for PocketCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0[0], self.0[1])
    }
}

/// A seated player: chips, cards and per-hand betting flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    seat: usize,
    position: Position,
    stack: u32,
    /// Absent while sitting out without chips
    pocket: Option<PocketCards>,
    folded: bool,
    all_in: bool,
    /// Chips put in during the current betting round
    round_contribution: u32,
    /// Chips put in during the whole hand
    hand_contribution: u32,
    /// Whether the player has acted since the last raise this round
    acted: bool,
}

impl Player {
    pub fn new(seat: usize, name: impl Into<String>, stack: u32) -> Self {
        Self {
            name: name.into(),
            seat,
            position: Position::Button,
            stack,
            pocket: None,
            folded: false,
            all_in: false,
            round_contribution: 0,
            hand_contribution: 0,
            acted: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
    pub fn seat(&self) -> usize {
        self.seat
    }
    pub fn stack(&self) -> u32 {
        self.stack
    }
    pub fn position(&self) -> Position {
        self.position
    }
    pub fn pocket(&self) -> Option<PocketCards> {
        self.pocket
    }
    pub fn is_folded(&self) -> bool {
        self.folded
    }
    pub fn is_all_in(&self) -> bool {
        self.all_in
    }
    pub fn round_contribution(&self) -> u32 {
        self.round_contribution
    }
    pub fn hand_contribution(&self) -> u32 {
        self.hand_contribution
    }
    pub fn has_acted(&self) -> bool {
        self.acted
    }

    /// Still contesting the pot.
    pub fn is_live(&self) -> bool {
        !self.folded && self.pocket.is_some()
    }

    /// Live and able to put in more chips.
    pub fn can_act(&self) -> bool {
        self.is_live() && !self.all_in
    }

    pub(crate) fn set_seat(&mut self, seat: usize) {
        self.seat = seat;
    }

    pub(crate) fn set_position(&mut self, pos: Position) {
        self.position = pos;
    }

    pub(crate) fn set_acted(&mut self, acted: bool) {
        self.acted = acted;
    }

    pub(crate) fn fold(&mut self) {
        self.folded = true;
    }

    /// Moves up to `amount` chips into the pot and returns how many moved.
    /// Emptying the stack makes the player all-in.
    pub(crate) fn commit(&mut self, amount: u32) -> u32 {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.round_contribution += paid;
        self.hand_contribution += paid;
        if self.stack == 0 && paid > 0 {
            self.all_in = true;
        }
        paid
    }

    pub(crate) fn add_chips(&mut self, amount: u32) {
        self.stack = self.stack.saturating_add(amount);
    }

    pub(crate) fn end_round(&mut self) {
        self.round_contribution = 0;
        self.acted = false;
    }

    /// Clears all per-hand state and deals new cards (or none to sit out).
    pub(crate) fn start_hand(&mut self, pocket: Option<PocketCards>) {
        self.pocket = pocket;
        self.folded = false;
        self.all_in = false;
        self.round_contribution = 0;
        self.hand_contribution = 0;
        self.acted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_handed_positions() {
        let names: Vec<Position> = (0..9).map(|o| Position::from_offset(o, 9)).collect();
        assert_eq!(
            names,
            vec![
                Position::Button,
                Position::SmallBlind,
                Position::BigBlind,
                Position::Early,
                Position::Early,
                Position::Middle,
                Position::Middle,
                Position::Late,
                Position::Late,
            ]
        );
    }

    #[test]
    fn heads_up_button_and_big_blind() {
        assert_eq!(Position::from_offset(0, 2), Position::Button);
        assert_eq!(Position::from_offset(1, 2), Position::BigBlind);
    }

    #[test]
    fn commit_caps_at_stack_and_marks_all_in() {
        let mut p = Player::new(0, "p0", 30);
        p.start_hand(None);
        assert_eq!(p.commit(50), 30);
        assert_eq!(p.stack(), 0);
        assert!(p.is_all_in());
        assert_eq!(p.hand_contribution(), 30);
    }
}
