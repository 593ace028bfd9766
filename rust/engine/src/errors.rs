use thiserror::Error;

use crate::rules::ActionKind;

/// Why an action was rejected. The state it was applied to is left untouched,
/// so the actor can simply be asked again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IllegalAction {
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    NotPlayersTurn { expected: usize, actual: usize },
    #[error("{action:?} is not available (legal: {legal:?})")]
    ActionNotAvailable {
        action: ActionKind,
        legal: Vec<ActionKind>,
    },
    #[error("Invalid raise amount: {amount}, allowed range: {min}..={max}")]
    RaiseOutOfRange { amount: u32, min: u32, max: u32 },
    #[error("Hand already complete")]
    HandComplete,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Illegal action: {0}")]
    IllegalAction(#[from] IllegalAction),
    #[error("Deck exhausted: requested {requested} cards, {remaining} remaining")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("Insufficient players: {available} with chips, at least 2 required")]
    InsufficientPlayers { available: usize },
    #[error("Malformed odds data at line {line}: {reason}")]
    MalformedOddsData { line: usize, reason: String },
    #[error("Invalid table: {0}")]
    InvalidTable(String),
    #[error("Invalid game state: {0}")]
    InvalidState(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GameError {
    pub fn is_illegal_action(&self) -> bool {
        matches!(self, GameError::IllegalAction(_))
    }
}

/// Errors raised while resolving [`crate::config::EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
