//! # holdem-engine: Texas Hold'em Engine Core
//!
//! A no-limit Texas Hold'em engine for tables of two to ten players, with a
//! seven-card hand evaluator, a pure betting state machine, and a Monte Carlo
//! simulator that estimates starting-hand win rates for a preflop trainer.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and parsing
//! - [`deck`] - Seeded ChaCha20 deck with draw-without-replacement
//! - [`hand`] - Hand evaluation and score ordering
//! - [`rules`] - Legal actions, raise bounds, action validation
//! - [`player`] - Player state, positions, and actions
//! - [`pot`] - Main and side pot construction and payout
//! - [`game`] - Betting state machine from blinds to showdown
//! - [`simulate`] - Parallel Monte Carlo win-rate estimation
//! - [`odds`] - Hand classes and the persisted odds table
//! - [`logger`] - JSONL hand history
//! - [`config`] - TOML and environment configuration
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::cards::parse_cards;
//! use holdem_engine::hand::{evaluate, Category};
//!
//! let cards: [_; 7] = parse_cards("AhKhQhJhTh2c3d").unwrap().try_into().unwrap();
//! let (best, score) = evaluate(&cards);
//! assert_eq!(score.category, Category::StraightFlush);
//! println!("{} ({})", best, score);
//! ```
//!
//! ## Playing a Hand
//!
//! ```rust
//! use holdem_engine::game::GameState;
//! use holdem_engine::player::PlayerAction;
//!
//! let mut state = GameState::make(2, 100, 1, 2).unwrap();
//! while !state.is_complete() {
//!     state = state.apply_action(PlayerAction::Fold).unwrap();
//! }
//! assert_eq!(state.winners(), Some(&[1][..]));
//! ```
//!
//! ## Estimating Odds
//!
//! ```rust
//! use holdem_engine::config::SimulationConfig;
//! use holdem_engine::simulate::Simulator;
//!
//! let sim = Simulator::new(SimulationConfig {
//!     trials: 2_000,
//!     players: 3,
//!     seed: Some(42),
//!     shards: 2,
//! })
//! .unwrap();
//! let table = sim.run().unwrap();
//! assert!(table.len() > 0);
//! ```

pub mod cards;
pub mod config;
pub mod deck;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod odds;
pub mod player;
pub mod pot;
pub mod rules;
pub mod simulate;
