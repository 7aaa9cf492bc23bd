//! Core engine types: players, RNG, configuration, moves, errors, state.
//!
//! Everything the rules operate on lives here; the rules themselves live in
//! `crate::rules`.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{DrawSource, Move, MoveRecord};
pub use config::{ChinchonConfig, ConfigError, HAND_SIZE, MAX_PLAYERS, MIN_PLAYERS};
pub use error::{DiscardRejection, DrawRejection, MoveError, SnapshotError};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{GameState, Phase, PlayerState, Stage};
