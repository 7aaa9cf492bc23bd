//! Chinchón rules.
//!
//! - `turn`: draw, discard, meld and review transitions
//! - `round`: dealing, scoring and elimination
//! - `view`: per-viewer snapshots
//! - `engine`: the `RulesEngine` trait and `Chinchon`, the entry point
//!   every move goes through

pub mod engine;
pub mod round;
mod turn;
pub mod view;

pub use engine::{Chinchon, GameResult, MoveOutcome, RulesEngine};
pub use round::{RoundOutcome, RoundSummary};
pub use view::{GameView, HandView, PlayerView};
