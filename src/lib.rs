//! # chinchon-engine
//!
//! Deterministic rules engine for Chinchón, a gin-rummy variant for two to
//! four players.
//!
//! ## Design Principles
//!
//! 1. **One Entry Point**: Every state change goes through
//!    `Chinchon::apply(state, player, move)`. A rejected move leaves the
//!    state untouched.
//!
//! 2. **Replayable**: Shuffles draw from a seeded ChaCha8 stream stored in
//!    the state, so a seed plus the move log reproduces a match exactly.
//!
//! 3. **Pure Validation**: The meld validator and scoring are free
//!    functions over a hand, usable without a game in progress.
//!
//! ## Modules
//!
//! - `core`: Players, RNG, configuration, moves, errors, state
//! - `cards`: Cards, ids and the deck
//! - `piles`: Draw and discard piles
//! - `meld`: Run/set predicate and closing-hand validation
//! - `scoring`: Deadwood values
//! - `rules`: Turn transitions, round controller, views, `RulesEngine`

pub mod cards;
pub mod core;
pub mod meld;
pub mod piles;
pub mod rules;
pub mod scoring;

// Re-export commonly used types
pub use crate::core::{
    ChinchonConfig, ConfigError, DrawSource, GameRng, GameRngState, GameState, Move, MoveError,
    MoveRecord, Phase, PlayerId, PlayerMap, PlayerState, SnapshotError, Stage,
};

pub use crate::cards::{make_deck, parse_cards, Card, Rank, Suit};

pub use crate::meld::{can_meld, find_meld, Meld, MeldError, MeldRules};

pub use crate::scoring::{deadwood, ScoringTable};

pub use crate::rules::{
    Chinchon, GameResult, GameView, HandView, MoveOutcome, PlayerView, RoundOutcome, RoundSummary,
    RulesEngine,
};
