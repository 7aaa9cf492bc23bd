//! Round scoring.
//!
//! Players who did not close the round are charged the deadwood value of
//! their hand; the closing player scores zero.

pub mod deadwood;

pub use deadwood::{deadwood, ScoringTable};
