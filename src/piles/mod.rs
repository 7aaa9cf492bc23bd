//! Shared card piles (draw pile and discard pile).

pub mod pile;

pub use pile::Pile;
