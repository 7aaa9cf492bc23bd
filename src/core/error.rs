//! Error taxonomy.
//!
//! Every `MoveError` except `EmptyDeckUnrecoverable` is a plain rejection:
//! the state is left exactly as it was and the round continues.

use thiserror::Error;

use super::player::PlayerId;
use crate::cards::Card;
use crate::meld::MeldError;

/// Why a draw was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DrawRejection {
    #[error("the player has already drawn this turn")]
    AlreadyDrawn,
    #[error("the discard pile is empty")]
    EmptyDiscardPile,
}

/// Why a discard was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DiscardRejection {
    #[error("the player must draw first")]
    MustDrawFirst,
    #[error("card {0} is not in the player's hand")]
    NotInHand(Card),
}

/// A rejected move.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Covers `InvalidHandSize`, `InvalidMeldCard` and `InvalidMeld`.
    #[error(transparent)]
    Meld(#[from] MeldError),

    #[error("illegal draw: {0}")]
    IllegalDraw(DrawRejection),

    #[error("illegal discard: {0}")]
    IllegalDiscard(DiscardRejection),

    #[error("it is not {0}'s turn")]
    NotCurrentPlayer(PlayerId),

    #[error("{0} is not seated in this match")]
    UnknownPlayer(PlayerId),

    #[error("{0} has no round review pending")]
    NotReviewing(PlayerId),

    #[error("the match is over")]
    GameOver,

    /// Fatal for the round: both piles are exhausted.
    #[error("draw pile and discard pile are both exhausted")]
    EmptyDeckUnrecoverable,
}

impl MoveError {
    /// Whether the error ended the round instead of just rejecting a move.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, MoveError::EmptyDeckUnrecoverable)
    }
}

/// Failure to encode or decode a state snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Codec(#[from] bincode::Error),

    /// The snapshot decoded but describes an impossible table.
    #[error("inconsistent snapshot: {0}")]
    Inconsistent(&'static str),
}
