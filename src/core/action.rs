//! Moves and the move log.
//!
//! A `Move` is the closed set of commands a player can submit. Accepted
//! moves are appended to the state's history as `MoveRecord`s, which gives
//! the serialized move log a replay needs.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::cards::Card;

/// Which pile a draw takes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawSource {
    DrawPile,
    DiscardPile,
}

/// A player command.
///
/// ```
/// use chinchon_engine::core::{DrawSource, Move};
///
/// let draw = Move::Draw { from: DrawSource::DiscardPile };
/// let close = Move::Meld { card: "K♦".parse().unwrap() };
/// assert_ne!(draw, close);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Take the top card of a pile.
    Draw { from: DrawSource },
    /// Discard a card and pass the turn.
    Discard { card: Card },
    /// Discard a card and close the round with the rest of the hand.
    Meld { card: Card },
    /// Acknowledge the end-of-round review.
    EndReview,
}

impl Move {
    /// The card argument, if the move has one.
    #[must_use]
    pub fn card(&self) -> Option<Card> {
        match *self {
            Move::Discard { card } | Move::Meld { card } => Some(card),
            Move::Draw { .. } | Move::EndReview => None,
        }
    }
}

/// An accepted move with its position in the match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The player who made the move.
    pub player: PlayerId,

    /// The move.
    pub mv: Move,

    /// Round number when the move was applied (starts at 1).
    pub round: u32,

    /// Position in the match-wide move log (starts at 0).
    pub sequence: u32,
}

impl MoveRecord {
    #[must_use]
    pub fn new(player: PlayerId, mv: Move, round: u32, sequence: u32) -> Self {
        Self {
            player,
            mv,
            round,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_card_argument() {
        let card: Card = "7♣".parse().unwrap();

        assert_eq!(Move::Discard { card }.card(), Some(card));
        assert_eq!(Move::Meld { card }.card(), Some(card));
        assert_eq!(Move::EndReview.card(), None);
        assert_eq!(Move::Draw { from: DrawSource::DrawPile }.card(), None);
    }

    #[test]
    fn test_move_record_serialization() {
        let record = MoveRecord::new(
            PlayerId::new(1),
            Move::Discard { card: "10♥".parse().unwrap() },
            2,
            17,
        );

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: MoveRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
