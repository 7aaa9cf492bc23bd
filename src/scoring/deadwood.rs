//! Deadwood: the penalty value of cards left in a hand.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

/// Point values used for deadwood.
///
/// Numeric ranks always count their face value (Ace = 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTable {
    /// Value of J, Q and K.
    pub face_card_value: u32,
    /// Value of a joker. Must be the highest penalty of the table.
    pub joker_value: u32,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self {
            face_card_value: 10,
            joker_value: 25,
        }
    }
}

impl ScoringTable {
    /// Penalty of a single card.
    #[must_use]
    pub fn card_value(&self, card: Card) -> u32 {
        match card.rank {
            Rank::Joker => self.joker_value,
            r if r.is_face() => self.face_card_value,
            r => u32::from(r.ordinal().unwrap_or(0)),
        }
    }
}

/// Sum of the penalties of every card in `hand`. No meld credit is given:
/// only players who did not close are ever scored.
#[must_use]
pub fn deadwood(hand: &[Card], table: &ScoringTable) -> u32 {
    hand.iter().map(|&card| table.card_value(card)).sum()
}
