//! Match configuration.
//!
//! `ChinchonConfig` is plain data: it deserializes from whatever format the
//! host platform uses (missing fields fall back to the defaults) and can be
//! built in code with the chained `with_*` setters.
//!
//! ```
//! use chinchon_engine::core::ChinchonConfig;
//!
//! let config = ChinchonConfig::default()
//!     .with_player_count(3)
//!     .with_elimination_threshold(50);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::MAX_JOKERS;
use crate::meld::{MeldRules, MELD_HAND_SIZE};
use crate::scoring::ScoringTable;

/// Cards dealt to each player. Fixed by the meld grammar.
pub const HAND_SIZE: usize = MELD_HAND_SIZE - 1;

/// Smallest table.
pub const MIN_PLAYERS: usize = 2;

/// Largest table.
pub const MAX_PLAYERS: usize = 4;

/// Rejected configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("player count must be between 2 and 4, got {0}")]
    PlayerCount(usize),

    #[error("at most 4 jokers are supported, got {0}")]
    Jokers(u8),

    #[error("joker value {joker} must be at least the face card value {face}")]
    JokerValue { joker: u32, face: u32 },

    #[error("elimination threshold must be positive")]
    Threshold,
}

/// Complete match configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChinchonConfig {
    /// Number of seats (2-4).
    pub player_count: usize,

    /// Jokers shuffled into each round's deck (0-4).
    pub jokers: u8,

    /// A player whose total exceeds this is eliminated.
    pub elimination_threshold: u32,

    /// Highest value of the loose card in a 3+3+1 close.
    pub max_loose_card_value: u32,

    /// Deadwood values.
    pub scoring: ScoringTable,
}

impl Default for ChinchonConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            jokers: 2,
            elimination_threshold: 100,
            max_loose_card_value: 5,
            scoring: ScoringTable::default(),
        }
    }
}

impl ChinchonConfig {
    #[must_use]
    pub fn with_player_count(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    #[must_use]
    pub fn with_jokers(mut self, jokers: u8) -> Self {
        self.jokers = jokers;
        self
    }

    #[must_use]
    pub fn with_elimination_threshold(mut self, threshold: u32) -> Self {
        self.elimination_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_max_loose_card_value(mut self, value: u32) -> Self {
        self.max_loose_card_value = value;
        self
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringTable) -> Self {
        self.scoring = scoring;
        self
    }

    /// The meld grammar parameters derived from this configuration.
    #[must_use]
    pub fn meld_rules(&self) -> MeldRules {
        MeldRules {
            max_loose_card_value: self.max_loose_card_value,
            scoring: self.scoring,
        }
    }

    /// Check the configuration can run a match.
    ///
    /// A full table of four takes 28 cards plus one discard, so any valid
    /// player count can always be dealt from a 52-card deck.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(ConfigError::PlayerCount(self.player_count));
        }
        if self.jokers > MAX_JOKERS {
            return Err(ConfigError::Jokers(self.jokers));
        }
        if self.scoring.joker_value < self.scoring.face_card_value {
            return Err(ConfigError::JokerValue {
                joker: self.scoring.joker_value,
                face: self.scoring.face_card_value,
            });
        }
        if self.elimination_threshold == 0 {
            return Err(ConfigError::Threshold);
        }
        Ok(())
    }
}
