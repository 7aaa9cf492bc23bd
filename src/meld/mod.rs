//! Meld validation: can an 8-card hand be closed by discarding one card?
//!
//! - `group`: the run/set predicate with joker substitution
//! - `validator`: exhaustive partition search over the 7 remaining cards
//!
//! Everything here is pure and never touches `GameState`.

pub mod group;
pub mod validator;

pub use group::{group_kind, GroupKind, MAX_SET_SIZE, MIN_GROUP_SIZE};
pub use validator::{can_meld, find_meld, Meld, MeldError, MeldGroup, MeldRules, MELD_HAND_SIZE};
