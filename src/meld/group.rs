//! The group predicate shared by runs and sets.
//!
//! A group is a run (same suit, consecutive ranks, Ace low, no wrap) or a
//! set (same rank, distinct suits). Jokers fill any missing slot: an
//! interior gap or an end of a run, a missing suit of a set. Every group
//! must contain at least one natural card.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::Card;

/// Smallest legal group.
pub const MIN_GROUP_SIZE: usize = 3;

/// Sets cannot repeat a suit, so they top out at four cards.
pub const MAX_SET_SIZE: usize = 4;

/// Kind of a valid group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    Run,
    Set,
}

/// Classify `cards` as a group, or `None` if they form neither a run nor a
/// set. When both readings are possible (one natural plus jokers) the set
/// reading wins; callers only care that a group exists.
///
/// ```
/// use chinchon_engine::cards::parse_cards;
/// use chinchon_engine::meld::{group_kind, GroupKind};
///
/// assert_eq!(group_kind(&parse_cards("4♠,Jo♥,6♠").unwrap()), Some(GroupKind::Run));
/// assert_eq!(group_kind(&parse_cards("3♦,3♣,3♥").unwrap()), Some(GroupKind::Set));
/// assert_eq!(group_kind(&parse_cards("3♦,3♦,3♥").unwrap()), None);
/// ```
#[must_use]
pub fn group_kind(cards: &[Card]) -> Option<GroupKind> {
    let len = cards.len();
    if len < MIN_GROUP_SIZE {
        return None;
    }

    let mut naturals: SmallVec<[Card; 8]> =
        cards.iter().copied().filter(|c| !c.is_wildcard()).collect();
    if naturals.is_empty() {
        return None;
    }
    // Rank first, then suit.
    naturals.sort_unstable();

    let first = naturals[0];
    let last = naturals[naturals.len() - 1];

    let same_rank = naturals.iter().all(|c| c.rank == first.rank);
    if same_rank && len <= MAX_SET_SIZE && naturals.windows(2).all(|w| w[0].suit != w[1].suit) {
        return Some(GroupKind::Set);
    }

    let same_suit = naturals.iter().all(|c| c.suit == first.suit);
    if same_suit && naturals.windows(2).all(|w| w[0].rank < w[1].rank) {
        let (low, high) = match (first.rank.ordinal(), last.rank.ordinal()) {
            (Some(low), Some(high)) => (low as usize, high as usize),
            _ => return None,
        };
        // Jokers cover the gaps; surplus jokers extend an end, which always
        // fits between Ace and King for groups of at most seven cards.
        if high - low + 1 <= len {
            return Some(GroupKind::Run);
        }
    }

    None
}
