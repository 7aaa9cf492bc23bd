//! Closing-hand validation.
//!
//! A player closes by nominating one card of an 8-card hand; the other
//! seven must split into one of:
//!
//! - a single run of seven,
//! - a group of three and a group of four (either may be the run or set),
//! - two groups of three plus one loose card worth at most
//!   `max_loose_card_value` points.
//!
//! The search enumerates index subsets of the seven residual cards as 7-bit
//! masks. Each mask is classified at most once through a 128-entry memo
//! table, so the whole search touches at most 128 group checks.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use super::group::{group_kind, GroupKind};
use crate::cards::Card;
use crate::scoring::ScoringTable;

/// Cards held when a close is attempted (7 kept plus the one just drawn).
pub const MELD_HAND_SIZE: usize = 8;

const RESIDUAL_SIZE: usize = MELD_HAND_SIZE - 1;
const FULL_MASK: u8 = (1 << RESIDUAL_SIZE) - 1;

/// Parameters of the meld grammar that depend on the match configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeldRules {
    /// Highest value the loose card of a 3+3+1 close may have.
    pub max_loose_card_value: u32,
    /// Values used to price the loose card.
    pub scoring: ScoringTable,
}

impl Default for MeldRules {
    fn default() -> Self {
        Self {
            max_loose_card_value: 5,
            scoring: ScoringTable::default(),
        }
    }
}

/// Why a close was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MeldError {
    #[error("a close needs exactly {expected} cards in hand, found {actual}")]
    InvalidHandSize { expected: usize, actual: usize },

    #[error("meld card {0} is not in the hand")]
    InvalidMeldCard(Card),

    #[error("the remaining cards do not form a valid meld")]
    InvalidMeld,
}

/// One run or set of a close.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeldGroup {
    pub kind: GroupKind,
    pub cards: SmallVec<[Card; 7]>,
}

/// A proven close: the groups laid down, the optional loose card, and the
/// card discarded to close.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub groups: SmallVec<[MeldGroup; 2]>,
    pub loose: Option<Card>,
    pub discard: Card,
}

impl Meld {
    /// Every card left on the table (groups and loose card, not the discard).
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.cards.iter().copied())
            .chain(self.loose)
    }
}

/// Memoized group classification over subsets of the residual hand.
struct GroupCache<'a> {
    cards: &'a [Card; RESIDUAL_SIZE],
    memo: [Option<Option<GroupKind>>; 1 << RESIDUAL_SIZE],
}

impl<'a> GroupCache<'a> {
    fn new(cards: &'a [Card; RESIDUAL_SIZE]) -> Self {
        Self {
            cards,
            memo: [None; 1 << RESIDUAL_SIZE],
        }
    }

    fn cards_of(&self, mask: u8) -> SmallVec<[Card; 7]> {
        (0..RESIDUAL_SIZE)
            .filter(|&i| mask & (1 << i) != 0)
            .map(|i| self.cards[i])
            .collect()
    }

    fn kind(&mut self, mask: u8) -> Option<GroupKind> {
        let slot = mask as usize;
        if let Some(known) = self.memo[slot] {
            return known;
        }
        let kind = group_kind(&self.cards_of(mask));
        self.memo[slot] = Some(kind);
        kind
    }

    fn group(&mut self, mask: u8) -> Option<MeldGroup> {
        let kind = self.kind(mask)?;
        Some(MeldGroup {
            kind,
            cards: self.cards_of(mask),
        })
    }
}

/// All submasks of `within` with exactly `size` bits set, ascending.
fn subsets(within: u8, size: u32) -> impl Iterator<Item = u8> {
    (0..=FULL_MASK).filter(move |&m| m & !within == 0 && m.count_ones() == size)
}

fn partition(
    residual: &[Card; RESIDUAL_SIZE],
    rules: &MeldRules,
) -> Option<(SmallVec<[MeldGroup; 2]>, Option<Card>)> {
    let mut cache = GroupCache::new(residual);

    if cache.kind(FULL_MASK) == Some(GroupKind::Run) {
        let run = cache.group(FULL_MASK)?;
        return Some((smallvec::smallvec![run], None));
    }

    for three in subsets(FULL_MASK, 3) {
        let four = FULL_MASK & !three;
        if cache.kind(three).is_some() && cache.kind(four).is_some() {
            let groups = smallvec::smallvec![cache.group(three)?, cache.group(four)?];
            return Some((groups, None));
        }
    }

    for (loose_idx, &loose) in residual.iter().enumerate() {
        if rules.scoring.card_value(loose) > rules.max_loose_card_value {
            continue;
        }
        let rest = FULL_MASK & !(1 << loose_idx);
        // Anchor the first group on the lowest remaining index so each
        // unordered pair of groups is tried once.
        let anchor = rest & rest.wrapping_neg();
        for first in subsets(rest, 3).filter(|m| m & anchor != 0) {
            let second = rest & !first;
            if cache.kind(first).is_some() && cache.kind(second).is_some() {
                let groups = smallvec::smallvec![cache.group(first)?, cache.group(second)?];
                return Some((groups, Some(loose)));
            }
        }
    }

    None
}

/// Find a close for `hand` discarding `meld_card`.
///
/// ```
/// use chinchon_engine::cards::parse_cards;
/// use chinchon_engine::meld::{find_meld, MeldRules};
///
/// let hand = parse_cards("A♥,2♥,3♥,4♥,5♥,6♥,7♥,8♥").unwrap();
/// let meld = find_meld(&hand, hand[7], &MeldRules::default()).unwrap();
/// assert_eq!(meld.groups.len(), 1);
/// assert_eq!(meld.loose, None);
/// ```
pub fn find_meld(hand: &[Card], meld_card: Card, rules: &MeldRules) -> Result<Meld, MeldError> {
    if hand.len() != MELD_HAND_SIZE {
        return Err(MeldError::InvalidHandSize {
            expected: MELD_HAND_SIZE,
            actual: hand.len(),
        });
    }
    let discard_idx = hand
        .iter()
        .position(|&c| c == meld_card)
        .ok_or(MeldError::InvalidMeldCard(meld_card))?;

    let mut residual = [meld_card; RESIDUAL_SIZE];
    for (slot, &card) in residual
        .iter_mut()
        .zip(hand.iter().enumerate().filter(|&(i, _)| i != discard_idx).map(|(_, c)| c))
    {
        *slot = card;
    }

    let (groups, loose) = partition(&residual, rules).ok_or(MeldError::InvalidMeld)?;
    Ok(Meld {
        groups,
        loose,
        discard: meld_card,
    })
}

/// Whether `hand` can be closed by discarding `meld_card`. False for every
/// error `find_meld` would report.
#[must_use]
pub fn can_meld(hand: &[Card], meld_card: Card, rules: &MeldRules) -> bool {
    find_meld(hand, meld_card, rules).is_ok()
}
