//! Deck construction.

use super::card::{Card, Rank, Suit};

/// Most jokers a deck can carry: one identity marker per suit.
pub const MAX_JOKERS: u8 = 4;

/// Build the fixed-order deck: ♠, ♥, ♦, ♣ each from Ace to King, followed by
/// `jokers` jokers marked ♥, ♠, ♦, ♣ in that order.
///
/// Shuffling is a separate step, see [`crate::piles::Pile::shuffle`].
///
/// ```
/// use chinchon_engine::cards::make_deck;
///
/// let deck = make_deck(2);
/// assert_eq!(deck.len(), 54);
/// assert_eq!(deck[0].id(), "A♠");
/// assert_eq!(deck[53].id(), "Jo♠");
/// ```
#[must_use]
pub fn make_deck(jokers: u8) -> Vec<Card> {
    const JOKER_MARKERS: [Suit; 4] = [Suit::Hearts, Suit::Spades, Suit::Diamonds, Suit::Clubs];

    let jokers = jokers.min(MAX_JOKERS) as usize;
    let mut cards = Vec::with_capacity(52 + jokers);
    for suit in Suit::ALL {
        for rank in Rank::NATURALS {
            cards.push(Card::new(rank, suit));
        }
    }
    cards.extend(JOKER_MARKERS.iter().take(jokers).map(|&marker| Card::joker(marker)));
    cards
}
