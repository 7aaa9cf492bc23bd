//! Card model: ranks, suits, jokers and the deck.
//!
//! ## Key Types
//!
//! - `Card`: immutable `(Rank, Suit)` value; its display form is its id
//! - `Rank`: Ace-low ranks plus `Joker`
//! - `Suit`: ♠ ♥ ♦ ♣ (for jokers only an identity marker)
//!
//! `make_deck` produces the fixed-order deck that every round shuffles.

pub mod card;
pub mod deck;

pub use card::{parse_cards, Card, ParseCardError, Rank, Suit};
pub use deck::{make_deck, MAX_JOKERS};
