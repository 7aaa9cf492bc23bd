//! Card value type.
//!
//! A `Card` is a `(Rank, Suit)` pair. Jokers use `Rank::Joker` and keep a
//! suit only as an identity marker, so the two jokers of a deck are `Jo♥`
//! and `Jo♠` and remain distinguishable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    /// All suits in deck order.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    /// Suit symbol used in card ids.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }

    fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            '♠' => Some(Suit::Spades),
            '♥' => Some(Suit::Hearts),
            '♦' => Some(Suit::Diamonds),
            '♣' => Some(Suit::Clubs),
            _ => None,
        }
    }
}

/// Card rank. Aces are low: the discriminant is the position in a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Joker,
}

impl Rank {
    /// The thirteen natural ranks, Ace to King.
    pub const NATURALS: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Position in a run (A=1 .. K=13). `None` for jokers.
    #[must_use]
    pub const fn ordinal(self) -> Option<u8> {
        match self {
            Rank::Joker => None,
            r => Some(r as u8),
        }
    }

    #[must_use]
    pub const fn is_face(self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }

    fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Joker => "Jo",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        if label == "Jo" {
            return Some(Rank::Joker);
        }
        Rank::NATURALS.into_iter().find(|r| r.label() == label)
    }
}

/// A playing card. Equality is identity: every card appears once per deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// A joker carrying `marker` as its identity suit.
    #[must_use]
    pub const fn joker(marker: Suit) -> Self {
        Self {
            rank: Rank::Joker,
            suit: marker,
        }
    }

    #[must_use]
    pub const fn is_wildcard(self) -> bool {
        matches!(self.rank, Rank::Joker)
    }

    /// Stable string id, e.g. `"10♥"` or `"Jo♠"`.
    #[must_use]
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

/// Error parsing a card id.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseCardError {
    #[error("card id is empty")]
    Empty,
    #[error("unknown suit in card id {0:?}")]
    UnknownSuit(String),
    #[error("unknown rank in card id {0:?}")]
    UnknownRank(String),
}

/// Parses ids like `"A♥"`, `"10♣"`, `"Jo♠"`. A trailing emoji variation
/// selector (`"8♥️"`) is ignored.
impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('\u{FE0F}');
        let suit_ch = trimmed.chars().last().ok_or(ParseCardError::Empty)?;
        let suit =
            Suit::from_symbol(suit_ch).ok_or_else(|| ParseCardError::UnknownSuit(s.to_string()))?;

        let label = &trimmed[..trimmed.len() - suit_ch.len_utf8()];
        let rank = Rank::from_label(label).ok_or_else(|| ParseCardError::UnknownRank(s.to_string()))?;

        Ok(Card { rank, suit })
    }
}

/// Parse a comma separated list of card ids, e.g. `"A♥, 2♥, Jo♠"`.
pub fn parse_cards(list: &str) -> Result<Vec<Card>, ParseCardError> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect()
}
