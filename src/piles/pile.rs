//! Ordered card piles.
//!
//! A `Pile` is an ordered stack where index 0 is the bottom and the last
//! element is the top. The draw pile and the discard pile are both piles;
//! they differ only in which end the players see.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::rng::GameRng;

/// Ordered stack of cards, top = end of the vec.
///
/// ```
/// use chinchon_engine::cards::make_deck;
/// use chinchon_engine::piles::Pile;
///
/// let mut pile = Pile::from_cards(make_deck(0));
/// let top = pile.pop_top().unwrap();
/// assert_eq!(top.id(), "K♣");
/// assert_eq!(pile.len(), 51);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    cards: Vec<Card>,
}

impl Pile {
    /// Create an empty pile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pile whose last card is the top.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards bottom to top.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Put a card on top.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Take the top card.
    pub fn pop_top(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Look at the top card without taking it.
    #[must_use]
    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    /// Shuffle the pile in place.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    /// Remove every card except the top one, bottom first.
    ///
    /// Used to rebuild the draw pile from the discard pile.
    pub fn take_all_but_top(&mut self) -> Vec<Card> {
        match self.cards.pop() {
            Some(top) => {
                let rest = std::mem::take(&mut self.cards);
                self.cards.push(top);
                rest
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    fn card(rank: Rank) -> Card {
        Card::new(rank, Suit::Hearts)
    }

    #[test]
    fn test_push_pop_top() {
        let mut pile = Pile::new();
        assert!(pile.is_empty());
        assert_eq!(pile.pop_top(), None);

        pile.push(card(Rank::Two));
        pile.push(card(Rank::Three));

        assert_eq!(pile.top(), Some(card(Rank::Three)));
        assert_eq!(pile.pop_top(), Some(card(Rank::Three)));
        assert_eq!(pile.len(), 1);
    }

    #[test]
    fn test_take_all_but_top() {
        let mut pile = Pile::from_cards(vec![card(Rank::Ace), card(Rank::Two), card(Rank::Three)]);

        let rest = pile.take_all_but_top();

        assert_eq!(rest, vec![card(Rank::Ace), card(Rank::Two)]);
        assert_eq!(pile.cards(), &[card(Rank::Three)]);
    }

    #[test]
    fn test_take_all_but_top_small_piles() {
        let mut empty = Pile::new();
        assert!(empty.take_all_but_top().is_empty());

        let mut single = Pile::from_cards(vec![card(Rank::Ace)]);
        assert!(single.take_all_but_top().is_empty());
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let cards: Vec<Card> = Rank::NATURALS.iter().map(|&r| card(r)).collect();
        let mut a = Pile::from_cards(cards.clone());
        let mut b = Pile::from_cards(cards);

        a.shuffle(&mut GameRng::new(9));
        b.shuffle(&mut GameRng::new(9));

        assert_eq!(a, b);
        assert_eq!(a.len(), 13);
    }
}
