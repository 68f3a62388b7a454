use crate::model::card::Card;
use crate::model::rank::Rank;

/// Cards held by one seat, kept sorted ascending and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        debug_assert!(
            hand.cards.windows(2).all(|pair| pair[0] != pair[1]),
            "hand holds duplicate cards"
        );
        hand
    }

    pub fn add(&mut self, card: Card) {
        debug_assert!(!self.contains(card), "{card} dealt twice");
        self.cards.push(card);
        self.sort();
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Ok(index) = self.cards.binary_search(&card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    /// Removes the cards at `indices` and returns them in hand order.
    /// Callers validate the indices first.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Vec<Card> {
        let mut removed = Vec::with_capacity(indices.len());
        let mut kept = Vec::with_capacity(self.cards.len().saturating_sub(indices.len()));
        for (index, card) in self.cards.drain(..).enumerate() {
            if indices.contains(&index) {
                removed.push(card);
            } else {
                kept.push(card);
            }
        }
        self.cards = kept;
        removed
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.binary_search(&card).is_ok()
    }

    pub fn position(&self, card: Card) -> Option<usize> {
        self.cards.binary_search(&card).ok()
    }

    pub fn count_rank(&self, rank: Rank) -> usize {
        self.cards.iter().filter(|card| card.rank == rank).count()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn sort(&mut self) {
        self.cards.sort_unstable();
    }
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::model::card::{Card, parse_cards};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn add_and_remove_cards() {
        let mut hand = Hand::new();
        let card = Card::new(Rank::Three, Suit::Clubs);
        hand.add(card);
        assert!(hand.contains(card));
        assert!(hand.remove(card));
        assert!(!hand.contains(card));
        assert!(!hand.remove(card));
    }

    #[test]
    fn cards_are_sorted_by_rank_then_suit() {
        let mut hand = Hand::new();
        hand.add(Card::new(Rank::Two, Suit::Clubs));
        hand.add(Card::new(Rank::King, Suit::Spades));
        hand.add(Card::new(Rank::King, Suit::Diamonds));
        hand.add(Card::new(Rank::Three, Suit::Hearts));
        let ordered: Vec<_> = hand.iter().copied().collect();
        assert_eq!(ordered, parse_cards("3H KD KS 2C").unwrap());
    }

    #[test]
    fn remove_indices_keeps_order() {
        let mut hand = Hand::with_cards(parse_cards("5S 3C 4D 2H 9C").unwrap());
        let removed = hand.remove_indices(&[4, 0]);
        assert_eq!(removed, parse_cards("3C 2H").unwrap());
        assert_eq!(hand.cards(), parse_cards("4D 5S 9C").unwrap().as_slice());
        assert_eq!(hand.count_rank(Rank::Two), 0);
    }
}
