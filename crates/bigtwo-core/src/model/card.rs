use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// One of the 52 cards. Field order gives the derived ordering: rank first,
/// then suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    /// The card whose holder leads the first cycle of every round.
    pub const STARTING: Card = Card::new(Rank::Three, Suit::Clubs);

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Stable id in `0..52`, ascending with the card ordering.
    pub const fn index(self) -> u8 {
        (self.rank.index() * 4 + self.suit.index()) as u8
    }

    pub const fn from_index(index: u8) -> Option<Self> {
        let rank = match Rank::from_index(index as usize / 4) {
            Some(rank) => rank,
            None => return None,
        };
        match Suit::from_index(index as usize % 4) {
            Some(suit) => Some(Self::new(rank, suit)),
            None => None,
        }
    }

    /// Single-card strength used by every group's power.
    pub const fn power(self) -> i32 {
        4 * self.rank.power() + self.suit as i32
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a card")]
pub struct ParseCardError(pub String);

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let suit = chars
            .next_back()
            .and_then(Suit::from_symbol)
            .ok_or_else(|| ParseCardError(trimmed.to_string()))?;
        let rank = Rank::from_symbol(chars.as_str()).ok_or_else(|| ParseCardError(trimmed.to_string()))?;
        Ok(Card::new(rank, suit))
    }
}

/// Parses a whitespace separated card list such as `"3C 3D 4S"`.
pub fn parse_cards(text: &str) -> Result<Vec<Card>, ParseCardError> {
    text.split_whitespace().map(str::parse).collect()
}
