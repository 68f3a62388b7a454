use crate::model::card::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Poker-hand category of a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardGroup {
    Single,
    Pair,
    ThreeOfKind,
    TwoPair,
    Straight,
    Flush,
    FullHouse,
    FourOfKind,
    StraightFlush,
}

impl CardGroup {
    pub const ALL: [CardGroup; 9] = [
        CardGroup::Single,
        CardGroup::Pair,
        CardGroup::ThreeOfKind,
        CardGroup::TwoPair,
        CardGroup::Straight,
        CardGroup::Flush,
        CardGroup::FullHouse,
        CardGroup::FourOfKind,
        CardGroup::StraightFlush,
    ];

    /// Number of cards a play of this group contains.
    pub const fn size(self) -> usize {
        match self {
            CardGroup::Single => 1,
            CardGroup::Pair => 2,
            CardGroup::ThreeOfKind => 3,
            CardGroup::TwoPair
            | CardGroup::Straight
            | CardGroup::Flush
            | CardGroup::FullHouse
            | CardGroup::FourOfKind
            | CardGroup::StraightFlush => 5,
        }
    }

    pub const fn is_bomb(self) -> bool {
        matches!(self, CardGroup::FourOfKind | CardGroup::StraightFlush)
    }
}

impl fmt::Display for CardGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CardGroup::Single => "single",
            CardGroup::Pair => "pair",
            CardGroup::ThreeOfKind => "three of a kind",
            CardGroup::TwoPair => "two pair",
            CardGroup::Straight => "straight",
            CardGroup::Flush => "flush",
            CardGroup::FullHouse => "full house",
            CardGroup::FourOfKind => "four of a kind",
            CardGroup::StraightFlush => "straight flush",
        };
        f.write_str(label)
    }
}

/// A validated play: its group, power and cards in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickInfo {
    pub group: CardGroup,
    pub power: i32,
    pub cards: Vec<Card>,
}

impl TrickInfo {
    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl fmt::Display for TrickInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.group)?;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        f.write_str("]")
    }
}
