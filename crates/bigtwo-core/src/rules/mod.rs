//! Play recognition: hand classification, combination enumeration and the
//! evaluator that validates and ranks plays.

pub mod classify;
pub mod cursor;
pub mod evaluator;

use crate::model::card::Card;
use crate::model::rank::Rank;
use serde::{Deserialize, Serialize};

pub use classify::{Classification, RankRun, StraightRuns};
pub use cursor::{CombinationCursor, Combination, Combinations};
pub use evaluator::{TrickEvaluator, can_suppress, power};

/// Variant toggles. The classifier and cursor support every group; these
/// flags only decide which groups a seat may actually show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub three_of_kind: bool,
    pub two_pair: bool,
    pub flush: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            three_of_kind: false,
            two_pair: false,
            flush: true,
        }
    }
}

impl Rules {
    /// Every group enabled.
    pub const fn permissive() -> Self {
        Self {
            three_of_kind: true,
            two_pair: true,
            flush: true,
        }
    }
}

/// Five-rank sequences that count as straights, in enumeration order. The
/// ace plays low in the first two and high in the last; nothing wraps past
/// the ace into the two.
pub const STRAIGHT_SEQUENCES: [[Rank; 5]; 10] = [
    [Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five],
    [Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six],
    [Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven],
    [Rank::Four, Rank::Five, Rank::Six, Rank::Seven, Rank::Eight],
    [Rank::Five, Rank::Six, Rank::Seven, Rank::Eight, Rank::Nine],
    [Rank::Six, Rank::Seven, Rank::Eight, Rank::Nine, Rank::Ten],
    [Rank::Seven, Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack],
    [Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen],
    [Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King],
    [Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace],
];

const fn sequence_mask(sequence: &[Rank; 5]) -> u16 {
    let mut mask = 0u16;
    let mut i = 0;
    while i < 5 {
        mask |= 1 << sequence[i].index();
        i += 1;
    }
    mask
}

/// Index into [`STRAIGHT_SEQUENCES`] of the sequence formed by these cards'
/// ranks, if they are five distinct ranks in sequence.
pub fn straight_sequence(cards: &[Card]) -> Option<usize> {
    if cards.len() != 5 {
        return None;
    }
    let mut mask = 0u16;
    for card in cards {
        mask |= 1 << card.rank.index();
    }
    if mask.count_ones() != 5 {
        return None;
    }
    STRAIGHT_SEQUENCES
        .iter()
        .position(|sequence| sequence_mask(sequence) == mask)
}

/// Rank whose card decides a straight's power: the top of the sequence,
/// except in 2-3-4-5-6 where the two counts.
pub fn straight_comparison_rank(sequence: usize) -> Rank {
    let ranks = &STRAIGHT_SEQUENCES[sequence];
    if ranks[0].is_two() { Rank::Two } else { ranks[4] }
}
