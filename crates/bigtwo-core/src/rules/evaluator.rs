use crate::error::InvalidPlay;
use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::trick::{CardGroup, TrickInfo};
use crate::rules::{Rules, straight_comparison_rank, straight_sequence};

/// Added to a four of a kind's card power so it outranks every non-bomb.
pub const FOUR_OF_KIND_BONUS: i32 = 100_000;
/// Added to a straight flush's card power so it outranks every four of a kind.
pub const STRAIGHT_FLUSH_BONUS: i32 = 200_000;

/// Stateless rules engine: validates selections and ranks plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrickEvaluator {
    rules: Rules,
}

impl TrickEvaluator {
    pub const fn new(rules: Rules) -> Self {
        Self { rules }
    }

    pub const fn rules(&self) -> Rules {
        self.rules
    }

    /// Whether the variant lets a seat show this group at all.
    pub const fn allows(&self, group: CardGroup) -> bool {
        match group {
            CardGroup::ThreeOfKind => self.rules.three_of_kind,
            CardGroup::TwoPair => self.rules.two_pair,
            CardGroup::Flush => self.rules.flush,
            _ => true,
        }
    }

    /// Checks that `indices` select a legal group from `hand` (sorted) and
    /// returns the formed play.
    pub fn validate(&self, hand: &[Card], indices: &[usize]) -> Result<TrickInfo, InvalidPlay> {
        for (position, &index) in indices.iter().enumerate() {
            if index >= hand.len() {
                return Err(InvalidPlay::IndexOutOfRange(index));
            }
            if indices[position + 1..].contains(&index) {
                return Err(InvalidPlay::DuplicateIndex(index));
            }
        }

        let mut cards: Vec<Card> = indices.iter().map(|&index| hand[index]).collect();
        cards.sort_unstable();

        let group = match cards.len() {
            1 => CardGroup::Single,
            2 => {
                if cards[0].rank != cards[1].rank {
                    return Err(InvalidPlay::NotSameRank);
                }
                CardGroup::Pair
            }
            3 if self.rules.three_of_kind => {
                if cards[0].rank != cards[2].rank {
                    return Err(InvalidPlay::NotSameRank);
                }
                CardGroup::ThreeOfKind
            }
            5 => self.classify_five(&cards)?,
            other => return Err(InvalidPlay::WrongSize(other)),
        };

        Ok(TrickInfo {
            group,
            power: power(group, &cards),
            cards,
        })
    }

    fn classify_five(&self, cards: &[Card]) -> Result<CardGroup, InvalidPlay> {
        let mut counts = rank_counts(cards);
        counts.sort_unstable_by(|a, b| b.cmp(a));

        match counts.as_slice() {
            [3, 2] => Ok(CardGroup::FullHouse),
            [4, 1] => Ok(CardGroup::FourOfKind),
            [2, 2, 1] if self.rules.two_pair => Ok(CardGroup::TwoPair),
            [1, 1, 1, 1, 1] => {
                let same_suit = cards.iter().all(|card| card.suit == cards[0].suit);
                let sequence = straight_sequence(cards).is_some();
                match (sequence, same_suit) {
                    (true, true) => Ok(CardGroup::StraightFlush),
                    (true, false) => Ok(CardGroup::Straight),
                    (false, true) if self.rules.flush => Ok(CardGroup::Flush),
                    _ => Err(InvalidPlay::NoPattern),
                }
            }
            _ => Err(InvalidPlay::NoPattern),
        }
    }
}

/// Sizes of each equal-rank block in a sorted card slice.
fn rank_counts(cards: &[Card]) -> Vec<usize> {
    let mut counts: Vec<usize> = Vec::with_capacity(cards.len());
    let mut previous: Option<Rank> = None;
    for card in cards {
        if previous == Some(card.rank) {
            if let Some(last) = counts.last_mut() {
                *last += 1;
            }
        } else {
            counts.push(1);
            previous = Some(card.rank);
        }
    }
    counts
}

/// Highest rank appearing exactly `count` times.
fn rank_with_count(cards: &[Card], count: usize) -> Option<Rank> {
    let mut found = None;
    let mut index = 0;
    while index < cards.len() {
        let rank = cards[index].rank;
        let len = cards[index..].iter().take_while(|card| card.rank == rank).count();
        if len == count {
            found = Some(rank);
        }
        index += len;
    }
    found
}

fn top_power_of_rank(cards: &[Card], rank: Rank) -> Option<i32> {
    cards
        .iter()
        .filter(|card| card.rank == rank)
        .map(|card| card.power())
        .max()
}

fn highest_power(cards: &[Card]) -> i32 {
    cards.iter().map(|card| card.power()).max().unwrap_or(0)
}

fn straight_power(cards: &[Card]) -> i32 {
    straight_sequence(cards)
        .and_then(|sequence| top_power_of_rank(cards, straight_comparison_rank(sequence)))
        .unwrap_or_else(|| highest_power(cards))
}

/// Power of a formed group. `cards` must be the play's cards in ascending
/// order.
pub fn power(group: CardGroup, cards: &[Card]) -> i32 {
    let by_rank = |count: usize| {
        rank_with_count(cards, count)
            .and_then(|rank| top_power_of_rank(cards, rank))
            .unwrap_or_else(|| highest_power(cards))
    };

    match group {
        CardGroup::Single | CardGroup::Pair | CardGroup::ThreeOfKind | CardGroup::Flush => {
            highest_power(cards)
        }
        CardGroup::TwoPair => by_rank(2),
        CardGroup::FullHouse => by_rank(3),
        CardGroup::Straight => straight_power(cards),
        CardGroup::FourOfKind => FOUR_OF_KIND_BONUS + by_rank(4),
        CardGroup::StraightFlush => STRAIGHT_FLUSH_BONUS + straight_power(cards),
    }
}

/// Whether `candidate` may be played over `previous`.
pub fn can_suppress(candidate: &TrickInfo, previous: &TrickInfo) -> bool {
    match candidate.group {
        CardGroup::StraightFlush => {
            if previous.group != CardGroup::StraightFlush || candidate.power > previous.power {
                return true;
            }
        }
        CardGroup::FourOfKind => {
            if previous.group != CardGroup::StraightFlush
                && (previous.group != CardGroup::FourOfKind || candidate.power > previous.power)
            {
                return true;
            }
        }
        _ => {}
    }

    candidate.group == previous.group && candidate.power > previous.power
}
