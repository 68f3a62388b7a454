//! Lazy enumeration of every playable combination of one group in a hand.
//!
//! A cursor is a small `Copy` value: the borrowed classification plus a
//! per-shape position. Advancing never allocates; only [`materialize`]
//! builds the index list.
//!
//! [`materialize`]: CombinationCursor::materialize

use crate::model::card::Card;
use crate::model::trick::CardGroup;
use crate::rules::classify::{Classification, RankRun, StraightRuns};
use crate::rules::evaluator::power;
use crate::rules::straight_sequence;

/// One enumerated play: sorted hand indices and the power the evaluator
/// would give those cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub group: CardGroup,
    pub indices: Vec<usize>,
    pub power: i32,
}

impl Combination {
    pub fn cards(&self, class: &Classification) -> Vec<Card> {
        self.indices.iter().map(|&index| class.cards()[index]).collect()
    }
}

/// Position inside one of the classification's run lists. `slot` indexes
/// the list for the face size, `combo` holds the chosen offsets inside the
/// run in lexicographic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Face {
    slot: usize,
    combo: [u8; 4],
}

fn face_list(class: &Classification, size: usize) -> &[usize] {
    match size {
        1 => class.singles(),
        2 => class.pairs(),
        3 => class.triples(),
        _ => class.quads(),
    }
}

const fn first_combo<const N: usize>(size: usize) -> [u8; N] {
    let mut combo = [0u8; N];
    let mut i = 0;
    while i < size {
        combo[i] = i as u8;
        i += 1;
    }
    combo
}

/// Steps `combo` to the next k-subset of `0..n` in lexicographic order.
/// Returns false once the last subset has been passed.
fn next_combination(combo: &mut [u8], n: usize) -> bool {
    let k = combo.len();
    if k > n {
        return false;
    }
    for i in (0..k).rev() {
        if (combo[i] as usize) < n - k + i {
            combo[i] += 1;
            for j in i + 1..k {
                combo[j] = combo[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

impl Face {
    fn first(class: &Classification, size: usize, from_slot: usize, skip: &[usize]) -> Option<Face> {
        let list = face_list(class, size);
        (from_slot..list.len())
            .find(|&slot| !skip.contains(&list[slot]))
            .map(|slot| Face {
                slot,
                combo: first_combo(size),
            })
    }

    fn next(self, class: &Classification, size: usize, skip: &[usize]) -> Option<Face> {
        let run = self.run(class, size);
        let mut combo = self.combo;
        if next_combination(&mut combo[..size], run.len) {
            return Some(Face {
                slot: self.slot,
                combo,
            });
        }
        Face::first(class, size, self.slot + 1, skip)
    }

    fn run_position(&self, class: &Classification, size: usize) -> usize {
        face_list(class, size)[self.slot]
    }

    fn run(&self, class: &Classification, size: usize) -> RankRun {
        class.runs()[self.run_position(class, size)]
    }

    fn push_indices(&self, class: &Classification, size: usize, out: &mut Vec<usize>) {
        let run = self.run(class, size);
        out.extend(self.combo[..size].iter().map(|&offset| run.start + offset as usize));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    /// Single, Pair, ThreeOfKind.
    Face(Face),
    TwoPair { low: Face, high: Face, kicker: Face },
    /// FullHouse (triple + pair) and FourOfKind (quad + kicker).
    Paired { major: Face, minor: Face },
    Straight { occurrence: usize, picks: [u8; 5] },
    Flush { slot: usize, combo: [u8; 5] },
    StraightFlush { slot: usize },
}

const fn face_size(group: CardGroup) -> usize {
    match group {
        CardGroup::Pair => 2,
        CardGroup::ThreeOfKind => 3,
        _ => 1,
    }
}

/// `(major, minor)` face sizes for the paired shapes.
const fn paired_sizes(group: CardGroup) -> (usize, usize) {
    match group {
        CardGroup::FourOfKind => (4, 1),
        _ => (3, 2),
    }
}

fn two_pair_search(class: &Classification, mut low: Face, mut high: Option<Face>) -> Option<CursorState> {
    loop {
        while let Some(candidate) = high {
            let skip = [low.run_position(class, 2), candidate.run_position(class, 2)];
            if let Some(kicker) = Face::first(class, 1, 0, &skip) {
                return Some(CursorState::TwoPair {
                    low,
                    high: candidate,
                    kicker,
                });
            }
            high = candidate.next(class, 2, &[]);
        }
        low = low.next(class, 2, &[])?;
        high = Face::first(class, 2, low.slot + 1, &[]);
    }
}

fn paired_search(class: &Classification, group: CardGroup, mut major: Face) -> Option<CursorState> {
    let (major_size, minor_size) = paired_sizes(group);
    loop {
        let skip = [major.run_position(class, major_size)];
        if let Some(minor) = Face::first(class, minor_size, 0, &skip) {
            return Some(CursorState::Paired { major, minor });
        }
        major = major.next(class, major_size, &[])?;
    }
}

fn is_monochrome(class: &Classification, straight: &StraightRuns, picks: &[u8; 5]) -> bool {
    let suit_at = |i: usize| {
        let run = class.runs()[straight.runs[i]];
        class.cards()[run.start + picks[i] as usize].suit
    };
    let suit = suit_at(0);
    (1..5).all(|i| suit_at(i) == suit)
}

/// Odometer step over the card chosen from each run, rightmost fastest.
fn step_picks(class: &Classification, straight: &StraightRuns, picks: &mut [u8; 5]) -> bool {
    for i in (0..5).rev() {
        let len = class.runs()[straight.runs[i]].len;
        if (picks[i] as usize) + 1 < len {
            picks[i] += 1;
            return true;
        }
        picks[i] = 0;
    }
    false
}

fn straight_search(class: &Classification, mut occurrence: usize, mut picks: [u8; 5]) -> Option<CursorState> {
    loop {
        let straight = class.straights().get(occurrence)?;
        if !is_monochrome(class, straight, &picks) {
            return Some(CursorState::Straight { occurrence, picks });
        }
        if !step_picks(class, straight, &mut picks) {
            occurrence += 1;
            picks = [0; 5];
        }
    }
}

fn forms_straight(class: &Classification, members: &[usize], combo: &[u8; 5]) -> bool {
    let cards = combo.map(|offset| class.cards()[members[offset as usize]]);
    straight_sequence(&cards).is_some()
}

fn flush_search(class: &Classification, mut slot: usize, mut combo: [u8; 5]) -> Option<CursorState> {
    loop {
        let suit = *class.flush_suits().get(slot)?;
        let members = class.suit_cards(suit);
        if !forms_straight(class, members, &combo) {
            return Some(CursorState::Flush { slot, combo });
        }
        if !next_combination(&mut combo, members.len()) {
            slot += 1;
            combo = first_combo(5);
        }
    }
}

/// Position of one combination of `group` inside a classified hand.
#[derive(Debug, Clone, Copy)]
pub struct CombinationCursor<'a> {
    class: &'a Classification,
    group: CardGroup,
    state: CursorState,
}

impl<'a> CombinationCursor<'a> {
    /// First combination of `group` in canonical order, or `None` when the
    /// hand holds none.
    pub fn start(class: &'a Classification, group: CardGroup) -> Option<Self> {
        let state = match group {
            CardGroup::Single | CardGroup::Pair | CardGroup::ThreeOfKind => {
                CursorState::Face(Face::first(class, face_size(group), 0, &[])?)
            }
            CardGroup::TwoPair => {
                let low = Face::first(class, 2, 0, &[])?;
                two_pair_search(class, low, Face::first(class, 2, low.slot + 1, &[]))?
            }
            CardGroup::FullHouse | CardGroup::FourOfKind => {
                let major = Face::first(class, paired_sizes(group).0, 0, &[])?;
                paired_search(class, group, major)?
            }
            CardGroup::Straight => straight_search(class, 0, [0; 5])?,
            CardGroup::Flush => flush_search(class, 0, first_combo(5))?,
            CardGroup::StraightFlush => {
                if class.straight_flushes().is_empty() {
                    return None;
                }
                CursorState::StraightFlush { slot: 0 }
            }
        };
        Some(Self { class, group, state })
    }

    /// The next combination after this one, or `None` when exhausted.
    pub fn advance(self) -> Option<Self> {
        let class = self.class;
        let state = match self.state {
            CursorState::Face(face) => CursorState::Face(face.next(class, face_size(self.group), &[])?),
            CursorState::TwoPair { low, high, kicker } => {
                let skip = [low.run_position(class, 2), high.run_position(class, 2)];
                match kicker.next(class, 1, &skip) {
                    Some(kicker) => CursorState::TwoPair { low, high, kicker },
                    None => two_pair_search(class, low, high.next(class, 2, &[]))?,
                }
            }
            CursorState::Paired { major, minor } => {
                let (major_size, minor_size) = paired_sizes(self.group);
                let skip = [major.run_position(class, major_size)];
                match minor.next(class, minor_size, &skip) {
                    Some(minor) => CursorState::Paired { major, minor },
                    None => paired_search(class, self.group, major.next(class, major_size, &[])?)?,
                }
            }
            CursorState::Straight { occurrence, mut picks } => {
                let straight = &class.straights()[occurrence];
                if step_picks(class, straight, &mut picks) {
                    straight_search(class, occurrence, picks)?
                } else {
                    straight_search(class, occurrence + 1, [0; 5])?
                }
            }
            CursorState::Flush { slot, mut combo } => {
                let members = class.suit_cards(class.flush_suits()[slot]).len();
                if next_combination(&mut combo, members) {
                    flush_search(class, slot, combo)?
                } else {
                    flush_search(class, slot + 1, first_combo(5))?
                }
            }
            CursorState::StraightFlush { slot } => {
                if slot + 1 >= class.straight_flushes().len() {
                    return None;
                }
                CursorState::StraightFlush { slot: slot + 1 }
            }
        };
        Some(Self { state, ..self })
    }

    /// First combination whose power exceeds `threshold`.
    pub fn start_above(class: &'a Classification, group: CardGroup, threshold: i32) -> Option<Self> {
        Self::start(class, group)?.skip_to_above(threshold)
    }

    /// Next combination after this one whose power exceeds `threshold`.
    pub fn advance_above(self, threshold: i32) -> Option<Self> {
        self.advance()?.skip_to_above(threshold)
    }

    fn skip_to_above(self, threshold: i32) -> Option<Self> {
        let mut cursor = self;
        while cursor.power() <= threshold {
            cursor = cursor.advance()?;
        }
        Some(cursor)
    }

    pub fn group(&self) -> CardGroup {
        self.group
    }

    pub fn classification(&self) -> &'a Classification {
        self.class
    }

    /// Hand indices of the current combination, ascending.
    pub fn indices(&self) -> Vec<usize> {
        let class = self.class;
        let mut out = Vec::with_capacity(self.group.size());
        match self.state {
            CursorState::Face(face) => face.push_indices(class, face_size(self.group), &mut out),
            CursorState::TwoPair { low, high, kicker } => {
                low.push_indices(class, 2, &mut out);
                high.push_indices(class, 2, &mut out);
                kicker.push_indices(class, 1, &mut out);
            }
            CursorState::Paired { major, minor } => {
                let (major_size, minor_size) = paired_sizes(self.group);
                major.push_indices(class, major_size, &mut out);
                minor.push_indices(class, minor_size, &mut out);
            }
            CursorState::Straight { occurrence, picks } => {
                let straight = &class.straights()[occurrence];
                for (position, pick) in straight.runs.iter().zip(picks) {
                    out.push(class.runs()[*position].start + pick as usize);
                }
            }
            CursorState::Flush { slot, combo } => {
                let members = class.suit_cards(class.flush_suits()[slot]);
                out.extend(combo.iter().map(|&offset| members[offset as usize]));
            }
            CursorState::StraightFlush { slot } => {
                let (occurrence, suit) = class.straight_flushes()[slot];
                let straight = &class.straights()[occurrence];
                for position in straight.runs {
                    out.push(class.runs()[position].index_of_suit(suit));
                }
            }
        }
        out.sort_unstable();
        out
    }

    pub fn cards(&self) -> Vec<Card> {
        self.indices().into_iter().map(|index| self.class.cards()[index]).collect()
    }

    pub fn power(&self) -> i32 {
        power(self.group, &self.cards())
    }

    pub fn materialize(&self) -> Combination {
        let indices = self.indices();
        let cards: Vec<Card> = indices.iter().map(|&index| self.class.cards()[index]).collect();
        Combination {
            group: self.group,
            power: power(self.group, &cards),
            indices,
        }
    }
}

/// Iterator adapter over a cursor chain.
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    cursor: Option<CombinationCursor<'a>>,
}

impl<'a> Combinations<'a> {
    pub fn new(cursor: Option<CombinationCursor<'a>>) -> Self {
        Self { cursor }
    }

    /// Combinations of `group` stronger than `threshold`.
    pub fn above(class: &'a Classification, group: CardGroup, threshold: i32) -> Self {
        Self::new(CombinationCursor::start_above(class, group, threshold))
    }
}

impl Iterator for Combinations<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        let current = self.cursor.take()?;
        self.cursor = current.advance();
        Some(current.materialize())
    }
}

#[cfg(test)]
mod tests {
    use super::{CombinationCursor, Combinations, next_combination};
    use crate::model::card::{Card, parse_cards};
    use crate::model::hand::Hand;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::trick::CardGroup;
    use crate::rules::classify::Classification;
    use std::collections::HashSet;

    fn classify(text: &str) -> Classification {
        Classification::from_hand(&Hand::with_cards(parse_cards(text).unwrap()))
    }

    fn all(class: &Classification, group: CardGroup) -> Vec<Vec<usize>> {
        class.combinations(group).map(|combo| combo.indices).collect()
    }

    #[test]
    fn next_combination_walks_lexicographically() {
        let mut combo = [0u8, 1];
        let mut seen = vec![combo];
        while next_combination(&mut combo, 4) {
            seen.push(combo);
        }
        assert_eq!(seen, vec![[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]]);
    }

    #[test]
    fn singles_follow_hand_order() {
        let class = classify("3C 3D 4H 2S");
        assert_eq!(all(&class, CardGroup::Single), vec![vec![0], vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn pairs_enumerate_subsets_inside_each_run() {
        let class = classify("3C 3D 3H 5S 9C 9D");
        assert_eq!(
            all(&class, CardGroup::Pair),
            vec![vec![0, 1], vec![0, 2], vec![1, 2], vec![4, 5]]
        );
        assert_eq!(all(&class, CardGroup::ThreeOfKind), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn full_house_reenters_pair_list_for_each_triple() {
        // Triples of threes and fours; each triple pairs with the other run.
        let class = classify("3C 3D 3H 4C 4D 4H");
        let houses = all(&class, CardGroup::FullHouse);
        assert_eq!(houses.len(), 6);
        assert_eq!(houses[0], vec![0, 1, 2, 3, 4]);
        assert_eq!(houses[5], vec![1, 2, 3, 4, 5]);
        for house in &houses {
            let cards: Vec<Card> = house.iter().map(|&i| class.cards()[i]).collect();
            let threes = cards.iter().filter(|card| card.rank == Rank::Three).count();
            assert!(threes == 2 || threes == 3, "{cards:?}");
        }
        let unique: HashSet<_> = houses.iter().collect();
        assert_eq!(unique.len(), houses.len());
    }

    #[test]
    fn full_house_skips_triple_without_partner() {
        let class = classify("3C 5C 5D 5H 9S");
        assert!(!class.has_group(CardGroup::FullHouse));
        let class = classify("3C 3D 4C 4D 4H 9C 9D");
        assert_eq!(
            all(&class, CardGroup::FullHouse),
            vec![vec![0, 1, 2, 3, 4], vec![2, 3, 4, 5, 6]]
        );
    }

    #[test]
    fn four_of_a_kind_needs_a_kicker() {
        let lonely = classify("5C 5D 5H 5S");
        assert!(!lonely.has_group(CardGroup::FourOfKind));
        let class = classify("3C 5C 5D 5H 5S 9D");
        assert_eq!(
            all(&class, CardGroup::FourOfKind),
            vec![vec![0, 1, 2, 3, 4], vec![1, 2, 3, 4, 5]]
        );
    }

    #[test]
    fn two_pair_uses_a_kicker_from_a_third_rank() {
        let class = classify("3C 3D 4C 4D 9S 9H");
        let hands = all(&class, CardGroup::TwoPair);
        assert_eq!(hands.len(), 6);
        assert_eq!(hands[0], vec![0, 1, 2, 3, 4]);
        let exact = classify("3C 3D 4C 4D");
        assert!(!exact.has_group(CardGroup::TwoPair));
    }

    #[test]
    fn straights_skip_monochrome_picks() {
        let class = classify("3C 3D 4C 5C 6C 7C");
        assert_eq!(all(&class, CardGroup::Straight), vec![vec![1, 2, 3, 4, 5]]);
        assert_eq!(all(&class, CardGroup::StraightFlush), vec![vec![0, 2, 3, 4, 5]]);
    }

    #[test]
    fn straight_odometer_covers_every_pick() {
        let class = classify("3C 3D 4C 4D 5H 6H 7S");
        assert_eq!(all(&class, CardGroup::Straight).len(), 4);
    }

    #[test]
    fn flushes_skip_straight_sequences() {
        let class = classify("3H 4H 5H 6H 7H 9H");
        let flushes = all(&class, CardGroup::Flush);
        assert_eq!(flushes.len(), 5);
        assert!(!flushes.contains(&vec![0, 1, 2, 3, 4]));
        assert_eq!(all(&class, CardGroup::StraightFlush).len(), 1);
    }

    #[test]
    fn start_above_skips_weaker_combinations() {
        let class = classify("3C 5D 9H 2S");
        let threshold = Card::new(Rank::Nine, Suit::Hearts).power();
        let cursor = CombinationCursor::start_above(&class, CardGroup::Single, threshold).unwrap();
        assert_eq!(cursor.indices(), vec![3]);
        assert!(cursor.advance_above(threshold).is_none());
        assert!(CombinationCursor::start_above(&class, CardGroup::Single, 1_000).is_none());
    }

    #[test]
    fn materialized_power_is_non_decreasing_for_singles() {
        let class = classify("3C 4D 7H 10S KC 2D");
        let powers: Vec<i32> = Combinations::new(class.cursor(CardGroup::Single))
            .map(|combo| combo.power)
            .collect();
        assert!(powers.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn empty_hand_has_no_combinations() {
        let class = Classification::build(&[]);
        for group in CardGroup::ALL {
            assert!(class.cursor(group).is_none(), "{group}");
        }
    }
}
