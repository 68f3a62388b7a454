use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::model::trick::CardGroup;
use crate::rules::STRAIGHT_SEQUENCES;
use crate::rules::cursor::{CombinationCursor, Combinations};

/// A maximal block of equal-rank cards inside a sorted hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankRun {
    pub rank: Rank,
    pub start: usize,
    pub len: usize,
    /// Bit `suit.index()` is set for every suit present.
    pub suits: u8,
}

impl RankRun {
    pub const fn has_suit(&self, suit: Suit) -> bool {
        self.suits & suit.bit() != 0
    }

    /// Hand index of this run's card of `suit`. Runs are suit-ordered, so it
    /// sits after every lower suit present.
    pub const fn index_of_suit(&self, suit: Suit) -> usize {
        self.start + (self.suits & (suit.bit() - 1)).count_ones() as usize
    }
}

/// Five runs (by position in [`Classification::runs`]) forming one straight,
/// listed in sequence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StraightRuns {
    pub sequence: usize,
    pub runs: [usize; 5],
}

/// Grouping tables derived from a sorted hand. Rebuild whenever the hand
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    cards: Vec<Card>,
    runs: Vec<RankRun>,
    run_of_rank: [Option<usize>; 13],
    singles: Vec<usize>,
    pairs: Vec<usize>,
    triples: Vec<usize>,
    quads: Vec<usize>,
    straights: Vec<StraightRuns>,
    suit_cards: [Vec<usize>; 4],
    flush_suits: Vec<Suit>,
    straight_flushes: Vec<(usize, Suit)>,
}

impl Classification {
    pub fn build(cards: &[Card]) -> Self {
        debug_assert!(
            cards.windows(2).all(|pair| pair[0] < pair[1]),
            "classification needs sorted, duplicate-free cards"
        );

        let mut class = Classification {
            cards: cards.to_vec(),
            ..Default::default()
        };

        for (index, card) in cards.iter().enumerate() {
            class.suit_cards[card.suit.index()].push(index);
            match class.runs.last_mut() {
                Some(run) if run.rank == card.rank => {
                    run.len += 1;
                    run.suits |= card.suit.bit();
                }
                _ => {
                    class.run_of_rank[card.rank.index()] = Some(class.runs.len());
                    class.runs.push(RankRun {
                        rank: card.rank,
                        start: index,
                        len: 1,
                        suits: card.suit.bit(),
                    });
                }
            }
        }

        for (position, run) in class.runs.iter().enumerate() {
            class.singles.push(position);
            if run.len >= 2 {
                class.pairs.push(position);
            }
            if run.len >= 3 {
                class.triples.push(position);
            }
            if run.len == 4 {
                class.quads.push(position);
            }
        }

        for (sequence, ranks) in STRAIGHT_SEQUENCES.iter().enumerate() {
            let mut runs = [0usize; 5];
            let mut complete = true;
            for (slot, rank) in ranks.iter().enumerate() {
                match class.run_of_rank[rank.index()] {
                    Some(position) => runs[slot] = position,
                    None => {
                        complete = false;
                        break;
                    }
                }
            }
            if !complete {
                continue;
            }

            let occurrence = class.straights.len();
            class.straights.push(StraightRuns { sequence, runs });

            let common = runs
                .iter()
                .fold(0x0f, |mask, &position| mask & class.runs[position].suits);
            for suit in Suit::ALL {
                if common & suit.bit() != 0 {
                    class.straight_flushes.push((occurrence, suit));
                }
            }
        }

        for suit in Suit::ALL {
            if class.suit_cards[suit.index()].len() >= 5 {
                class.flush_suits.push(suit);
            }
        }

        class
    }

    pub fn from_hand(hand: &Hand) -> Self {
        Self::build(hand.cards())
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn runs(&self) -> &[RankRun] {
        &self.runs
    }

    pub fn run_for(&self, rank: Rank) -> Option<&RankRun> {
        self.run_of_rank[rank.index()].map(|position| &self.runs[position])
    }

    pub fn rank_count(&self, rank: Rank) -> usize {
        self.run_for(rank).map_or(0, |run| run.len)
    }

    /// Every run position, in rank order.
    pub fn singles(&self) -> &[usize] {
        &self.singles
    }

    pub fn pairs(&self) -> &[usize] {
        &self.pairs
    }

    pub fn triples(&self) -> &[usize] {
        &self.triples
    }

    pub fn quads(&self) -> &[usize] {
        &self.quads
    }

    pub fn straights(&self) -> &[StraightRuns] {
        &self.straights
    }

    pub fn suit_cards(&self, suit: Suit) -> &[usize] {
        &self.suit_cards[suit.index()]
    }

    pub fn flush_suits(&self) -> &[Suit] {
        &self.flush_suits
    }

    pub fn straight_flushes(&self) -> &[(usize, Suit)] {
        &self.straight_flushes
    }

    pub fn cursor(&self, group: CardGroup) -> Option<CombinationCursor<'_>> {
        CombinationCursor::start(self, group)
    }

    pub fn combinations(&self, group: CardGroup) -> Combinations<'_> {
        Combinations::new(self.cursor(group))
    }

    pub fn has_group(&self, group: CardGroup) -> bool {
        self.cursor(group).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::Classification;
    use crate::model::card::parse_cards;
    use crate::model::hand::Hand;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn classify(text: &str) -> Classification {
        Classification::from_hand(&Hand::with_cards(parse_cards(text).unwrap()))
    }

    #[test]
    fn builds_rank_runs_with_suit_masks() {
        let class = classify("3C 3D 4S 4H 4D 9C");
        let runs = class.runs();
        assert_eq!(runs.len(), 3);
        assert_eq!((runs[0].rank, runs[0].start, runs[0].len), (Rank::Three, 0, 2));
        assert_eq!((runs[1].rank, runs[1].start, runs[1].len), (Rank::Four, 2, 3));
        assert!(runs[1].has_suit(Suit::Hearts));
        assert!(!runs[1].has_suit(Suit::Clubs));
        assert_eq!(runs[1].index_of_suit(Suit::Spades), 4);
        assert_eq!(class.pairs(), &[0, 1]);
        assert_eq!(class.triples(), &[1]);
        assert!(class.quads().is_empty());
        assert_eq!(class.rank_count(Rank::Four), 3);
        assert_eq!(class.rank_count(Rank::Two), 0);
    }

    #[test]
    fn quad_counts_as_triple_and_pair() {
        let class = classify("7C 7D 7H 7S KC");
        assert_eq!(class.pairs(), &[0]);
        assert_eq!(class.triples(), &[0]);
        assert_eq!(class.quads(), &[0]);
    }

    #[test]
    fn finds_straights_including_ace_sequences() {
        let class = classify("3C 4C 5C 6D 10H JH QH KH AH 2S");
        let sequences: Vec<usize> = class.straights().iter().map(|s| s.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 9]);
        let broadway = class.straights()[2];
        assert_eq!(class.runs()[broadway.runs[4]].rank, Rank::Ace);
        assert_eq!(class.straight_flushes(), &[(2, Suit::Hearts)]);
        assert_eq!(class.flush_suits(), &[Suit::Hearts]);
    }

    #[test]
    fn no_straight_wraps_past_the_ace() {
        let class = classify("JC QD KH AS 2C");
        assert!(class.straights().is_empty());
    }

    #[test]
    fn suit_indices_follow_hand_order() {
        let class = classify("3C 5C 5D 9C KD");
        assert_eq!(class.suit_cards(Suit::Clubs), &[0, 1, 3]);
        assert_eq!(class.suit_cards(Suit::Diamonds), &[2, 4]);
        assert!(class.flush_suits().is_empty());
    }

    #[test]
    fn empty_hand_classifies_to_nothing() {
        let class = Classification::build(&[]);
        assert!(class.runs().is_empty());
        assert!(class.straights().is_empty());
    }
}
