use crate::game::message::RoundSummary;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::score::ScoreReasons;
use crate::model::seat::Seat;
use crate::model::trick::{CardGroup, TrickInfo};
use crate::rules::classify::Classification;
use crate::rules::evaluator::{FOUR_OF_KIND_BONUS, STRAIGHT_FLUSH_BONUS};

/// Result of settling one round. Indexed by seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub winner: Seat,
    pub penalties: [u32; Seat::COUNT],
    pub paid: [u32; Seat::COUNT],
    pub money: [u32; Seat::COUNT],
    pub scores: [i64; Seat::COUNT],
    pub reasons: [ScoreReasons; Seat::COUNT],
    pub remaining_cards: [usize; Seat::COUNT],
    /// Cards each seat still held when the round ended.
    pub residual_cards: [Vec<Card>; Seat::COUNT],
}

impl Settlement {
    pub fn is_game_over(&self) -> bool {
        self.money.iter().any(|&money| money == 0)
    }

    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            winner: self.winner,
            money: self.money,
            scores: self.scores,
            reasons: self.reasons,
            remaining_cards: self.remaining_cards,
            residual_cards: self.residual_cards.clone(),
            is_game_over: self.is_game_over(),
        }
    }
}

/// Card whose power the play carries.
fn comparison_card(trick: &TrickInfo) -> Option<Card> {
    let base = match trick.group {
        CardGroup::StraightFlush => trick.power - STRAIGHT_FLUSH_BONUS,
        CardGroup::FourOfKind => trick.power - FOUR_OF_KIND_BONUS,
        _ => trick.power,
    };
    trick.cards.iter().copied().find(|card| card.power() == base)
}

/// Doublings contributed by the round-ending play.
pub fn winning_play_reasons(trick: &TrickInfo) -> ScoreReasons {
    let mut reasons = ScoreReasons::NONE;
    let ends_on_two = comparison_card(trick).is_some_and(|card| card.rank == Rank::Two);
    let counts_two = matches!(
        trick.group,
        CardGroup::Single
            | CardGroup::Pair
            | CardGroup::ThreeOfKind
            | CardGroup::Straight
            | CardGroup::FullHouse
            | CardGroup::FourOfKind
            | CardGroup::StraightFlush
    );
    if ends_on_two && counts_two {
        reasons |= ScoreReasons::LAST_SHOW_TWO;
    }
    match trick.group {
        CardGroup::FourOfKind => reasons |= ScoreReasons::LAST_FOUR_OF_KIND,
        CardGroup::StraightFlush => reasons |= ScoreReasons::LAST_STRAIGHT_FLUSH,
        _ => {}
    }
    reasons
}

/// Doublings a loser's residual hand earns.
pub fn holding_reasons(hand: &Hand) -> ScoreReasons {
    let class = Classification::from_hand(hand);
    let mut reasons = ScoreReasons::holding_twos(class.rank_count(Rank::Two));
    if hand.len() >= 10 {
        reasons |= ScoreReasons::TEN_OR_MORE;
    }
    if class.has_group(CardGroup::FourOfKind) {
        reasons |= ScoreReasons::HOLD_FOUR_OF_KIND;
    }
    if class.has_group(CardGroup::StraightFlush) {
        reasons |= ScoreReasons::HOLD_STRAIGHT_FLUSH;
    }
    reasons
}

/// Charges every loser `remaining * factor`, capped at their money, and pays
/// the total collected to the winner.
pub fn settle(
    winner: Seat,
    winning_play: &TrickInfo,
    hands: &[Hand; Seat::COUNT],
    money: [u32; Seat::COUNT],
) -> Settlement {
    let play = winning_play_reasons(winning_play);
    let mut settlement = Settlement {
        winner,
        penalties: [0; Seat::COUNT],
        paid: [0; Seat::COUNT],
        money,
        scores: [0; Seat::COUNT],
        reasons: [ScoreReasons::NONE; Seat::COUNT],
        remaining_cards: hands.each_ref().map(Hand::len),
        residual_cards: hands.each_ref().map(|hand| hand.cards().to_vec()),
    };

    let mut collected: u32 = 0;
    let mut total_penalty: i64 = 0;
    for seat in Seat::LOOP {
        if seat == winner {
            continue;
        }
        let index = seat.index();
        let reasons = holding_reasons(&hands[index]) | play;
        let penalty = (hands[index].len() as u32).saturating_mul(reasons.factor());
        let paid = penalty.min(settlement.money[index]);

        settlement.reasons[index] = reasons;
        settlement.penalties[index] = penalty;
        settlement.paid[index] = paid;
        settlement.money[index] -= paid;
        settlement.scores[index] = -i64::from(penalty);
        collected = collected.saturating_add(paid);
        total_penalty += i64::from(penalty);
    }

    let winner_index = winner.index();
    settlement.reasons[winner_index] = play;
    settlement.scores[winner_index] = total_penalty;
    settlement.money[winner_index] = settlement.money[winner_index].saturating_add(collected);
    settlement
}
