mod lowest;
mod random;

pub use lowest::LowestPlayPolicy;
pub use random::RandomPolicy;

use bigtwo_core::game::bot::{BotAction, BotView};
use bigtwo_core::model::card::Card;
use bigtwo_core::model::trick::{CardGroup, TrickInfo};
use bigtwo_core::rules::{Classification, Combination, can_suppress};
use tracing::{Level, event};

/// Every combination the seat may show right now, group by group in cursor
/// order.
pub fn legal_plays(view: &BotView<'_>) -> Vec<Combination> {
    let class = view.classification();
    let evaluator = view.evaluator();
    let mut plays = Vec::new();
    for group in CardGroup::ALL {
        if !evaluator.allows(group) {
            continue;
        }
        plays.extend(class.combinations(group).filter(|combo| playable(view, &class, combo)));
    }
    plays
}

pub(crate) fn playable(view: &BotView<'_>, class: &Classification, combo: &Combination) -> bool {
    let cards = combo.cards(class);
    if view.first_lead && !cards.contains(&Card::STARTING) {
        return false;
    }
    match view.last_trick {
        Some(previous) => {
            let candidate = TrickInfo {
                group: combo.group,
                power: combo.power,
                cards,
            };
            can_suppress(&candidate, previous)
        }
        None => true,
    }
}

pub(crate) fn log_decision(view: &BotView<'_>, policy: &'static str, action: &BotAction, options: usize) {
    if !tracing::enabled!(target: "bigtwo_bot::decision", Level::DEBUG) {
        return;
    }
    let choice = match action {
        BotAction::Pass => "pass".to_string(),
        BotAction::Show(indices) => indices
            .iter()
            .filter_map(|&index| view.hand.cards().get(index))
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(" "),
    };
    event!(
        target: "bigtwo_bot::decision",
        Level::DEBUG,
        seat = %view.seat,
        policy,
        hand_size = view.hand.len(),
        leading = view.is_leading(),
        options,
        choice = %choice
    );
}
