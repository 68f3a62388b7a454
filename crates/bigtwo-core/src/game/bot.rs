//! Seam between the server and automated seats.

use crate::model::hand::Hand;
use crate::model::seat::Seat;
use crate::model::trick::TrickInfo;
use crate::rules::{Classification, Rules, TrickEvaluator};

/// Upper bound on proposals asked from a bot before its turn is forced.
pub const MAX_BOT_ATTEMPTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotAction {
    Pass,
    Show(Vec<usize>),
}

/// What a bot may see when asked to act.
#[derive(Debug, Clone, Copy)]
pub struct BotView<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub last_trick: Option<&'a TrickInfo>,
    pub last_shown_seat: Option<Seat>,
    pub first_lead: bool,
    pub card_counts: [usize; Seat::COUNT],
    pub rules: Rules,
}

impl BotView<'_> {
    pub fn is_leading(&self) -> bool {
        self.last_trick.is_none()
    }

    pub fn classification(&self) -> Classification {
        Classification::from_hand(self.hand)
    }

    pub fn evaluator(&self) -> TrickEvaluator {
        TrickEvaluator::new(self.rules)
    }
}

pub trait BotPolicy {
    fn think(&mut self, view: &BotView<'_>) -> BotAction;

    /// Told whether the last proposal was accepted.
    fn post_think(&mut self, _accepted: bool, _action: &BotAction) {}
}
