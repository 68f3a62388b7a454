#![allow(dead_code)]

use bigtwo_core::game::bot::{BotAction, BotPolicy, BotView};
use bigtwo_core::game::server::ServerRound;
use bigtwo_core::model::seat::Seat;
use bigtwo_core::rules::Combinations;

/// Leads its lowest card and follows with the first stronger play of the
/// same group.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegal;

impl BotPolicy for FirstLegal {
    fn think(&mut self, view: &BotView<'_>) -> BotAction {
        let Some(previous) = view.last_trick else {
            return BotAction::Show(vec![0]);
        };
        let class = view.classification();
        match Combinations::above(&class, previous.group, previous.power).next() {
            Some(combo) => BotAction::Show(combo.indices),
            None => BotAction::Pass,
        }
    }
}

pub fn view_for(server: &ServerRound, seat: Seat) -> BotView<'_> {
    let state = server.state();
    BotView {
        seat,
        hand: server.hand(seat),
        last_trick: state.last_shown_trick(),
        last_shown_seat: state.last_shown_seat(),
        first_lead: state.is_first_lead(),
        card_counts: state.seats().map(|status| status.card_count),
        rules: server.config().rules,
    }
}

pub fn all_bots(server: &mut ServerRound) {
    for seat in Seat::LOOP {
        server.set_bot(seat, Box::new(FirstLegal));
    }
}
