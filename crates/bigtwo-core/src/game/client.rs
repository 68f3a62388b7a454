use crate::error::InvalidPlay;
use crate::game::config::TableConfig;
use crate::game::message::{ClientCommand, MessageSink, Recipient, RoundSummary, ServerMessage};
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::round::{RoundEvent, RoundState};
use crate::model::seat::Seat;
use crate::model::trick::{CardGroup, TrickInfo};
use crate::rules::{Classification, Combination, TrickEvaluator, can_suppress};
use std::array;
use tracing::debug;

/// A seat's passive mirror of the table. It only changes state in response
/// to server messages; the local checks it offers are advisory.
#[derive(Debug, Clone)]
pub struct ClientRound {
    seat: Seat,
    evaluator: TrickEvaluator,
    state: RoundState,
    hand: Hand,
    last_rejection: Option<InvalidPlay>,
    last_summary: Option<RoundSummary>,
    game_over: bool,
}

impl ClientRound {
    pub fn new(seat: Seat, config: &TableConfig) -> Self {
        Self {
            seat,
            evaluator: config.evaluator(),
            state: RoundState::new(),
            hand: Hand::new(),
            last_rejection: None,
            last_summary: None,
            game_over: false,
        }
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn last_rejection(&self) -> Option<InvalidPlay> {
        self.last_rejection
    }

    pub fn last_summary(&self) -> Option<&RoundSummary> {
        self.last_summary.as_ref()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_my_turn(&self) -> bool {
        self.state.is_playing() && self.state.next_to_show() == self.seat
    }

    pub fn apply(&mut self, message: &ServerMessage) {
        match message {
            ServerMessage::GameInit { start_money } => {
                for seat in Seat::LOOP {
                    self.state.set_money(seat, *start_money);
                }
                self.game_over = false;
                self.last_summary = None;
            }
            ServerMessage::RoundInit { lead_seat, cards } => {
                self.hand = Hand::with_cards(cards.clone());
                self.last_rejection = None;
                self.state.apply(&RoundEvent::RoundInit { lead: *lead_seat });
            }
            ServerMessage::ShowResult {
                seat,
                group,
                power,
                card_count,
                cards,
            } => {
                if *seat == self.seat {
                    for card in cards {
                        let removed = self.hand.remove(*card);
                        debug_assert!(removed, "shown card {card} missing from local hand");
                    }
                    self.last_rejection = None;
                }
                let trick = TrickInfo {
                    group: *group,
                    power: *power,
                    cards: cards.clone(),
                };
                self.state.apply(&RoundEvent::Show { seat: *seat, trick });
                debug_assert_eq!(self.state.seat(*seat).card_count, *card_count);
            }
            ServerMessage::ActionRejected { reason } => {
                debug!(target: "bigtwo_core::client", seat = %self.seat, reason = %reason, "action rejected");
                self.last_rejection = Some(*reason);
            }
            ServerMessage::PassResult { seat } => {
                if *seat == self.seat {
                    self.last_rejection = None;
                }
                self.state.apply(&RoundEvent::Pass { seat: *seat });
            }
            ServerMessage::NewCycle { lead_seat } => {
                self.state.apply(&RoundEvent::NewCycle { lead: *lead_seat });
            }
            ServerMessage::RoundEnd(summary) => {
                for seat in Seat::LOOP {
                    self.state.set_money(seat, summary.money[seat.index()]);
                }
                self.state.apply(&RoundEvent::RoundEnd);
                self.last_summary = Some(summary.clone());
            }
            ServerMessage::GameOver => {
                self.game_over = true;
            }
        }
    }

    /// Local preview of whether the server would accept this show.
    pub fn can_show(&self, indices: &[usize]) -> Result<TrickInfo, InvalidPlay> {
        self.state
            .check_show(self.seat, self.hand.cards(), indices, &self.evaluator)
    }

    pub fn can_pass(&self) -> Result<(), InvalidPlay> {
        self.state.check_pass(self.seat)
    }

    pub fn request_show(&self, indices: &[usize]) -> ClientCommand {
        ClientCommand::RequestShow {
            indices: indices.to_vec(),
        }
    }

    pub fn request_pass(&self) -> ClientCommand {
        ClientCommand::RequestPass
    }

    /// Combinations of `group` in the local hand that could follow the play
    /// currently on the table, in cursor order.
    pub fn suggestions(&self, group: CardGroup) -> Vec<Combination> {
        if !self.evaluator.allows(group) {
            return Vec::new();
        }
        let class = Classification::from_hand(&self.hand);
        let first_lead = self.state.is_first_lead();
        let previous = self.state.last_shown_trick();
        class
            .combinations(group)
            .filter(|combo| {
                let cards: Vec<Card> = combo.cards(&class);
                if first_lead && !cards.contains(&Card::STARTING) {
                    return false;
                }
                match previous {
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
            })
            .collect()
    }
}

/// Four client mirrors fed directly by the server; single-process loopback.
#[derive(Debug, Clone)]
pub struct LocalTable {
    clients: [ClientRound; Seat::COUNT],
}

impl LocalTable {
    pub fn new(config: &TableConfig) -> Self {
        Self {
            clients: array::from_fn(|index| ClientRound::new(Seat::LOOP[index], config)),
        }
    }

    pub fn client(&self, seat: Seat) -> &ClientRound {
        &self.clients[seat.index()]
    }

    pub fn clients(&self) -> &[ClientRound; Seat::COUNT] {
        &self.clients
    }
}

impl MessageSink for LocalTable {
    fn send(&mut self, to: Recipient, message: ServerMessage) {
        for client in &mut self.clients {
            if to.includes(client.seat) {
                client.apply(&message);
            }
        }
    }
}
