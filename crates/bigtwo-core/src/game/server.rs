use crate::error::{BotFault, InvalidPlay};
use crate::game::bot::{BotAction, BotPolicy, BotView, MAX_BOT_ATTEMPTS};
use crate::game::config::TableConfig;
use crate::game::message::{ClientCommand, MessageSink, Recipient, ServerMessage};
use crate::game::settlement::{Settlement, settle};
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::round::{RoundEvent, RoundState};
use crate::model::seat::Seat;
use crate::model::trick::TrickInfo;
use crate::rules::TrickEvaluator;
use std::array;
use tracing::{debug, info, warn};

/// Authoritative owner of one table: every hand, the turn state and money.
/// Actions are processed one at a time and every outcome is published
/// through a [`MessageSink`].
pub struct ServerRound {
    config: TableConfig,
    evaluator: TrickEvaluator,
    state: RoundState,
    hands: [Hand; Seat::COUNT],
    discard: Vec<Card>,
    bots: [Option<Box<dyn BotPolicy>>; Seat::COUNT],
    last_settlement: Option<Settlement>,
    round_seed: Option<u64>,
    shows: usize,
    game_over: bool,
}

impl ServerRound {
    pub fn new(config: TableConfig) -> Self {
        let mut state = RoundState::new();
        for seat in Seat::LOOP {
            state.set_money(seat, config.start_money);
        }
        Self {
            config,
            evaluator: config.evaluator(),
            state,
            hands: array::from_fn(|_| Hand::new()),
            discard: Vec::new(),
            bots: array::from_fn(|_| None),
            last_settlement: None,
            round_seed: None,
            shows: 0,
            game_over: false,
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &TrickEvaluator {
        &self.evaluator
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn hands(&self) -> &[Hand; Seat::COUNT] {
        &self.hands
    }

    /// Cards shown so far this round.
    pub fn discard(&self) -> &[Card] {
        &self.discard
    }

    pub fn money(&self) -> [u32; Seat::COUNT] {
        self.state.money()
    }

    pub fn last_settlement(&self) -> Option<&Settlement> {
        self.last_settlement.as_ref()
    }

    pub fn round_seed(&self) -> Option<u64> {
        self.round_seed
    }

    /// Shows accepted in the current round.
    pub fn show_count(&self) -> usize {
        self.shows
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn set_bot(&mut self, seat: Seat, policy: Box<dyn BotPolicy>) {
        self.bots[seat.index()] = Some(policy);
    }

    pub fn clear_bot(&mut self, seat: Seat) -> Option<Box<dyn BotPolicy>> {
        self.bots[seat.index()].take()
    }

    pub fn is_bot(&self, seat: Seat) -> bool {
        self.bots[seat.index()].is_some()
    }

    pub fn start_game(&mut self, sink: &mut dyn MessageSink) {
        for seat in Seat::LOOP {
            self.state.set_money(seat, self.config.start_money);
        }
        self.game_over = false;
        self.last_settlement = None;
        info!(
            target: "bigtwo_core::round",
            start_money = self.config.start_money,
            "game started"
        );
        sink.send(
            Recipient::All,
            ServerMessage::GameInit {
                start_money: self.config.start_money,
            },
        );
    }

    /// Deals a fresh round from `seed` and lets bots act until a human seat
    /// is to move or the round ends.
    pub fn start_round(&mut self, seed: u64, sink: &mut dyn MessageSink) -> Vec<BotFault> {
        let deck = Deck::shuffled_with_seed(seed);
        self.hands = deck.deal();
        self.discard.clear();
        self.shows = 0;
        self.round_seed = Some(seed);
        self.last_settlement = None;

        let lead = Seat::LOOP
            .into_iter()
            .find(|seat| self.hands[seat.index()].contains(Card::STARTING))
            .unwrap_or(Seat::North);

        self.state.apply(&RoundEvent::RoundInit { lead });
        debug!(target: "bigtwo_core::round", seed, lead = %lead, "round dealt");

        for seat in Seat::LOOP {
            sink.send(
                Recipient::Seat(seat),
                ServerMessage::RoundInit {
                    lead_seat: lead,
                    cards: self.hands[seat.index()].cards().to_vec(),
                },
            );
        }

        self.drive_bots(sink)
    }

    pub fn proc_show(
        &mut self,
        seat: Seat,
        indices: &[usize],
        sink: &mut dyn MessageSink,
    ) -> Result<(), InvalidPlay> {
        let trick = match self.state.check_show(seat, self.hands[seat.index()].cards(), indices, &self.evaluator) {
            Ok(trick) => trick,
            Err(reason) => return Err(self.reject(seat, reason, sink)),
        };

        let removed = self.hands[seat.index()].remove_indices(indices);
        debug_assert_eq!(removed.len(), trick.len());
        self.discard.extend(removed);
        self.shows += 1;

        self.state.apply(&RoundEvent::Show {
            seat,
            trick: trick.clone(),
        });
        let remaining = self.hands[seat.index()].len();
        sink.send(Recipient::All, ServerMessage::show_result(seat, &trick, remaining));

        if remaining == 0 {
            self.finish_round(seat, &trick, sink);
        }
        Ok(())
    }

    pub fn proc_pass(&mut self, seat: Seat, sink: &mut dyn MessageSink) -> Result<(), InvalidPlay> {
        if let Err(reason) = self.state.check_pass(seat) {
            return Err(self.reject(seat, reason, sink));
        }

        self.state.apply(&RoundEvent::Pass { seat });
        sink.send(Recipient::All, ServerMessage::PassResult { seat });

        if self.state.cycle_complete() {
            let lead = self.state.last_shown_seat().unwrap_or(self.state.next_to_show());
            self.state.apply(&RoundEvent::NewCycle { lead });
            sink.send(Recipient::All, ServerMessage::NewCycle { lead_seat: lead });
        }
        Ok(())
    }

    /// Applies a command from a seat's client, then lets bots respond.
    pub fn handle_command(
        &mut self,
        seat: Seat,
        command: ClientCommand,
        sink: &mut dyn MessageSink,
    ) -> Result<Vec<BotFault>, InvalidPlay> {
        match command {
            ClientCommand::RequestShow { indices } => self.proc_show(seat, &indices, sink)?,
            ClientCommand::RequestPass => self.proc_pass(seat, sink)?,
        }
        Ok(self.drive_bots(sink))
    }

    /// Lets every bot seat act in turn until a seat without a bot is to move
    /// or the round is over. A bot that exhausts its attempts is reported and
    /// its seat passes, or leads its lowest card when it may not pass.
    pub fn drive_bots(&mut self, sink: &mut dyn MessageSink) -> Vec<BotFault> {
        let mut faults = Vec::new();

        while self.state.is_playing() {
            let seat = self.state.next_to_show();
            let Some(mut bot) = self.bots[seat.index()].take() else {
                break;
            };

            let mut accepted = false;
            for _ in 0..MAX_BOT_ATTEMPTS {
                let action = bot.think(&self.view(seat));
                let result = match &action {
                    BotAction::Pass => self.proc_pass(seat, sink),
                    BotAction::Show(indices) => self.proc_show(seat, indices, sink),
                };
                accepted = result.is_ok();
                bot.post_think(accepted, &action);
                if accepted {
                    break;
                }
            }
            self.bots[seat.index()] = Some(bot);

            if accepted {
                continue;
            }

            let fault = BotFault {
                seat,
                attempts: MAX_BOT_ATTEMPTS,
            };
            warn!(target: "bigtwo_core::bot", seat = %seat, attempts = MAX_BOT_ATTEMPTS, "{fault}");
            faults.push(fault);

            let forced = if self.state.check_pass(seat).is_ok() {
                self.proc_pass(seat, sink)
            } else {
                self.proc_show(seat, &[0], sink)
            };
            if let Err(reason) = forced {
                warn!(
                    target: "bigtwo_core::bot",
                    seat = %seat,
                    reason = %reason,
                    "forced action rejected; abandoning round"
                );
                self.abandon();
            }
        }

        faults
    }

    pub fn abandon(&mut self) {
        info!(target: "bigtwo_core::round", "round abandoned");
        self.state.abandon();
    }

    fn view(&self, seat: Seat) -> BotView<'_> {
        BotView {
            seat,
            hand: &self.hands[seat.index()],
            last_trick: self.state.last_shown_trick(),
            last_shown_seat: self.state.last_shown_seat(),
            first_lead: self.state.is_first_lead(),
            card_counts: self.state.seats().map(|status| status.card_count),
            rules: self.config.rules,
        }
    }

    fn reject(&self, seat: Seat, reason: InvalidPlay, sink: &mut dyn MessageSink) -> InvalidPlay {
        debug!(target: "bigtwo_core::round", seat = %seat, reason = %reason, "action rejected");
        sink.send(Recipient::Seat(seat), ServerMessage::ActionRejected { reason });
        reason
    }

    fn finish_round(&mut self, winner: Seat, trick: &TrickInfo, sink: &mut dyn MessageSink) {
        let settlement = settle(winner, trick, &self.hands, self.state.money());
        for seat in Seat::LOOP {
            self.state.set_money(seat, settlement.money[seat.index()]);
        }
        self.state.apply(&RoundEvent::RoundEnd);
        self.game_over = settlement.is_game_over();

        info!(
            target: "bigtwo_core::round",
            winner = %winner,
            trick = %trick,
            money = ?settlement.money,
            game_over = self.game_over,
            "round finished"
        );

        let summary = settlement.summary();
        sink.send(Recipient::All, ServerMessage::RoundEnd(summary));
        if self.game_over {
            sink.send(Recipient::All, ServerMessage::GameOver);
        }
        self.last_settlement = Some(settlement);
    }
}
