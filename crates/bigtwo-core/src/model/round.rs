use crate::error::InvalidPlay;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::seat::Seat;
use crate::model::trick::TrickInfo;
use crate::rules::evaluator::{TrickEvaluator, can_suppress};
use serde::{Deserialize, Serialize};
use std::array;
use tracing::debug;

/// Cards each seat holds after the deal.
pub const HAND_SIZE: usize = Deck::SIZE / Seat::COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    AwaitingDeal,
    Playing,
    Finished,
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatStatus {
    pub seat: Seat,
    pub money: u32,
    pub has_passed: bool,
    pub card_count: usize,
}

impl SeatStatus {
    const fn new(seat: Seat) -> Self {
        Self {
            seat,
            money: 0,
            has_passed: false,
            card_count: 0,
        }
    }
}

/// The shared mutations. Server and client both drive [`RoundState`] only
/// through these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundEvent {
    RoundInit { lead: Seat },
    Show { seat: Seat, trick: TrickInfo },
    Pass { seat: Seat },
    NewCycle { lead: Seat },
    RoundEnd,
}

/// Turn bookkeeping for one round, identical on the server and on every
/// client mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    phase: RoundPhase,
    cycle_count: u32,
    next_to_show: Seat,
    last_shown_seat: Option<Seat>,
    last_shown_trick: Option<TrickInfo>,
    consecutive_passes: usize,
    seats: [SeatStatus; Seat::COUNT],
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            phase: RoundPhase::AwaitingDeal,
            cycle_count: 0,
            next_to_show: Seat::North,
            last_shown_seat: None,
            last_shown_trick: None,
            consecutive_passes: 0,
            seats: array::from_fn(|index| SeatStatus::new(Seat::LOOP[index])),
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == RoundPhase::Playing
    }

    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    pub fn next_to_show(&self) -> Seat {
        self.next_to_show
    }

    pub fn last_shown_seat(&self) -> Option<Seat> {
        self.last_shown_seat
    }

    pub fn last_shown_trick(&self) -> Option<&TrickInfo> {
        self.last_shown_trick.as_ref()
    }

    pub fn consecutive_passes(&self) -> usize {
        self.consecutive_passes
    }

    pub fn seats(&self) -> &[SeatStatus; Seat::COUNT] {
        &self.seats
    }

    pub fn seat(&self, seat: Seat) -> &SeatStatus {
        &self.seats[seat.index()]
    }

    pub fn money(&self) -> [u32; Seat::COUNT] {
        self.seats.map(|status| status.money)
    }

    pub fn set_money(&mut self, seat: Seat, money: u32) {
        self.seats[seat.index()].money = money;
    }

    /// The seat to act owns the lead: nothing is on the table.
    pub fn is_leading(&self) -> bool {
        self.last_shown_trick.is_none()
    }

    /// The opening play of the round, which must contain the three of clubs.
    pub fn is_first_lead(&self) -> bool {
        self.cycle_count == 0 && self.last_shown_trick.is_none()
    }

    /// Every seat has passed since the last show.
    pub fn cycle_complete(&self) -> bool {
        self.consecutive_passes >= Seat::COUNT - 1
    }

    pub fn abandon(&mut self) {
        self.phase = RoundPhase::Abandoned;
    }

    fn next_active(&self, from: Seat) -> Seat {
        let mut seat = from.next();
        for _ in 0..Seat::COUNT {
            if !self.seats[seat.index()].has_passed {
                return seat;
            }
            seat = seat.next();
        }
        from.next()
    }

    fn clear_passes(&mut self) {
        for status in &mut self.seats {
            status.has_passed = false;
        }
        self.consecutive_passes = 0;
    }

    pub fn apply(&mut self, event: &RoundEvent) {
        match event {
            RoundEvent::RoundInit { lead } => {
                self.phase = RoundPhase::Playing;
                self.cycle_count = 0;
                self.next_to_show = *lead;
                self.last_shown_seat = None;
                self.last_shown_trick = None;
                self.clear_passes();
                for status in &mut self.seats {
                    status.card_count = HAND_SIZE;
                }
                debug!(target: "bigtwo_core::round", lead = %lead, "round initialised");
            }
            RoundEvent::Show { seat, trick } => {
                let status = &mut self.seats[seat.index()];
                debug_assert!(status.card_count >= trick.len(), "show exceeds card count");
                status.card_count = status.card_count.saturating_sub(trick.len());
                self.last_shown_seat = Some(*seat);
                self.last_shown_trick = Some(trick.clone());
                self.clear_passes();
                self.next_to_show = self.next_active(*seat);
                debug!(
                    target: "bigtwo_core::round",
                    seat = %seat,
                    trick = %trick,
                    next = %self.next_to_show,
                    "show applied"
                );
            }
            RoundEvent::Pass { seat } => {
                self.seats[seat.index()].has_passed = true;
                self.consecutive_passes += 1;
                self.next_to_show = self.next_active(*seat);
                debug!(
                    target: "bigtwo_core::round",
                    seat = %seat,
                    passes = self.consecutive_passes,
                    "pass applied"
                );
            }
            RoundEvent::NewCycle { lead } => {
                self.cycle_count += 1;
                self.next_to_show = *lead;
                self.last_shown_seat = None;
                self.last_shown_trick = None;
                self.clear_passes();
                debug!(target: "bigtwo_core::round", lead = %lead, cycle = self.cycle_count, "new cycle");
            }
            RoundEvent::RoundEnd => {
                self.phase = RoundPhase::Finished;
            }
        }
    }

    /// Rule check for a show, shared by server and client. Returns the formed
    /// play without touching any state.
    pub fn check_show(
        &self,
        seat: Seat,
        hand: &[Card],
        indices: &[usize],
        evaluator: &TrickEvaluator,
    ) -> Result<TrickInfo, InvalidPlay> {
        if !self.is_playing() {
            return Err(InvalidPlay::RoundNotActive);
        }
        if seat != self.next_to_show {
            return Err(InvalidPlay::NotYourTurn);
        }

        let candidate = evaluator.validate(hand, indices)?;

        if self.is_first_lead() && !candidate.contains(Card::STARTING) {
            return Err(InvalidPlay::MustIncludeStartingCard);
        }

        match &self.last_shown_trick {
            Some(previous) if !can_suppress(&candidate, previous) => Err(InvalidPlay::DoesNotSuppress),
            _ => Ok(candidate),
        }
    }

    pub fn check_pass(&self, seat: Seat) -> Result<(), InvalidPlay> {
        if !self.is_playing() {
            return Err(InvalidPlay::RoundNotActive);
        }
        if seat != self.next_to_show {
            return Err(InvalidPlay::NotYourTurn);
        }
        if self.is_leading() {
            return Err(InvalidPlay::CannotPassOnLead);
        }
        Ok(())
    }
}
