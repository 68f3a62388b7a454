//! Wire messages between the authoritative server and the seat mirrors.

use crate::error::InvalidPlay;
use crate::model::card::Card;
use crate::model::score::ScoreReasons;
use crate::model::seat::Seat;
use crate::model::trick::{CardGroup, TrickInfo};
use serde::{Deserialize, Serialize};

/// Outcome of one round, as broadcast at its end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub winner: Seat,
    /// Money after settlement.
    pub money: [u32; Seat::COUNT],
    /// Winner positive, losers negative.
    pub scores: [i64; Seat::COUNT],
    pub reasons: [ScoreReasons; Seat::COUNT],
    pub remaining_cards: [usize; Seat::COUNT],
    /// Every seat's leftover cards, revealed at round end.
    pub residual_cards: [Vec<Card>; Seat::COUNT],
    pub is_game_over: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerMessage {
    GameInit {
        start_money: u32,
    },
    /// Private to one seat: carries that seat's hand.
    RoundInit {
        lead_seat: Seat,
        cards: Vec<Card>,
    },
    ShowResult {
        seat: Seat,
        group: CardGroup,
        power: i32,
        /// Cards the seat holds after the show.
        card_count: usize,
        cards: Vec<Card>,
    },
    /// Private to the acting seat: a show or pass was refused.
    ActionRejected {
        reason: InvalidPlay,
    },
    PassResult {
        seat: Seat,
    },
    NewCycle {
        lead_seat: Seat,
    },
    RoundEnd(RoundSummary),
    GameOver,
}

impl ServerMessage {
    pub fn show_result(seat: Seat, trick: &TrickInfo, card_count: usize) -> Self {
        ServerMessage::ShowResult {
            seat,
            group: trick.group,
            power: trick.power,
            card_count,
            cards: trick.cards.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientCommand {
    RequestShow { indices: Vec<usize> },
    RequestPass,
}

impl ClientCommand {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    Seat(Seat),
    All,
}

impl Recipient {
    pub fn includes(self, seat: Seat) -> bool {
        match self {
            Recipient::Seat(target) => target == seat,
            Recipient::All => true,
        }
    }
}

/// Where the server delivers its messages. Delivery must preserve order.
pub trait MessageSink {
    fn send(&mut self, to: Recipient, message: ServerMessage);
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn send(&mut self, _to: Recipient, _message: ServerMessage) {}
}

/// Recording sink.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    messages: Vec<(Recipient, ServerMessage)>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[(Recipient, ServerMessage)] {
        &self.messages
    }

    /// Messages a given seat receives, in delivery order.
    pub fn for_seat(&self, seat: Seat) -> impl Iterator<Item = &ServerMessage> + '_ {
        self.messages
            .iter()
            .filter(move |(to, _)| to.includes(seat))
            .map(|(_, message)| message)
    }

    pub fn drain(&mut self) -> Vec<(Recipient, ServerMessage)> {
        std::mem::take(&mut self.messages)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MessageSink for Outbox {
    fn send(&mut self, to: Recipient, message: ServerMessage) {
        self.messages.push((to, message));
    }
}
