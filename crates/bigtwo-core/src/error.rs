use crate::model::seat::Seat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a show or pass is refused. Every variant is recoverable and
/// leaves the round untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidPlay {
    #[error("a play of {0} cards is not allowed")]
    WrongSize(usize),
    #[error("the selected cards do not share a rank")]
    NotSameRank,
    #[error("the selected cards do not form a recognised group")]
    NoPattern,
    #[error("card index {0} is outside the hand")]
    IndexOutOfRange(usize),
    #[error("card index {0} was selected twice")]
    DuplicateIndex(usize),
    #[error("it is not this seat's turn")]
    NotYourTurn,
    #[error("the first lead of a round must include the three of clubs")]
    MustIncludeStartingCard,
    #[error("the play does not beat the previous play")]
    DoesNotSuppress,
    #[error("the leading seat cannot pass")]
    CannotPassOnLead,
    #[error("no round is in progress")]
    RoundNotActive,
}

/// A bot produced no accepted action within the attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bot at {seat} produced no legal action after {attempts} attempts")]
pub struct BotFault {
    pub seat: Seat,
    pub attempts: usize,
}
