pub mod bot;
pub mod client;
pub mod config;
pub mod message;
pub mod server;
pub mod session;
pub mod settlement;

pub use bot::{BotAction, BotPolicy, BotView, MAX_BOT_ATTEMPTS};
pub use client::{ClientRound, LocalTable};
pub use config::TableConfig;
pub use message::{ClientCommand, MessageSink, NullSink, Outbox, Recipient, RoundSummary, ServerMessage};
pub use server::ServerRound;
pub use session::{GameSession, RoundReport};
pub use settlement::{Settlement, settle};
