use crate::error::BotFault;
use crate::game::config::TableConfig;
use crate::game::message::{MessageSink, RoundSummary};
use crate::game::server::ServerRound;
use crate::game::settlement::Settlement;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Report for one round played through a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub round_number: u32,
    pub deal_seed: u64,
    pub summary: Option<RoundSummary>,
    pub shows: usize,
    pub faults: Vec<BotFault>,
}

/// A match of consecutive rounds on one table. A single seed fixes every
/// deal, so a session replays identically.
pub struct GameSession {
    server: ServerRound,
    rng: StdRng,
    seed: u64,
    round_number: u32,
    started: bool,
}

impl GameSession {
    pub fn new(config: TableConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    pub fn with_seed(config: TableConfig, seed: u64) -> Self {
        Self {
            server: ServerRound::new(config),
            rng: StdRng::seed_from_u64(seed),
            seed,
            round_number: 0,
            started: false,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn server(&self) -> &ServerRound {
        &self.server
    }

    pub fn server_mut(&mut self) -> &mut ServerRound {
        &mut self.server
    }

    pub fn is_game_over(&self) -> bool {
        self.server.is_game_over()
    }

    /// Deals the next round. With bots in every seat the round is played to
    /// completion before this returns; otherwise the summary is `None` and
    /// the caller drives the remaining seats through the server.
    pub fn play_round(&mut self, sink: &mut dyn MessageSink) -> RoundReport {
        if !self.started {
            self.server.start_game(sink);
            self.started = true;
        }

        self.round_number += 1;
        let deal_seed: u64 = self.rng.r#gen();
        let faults = self.server.start_round(deal_seed, sink);

        let summary = if self.server.state().is_playing() {
            None
        } else {
            self.server.last_settlement().map(Settlement::summary)
        };

        RoundReport {
            round_number: self.round_number,
            deal_seed,
            summary,
            shows: self.server.show_count(),
            faults,
        }
    }
}
