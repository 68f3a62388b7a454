use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use bigtwo_bot::{LowestPlayPolicy, RandomPolicy};
use bigtwo_core::game::bot::BotPolicy;
use bigtwo_core::game::message::NullSink;
use bigtwo_core::game::session::{GameSession, RoundReport};
use bigtwo_core::model::seat::Seat;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{AgentConfig, AgentKind, BenchmarkConfig, ResolvedOutputs, SEATED_AGENTS};

/// Plays seeded all-bot games and streams one JSONL row per round.
pub struct SimulationRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub rounds_played: usize,
    pub games_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

impl SimulationRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.agents.len() != SEATED_AGENTS {
            return Err(RunnerError::SeatCount {
                found: config.agents.len(),
            });
        }
        let agents = config.agents.iter().map(AgentBlueprint::from_config).collect();

        Ok(Self {
            config,
            outputs,
            agents,
        })
    }

    /// Execute the simulation. Games are replayed one after another until
    /// `deals.rounds` rounds have been dealt; a game ends when someone's
    /// money runs out or it reaches `deals.max_rounds_per_game`.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.deals.seed.unwrap_or(0));
        let mut analytics = AnalyticsCollector::new(&self.config);
        let total_rounds = self.config.deals.rounds;
        let mut rounds_played = 0usize;
        let mut games_played = 0usize;
        let mut rows_written = 0usize;

        while rounds_played < total_rounds {
            let game_index = games_played;
            let game_seed = rng.next_u64();
            let mut session = self.start_session(game_index, game_seed);
            games_played += 1;

            let mut rounds_in_game = 0usize;
            while rounds_played < total_rounds
                && rounds_in_game < self.config.deals.max_rounds_per_game
                && !session.is_game_over()
            {
                let report = session.play_round(&mut NullSink);
                rounds_played += 1;
                rounds_in_game += 1;

                log_round(&self.config.run_id, game_index, &report);
                analytics.record_round(&report);
                write_round_row(
                    &mut writer,
                    &self.config,
                    game_index,
                    game_seed,
                    &report,
                )?;
                rows_written += 1;
            }

            analytics.record_game(session.server().money(), session.is_game_over());
        }

        writer.flush()?;

        let summary = analytics.finalize();
        summary.write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            rounds_played,
            games_played,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    fn start_session(&self, game_index: usize, game_seed: u64) -> GameSession {
        let mut session = GameSession::with_seed(self.config.table, game_seed);
        for (seat, agent) in Seat::LOOP.into_iter().zip(&self.agents) {
            let policy = agent.spawn_policy(game_index, game_seed, seat);
            session.server_mut().set_bot(seat, policy);
        }
        session
    }
}

struct AgentBlueprint {
    kind: AgentKind,
    seed: Option<u64>,
}

impl AgentBlueprint {
    fn from_config(config: &AgentConfig) -> Self {
        Self {
            kind: config.kind,
            seed: config.seed(),
        }
    }

    /// Random agents without an explicit seed draw theirs from the game
    /// seed, so a run is fixed by `deals.seed` alone.
    fn spawn_policy(&self, game_index: usize, game_seed: u64, seat: Seat) -> Box<dyn BotPolicy> {
        match self.kind {
            AgentKind::Lowest => Box::new(LowestPlayPolicy::new()),
            AgentKind::Random => {
                let seed = match self.seed {
                    Some(seed) => seed.wrapping_add(game_index as u64),
                    None => game_seed.rotate_left(8 * seat.index() as u32 + 1),
                };
                Box::new(RandomPolicy::new(seed))
            }
        }
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn log_round(run_id: &str, game_index: usize, report: &RoundReport) {
    match report.summary.as_ref() {
        Some(summary) => event!(
            target: "bigtwo_bench::round",
            Level::INFO,
            run_id = %run_id,
            game_index = game_index as u32,
            round = report.round_number,
            winner = summary.winner.label(),
            shows = report.shows as u32,
            faults = report.faults.len() as u32,
            game_over = summary.is_game_over,
        ),
        None => event!(
            target: "bigtwo_bench::round",
            Level::WARN,
            run_id = %run_id,
            game_index = game_index as u32,
            round = report.round_number,
            shows = report.shows as u32,
            faults = report.faults.len() as u32,
            "round abandoned"
        ),
    }
}

fn write_round_row(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    game_index: usize,
    game_seed: u64,
    report: &RoundReport,
) -> Result<(), RunnerError> {
    let summary = report.summary.as_ref();
    let seats = Seat::LOOP
        .into_iter()
        .zip(&config.agents)
        .map(|(seat, agent)| {
            let index = seat.index();
            SeatRow {
                seat: seat.label(),
                bot: agent.name.clone(),
                score: summary.map_or(0, |s| s.scores[index]),
                money: summary.map(|s| s.money[index]),
                cards_left: summary.map(|s| s.remaining_cards[index]),
                factor: summary.map_or(1, |s| s.reasons[index].factor()),
                reasons: summary.map(|s| s.reasons[index].to_string()),
            }
        })
        .collect();

    let row = RoundLogRow {
        run_id: config.run_id.clone(),
        round_id: format!("G{game_index:04}_R{:03}", report.round_number),
        game_index,
        game_seed,
        round_number: report.round_number,
        deal_seed: report.deal_seed,
        winner: summary.map(|s| s.winner.label()),
        shows: report.shows,
        faults: report.faults.iter().map(|fault| fault.seat.label()).collect(),
        game_over: summary.is_some_and(|s| s.is_game_over),
        seats,
    };

    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[derive(Serialize)]
struct SeatRow {
    seat: &'static str,
    bot: String,
    score: i64,
    money: Option<u32>,
    cards_left: Option<usize>,
    factor: u32,
    reasons: Option<String>,
}

#[derive(Serialize)]
struct RoundLogRow {
    run_id: String,
    round_id: String,
    game_index: usize,
    game_seed: u64,
    round_number: u32,
    deal_seed: u64,
    winner: Option<&'static str>,
    shows: usize,
    faults: Vec<&'static str>,
    game_over: bool,
    seats: Vec<SeatRow>,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("configuration requires exactly 4 agents but found {found}")]
    SeatCount { found: usize },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

#[cfg(test)]
mod tests {
    use super::{RunnerError, SimulationRunner};
    use crate::config::BenchmarkConfig;
    use std::fs;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path, rounds: usize, start_money: u32) -> BenchmarkConfig {
        let yaml = format!(
            r#"
run_id: "runner"
deals:
  seed: 99
  rounds: {rounds}
  max_rounds_per_game: 3
table:
  start_money: {start_money}
agents:
  - {{ name: "north", kind: "lowest" }}
  - {{ name: "east", kind: "random" }}
  - {{ name: "south", kind: "lowest" }}
  - {{ name: "west", kind: "random", params: {{ seed: 11 }} }}
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
"#,
            jsonl = dir.join("rounds.jsonl").display(),
            summary = dir.join("summary.md").display(),
        );
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
        cfg.validate().expect("config validates");
        cfg
    }

    #[test]
    fn games_roll_over_at_the_round_cap() {
        let dir = tempdir().expect("temp dir");
        let cfg = config(dir.path(), 7, 500);
        let outputs = cfg.resolved_outputs();
        let summary = SimulationRunner::new(cfg, outputs)
            .expect("runner")
            .run()
            .expect("run completes");

        assert_eq!(summary.rounds_played, 7);
        assert_eq!(summary.rows_written, 7);
        assert!(summary.games_played >= 3);

        let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
        let rows: Vec<serde_json::Value> = jsonl
            .lines()
            .map(|line| serde_json::from_str(line).expect("row decodes"))
            .collect();
        assert_eq!(rows.len(), 7);
        for row in &rows {
            assert!(row["round_number"].as_u64().expect("round number") <= 3);
            assert_eq!(row["seats"].as_array().expect("seats").len(), 4);
        }
        assert!(fs::read_to_string(&summary.summary_path)
            .expect("summary readable")
            .contains("| west | west |"));
    }

    #[test]
    fn scores_balance_on_every_settled_round() {
        let dir = tempdir().expect("temp dir");
        let cfg = config(dir.path(), 5, 500);
        let outputs = cfg.resolved_outputs();
        let summary = SimulationRunner::new(cfg, outputs)
            .expect("runner")
            .run()
            .expect("run completes");

        let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
        for line in jsonl.lines() {
            let row: serde_json::Value = serde_json::from_str(line).expect("row decodes");
            if row["winner"].is_null() {
                continue;
            }
            let seats = row["seats"].as_array().expect("seats");
            let winner_score: i64 = seats
                .iter()
                .filter(|seat| seat["seat"] == row["winner"])
                .map(|seat| seat["score"].as_i64().expect("score"))
                .sum();
            let loser_scores: i64 = seats
                .iter()
                .filter(|seat| seat["seat"] != row["winner"])
                .map(|seat| seat["score"].as_i64().expect("score"))
                .sum();
            assert_eq!(winner_score, -loser_scores);
        }
    }

    #[test]
    fn one_coin_tables_end_every_game_after_a_round() {
        let dir = tempdir().expect("temp dir");
        let cfg = config(dir.path(), 4, 1);
        let outputs = cfg.resolved_outputs();
        let summary = SimulationRunner::new(cfg, outputs)
            .expect("runner")
            .run()
            .expect("run completes");
        assert_eq!(summary.games_played, 4);
    }

    #[test]
    fn rejects_short_tables() {
        let dir = tempdir().expect("temp dir");
        let mut cfg = config(dir.path(), 1, 500);
        cfg.agents.pop();
        let outputs = cfg.resolved_outputs();
        assert!(matches!(
            SimulationRunner::new(cfg, outputs),
            Err(RunnerError::SeatCount { found: 3 })
        ));
    }
}
