use std::fs;
use std::path::Path;

use bigtwo_core::game::session::RoundReport;
use bigtwo_core::model::seat::Seat;
use thiserror::Error;

use crate::config::{AgentKind, BenchmarkConfig};

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Folds round reports into per-agent totals. Agents keep their seat for
/// the whole run, so seat index and agent index coincide.
pub struct AnalyticsCollector {
    run_id: String,
    agents: Vec<AgentAccumulator>,
    games: usize,
    games_finished: usize,
    rounds: usize,
    abandoned: usize,
    longest_round: usize,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Self {
        Self {
            run_id: config.run_id.clone(),
            agents: config
                .agents
                .iter()
                .map(|agent| AgentAccumulator::new(agent.name.clone(), agent.kind))
                .collect(),
            games: 0,
            games_finished: 0,
            rounds: 0,
            abandoned: 0,
            longest_round: 0,
        }
    }

    pub fn record_round(&mut self, report: &RoundReport) {
        self.rounds += 1;
        self.longest_round = self.longest_round.max(report.shows);
        for fault in &report.faults {
            if let Some(agent) = self.agents.get_mut(fault.seat.index()) {
                agent.faults += 1;
            }
        }

        let Some(summary) = report.summary.as_ref() else {
            self.abandoned += 1;
            return;
        };

        for seat in Seat::LOOP {
            let Some(agent) = self.agents.get_mut(seat.index()) else {
                continue;
            };
            let index = seat.index();
            agent.rounds += 1;
            agent.total_score += summary.scores[index];
            agent.cards_left += summary.remaining_cards[index];
            if seat == summary.winner {
                agent.wins += 1;
            } else {
                agent.best_factor = agent.best_factor.max(summary.reasons[index].factor());
            }
        }
    }

    /// Closes a game with the table's money at that point.
    pub fn record_game(&mut self, money: [u32; Seat::COUNT], finished: bool) {
        self.games += 1;
        if finished {
            self.games_finished += 1;
        }
        for (agent, money) in self.agents.iter_mut().zip(money) {
            agent.final_money += u64::from(money);
            if finished && money == 0 {
                agent.busts += 1;
            }
        }
    }

    pub fn finalize(self) -> AnalyticsSummary {
        AnalyticsSummary {
            run_id: self.run_id,
            games: self.games,
            games_finished: self.games_finished,
            rounds: self.rounds,
            abandoned: self.abandoned,
            longest_round: self.longest_round,
            agents: self
                .agents
                .into_iter()
                .map(|agent| agent.into_report(self.games))
                .collect(),
        }
    }
}

struct AgentAccumulator {
    name: String,
    kind: AgentKind,
    rounds: usize,
    wins: usize,
    total_score: i64,
    cards_left: usize,
    best_factor: u32,
    faults: usize,
    busts: usize,
    final_money: u64,
}

impl AgentAccumulator {
    fn new(name: String, kind: AgentKind) -> Self {
        Self {
            name,
            kind,
            rounds: 0,
            wins: 0,
            total_score: 0,
            cards_left: 0,
            best_factor: 1,
            faults: 0,
            busts: 0,
            final_money: 0,
        }
    }

    fn into_report(self, games: usize) -> AgentReport {
        let rounds = self.rounds.max(1) as f64;
        let losses = self.rounds.saturating_sub(self.wins).max(1) as f64;
        AgentReport {
            name: self.name,
            kind: self.kind,
            rounds: self.rounds,
            wins: self.wins,
            win_rate: self.wins as f64 / rounds,
            avg_score: self.total_score as f64 / rounds,
            avg_cards_left: self.cards_left as f64 / losses,
            best_factor: self.best_factor,
            faults: self.faults,
            busts: self.busts,
            avg_final_money: self.final_money as f64 / games.max(1) as f64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentReport {
    pub name: String,
    pub kind: AgentKind,
    pub rounds: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_score: f64,
    /// Average residual hand size over the rounds this agent lost.
    pub avg_cards_left: f64,
    pub best_factor: u32,
    pub faults: usize,
    pub busts: usize,
    pub avg_final_money: f64,
}

#[derive(Debug, Clone)]
pub struct AnalyticsSummary {
    pub run_id: String,
    pub games: usize,
    pub games_finished: usize,
    pub rounds: usize,
    pub abandoned: usize,
    pub longest_round: usize,
    pub agents: Vec<AgentReport>,
}

impl AnalyticsSummary {
    pub fn to_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str(&format!("# Simulation Summary: {}\n\n", self.run_id));
        rows.push_str(&format!(
            "Games: {} ({} played to a bust), rounds: {}, abandoned: {}, longest round: {} shows\n\n",
            self.games, self.games_finished, self.rounds, self.abandoned, self.longest_round
        ));
        rows.push_str("| Seat | Agent | Kind | Rounds | Wins | Win % | Avg score | Avg cards left | Max factor | Faults | Busts | Avg final money |\n");
        rows.push_str("|------|-------|------|--------|------|-------|-----------|----------------|------------|--------|-------|-----------------|\n");

        for (seat, agent) in Seat::LOOP.iter().zip(&self.agents) {
            rows.push_str(&format!(
                "| {seat} | {name} | {kind:?} | {rounds} | {wins} | {win:.1}% | {score:+.2} | {left:.2} | x{factor} | {faults} | {busts} | {money:.1} |\n",
                seat = seat.label(),
                name = agent.name,
                kind = agent.kind,
                rounds = agent.rounds,
                wins = agent.wins,
                win = agent.win_rate * 100.0,
                score = agent.avg_score,
                left = agent.avg_cards_left,
                factor = agent.best_factor,
                faults = agent.faults,
                busts = agent.busts,
                money = agent.avg_final_money,
            ));
        }
        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.to_markdown()).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::AnalyticsCollector;
    use crate::config::BenchmarkConfig;
    use bigtwo_core::error::BotFault;
    use bigtwo_core::game::message::RoundSummary;
    use bigtwo_core::game::session::RoundReport;
    use bigtwo_core::model::score::ScoreReasons;
    use bigtwo_core::model::seat::Seat;

    fn config() -> BenchmarkConfig {
        serde_yaml::from_str(
            r#"
run_id: "analytics"
deals: { seed: 1, rounds: 2 }
agents:
  - { name: "a", kind: "lowest" }
  - { name: "b", kind: "random" }
  - { name: "c", kind: "lowest" }
  - { name: "d", kind: "random" }
outputs: { jsonl: "rounds.jsonl", summary_md: "summary.md" }
"#,
        )
        .expect("parse yaml")
    }

    fn won_by_east() -> RoundReport {
        let eight = ScoreReasons::holding_twos(3);
        RoundReport {
            round_number: 1,
            deal_seed: 5,
            summary: Some(RoundSummary {
                winner: Seat::East,
                money: [496, 516, 494, 494],
                scores: [-4, 16, -6, -6],
                reasons: [eight, ScoreReasons::NONE, ScoreReasons::NONE, ScoreReasons::NONE],
                remaining_cards: [4, 0, 6, 6],
                residual_cards: Default::default(),
                is_game_over: false,
            }),
            shows: 31,
            faults: vec![BotFault {
                seat: Seat::West,
                attempts: 10,
            }],
        }
    }

    #[test]
    fn totals_follow_the_reports() {
        let mut collector = AnalyticsCollector::new(&config());
        collector.record_round(&won_by_east());
        collector.record_round(&RoundReport {
            round_number: 2,
            deal_seed: 6,
            summary: None,
            shows: 3,
            faults: Vec::new(),
        });
        collector.record_game([496, 516, 494, 494], false);

        let summary = collector.finalize();
        assert_eq!(summary.rounds, 2);
        assert_eq!(summary.abandoned, 1);
        assert_eq!(summary.longest_round, 31);
        assert_eq!(summary.games, 1);
        assert_eq!(summary.games_finished, 0);

        let east = &summary.agents[Seat::East.index()];
        assert_eq!(east.wins, 1);
        assert_eq!(east.avg_score, 16.0);
        let north = &summary.agents[Seat::North.index()];
        assert_eq!(north.best_factor, 8);
        assert_eq!(north.avg_cards_left, 4.0);
        assert_eq!(summary.agents[Seat::West.index()].faults, 1);
    }

    #[test]
    fn markdown_lists_every_agent() {
        let mut collector = AnalyticsCollector::new(&config());
        collector.record_round(&won_by_east());
        collector.record_game([0, 1000, 500, 500], true);
        let markdown = collector.finalize().to_markdown();

        assert!(markdown.starts_with("# Simulation Summary: analytics"));
        for name in ["| north | a |", "| east | b |", "| south | c |", "| west | d |"] {
            assert!(markdown.contains(name), "missing row {name}");
        }
        assert!(markdown.contains("x8"));
    }
}
