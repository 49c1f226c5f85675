//! Tournament results storage and reporting

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use swiss_core::{Entrant, Podium, Qualifier, Shortfall};

use crate::config::TournamentConfig;

/// Complete tournament results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentResults {
    pub name: String,
    pub place: String,
    pub started_at: DateTime<Utc>,
    /// Registered players, in initial-rank order
    pub participants: Vec<String>,
    /// Configuration used
    pub config: TournamentConfig,
    pub swiss_rounds: Vec<RoundReport>,
    /// Cutoff ranking, best first
    pub qualifiers: Vec<Qualifier>,
    pub shortfall: Option<Shortfall>,
    pub bracket_rounds: Vec<RoundReport>,
    pub podium: Option<Podium>,
}

/// One played round, Swiss or bracket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u32,
    /// Paired with rematches allowed after a deadlock
    #[serde(default)]
    pub relaxed: bool,
    pub matches: Vec<MatchEntry>,
    pub bye: Option<Entrant>,
}

/// A single match entry in the tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub winner: Entrant,
    pub loser: Entrant,
    pub winner_points: u32,
    pub loser_points: u32,
}

impl RoundReport {
    pub fn new(round: u32) -> Self {
        Self {
            round,
            relaxed: false,
            matches: Vec::new(),
            bye: None,
        }
    }
}

impl TournamentResults {
    pub fn new(config: &TournamentConfig, participants: Vec<String>) -> Self {
        Self {
            name: config.name.clone(),
            place: config.place.clone(),
            started_at: Utc::now(),
            participants,
            config: config.clone(),
            swiss_rounds: Vec::new(),
            qualifiers: Vec::new(),
            shortfall: None,
            bracket_rounds: Vec::new(),
            podium: None,
        }
    }

    /// Total matches played across both stages
    pub fn match_count(&self) -> usize {
        self.swiss_rounds
            .iter()
            .chain(&self.bracket_rounds)
            .map(|r| r.matches.len())
            .sum()
    }

    /// Save results to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize results")?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Load results from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Tournament: {} ===\n", self.name));
        if !self.place.is_empty() {
            report.push_str(&format!("Place: {}\n", self.place));
        }
        report.push_str(&format!("Started: {}\n", self.started_at.format("%Y-%m-%d %H:%M UTC")));
        report.push('\n');
        report.push_str(&format!(
            "Participants ({}): {}\n",
            self.participants.len(),
            self.participants.join(", ")
        ));
        report.push_str(&format!(
            "Config: {} Swiss rounds, {} qualifiers\n\n",
            self.swiss_rounds.len(),
            self.config.qualifiers
        ));

        for round in &self.swiss_rounds {
            push_round(&mut report, "Swiss round", round);
        }

        report.push_str("Qualifiers:\n");
        report.push_str(&format!("{:>4}  {:<24} {:>4} {:>10}\n", "Rank", "Player", "Wins", "Tie-break"));
        report.push_str(&"-".repeat(46));
        report.push('\n');
        for q in &self.qualifiers {
            let tie_break = q.tie_break.map(|t| t.to_string()).unwrap_or_default();
            report.push_str(&format!("{:>4}  {:<24} {:>4} {:>10}\n", q.rank, q.name, q.wins, tie_break));
        }
        if let Some(s) = &self.shortfall {
            report.push_str(&format!(
                "Shortfall: {} of {} qualifier slots filled\n",
                s.available, s.requested
            ));
        }
        report.push('\n');

        for round in &self.bracket_rounds {
            push_round(&mut report, "Bracket round", round);
        }

        match &self.podium {
            Some(podium) => {
                report.push_str(&format!("Winner:    {}\n", podium.winner.name));
                report.push_str(&format!("Runner-up: {}\n", podium.runner_up.name));
            }
            None => report.push_str("No bracket was played\n"),
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

fn push_round(report: &mut String, label: &str, round: &RoundReport) {
    report.push_str(&format!("{label} {}", round.round));
    if round.relaxed {
        report.push_str(" (rematches allowed)");
    }
    report.push('\n');
    for m in &round.matches {
        report.push_str(&format!(
            "  {:<24} beat {:<24} {:>3}-{:<3}\n",
            m.winner.name, m.loser.name, m.winner_points, m.loser_points
        ));
    }
    if let Some(bye) = &round.bye {
        report.push_str(&format!("  {:<24} bye\n", bye.name));
    }
    report.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use swiss_core::CompetitorId;

    fn entrant(id: u32, name: &str) -> Entrant {
        Entrant::new(CompetitorId(id), name)
    }

    fn sample() -> TournamentResults {
        let config = TournamentConfig {
            name: "Test Open".to_string(),
            place: "Helsinki".to_string(),
            qualifiers: 2,
            ..Default::default()
        };
        let mut results = TournamentResults::new(&config, vec!["Ada".into(), "Grace".into(), "Alan".into()]);

        let mut round = RoundReport::new(1);
        round.matches.push(MatchEntry {
            winner: entrant(1, "Ada"),
            loser: entrant(2, "Grace"),
            winner_points: 2,
            loser_points: 1,
        });
        round.bye = Some(entrant(3, "Alan"));
        results.swiss_rounds.push(round);

        results.podium = Some(Podium {
            winner: entrant(3, "Alan"),
            runner_up: entrant(1, "Ada"),
        });
        results
    }

    #[test]
    fn test_report_contents() {
        let report = sample().generate_report();
        assert!(report.contains("=== Tournament: Test Open ==="));
        assert!(report.contains("Place: Helsinki"));
        assert!(report.contains("Swiss round 1"));
        assert!(report.contains("Alan"));
        assert!(report.contains("bye"));
        assert!(report.contains("Winner:    Alan"));
    }

    #[test]
    fn test_match_count() {
        let mut results = sample();
        assert_eq!(results.match_count(), 1);
        let mut final_round = RoundReport::new(2);
        final_round.matches.push(MatchEntry {
            winner: entrant(3, "Alan"),
            loser: entrant(1, "Ada"),
            winner_points: 2,
            loser_points: 0,
        });
        results.bracket_rounds.push(final_round);
        assert_eq!(results.match_count(), 2);
    }

    #[test]
    fn test_save_and_load() {
        let results = sample();
        let path = std::env::temp_dir().join(format!("swiss_results_{}.json", std::process::id()));
        results.save(&path).unwrap();
        let loaded = TournamentResults::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.name, results.name);
        assert_eq!(loaded.started_at, results.started_at);
        assert_eq!(loaded.swiss_rounds[0].matches, results.swiss_rounds[0].matches);
        assert_eq!(loaded.podium, results.podium);
    }
}
