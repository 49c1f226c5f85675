//! Tournament configuration, loaded from TOML

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;
use swiss_core::{swiss_rounds, PairingConfig, RematchPolicy, TournamentId, DEFAULT_QUALIFIERS};

/// Everything needed to run one tournament.
///
/// Every field has a default, so a config file only lists what it changes:
///
/// ```toml
/// name = "Spring Open"
/// qualifiers = 8
/// seed = 42
/// players = ["Ada", "Grace", "Edsger"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub tournament_id: u32,
    pub name: String,
    pub place: String,
    /// Size of the elimination bracket
    pub qualifiers: usize,
    /// Swiss rounds; derived from the field size when unset
    pub rounds: Option<u32>,
    /// Reshuffles per win group before a round counts as deadlocked
    pub max_reshuffles: u32,
    /// Retry a deadlocked round with rematches allowed instead of failing
    pub relax_rematches_on_deadlock: bool,
    /// Seed for reproducible runs
    pub seed: Option<u64>,
    /// Player names, registered in this order
    pub players: Vec<String>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        let pairing = PairingConfig::default();
        Self {
            tournament_id: 1,
            name: "Swiss Open".to_string(),
            place: String::new(),
            qualifiers: DEFAULT_QUALIFIERS,
            rounds: None,
            max_reshuffles: pairing.max_reshuffles,
            relax_rematches_on_deadlock: true,
            seed: None,
            players: Vec::new(),
        }
    }
}

impl TournamentConfig {
    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.qualifiers < 2 {
            bail!("qualifiers must be at least 2, got {}", self.qualifiers);
        }
        if !self.qualifiers.is_power_of_two() {
            bail!("qualifiers must be a power of two, got {}", self.qualifiers);
        }
        Ok(())
    }

    pub fn tournament(&self) -> TournamentId {
        TournamentId(self.tournament_id)
    }

    /// Swiss rounds for a field of `competitors`
    pub fn swiss_rounds(&self, competitors: usize) -> u32 {
        self.rounds.unwrap_or_else(|| swiss_rounds(competitors))
    }

    pub fn pairing_config(&self) -> PairingConfig {
        PairingConfig {
            max_reshuffles: self.max_reshuffles,
            rematch: RematchPolicy::Forbid,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
