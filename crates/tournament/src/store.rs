//! In-memory player and match store
//!
//! Holds one tournament's players, reported matches and bye credits, derives
//! standings from them and persists the lot as JSON.

use anyhow::Context;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use swiss_core::{
    ByeLedger, CompetitorId, CompetitorSnapshot, Entrant, MatchHistory, MatchRecord, Podium,
    Qualification, StandingsView, TournamentId,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unknown player {0}")]
    UnknownPlayer(CompetitorId),

    #[error("player {0} cannot play against themselves")]
    SelfMatch(CompetitorId),

    #[error("record belongs to tournament {found}, store holds {expected}")]
    WrongTournament {
        expected: TournamentId,
        found: TournamentId,
    },

    #[error("expected a bye record for {0}")]
    NotABye(CompetitorId),

    #[error("player name is empty")]
    EmptyName,
}

/// Points earned by each side of a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPoints {
    pub winner: u32,
    pub loser: u32,
}

/// A registered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: CompetitorId,
    pub name: String,
    /// Random rank drawn before round one
    pub initial_rank: Option<u32>,
    /// Qualifier rank after the Swiss stage
    pub final_rank: Option<u32>,
    pub points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStore {
    tournament: TournamentId,
    next_id: u32,
    players: Vec<PlayerEntry>,
    matches: MatchHistory,
    bye_credits: ByeLedger,
    podium: Option<Podium>,
}

impl MemoryStore {
    pub fn new(tournament: TournamentId) -> Self {
        Self {
            tournament,
            next_id: 1,
            players: Vec::new(),
            matches: MatchHistory::new(),
            bye_credits: ByeLedger::new(),
            podium: None,
        }
    }

    /// Load a store from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Save the store to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize store")?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }

    pub fn tournament(&self) -> TournamentId {
        self.tournament
    }

    /// Register a player by full name. A name that is already registered
    /// returns the existing id.
    pub fn register_player(&mut self, name: &str) -> Result<CompetitorId, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if let Some(existing) = self.players.iter().find(|p| p.name == name) {
            tracing::debug!(id = %existing.id, name, "player already registered");
            return Ok(existing.id);
        }

        let id = CompetitorId(self.next_id);
        self.next_id += 1;
        self.players.push(PlayerEntry {
            id,
            name: name.to_string(),
            initial_rank: None,
            final_rank: None,
            points: 0,
        });
        tracing::debug!(%id, name, "registered player");
        Ok(id)
    }

    pub fn count_players(&self) -> usize {
        self.players.len()
    }

    pub fn players(&self) -> &[PlayerEntry] {
        &self.players
    }

    pub fn player(&self, id: CompetitorId) -> Option<&PlayerEntry> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn entrant(&self, id: CompetitorId) -> Result<Entrant, StoreError> {
        self.player(id)
            .map(|p| Entrant::new(p.id, p.name.clone()))
            .ok_or(StoreError::UnknownPlayer(id))
    }

    fn player_mut(&mut self, id: CompetitorId) -> Result<&mut PlayerEntry, StoreError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::UnknownPlayer(id))
    }

    /// Draw a random starting order; rank 1 is the top seed before any
    /// match is played.
    pub fn shuffle_initial_ranking<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.players.len()).collect();
        order.shuffle(rng);
        for (rank, idx) in order.into_iter().enumerate() {
            self.players[idx].initial_rank = Some(rank as u32 + 1);
        }
    }

    /// Players in initial-rank order, unranked players last.
    pub fn initial_order(&self) -> Vec<CompetitorId> {
        let mut players: Vec<_> = self.players.iter().collect();
        players.sort_by_key(|p| (p.initial_rank.unwrap_or(u32::MAX), p.id));
        players.into_iter().map(|p| p.id).collect()
    }

    /// Append the result of a played match.
    pub fn report_match(
        &mut self,
        round: u32,
        winner: CompetitorId,
        loser: CompetitorId,
        points: MatchPoints,
    ) -> Result<(), StoreError> {
        if winner == loser {
            return Err(StoreError::SelfMatch(winner));
        }
        // Check both before touching either
        self.player(loser).ok_or(StoreError::UnknownPlayer(loser))?;
        self.player_mut(winner)?.points += points.winner;
        self.player_mut(loser)?.points += points.loser;

        self.matches
            .push(MatchRecord::new(self.tournament, round, winner, loser));
        tracing::debug!(round, %winner, %loser, "match reported");
        Ok(())
    }

    /// Append a bye decided by the pairing engine.
    pub fn record_bye(&mut self, record: MatchRecord) -> Result<(), StoreError> {
        if record.tournament != self.tournament {
            return Err(StoreError::WrongTournament {
                expected: self.tournament,
                found: record.tournament,
            });
        }
        if !record.is_bye() {
            return Err(StoreError::NotABye(record.winner));
        }
        self.player(record.winner)
            .ok_or(StoreError::UnknownPlayer(record.winner))?;
        self.matches.push(record);
        Ok(())
    }

    pub fn set_bye_credits(&mut self, ledger: ByeLedger) {
        self.bye_credits = ledger;
    }

    /// Persist qualifier ranks; everyone else loses any previous rank.
    pub fn set_final_ranks(&mut self, qualification: &Qualification) {
        let ranks: HashMap<_, _> = qualification.ranked().map(|(rank, id)| (id, rank)).collect();
        for player in &mut self.players {
            player.final_rank = ranks.get(&player.id).copied();
        }
    }

    pub fn set_podium(&mut self, podium: Podium) {
        tracing::info!(winner = %podium.winner.name, runner_up = %podium.runner_up.name, "tournament decided");
        self.podium = Some(podium);
    }

    pub fn podium(&self) -> Option<&Podium> {
        self.podium.as_ref()
    }

    pub fn history(&self) -> &MatchHistory {
        &self.matches
    }

    /// Remove all match records, credits and results. Players stay.
    pub fn delete_matches(&mut self) {
        self.matches = MatchHistory::new();
        self.bye_credits = ByeLedger::new();
        self.podium = None;
        for player in &mut self.players {
            player.points = 0;
            player.final_rank = None;
        }
    }

    /// Remove all players, and with them every match.
    pub fn delete_players(&mut self) {
        self.delete_matches();
        self.players.clear();
    }

    /// Standings: most wins first, then most points, then initial rank.
    fn compute_standings(&self) -> Vec<CompetitorSnapshot> {
        let mut wins: HashMap<CompetitorId, u32> = HashMap::new();
        let mut played: HashMap<CompetitorId, u32> = HashMap::new();
        for record in self.matches.records() {
            *wins.entry(record.winner).or_default() += 1;
            *played.entry(record.winner).or_default() += 1;
            if let Some(loser) = record.loser.competitor() {
                *played.entry(loser).or_default() += 1;
            }
        }

        let mut rows: Vec<(&PlayerEntry, CompetitorSnapshot)> = self
            .players
            .iter()
            .map(|p| {
                let snapshot = CompetitorSnapshot::new(
                    p.id,
                    p.name.clone(),
                    wins.get(&p.id).copied().unwrap_or(0),
                    played.get(&p.id).copied().unwrap_or(0),
                )
                .with_points(p.points);
                (p, snapshot)
            })
            .collect();

        rows.sort_by(|(pa, a), (pb, b)| {
            b.wins
                .cmp(&a.wins)
                .then(b.points.cmp(&a.points))
                .then(
                    pa.initial_rank
                        .unwrap_or(u32::MAX)
                        .cmp(&pb.initial_rank.unwrap_or(u32::MAX)),
                )
                .then(a.id.cmp(&b.id))
        });
        rows.into_iter().map(|(_, s)| s).collect()
    }
}

impl StandingsView for MemoryStore {
    fn standings(&self, tournament: TournamentId) -> Vec<CompetitorSnapshot> {
        if tournament != self.tournament {
            return Vec::new();
        }
        self.compute_standings()
    }

    fn match_history(&self, tournament: TournamentId) -> MatchHistory {
        if tournament != self.tournament {
            return MatchHistory::new();
        }
        self.matches.clone()
    }

    fn bye_credits(&self, tournament: TournamentId) -> ByeLedger {
        if tournament != self.tournament {
            return ByeLedger::new();
        }
        self.bye_credits.clone()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
