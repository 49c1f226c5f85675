//! Match history snapshot with a fast "have these two met" lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::{CompetitorId, MatchRecord, TournamentId};

/// All reported matches of one tournament.
///
/// Byes are kept as records (they count as wins) but never count as a
/// meeting between two competitors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<MatchRecord>", into = "Vec<MatchRecord>")]
pub struct MatchHistory {
    records: Vec<MatchRecord>,
    /// Unordered pairs, stored smaller id first
    met: HashSet<(CompetitorId, CompetitorId)>,
}

fn key(a: CompetitorId, b: CompetitorId) -> (CompetitorId, CompetitorId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MatchRecord) {
        if let Some(loser) = record.loser.competitor() {
            self.met.insert(key(record.winner, loser));
        }
        self.records.push(record);
    }

    /// True if `a` and `b` already met, whichever of them won.
    pub fn have_played(&self, a: CompetitorId, b: CompetitorId) -> bool {
        self.met.contains(&key(a, b))
    }

    /// True if every record belongs to `tournament`.
    pub fn is_scoped_to(&self, tournament: TournamentId) -> bool {
        self.records.iter().all(|r| r.tournament == tournament)
    }

    /// Copy of the records played in `tournament`, in their original order.
    pub fn for_tournament(&self, tournament: TournamentId) -> MatchHistory {
        self.records
            .iter()
            .filter(|r| r.tournament == tournament)
            .cloned()
            .collect()
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record `id` took part in, byes included.
    pub fn records_for(&self, id: CompetitorId) -> impl Iterator<Item = &MatchRecord> {
        self.records.iter().filter(move |r| r.involves(id))
    }

    pub fn round(&self, round: u32) -> impl Iterator<Item = &MatchRecord> {
        self.records.iter().filter(move |r| r.round == round)
    }

    pub fn winners_of_round(&self, round: u32) -> Vec<CompetitorId> {
        self.round(round).map(|r| r.winner).collect()
    }

    /// Bye records, most recent round first.
    pub fn byes(&self) -> Vec<&MatchRecord> {
        let mut byes: Vec<_> = self.records.iter().filter(|r| r.is_bye()).collect();
        byes.sort_by(|a, b| b.round.cmp(&a.round));
        byes
    }

    pub fn last_round(&self) -> u32 {
        self.records.iter().map(|r| r.round).max().unwrap_or(0)
    }
}

impl From<Vec<MatchRecord>> for MatchHistory {
    fn from(records: Vec<MatchRecord>) -> Self {
        records.into_iter().collect()
    }
}

impl From<MatchHistory> for Vec<MatchRecord> {
    fn from(history: MatchHistory) -> Self {
        history.records
    }
}

impl FromIterator<MatchRecord> for MatchHistory {
    fn from_iter<I: IntoIterator<Item = MatchRecord>>(iter: I) -> Self {
        let mut history = MatchHistory::new();
        for record in iter {
            history.push(record);
        }
        history
    }
}

impl Extend<MatchRecord> for MatchHistory {
    fn extend<I: IntoIterator<Item = MatchRecord>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod history_tests;
