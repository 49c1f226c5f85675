//! Standings input: the store-facing trait and win-count grouping.

use std::collections::{HashMap, HashSet};

use crate::bye_ledger::ByeLedger;
use crate::error::{EngineError, Result};
use crate::history::MatchHistory;
use crate::types::{CompetitorId, CompetitorSnapshot, TournamentId};

/// Read side of whatever store holds players and matches.
///
/// The engine never writes through this trait; pairings, byes and rankings
/// are handed back to the caller to persist.
pub trait StandingsView {
    /// Current standings, most wins first.
    fn standings(&self, tournament: TournamentId) -> Vec<CompetitorSnapshot>;

    fn match_history(&self, tournament: TournamentId) -> MatchHistory;

    /// Outstanding bye credits, most recent award first.
    fn bye_credits(&self, tournament: TournamentId) -> ByeLedger;

    /// Sum of the accumulated points of every opponent `competitor` faced
    /// in `tournament`. Used by the cutoff tie-break.
    fn opponent_points_sum(&self, tournament: TournamentId, competitor: CompetitorId) -> u64 {
        let standings = self.standings(tournament);
        let history = self.match_history(tournament).for_tournament(tournament);
        let points = points_by_id(&standings);
        opponent_points_sum(&history, &points, competitor)
    }
}

/// Competitors sharing a win count at the start of a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinGroup {
    pub wins: u32,
    pub members: Vec<CompetitorSnapshot>,
}

impl WinGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Fails on the first id seen twice.
pub fn check_unique(standings: &[CompetitorSnapshot]) -> Result<()> {
    let mut seen = HashSet::with_capacity(standings.len());
    for s in standings {
        if !seen.insert(s.id) {
            return Err(EngineError::DuplicateCompetitor(s.id));
        }
    }
    Ok(())
}

/// Partition standings into win groups, fewest wins first.
///
/// Members keep their relative order from `standings`.
pub fn win_groups(standings: &[CompetitorSnapshot]) -> Result<Vec<WinGroup>> {
    check_unique(standings)?;

    let mut groups: Vec<WinGroup> = Vec::new();
    for s in standings {
        match groups.iter_mut().find(|g| g.wins == s.wins) {
            Some(group) => group.members.push(s.clone()),
            None => groups.push(WinGroup {
                wins: s.wins,
                members: vec![s.clone()],
            }),
        }
    }
    groups.sort_by_key(|g| g.wins);
    Ok(groups)
}

pub fn points_by_id(standings: &[CompetitorSnapshot]) -> HashMap<CompetitorId, u32> {
    standings.iter().map(|s| (s.id, s.points)).collect()
}

/// Opponent-strength score: each real match contributes the opponent's
/// current points. Byes contribute nothing.
pub fn opponent_points_sum(
    history: &MatchHistory,
    points: &HashMap<CompetitorId, u32>,
    competitor: CompetitorId,
) -> u64 {
    history
        .records_for(competitor)
        .filter_map(|r| r.opponent_of(competitor))
        .map(|opp| u64::from(points.get(&opp).copied().unwrap_or(0)))
        .sum()
}

#[cfg(test)]
#[path = "standings_tests.rs"]
mod standings_tests;
