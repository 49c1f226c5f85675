//! Qualifier cutoff after the Swiss rounds.
//!
//! Win groups are admitted whole, most wins first, while they fit. The
//! group that straddles the cutoff is ordered by the summed points of each
//! member's opponents and only the best of it fill the remaining slots.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::history::MatchHistory;
use crate::standings::{opponent_points_sum, points_by_id, win_groups, StandingsView};
use crate::types::{CompetitorId, CompetitorSnapshot, Entrant, TournamentId};

/// Default size of the elimination bracket.
pub const DEFAULT_QUALIFIERS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualifier {
    /// 1-based, best first
    pub rank: u32,
    pub id: CompetitorId,
    pub name: String,
    pub wins: u32,
    /// Opponent points, only computed for the boundary group
    pub tie_break: Option<u64>,
}

impl Qualifier {
    pub fn entrant(&self) -> Entrant {
        Entrant::new(self.id, self.name.clone())
    }
}

/// Fewer competitors than requested qualifier slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub requested: usize,
    pub available: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualification {
    pub ranking: Vec<Qualifier>,
    pub shortfall: Option<Shortfall>,
}

impl Qualification {
    pub fn ids(&self) -> Vec<CompetitorId> {
        self.ranking.iter().map(|q| q.id).collect()
    }

    /// Seeds for the first bracket round, best first.
    pub fn entrants(&self) -> Vec<Entrant> {
        self.ranking.iter().map(Qualifier::entrant).collect()
    }

    /// `(rank, id)` pairs for the caller to persist.
    pub fn ranked(&self) -> impl Iterator<Item = (u32, CompetitorId)> + '_ {
        self.ranking.iter().map(|q| (q.rank, q.id))
    }

    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoffResolver {
    qualifiers: usize,
}

impl Default for CutoffResolver {
    fn default() -> Self {
        Self::new(DEFAULT_QUALIFIERS)
    }
}

impl CutoffResolver {
    pub fn new(qualifiers: usize) -> Self {
        Self { qualifiers }
    }

    pub fn qualifiers(&self) -> usize {
        self.qualifiers
    }

    pub fn resolve(
        &self,
        standings: &[CompetitorSnapshot],
        history: &MatchHistory,
    ) -> Result<Qualification> {
        top_n(standings, history, self.qualifiers)
    }

    pub fn resolve_from_view<V: StandingsView + ?Sized>(
        &self,
        view: &V,
        tournament: TournamentId,
    ) -> Result<Qualification> {
        let standings = view.standings(tournament);
        top_n_by(&standings, self.qualifiers, |id| {
            view.opponent_points_sum(tournament, id)
        })
    }
}

/// Pick the top `n` competitors.
///
/// Within a fully admitted group the input order is kept. Ties on the
/// opponent-points score keep input order too, so the same standings always
/// give the same ranking.
pub fn top_n(
    standings: &[CompetitorSnapshot],
    history: &MatchHistory,
    n: usize,
) -> Result<Qualification> {
    let points = points_by_id(standings);
    top_n_by(standings, n, |id| opponent_points_sum(history, &points, id))
}

/// [`top_n`] with the boundary-group score supplied by the caller.
///
/// `score` is only asked about members of the boundary group.
pub fn top_n_by<F>(standings: &[CompetitorSnapshot], n: usize, mut score: F) -> Result<Qualification>
where
    F: FnMut(CompetitorId) -> u64,
{
    let mut groups = win_groups(standings)?;
    groups.reverse();

    let shortfall = (standings.len() < n).then(|| Shortfall {
        requested: n,
        available: standings.len(),
    });
    if let Some(s) = shortfall {
        tracing::warn!(
            requested = s.requested,
            available = s.available,
            "not enough competitors for a full bracket"
        );
    }

    let mut ranking: Vec<Qualifier> = Vec::with_capacity(n.min(standings.len()));

    for group in groups {
        let open = n - ranking.len();
        if open == 0 {
            break;
        }

        if group.len() <= open {
            for member in group.members {
                ranking.push(Qualifier {
                    rank: 0,
                    id: member.id,
                    name: member.name,
                    wins: member.wins,
                    tie_break: None,
                });
            }
            continue;
        }

        let mut scored: Vec<(u64, CompetitorSnapshot)> = group
            .members
            .into_iter()
            .map(|m| (score(m.id), m))
            .collect();
        // Stable, so equal scores keep standings order
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        tracing::debug!(
            wins = group.wins,
            group_size = scored.len(),
            open,
            "breaking tie at the cutoff"
        );

        for (score, member) in scored.into_iter().take(open) {
            ranking.push(Qualifier {
                rank: 0,
                id: member.id,
                name: member.name,
                wins: member.wins,
                tie_break: Some(score),
            });
        }
        break;
    }

    for (i, q) in ranking.iter_mut().enumerate() {
        q.rank = i as u32 + 1;
    }

    Ok(Qualification { ranking, shortfall })
}

#[cfg(test)]
#[path = "cutoff_tests.rs"]
mod cutoff_tests;
