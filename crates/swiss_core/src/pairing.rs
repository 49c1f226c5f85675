//! Swiss round pairing.
//!
//! Competitors are paired inside their win group, lowest group first. An odd
//! group hands its last unpaired member up to the next group, where it is
//! paired before anyone else. The highest group's leftover gets the bye.
//!
//! Within a group the first remaining member picks an opponent: a holder of
//! a bye credit if one is present (earliest award first), otherwise a random
//! member. Opponents it has already met are rejected and redrawn at random.
//! When redraws for one member run past the group size the whole group is
//! reshuffled and paired again from scratch, up to
//! [`PairingConfig::max_reshuffles`] times.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::bye_ledger::ByeLedger;
use crate::error::{EngineError, Result};
use crate::history::MatchHistory;
use crate::standings::{win_groups, StandingsView, WinGroup};
use crate::types::{CompetitorSnapshot, MatchRecord, Pairing, TournamentId};

/// Whether two competitors who already met may be paired again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RematchPolicy {
    #[default]
    Forbid,
    /// Last resort for a round that cannot be paired otherwise
    Allow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingConfig {
    /// Reshuffles allowed per win group before giving up on the round
    pub max_reshuffles: u32,
    pub rematch: RematchPolicy,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            max_reshuffles: 64,
            rematch: RematchPolicy::Forbid,
        }
    }
}

/// Everything a round of pairing produces. Nothing is committed until the
/// caller persists it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundPairings {
    pub round: u32,
    /// In group order, fewest wins first
    pub pairings: Vec<Pairing>,
    /// Bye match for the highest group's leftover, already decided
    pub bye: Option<MatchRecord>,
    /// Credits after this round's consumption and award
    pub ledger: ByeLedger,
}

impl RoundPairings {
    /// Number of competitors placed this round, bye included.
    pub fn placed(&self) -> usize {
        self.pairings.len() * 2 + usize::from(self.bye.is_some())
    }
}

/// Result of pairing one group.
struct GroupOutcome {
    pairings: Vec<Pairing>,
    leftover: Option<CompetitorSnapshot>,
    ledger: ByeLedger,
}

/// Produces Swiss pairings round after round for one tournament.
pub struct PairingEngine<R> {
    tournament: TournamentId,
    round: u32,
    config: PairingConfig,
    rng: R,
}

impl PairingEngine<StdRng> {
    pub fn from_entropy(tournament: TournamentId, config: PairingConfig) -> Self {
        Self::new(tournament, config, StdRng::from_entropy())
    }

    pub fn seeded(tournament: TournamentId, config: PairingConfig, seed: u64) -> Self {
        Self::new(tournament, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PairingEngine<R> {
    pub fn new(tournament: TournamentId, config: PairingConfig, rng: R) -> Self {
        Self {
            tournament,
            round: 1,
            config,
            rng,
        }
    }

    /// Resume at a later round, e.g. after reloading a stored tournament.
    pub fn starting_at(mut self, round: u32) -> Self {
        self.round = round;
        self
    }

    /// The round the next call will pair.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn tournament(&self) -> TournamentId {
        self.tournament
    }

    pub fn config(&self) -> &PairingConfig {
        &self.config
    }

    pub fn set_rematch_policy(&mut self, rematch: RematchPolicy) {
        self.config.rematch = rematch;
    }

    /// Pair the next round from a store's current state.
    pub fn next_round_from_view<V: StandingsView + ?Sized>(
        &mut self,
        view: &V,
    ) -> Result<RoundPairings> {
        let standings = view.standings(self.tournament);
        let history = view.match_history(self.tournament);
        let ledger = view.bye_credits(self.tournament);
        self.next_round_pairings(&standings, &history, &ledger)
    }

    /// Pair the next round.
    ///
    /// Either every competitor is placed (in a pairing or on the bye) and
    /// the round counter advances, or an error is returned and nothing
    /// changes.
    pub fn next_round_pairings(
        &mut self,
        standings: &[CompetitorSnapshot],
        history: &MatchHistory,
        ledger: &ByeLedger,
    ) -> Result<RoundPairings> {
        if standings.is_empty() {
            return Err(EngineError::EmptyStandings);
        }
        let groups = win_groups(standings)?;
        let last = groups.len() - 1;

        // Meetings from other events sharing the history do not count
        let scoped;
        let history = if history.is_scoped_to(self.tournament) {
            history
        } else {
            scoped = history.for_tournament(self.tournament);
            &scoped
        };

        let mut ledger = ledger.clone();
        let mut pairings = Vec::with_capacity(standings.len() / 2);
        let mut pending: Option<CompetitorSnapshot> = None;
        let mut bye = None;

        for (gi, group) in groups.iter().enumerate() {
            let outcome = self.pair_group(group, pending.take(), history, &ledger)?;
            pairings.extend(outcome.pairings);
            ledger = outcome.ledger;

            if let Some(leftover) = outcome.leftover {
                if gi == last {
                    tracing::info!(
                        round = self.round,
                        competitor = %leftover.id,
                        name = %leftover.name,
                        "round bye"
                    );
                    ledger.award(leftover.id, self.round);
                    bye = Some(MatchRecord::bye(self.tournament, self.round, leftover.id));
                } else {
                    pending = Some(leftover);
                }
            }
        }

        let round = self.round;
        self.round += 1;
        tracing::debug!(round, pairings = pairings.len(), bye = bye.is_some(), "round paired");

        Ok(RoundPairings {
            round,
            pairings,
            bye,
            ledger,
        })
    }

    /// Pair one group, reshuffling on deadlock. Each attempt starts from
    /// the group's original members, the carried competitor and the ledger
    /// as they were on entry.
    fn pair_group(
        &mut self,
        group: &WinGroup,
        carried: Option<CompetitorSnapshot>,
        history: &MatchHistory,
        ledger: &ByeLedger,
    ) -> Result<GroupOutcome> {
        tracing::debug!(
            wins = group.wins,
            size = group.len(),
            carried = carried.is_some(),
            "pairing win group"
        );

        let backup = group.members.clone();
        let mut members = backup.clone();
        let mut reshuffles = 0;

        loop {
            if let Some(outcome) = self.try_pair_group(members, carried.clone(), history, ledger) {
                return Ok(outcome);
            }
            if reshuffles >= self.config.max_reshuffles {
                tracing::warn!(
                    wins = group.wins,
                    size = group.len(),
                    reshuffles,
                    "win group cannot be paired without rematches"
                );
                return Err(EngineError::PairingInfeasible {
                    wins: group.wins,
                    group_size: group.len(),
                    reshuffles,
                });
            }
            reshuffles += 1;
            tracing::debug!(wins = group.wins, reshuffles, "reshuffling win group");
            members = backup.clone();
            members.shuffle(&mut self.rng);
        }
    }

    /// One pass over a group. `None` means a member ran out of redraws.
    fn try_pair_group(
        &mut self,
        mut members: Vec<CompetitorSnapshot>,
        carried: Option<CompetitorSnapshot>,
        history: &MatchHistory,
        ledger: &ByeLedger,
    ) -> Option<GroupOutcome> {
        let limit = members.len();
        let mut ledger = ledger.clone();
        let mut pairings = Vec::with_capacity(members.len() / 2 + 1);

        if let Some(pending) = carried {
            if members.is_empty() {
                return Some(GroupOutcome {
                    pairings,
                    leftover: Some(pending),
                    ledger,
                });
            }
            let ids: Vec<_> = members.iter().map(|m| m.id).collect();
            let first = match ledger.earliest_among(&ids) {
                Some(idx) => (idx, true),
                None => (0, false),
            };
            let (idx, via_credit) = self.find_opponent(&pending, &members, first, 0, history, limit)?;
            let opponent = members.remove(idx);
            if via_credit {
                ledger.consume(opponent.id);
            }
            pairings.push(Pairing::new(pending.entrant(), opponent.entrant()));
        }

        while members.len() >= 2 {
            let ids: Vec<_> = members[1..].iter().map(|m| m.id).collect();
            let first = match ledger.earliest_among(&ids) {
                Some(idx) => (idx + 1, true),
                None => (self.rng.gen_range(1..members.len()), false),
            };
            let (idx, via_credit) = self.find_opponent(&members[0], &members, first, 1, history, limit)?;
            let opponent = members.remove(idx);
            let actual = members.remove(0);
            if via_credit {
                ledger.consume(opponent.id);
            }
            pairings.push(Pairing::new(actual.entrant(), opponent.entrant()));
        }

        Some(GroupOutcome {
            pairings,
            leftover: members.pop(),
            ledger,
        })
    }

    /// Starting from `first`, redraw uniformly from `members[lo..]` until
    /// the candidate is not a rematch. Gives up after more than `limit`
    /// rejections. The flag tells whether the accepted opponent was the
    /// bye-credit pick.
    fn find_opponent(
        &mut self,
        actual: &CompetitorSnapshot,
        members: &[CompetitorSnapshot],
        first: (usize, bool),
        lo: usize,
        history: &MatchHistory,
        limit: usize,
    ) -> Option<(usize, bool)> {
        let (mut choice, mut via_credit) = first;
        let mut rejections = 0;
        loop {
            if !self.is_rematch(actual, &members[choice], history) {
                return Some((choice, via_credit));
            }
            rejections += 1;
            if rejections > limit {
                return None;
            }
            choice = self.rng.gen_range(lo..members.len());
            via_credit = false;
        }
    }

    fn is_rematch(
        &self,
        a: &CompetitorSnapshot,
        b: &CompetitorSnapshot,
        history: &MatchHistory,
    ) -> bool {
        match self.config.rematch {
            RematchPolicy::Allow => false,
            RematchPolicy::Forbid => history.have_played(a.id, b.id),
        }
    }
}

#[cfg(test)]
#[path = "pairing_tests.rs"]
mod pairing_tests;
