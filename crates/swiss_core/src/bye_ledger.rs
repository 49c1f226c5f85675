//! Outstanding bye credits.
//!
//! A competitor who sat out a round on a bye is owed priority: the next time
//! it shares a win group with someone looking for an opponent, it is picked
//! first. The ledger keeps at most one credit per competitor, most recent
//! award first.

use serde::{Deserialize, Serialize};

use crate::history::MatchHistory;
use crate::types::{ByeCredit, CompetitorId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ByeCredit>", into = "Vec<ByeCredit>")]
pub struct ByeLedger {
    credits: Vec<ByeCredit>,
}

impl ByeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild credits from bye records whose holder has not played a real
    /// match since the bye.
    pub fn from_history(history: &MatchHistory) -> Self {
        let mut ledger = ByeLedger::new();
        let mut byes = history.byes();
        // Oldest first so newer awards end up in front
        byes.reverse();
        for bye in byes {
            let played_since = history
                .records_for(bye.winner)
                .any(|r| !r.is_bye() && r.round > bye.round);
            if !played_since {
                ledger.award(bye.winner, bye.round);
            }
        }
        ledger
    }

    /// Record a bye. A competitor still holding an older credit keeps only
    /// the new one.
    pub fn award(&mut self, competitor: CompetitorId, round: u32) {
        if let Some(old) = self.consume(competitor) {
            tracing::debug!(
                %competitor,
                previous_round = old.round_awarded,
                round,
                "replacing unconsumed bye credit"
            );
        }
        self.credits.insert(
            0,
            ByeCredit {
                competitor,
                round_awarded: round,
            },
        );
    }

    pub fn holds(&self, competitor: CompetitorId) -> bool {
        self.credits.iter().any(|c| c.competitor == competitor)
    }

    pub fn get(&self, competitor: CompetitorId) -> Option<&ByeCredit> {
        self.credits.iter().find(|c| c.competitor == competitor)
    }

    /// Remove and return the competitor's credit.
    pub fn consume(&mut self, competitor: CompetitorId) -> Option<ByeCredit> {
        let pos = self.credits.iter().position(|c| c.competitor == competitor)?;
        Some(self.credits.remove(pos))
    }

    /// Index into `candidates` of the earliest-awarded credit holder.
    ///
    /// Ties on the award round go to whichever credit comes first in the
    /// ledger.
    pub fn earliest_among(&self, candidates: &[CompetitorId]) -> Option<usize> {
        let mut best: Option<(u32, usize, usize)> = None;
        for (ledger_pos, credit) in self.credits.iter().enumerate() {
            let Some(idx) = candidates.iter().position(|&c| c == credit.competitor) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((round, _, _)) => credit.round_awarded < round,
            };
            if better {
                best = Some((credit.round_awarded, ledger_pos, idx));
            }
        }
        best.map(|(_, _, idx)| idx)
    }

    /// Credits, most recent award first.
    pub fn iter(&self) -> impl Iterator<Item = &ByeCredit> {
        self.credits.iter()
    }

    pub fn len(&self) -> usize {
        self.credits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credits.is_empty()
    }
}

impl From<Vec<ByeCredit>> for ByeLedger {
    fn from(credits: Vec<ByeCredit>) -> Self {
        credits.into_iter().collect()
    }
}

impl From<ByeLedger> for Vec<ByeCredit> {
    fn from(ledger: ByeLedger) -> Self {
        ledger.credits
    }
}

impl FromIterator<ByeCredit> for ByeLedger {
    /// Accepts credits in any order; the ledger re-sorts most recent first.
    fn from_iter<I: IntoIterator<Item = ByeCredit>>(iter: I) -> Self {
        let mut credits: Vec<ByeCredit> = iter.into_iter().collect();
        credits.sort_by(|a, b| a.round_awarded.cmp(&b.round_awarded));
        let mut ledger = ByeLedger::new();
        for credit in credits {
            ledger.award(credit.competitor, credit.round_awarded);
        }
        ledger
    }
}

#[cfg(test)]
#[path = "bye_ledger_tests.rs"]
mod bye_ledger_tests;
