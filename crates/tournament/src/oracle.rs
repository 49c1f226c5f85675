//! Match outcome sources
//!
//! The runner does not play matches itself; it asks a [`MatchOracle`] who
//! won each pairing. Simulations use [`RandomOracle`], tests that need a
//! predictable bracket use [`FavoriteOracle`].

use rand::Rng;
use std::collections::HashMap;
use swiss_core::{CompetitorId, Pairing};

use crate::store::MatchPoints;

/// Decided result of one pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub winner: CompetitorId,
    pub loser: CompetitorId,
    pub points: MatchPoints,
}

impl Outcome {
    /// Check the outcome names exactly the two entrants of `pairing`.
    pub fn matches(&self, pairing: &Pairing) -> bool {
        self.winner != self.loser && pairing.is_between(self.winner, self.loser)
    }
}

/// Trait for anything that can settle a pairing.
pub trait MatchOracle {
    /// Decide the pairing played in `round`.
    fn decide(&mut self, pairing: &Pairing, round: u32) -> Outcome;

    fn name(&self) -> &str;
}

/// Coin-flip winner; the loser takes 0 or 1 point against the winner's 2.
pub struct RandomOracle<R> {
    rng: R,
}

impl<R: Rng> RandomOracle<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> MatchOracle for RandomOracle<R> {
    fn decide(&mut self, pairing: &Pairing, _round: u32) -> Outcome {
        let (winner, loser) = if self.rng.gen_bool(0.5) {
            (pairing.first.id, pairing.second.id)
        } else {
            (pairing.second.id, pairing.first.id)
        };
        Outcome {
            winner,
            loser,
            points: MatchPoints {
                winner: 2,
                loser: self.rng.gen_range(0..=1),
            },
        }
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// The better-ranked entrant always wins 2-0. Entrants missing from the
/// ranking lose to ranked ones; two unranked entrants are split by id.
#[derive(Debug, Clone, Default)]
pub struct FavoriteOracle {
    ranks: HashMap<CompetitorId, usize>,
}

impl FavoriteOracle {
    /// `ranking` lists competitors best first.
    pub fn new(ranking: impl IntoIterator<Item = CompetitorId>) -> Self {
        Self {
            ranks: ranking.into_iter().enumerate().map(|(i, id)| (id, i)).collect(),
        }
    }

    fn key(&self, id: CompetitorId) -> (usize, CompetitorId) {
        (self.ranks.get(&id).copied().unwrap_or(usize::MAX), id)
    }
}

impl MatchOracle for FavoriteOracle {
    fn decide(&mut self, pairing: &Pairing, _round: u32) -> Outcome {
        let (a, b) = (pairing.first.id, pairing.second.id);
        let (winner, loser) = if self.key(a) <= self.key(b) { (a, b) } else { (b, a) };
        Outcome {
            winner,
            loser,
            points: MatchPoints { winner: 2, loser: 0 },
        }
    }

    fn name(&self) -> &str {
        "favorite"
    }
}
