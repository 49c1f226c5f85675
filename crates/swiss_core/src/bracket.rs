//! Single-elimination bracket seeding.
//!
//! Each round pairs the best remaining seed with the worst, the second best
//! with the second worst, and so on. Winners keep the slot order they held
//! entering the round; seeds are never recomputed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{EngineError, Result};
use crate::types::{CompetitorId, Entrant, Pairing};

/// Final two of the bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podium {
    pub winner: Entrant,
    pub runner_up: Entrant,
}

impl Podium {
    /// Settle the terminal pairing.
    pub fn from_final(pairing: &Pairing, winner: CompetitorId) -> Result<Self> {
        let runner_up = pairing.opponent_of(winner).cloned().ok_or_else(|| {
            EngineError::BracketResult(format!("{winner} did not play in the final"))
        })?;
        let winner = if pairing.first.id == winner {
            pairing.first.clone()
        } else {
            pairing.second.clone()
        };
        Ok(Self { winner, runner_up })
    }
}

/// Rounds needed to get a field of `entrants` down to one.
pub fn bracket_rounds(entrants: usize) -> u32 {
    if entrants < 2 {
        0
    } else {
        entrants.ilog2()
    }
}

fn check_size(entrants: usize) -> Result<()> {
    if entrants < 2 || !entrants.is_power_of_two() {
        return Err(EngineError::BracketSize(entrants));
    }
    Ok(())
}

/// Pairings for one bracket round, `seeds` best first.
pub fn next_bracket_round(seeds: &[Entrant]) -> Result<Vec<Pairing>> {
    check_size(seeds.len())?;

    let (top, bottom) = seeds.split_at(seeds.len() / 2);
    Ok(top
        .iter()
        .zip(bottom.iter().rev())
        .map(|(a, b)| Pairing::new(a.clone(), b.clone()))
        .collect())
}

/// The seed list for the following round.
///
/// `winners` must name exactly one entrant from every pairing of
/// `next_bracket_round(entering)`. Their order in `winners` is irrelevant:
/// the result keeps the order from `entering`.
pub fn advance(entering: &[Entrant], winners: &[CompetitorId]) -> Result<Vec<Entrant>> {
    check_size(entering.len())?;

    let won: HashSet<CompetitorId> = winners.iter().copied().collect();
    if won.len() != winners.len() || won.len() != entering.len() / 2 {
        return Err(EngineError::BracketResult(format!(
            "expected {} distinct winners, got {}",
            entering.len() / 2,
            winners.len()
        )));
    }

    for pairing in next_bracket_round(entering)? {
        let [a, b] = pairing.ids();
        if won.contains(&a) == won.contains(&b) {
            return Err(EngineError::BracketResult(format!(
                "{pairing} needs exactly one winner"
            )));
        }
    }

    Ok(entering
        .iter()
        .filter(|e| won.contains(&e.id))
        .cloned()
        .collect())
}

/// Method-style access to the bracket functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketEngine;

impl BracketEngine {
    pub fn next_round(&self, seeds: &[Entrant]) -> Result<Vec<Pairing>> {
        next_bracket_round(seeds)
    }

    pub fn advance(&self, entering: &[Entrant], winners: &[CompetitorId]) -> Result<Vec<Entrant>> {
        advance(entering, winners)
    }
}

#[cfg(test)]
#[path = "bracket_tests.rs"]
mod bracket_tests;
