//! Round loop: Swiss stage, cutoff, then the elimination bracket

use anyhow::{bail, ensure, Context};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use swiss_core::{
    bracket_size, BracketEngine, CompetitorId, CutoffResolver, Entrant, Pairing, PairingEngine,
    Podium, Qualification, RematchPolicy, RoundPairings,
};
use tracing::{info, warn};

use crate::config::TournamentConfig;
use crate::oracle::{MatchOracle, Outcome};
use crate::results::{MatchEntry, RoundReport, TournamentResults};
use crate::store::MemoryStore;

/// Runs a whole tournament against a store, asking `oracle` for results.
pub struct TournamentRunner<O, R> {
    config: TournamentConfig,
    oracle: O,
    rng: R,
}

impl<O: MatchOracle> TournamentRunner<O, StdRng> {
    /// Seeded from `config.seed`, or from entropy when unset.
    pub fn from_config(config: TournamentConfig, oracle: O) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config, oracle, rng)
    }
}

impl<O: MatchOracle, R: Rng> TournamentRunner<O, R> {
    pub fn new(config: TournamentConfig, oracle: O, rng: R) -> Self {
        Self { config, oracle, rng }
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Play the tournament for every player registered in `store`.
    ///
    /// The store must hold no matches yet. On success it holds the full
    /// history, final ranks and the podium.
    pub fn run(&mut self, store: &mut MemoryStore) -> anyhow::Result<TournamentResults> {
        self.config.validate()?;
        ensure!(
            store.tournament() == self.config.tournament(),
            "store holds tournament {}, config names {}",
            store.tournament(),
            self.config.tournament()
        );
        ensure!(store.history().is_empty(), "tournament already has matches");

        let players = store.count_players();
        if players < 2 {
            bail!("need at least 2 players, got {players}");
        }

        store.shuffle_initial_ranking(&mut self.rng);
        let participants = store
            .initial_order()
            .into_iter()
            .map(|id| store.entrant(id).map(|e| e.name))
            .collect::<Result<Vec<_>, _>>()?;
        let mut results = TournamentResults::new(&self.config, participants);

        let rounds = self.config.swiss_rounds(players);
        info!(
            tournament = %self.config.name,
            players,
            rounds,
            oracle = self.oracle.name(),
            "starting tournament"
        );

        let mut engine = PairingEngine::new(
            self.config.tournament(),
            self.config.pairing_config(),
            StdRng::seed_from_u64(self.rng.gen()),
        );
        for _ in 0..rounds {
            let report = self.play_swiss_round(&mut engine, store)?;
            results.swiss_rounds.push(report);
        }

        let qualification = CutoffResolver::new(self.config.qualifiers)
            .resolve_from_view(store, self.config.tournament())
            .context("cutoff failed")?;
        store.set_final_ranks(&qualification);
        results.qualifiers = qualification.ranking.clone();
        results.shortfall = qualification.shortfall;

        let (bracket_rounds, podium) = self.play_bracket(store, &qualification, rounds + 1)?;
        results.bracket_rounds = bracket_rounds;
        if let Some(podium) = podium {
            store.set_podium(podium.clone());
            results.podium = Some(podium);
        }

        Ok(results)
    }

    fn pair_round(
        &self,
        engine: &mut PairingEngine<StdRng>,
        store: &MemoryStore,
    ) -> anyhow::Result<(RoundPairings, bool)> {
        let round = engine.round();
        match engine.next_round_from_view(store) {
            Ok(pairings) => Ok((pairings, false)),
            Err(e) if e.is_recoverable() && self.config.relax_rematches_on_deadlock => {
                warn!(round, error = %e, "round deadlocked, pairing with rematches allowed");
                engine.set_rematch_policy(RematchPolicy::Allow);
                let relaxed = engine.next_round_from_view(store);
                engine.set_rematch_policy(RematchPolicy::Forbid);
                let pairings = relaxed.with_context(|| format!("failed to pair round {round}"))?;
                Ok((pairings, true))
            }
            Err(e) => Err(e).with_context(|| format!("failed to pair round {round}")),
        }
    }

    fn play_swiss_round(
        &mut self,
        engine: &mut PairingEngine<StdRng>,
        store: &mut MemoryStore,
    ) -> anyhow::Result<RoundReport> {
        let (round_pairings, relaxed) = self.pair_round(engine, store)?;
        let round = round_pairings.round;
        let mut report = RoundReport::new(round);
        report.relaxed = relaxed;

        for pairing in &round_pairings.pairings {
            let entry = self.play(store, pairing, round)?;
            report.matches.push(entry);
        }

        if let Some(bye) = round_pairings.bye {
            report.bye = Some(store.entrant(bye.winner)?);
            store.record_bye(bye)?;
        }
        store.set_bye_credits(round_pairings.ledger);

        info!(
            round,
            matches = report.matches.len(),
            bye = report.bye.as_ref().map(|e| e.name.as_str()),
            "swiss round complete"
        );
        Ok(report)
    }

    fn play_bracket(
        &mut self,
        store: &mut MemoryStore,
        qualification: &Qualification,
        first_round: u32,
    ) -> anyhow::Result<(Vec<RoundReport>, Option<Podium>)> {
        let size = bracket_size(qualification.len(), self.config.qualifiers);
        let mut seeds: Vec<Entrant> = qualification.entrants();
        if size < 2 {
            warn!(qualified = seeds.len(), "too few qualifiers for a bracket");
            return Ok((Vec::new(), None));
        }
        if size < seeds.len() || size < self.config.qualifiers {
            warn!(
                requested = self.config.qualifiers,
                qualified = seeds.len(),
                size,
                "bracket shrunk to a power of two"
            );
            seeds.truncate(size);
        }

        let bracket = BracketEngine;
        let mut rounds = Vec::new();
        let mut round = first_round;
        loop {
            let pairings = bracket.next_round(&seeds)?;
            let mut report = RoundReport::new(round);
            let mut winners = Vec::with_capacity(pairings.len());
            for pairing in &pairings {
                let entry = self.play(store, pairing, round)?;
                winners.push(entry.winner.id);
                report.matches.push(entry);
            }
            rounds.push(report);

            if let ([final_pairing], [champion]) = (pairings.as_slice(), winners.as_slice()) {
                let podium = Podium::from_final(final_pairing, *champion)?;
                return Ok((rounds, Some(podium)));
            }
            seeds = bracket.advance(&seeds, &winners)?;
            info!(round, remaining = seeds.len(), "bracket round complete");
            round += 1;
        }
    }

    /// Decide one pairing and report it to the store.
    fn play(
        &mut self,
        store: &mut MemoryStore,
        pairing: &Pairing,
        round: u32,
    ) -> anyhow::Result<MatchEntry> {
        let outcome = self.oracle.decide(pairing, round);
        if !outcome.matches(pairing) {
            bail!(
                "oracle {} returned {} over {} for {pairing}",
                self.oracle.name(),
                outcome.winner,
                outcome.loser
            );
        }
        store.report_match(round, outcome.winner, outcome.loser, outcome.points)?;
        match_entry(pairing, &outcome)
    }
}

fn match_entry(pairing: &Pairing, outcome: &Outcome) -> anyhow::Result<MatchEntry> {
    let side = |id: CompetitorId| -> anyhow::Result<Entrant> {
        [&pairing.first, &pairing.second]
            .into_iter()
            .find(|e| e.id == id)
            .cloned()
            .with_context(|| format!("{id} not in {pairing}"))
    };
    Ok(MatchEntry {
        winner: side(outcome.winner)?,
        loser: side(outcome.loser)?,
        winner_points: outcome.points.winner,
        loser_points: outcome.points.loser,
    })
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod runner_tests;
