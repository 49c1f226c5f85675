use super::*;
use crate::types::CompetitorId;
use std::collections::HashSet;

const T: TournamentId = TournamentId(1);

fn id(n: u32) -> CompetitorId {
    CompetitorId(n)
}

fn snap(n: u32, wins: u32) -> CompetitorSnapshot {
    CompetitorSnapshot::new(id(n), format!("Player {n}"), wins, wins)
}

fn engine(seed: u64) -> PairingEngine<StdRng> {
    PairingEngine::seeded(T, PairingConfig::default(), seed)
}

fn placed_ids(round: &RoundPairings) -> Vec<CompetitorId> {
    let mut ids: Vec<_> = round.pairings.iter().flat_map(Pairing::ids).collect();
    ids.extend(round.bye.iter().map(|b| b.winner));
    ids.sort();
    ids
}

fn has_pair(round: &RoundPairings, a: u32, b: u32) -> bool {
    round.pairings.iter().any(|p| p.is_between(id(a), id(b)))
}

#[test]
fn test_four_fresh_players() {
    let standings: Vec<_> = (1..=4).map(|n| snap(n, 0)).collect();
    let round = engine(1)
        .next_round_pairings(&standings, &MatchHistory::new(), &ByeLedger::new())
        .unwrap();

    assert_eq!(round.pairings.len(), 2);
    assert!(round.bye.is_none());
    assert_eq!(placed_ids(&round), vec![id(1), id(2), id(3), id(4)]);
}

#[test]
fn test_lone_leader_gets_bye() {
    let standings = vec![snap(5, 1), snap(1, 0), snap(2, 0), snap(3, 0), snap(4, 0)];
    let round = engine(2)
        .next_round_pairings(&standings, &MatchHistory::new(), &ByeLedger::new())
        .unwrap();

    assert_eq!(round.pairings.len(), 2);
    for p in &round.pairings {
        assert!(!p.involves(id(5)));
    }
    let bye = round.bye.as_ref().unwrap();
    assert_eq!(bye.winner, id(5));
    assert!(bye.is_bye());
    assert_eq!(bye.round, 1);
    assert!(round.ledger.holds(id(5)));
}

#[test]
fn test_odd_group_carries_leftover_up() {
    let standings = vec![
        snap(4, 1),
        snap(5, 1),
        snap(6, 1),
        snap(1, 0),
        snap(2, 0),
        snap(3, 0),
    ];

    for seed in 0..20 {
        let round = engine(seed)
            .next_round_pairings(&standings, &MatchHistory::new(), &ByeLedger::new())
            .unwrap();

        assert_eq!(round.pairings.len(), 3);
        assert!(round.bye.is_none());
        // The carried player meets the first member of the 1-win group
        assert!(has_pair(&round, 4, 2) || has_pair(&round, 4, 3));
        assert!(has_pair(&round, 5, 6));
    }
}

#[test]
fn test_carried_player_prefers_credit_holder() {
    let standings = vec![
        snap(4, 1),
        snap(5, 1),
        snap(6, 1),
        snap(1, 0),
        snap(2, 0),
        snap(3, 0),
    ];
    let mut ledger = ByeLedger::new();
    ledger.award(id(6), 1);

    let round = engine(3)
        .next_round_pairings(&standings, &MatchHistory::new(), &ledger)
        .unwrap();

    assert!(has_pair(&round, 6, 2) || has_pair(&round, 6, 3));
    assert!(has_pair(&round, 4, 5));
    assert!(!round.ledger.holds(id(6)));
}

#[test]
fn test_bye_after_carry_into_top_group() {
    let standings = vec![
        snap(4, 1),
        snap(5, 1),
        snap(6, 1),
        snap(7, 1),
        snap(1, 0),
        snap(2, 0),
        snap(3, 0),
    ];
    let round = engine(4)
        .next_round_pairings(&standings, &MatchHistory::new(), &ByeLedger::new())
        .unwrap();

    assert_eq!(round.pairings.len(), 3);
    let bye = round.bye.as_ref().unwrap();
    assert!([5, 6, 7].contains(&bye.winner.0));
    assert_eq!(round.placed(), 7);
}

#[test]
fn test_credit_holder_chosen_as_opponent() {
    let standings: Vec<_> = (1..=4).map(|n| snap(n, 1)).collect();
    let mut ledger = ByeLedger::new();
    ledger.award(id(3), 2);
    ledger.award(id(4), 1);

    let round = engine(5)
        .next_round_pairings(&standings, &MatchHistory::new(), &ledger)
        .unwrap();

    // Earliest award wins the priority
    assert!(has_pair(&round, 1, 4));
    assert!(has_pair(&round, 2, 3));
    assert!(!round.ledger.holds(id(4)));
    // 2 picked 3 as its only remaining choice, which also used the credit
    assert!(round.ledger.is_empty());
}

#[test]
fn test_credit_holder_not_forced_into_rematch() {
    let standings: Vec<_> = (1..=4).map(|n| snap(n, 1)).collect();
    let history: MatchHistory = vec![MatchRecord::new(T, 1, id(1), id(3))].into();
    let mut ledger = ByeLedger::new();
    ledger.award(id(3), 1);

    for seed in 0..20 {
        let round = engine(seed)
            .next_round_pairings(&standings, &history, &ledger)
            .unwrap();
        assert!(!has_pair(&round, 1, 3));
        assert_eq!(placed_ids(&round), vec![id(1), id(2), id(3), id(4)]);
    }
}

#[test]
fn test_no_rematch_single_solution() {
    // Only 1-4 / 2-3 is rematch-free
    let history: MatchHistory = vec![
        MatchRecord::new(T, 1, id(1), id(2)),
        MatchRecord::new(T, 1, id(3), id(4)),
        MatchRecord::new(T, 2, id(1), id(3)),
        MatchRecord::new(T, 2, id(2), id(4)),
    ]
    .into();
    // 2 leads and has a single legal opponent
    let standings = vec![snap(2, 2), snap(1, 2), snap(3, 2), snap(4, 2)];

    for seed in 0..50 {
        let round = engine(seed)
            .next_round_pairings(&standings, &history, &ByeLedger::new())
            .unwrap();
        assert!(has_pair(&round, 1, 4), "seed {seed}");
        assert!(has_pair(&round, 2, 3), "seed {seed}");
    }
}

#[test]
fn test_dead_end_recovered_by_reshuffle() {
    // 1 drawing 2 leaves 3-4, a rematch, so that attempt has to be thrown away
    let history: MatchHistory = vec![MatchRecord::new(T, 1, id(3), id(4))].into();
    let standings = vec![snap(1, 1), snap(2, 1), snap(3, 1), snap(4, 1)];

    for seed in 0..50 {
        let round = engine(seed)
            .next_round_pairings(&standings, &history, &ByeLedger::new())
            .unwrap();
        assert!(!has_pair(&round, 3, 4), "seed {seed}");
        assert!(!has_pair(&round, 1, 2), "seed {seed}");
        assert_eq!(placed_ids(&round), vec![id(1), id(2), id(3), id(4)]);
    }
}

#[test]
fn test_infeasible_pair_reported() {
    let standings = vec![snap(1, 1), snap(2, 1)];
    let history: MatchHistory = vec![MatchRecord::new(T, 1, id(1), id(2))].into();
    let config = PairingConfig {
        max_reshuffles: 5,
        ..Default::default()
    };
    let mut engine = PairingEngine::seeded(T, config, 7);

    let err = engine
        .next_round_pairings(&standings, &history, &ByeLedger::new())
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::PairingInfeasible {
            wins: 1,
            group_size: 2,
            reshuffles: 5,
        }
    );
    assert!(err.is_recoverable());
    assert_eq!(engine.round(), 1, "failed round does not advance");

    engine.set_rematch_policy(RematchPolicy::Allow);
    let round = engine
        .next_round_pairings(&standings, &history, &ByeLedger::new())
        .unwrap();
    assert!(has_pair(&round, 1, 2));
    assert_eq!(engine.round(), 2);
}

#[test]
fn test_duplicate_and_empty_standings() {
    let mut engine = engine(8);
    assert_eq!(
        engine.next_round_pairings(&[], &MatchHistory::new(), &ByeLedger::new()),
        Err(EngineError::EmptyStandings)
    );

    let standings = vec![snap(1, 0), snap(2, 0), snap(1, 0)];
    let err = engine
        .next_round_pairings(&standings, &MatchHistory::new(), &ByeLedger::new())
        .unwrap_err();
    assert_eq!(err, EngineError::DuplicateCompetitor(id(1)));
    assert!(!err.is_recoverable());
}

#[test]
fn test_round_counter_and_bye_round() {
    let standings = vec![snap(1, 0), snap(2, 0), snap(3, 0)];
    let mut engine = engine(9).starting_at(4);

    let round = engine
        .next_round_pairings(&standings, &MatchHistory::new(), &ByeLedger::new())
        .unwrap();
    assert_eq!(round.round, 4);
    let bye = round.bye.unwrap();
    assert_eq!(bye.round, 4);
    assert_eq!(round.ledger.get(bye.winner).unwrap().round_awarded, 4);
    assert_eq!(engine.round(), 5);
}

#[test]
fn test_every_competitor_placed_once() {
    for size in 1..=17u32 {
        let standings: Vec<_> = (1..=size).map(|n| snap(n, n % 3)).collect();
        let round = engine(u64::from(size))
            .next_round_pairings(&standings, &MatchHistory::new(), &ByeLedger::new())
            .unwrap();

        let ids = placed_ids(&round);
        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(ids.len(), size as usize);
        assert_eq!(unique.len(), size as usize);
        assert_eq!(round.bye.is_some(), size % 2 == 1);
    }
}

#[test]
fn test_carried_player_without_legal_opponent() {
    // 1, 2 and 3 have each met both 4 and 5, so whoever is carried up
    // from the 0-win group cannot be placed without a rematch.
    let standings = vec![snap(4, 1), snap(5, 1), snap(1, 0), snap(2, 0), snap(3, 0)];
    let history: MatchHistory = [1, 2, 3]
        .into_iter()
        .flat_map(|low| {
            [
                MatchRecord::new(T, 1, id(4), id(low)),
                MatchRecord::new(T, 2, id(5), id(low)),
            ]
        })
        .collect();
    let config = PairingConfig {
        max_reshuffles: 8,
        ..Default::default()
    };
    let mut engine = PairingEngine::seeded(T, config, 11);

    let err = engine
        .next_round_pairings(&standings, &history, &ByeLedger::new())
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::PairingInfeasible {
            wins: 1,
            group_size: 2,
            reshuffles: 8,
        }
    );
    assert_eq!(engine.round(), 1);

    engine.set_rematch_policy(RematchPolicy::Allow);
    let round = engine
        .next_round_pairings(&standings, &history, &ByeLedger::new())
        .unwrap();
    assert_eq!(placed_ids(&round), vec![id(1), id(2), id(3), id(4), id(5)]);
    assert_eq!(round.pairings.len(), 2);
    let bye = round.bye.unwrap();
    assert!(bye.winner == id(4) || bye.winner == id(5));
    assert_eq!(engine.round(), 2);
}

#[test]
fn test_other_tournament_meetings_ignored() {
    let standings = vec![snap(1, 0), snap(2, 0)];
    let history: MatchHistory = vec![MatchRecord::new(TournamentId(2), 1, id(1), id(2))].into();

    let round = engine(12)
        .next_round_pairings(&standings, &history, &ByeLedger::new())
        .unwrap();
    assert!(has_pair(&round, 1, 2));

    // The same meeting inside this tournament still blocks the pair
    let own: MatchHistory = vec![MatchRecord::new(T, 1, id(1), id(2))].into();
    assert!(engine(12)
        .next_round_pairings(&standings, &own, &ByeLedger::new())
        .is_err());
}
