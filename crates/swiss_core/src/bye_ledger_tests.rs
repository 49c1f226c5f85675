use super::*;
use crate::types::{MatchRecord, TournamentId};

const T: TournamentId = TournamentId(1);

fn id(n: u32) -> CompetitorId {
    CompetitorId(n)
}

#[test]
fn test_award_and_consume() {
    let mut ledger = ByeLedger::new();
    ledger.award(id(3), 1);

    assert!(ledger.holds(id(3)));
    let credit = ledger.consume(id(3)).unwrap();
    assert_eq!(credit.round_awarded, 1);
    assert!(!ledger.holds(id(3)));
    assert!(ledger.consume(id(3)).is_none());
}

#[test]
fn test_one_credit_per_competitor() {
    let mut ledger = ByeLedger::new();
    ledger.award(id(3), 1);
    ledger.award(id(3), 4);

    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.get(id(3)).unwrap().round_awarded, 4);
}

#[test]
fn test_iter_most_recent_first() {
    let mut ledger = ByeLedger::new();
    ledger.award(id(1), 1);
    ledger.award(id(2), 2);
    ledger.award(id(3), 3);

    let order: Vec<_> = ledger.iter().map(|c| c.competitor).collect();
    assert_eq!(order, vec![id(3), id(2), id(1)]);
}

#[test]
fn test_earliest_among_prefers_oldest_award() {
    let mut ledger = ByeLedger::new();
    ledger.award(id(1), 1);
    ledger.award(id(2), 2);
    ledger.award(id(3), 3);

    let candidates = [id(9), id(3), id(2)];
    assert_eq!(ledger.earliest_among(&candidates), Some(2));

    let candidates = [id(9), id(3), id(1)];
    assert_eq!(ledger.earliest_among(&candidates), Some(2));

    // First position is a valid answer too
    let candidates = [id(1), id(9)];
    assert_eq!(ledger.earliest_among(&candidates), Some(0));

    assert_eq!(ledger.earliest_among(&[id(7), id(8)]), None);
}

#[test]
fn test_from_history_skips_credits_already_used() {
    let history: MatchHistory = vec![
        MatchRecord::bye(T, 1, id(1)),
        MatchRecord::new(T, 1, id(2), id(3)),
        MatchRecord::new(T, 2, id(1), id(2)),
        MatchRecord::bye(T, 2, id(3)),
    ]
    .into();

    let ledger = ByeLedger::from_history(&history);
    assert!(!ledger.holds(id(1)));
    assert!(ledger.holds(id(3)));
    assert_eq!(ledger.len(), 1);
}

#[test]
fn test_collect_sorts_by_round() {
    let ledger: ByeLedger = vec![
        ByeCredit {
            competitor: id(1),
            round_awarded: 1,
        },
        ByeCredit {
            competitor: id(2),
            round_awarded: 3,
        },
        ByeCredit {
            competitor: id(3),
            round_awarded: 2,
        },
    ]
    .into_iter()
    .collect();

    let order: Vec<_> = ledger.iter().map(|c| c.competitor).collect();
    assert_eq!(order, vec![id(2), id(3), id(1)]);
}

#[test]
fn test_deserialize_restores_invariants() {
    // Oldest first, with a stale duplicate credit for 4
    let json = r#"[
        {"competitor": 4, "round_awarded": 1},
        {"competitor": 5, "round_awarded": 2},
        {"competitor": 4, "round_awarded": 3}
    ]"#;
    let ledger: ByeLedger = serde_json::from_str(json).unwrap();

    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.get(id(4)).unwrap().round_awarded, 3);
    let order: Vec<_> = ledger.iter().map(|c| c.competitor).collect();
    assert_eq!(order, vec![id(4), id(5)]);

    let back = serde_json::to_string(&ledger).unwrap();
    let again: ByeLedger = serde_json::from_str(&back).unwrap();
    assert_eq!(again, ledger);
}
