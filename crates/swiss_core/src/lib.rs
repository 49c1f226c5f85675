//! Pairing and bracket engine for Swiss-system tournaments.
//!
//! Everything here is a pure computation over snapshots the caller supplies:
//! - [`PairingEngine`] pairs each Swiss round within win groups, honouring
//!   bye credits and refusing rematches
//! - [`CutoffResolver`] picks the qualifiers for the elimination stage
//! - [`next_bracket_round`] and [`advance`] run the single-elimination bracket
//!
//! Results (pairings, bye records, updated credits, rankings) are returned
//! for the caller to persist; nothing is written from here.

pub mod bracket;
pub mod bye_ledger;
pub mod cutoff;
pub mod error;
pub mod history;
pub mod pairing;
pub mod schedule;
pub mod standings;
pub mod types;

pub use bracket::*;
pub use bye_ledger::ByeLedger;
pub use cutoff::*;
pub use error::{EngineError, Result};
pub use history::MatchHistory;
pub use pairing::*;
pub use schedule::*;
pub use standings::*;
pub use types::*;
