//! Error taxonomy for the pairing and bracket engine.

use thiserror::Error;

use crate::types::CompetitorId;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("standings contain competitor {0} more than once")]
    DuplicateCompetitor(CompetitorId),

    #[error("no competitors to pair")]
    EmptyStandings,

    #[error("bracket needs a power-of-two field, got {0} entrants")]
    BracketSize(usize),

    #[error("bracket results do not match the round: {0}")]
    BracketResult(String),

    #[error(
        "no rematch-free pairing for the {wins}-win group of {group_size} after {reshuffles} reshuffles"
    )]
    PairingInfeasible {
        wins: u32,
        group_size: usize,
        reshuffles: u32,
    },
}

impl EngineError {
    /// Whether the caller can retry the round, e.g. by allowing rematches.
    /// Everything else is a data-integrity problem on the caller's side.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::PairingInfeasible { .. })
    }
}
