use thiserror::Error;

use crate::turn::RoundPhase;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// A pile was popped or peeked while empty and no recycle source was
    /// available. Given the closed-card-system invariant this points at an
    /// internal inconsistency, so callers treat it as fatal in debug builds.
    #[error("card pile is empty")]
    EmptyStack,
    /// Predicate-based extraction or cursor targeting found no match.
    #[error("no matching card or player was found")]
    NotFound,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("operation is not valid while the round is {0}")]
    WrongPhase(RoundPhase),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
