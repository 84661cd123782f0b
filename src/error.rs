//! Error types for the Alexandria lending engine

use thiserror::Error;

use crate::models::patron::PatronStatus;

/// Entity kinds referenced by lookup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Title,
    Specimen,
    Patron,
    Loan,
    Fine,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Entity::Title => "title",
            Entity::Specimen => "specimen",
            Entity::Patron => "patron",
            Entity::Loan => "loan",
            Entity::Fine => "fine",
        };
        write!(f, "{}", name)
    }
}

/// Business-rule failures. Expected conditions, returned as values and
/// mapped to a response by the request layer, never raised as faults.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("specimen is already on loan")]
    SpecimenOnLoan,

    #[error("no copies of this title are available")]
    NoCopiesAvailable,

    #[error("patron is not eligible to borrow (status: {0})")]
    PatronNotEligible(PatronStatus),

    #[error("loan limit exceeded ({count}/{limit})")]
    LoanLimitExceeded { count: usize, limit: usize },

    #[error("specimen is not currently on loan")]
    NotOnLoan,

    #[error("title still has registered specimens")]
    TitleHasSpecimens,

    #[error("patron has active loans")]
    PatronHasLoans,

    #[error("patron has an active fine")]
    PatronHasFine,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} with id {1} not found")]
    NotFound(Entity, i32),

    #[error("duplicate {0}")]
    Conflict(&'static str),

    #[error("business rule violation: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A store-level constraint fired that the pre-flight checks should
    /// have caught. Treated as a conflict by callers and rolls back the
    /// in-progress unit of work.
    #[error("integrity failure: {0}")]
    Integrity(String),
}

/// Result type alias for engine operations
pub type AppResult<T> = Result<T, AppError>;
