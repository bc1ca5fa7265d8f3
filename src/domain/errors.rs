//! Domain errors for the forage controller.

use thiserror::Error;

/// Domain-level errors that can occur while driving an arcade environment.
///
/// Budget exhaustion and a stopped environment are *not* errors; they are
/// terminal search outcomes. Only faults that make the requested operation
/// impossible land here.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Strategy '{name}' is invalid: {reason}")]
    InvalidStrategy { name: String, reason: String },

    #[error("Strategy catalog is empty")]
    EmptyCatalog,

    #[error("Lifecycle operation '{operation}' did not settle within {waited_ms}ms")]
    LifecycleTimeout { operation: String, waited_ms: u64 },

    #[error("No readable observation for the search baseline after {polls} polls")]
    BaselineUnavailable { polls: u32 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid search parameters: {0}")]
    InvalidParameters(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
