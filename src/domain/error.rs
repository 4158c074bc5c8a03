// Error taxonomy for the charge log
use thiserror::Error;

/// A submitted charge failed a precondition. Nothing was stored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A state-of-charge value fell outside 0-100.
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },

    /// A session must end with more charge than it started with.
    #[error("endPercent ({end}) must be greater than startPercent ({start})")]
    EndNotAboveStart { start: f64, end: f64 },
}

/// All failures an operation on the charge log can surface.
#[derive(Error, Debug)]
pub enum ChargeLogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No record with the given id exists in the store.
    #[error("no charge record with id {0}")]
    NotFound(String),

    /// The record store could not complete the operation. Retryable.
    #[error("record store failure: {0}")]
    Store(#[source] anyhow::Error),
}
