//! Error types for the Kurama core library.

use thiserror::Error;

/// Top-level error type for all Kurama core operations.
///
/// Every mutating operation that returns one of these leaves the store or
/// registry exactly as it was before the call.
#[derive(Error, Debug)]
pub enum KuramaError {
    /// The record store could not grow its backing allocation.
    #[error("Record store allocation failed (capacity: {capacity}, requested: {requested})")]
    AllocationFailure {
        /// Capacity before the failed growth.
        capacity: usize,
        /// Capacity that was requested.
        requested: usize,
    },

    /// No record or processor matched the lookup key.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The processor registry is full.
    #[error("Processor registry capacity exceeded (limit: {limit})")]
    CapacityExceeded {
        /// Maximum number of processors.
        limit: usize,
    },

    /// A required argument was empty.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A processor's activation hook refused to start it.
    #[error("Processor '{name}' failed to activate: {reason}")]
    ActivationFailed {
        /// Processor name.
        name: String,
        /// Reason reported by the hook.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, KuramaError>;
