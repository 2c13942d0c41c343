//! Closed error taxonomy for the core (see design §7).
//!
//! Every failure mode the pipeline can hit is translated into one of these
//! variants and handled according to the policy table in the specification;
//! nothing propagates across the request boundary as a panic or an
//! unhandled exception.

/// Crate-local result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// The closed set of error kinds the core can produce.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input failed sanitization in a way that could not be auto-corrected.
    #[error("input validation failed: {0}")]
    InputValidation(String),

    /// The LLM backend could not be reached (connection, timeout, non-2xx).
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The LLM backend responded but the payload did not match the expected shape.
    #[error("backend returned a malformed response: {0}")]
    BackendMalformed(String),

    /// The Arbiter's judge call returned something that could not be parsed as a score.
    #[error("failed to parse judge output: {0}")]
    ParseError(String),

    /// Persisted state could not be read or written.
    #[error("state I/O error at {path}: {source}")]
    StateIOError {
        /// Path that failed.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A CFIA shard split could not be completed.
    #[error("CFIA split failed for shard {shard}: {reason}")]
    CFIASplitError {
        /// Shard that failed to split.
        shard: String,
        /// Human-readable cause.
        reason: String,
    },

    /// An invariant documented in §3.2/§8 was violated; the request is aborted
    /// without mutating persistent state.
    #[error("invariant violation: {0}")]
    Inconsistency(String),

    /// JSON (de)serialization failure, folded into `StateIOError`'s sibling
    /// for persistence-adjacent (de)serialization that isn't itself an I/O error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether a retry is worth attempting for this error, per the retry
    /// policy in design §5/§9.1. Only transient backend errors are
    /// recoverable; validation, parse, and invariant failures are not.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::BackendUnavailable(_) | Error::BackendMalformed(_))
    }
}
