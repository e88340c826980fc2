//! Error taxonomy for store, negotiation and query operations.
//!
//! Every variant is recoverable by the caller; none is fatal to the process.
//! `NotModified` is a control-flow short-circuit rather than a failure, but it
//! travels the same `?` path so lock guards are released on the way out.

use crate::types::{RecordKey, VersionTag};

/// Errors raised by kernel operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KernelError {
    /// Requested record is absent.
    #[error("Record not found: {0}")]
    NotFound(RecordKey),

    /// A presented version tag matches the current one.
    #[error("Not modified: {0}")]
    NotModified(VersionTag),

    /// Request body could not be turned into a record graph.
    #[error("Bad input: {0}")]
    BadInput(String),

    /// Query text could not be parsed.
    #[error("Bad query: {0}")]
    BadQuery(String),

    /// A record with this key is already stored.
    #[error("Record already exists: {0}")]
    AlreadyExists(RecordKey),

    /// A bounded lock wait expired. Retryable.
    #[error("Timed out waiting for store lock")]
    LockTimeout,
}

impl KernelError {
    /// Machine-readable error code, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::NotModified(_) => "NOT_MODIFIED",
            Self::BadInput(_) => "BAD_INPUT",
            Self::BadQuery(_) => "BAD_QUERY",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::LockTimeout => "LOCK_TIMEOUT",
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockTimeout)
    }
}

/// Result alias for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
