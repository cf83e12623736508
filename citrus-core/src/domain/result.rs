//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a gateway error
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// How a mutation resolved.
///
/// Guest-mode operations never raise on a missing target; they report it here
/// instead so callers (and tests) can still observe what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The operation ran and the ledger reflects it
    Applied,
    /// The target id did not resolve; nothing changed
    NotFound,
    /// The target exists but is immutable (built-in account type); nothing changed
    Rejected,
    /// The remote gateway failed; the failure was logged and the in-memory
    /// ledger was left as last-known-good
    RemoteFailed,
}

impl MutationOutcome {
    /// True when the ledger was actually modified
    pub fn applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_applied() {
        assert!(MutationOutcome::Applied.applied());
        assert!(!MutationOutcome::NotFound.applied());
        assert!(!MutationOutcome::RemoteFailed.applied());
    }

    #[test]
    fn test_error_display() {
        let err = Error::validation("amount must be positive");
        assert!(err.to_string().contains("Validation error"));
    }
}
