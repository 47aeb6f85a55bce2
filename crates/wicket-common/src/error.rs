//! Common error types for Wicket components.

use thiserror::Error;

/// Common errors across Wicket components
#[derive(Debug, Error)]
pub enum WicketError {
    /// Configuration error (missing/malformed key, bad catalog)
    #[error("Configuration error: {0}")]
    Config(String),

    /// State store connection/operation error
    #[error("Store error: {0}")]
    Store(String),

    /// Stored answer token is malformed (not `iv:cipher` hex)
    #[error("Malformed answer token: {0}")]
    CryptoFormat(String),

    /// Decryption failed (wrong key or corrupted token)
    #[error("Decryption error: {0}")]
    Crypto(String),

    /// Question set ID does not exist in the catalog
    #[error("Unknown question set: {0}")]
    UnknownQuestionSet(String),

    /// Invalid input/request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WicketError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Config(_) => 500,
            Self::Store(_) => 503,
            Self::CryptoFormat(_) => 500,
            Self::Crypto(_) => 500,
            Self::UnknownQuestionSet(_) => 404,
            Self::InvalidInput(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Returns true if this error should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Returns true if this error is an operator/system fault rather than
    /// a user mistake. System faults are never counted against the rate
    /// limiter.
    pub fn is_system_fault(&self) -> bool {
        !matches!(self, Self::InvalidInput(_))
    }
}
