//! Error handling types for razor-tokens
//!
//! Only caller mistakes and internal defects are errors. "Not available yet"
//! outcomes (embedded ranges out of sync, cache misses) are modelled as
//! `Option`/enum return values instead.

use std::sync::PoisonError;
use thiserror::Error;

/// Error type for semantic token operations
#[derive(Debug, Error)]
pub enum SemanticError {
    /// The caller passed an argument that violates the operation's contract
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// The request was cancelled through its cancellation token
    #[error("Operation cancelled: {stage}")]
    Cancelled { stage: &'static str },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal invariant was broken
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for semantic token operations
pub type SemanticResult<T> = Result<T, SemanticError>;

/// Helper trait for recovering guards from poisoned locks
pub trait LockResultExt<T> {
    /// Recover the guard from a poisoned lock, logging which operation hit it.
    fn recover_poison(self, context: &str) -> Result<T, SemanticError>;
}

impl<T> LockResultExt<T> for Result<T, PoisonError<T>> {
    fn recover_poison(self, context: &str) -> Result<T, SemanticError> {
        match self {
            Ok(guard) => Ok(guard),
            Err(poisoned) => {
                log::warn!(
                    target: "razor_tokens::lock_recovery",
                    "Recovered from poisoned lock in {}",
                    context
                );
                Ok(poisoned.into_inner())
            }
        }
    }
}

impl SemanticError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        SemanticError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        SemanticError::Config {
            message: message.into(),
        }
    }

    /// Create a cancellation error for the given checkpoint
    pub fn cancelled(stage: &'static str) -> Self {
        SemanticError::Cancelled { stage }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        SemanticError::Internal(message.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SemanticError::Cancelled { .. })
    }
}
