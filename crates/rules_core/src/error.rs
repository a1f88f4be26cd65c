//! Error types for rule sets and notification.

use thiserror::Error;

/// Result type for rule engine operations.
pub type Result<T> = std::result::Result<T, RulesError>;

/// Main error type for rule engine operations.
#[derive(Error, Debug)]
pub enum RulesError {
    /// An operation received an argument of the wrong shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A notifier failed while reporting a validation failure
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl RulesError {
    /// Creates a new invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Error returned by a notifier.
#[derive(Error, Debug)]
#[error("Notifier failed: {message}")]
pub struct NotifyError {
    message: String,
}

impl NotifyError {
    /// Creates a new notifier error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
