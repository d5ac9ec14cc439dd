//! Error types for scanlogin.

use thiserror::Error;

/// Primary error type for all login operations.
///
/// Cloneable because a failure is carried inside the terminal
/// [`LoginOutcome`](crate::machine::LoginOutcome) event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    #[error("Login timed out after {0}ms")]
    Timeout(u64),

    #[error("QR code expired: {0}")]
    Expired(String),

    #[error("Login cancelled")]
    Cancelled,

    #[error("Credential exchange failed: {0}")]
    Exchange(String),

    #[error("Invalid target identity: {0}")]
    InvalidTargetIdentity(String),

    #[error("A login session is already active")]
    AlreadyActive,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Broad error category for routing user messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connectivity,
    Timeout,
    RemoteRejection,
    Exchange,
    Validation,
    Configuration,
}

impl LoginError {
    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Connectivity(_) => ErrorCategory::Connectivity,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Expired(_) | Self::Cancelled => ErrorCategory::RemoteRejection,
            Self::Exchange(_) => ErrorCategory::Exchange,
            Self::InvalidTargetIdentity(_) | Self::AlreadyActive => ErrorCategory::Validation,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }

    /// Whether starting a fresh login attempt may succeed.
    ///
    /// Advice for the human caller only; nothing in this crate retries these.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Connectivity | ErrorCategory::Timeout
        )
    }
}

impl From<reqwest::Error> for LoginError {
    fn from(error: reqwest::Error) -> Self {
        Self::Connectivity(error.to_string())
    }
}

impl From<toml::de::Error> for LoginError {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration(error.to_string())
    }
}

impl From<std::io::Error> for LoginError {
    fn from(error: std::io::Error) -> Self {
        Self::Configuration(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, LoginError>;
