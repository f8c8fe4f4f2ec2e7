use thiserror::Error;

/// Custom error types for the scaffold service
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Database related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rate limiting errors
    #[error("Rate limit exceeded for identifier: {0}")]
    RateLimitExceeded(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Result type for scaffold service operations
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

impl From<serde_json::Error> for ScaffoldError {
    fn from(err: serde_json::Error) -> Self {
        ScaffoldError::Internal(err.to_string())
    }
}
