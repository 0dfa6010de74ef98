use thiserror::Error;

/// Unified error type for changebot operations
#[derive(Error, Debug)]
pub enum ChangebotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bump marker error: {0}")]
    Marker(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed API response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Changelog generator exited with code {code}: {stderr}")]
    Generator { code: i32, stderr: String },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in changebot
pub type Result<T> = std::result::Result<T, ChangebotError>;

impl ChangebotError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ChangebotError::Config(msg.into())
    }

    /// Create a bump marker error with context
    pub fn marker(msg: impl Into<String>) -> Self {
        ChangebotError::Marker(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ChangebotError::Version(msg.into())
    }

    /// Create an API error from a response status and message
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        ChangebotError::Api {
            status,
            message: msg.into(),
        }
    }
}
