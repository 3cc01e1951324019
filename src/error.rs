//! LinkHub error types

use thiserror::Error;

/// LinkHub error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable preference storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Remote preference sync error
    #[error("Remote sync error: {0}")]
    Remote(String),

    /// Confirmation surface error
    #[error("Confirmation error: {0}")]
    Confirmation(String),

    /// Feed loading error
    #[error("Feed error: {0}")]
    Feed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for LinkHub operations
pub type Result<T> = std::result::Result<T, Error>;
