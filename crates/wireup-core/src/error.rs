//! Error types for wireup

use thiserror::Error;

/// Core error type for wireup operations
#[derive(Error, Debug)]
pub enum WireupError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Producer error: {0}")]
    Producer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for wireup operations
pub type Result<T> = std::result::Result<T, WireupError>;
