//! Error types for plugbot

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for plugbot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in plugbot
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (fatal at startup)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Dispatch error (handler failed while serving an update)
    #[error("dispatch error: {0}")]
    Dispatch(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
