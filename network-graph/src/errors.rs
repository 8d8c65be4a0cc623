//! Error types for the network graph service.

use ingestor::IngestError;
use thiserror::Error;

/// Errors that can stop the service.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The HTTP server failed.
    #[error("Server error: {0}")]
    ServerError(#[from] std::io::Error),

    /// The ingestor stopped with an error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),

    /// A process group member panicked or was cancelled.
    #[error("Task error: {0}")]
    TaskError(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskError(err.to_string())
    }
}
