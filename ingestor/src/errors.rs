//! Error types for the ingestor.

use thiserror::Error;

/// Failure reported by a firehose transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that end the ingestion loop.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The firehose reported a failure. Fatal; restarting is left to the
    /// process supervisor.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Subscribing to the firehose failed.
    #[error("Subscription error: {0}")]
    Subscription(String),
}

impl IngestError {
    /// Create a subscription error.
    pub fn subscription(msg: impl Into<String>) -> Self {
        Self::Subscription(msg.into())
    }
}
