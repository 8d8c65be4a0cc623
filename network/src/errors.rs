//! Error types for graph operations.

use std::fmt;

use thiserror::Error;

use crate::types::PeerId;

/// Which side of an edge an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Source => write!(f, "source"),
            Endpoint::Target => write!(f, "target"),
        }
    }
}

/// Errors that can occur while mutating or encoding a graph.
#[derive(Error, Debug)]
pub enum GraphError {
    /// An edge referenced a peer that was never added as a node.
    #[error("{endpoint} peer {peer} not found")]
    NotFound { endpoint: Endpoint, peer: PeerId },

    /// Writing the serialized graph failed.
    #[error("Encode error: {0}")]
    EncodeError(String),
}

impl GraphError {
    /// Create a not-found error for the source side of an edge.
    pub fn source_not_found(peer: &PeerId) -> Self {
        Self::NotFound {
            endpoint: Endpoint::Source,
            peer: peer.clone(),
        }
    }

    /// Create a not-found error for the target side of an edge.
    pub fn target_not_found(peer: &PeerId) -> Self {
        Self::NotFound {
            endpoint: Endpoint::Target,
            peer: peer.clone(),
        }
    }

    /// Create an encode error.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::EncodeError(msg.into())
    }

    /// Returns true if this error is a missing-node error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::EncodeError(err.to_string())
    }
}

impl From<std::io::Error> for GraphError {
    fn from(err: std::io::Error) -> Self {
        Self::EncodeError(err.to_string())
    }
}
