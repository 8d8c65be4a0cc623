//! Peer identities and the node/edge model.
//!
//! The same types back the live store and its JSON encoding, so a decoded
//! [`GraphSnapshot`] has exactly the shape `NetworkGraph::encode_json` wrote.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a peer in the graph, usually an IP address.
///
/// Compared by exact string equality; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PeerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A directed edge and the number of interactions seen along it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub count: u64,
    /// Occurrences per HTTP status code. Reserved, never populated by ingestion.
    #[serde(default)]
    pub status_codes: HashMap<i32, u64>,
}

impl Edge {
    fn observed_once() -> Self {
        Self {
            count: 1,
            status_codes: HashMap::new(),
        }
    }

    /// Record one more interaction, saturating at `u64::MAX`.
    pub(crate) fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }
}

/// A peer and its outgoing edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Human readable label such as `router/2`. Empty when unknown.
    #[serde(rename = "id")]
    pub label: String,
    pub outgoing: BTreeMap<PeerId, Edge>,
}

impl Node {
    pub(crate) fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            outgoing: BTreeMap::new(),
        }
    }

    /// Increment the edge to `target`, creating it with a count of one.
    pub(crate) fn record_edge(&mut self, target: &PeerId) {
        match self.outgoing.get_mut(target) {
            Some(edge) => edge.increment(),
            None => {
                self.outgoing.insert(target.clone(), Edge::observed_once());
            }
        }
    }
}

/// The full node table, as encoded to JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphSnapshot {
    pub nodes: BTreeMap<PeerId, Node>,
}

impl GraphSnapshot {
    /// Decode a snapshot previously produced by `encode_json`.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.outgoing.len()).sum()
    }

    /// Count on the edge `src -> target`, if it exists.
    pub fn edge(&self, src: &PeerId, target: &PeerId) -> Option<u64> {
        self.nodes
            .get(src)
            .and_then(|n| n.outgoing.get(target))
            .map(|e| e.count)
    }
}
