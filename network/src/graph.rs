//! The graph store.
//!
//! [`Graph`] is the capability the ingestor and the HTTP layer depend on.
//! [`NetworkGraph`] implements it over a single mutex guarding the whole
//! node table, so every operation, including encoding, observes and
//! produces a consistent graph.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, instrument};

use crate::dot;
use crate::errors::GraphError;
use crate::types::{GraphSnapshot, Node, PeerId};

/// Operations on a directed interaction graph.
///
/// Every method is safe to call concurrently from multiple tasks.
pub trait Graph: Send + Sync {
    /// Ensure a node for `id` exists.
    ///
    /// Returns `true` if the node was created, `false` if it already
    /// existed. An existing node with an empty label takes `label`; a
    /// non-empty label is never overwritten.
    fn add_node(&self, id: &PeerId, label: &str) -> bool;

    /// Record one interaction from `src` to `target`.
    ///
    /// Both peers must have been added as nodes first.
    fn add_edge(&self, src: &PeerId, target: &PeerId) -> Result<(), GraphError>;

    /// Serialize the node table as JSON.
    fn encode_json(&self) -> Result<Vec<u8>, GraphError>;

    /// Serialize the graph in DOT format.
    fn encode_dot(&self) -> Result<Vec<u8>, GraphError>;
}

/// Thread-safe in-memory graph of peers and their call counts.
#[derive(Debug, Default)]
pub struct NetworkGraph {
    inner: Mutex<GraphSnapshot>,
}

impl NetworkGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // Mutations finish before anything that can panic runs, so the table is
    // never left half-updated and a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, GraphSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.lock().node_count()
    }

    /// Number of distinct directed edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.lock().edge_count()
    }

    /// Label of `id`, or `None` if the node does not exist.
    pub fn label(&self, id: &PeerId) -> Option<String> {
        self.lock().nodes.get(id).map(|n| n.label.clone())
    }

    /// Count on the edge `src -> target`, if it exists.
    pub fn edge(&self, src: &PeerId, target: &PeerId) -> Option<u64> {
        self.lock().edge(src, target)
    }

    /// Copy of the whole graph taken under the lock.
    pub fn snapshot(&self) -> GraphSnapshot {
        self.lock().clone()
    }
}

impl Graph for NetworkGraph {
    fn add_node(&self, id: &PeerId, label: &str) -> bool {
        let mut graph = self.lock();

        if let Some(node) = graph.nodes.get_mut(id) {
            if node.label.is_empty() && !label.is_empty() {
                debug!(peer = %id, label = %label, "Filled label on existing node");
                node.label = label.to_string();
            }
            return false;
        }

        graph.nodes.insert(id.clone(), Node::new(label));
        debug!(peer = %id, label = %label, "Added node");
        true
    }

    fn add_edge(&self, src: &PeerId, target: &PeerId) -> Result<(), GraphError> {
        let mut graph = self.lock();

        // Source is reported first when both peers are missing.
        let target_known = graph.nodes.contains_key(target);
        let Some(node) = graph.nodes.get_mut(src) else {
            return Err(GraphError::source_not_found(src));
        };
        if !target_known {
            return Err(GraphError::target_not_found(target));
        }

        node.record_edge(target);

        Ok(())
    }

    #[instrument(skip(self))]
    fn encode_json(&self) -> Result<Vec<u8>, GraphError> {
        let graph = self.lock();
        let bytes = serde_json::to_vec(&*graph)?;
        debug!(
            nodes = graph.node_count(),
            bytes = bytes.len(),
            "Encoded graph as JSON"
        );
        Ok(bytes)
    }

    #[instrument(skip(self))]
    fn encode_dot(&self) -> Result<Vec<u8>, GraphError> {
        let graph = self.lock();
        let mut buf = Vec::new();
        dot::write_dot(&mut buf, &graph.nodes)?;
        debug!(
            nodes = graph.node_count(),
            bytes = buf.len(),
            "Encoded graph as DOT"
        );
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Endpoint;

    fn peer(id: &str) -> PeerId {
        PeerId::from(id)
    }

    #[test]
    fn test_add_node_returns_true_only_once() {
        let graph = NetworkGraph::new();
        let a = peer("10.0.0.1");

        assert!(graph.add_node(&a, "router/0"));
        assert!(!graph.add_node(&a, "router/0"));
        assert!(!graph.add_node(&a, ""));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_empty_label_is_filled_later() {
        let graph = NetworkGraph::new();
        let a = peer("10.0.0.1");

        graph.add_node(&a, "");
        assert_eq!(graph.label(&a), Some(String::new()));

        assert!(!graph.add_node(&a, "cell/3"));
        assert_eq!(graph.label(&a), Some("cell/3".to_string()));
    }

    #[test]
    fn test_first_non_empty_label_wins() {
        let graph = NetworkGraph::new();
        let a = peer("10.0.0.1");

        graph.add_node(&a, "L1");
        graph.add_node(&a, "L2");
        graph.add_node(&a, "");
        assert_eq!(graph.label(&a), Some("L1".to_string()));
    }

    #[test]
    fn test_add_edge_requires_both_nodes() {
        let graph = NetworkGraph::new();
        let a = peer("10.0.0.1");
        let b = peer("10.0.0.2");

        match graph.add_edge(&a, &b) {
            Err(GraphError::NotFound { endpoint, peer }) => {
                assert_eq!(endpoint, Endpoint::Source);
                assert_eq!(peer, a);
            }
            other => panic!("expected source not found, got {:?}", other),
        }

        graph.add_node(&a, "");
        match graph.add_edge(&a, &b) {
            Err(GraphError::NotFound { endpoint, peer }) => {
                assert_eq!(endpoint, Endpoint::Target);
                assert_eq!(peer, b);
            }
            other => panic!("expected target not found, got {:?}", other),
        }

        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_add_edge_missing_source_only() {
        let graph = NetworkGraph::new();
        let a = peer("10.0.0.1");
        let b = peer("10.0.0.2");
        graph.add_node(&b, "");

        let err = graph.add_edge(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            GraphError::NotFound {
                endpoint: Endpoint::Source,
                ..
            }
        ));
    }

    #[test]
    fn test_add_edge_counts() {
        let graph = NetworkGraph::new();
        let a = peer("10.0.0.1");
        let b = peer("10.0.0.2");
        graph.add_node(&a, "");
        graph.add_node(&b, "");

        graph.add_edge(&a, &b).unwrap();
        assert_eq!(graph.edge(&a, &b), Some(1));

        graph.add_edge(&a, &b).unwrap();
        graph.add_edge(&a, &b).unwrap();
        assert_eq!(graph.edge(&a, &b), Some(3));

        // Direction matters.
        assert_eq!(graph.edge(&b, &a), None);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_self_edge() {
        let graph = NetworkGraph::new();
        let a = peer("10.0.0.1");
        graph.add_node(&a, "");

        graph.add_edge(&a, &a).unwrap();
        assert_eq!(graph.edge(&a, &a), Some(1));
    }

    #[test]
    fn test_encode_json_shape() {
        let graph = NetworkGraph::new();
        let a = peer("10.0.0.1");
        let b = peer("10.0.0.2");
        graph.add_node(&a, "router/0");
        graph.add_node(&b, "");
        graph.add_edge(&a, &b).unwrap();

        let bytes = graph.encode_json().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["10.0.0.1"]["id"], "router/0");
        assert_eq!(value["10.0.0.1"]["outgoing"]["10.0.0.2"]["count"], 1);
        assert!(value["10.0.0.1"]["outgoing"]["10.0.0.2"]["status_codes"]
            .as_object()
            .unwrap()
            .is_empty());
        assert_eq!(value["10.0.0.2"]["id"], "");
        assert!(value["10.0.0.2"]["outgoing"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_encode_json_empty_graph() {
        let graph = NetworkGraph::new();
        assert_eq!(graph.encode_json().unwrap(), b"{}");
    }

    #[test]
    fn test_encode_json_round_trip() {
        let graph = NetworkGraph::new();
        let router = peer("10.0.16.4");
        let cell = peer("10.0.32.7");
        let uaa = peer("10.0.48.2");
        graph.add_node(&router, "router/0");
        graph.add_node(&cell, "cell/1");
        graph.add_node(&uaa, "");
        graph.add_edge(&router, &cell).unwrap();
        graph.add_edge(&router, &cell).unwrap();
        graph.add_edge(&cell, &uaa).unwrap();

        let decoded = GraphSnapshot::from_json(&graph.encode_json().unwrap()).unwrap();

        assert_eq!(decoded, graph.snapshot());
        assert_eq!(decoded.node_count(), 3);
        assert_eq!(decoded.edge(&router, &cell), Some(2));
        assert_eq!(decoded.edge(&cell, &uaa), Some(1));
        assert_eq!(decoded.nodes[&uaa].label, "");
    }

    #[test]
    fn test_encode_dot() {
        let graph = NetworkGraph::new();
        let a = peer("10.0.0.1");
        let b = peer("10.0.0.2");
        let c = peer("10.0.0.3");
        graph.add_node(&a, "router/0");
        graph.add_node(&b, "cell/0");
        graph.add_node(&c, "");
        graph.add_edge(&a, &b).unwrap();
        graph.add_edge(&a, &b).unwrap();
        graph.add_edge(&b, &c).unwrap();

        let dot = String::from_utf8(graph.encode_dot().unwrap()).unwrap();
        let lines: Vec<&str> = dot.lines().collect();

        assert_eq!(lines.first(), Some(&"digraph cfnetwork {"));
        assert_eq!(lines.last(), Some(&"}"));
        assert_eq!(lines.iter().filter(|l| l.contains("[label=\"")).count(), 4);
        assert_eq!(lines.iter().filter(|l| l.contains(" -> ")).count(), 2);
        assert!(lines.contains(&"    \"10.0.0.1\" [label=\"router/0\"];"));
        assert!(lines.contains(&"    \"10.0.0.2\" [label=\"cell/0\"];"));
        assert!(lines.contains(&"    \"10.0.0.1\" -> \"10.0.0.2\" [label=\"2\"];"));
        assert!(lines.contains(&"    \"10.0.0.2\" -> \"10.0.0.3\" [label=\"1\"];"));
        assert!(!dot.contains("\"10.0.0.3\" [label="));
    }

    #[test]
    fn test_graph_as_trait_object() {
        let graph: Box<dyn Graph> = Box::new(NetworkGraph::new());
        let a = peer("10.0.0.1");
        assert!(graph.add_node(&a, ""));
        assert!(graph.add_edge(&a, &a).is_ok());
    }
}
