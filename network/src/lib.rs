//! # Network
//!
//! In-memory directed graph of "who talks to whom" between network peers.
//!
//! Nodes are keyed by [`PeerId`] and carry an optional label. Edges are
//! directed and count the interactions observed from source to target.
//!
//! ## Modules
//!
//! - [`graph`]: The [`Graph`] capability trait and the [`NetworkGraph`] store
//! - [`types`]: Peer identities and the serialized node/edge model
//! - [`dot`]: DOT rendering of a graph snapshot
//! - [`errors`]: Error types for graph operations
//!
//! ## Example
//!
//! ```
//! use network::{Graph, NetworkGraph, PeerId};
//!
//! let graph = NetworkGraph::new();
//! let router = PeerId::from("10.0.16.4");
//! let cell = PeerId::from("10.0.32.7");
//!
//! graph.add_node(&router, "router/0");
//! graph.add_node(&cell, "");
//! graph.add_edge(&router, &cell).unwrap();
//!
//! assert_eq!(graph.edge(&router, &cell), Some(1));
//! ```

pub mod dot;
pub mod errors;
pub mod graph;
pub mod types;

pub use errors::{Endpoint, GraphError};
pub use graph::{Graph, NetworkGraph};
pub use types::{Edge, GraphSnapshot, Node, PeerId};
