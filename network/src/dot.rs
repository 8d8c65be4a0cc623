//! DOT rendering for the node table.
//!
//! Output shape:
//!
//! ```text
//! digraph cfnetwork {
//!     "10.0.16.4" [label="router/0"];
//!     "10.0.16.4" -> "10.0.32.7" [label="3"];
//! }
//! ```

use std::collections::BTreeMap;
use std::io::Write;

use crate::types::{Node, PeerId};

/// Name of the emitted digraph.
pub const GRAPH_NAME: &str = "cfnetwork";

/// Write the nodes and edges as a DOT digraph.
///
/// A label statement is written for every node with a non-empty label,
/// followed by that node's outgoing edges.
pub fn write_dot<W: Write>(out: &mut W, nodes: &BTreeMap<PeerId, Node>) -> std::io::Result<()> {
    writeln!(out, "digraph {} {{", GRAPH_NAME)?;

    for (peer, node) in nodes {
        if !node.label.is_empty() {
            writeln!(
                out,
                "    \"{}\" [label=\"{}\"];",
                escape(peer.as_str()),
                escape(&node.label)
            )?;
        }

        for (target, edge) in &node.outgoing {
            writeln!(
                out,
                "    \"{}\" -> \"{}\" [label=\"{}\"];",
                escape(peer.as_str()),
                escape(target.as_str()),
                edge.count
            )?;
        }
    }

    writeln!(out, "}}")
}

/// Escape a value for use inside a double-quoted DOT ID.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
