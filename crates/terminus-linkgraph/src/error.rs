//! Error types for the `terminus-linkgraph` crate.

use terminus_types::{CargoId, LinkGraphId, NodeId};

/// Errors that can occur during link graph operations.
#[derive(Debug, thiserror::Error)]
pub enum LinkGraphError {
    /// No graph with this handle exists.
    #[error("link graph not found: {0}")]
    GraphNotFound(LinkGraphId),

    /// The graph has no node with this handle.
    #[error("node {node} not found in link graph {graph}")]
    NodeNotFound {
        /// The graph that was searched.
        graph: LinkGraphId,
        /// The missing node.
        node: NodeId,
    },

    /// A node was joined to a graph that routes a different cargo.
    #[error("link graph {graph} routes cargo {expected}, not {actual}")]
    CargoMismatch {
        /// The graph being joined.
        graph: LinkGraphId,
        /// The cargo the graph routes.
        expected: CargoId,
        /// The cargo of the joining goods entry.
        actual: CargoId,
    },

    /// Every graph handle is in use.
    #[error("link graph pool exhausted")]
    PoolExhausted,
}
