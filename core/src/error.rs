//! Common error types for the property graph.

use crate::{EdgeId, GraphId, NodeId};
use thiserror::Error;

/// Errors that can occur during graph operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Node not found.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Edge not found.
    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// A node handle from another graph was passed to this graph.
    #[error("Node {node} belongs to another graph than {graph}")]
    ForeignNode { node: NodeId, graph: GraphId },

    /// An edge handle from another graph was passed to this graph.
    #[error("Edge {edge} belongs to another graph than {graph}")]
    ForeignEdge { edge: EdgeId, graph: GraphId },

    /// Invalid operation.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
