//! Schema errors.

use layers_core::{GraphError, NodeId};
use thiserror::Error;

/// Errors raised while building or validating a layer.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Two attributes of one layer share an ID.
    #[error("Duplicate attribute id: {0}")]
    DuplicateAttribute(String),

    /// An attribute violates the structural contract of its kind.
    #[error("Invalid attribute {id}: {reason}")]
    InvalidStructure { id: String, reason: String },

    /// A node reached through the attribute tree is not an attribute.
    #[error("Node {0} is not an attribute")]
    NotAnAttribute(NodeId),

    /// The layer has no root attribute.
    #[error("Layer {0} has no root attribute")]
    MissingRoot(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl SchemaError {
    pub(crate) fn structure(id: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::InvalidStructure {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
