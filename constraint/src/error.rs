//! Constraint error types.

use layers_core::GraphError;
use layers_registry::{RegistryError, TermError};
use thiserror::Error;

/// Failures of the validation machinery itself, as opposed to data values
/// that fail a constraint.
#[derive(Debug, Error)]
pub enum ConstraintError {
    /// A validation term on a schema node is malformed.
    #[error("Invalid validator {term} on attribute '{attribute_id}': {reason}")]
    InvalidValidator {
        term: String,
        attribute_id: String,
        reason: String,
    },

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Term error: {0}")]
    Term(#[from] TermError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

/// Result type for validation.
pub type ConstraintResult<T> = Result<T, ConstraintError>;
