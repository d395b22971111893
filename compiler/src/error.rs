//! Compiler error types.

use crate::LoaderError;
use layers_core::GraphError;
use layers_registry::{ComposeError, TermError};
use layers_schema::SchemaError;
use thiserror::Error;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The loader has no layer for the reference.
    #[error("Schema not found: {0}")]
    NotFound(String),

    /// The resolver could not map a reference.
    #[error("Cannot resolve reference '{reference}': {source}")]
    Resolve {
        reference: String,
        #[source]
        source: LoaderError,
    },

    /// The loader failed.
    #[error("Cannot load '{reference}': {source}")]
    Load {
        reference: String,
        #[source]
        source: LoaderError,
    },

    /// A composite option cannot be merged, or an overlay cannot be placed.
    #[error("Invalid composition at attribute '{id}': {reason}")]
    InvalidComposition { id: String, reason: String },

    /// Two attributes with one ID ended up in the compiled layer.
    #[error(
        "Attribute '{id}' is duplicated by '{reference}'; include it under a different namespace"
    )]
    DuplicateAttribute { id: String, reference: String },

    /// Term composition failed while merging an attribute.
    #[error("Cannot compose attribute '{id}': {source}")]
    Compose {
        id: String,
        #[source]
        source: ComposeError,
    },

    /// A reference points at a root that is itself an unresolved reference.
    #[error("Reference '{id}' points to '{reference}', which is an unresolved reference")]
    UnresolvableReference { id: String, reference: String },

    /// Reference nesting went deeper than the configured limit.
    #[error("Reference depth limit {limit} exceeded at '{reference}'")]
    DepthExceeded { reference: String, limit: usize },

    /// Overlay composition was given a non-overlay or an incompatible one.
    #[error("Cannot apply overlay '{overlay}': {reason}")]
    Overlay { overlay: String, reason: String },

    /// Configuration could not be parsed.
    #[error("Invalid compiler configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Term error: {0}")]
    Term(#[from] TermError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

impl CompileError {
    pub fn invalid_composition(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidComposition {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn compose(id: impl Into<String>, source: ComposeError) -> Self {
        Self::Compose {
            id: id.into(),
            source,
        }
    }
}

/// Result type for compiler operations.
pub type CompileResult<T> = Result<T, CompileError>;
