//! Registry, composition and term errors.

use layers_core::PropertyValue;
use thiserror::Error;

/// Errors that can occur during registry construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate term name or alias: {0}")]
    DuplicateTerm(String),

    #[error("Term name must not be empty")]
    EmptyTermName,
}

/// Errors raised while composing two term values.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Error-policy term found two unequal values.
    #[error("conflicting values {old} and {new}")]
    Conflict {
        old: PropertyValue,
        new: PropertyValue,
    },

    /// A custom composer rejected the values.
    #[error("{0}")]
    Rejected(String),

    /// Composition of a specific term failed.
    #[error("cannot compose term {term}: {source}")]
    Term {
        term: String,
        #[source]
        source: Box<ComposeError>,
    },
}

impl ComposeError {
    /// Wrap this error with the term being composed.
    pub fn for_term(self, term: &str) -> Self {
        match self {
            already @ ComposeError::Term { .. } => already,
            other => ComposeError::Term {
                term: term.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The term this error is about, if known.
    pub fn term(&self) -> Option<&str> {
        match self {
            ComposeError::Term { term, .. } => Some(term),
            _ => None,
        }
    }
}

/// Errors raised by term coercion and term extension points.
#[derive(Debug, Error)]
pub enum TermError {
    #[error("Invalid value for term {term}: {reason}")]
    InvalidValue { term: String, reason: String },

    #[error("Cannot compile term {term}: {reason}")]
    Compile { term: String, reason: String },

    #[error("Validation failed for term {term}: {reason}")]
    Validation { term: String, reason: String },

    #[error("Cannot marshal term {term}: {reason}")]
    Marshal { term: String, reason: String },

    #[error(transparent)]
    Graph(#[from] layers_core::GraphError),
}

impl TermError {
    pub fn invalid_value(term: &str, reason: impl Into<String>) -> Self {
        TermError::InvalidValue {
            term: term.to_string(),
            reason: reason.into(),
        }
    }

    pub fn compile(term: &str, reason: impl Into<String>) -> Self {
        TermError::Compile {
            term: term.to_string(),
            reason: reason.into(),
        }
    }

    pub fn validation(term: &str, reason: impl Into<String>) -> Self {
        TermError::Validation {
            term: term.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for registry construction.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for composition.
pub type ComposeResult<T> = Result<T, ComposeError>;

/// Result type for term operations.
pub type TermResult<T> = Result<T, TermError>;
