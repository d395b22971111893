//! Error types for the scenario framework.

use thiserror::Error;

/// Result type for scenario operations.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Errors that can occur when running scenarios.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Failed to build the term registry.
    #[error("failed to build registry for '{scenario}': {message}")]
    Registry { scenario: String, message: String },

    /// Compilation failed where it was expected to succeed.
    #[error("failed to compile '{reference}': {source}")]
    Compile {
        reference: String,
        source: layers_compiler::CompileError,
    },

    /// Overlay composition failed.
    #[error("failed to apply overlay '{overlay}': {source}")]
    Overlay {
        overlay: String,
        source: layers_compiler::CompileError,
    },

    /// A fixture layer could not be copied.
    #[error("schema error: {0}")]
    Schema(#[from] layers_schema::SchemaError),

    /// Validation machinery failed.
    #[error("validation failed to run: {0}")]
    Constraint(#[from] layers_constraint::ConstraintError),

    /// Assertion failed.
    #[error("assertion failed for '{scenario}': {message}")]
    AssertionFailed { scenario: String, message: String },

    /// No reference to compile was given.
    #[error("no compile target specified for scenario '{scenario}'")]
    MissingTarget { scenario: String },

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScenarioError {
    pub fn assertion_failed(scenario: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            scenario: scenario.into(),
            message: message.into(),
        }
    }

    pub fn registry(scenario: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Registry {
            scenario: scenario.into(),
            message: message.into(),
        }
    }
}
