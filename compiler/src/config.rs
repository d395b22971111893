//! Compiler configuration.

use crate::CompileResult;
use serde::{Deserialize, Serialize};

/// Behavior switches for one compiler.
///
/// ```toml
/// max_depth = 32
/// mark_compilation_artifacts = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Maximum reference nesting below the top-level schema.
    pub max_depth: usize,
    /// Mark the structural edges of a referenced root once they are cloned
    /// onto a referencing attribute.
    pub mark_compilation_artifacts: bool,
    /// Record the source layer id on compiled roots and referencing attributes.
    pub record_entity_schema: bool,
    /// Turn `labeledAs` values into node labels after compilation.
    pub apply_labeled_as: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            mark_compilation_artifacts: true,
            record_entity_schema: true,
            apply_labeled_as: true,
        }
    }
}

impl CompilerConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> CompileResult<Self> {
        Ok(toml::from_str(source)?)
    }
}
