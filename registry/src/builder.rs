//! TermRegistryBuilder for constructing an immutable TermRegistry.

use crate::vocabulary;
use crate::{RegistryError, RegistryResult, Term, TermRegistry};
use std::collections::HashMap;

/// Builder for constructing an immutable TermRegistry.
///
/// Every name and alias may be registered once.
#[derive(Debug, Default)]
pub struct TermRegistryBuilder {
    terms: Vec<Term>,
    names: HashMap<String, usize>,
}

impl TermRegistryBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a term under its name and aliases.
    pub fn register(&mut self, term: Term) -> RegistryResult<&mut Self> {
        if term.name.is_empty() {
            return Err(RegistryError::EmptyTermName);
        }
        let mut keys = vec![term.name.clone()];
        keys.extend(term.aliases.iter().cloned());
        for (i, key) in keys.iter().enumerate() {
            if self.names.contains_key(key) || keys[..i].contains(key) {
                return Err(RegistryError::DuplicateTerm(key.clone()));
            }
        }

        let index = self.terms.len();
        for key in keys {
            self.names.insert(key, index);
        }
        log::trace!("registered term {}", term.name);
        self.terms.push(term);
        Ok(self)
    }

    /// Register the schema vocabulary used by the compiler.
    pub fn with_core_vocabulary(&mut self) -> RegistryResult<&mut Self> {
        for term in vocabulary::core_terms() {
            self.register(term)?;
        }
        Ok(self)
    }

    /// Returns true if the name or alias is taken.
    pub fn is_registered(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Build the immutable registry.
    pub fn build(self) -> TermRegistry {
        TermRegistry::new(self.terms, self.names)
    }
}
