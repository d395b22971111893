//! The TermRegistry - immutable term lookup.

use crate::capability::{
    Composer, EdgeCompiler, LdMarshaler, NodeCompiler, TermCapabilities, TermCompiler, Validator,
    ValueFilter,
};
use crate::{ComposeResult, CompositionPolicy, Term, TermError, TermResult, TermTag, ValueType};
use layers_core::{Node, Properties, PropertyValue};
use layers_schema::vocab;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Term lookup by name or alias. Immutable after construction, so it can be
/// shared between compilations running in parallel.
#[derive(Debug, Default)]
pub struct TermRegistry {
    terms: Vec<Term>,
    names: HashMap<String, usize>,
}

impl TermRegistry {
    /// Create a registry from built parts (use TermRegistryBuilder for construction).
    pub(crate) fn new(terms: Vec<Term>, names: HashMap<String, usize>) -> Self {
        Self { terms, names }
    }

    // ==================== Term Lookups ====================

    /// Get a term by name or alias.
    pub fn term(&self, name: &str) -> Option<&Term> {
        self.names.get(name).and_then(|i| self.terms.get(*i))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// All registered terms in registration order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Composition policy of a term. Unregistered terms use Set.
    pub fn composition(&self, name: &str) -> CompositionPolicy {
        self.term(name)
            .map(|t| t.composition)
            .unwrap_or(CompositionPolicy::Set)
    }

    /// Value type of a term. Unregistered terms accept any value.
    pub fn value_type(&self, name: &str) -> ValueType {
        self.term(name).map(|t| t.value_type).unwrap_or_default()
    }

    fn capabilities(&self, name: &str) -> Option<&TermCapabilities> {
        self.term(name).map(|t| &t.capabilities)
    }

    // ==================== Capability Lookups ====================

    pub fn composer(&self, name: &str) -> Option<&Arc<dyn Composer>> {
        self.capabilities(name).and_then(|c| c.composer.as_ref())
    }

    pub fn node_compiler(&self, name: &str) -> Option<&Arc<dyn NodeCompiler>> {
        self.capabilities(name).and_then(|c| c.node_compiler.as_ref())
    }

    pub fn edge_compiler(&self, name: &str) -> Option<&Arc<dyn EdgeCompiler>> {
        self.capabilities(name).and_then(|c| c.edge_compiler.as_ref())
    }

    pub fn term_compiler(&self, name: &str) -> Option<&Arc<dyn TermCompiler>> {
        self.capabilities(name).and_then(|c| c.term_compiler.as_ref())
    }

    pub fn value_filter(&self, name: &str) -> Option<&Arc<dyn ValueFilter>> {
        self.capabilities(name).and_then(|c| c.value_filter.as_ref())
    }

    pub fn validator(&self, name: &str) -> Option<&Arc<dyn Validator>> {
        self.capabilities(name).and_then(|c| c.validator.as_ref())
    }

    pub fn ld_marshaler(&self, name: &str) -> Option<&Arc<dyn LdMarshaler>> {
        self.capabilities(name).and_then(|c| c.ld_marshaler.as_ref())
    }

    // ==================== Composition ====================

    /// Compose two values of one term. A custom composer takes precedence
    /// over the term's policy.
    pub fn compose(
        &self,
        term: &str,
        old: Option<&PropertyValue>,
        new: Option<&PropertyValue>,
    ) -> ComposeResult<Option<PropertyValue>> {
        let result = match self.composer(term) {
            Some(composer) => composer.compose(old, new),
            None => self.composition(term).compose(old, new),
        };
        result.map_err(|e| e.for_term(term))
    }

    /// Compose every term of `source` into `target`. Attribute IDs are
    /// never composed.
    pub fn compose_properties(
        &self,
        target: &mut Properties,
        source: &Properties,
    ) -> ComposeResult<()> {
        for (term, value) in source {
            if term == vocab::ATTRIBUTE_ID {
                continue;
            }
            match self.compose(term, target.get(term), Some(value))? {
                Some(composed) => {
                    target.insert(term.clone(), composed);
                }
                None => {
                    target.remove(term);
                }
            }
        }
        Ok(())
    }

    /// Compose the properties of a referenced root into a referencing
    /// node. `local` is the target: composers and policies see the local
    /// value as `old`, and Override keeps a local value when there is one.
    pub fn compose_referenced(
        &self,
        local: &mut Properties,
        referenced: &Properties,
    ) -> ComposeResult<()> {
        for (term, value) in referenced {
            if term == vocab::ATTRIBUTE_ID {
                continue;
            }
            let old = local.get(term);
            let composed = match (self.composer(term), self.composition(term)) {
                (None, CompositionPolicy::Override) => old.or(Some(value)).cloned(),
                _ => self.compose(term, old, Some(value))?,
            };
            match composed {
                Some(composed) => {
                    local.insert(term.clone(), composed);
                }
                None => {
                    local.remove(term);
                }
            }
        }
        Ok(())
    }

    // ==================== Ingestion Hooks ====================

    /// Run the value filters of every term present on the schema node, in
    /// term order.
    pub fn filter_value(
        &self,
        schema_node: &Node,
        value: Option<String>,
    ) -> TermResult<Option<String>> {
        let mut value = value;
        for term in schema_node.properties.keys() {
            if let Some(filter) = self.value_filter(term) {
                value = filter.filter(schema_node, value)?;
            }
        }
        Ok(value)
    }

    /// Terms present on the schema node that have a validator.
    pub fn validation_terms<'a>(
        &'a self,
        schema_node: &'a Node,
    ) -> impl Iterator<Item = &'a str> + 'a {
        schema_node
            .properties
            .keys()
            .map(String::as_str)
            .filter(move |term| self.validator(term).is_some())
    }

    // ==================== Marshaling ====================

    /// Linked-data JSON form of a property value.
    pub fn marshal_property(
        &self,
        term: &str,
        value: &PropertyValue,
    ) -> TermResult<serde_json::Value> {
        match self.ld_marshaler(term) {
            Some(marshaler) => marshaler.marshal(term, value),
            None => serde_json::to_value(value).map_err(|e| TermError::Marshal {
                term: term.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Property value from its linked-data JSON form.
    pub fn unmarshal_property(
        &self,
        term: &str,
        raw: &serde_json::Value,
    ) -> TermResult<PropertyValue> {
        match self.ld_marshaler(term) {
            Some(marshaler) => marshaler.unmarshal(term, raw),
            None => self.value_type(term).coerce(term, raw),
        }
    }

    /// Terms carrying a tag.
    pub fn terms_with_tag(&self, tag: TermTag) -> BTreeSet<&str> {
        self.terms
            .iter()
            .filter(|t| t.has_tag(tag))
            .map(|t| t.name.as_str())
            .collect()
    }
}
