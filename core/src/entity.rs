//! Entity structures for the property graph.
//!
//! Nodes carry a label set and a property map; edges connect exactly two
//! nodes under one label. Both keep compiled term artifacts in a side map
//! that is separate from their raw properties.

use crate::{EdgeId, NodeId, Properties, PropertyValue};
use std::any::Any;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// An opaque compiled artifact produced by a term compiler.
pub type CompiledValue = Arc<dyn Any + Send + Sync>;

/// Compiled term artifacts, keyed by term name.
#[derive(Clone, Default)]
pub struct CompiledArtifacts {
    entries: BTreeMap<String, CompiledValue>,
}

impl CompiledArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the artifact for a term, replacing any previous one.
    pub fn insert(&mut self, term: impl Into<String>, value: CompiledValue) {
        self.entries.insert(term.into(), value);
    }

    /// Get the artifact for a term, downcast to its concrete type.
    pub fn get<T: Any + Send + Sync>(&self, term: &str) -> Option<&T> {
        self.entries.get(term).and_then(|v| v.downcast_ref::<T>())
    }

    /// Returns true if an artifact exists for the term.
    pub fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(term)
    }

    /// Copy every artifact of `other` into this map. Existing keys are overwritten.
    pub fn extend_from(&mut self, other: &CompiledArtifacts) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), Arc::clone(v));
        }
    }

    /// Terms that have an artifact.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CompiledArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// Label set of a node.
pub type Labels = BTreeSet<String>;

/// A node in the property graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Handle of this node.
    pub id: NodeId,
    /// Labels of this node.
    pub labels: Labels,
    /// Property values, keyed by term.
    pub properties: Properties,
    /// Compiled term artifacts.
    pub compiled: CompiledArtifacts,
}

impl Node {
    /// Create a new node with the given labels and properties.
    pub fn new(id: NodeId, labels: Labels, properties: Properties) -> Self {
        Self {
            id,
            labels,
            properties,
            compiled: CompiledArtifacts::new(),
        }
    }

    /// Returns true if the node carries the label.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Get a property value by term.
    pub fn get_property(&self, term: &str) -> Option<&PropertyValue> {
        self.properties.get(term)
    }

    /// Get a property as a string, if it is a string value.
    pub fn get_str(&self, term: &str) -> Option<&str> {
        self.properties.get(term).and_then(PropertyValue::as_str)
    }
}

/// A directed, labeled edge in the property graph.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Handle of this edge.
    pub id: EdgeId,
    /// Label of this edge.
    pub label: String,
    /// Source node.
    pub from: NodeId,
    /// Target node.
    pub to: NodeId,
    /// Property values, keyed by term.
    pub properties: Properties,
    /// Compiled term artifacts.
    pub compiled: CompiledArtifacts,
}

impl Edge {
    /// Create a new edge with the given endpoints, label and properties.
    pub fn new(
        id: EdgeId,
        label: impl Into<String>,
        from: NodeId,
        to: NodeId,
        properties: Properties,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            from,
            to,
            properties,
            compiled: CompiledArtifacts::new(),
        }
    }

    /// Get a property value by term.
    pub fn get_property(&self, term: &str) -> Option<&PropertyValue> {
        self.properties.get(term)
    }

    /// Check if this edge touches a node at either end.
    pub fn involves(&self, node_id: NodeId) -> bool {
        self.from == node_id || self.to == node_id
    }
}
