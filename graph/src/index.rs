//! Indexes for efficient graph lookups.

use layers_core::{EdgeId, NodeId, PropertyValue};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Label index: label -> Set<NodeId>
#[derive(Debug, Default)]
pub struct LabelIndex {
    index: HashMap<String, BTreeSet<NodeId>>,
}

impl LabelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: &str, node_id: NodeId) {
        self.index.entry(label.to_string()).or_default().insert(node_id);
    }

    pub fn remove(&mut self, label: &str, node_id: NodeId) {
        if let Some(set) = self.index.get_mut(label) {
            set.remove(&node_id);
            if set.is_empty() {
                self.index.remove(label);
            }
        }
    }

    pub fn get(&self, label: &str) -> impl Iterator<Item = NodeId> + '_ {
        self.index
            .get(label)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

/// Simplified value for property indexing.
/// Floats are not indexed; list values are indexed by each element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    Bool(bool),
    Int(i64),
    String(String),
}

impl IndexKey {
    pub fn keys_of(value: &PropertyValue) -> Vec<Self> {
        match value {
            PropertyValue::Bool(b) => vec![IndexKey::Bool(*b)],
            PropertyValue::Int(i) => vec![IndexKey::Int(*i)],
            PropertyValue::String(s) => vec![IndexKey::String(s.clone())],
            PropertyValue::List(items) => items.iter().cloned().map(IndexKey::String).collect(),
            PropertyValue::Float(_) => Vec::new(),
        }
    }
}

/// Property index: (property name, value) -> Set<NodeId>, only for registered property names.
#[derive(Debug, Default)]
pub struct PropertyIndex {
    indexed: HashSet<String>,
    exact: HashMap<(String, IndexKey), BTreeSet<NodeId>>,
}

impl PropertyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start maintaining an index for the property. Returns false if already indexed.
    pub fn enable(&mut self, property: &str) -> bool {
        self.indexed.insert(property.to_string())
    }

    pub fn is_indexed(&self, property: &str) -> bool {
        self.indexed.contains(property)
    }

    pub fn insert(&mut self, property: &str, value: &PropertyValue, node_id: NodeId) {
        if !self.indexed.contains(property) {
            return;
        }
        for key in IndexKey::keys_of(value) {
            self.exact
                .entry((property.to_string(), key))
                .or_default()
                .insert(node_id);
        }
    }

    pub fn remove(&mut self, property: &str, value: &PropertyValue, node_id: NodeId) {
        if !self.indexed.contains(property) {
            return;
        }
        for key in IndexKey::keys_of(value) {
            let entry_key = (property.to_string(), key);
            if let Some(set) = self.exact.get_mut(&entry_key) {
                set.remove(&node_id);
                if set.is_empty() {
                    self.exact.remove(&entry_key);
                }
            }
        }
    }

    pub fn find(&self, property: &str, value: &PropertyValue) -> Vec<NodeId> {
        let mut result = BTreeSet::new();
        for key in IndexKey::keys_of(value) {
            if let Some(set) = self.exact.get(&(property.to_string(), key)) {
                result.extend(set.iter().copied());
            }
        }
        result.into_iter().collect()
    }
}

/// Adjacency index: NodeId -> (outgoing, incoming) edges, in insertion order.
#[derive(Debug, Default)]
pub struct AdjacencyIndex {
    outgoing: HashMap<NodeId, Vec<EdgeId>>,
    incoming: HashMap<NodeId, Vec<EdgeId>>,
}

impl AdjacencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, edge_id: EdgeId, from: NodeId, to: NodeId) {
        self.outgoing.entry(from).or_default().push(edge_id);
        self.incoming.entry(to).or_default().push(edge_id);
    }

    pub fn remove(&mut self, edge_id: EdgeId, from: NodeId, to: NodeId) {
        if let Some(list) = self.outgoing.get_mut(&from) {
            list.retain(|e| *e != edge_id);
            if list.is_empty() {
                self.outgoing.remove(&from);
            }
        }
        if let Some(list) = self.incoming.get_mut(&to) {
            list.retain(|e| *e != edge_id);
            if list.is_empty() {
                self.incoming.remove(&to);
            }
        }
    }

    pub fn outgoing(&self, node_id: NodeId) -> &[EdgeId] {
        self.outgoing.get(&node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn incoming(&self, node_id: NodeId) -> &[EdgeId] {
        self.incoming.get(&node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All edges touching the node, outgoing first.
    pub fn edges_involving(&self, node_id: NodeId) -> Vec<EdgeId> {
        let mut result: Vec<EdgeId> = self.outgoing(node_id).to_vec();
        for e in self.incoming(node_id) {
            if !result.contains(e) {
                result.push(*e);
            }
        }
        result
    }
}
