//! Layers: a schema or overlay attribute tree plus its ID index.

use crate::kind::{attribute_id, AttributeKind};
use crate::vocab;
use crate::walk::{attribute_children, for_each_attribute};
use crate::{SchemaError, SchemaResult};
use layers_core::NodeId;
use layers_graph::Graph;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Whether a layer is a base schema or an overlay on one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Schema,
    Overlay,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Schema => f.write_str("Schema"),
            LayerKind::Overlay => f.write_str("Overlay"),
        }
    }
}

/// A loaded schema or overlay.
#[derive(Debug)]
pub struct Layer {
    id: String,
    kind: LayerKind,
    graph: Graph,
    root: NodeId,
    index: BTreeMap<String, NodeId>,
}

impl Layer {
    /// Wrap the attribute tree under `root`, validating the structure of
    /// every reachable attribute and indexing attribute IDs.
    pub fn from_graph(
        id: impl Into<String>,
        kind: LayerKind,
        graph: Graph,
        root: NodeId,
    ) -> SchemaResult<Self> {
        let id = id.into();
        validate_structure(&graph, root)?;
        let index = build_index(&graph, root)?;
        log::debug!("layer {} ({}): {} attributes indexed", id, kind, index.len());
        Ok(Self {
            id,
            kind,
            graph,
            root,
            index,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access to the underlying graph. Callers that add or remove
    /// attributes keep the index current with `insert_index` or `reindex`.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Attribute ID -> node.
    pub fn index(&self) -> &BTreeMap<String, NodeId> {
        &self.index
    }

    /// Look up an attribute by ID.
    pub fn attribute(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// Add an attribute to the index. An ID already bound to another node fails.
    pub fn insert_index(&mut self, id: &str, node: NodeId) -> SchemaResult<()> {
        match self.index.get(id) {
            Some(existing) if *existing != node => {
                Err(SchemaError::DuplicateAttribute(id.to_string()))
            }
            Some(_) => Ok(()),
            None => {
                self.index.insert(id.to_string(), node);
                Ok(())
            }
        }
    }

    /// Drop an ID from the index, returning the node it named.
    pub fn remove_index(&mut self, id: &str) -> Option<NodeId> {
        self.index.remove(id)
    }

    /// Rebuild the index from the attributes reachable from the root.
    pub fn reindex(&mut self) -> SchemaResult<()> {
        self.index = build_index(&self.graph, self.root)?;
        Ok(())
    }

    /// Copy this layer's attribute tree into a fresh graph.
    pub fn deep_clone(&self) -> SchemaResult<Layer> {
        let mut graph = Graph::new();
        let mut map = HashMap::new();
        let root = graph.import_subgraph(&self.graph, self.root, &mut map)?;
        let index = self
            .index
            .iter()
            .filter_map(|(id, node)| map.get(node).map(|n| (id.clone(), *n)))
            .collect();
        Ok(Layer {
            id: self.id.clone(),
            kind: self.kind,
            graph,
            root,
            index,
        })
    }
}

/// Attribute ID -> node for every attribute reachable from `root`.
/// Duplicate non-empty IDs fail.
pub fn build_index(graph: &Graph, root: NodeId) -> SchemaResult<BTreeMap<String, NodeId>> {
    let mut index = BTreeMap::new();
    let mut failure: Option<SchemaError> = None;
    for_each_attribute(graph, root, |node_id, _| {
        let node = match graph.node(node_id) {
            Ok(node) => node,
            Err(err) => {
                failure = Some(err.into());
                return false;
            }
        };
        if let Some(id) = attribute_id(node) {
            if index.insert(id.to_string(), node_id).is_some() {
                failure = Some(SchemaError::DuplicateAttribute(id.to_string()));
                return false;
            }
        }
        true
    })?;
    match failure {
        Some(err) => Err(err),
        None => Ok(index),
    }
}

/// Check the structural contract of every attribute reachable from `root`.
pub fn validate_structure(graph: &Graph, root: NodeId) -> SchemaResult<()> {
    let mut nodes = Vec::new();
    for_each_attribute(graph, root, |id, _| {
        nodes.push(id);
        true
    })?;
    for node_id in nodes {
        validate_attribute(graph, node_id)?;
    }
    Ok(())
}

/// Check one attribute node against the contract of its kind.
pub fn validate_attribute(graph: &Graph, node_id: NodeId) -> SchemaResult<()> {
    let node = graph.node(node_id)?;
    let kind = AttributeKind::of(node)?;
    let id = attribute_id(node).unwrap_or_default().to_string();

    let mut tree_edges: Vec<(String, NodeId)> = Vec::new();
    for edge_id in graph.outgoing(node_id, None)? {
        let edge = graph.edge(edge_id)?;
        if vocab::is_attribute_tree_edge(&edge.label) {
            tree_edges.push((edge.label.clone(), edge.to));
        }
    }
    let count = |label: &str| tree_edges.iter().filter(|(l, _)| l == label).count();
    let only = |labels: &[&str]| tree_edges.iter().all(|(l, _)| labels.contains(&l.as_str()));

    match kind {
        AttributeKind::Value => {
            if !tree_edges.is_empty() {
                return Err(SchemaError::structure(id, "value attribute has children"));
            }
        }
        AttributeKind::Reference => {
            let target = node.get_str(vocab::REFERENCE).unwrap_or_default();
            if target.is_empty() {
                return Err(SchemaError::structure(id, "reference has no target"));
            }
            if !tree_edges.is_empty() {
                return Err(SchemaError::structure(id, "unresolved reference has children"));
            }
        }
        AttributeKind::Object => {
            if !only(&[vocab::ATTRIBUTES_EDGE, vocab::ATTRIBUTE_LIST_EDGE]) {
                return Err(SchemaError::structure(id, "object has non-attribute children"));
            }
            let mut seen = HashSet::new();
            for child in attribute_children(graph, node_id)? {
                let child_node = graph.node(child)?;
                if let Some(child_id) = attribute_id(child_node) {
                    if !seen.insert(child_id.to_string()) {
                        return Err(SchemaError::DuplicateAttribute(child_id.to_string()));
                    }
                }
            }
        }
        AttributeKind::Array => {
            if count(vocab::ARRAY_ITEMS_EDGE) != 1 || !only(&[vocab::ARRAY_ITEMS_EDGE]) {
                return Err(SchemaError::structure(
                    id,
                    format!("array must have exactly one item, found {}", tree_edges.len()),
                ));
            }
        }
        AttributeKind::Composite => {
            if count(vocab::ALL_OF_EDGE) == 0 || !only(&[vocab::ALL_OF_EDGE]) {
                return Err(SchemaError::structure(id, "composite must have all-of options only"));
            }
        }
        AttributeKind::Polymorphic => {
            if count(vocab::ONE_OF_EDGE) == 0 || !only(&[vocab::ONE_OF_EDGE]) {
                return Err(SchemaError::structure(
                    id,
                    "polymorphic must have one-of options only",
                ));
            }
        }
    }

    for (_, child) in &tree_edges {
        let child_node = graph.node(*child)?;
        if !child_node.has_label(vocab::ATTRIBUTE) {
            return Err(SchemaError::NotAnAttribute(*child));
        }
    }
    Ok(())
}
