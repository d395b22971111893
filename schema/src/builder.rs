//! LayerBuilder for constructing layers in code.

use crate::vocab;
use crate::{AttributeKind, Layer, LayerKind, SchemaError, SchemaResult};
use layers_core::{NodeId, Properties, PropertyValue};
use layers_graph::Graph;

/// A non-attribute node attached to an attribute by a semantic edge.
#[derive(Debug, Clone)]
struct Annotation {
    edge_label: String,
    labels: Vec<String>,
    properties: Properties,
}

/// Definition of one attribute and its subtree.
#[derive(Debug, Clone)]
pub struct AttributeDef {
    id: String,
    kind: AttributeKind,
    labels: Vec<String>,
    properties: Properties,
    children: Vec<AttributeDef>,
    annotations: Vec<Annotation>,
}

impl AttributeDef {
    fn new(id: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            labels: Vec::new(),
            properties: Properties::new(),
            children: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn value(id: impl Into<String>) -> Self {
        Self::new(id, AttributeKind::Value)
    }

    pub fn object(id: impl Into<String>) -> Self {
        Self::new(id, AttributeKind::Object)
    }

    pub fn array(id: impl Into<String>, item: AttributeDef) -> Self {
        Self::new(id, AttributeKind::Array).child(item)
    }

    pub fn reference(id: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(id, AttributeKind::Reference)
            .property(vocab::REFERENCE, PropertyValue::String(target.into()))
    }

    pub fn composite(id: impl Into<String>) -> Self {
        Self::new(id, AttributeKind::Composite)
    }

    pub fn polymorphic(id: impl Into<String>) -> Self {
        Self::new(id, AttributeKind::Polymorphic)
    }

    /// Add a child attribute. The edge label follows this attribute's kind.
    pub fn child(mut self, child: AttributeDef) -> Self {
        self.children.push(child);
        self
    }

    /// Add an all-of or one-of option.
    pub fn option(self, option: AttributeDef) -> Self {
        self.child(option)
    }

    /// Set a term value on the attribute.
    pub fn property(mut self, term: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(term.into(), value.into());
        self
    }

    /// Add a non-kind label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Attach a non-attribute node through an edge labeled `edge_label`.
    pub fn annotation(
        mut self,
        edge_label: impl Into<String>,
        labels: &[&str],
        properties: Properties,
    ) -> Self {
        self.annotations.push(Annotation {
            edge_label: edge_label.into(),
            labels: labels.iter().map(|s| s.to_string()).collect(),
            properties,
        });
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    fn create(self, graph: &mut Graph) -> SchemaResult<NodeId> {
        let mut labels = vec![vocab::ATTRIBUTE.to_string(), self.kind.label().to_string()];
        labels.extend(self.labels);
        let mut properties = self.properties;
        if !self.id.is_empty() {
            properties.insert(vocab::ATTRIBUTE_ID.to_string(), PropertyValue::String(self.id));
        }
        let node = graph.create_node(labels, properties);

        let edge_label = self.kind.child_edge().unwrap_or(vocab::ATTRIBUTES_EDGE);
        for child in self.children {
            let child_id = child.create(graph)?;
            graph.create_edge(node, child_id, edge_label, Properties::new())?;
        }
        for annotation in self.annotations {
            let target = graph.create_node(annotation.labels, annotation.properties);
            graph.create_edge(node, target, &annotation.edge_label, Properties::new())?;
        }
        Ok(node)
    }
}

/// Builder for constructing a validated Layer.
#[derive(Debug)]
pub struct LayerBuilder {
    id: String,
    kind: LayerKind,
    root: Option<AttributeDef>,
}

impl LayerBuilder {
    /// Start a schema layer.
    pub fn schema(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: LayerKind::Schema,
            root: None,
        }
    }

    /// Start an overlay layer.
    pub fn overlay(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: LayerKind::Overlay,
            root: None,
        }
    }

    /// Set the root attribute.
    pub fn root(mut self, root: AttributeDef) -> Self {
        self.root = Some(root);
        self
    }

    /// Build the layer, validating its structure.
    pub fn build(self) -> SchemaResult<Layer> {
        let root_def = self.root.ok_or_else(|| SchemaError::MissingRoot(self.id.clone()))?;
        let mut graph = Graph::new();
        let root = root_def.create(&mut graph)?;
        Layer::from_graph(self.id, self.kind, graph, root)
    }
}
