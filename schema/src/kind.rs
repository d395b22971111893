//! The six attribute kinds.

use crate::vocab;
use crate::{SchemaError, SchemaResult};
use layers_core::Node;
use std::fmt;

/// Kind of an attribute node, carried as a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKind {
    Value,
    Object,
    Reference,
    Array,
    Composite,
    Polymorphic,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 6] = [
        AttributeKind::Value,
        AttributeKind::Object,
        AttributeKind::Reference,
        AttributeKind::Array,
        AttributeKind::Composite,
        AttributeKind::Polymorphic,
    ];

    /// The node label for this kind.
    pub fn label(self) -> &'static str {
        match self {
            AttributeKind::Value => "Value",
            AttributeKind::Object => "Object",
            AttributeKind::Reference => "Reference",
            AttributeKind::Array => "Array",
            AttributeKind::Composite => "Composite",
            AttributeKind::Polymorphic => "Polymorphic",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }

    /// Returns true if the label is one of the kind labels.
    pub fn is_kind_label(label: &str) -> bool {
        Self::from_label(label).is_some()
    }

    /// Label of the structural edges leading to this kind's children.
    /// Value and Reference have none.
    pub fn child_edge(self) -> Option<&'static str> {
        match self {
            AttributeKind::Object => Some(vocab::ATTRIBUTES_EDGE),
            AttributeKind::Array => Some(vocab::ARRAY_ITEMS_EDGE),
            AttributeKind::Composite => Some(vocab::ALL_OF_EDGE),
            AttributeKind::Polymorphic => Some(vocab::ONE_OF_EDGE),
            AttributeKind::Value | AttributeKind::Reference => None,
        }
    }

    /// All kind labels present on a node.
    pub fn kinds_of(node: &Node) -> Vec<AttributeKind> {
        node.labels
            .iter()
            .filter_map(|l| AttributeKind::from_label(l))
            .collect()
    }

    /// The single kind of an attribute node.
    pub fn of(node: &Node) -> SchemaResult<AttributeKind> {
        if !node.has_label(vocab::ATTRIBUTE) {
            return Err(SchemaError::NotAnAttribute(node.id));
        }
        match Self::kinds_of(node).as_slice() {
            [kind] => Ok(*kind),
            [] => Err(SchemaError::structure(
                attribute_id(node).unwrap_or_default(),
                "attribute has no kind label",
            )),
            many => Err(SchemaError::structure(
                attribute_id(node).unwrap_or_default(),
                format!("attribute has {} kind labels", many.len()),
            )),
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns true if the node is an attribute node.
pub fn is_attribute(node: &Node) -> bool {
    node.has_label(vocab::ATTRIBUTE)
}

/// The attribute ID of a node, if it has a non-empty one.
pub fn attribute_id(node: &Node) -> Option<&str> {
    node.get_str(vocab::ATTRIBUTE_ID).filter(|s| !s.is_empty())
}
