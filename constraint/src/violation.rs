//! Violations reported by validation terms.

use layers_core::NodeId;
use std::collections::BTreeMap;
use std::fmt;

/// One data value rejected by a validation term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub term: String,
    /// Schema attribute the value was checked against.
    pub attribute_id: String,
    pub message: String,
    pub node_id: Option<NodeId>,
}

impl Violation {
    pub fn new(
        term: impl Into<String>,
        attribute_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            term: term.into(),
            attribute_id: attribute_id.into(),
            message: message.into(),
            node_id: None,
        }
    }

    pub fn with_node(self, node_id: NodeId) -> Self {
        Self {
            node_id: Some(node_id),
            ..self
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.attribute_id, self.term, self.message)
    }
}

/// Violations in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn merge(&mut self, other: Violations) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn all(&self) -> &[Violation] {
        &self.0
    }

    pub fn for_term<'a>(&'a self, term: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.0.iter().filter(move |v| v.term == term)
    }

    pub fn for_attribute<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.0.iter().filter(move |v| v.attribute_id == id)
    }

    /// Violated terms grouped by attribute ID.
    pub fn by_attribute(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for v in &self.0 {
            grouped.entry(v.attribute_id.as_str()).or_default().push(v.term.as_str());
        }
        grouped
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
