//! Schema vocabulary: labels, edge labels and reserved property terms.

/// Label carried by every attribute node.
pub const ATTRIBUTE: &str = "Attribute";

/// Property holding an attribute's ID. Never composed.
pub const ATTRIBUTE_ID: &str = "@id";

/// Object -> child attribute.
pub const ATTRIBUTES_EDGE: &str = "attributes";
/// Object -> child attribute, ordered list form.
pub const ATTRIBUTE_LIST_EDGE: &str = "attribute-list";
/// Array -> item attribute.
pub const ARRAY_ITEMS_EDGE: &str = "array-items";
/// Composite -> option to merge.
pub const ALL_OF_EDGE: &str = "all-of";
/// Polymorphic -> exclusive option.
pub const ONE_OF_EDGE: &str = "one-of";

/// Edge labels that form the attribute tree.
pub const ATTRIBUTE_TREE_EDGES: [&str; 5] = [
    ATTRIBUTES_EDGE,
    ATTRIBUTE_LIST_EDGE,
    ARRAY_ITEMS_EDGE,
    ALL_OF_EDGE,
    ONE_OF_EDGE,
];

/// Target of a Reference attribute.
pub const REFERENCE: &str = "reference";
/// Layer id a compiled node was spliced from.
pub const ENTITY_SCHEMA: &str = "entitySchema";
/// Layer whose root is copied under the carrying attribute.
pub const INCLUDE: &str = "include";
/// Namespace replacing the ID prefix of included attributes.
pub const NAMESPACE: &str = "namespace";
/// Extra labels applied to the carrying attribute after compilation.
pub const LABELED_AS: &str = "labeledAs";
/// Edge property marking structural edges superseded by a reference splice.
pub const COMPILATION_ARTIFACT: &str = "compilationArtifact";

/// Returns true if the edge label is part of the attribute tree.
pub fn is_attribute_tree_edge(label: &str) -> bool {
    ATTRIBUTE_TREE_EDGES.contains(&label)
}
