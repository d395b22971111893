//! Attribute type system and layers
//!
//! Schemas are attribute trees stored in a property graph. Each attribute
//! node carries the `Attribute` label and exactly one kind label; kinds
//! determine which structural edges the node may have. A [`Layer`] wraps
//! one such tree (a schema or an overlay) with an index from attribute ID
//! to node.

mod builder;
mod error;
mod kind;
mod layer;
pub mod vocab;
mod walk;

pub use builder::{AttributeDef, LayerBuilder};
pub use error::{SchemaError, SchemaResult};
pub use kind::{attribute_id, is_attribute, AttributeKind};
pub use layer::{build_index, validate_attribute, validate_structure, Layer, LayerKind};
pub use walk::{attribute_children, collect_attributes, for_each_attribute};
