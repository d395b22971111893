//! Layered Schemas Core Types
//!
//! This crate provides the foundational types used throughout the layered schema system:
//! - Graph-scoped handles (GraphId, NodeId, EdgeId)
//! - Property values (the PropertyValue enum and the Properties map)
//! - Entity structures (Node, Edge) and their compiled-artifact side maps
//! - Common graph error types

mod entity;
mod error;
mod id;
mod value;

pub use entity::*;
pub use error::*;
pub use id::*;
pub use value::*;
