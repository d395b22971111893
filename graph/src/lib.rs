//! Property graph storage
//!
//! This crate provides the in-memory multigraph the schema compiler works on:
//! - Node and edge arena storage keyed by graph-tagged handles
//! - Label index: find nodes by label
//! - Property index: find nodes by property value (opt-in per property)
//! - Adjacency index: ordered outgoing/incoming edges per node
//! - Subgraph import between graphs

mod graph;
mod index;

pub use graph::*;
pub use index::IndexKey;
