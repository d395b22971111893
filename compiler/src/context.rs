//! Per-compilation resolution state.

use crate::{CompileError, CompileResult};
use layers_core::{GraphError, NodeId};
use layers_schema::Layer;
use std::collections::HashMap;
use std::sync::Arc;

/// Memo state of one `compile` call.
///
/// `compiled` maps a canonical reference to the root its layer was imported
/// as. An entry is written before the layer's references are resolved, so a
/// reference cycle reaching the same layer again stops at the memo.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    target: Option<Layer>,
    loaded: HashMap<String, Arc<Layer>>,
    compiled: HashMap<String, NodeId>,
    include_depth: HashMap<NodeId, usize>,
    depth: usize,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The layer being built. Exists once the top-level layer is imported.
    pub fn target(&self) -> CompileResult<&Layer> {
        self.target.as_ref().ok_or_else(missing_target)
    }

    pub fn target_mut(&mut self) -> CompileResult<&mut Layer> {
        self.target.as_mut().ok_or_else(missing_target)
    }

    pub(crate) fn set_target(&mut self, layer: Layer) {
        self.target = Some(layer);
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Give up the context, keeping the built layer.
    pub fn into_target(self) -> CompileResult<Layer> {
        self.target.ok_or_else(missing_target)
    }

    /// Compiled root of a canonical reference, if already imported.
    pub fn compiled_root(&self, reference: &str) -> Option<NodeId> {
        self.compiled.get(reference).copied()
    }

    pub fn mark_compiled(&mut self, reference: impl Into<String>, root: NodeId) {
        self.compiled.insert(reference.into(), root);
    }

    /// References compiled so far.
    pub fn compiled_references(&self) -> impl Iterator<Item = &str> {
        self.compiled.keys().map(String::as_str)
    }

    pub fn loaded(&self, reference: &str) -> Option<Arc<Layer>> {
        self.loaded.get(reference).cloned()
    }

    pub fn cache_loaded(&mut self, reference: impl Into<String>, layer: Arc<Layer>) {
        self.loaded.insert(reference.into(), layer);
    }

    /// Number of layers loaded through the loader.
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Current reference nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn enter(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// How many includes a node was copied through.
    pub(crate) fn include_depth(&self, node: NodeId) -> usize {
        self.include_depth.get(&node).copied().unwrap_or(0)
    }

    pub(crate) fn set_include_depth(&mut self, node: NodeId, depth: usize) {
        self.include_depth.insert(node, depth);
    }
}

fn missing_target() -> CompileError {
    CompileError::Graph(GraphError::InvalidOperation(
        "no target layer has been imported".to_string(),
    ))
}
