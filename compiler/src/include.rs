//! Include resolution: copying a layer's attribute tree into an attribute.

use crate::compiler::index_copies;
use crate::{CompileError, CompileResult, Compiler, ResolutionContext};
use layers_core::{NodeId, PropertyValue};
use layers_schema::{attribute_id, for_each_attribute, is_attribute, vocab, AttributeKind, Layer};
use std::collections::HashMap;

impl Compiler<'_> {
    /// Expand every `include` under `root`. Included content may carry
    /// further includes; those are expanded too, up to the depth limit.
    pub(crate) fn resolve_includes(
        &self,
        ctx: &mut ResolutionContext,
        root: NodeId,
    ) -> CompileResult<()> {
        while let Some(node) = next_include(ctx.target()?, root)? {
            self.include(ctx, node)?;
        }
        Ok(())
    }

    fn include(&self, ctx: &mut ResolutionContext, node_id: NodeId) -> CompileResult<()> {
        let include = ctx
            .target_mut()?
            .graph_mut()
            .remove_node_property(node_id, vocab::INCLUDE)?
            .map(|v| v.to_plain_string())
            .unwrap_or_default();
        let depth = ctx.include_depth(node_id) + 1;
        if depth > self.config().max_depth {
            return Err(CompileError::DepthExceeded {
                reference: include,
                limit: self.config().max_depth,
            });
        }

        let canonical = self.resolve(&include)?;
        let source = self.load(ctx, &canonical)?;
        let source_root = source.graph().node(source.root())?;
        let layer = ctx.target_mut()?;
        let local = layer.graph().node(node_id)?.clone();
        let id = attribute_id(&local).unwrap_or_default().to_string();
        log::debug!("including {} into {}", canonical, id);

        let mut merged = local.properties.clone();
        self.registry()
            .compose_properties(&mut merged, &source_root.properties)
            .map_err(|e| CompileError::compose(id.as_str(), e))?;
        let namespace = merged
            .remove(vocab::NAMESPACE)
            .map(|v| v.to_plain_string())
            .unwrap_or_default();
        layer.graph_mut().set_node_properties(node_id, merged)?;

        let local_kind = AttributeKind::of(&local)?;
        let source_kind = AttributeKind::of(source_root)?;
        if local_kind != source_kind {
            return Err(CompileError::invalid_composition(
                id,
                format!("cannot include {} {} into {}", source_kind, canonical, local_kind),
            ));
        }
        for label in &source_root.labels {
            if label != vocab::ATTRIBUTE && !AttributeKind::is_kind_label(label) {
                layer.graph_mut().add_label(node_id, label)?;
            }
        }

        let mut copies = HashMap::new();
        for edge_id in source.graph().outgoing(source.root(), None)? {
            let edge = source.graph().edge(edge_id)?;
            let child = layer
                .graph_mut()
                .import_subgraph(source.graph(), edge.to, &mut copies)?;
            layer
                .graph_mut()
                .create_edge(node_id, child, &edge.label, edge.properties.clone())?;
        }

        if !namespace.is_empty() {
            apply_namespace(layer, node_id, &namespace)?;
            for copy in copies.values() {
                apply_namespace(layer, *copy, &namespace)?;
            }
        }
        index_copies(layer, &copies, &canonical)?;
        for copy in copies.into_values() {
            ctx.set_include_depth(copy, depth);
        }
        Ok(())
    }
}

/// First attribute under `root` still carrying an `include`.
fn next_include(layer: &Layer, root: NodeId) -> CompileResult<Option<NodeId>> {
    let graph = layer.graph();
    let mut found = None;
    for_each_attribute(graph, root, |node_id, _| {
        let pending = graph
            .node(node_id)
            .map(|n| is_attribute(n) && n.get_property(vocab::INCLUDE).is_some())
            .unwrap_or(false);
        if pending {
            found = Some(node_id);
        }
        !pending
    })?;
    Ok(found)
}

/// Replace everything before the last `/` of an attribute ID with the
/// namespace. IDs without a `/` are kept.
fn apply_namespace(layer: &mut Layer, node_id: NodeId, namespace: &str) -> CompileResult<()> {
    let node = layer.graph().node(node_id)?;
    let Some(old) = node.get_str(vocab::ATTRIBUTE_ID).map(str::to_string) else {
        return Ok(());
    };
    let Some(slash) = old.rfind('/') else {
        return Ok(());
    };
    let renamed = format!("{}{}", namespace, &old[slash..]);
    layer
        .graph_mut()
        .set_node_property(node_id, vocab::ATTRIBUTE_ID, PropertyValue::from(renamed.as_str()))?;
    if layer.attribute(&old) == Some(node_id) {
        layer.remove_index(&old);
        layer.insert_index(&renamed, node_id)?;
    }
    Ok(())
}
