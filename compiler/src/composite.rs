//! Flattening Composite attributes into Objects.

use crate::{CompileError, CompileResult};
use layers_core::{EdgeId, NodeId};
use layers_registry::TermRegistry;
use layers_schema::{attribute_id, collect_attributes, vocab, AttributeKind, Layer};
use std::collections::HashSet;

/// Resolve every Composite under `root`.
///
/// When `strict` is false, composites that still reach an unresolved
/// Reference option are left for a later pass.
pub(crate) fn resolve_compositions(
    registry: &TermRegistry,
    layer: &mut Layer,
    root: NodeId,
    strict: bool,
) -> CompileResult<()> {
    let composites = collect_attributes(layer.graph(), root, AttributeKind::Composite)?;
    let mut completed = HashSet::new();
    for composite in composites {
        if completed.contains(&composite) || !layer.graph().contains_node(composite) {
            continue;
        }
        if !layer
            .graph()
            .node(composite)?
            .has_label(AttributeKind::Composite.label())
        {
            continue;
        }
        if !strict && has_pending_reference(layer, composite, &mut HashSet::new())? {
            log::trace!("deferring composite {}", display_id(layer, composite));
            continue;
        }
        resolve_composite(registry, layer, composite, &mut completed)?;
    }
    Ok(())
}

fn has_pending_reference(
    layer: &Layer,
    composite: NodeId,
    visited: &mut HashSet<NodeId>,
) -> CompileResult<bool> {
    if !visited.insert(composite) {
        return Ok(false);
    }
    for option in layer.graph().successors(composite, Some(vocab::ALL_OF_EDGE))? {
        let node = layer.graph().node(option)?;
        if node.has_label(AttributeKind::Reference.label()) {
            return Ok(true);
        }
        if node.has_label(AttributeKind::Composite.label())
            && has_pending_reference(layer, option, visited)?
        {
            return Ok(true);
        }
    }
    Ok(false)
}

fn resolve_composite(
    registry: &TermRegistry,
    layer: &mut Layer,
    composite: NodeId,
    completed: &mut HashSet<NodeId>,
) -> CompileResult<()> {
    completed.insert(composite);
    let id = display_id(layer, composite);

    for edge_id in layer.graph().outgoing(composite, Some(vocab::ALL_OF_EDGE))? {
        loop {
            let option = layer.graph().edge(edge_id)?.to;
            let kind = AttributeKind::of(layer.graph().node(option)?)?;
            match kind {
                AttributeKind::Object => {
                    merge_object(registry, layer, composite, edge_id, option, &id)?;
                    break;
                }
                AttributeKind::Value | AttributeKind::Array | AttributeKind::Polymorphic => {
                    let edge = layer.graph_mut().remove_edge(edge_id)?;
                    let moved = layer.graph_mut().create_edge(
                        composite,
                        option,
                        vocab::ATTRIBUTES_EDGE,
                        edge.properties,
                    )?;
                    layer.graph_mut().edge_compiled_mut(moved)?.extend_from(&edge.compiled);
                    break;
                }
                AttributeKind::Composite => {
                    if completed.contains(&option) {
                        return Err(CompileError::invalid_composition(
                            id,
                            format!(
                                "composite option {} contains itself",
                                display_id(layer, option)
                            ),
                        ));
                    }
                    resolve_composite(registry, layer, option, completed)?;
                }
                AttributeKind::Reference => {
                    return Err(CompileError::invalid_composition(
                        id,
                        format!("option {} is an unresolved reference", display_id(layer, option)),
                    ));
                }
            }
        }
    }

    let graph = layer.graph_mut();
    graph.remove_label(composite, AttributeKind::Composite.label())?;
    graph.add_label(composite, AttributeKind::Object.label())?;
    log::trace!("composite {} flattened", id);
    Ok(())
}

/// Move the children of an Object option onto the composite and compose
/// the option's terms into it. An option shared with other parents is
/// copied instead of moved.
fn merge_object(
    registry: &TermRegistry,
    layer: &mut Layer,
    composite: NodeId,
    all_of: EdgeId,
    option: NodeId,
    id: &str,
) -> CompileResult<()> {
    let graph = layer.graph_mut();
    let shared = graph.incoming(option, None)?.len() > 1;
    let option_node = graph.node(option)?.clone();

    for edge_id in graph.outgoing(option, None)? {
        let edge = graph.edge(edge_id)?.clone();
        let copy = graph.create_edge(composite, edge.to, &edge.label, edge.properties.clone())?;
        graph.edge_compiled_mut(copy)?.extend_from(&edge.compiled);
        if !shared {
            graph.remove_edge(edge_id)?;
        }
    }

    let mut merged = graph.node(composite)?.properties.clone();
    registry
        .compose_properties(&mut merged, &option_node.properties)
        .map_err(|e| CompileError::compose(id, e))?;
    graph.set_node_properties(composite, merged)?;

    for label in &option_node.labels {
        if label != vocab::ATTRIBUTE && !AttributeKind::is_kind_label(label) {
            graph.add_label(composite, label)?;
        }
    }
    graph.node_compiled_mut(composite)?.extend_from(&option_node.compiled);
    graph.remove_edge(all_of)?;

    if !shared {
        graph.remove_node(option)?;
        if let Some(option_id) = attribute_id(&option_node) {
            if layer.attribute(option_id) == Some(option) {
                layer.remove_index(option_id);
            }
        }
    }
    Ok(())
}

fn display_id(layer: &Layer, node: NodeId) -> String {
    layer
        .graph()
        .node(node)
        .ok()
        .and_then(attribute_id)
        .map(str::to_string)
        .unwrap_or_else(|| node.to_string())
}
