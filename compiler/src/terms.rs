//! Term compilation over a compiled layer.

use crate::CompileResult;
use layers_core::NodeId;
use layers_registry::{CompileContext, TermRegistry};
use layers_schema::{is_attribute, vocab, Layer};
use std::collections::HashSet;

/// Nodes of the layer, those reachable from the root first in depth-first
/// order, then the rest in handle order.
fn visit_order(layer: &Layer) -> CompileResult<Vec<NodeId>> {
    let graph = layer.graph();
    let mut order = Vec::with_capacity(graph.node_count());
    let mut seen = HashSet::new();
    let mut stack = vec![layer.root()];
    while let Some(node) = stack.pop() {
        if !seen.insert(node) {
            continue;
        }
        order.push(node);
        let mut successors = graph.successors(node, None)?;
        successors.reverse();
        stack.extend(successors);
    }
    for node in graph.node_ids() {
        if seen.insert(node) {
            order.push(node);
        }
    }
    Ok(order)
}

/// Run the registered compilers over every node, property and edge, storing
/// term artifacts beside the values they were compiled from.
pub(crate) fn compile_terms(registry: &TermRegistry, layer: &mut Layer) -> CompileResult<()> {
    let mut ctx = CompileContext::new();
    for node_id in visit_order(layer)? {
        if !layer.graph().contains_node(node_id) {
            continue;
        }
        let node = layer.graph().node(node_id)?.clone();

        if !is_attribute(&node) {
            for label in &node.labels {
                if let Some(compiler) = registry.node_compiler(label) {
                    compiler.compile_node(&mut ctx, layer, node_id)?;
                }
            }
        }

        for (term, value) in &node.properties {
            let Some(compiler) = registry.term_compiler(term) else {
                continue;
            };
            if let Some(artifact) = compiler.compile_term(&mut ctx, term, value)? {
                layer
                    .graph_mut()
                    .node_compiled_mut(node_id)?
                    .insert(term.as_str(), artifact);
            }
        }

        if !layer.graph().contains_node(node_id) {
            continue;
        }
        for edge_id in layer.graph().outgoing(node_id, None)? {
            let edge = layer.graph().edge(edge_id)?.clone();
            if let Some(compiler) = registry.edge_compiler(&edge.label) {
                compiler.compile_edge(&mut ctx, layer, edge_id)?;
            }
            for (term, value) in &edge.properties {
                let Some(compiler) = registry.term_compiler(term) else {
                    continue;
                };
                if let Some(artifact) = compiler.compile_term(&mut ctx, term, value)? {
                    layer
                        .graph_mut()
                        .edge_compiled_mut(edge_id)?
                        .insert(term.as_str(), artifact);
                }
            }
        }
    }
    log::trace!("term compilation cached {} statements", ctx.cached_statements());
    Ok(())
}

/// Add every `labeledAs` value of an attribute as a label, then drop the term.
pub(crate) fn apply_labeled_as(layer: &mut Layer) -> CompileResult<()> {
    let graph = layer.graph_mut();
    for node_id in graph.nodes_with_label(vocab::ATTRIBUTE) {
        let Some(labels) = graph.remove_node_property(node_id, vocab::LABELED_AS)? else {
            continue;
        };
        for label in labels.to_string_list() {
            if !label.is_empty() {
                graph.add_label(node_id, &label)?;
            }
        }
    }
    Ok(())
}
