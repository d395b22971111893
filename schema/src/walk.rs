//! Depth-first traversal of attribute trees.

use crate::vocab;
use crate::AttributeKind;
use layers_core::{GraphResult, NodeId};
use layers_graph::Graph;
use std::collections::HashSet;

/// Children of a node through attribute-tree edges, in edge order.
pub fn attribute_children(graph: &Graph, node: NodeId) -> GraphResult<Vec<NodeId>> {
    let mut children = Vec::new();
    for edge_id in graph.outgoing(node, None)? {
        let edge = graph.edge(edge_id)?;
        if vocab::is_attribute_tree_edge(&edge.label) {
            children.push(edge.to);
        }
    }
    Ok(children)
}

/// Visit every node reachable from `root` through attribute-tree edges,
/// depth first, each node once. The callback gets the node and the path of
/// its ancestors from the root. Returning false stops the traversal.
///
/// Returns false if the traversal was stopped.
pub fn for_each_attribute<F>(graph: &Graph, root: NodeId, mut f: F) -> GraphResult<bool>
where
    F: FnMut(NodeId, &[NodeId]) -> bool,
{
    let mut seen = HashSet::new();
    let mut path = Vec::new();
    visit(graph, root, &mut path, &mut seen, &mut f)
}

fn visit<F>(
    graph: &Graph,
    node: NodeId,
    path: &mut Vec<NodeId>,
    seen: &mut HashSet<NodeId>,
    f: &mut F,
) -> GraphResult<bool>
where
    F: FnMut(NodeId, &[NodeId]) -> bool,
{
    if !seen.insert(node) {
        return Ok(true);
    }
    if !f(node, path) {
        return Ok(false);
    }
    path.push(node);
    for child in attribute_children(graph, node)? {
        if !visit(graph, child, path, seen, f)? {
            return Ok(false);
        }
    }
    path.pop();
    Ok(true)
}

/// Nodes under `root` (inclusive) carrying the kind label, in depth-first order.
pub fn collect_attributes(
    graph: &Graph,
    root: NodeId,
    kind: AttributeKind,
) -> GraphResult<Vec<NodeId>> {
    let mut found = Vec::new();
    let mut missing = None;
    for_each_attribute(graph, root, |id, _| match graph.node(id) {
        Ok(node) => {
            if node.has_label(kind.label()) {
                found.push(id);
            }
            true
        }
        Err(err) => {
            missing = Some(err);
            false
        }
    })?;
    match missing {
        Some(err) => Err(err),
        None => Ok(found),
    }
}
