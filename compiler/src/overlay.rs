//! Overlay composition.

use crate::compiler::index_copies;
use crate::{CompileError, CompileResult};
use layers_core::NodeId;
use layers_registry::{vocabulary, TermRegistry};
use layers_schema::{attribute_id, for_each_attribute, vocab, AttributeKind, Layer, LayerKind};
use std::collections::{HashMap, HashSet};

/// Compose `overlay` onto `schema` in place.
///
/// Overlay attributes are matched to schema attributes by ID and by the IDs
/// of their ancestors, nearest first; a match composes the overlay's terms
/// into the schema attribute. Unmatched attributes are copied, with their
/// subtrees, under the schema attribute whose ID matches their overlay
/// parent. The overlay root always composes into the schema root.
pub fn compose_overlay(
    registry: &TermRegistry,
    schema: &mut Layer,
    overlay: &Layer,
) -> CompileResult<()> {
    if overlay.kind() != LayerKind::Overlay {
        return Err(CompileError::Overlay {
            overlay: overlay.id().to_string(),
            reason: format!("layer is a {}", overlay.kind()),
        });
    }
    check_target_types(schema, overlay)?;

    let schema_paths = ancestor_ids(schema)?;
    let mut visits: Vec<(NodeId, Vec<NodeId>)> = Vec::new();
    for_each_attribute(overlay.graph(), overlay.root(), |node, path| {
        visits.push((node, path.to_vec()));
        true
    })?;

    let mut processed: HashSet<NodeId> = HashSet::new();
    for (source, path) in visits {
        if processed.contains(&source) {
            continue;
        }
        processed.insert(source);

        let source_node = overlay.graph().node(source)?;
        if path.is_empty() {
            let root = schema.root();
            compose_into(registry, schema, root, source_node)?;
            continue;
        }

        let id = attribute_id(source_node).unwrap_or_default();
        let overlay_path = path_ids(overlay, &path[1..]);
        if let Some(target) = schema.attribute(id) {
            let matches = schema_paths
                .get(&target)
                .map(|schema_path| paths_match(schema_path, &overlay_path))
                .unwrap_or(false);
            if matches {
                compose_into(registry, schema, target, source_node)?;
            } else {
                log::debug!("overlay {}: {} matches by ID only, skipped", overlay.id(), id);
            }
            continue;
        }

        let parent = path[path.len() - 1];
        let schema_parent = if parent == overlay.root() {
            Some(schema.root())
        } else {
            overlay
                .graph()
                .node(parent)
                .ok()
                .and_then(attribute_id)
                .and_then(|parent_id| schema.attribute(parent_id))
        };
        let Some(schema_parent) = schema_parent else {
            return Err(CompileError::invalid_composition(
                id,
                "overlay attribute has no parent in the schema",
            ));
        };

        let mut copies = HashMap::new();
        let copy = schema
            .graph_mut()
            .import_subgraph(overlay.graph(), source, &mut copies)?;
        for edge_id in overlay.graph().incoming(source, None)? {
            let edge = overlay.graph().edge(edge_id)?;
            if edge.from == parent && vocab::is_attribute_tree_edge(&edge.label) {
                schema
                    .graph_mut()
                    .create_edge(schema_parent, copy, &edge.label, edge.properties.clone())?;
                break;
            }
        }
        index_copies(schema, &copies, overlay.id())?;
        processed.extend(copies.keys().copied());
        log::trace!("overlay {}: added {}", overlay.id(), id);
    }
    Ok(())
}

fn check_target_types(schema: &Layer, overlay: &Layer) -> CompileResult<()> {
    let target_type = |layer: &Layer| -> CompileResult<Vec<String>> {
        let mut types: Vec<String> = layer
            .graph()
            .node(layer.root())?
            .get_property(vocabulary::TARGET_TYPE)
            .map(|v| v.to_string_list())
            .unwrap_or_default();
        types.sort();
        Ok(types)
    };
    let (expected, offered) = (target_type(schema)?, target_type(overlay)?);
    if !expected.is_empty() && !offered.is_empty() && expected != offered {
        return Err(CompileError::Overlay {
            overlay: overlay.id().to_string(),
            reason: format!("target type {:?} does not match {:?}", offered, expected),
        });
    }
    Ok(())
}

fn compose_into(
    registry: &TermRegistry,
    schema: &mut Layer,
    target: NodeId,
    source: &layers_core::Node,
) -> CompileResult<()> {
    let graph = schema.graph_mut();
    let mut merged = graph.node(target)?.properties.clone();
    let id = attribute_id(source).unwrap_or_default();
    registry
        .compose_properties(&mut merged, &source.properties)
        .map_err(|e| CompileError::compose(id, e))?;
    graph.set_node_properties(target, merged)?;
    for label in &source.labels {
        if label != vocab::ATTRIBUTE && !AttributeKind::is_kind_label(label) {
            graph.add_label(target, label)?;
        }
    }
    Ok(())
}

/// Ancestor IDs of every schema attribute, excluding the root.
fn ancestor_ids(schema: &Layer) -> CompileResult<HashMap<NodeId, Vec<String>>> {
    let mut paths = HashMap::new();
    for_each_attribute(schema.graph(), schema.root(), |node, path| {
        let ids = if path.is_empty() {
            Vec::new()
        } else {
            path_ids(schema, &path[1..])
        };
        paths.insert(node, ids);
        true
    })?;
    Ok(paths)
}

fn path_ids(layer: &Layer, path: &[NodeId]) -> Vec<String> {
    path.iter()
        .map(|n| {
            layer
                .graph()
                .node(*n)
                .ok()
                .and_then(attribute_id)
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

/// Compare ancestor IDs from the nearest ancestor outwards. The schema path
/// may be longer than the overlay path, not the other way around.
fn paths_match(schema_path: &[String], overlay_path: &[String]) -> bool {
    let mut schema_ids = schema_path.iter().rev();
    for overlay_id in overlay_path.iter().rev() {
        match schema_ids.next() {
            Some(schema_id) if schema_id == overlay_id => {}
            _ => return false,
        }
    }
    true
}
