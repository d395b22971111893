//! Running validators against data values.

use crate::{ConstraintError, ConstraintResult, Violation, Violations};
use layers_core::NodeId;
use layers_graph::Graph;
use layers_registry::{TermError, TermRegistry};
use layers_schema::{attribute_id, AttributeKind, Layer};
use std::collections::BTreeMap;

/// Check one data value against every validation term present on a schema
/// node. `None` means the value is absent.
///
/// Values that fail a constraint become violations; malformed validation
/// terms are errors.
pub fn validate_value(
    registry: &TermRegistry,
    graph: &Graph,
    node_id: NodeId,
    value: Option<&str>,
) -> ConstraintResult<Violations> {
    let node = graph.node(node_id)?;
    let id = attribute_id(node).unwrap_or_default();
    let mut violations = Violations::new();

    for term in registry.validation_terms(node) {
        let Some(validator) = registry.validator(term) else {
            continue;
        };
        match validator.validate(node, value) {
            Ok(()) => {}
            Err(TermError::Validation { term, reason }) => {
                log::trace!("{} failed {}: {}", id, term, reason);
                violations.push(Violation::new(term, id, reason).with_node(node_id));
            }
            Err(TermError::InvalidValue { term, reason })
            | Err(TermError::Compile { term, reason }) => {
                return Err(ConstraintError::InvalidValidator {
                    term,
                    attribute_id: id.to_string(),
                    reason,
                });
            }
            Err(other) => return Err(other.into()),
        }
    }
    Ok(violations)
}

/// Check a flat document against the Value attributes of a compiled layer.
///
/// `values` maps attribute IDs to raw values. Each value passes through the
/// value filters of its attribute before validation; attributes with no
/// entry are validated as absent.
pub fn validate_document(
    registry: &TermRegistry,
    layer: &Layer,
    values: &BTreeMap<String, String>,
) -> ConstraintResult<Violations> {
    let mut violations = Violations::new();
    for (id, node_id) in layer.index() {
        let node = layer.graph().node(*node_id)?;
        if !node.has_label(AttributeKind::Value.label()) {
            continue;
        }
        let value = registry.filter_value(node, values.get(id).cloned())?;
        violations.merge(validate_value(registry, layer.graph(), *node_id, value.as_deref())?);
    }
    for id in values.keys() {
        if layer.attribute(id).is_none() {
            log::warn!("value for unknown attribute {} ignored", id);
        }
    }
    if !violations.is_empty() {
        log::debug!("{} violations in document: {:?}", violations.len(), violations.by_attribute());
    }
    Ok(violations)
}
