//! Term definitions and value coercion.

use crate::capability::{
    Composer, EdgeCompiler, LdMarshaler, NodeCompiler, TermCapabilities, TermCompiler, Validator,
    ValueFilter,
};
use crate::{CompositionPolicy, TermError, TermResult};
use layers_core::PropertyValue;
use serde_json::Value as Json;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Coercion rule applied to raw input values of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    /// Strings stay strings, string arrays become lists, other scalars keep their type.
    #[default]
    Any,
    String,
    StringList,
    Integer,
    Float,
    Boolean,
}

impl ValueType {
    /// Coerce a raw JSON value for `term` into a property value.
    pub fn coerce(self, term: &str, raw: &Json) -> TermResult<PropertyValue> {
        match self {
            ValueType::Any => match raw {
                Json::String(s) => Ok(PropertyValue::String(s.clone())),
                Json::Bool(b) => Ok(PropertyValue::Bool(*b)),
                Json::Number(n) => match n.as_i64() {
                    Some(i) => Ok(PropertyValue::Int(i)),
                    None => n
                        .as_f64()
                        .map(PropertyValue::Float)
                        .ok_or_else(|| TermError::invalid_value(term, "number out of range")),
                },
                Json::Array(items) => items
                    .iter()
                    .map(|item| scalar_string(term, item))
                    .collect::<TermResult<Vec<_>>>()
                    .map(PropertyValue::List),
                Json::Null | Json::Object(_) => {
                    Err(TermError::invalid_value(term, "expected a scalar or a list"))
                }
            },
            ValueType::String => scalar_string(term, raw).map(PropertyValue::String),
            ValueType::StringList => match raw {
                Json::Array(items) => items
                    .iter()
                    .map(|item| scalar_string(term, item))
                    .collect::<TermResult<Vec<_>>>()
                    .map(PropertyValue::List),
                other => scalar_string(term, other).map(|s| PropertyValue::List(vec![s])),
            },
            ValueType::Integer => match raw {
                Json::Number(n) => n
                    .as_i64()
                    .map(PropertyValue::Int)
                    .ok_or_else(|| {
                        TermError::invalid_value(term, format!("{} is not an integer", n))
                    }),
                Json::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(PropertyValue::Int)
                    .map_err(|e| TermError::invalid_value(term, e.to_string())),
                other => Err(TermError::invalid_value(
                    term,
                    format!("{} is not an integer", other),
                )),
            },
            ValueType::Float => match raw {
                Json::Number(n) => n
                    .as_f64()
                    .map(PropertyValue::Float)
                    .ok_or_else(|| TermError::invalid_value(term, "number out of range")),
                Json::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(PropertyValue::Float)
                    .map_err(|e| TermError::invalid_value(term, e.to_string())),
                other => Err(TermError::invalid_value(term, format!("{} is not a number", other))),
            },
            ValueType::Boolean => match raw {
                Json::Bool(b) => Ok(PropertyValue::Bool(*b)),
                Json::String(s) => match s.trim() {
                    "true" => Ok(PropertyValue::Bool(true)),
                    "false" => Ok(PropertyValue::Bool(false)),
                    other => Err(TermError::invalid_value(
                        term,
                        format!("{} is not a boolean", other),
                    )),
                },
                other => Err(TermError::invalid_value(term, format!("{} is not a boolean", other))),
            },
        }
    }
}

fn scalar_string(term: &str, raw: &Json) -> TermResult<String> {
    match raw {
        Json::String(s) => Ok(s.clone()),
        Json::Number(n) => Ok(n.to_string()),
        Json::Bool(b) => Ok(b.to_string()),
        other => Err(TermError::invalid_value(term, format!("{} is not a string", other))),
    }
}

/// Classification tags carried on terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TermTag {
    /// Term describes schema structure.
    SchemaElement,
    /// Term declares a constraint on data values.
    Validation,
    /// Term records where data came from.
    Provenance,
}

/// A named piece of schema vocabulary.
#[derive(Debug, Clone)]
pub struct Term {
    pub name: String,
    pub aliases: Vec<String>,
    pub value_type: ValueType,
    pub composition: CompositionPolicy,
    pub tags: BTreeSet<TermTag>,
    pub capabilities: TermCapabilities,
}

impl Term {
    /// A term with the Set policy, the Any value type and no capabilities.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            value_type: ValueType::Any,
            composition: CompositionPolicy::Set,
            tags: BTreeSet::new(),
            capabilities: TermCapabilities::default(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn with_composition(mut self, composition: CompositionPolicy) -> Self {
        self.composition = composition;
        self
    }

    pub fn with_tag(mut self, tag: TermTag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_composer(mut self, composer: Arc<dyn Composer>) -> Self {
        self.capabilities.composer = Some(composer);
        self
    }

    pub fn with_node_compiler(mut self, compiler: Arc<dyn NodeCompiler>) -> Self {
        self.capabilities.node_compiler = Some(compiler);
        self
    }

    pub fn with_edge_compiler(mut self, compiler: Arc<dyn EdgeCompiler>) -> Self {
        self.capabilities.edge_compiler = Some(compiler);
        self
    }

    pub fn with_term_compiler(mut self, compiler: Arc<dyn TermCompiler>) -> Self {
        self.capabilities.term_compiler = Some(compiler);
        self
    }

    pub fn with_value_filter(mut self, filter: Arc<dyn ValueFilter>) -> Self {
        self.capabilities.value_filter = Some(filter);
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.capabilities.validator = Some(validator);
        self
    }

    pub fn with_ld_marshaler(mut self, marshaler: Arc<dyn LdMarshaler>) -> Self {
        self.capabilities.ld_marshaler = Some(marshaler);
        self
    }

    pub fn has_tag(&self, tag: TermTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Coerce raw input with this term's value type.
    pub fn coerce(&self, raw: &Json) -> TermResult<PropertyValue> {
        self.value_type.coerce(&self.name, raw)
    }
}
