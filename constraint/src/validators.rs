//! Built-in validation terms.

use crate::format::Format;
use layers_core::{CompiledValue, Node, PropertyValue};
use layers_registry::{
    CompileContext, CompositionPolicy, RegistryResult, Term, TermCompiler, TermError,
    TermRegistryBuilder, TermResult, TermTag, Validator, ValueType,
};
use layers_schema::attribute_id;
use regex_lite::Regex;
use std::sync::Arc;

pub const REQUIRED: &str = "validation/required";
pub const ENUMERATION: &str = "validation/enumeration";
pub const CONST: &str = "validation/const";
pub const PATTERN: &str = "validation/pattern";
pub const FORMAT: &str = "validation/json/format";

/// Register the validation terms.
pub fn register_validation_terms(builder: &mut TermRegistryBuilder) -> RegistryResult<()> {
    builder
        .register(
            validation_term(REQUIRED)
                .with_validator(Arc::new(RequiredValidator))
                .with_term_compiler(Arc::new(RequiredValidator)),
        )?
        .register(
            validation_term(ENUMERATION)
                .with_value_type(ValueType::StringList)
                .with_validator(Arc::new(EnumValidator::new(ENUMERATION))),
        )?
        .register(validation_term(CONST).with_validator(Arc::new(EnumValidator::new(CONST))))?
        .register(
            validation_term(PATTERN)
                .with_value_type(ValueType::String)
                .with_validator(Arc::new(PatternValidator))
                .with_term_compiler(Arc::new(PatternValidator)),
        )?
        .register(
            validation_term(FORMAT)
                .with_value_type(ValueType::String)
                .with_validator(Arc::new(FormatValidator))
                .with_term_compiler(Arc::new(FormatValidator)),
        )?;
    Ok(())
}

fn validation_term(name: &str) -> Term {
    Term::new(name)
        .with_composition(CompositionPolicy::Override)
        .with_tag(TermTag::Validation)
        .with_tag(TermTag::SchemaElement)
}

fn node_name(node: &Node) -> &str {
    attribute_id(node).unwrap_or_default()
}

// ==================== Required ====================

/// Fails when the attribute is required and no value is present.
#[derive(Debug)]
pub struct RequiredValidator;

impl RequiredValidator {
    fn is_required(node: &Node) -> bool {
        match node.get_property(REQUIRED) {
            Some(PropertyValue::Bool(b)) => *b,
            Some(PropertyValue::String(s)) => s == "true",
            _ => false,
        }
    }
}

impl Validator for RequiredValidator {
    fn validate(&self, schema_node: &Node, value: Option<&str>) -> TermResult<()> {
        if value.is_none() && Self::is_required(schema_node) {
            return Err(TermError::validation(
                REQUIRED,
                format!("missing required attribute {}", node_name(schema_node)),
            ));
        }
        Ok(())
    }
}

impl TermCompiler for RequiredValidator {
    fn compile_term(
        &self,
        _ctx: &mut CompileContext,
        term: &str,
        value: &PropertyValue,
    ) -> TermResult<Option<CompiledValue>> {
        match value {
            PropertyValue::Bool(_) | PropertyValue::String(_) | PropertyValue::List(_) => Ok(None),
            other => Err(TermError::compile(
                term,
                format!("expected a flag or attribute list, got {}", other.type_name()),
            )),
        }
    }
}

// ==================== Enumeration / Const ====================

/// Fails when a present value is not one of the options of the term.
#[derive(Debug)]
pub struct EnumValidator {
    term: &'static str,
}

impl EnumValidator {
    /// Validator reading its options from `term`.
    pub fn new(term: &'static str) -> Self {
        Self { term }
    }
}

impl Validator for EnumValidator {
    fn validate(&self, schema_node: &Node, value: Option<&str>) -> TermResult<()> {
        let options = match schema_node.get_property(self.term) {
            Some(PropertyValue::String(s)) => vec![s.clone()],
            Some(PropertyValue::List(items)) => items.clone(),
            Some(other) => {
                return Err(TermError::invalid_value(
                    self.term,
                    format!("options must be strings, got {}", other.type_name()),
                ))
            }
            None => return Err(TermError::invalid_value(self.term, "no options")),
        };
        let Some(value) = value else {
            return Ok(());
        };
        if options.iter().any(|option| option == value) {
            return Ok(());
        }
        Err(TermError::validation(
            self.term,
            format!("{:?} matches none of {:?}", value, options),
        ))
    }
}

// ==================== Pattern ====================

/// Fails when a present value does not match the regular expression of the
/// term. The expression is compiled once per distinct pattern during term
/// compilation and stored as the term's artifact.
#[derive(Debug)]
pub struct PatternValidator;

impl PatternValidator {
    fn compile(term: &str, pattern: &str) -> TermResult<Regex> {
        Regex::new(pattern)
            .map_err(|e| TermError::compile(term, format!("invalid pattern {:?}: {}", pattern, e)))
    }
}

impl TermCompiler for PatternValidator {
    fn compile_term(
        &self,
        ctx: &mut CompileContext,
        term: &str,
        value: &PropertyValue,
    ) -> TermResult<Option<CompiledValue>> {
        let Some(pattern) = value.as_str() else {
            return Err(TermError::compile(term, "pattern is not a string"));
        };
        let compiled = ctx.compile_statement(pattern, |source| {
            let regex = Self::compile(term, source)?;
            Ok(Arc::new(regex) as CompiledValue)
        })?;
        Ok(Some(compiled))
    }
}

impl Validator for PatternValidator {
    fn validate(&self, schema_node: &Node, value: Option<&str>) -> TermResult<()> {
        let Some(value) = value else {
            return Ok(());
        };
        let matched = match schema_node.compiled.get::<Regex>(PATTERN) {
            Some(regex) => regex.is_match(value),
            None => {
                let pattern = schema_node
                    .get_str(PATTERN)
                    .ok_or_else(|| TermError::invalid_value(PATTERN, "pattern is not a string"))?;
                log::trace!("pattern on {} used uncompiled", node_name(schema_node));
                Self::compile(PATTERN, pattern)
                    .map_err(|e| TermError::invalid_value(PATTERN, e.to_string()))?
                    .is_match(value)
            }
        };
        if matched {
            return Ok(());
        }
        let pattern = schema_node.get_str(PATTERN).unwrap_or_default();
        Err(TermError::validation(
            PATTERN,
            format!("{:?} does not match pattern {}", value, pattern),
        ))
    }
}

// ==================== Format ====================

/// Fails when a present, non-empty value is not written in the named
/// format. The format name is checked during term compilation and the
/// parsed [`Format`] stored as the term's artifact.
#[derive(Debug)]
pub struct FormatValidator;

impl FormatValidator {
    fn parse(value: &PropertyValue) -> Result<Format, String> {
        value
            .as_str()
            .ok_or_else(|| format!("format must be a string, got {}", value.type_name()))?
            .parse()
    }
}

impl TermCompiler for FormatValidator {
    fn compile_term(
        &self,
        _ctx: &mut CompileContext,
        term: &str,
        value: &PropertyValue,
    ) -> TermResult<Option<CompiledValue>> {
        let format = Self::parse(value).map_err(|reason| TermError::compile(term, reason))?;
        Ok(Some(Arc::new(format) as CompiledValue))
    }
}

impl Validator for FormatValidator {
    fn validate(&self, schema_node: &Node, value: Option<&str>) -> TermResult<()> {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return Ok(());
        };
        let format = match schema_node.compiled.get::<Format>(FORMAT) {
            Some(format) => *format,
            None => {
                let raw = schema_node
                    .get_property(FORMAT)
                    .ok_or_else(|| TermError::invalid_value(FORMAT, "no format"))?;
                Self::parse(raw).map_err(|reason| TermError::invalid_value(FORMAT, reason))?
            }
        };
        if format.is_valid(value) {
            return Ok(());
        }
        Err(TermError::validation(
            FORMAT,
            format!("invalid value for {}: {:?}", format, value),
        ))
    }
}
