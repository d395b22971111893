//! Schema vocabulary terms known to the compiler.

use crate::{CompositionPolicy, Term, TermTag, ValueType};
use layers_schema::vocab;

pub const DESCRIPTION: &str = "description";
pub const ATTRIBUTE_NAME: &str = "attributeName";
pub const ATTRIBUTE_INDEX: &str = "attributeIndex";
pub const DEFAULT_VALUE: &str = "defaultValue";
pub const TARGET_TYPE: &str = "targetType";
pub const CHARACTER_ENCODING: &str = "characterEncoding";
pub const ENTITY_ID_FIELDS: &str = "entityIdFields";

pub(crate) fn core_terms() -> Vec<Term> {
    vec![
        Term::new(DESCRIPTION).with_composition(CompositionPolicy::Set),
        Term::new(ATTRIBUTE_NAME)
            .with_composition(CompositionPolicy::Override)
            .with_value_type(ValueType::String),
        Term::new(ATTRIBUTE_INDEX)
            .with_composition(CompositionPolicy::NoCompose)
            .with_value_type(ValueType::Integer),
        Term::new(DEFAULT_VALUE).with_composition(CompositionPolicy::Override),
        Term::new(TARGET_TYPE)
            .with_composition(CompositionPolicy::Set)
            .with_value_type(ValueType::StringList),
        Term::new(CHARACTER_ENCODING).with_composition(CompositionPolicy::Override),
        Term::new(ENTITY_ID_FIELDS)
            .with_composition(CompositionPolicy::Override)
            .with_value_type(ValueType::StringList)
            .with_tag(TermTag::SchemaElement),
        Term::new(vocab::REFERENCE)
            .with_composition(CompositionPolicy::Override)
            .with_value_type(ValueType::String)
            .with_tag(TermTag::SchemaElement),
        Term::new(vocab::ENTITY_SCHEMA)
            .with_composition(CompositionPolicy::Override)
            .with_value_type(ValueType::String)
            .with_tag(TermTag::SchemaElement),
        Term::new(vocab::INCLUDE)
            .with_composition(CompositionPolicy::Override)
            .with_value_type(ValueType::String)
            .with_tag(TermTag::SchemaElement),
        Term::new(vocab::NAMESPACE)
            .with_composition(CompositionPolicy::Override)
            .with_value_type(ValueType::String)
            .with_tag(TermTag::SchemaElement),
        Term::new(vocab::LABELED_AS)
            .with_composition(CompositionPolicy::Set)
            .with_value_type(ValueType::StringList)
            .with_tag(TermTag::SchemaElement),
        Term::new(vocab::COMPILATION_ARTIFACT)
            .with_composition(CompositionPolicy::Override)
            .with_value_type(ValueType::Boolean),
    ]
}
