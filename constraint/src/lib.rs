//! Validation terms
//!
//! Declarative constraints carried as terms on schema attributes:
//! - `validation/required`, `validation/enumeration`, `validation/const`,
//!   `validation/pattern` and `validation/json/format`, registered with
//!   [`register_validation_terms`]
//! - [`validate_value`] and [`validate_document`] check data values against
//!   a compiled layer and collect [`Violations`]

mod check;
mod error;
mod format;
mod validators;
mod violation;

pub use check::{validate_document, validate_value};
pub use error::{ConstraintError, ConstraintResult};
pub use format::Format;
pub use validators::{
    register_validation_terms, EnumValidator, FormatValidator, PatternValidator,
    RequiredValidator, CONST, ENUMERATION, FORMAT, PATTERN, REQUIRED,
};
pub use violation::{Violation, Violations};
