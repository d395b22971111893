//! Term registry
//!
//! Maps term names to their semantics: value coercion, composition policy
//! and optional extension behaviors (composer, node/edge/term compilers,
//! value filter, validator, linked-data marshaler). The registry is
//! immutable after construction via TermRegistryBuilder.

mod builder;
mod capability;
mod error;
mod policy;
mod registry;
mod term;
pub mod vocabulary;

pub use builder::TermRegistryBuilder;
pub use capability::{
    CompileContext, Composer, EdgeCompiler, LdMarshaler, NodeCompiler, TermCapabilities,
    TermCompiler, Validator, ValueFilter,
};
pub use error::{
    ComposeError, ComposeResult, RegistryError, RegistryResult, TermError, TermResult,
};
pub use policy::{list_append, set_union, CompositionPolicy};
pub use registry::TermRegistry;
pub use term::{Term, TermTag, ValueType};
