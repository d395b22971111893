//! Layered schema compiler
//!
//! Turns a schema layer and everything it names into one self-contained
//! layer:
//! - Include expansion, with optional namespace rewriting of attribute IDs
//! - Reference resolution through a loader, memoized per compilation so
//!   cycles and diamonds load each layer once
//! - Composite flattening into Objects
//! - Term compilation and `labeledAs` label application
//!
//! Overlays are composed onto a schema separately with [`compose_overlay`].

mod compiler;
mod composite;
mod config;
mod context;
mod error;
mod include;
mod loader;
mod overlay;
mod terms;

pub use compiler::Compiler;
pub use config::CompilerConfig;
pub use context::ResolutionContext;
pub use error::{CompileError, CompileResult};
pub use loader::{LoaderError, MemoryLoader, Resolver, SchemaLoader};
pub use overlay::compose_overlay;
