//! Layered Schema Integration Test Framework
//!
//! Provides a fluent API for writing compilation scenarios.
//!
//! # Structure
//!
//! - **fixture** - Canned schema layers shared between tests
//! - **scenario** - Test orchestration: layers + target + overlays + expectations
//! - **assertion** - Checks over the compiled layer or the compile error
//!
//! # Example
//!
//! ```ignore
//! use layers_tests::prelude::*;
//!
//! #[test]
//! fn test() {
//!     Scenario::new("employee")
//!         .layer(fixture::person())
//!         .layer(fixture::employee())
//!         .compile("Employee")
//!         .expect(|a| a.has("Person/name").resolved())
//!         .run()
//!         .unwrap();
//! }
//! ```

mod error;
pub mod fixture;
mod scenario;

pub use assertion::{Assertion, AssertionBuilder};
pub use error::{ScenarioError, ScenarioResult};
pub use scenario::{DocumentCheck, Scenario};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::assertion::{Assertion, AssertionBuilder};
    pub use crate::error::{ScenarioError, ScenarioResult};
    pub use crate::fixture;
    pub use crate::scenario::Scenario;
    pub use layers_compiler::{CompileError, Compiler, CompilerConfig, MemoryLoader};
    pub use layers_core::PropertyValue;
    pub use layers_registry::{CompositionPolicy, Term, TermRegistryBuilder};
    pub use layers_schema::{AttributeDef, AttributeKind, Layer, LayerBuilder};
}
