//! Term extension points.
//!
//! A term may carry any subset of these behaviors. Each one is optional and
//! looked up by term name; a missing capability is a no-op.

use crate::{ComposeResult, TermResult};
use layers_core::{CompiledValue, EdgeId, Node, NodeId, PropertyValue};
use layers_schema::Layer;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Custom composition replacing the term's policy.
pub trait Composer: Send + Sync {
    fn compose(
        &self,
        old: Option<&PropertyValue>,
        new: Option<&PropertyValue>,
    ) -> ComposeResult<Option<PropertyValue>>;
}

/// Compiles a non-attribute node labeled with the term.
pub trait NodeCompiler: Send + Sync {
    fn compile_node(
        &self,
        ctx: &mut CompileContext,
        layer: &mut Layer,
        node: NodeId,
    ) -> TermResult<()>;
}

/// Compiles an edge labeled with the term.
pub trait EdgeCompiler: Send + Sync {
    fn compile_edge(
        &self,
        ctx: &mut CompileContext,
        layer: &mut Layer,
        edge: EdgeId,
    ) -> TermResult<()>;
}

/// Compiles a property value of the term into an artifact.
pub trait TermCompiler: Send + Sync {
    /// Returns the artifact to store under the term, or None to store nothing.
    fn compile_term(
        &self,
        ctx: &mut CompileContext,
        term: &str,
        value: &PropertyValue,
    ) -> TermResult<Option<CompiledValue>>;
}

/// Post-processes an ingested value according to a schema node.
pub trait ValueFilter: Send + Sync {
    fn filter(&self, schema_node: &Node, value: Option<String>) -> TermResult<Option<String>>;
}

/// Checks a data value against the constraint the term declares on a schema node.
pub trait Validator: Send + Sync {
    fn validate(&self, schema_node: &Node, value: Option<&str>) -> TermResult<()>;
}

/// Converts term values to and from their linked-data JSON form.
pub trait LdMarshaler: Send + Sync {
    fn marshal(&self, term: &str, value: &PropertyValue) -> TermResult<serde_json::Value>;
    fn unmarshal(&self, term: &str, value: &serde_json::Value) -> TermResult<PropertyValue>;
}

/// Optional behaviors attached to a term at registration.
#[derive(Clone, Default)]
pub struct TermCapabilities {
    pub composer: Option<Arc<dyn Composer>>,
    pub node_compiler: Option<Arc<dyn NodeCompiler>>,
    pub edge_compiler: Option<Arc<dyn EdgeCompiler>>,
    pub term_compiler: Option<Arc<dyn TermCompiler>>,
    pub value_filter: Option<Arc<dyn ValueFilter>>,
    pub validator: Option<Arc<dyn Validator>>,
    pub ld_marshaler: Option<Arc<dyn LdMarshaler>>,
}

impl TermCapabilities {
    /// Names of the capabilities present.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.composer.is_some() {
            names.push("composer");
        }
        if self.node_compiler.is_some() {
            names.push("node_compiler");
        }
        if self.edge_compiler.is_some() {
            names.push("edge_compiler");
        }
        if self.term_compiler.is_some() {
            names.push("term_compiler");
        }
        if self.value_filter.is_some() {
            names.push("value_filter");
        }
        if self.validator.is_some() {
            names.push("validator");
        }
        if self.ld_marshaler.is_some() {
            names.push("ld_marshaler");
        }
        names
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }
}

impl fmt::Debug for TermCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// State shared by term compilers during one compilation pass.
/// Caches compiled statements so identical sources compile once.
#[derive(Default)]
pub struct CompileContext {
    statement_cache: HashMap<String, CompiledValue>,
}

impl CompileContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compiled_statement(&self, statement: &str) -> Option<CompiledValue> {
        self.statement_cache.get(statement).cloned()
    }

    /// Return the cached artifact for `statement`, compiling it on a miss.
    pub fn compile_statement<F>(&mut self, statement: &str, compile: F) -> TermResult<CompiledValue>
    where
        F: FnOnce(&str) -> TermResult<CompiledValue>,
    {
        if let Some(compiled) = self.statement_cache.get(statement) {
            return Ok(Arc::clone(compiled));
        }
        let compiled = compile(statement)?;
        self.statement_cache
            .insert(statement.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn cached_statements(&self) -> usize {
        self.statement_cache.len()
    }
}

impl fmt::Debug for CompileContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileContext")
            .field("cached_statements", &self.statement_cache.len())
            .finish()
    }
}
