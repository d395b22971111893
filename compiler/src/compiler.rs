//! Schema compilation: reference resolution over a loader.

use crate::composite::resolve_compositions;
use crate::terms::{apply_labeled_as, compile_terms};
use crate::{
    CompileError, CompileResult, CompilerConfig, ResolutionContext, Resolver, SchemaLoader,
};
use layers_core::{NodeId, PropertyValue};
use layers_graph::Graph;
use layers_registry::TermRegistry;
use layers_schema::{
    attribute_id, collect_attributes, is_attribute, vocab, AttributeKind, Layer, LayerKind,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Compiles schema layers into self-contained layers.
///
/// A compiled layer has every Reference attribute replaced by the root of
/// the layer it names, every Composite flattened into an Object and every
/// include copied in place. The compiler holds no state between calls.
pub struct Compiler<'a> {
    registry: &'a TermRegistry,
    loader: Box<dyn SchemaLoader + 'a>,
    resolver: Option<Box<dyn Resolver + 'a>>,
    config: CompilerConfig,
}

impl<'a> Compiler<'a> {
    pub fn new(registry: &'a TermRegistry, loader: impl SchemaLoader + 'a) -> Self {
        Self {
            registry,
            loader: Box::new(loader),
            resolver: None,
            config: CompilerConfig::default(),
        }
    }

    /// Map references through `resolver` before loading them.
    pub fn with_resolver(mut self, resolver: impl Resolver + 'a) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn registry(&self) -> &TermRegistry {
        self.registry
    }

    // ==================== Entry Points ====================

    /// Load the layer named by `reference` and compile it.
    pub fn compile(&self, reference: &str) -> CompileResult<Layer> {
        let mut ctx = ResolutionContext::new();
        self.compile_reference(&mut ctx, reference, true)?;
        self.finish(ctx)
    }

    /// Compile an already loaded layer. The source layer is left untouched;
    /// references back to it resolve to the compiled root.
    pub fn compile_schema(&self, layer: &Layer) -> CompileResult<Layer> {
        let mut ctx = ResolutionContext::new();
        self.compile_layer(&mut ctx, layer.id(), layer, true)?;
        self.finish(ctx)
    }

    fn finish(&self, ctx: ResolutionContext) -> CompileResult<Layer> {
        let loaded = ctx.loaded_count();
        let mut layer = ctx.into_target()?;
        compile_terms(self.registry, &mut layer)?;
        if self.config.apply_labeled_as {
            apply_labeled_as(&mut layer)?;
        }
        layer.reindex()?;
        log::debug!(
            "compiled {}: {} layers loaded, {} nodes, {} attributes",
            layer.id(),
            loaded,
            layer.graph().node_count(),
            layer.index().len()
        );
        Ok(layer)
    }

    // ==================== Loading ====================

    pub(crate) fn resolve(&self, reference: &str) -> CompileResult<String> {
        match &self.resolver {
            Some(resolver) => resolver
                .resolve(reference)
                .map_err(|source| CompileError::Resolve {
                    reference: reference.to_string(),
                    source,
                }),
            None => Ok(reference.to_string()),
        }
    }

    /// Load a canonical reference, once per compilation.
    pub(crate) fn load(
        &self,
        ctx: &mut ResolutionContext,
        reference: &str,
    ) -> CompileResult<Arc<Layer>> {
        if let Some(layer) = ctx.loaded(reference) {
            return Ok(layer);
        }
        let layer = self
            .loader
            .load(reference)
            .map_err(|source| CompileError::Load {
                reference: reference.to_string(),
                source,
            })?
            .ok_or_else(|| CompileError::NotFound(reference.to_string()))?;
        log::trace!("loaded {} as {}", reference, layer.id());
        ctx.cache_loaded(reference, Arc::clone(&layer));
        Ok(layer)
    }

    // ==================== Compilation ====================

    /// Compile the layer named by `reference` into the context, returning
    /// its root and canonical reference. A reference compiled before
    /// returns the memoized root.
    fn compile_reference(
        &self,
        ctx: &mut ResolutionContext,
        reference: &str,
        top: bool,
    ) -> CompileResult<(String, NodeId)> {
        let canonical = self.resolve(reference)?;
        if let Some(root) = ctx.compiled_root(&canonical) {
            return Ok((canonical, root));
        }
        if ctx.depth() > self.config.max_depth {
            return Err(CompileError::DepthExceeded {
                reference: canonical,
                limit: self.config.max_depth,
            });
        }
        let layer = self.load(ctx, &canonical)?;
        let root = self.compile_layer(ctx, &canonical, &layer, top)?;
        Ok((canonical, root))
    }

    fn compile_layer(
        &self,
        ctx: &mut ResolutionContext,
        reference: &str,
        source: &Layer,
        top: bool,
    ) -> CompileResult<NodeId> {
        log::debug!("compiling {} (depth {})", reference, ctx.depth());
        let root = self.import(ctx, reference, source, top)?;
        ctx.mark_compiled(reference, root);

        if self.config.record_entity_schema {
            ctx.target_mut()?.graph_mut().set_node_property(
                root,
                vocab::ENTITY_SCHEMA,
                PropertyValue::from(source.id()),
            )?;
        }

        ctx.enter();
        let resolved = self.resolve_layer(ctx, root, top);
        ctx.leave();
        resolved?;
        Ok(root)
    }

    fn resolve_layer(
        &self,
        ctx: &mut ResolutionContext,
        root: NodeId,
        top: bool,
    ) -> CompileResult<()> {
        self.resolve_includes(ctx, root)?;
        self.resolve_references(ctx, root)?;
        resolve_compositions(self.registry, ctx.target_mut()?, root, top)
    }

    /// Copy `source` into the context's target layer. The first layer
    /// imported becomes the target.
    fn import(
        &self,
        ctx: &mut ResolutionContext,
        reference: &str,
        source: &Layer,
        top: bool,
    ) -> CompileResult<NodeId> {
        let mut map = HashMap::new();
        if top || !ctx.has_target() {
            let mut graph = Graph::new();
            let root = graph.import_subgraph(source.graph(), source.root(), &mut map)?;
            ctx.set_target(Layer::from_graph(source.id(), LayerKind::Schema, graph, root)?);
            return Ok(root);
        }

        let target = ctx.target_mut()?;
        let root = target
            .graph_mut()
            .import_subgraph(source.graph(), source.root(), &mut map)?;
        index_copies(target, &map, reference)?;
        Ok(root)
    }

    // ==================== References ====================

    fn resolve_references(&self, ctx: &mut ResolutionContext, root: NodeId) -> CompileResult<()> {
        let references = collect_attributes(ctx.target()?.graph(), root, AttributeKind::Reference)?;
        for node_id in references {
            let node = ctx.target()?.graph().node(node_id)?;
            if !node.has_label(AttributeKind::Reference.label()) {
                continue;
            }
            let id = attribute_id(node).unwrap_or_default().to_string();
            let reference = node
                .get_str(vocab::REFERENCE)
                .filter(|r| !r.is_empty())
                .ok_or_else(|| CompileError::UnresolvableReference {
                    id: id.clone(),
                    reference: String::new(),
                })?
                .to_string();

            log::debug!("resolving reference {} -> {}", id, reference);
            let (canonical, target_root) = self.compile_reference(ctx, &reference, false)?;
            self.splice(ctx.target_mut()?, node_id, target_root, &canonical)?;
        }
        Ok(())
    }

    /// Make `node` stand for `root`: take over its labels and edges, and
    /// compose the root's properties into the local ones.
    fn splice(
        &self,
        layer: &mut Layer,
        node_id: NodeId,
        root: NodeId,
        reference: &str,
    ) -> CompileResult<()> {
        let graph = layer.graph_mut();
        let local = graph.node(node_id)?.clone();
        let target = graph.node(root)?.clone();
        let id = attribute_id(&local).unwrap_or_default().to_string();

        if target.has_label(AttributeKind::Reference.label()) {
            return Err(CompileError::UnresolvableReference {
                id,
                reference: reference.to_string(),
            });
        }

        graph.remove_label(node_id, AttributeKind::Reference.label())?;
        for label in &target.labels {
            graph.add_label(node_id, label)?;
        }

        let mut merged = local.properties.clone();
        self.registry
            .compose_referenced(&mut merged, &target.properties)
            .map_err(|e| CompileError::compose(id.as_str(), e))?;
        merged.insert(vocab::REFERENCE.to_string(), PropertyValue::from(reference));
        if let Some(schema) = target.properties.get(vocab::ENTITY_SCHEMA) {
            merged.insert(vocab::ENTITY_SCHEMA.to_string(), schema.clone());
        }
        graph.set_node_properties(node_id, merged)?;

        for edge_id in graph.outgoing(root, None)? {
            let edge = graph.edge(edge_id)?.clone();
            let mut properties = edge.properties.clone();
            properties.remove(vocab::COMPILATION_ARTIFACT);
            let copy = graph.create_edge(node_id, edge.to, &edge.label, properties)?;
            graph.edge_compiled_mut(copy)?.extend_from(&edge.compiled);
            if self.config.mark_compilation_artifacts {
                graph.set_edge_property(
                    edge_id,
                    vocab::COMPILATION_ARTIFACT,
                    PropertyValue::Bool(true),
                )?;
            }
        }
        Ok(())
    }
}

/// Index the attribute IDs of freshly copied nodes. `copies` maps source
/// nodes to their copies; IDs already bound to another node are duplicates.
pub(crate) fn index_copies(
    layer: &mut Layer,
    copies: &HashMap<NodeId, NodeId>,
    reference: &str,
) -> CompileResult<()> {
    let mut copied: Vec<(NodeId, NodeId)> = copies.iter().map(|(s, c)| (*s, *c)).collect();
    copied.sort();
    for (_, copy) in copied {
        let node = layer.graph().node(copy)?;
        if !is_attribute(node) {
            continue;
        }
        let Some(id) = attribute_id(node).map(str::to_string) else {
            continue;
        };
        layer
            .insert_index(&id, copy)
            .map_err(|_| CompileError::DuplicateAttribute {
                id,
                reference: reference.to_string(),
            })?;
    }
    Ok(())
}
