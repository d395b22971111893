//! Loader and resolver seams.

use layers_schema::Layer;
use std::collections::HashMap;
use std::sync::Arc;

/// Error type returned by loaders and resolvers.
pub type LoaderError = Box<dyn std::error::Error + Send + Sync>;

/// Loads a layer by canonical reference.
///
/// `Ok(None)` means the reference is unknown. Loaders may block; the
/// compiler neither retries nor times them out.
pub trait SchemaLoader {
    fn load(&self, reference: &str) -> Result<Option<Arc<Layer>>, LoaderError>;
}

impl<F> SchemaLoader for F
where
    F: Fn(&str) -> Result<Option<Arc<Layer>>, LoaderError>,
{
    fn load(&self, reference: &str) -> Result<Option<Arc<Layer>>, LoaderError> {
        self(reference)
    }
}

/// Maps a weak or aliased reference to the canonical one used for loading
/// and memoization.
pub trait Resolver {
    fn resolve(&self, reference: &str) -> Result<String, LoaderError>;
}

impl<F> Resolver for F
where
    F: Fn(&str) -> Result<String, LoaderError>,
{
    fn resolve(&self, reference: &str) -> Result<String, LoaderError> {
        self(reference)
    }
}

/// In-memory layers keyed by reference.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    layers: HashMap<String, Arc<Layer>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer under its own id.
    pub fn insert(&mut self, layer: Layer) -> &mut Self {
        let reference = layer.id().to_string();
        self.insert_as(reference, Arc::new(layer))
    }

    /// Add a layer under an explicit reference.
    pub fn insert_as(&mut self, reference: impl Into<String>, layer: Arc<Layer>) -> &mut Self {
        self.layers.insert(reference.into(), layer);
        self
    }

    pub fn with(mut self, layer: Layer) -> Self {
        self.insert(layer);
        self
    }

    pub fn get(&self, reference: &str) -> Option<&Arc<Layer>> {
        self.layers.get(reference)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl SchemaLoader for MemoryLoader {
    fn load(&self, reference: &str) -> Result<Option<Arc<Layer>>, LoaderError> {
        Ok(self.layers.get(reference).cloned())
    }
}
