//! Scenario definition and builder.

use std::collections::{BTreeMap, HashMap};

use layers_compiler::{compose_overlay, Compiler, CompilerConfig, LoaderError, MemoryLoader};
use layers_constraint::{register_validation_terms, validate_document};
use layers_registry::{Term, TermRegistry, TermRegistryBuilder};
use layers_schema::Layer;

use crate::assertion::{Assertion, AssertionBuilder};
use crate::error::{ScenarioError, ScenarioResult};

/// A document checked against the compiled layer, with the number of
/// violations it must produce.
#[derive(Debug, Clone)]
pub struct DocumentCheck {
    pub values: BTreeMap<String, String>,
    pub violations: usize,
}

/// A complete compilation scenario: the layers a loader can serve, the
/// reference to compile, overlays to apply and what to expect.
pub struct Scenario {
    /// Scenario name (for reporting).
    name: String,
    /// Layers available to the loader.
    layers: Vec<Layer>,
    /// Overlays composed onto the compiled layer, in order.
    overlays: Vec<Layer>,
    /// Terms registered in addition to the core vocabulary.
    terms: Vec<Term>,
    /// Register the validation terms.
    validation: bool,
    /// Reference aliases applied by the resolver.
    aliases: HashMap<String, String>,
    config: CompilerConfig,
    /// Reference to compile.
    target: Option<String>,
    assertion: Assertion,
    documents: Vec<DocumentCheck>,
}

impl Scenario {
    /// Create a new scenario with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: Vec::new(),
            overlays: Vec::new(),
            terms: Vec::new(),
            validation: false,
            aliases: HashMap::new(),
            config: CompilerConfig::default(),
            target: None,
            assertion: Assertion::new(),
            documents: Vec::new(),
        }
    }

    /// Make a layer loadable under its id.
    pub fn layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Compose an overlay onto the compiled layer.
    pub fn overlay(mut self, overlay: Layer) -> Self {
        self.overlays.push(overlay);
        self
    }

    /// Register an extra term.
    pub fn term(mut self, term: Term) -> Self {
        self.terms.push(term);
        self
    }

    /// Register the validation terms.
    pub fn with_validation(mut self) -> Self {
        self.validation = true;
        self
    }

    /// Resolve `alias` to `reference` before loading.
    pub fn alias(mut self, alias: impl Into<String>, reference: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), reference.into());
        self
    }

    pub fn config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Parse the compiler configuration from TOML.
    pub fn config_toml(mut self, source: &str) -> ScenarioResult<Self> {
        self.config =
            CompilerConfig::from_toml_str(source)
                .map_err(|e| ScenarioError::Config(e.to_string()))?;
        Ok(self)
    }

    /// Set the reference to compile.
    pub fn compile(mut self, reference: impl Into<String>) -> Self {
        self.target = Some(reference.into());
        self
    }

    /// Set the expectation for the compilation outcome.
    pub fn expect<F>(mut self, assertion_fn: F) -> Self
    where
        F: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        self.assertion = assertion_fn(AssertionBuilder::new()).build();
        self
    }

    /// Validate a flat document against the compiled layer.
    pub fn document(mut self, values: &[(&str, &str)], violations: usize) -> Self {
        let values = values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.documents.push(DocumentCheck { values, violations });
        self
    }

    /// Get the scenario name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the registry this scenario compiles with.
    pub fn registry(&self) -> ScenarioResult<TermRegistry> {
        let mut builder = TermRegistryBuilder::new();
        builder
            .with_core_vocabulary()
            .map_err(|e| ScenarioError::registry(&self.name, e.to_string()))?;
        if self.validation {
            register_validation_terms(&mut builder)
                .map_err(|e| ScenarioError::registry(&self.name, e.to_string()))?;
        }
        for term in &self.terms {
            builder
                .register(term.clone())
                .map_err(|e| ScenarioError::registry(&self.name, e.to_string()))?;
        }
        Ok(builder.build())
    }

    /// Compile the target and apply overlays, without checking expectations.
    pub fn compile_layer(&self, registry: &TermRegistry) -> ScenarioResult<Layer> {
        let reference = self
            .target
            .clone()
            .ok_or_else(|| ScenarioError::MissingTarget {
                scenario: self.name.clone(),
            })?;

        let mut loader = MemoryLoader::new();
        for layer in &self.layers {
            loader.insert(layer.deep_clone()?);
        }
        let aliases = self.aliases.clone();
        let compiler = Compiler::new(registry, loader)
            .with_config(self.config.clone())
            .with_resolver(move |r: &str| -> Result<String, LoaderError> {
                Ok(aliases.get(r).cloned().unwrap_or_else(|| r.to_string()))
            });

        log::debug!("scenario {}: compiling {}", self.name, reference);
        let mut layer = compiler
            .compile(&reference)
            .map_err(|source| ScenarioError::Compile {
                reference: reference.clone(),
                source,
            })?;
        for overlay in &self.overlays {
            compose_overlay(registry, &mut layer, overlay).map_err(|source| {
                ScenarioError::Overlay {
                    overlay: overlay.id().to_string(),
                    source,
                }
            })?;
        }
        Ok(layer)
    }

    /// Run the scenario and verify every expectation.
    pub fn run(&self) -> ScenarioResult<()> {
        let registry = self.registry()?;
        let result = self.compile_layer(&registry);

        let outcome = match result {
            Ok(layer) => Ok(layer),
            Err(ScenarioError::Compile { source, .. })
            | Err(ScenarioError::Overlay { source, .. }) => {
                Err(source.to_string())
            }
            Err(other) => return Err(other),
        };
        self.assertion.verify(&self.name, &outcome)?;

        let Ok(layer) = outcome else {
            return Ok(());
        };
        for (i, check) in self.documents.iter().enumerate() {
            let violations = validate_document(&registry, &layer, &check.values)?;
            if violations.len() != check.violations {
                let found: Vec<String> = violations.all().iter().map(|v| v.to_string()).collect();
                return Err(ScenarioError::assertion_failed(
                    &self.name,
                    format!(
                        "document {}: expected {} violations, got {:?}",
                        i, check.violations, found
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layers_schema::{AttributeDef, LayerBuilder};

    #[test]
    fn test_missing_target() {
        let scenario = Scenario::new("empty");

        let err = scenario.run().unwrap_err();

        assert!(matches!(err, ScenarioError::MissingTarget { .. }));
    }

    #[test]
    fn test_minimal_scenario() {
        let layer = LayerBuilder::schema("s")
            .root(AttributeDef::object("root").child(AttributeDef::value("a")))
            .build()
            .unwrap();

        Scenario::new("minimal")
            .layer(layer)
            .compile("s")
            .expect(|a| a.has_all(&["root", "a"]).resolved())
            .run()
            .unwrap();
    }
}
