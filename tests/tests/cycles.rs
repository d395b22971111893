//! Cyclic, shared and deep reference graphs.

use layers_compiler::LoaderError;
use layers_tests::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Compile `reference` with a loader that counts every load per reference.
fn compile_counting(layers: Vec<Layer>, reference: &str) -> (Layer, HashMap<String, usize>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let registry = Scenario::new("counting").registry().unwrap();
    let layers: HashMap<String, Arc<Layer>> = layers
        .into_iter()
        .map(|l| (l.id().to_string(), Arc::new(l)))
        .collect();
    let counts: HashMap<String, Arc<AtomicUsize>> = layers
        .keys()
        .map(|k| (k.clone(), Arc::new(AtomicUsize::new(0))))
        .collect();

    let seen = counts.clone();
    let loader = move |r: &str| -> Result<Option<Arc<Layer>>, LoaderError> {
        if let Some(c) = seen.get(r) {
            c.fetch_add(1, Ordering::SeqCst);
        }
        Ok(layers.get(r).cloned())
    };
    let layer = Compiler::new(&registry, loader).compile(reference).unwrap();

    let counts = counts
        .into_iter()
        .map(|(k, v)| (k, v.load(Ordering::SeqCst)))
        .collect();
    (layer, counts)
}

#[test]
fn test_mutual_references_terminate() {
    // GIVEN A.b -> B and B.a -> A
    let (a, b) = fixture::cycle_pair();

    // WHEN A is compiled
    // THEN each side is expanded once and the cycle closes on the node
    // already in the target
    Scenario::new("cycle")
        .layer(a)
        .layer(b)
        .compile("A")
        .expect(|x| {
            x.has_all(&["A", "A/x", "A/b", "B/y", "B/a"])
                .lacks("B")
                .attribute_count(5)
                .children("A/b", &["B/y", "B/a"])
                .children("B/a", &["A/x", "A/b"])
                .property("A/b", "entitySchema", "B")
                .property("B/a", "entitySchema", "A")
                .resolved()
                .valid_structure()
        })
        .run()
        .unwrap();
}

#[test]
fn test_cycle_loads_each_layer_once() {
    let (a, b) = fixture::cycle_pair();

    let (_, counts) = compile_counting(vec![a, b], "A");

    assert_eq!(counts["A"], 1);
    assert_eq!(counts["B"], 1);
}

#[test]
fn test_self_reference() {
    // GIVEN a linked node whose `next` points back at its own layer
    let node = LayerBuilder::schema("Node")
        .root(
            AttributeDef::object("Node")
                .child(AttributeDef::value("Node/value"))
                .child(AttributeDef::reference("Node/next", "Node")),
        )
        .build()
        .unwrap();

    Scenario::new("self")
        .layer(node)
        .compile("Node")
        .expect(|x| {
            x.attribute_count(3)
                .children("Node/next", &["Node/value", "Node/next"])
                .kind("Node/next", AttributeKind::Object)
                .resolved()
        })
        .run()
        .unwrap();
}

#[test]
fn test_diamond_shares_base() {
    // GIVEN Top -> Left, Right and both sides -> Base
    let (layer, counts) = compile_counting(fixture::diamond(), "Top");

    // THEN Base was loaded once and both sides point at the same children
    assert_eq!(counts["Base"], 1);
    assert_eq!(counts["Left"], 1);
    assert_eq!(counts["Right"], 1);
    assert_eq!(layer.index().len(), 8);

    let left = layer.attribute("Left/base").unwrap();
    let right = layer.attribute("Right/base").unwrap();
    let base_id = layer.attribute("Base/id").unwrap();
    let children = |n| layers_schema::attribute_children(layer.graph(), n).unwrap();
    assert_eq!(children(left), vec![base_id]);
    assert_eq!(children(right), vec![base_id]);
}

#[test]
fn test_reference_only_cycle_is_unresolvable() {
    // GIVEN two layers whose roots only reference each other
    let r = LayerBuilder::schema("R")
        .root(AttributeDef::reference("R", "S"))
        .build()
        .unwrap();
    let s = LayerBuilder::schema("S")
        .root(AttributeDef::reference("S", "R"))
        .build()
        .unwrap();
    let x = LayerBuilder::schema("X")
        .root(AttributeDef::object("X").child(AttributeDef::reference("X/r", "R")))
        .build()
        .unwrap();

    // WHEN X is compiled
    // THEN no attribute can ever be filled in
    Scenario::new("reference-only cycle")
        .layer(r)
        .layer(s)
        .layer(x)
        .compile("X")
        .expect(|a| a.error("which is an unresolved reference"))
        .run()
        .unwrap();
}

mod depth {
    use super::*;

    fn chain() -> Vec<Layer> {
        (0..4)
            .map(|i| {
                let id = format!("L{}", i);
                let value = AttributeDef::value(format!("{}/v", id));
                let mut root = AttributeDef::object(id.clone()).child(value);
                if i < 3 {
                    let next = format!("L{}", i + 1);
                    root = root.child(AttributeDef::reference(format!("{}/next", id), next));
                }
                LayerBuilder::schema(id).root(root).build().unwrap()
            })
            .collect()
    }

    fn scenario(config: &str) -> Scenario {
        chain()
            .into_iter()
            .fold(Scenario::new("depth"), Scenario::layer)
            .config_toml(config)
            .unwrap()
            .compile("L0")
    }

    #[test]
    fn test_chain_within_default_limit() {
        scenario("")
            .expect(|a| a.has_all(&["L0/v", "L1/v", "L2/v", "L3/v"]).resolved())
            .run()
            .unwrap();
    }

    #[test]
    fn test_chain_exceeds_configured_limit() {
        scenario("max_depth = 1")
            .expect(|a| a.error_matches(r"depth limit 1 exceeded at 'L\d'"))
            .run()
            .unwrap();
    }

    #[test]
    fn test_bad_config_is_rejected() {
        let result = Scenario::new("bad").config_toml("max_depth = -1");

        assert!(matches!(result, Err(ScenarioError::Config(_))));
    }
}
