//! Composites, term policies and attribute identity across layers.

use layers_tests::prelude::*;

#[test]
fn test_composite_across_layers() {
    // GIVEN a composite whose options are a reference, an object and a value
    let base = LayerBuilder::schema("Base")
        .root(AttributeDef::object("Base").child(AttributeDef::value("Base/id")))
        .build()
        .unwrap();
    let doc = LayerBuilder::schema("Doc")
        .root(
            AttributeDef::object("Doc").child(
                AttributeDef::composite("Doc/ext")
                    .option(AttributeDef::reference("Doc/base", "Base"))
                    .option(
                        AttributeDef::object("Doc/extra").child(AttributeDef::value("Doc/note")),
                    )
                    .option(AttributeDef::value("Doc/flag")),
            ),
        )
        .build()
        .unwrap();

    // WHEN compiled
    // THEN the composite is one object with every option's children in order
    Scenario::new("composite")
        .layer(base)
        .layer(doc)
        .compile("Doc")
        .expect(|a| {
            a.kind("Doc/ext", AttributeKind::Object)
                .children("Doc/ext", &["Base/id", "Doc/note", "Doc/flag"])
                .lacks("Doc/base")
                .lacks("Doc/extra")
                .resolved()
                .valid_structure()
        })
        .run()
        .unwrap();
}

#[test]
fn test_composite_keeps_polymorphic_and_array_options() {
    // GIVEN a composite over an object, a polymorphic and an array
    let doc = LayerBuilder::schema("Doc")
        .root(
            AttributeDef::object("Doc").child(
                AttributeDef::composite("Doc/mix")
                    .option(AttributeDef::object("Doc/base").child(AttributeDef::value("Doc/id")))
                    .option(
                        AttributeDef::polymorphic("Doc/contact")
                            .option(AttributeDef::value("Doc/email"))
                            .option(AttributeDef::value("Doc/phone")),
                    )
                    .option(AttributeDef::array("Doc/tags", AttributeDef::value("Doc/tag"))),
            ),
        )
        .build()
        .unwrap();

    // WHEN compiled
    // THEN the object is merged away and the other two become children
    Scenario::new("composite of object, polymorphic and array")
        .layer(doc)
        .compile("Doc")
        .expect(|a| {
            a.kind("Doc/mix", AttributeKind::Object)
                .children("Doc/mix", &["Doc/id", "Doc/contact", "Doc/tags"])
                .lacks("Doc/base")
                .kind("Doc/contact", AttributeKind::Polymorphic)
                .children("Doc/contact", &["Doc/email", "Doc/phone"])
                .kind("Doc/tags", AttributeKind::Array)
                .children("Doc/tags", &["Doc/tag"])
                .attribute_count(8)
                .valid_structure()
        })
        .run()
        .unwrap();
}

#[test]
fn test_composite_in_referenced_layer() {
    // GIVEN a layer whose root is a composite over another layer
    let core = LayerBuilder::schema("Core")
        .root(AttributeDef::object("Core").child(AttributeDef::value("Core/c")))
        .build()
        .unwrap();
    let mixin = LayerBuilder::schema("Mixin")
        .root(
            AttributeDef::composite("Mixin")
                .option(AttributeDef::reference("Mixin/core", "Core"))
                .option(AttributeDef::object("Mixin/more").child(AttributeDef::value("Mixin/m"))),
        )
        .build()
        .unwrap();
    let app = LayerBuilder::schema("App")
        .root(AttributeDef::object("App").child(AttributeDef::reference("App/mixin", "Mixin")))
        .build()
        .unwrap();

    Scenario::new("nested composite")
        .layer(core)
        .layer(mixin)
        .layer(app)
        .compile("App")
        .expect(|a| {
            a.kind("App/mixin", AttributeKind::Object)
                .children("App/mixin", &["Core/c", "Mixin/m"])
                .resolved()
        })
        .run()
        .unwrap();
}

#[test]
fn test_composite_option_terms_compose_in_order() {
    let layer = LayerBuilder::schema("C")
        .root(
            AttributeDef::composite("C")
                .option(AttributeDef::object("C/a").property("description", "first"))
                .option(AttributeDef::object("C/b").property("description", "second")),
        )
        .build()
        .unwrap();

    Scenario::new("option terms")
        .layer(layer)
        .compile("C")
        .expect(|a| a.property("C", "description", vec!["first", "second"]).attribute_count(1))
        .run()
        .unwrap();
}

mod policies {
    use super::*;
    use layers_registry::{ComposeResult, Composer};
    use std::sync::Arc;

    /// Joins `old>new`, so the argument order shows in the result.
    struct Lineage;

    impl Composer for Lineage {
        fn compose(
            &self,
            old: Option<&PropertyValue>,
            new: Option<&PropertyValue>,
        ) -> ComposeResult<Option<PropertyValue>> {
            let part =
                |v: Option<&PropertyValue>| v.map(|v| v.to_plain_string()).unwrap_or_default();
            Ok(Some(PropertyValue::from(format!("{}>{}", part(old), part(new)))))
        }
    }

    /// T carries `root`, S/t references T and carries `local`.
    fn referenced(term: &str, root: &str, local: Option<&str>) -> Scenario {
        let target = LayerBuilder::schema("T")
            .root(AttributeDef::object("T").property(term, root))
            .build()
            .unwrap();
        let mut reference = AttributeDef::reference("S/t", "T");
        if let Some(local) = local {
            reference = reference.property(term, local);
        }
        let source = LayerBuilder::schema("S")
            .root(AttributeDef::object("S").child(reference))
            .build()
            .unwrap();
        Scenario::new(format!("{} through reference", term))
            .term(Term::new("type").with_composition(CompositionPolicy::Error))
            .term(Term::new("aliases").with_composition(CompositionPolicy::List))
            .term(Term::new("pinned").with_composition(CompositionPolicy::NoCompose))
            .term(
                Term::new("lineage")
                    .with_composition(CompositionPolicy::Override)
                    .with_composer(Arc::new(Lineage)),
            )
            .layer(target)
            .layer(source)
            .compile("S")
    }

    fn typed(source_type: &str) -> Scenario {
        referenced("type", "string", Some(source_type))
    }

    #[test]
    fn test_custom_composer_sees_local_value_as_old() {
        // GIVEN an asymmetric composer on a term set on both sides
        // WHEN S/t is spliced
        // THEN the local value is passed first
        referenced("lineage", "root", Some("local"))
            .expect(|a| a.property("S/t", "lineage", "local>root"))
            .run()
            .unwrap();
    }

    #[test]
    fn test_custom_composer_runs_without_local_value() {
        referenced("lineage", "root", None)
            .expect(|a| a.property("S/t", "lineage", ">root"))
            .run()
            .unwrap();
    }

    #[test]
    fn test_nocompose_keeps_local_value() {
        referenced("pinned", "root", Some("local"))
            .expect(|a| a.property("S/t", "pinned", "local"))
            .run()
            .unwrap();
    }

    #[test]
    fn test_nocompose_takes_root_value_when_local_absent() {
        referenced("pinned", "root", None)
            .expect(|a| a.property("S/t", "pinned", "root"))
            .run()
            .unwrap();
    }

    #[test]
    fn test_list_appends_root_after_local() {
        referenced("aliases", "root", Some("local"))
            .expect(|a| a.property("S/t", "aliases", vec!["local", "root"]))
            .run()
            .unwrap();
    }

    #[test]
    fn test_set_lists_local_first() {
        referenced("description", "root", Some("local"))
            .expect(|a| a.property("S/t", "description", vec!["local", "root"]))
            .run()
            .unwrap();
    }

    #[test]
    fn test_error_policy_rejects_conflict() {
        typed("integer")
            .expect(|a| a.error("Cannot compose attribute 'S/t'"))
            .run()
            .unwrap();
    }

    #[test]
    fn test_error_policy_accepts_equal_values() {
        typed("string")
            .expect(|a| a.property("S/t", "type", "string"))
            .run()
            .unwrap();
    }

    #[test]
    fn test_duplicate_term_registration_fails() {
        let result = Scenario::new("dup")
            .term(Term::new("description"))
            .registry();

        assert!(matches!(result, Err(ScenarioError::Registry { .. })));
    }
}

#[test]
fn test_duplicate_attribute_across_layers() {
    // GIVEN two layers that both define "shared"
    let p = LayerBuilder::schema("P")
        .root(
            AttributeDef::object("P")
                .child(AttributeDef::value("shared"))
                .child(AttributeDef::reference("P/q", "Q")),
        )
        .build()
        .unwrap();
    let q = LayerBuilder::schema("Q")
        .root(AttributeDef::object("Q").child(AttributeDef::value("shared")))
        .build()
        .unwrap();

    // WHEN P pulls Q in
    // THEN the second definition is rejected
    Scenario::new("duplicate")
        .layer(p)
        .layer(q)
        .compile("P")
        .expect(|a| a.error("Attribute 'shared' is duplicated by 'Q'"))
        .run()
        .unwrap();
}

mod end_to_end {
    use super::*;

    #[test]
    fn test_reference_becomes_object() {
        let schema = LayerBuilder::schema("schemaRoot")
            .root(
                AttributeDef::object("root")
                    .child(AttributeDef::value("attr1"))
                    .child(AttributeDef::reference("attr2", "otherSchema")),
            )
            .build()
            .unwrap();
        let other = LayerBuilder::schema("otherSchema")
            .root(AttributeDef::object("other").child(AttributeDef::value("attr3")))
            .build()
            .unwrap();

        Scenario::new("attr2 -> otherSchema")
            .layer(schema)
            .layer(other)
            .compile("schemaRoot")
            .expect(|a| {
                a.children("root", &["attr1", "attr2"])
                    .kind("attr1", AttributeKind::Value)
                    .kind("attr2", AttributeKind::Object)
                    .children("attr2", &["attr3"])
                    .kind("attr3", AttributeKind::Value)
                    .resolved()
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_composite_of_object_and_value() {
        let schema = LayerBuilder::schema("c")
            .root(
                AttributeDef::object("root").child(
                    AttributeDef::composite("merged")
                        .option(AttributeDef::object("opt").child(AttributeDef::value("a")))
                        .option(AttributeDef::value("b")),
                ),
            )
            .build()
            .unwrap();

        Scenario::new("composite a+b")
            .layer(schema)
            .compile("c")
            .expect(|x| {
                x.kind("merged", AttributeKind::Object)
                    .children("merged", &["a", "b"])
                    .kind("a", AttributeKind::Value)
                    .kind("b", AttributeKind::Value)
                    .lacks("opt")
                    .valid_structure()
            })
            .run()
            .unwrap();
    }
}
