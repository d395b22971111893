//! Canned layers shared by the integration tests.

use layers_schema::{AttributeDef, Layer, LayerBuilder};

fn build(builder: LayerBuilder) -> Layer {
    match builder.build() {
        Ok(layer) => layer,
        Err(e) => panic!("invalid fixture layer: {}", e),
    }
}

/// `Person { name, age }` with a description on the root.
pub fn person() -> Layer {
    build(
        LayerBuilder::schema("Person").root(
            AttributeDef::object("Person")
                .property("description", "A person")
                .property("targetType", "Person")
                .child(AttributeDef::value("Person/name").property("attributeName", "name"))
                .child(AttributeDef::value("Person/age").property("attributeName", "age")),
        ),
    )
}

/// `Employee { empId, person -> Person }`.
pub fn employee() -> Layer {
    build(
        LayerBuilder::schema("Employee").root(
            AttributeDef::object("Employee")
                .child(AttributeDef::value("Employee/empId"))
                .child(AttributeDef::reference("Employee/person", "Person")),
        ),
    )
}

/// Two layers referencing each other: `A.b -> B`, `B.a -> A`.
pub fn cycle_pair() -> (Layer, Layer) {
    let a = build(
        LayerBuilder::schema("A").root(
            AttributeDef::object("A")
                .child(AttributeDef::value("A/x"))
                .child(AttributeDef::reference("A/b", "B")),
        ),
    );
    let b = build(
        LayerBuilder::schema("B").root(
            AttributeDef::object("B")
                .child(AttributeDef::value("B/y"))
                .child(AttributeDef::reference("B/a", "A")),
        ),
    );
    (a, b)
}

/// Diamond: `Top -> Left, Right`, both `-> Base`.
pub fn diamond() -> Vec<Layer> {
    let side = |id: &str| {
        build(
            LayerBuilder::schema(id).root(
                AttributeDef::object(id)
                    .child(AttributeDef::value(format!("{}/own", id)))
                    .child(AttributeDef::reference(format!("{}/base", id), "Base")),
            ),
        )
    };
    vec![
        build(
            LayerBuilder::schema("Top").root(
                AttributeDef::object("Top")
                    .child(AttributeDef::reference("Top/left", "Left"))
                    .child(AttributeDef::reference("Top/right", "Right")),
            ),
        ),
        side("Left"),
        side("Right"),
        build(
            LayerBuilder::schema("Base")
                .root(AttributeDef::object("Base").child(AttributeDef::value("Base/id"))),
        ),
    ]
}

/// Postal address with IDs under `http://example.org/Address/`.
pub fn address() -> Layer {
    build(
        LayerBuilder::schema("Address").root(
            AttributeDef::object("http://example.org/Address/root")
                .label("PostalAddress")
                .child(AttributeDef::value("http://example.org/Address/street"))
                .child(AttributeDef::value("http://example.org/Address/city")),
        ),
    )
}

/// A contact schema carrying validation terms.
pub fn contact() -> Layer {
    build(
        LayerBuilder::schema("Contact").root(
            AttributeDef::object("Contact")
                .child(AttributeDef::value("Contact/email").property("validation/required", true))
                .child(
                    AttributeDef::value("Contact/kind")
                        .property("validation/enumeration", vec!["home", "work"]),
                )
                .child(
                    AttributeDef::value("Contact/zip").property("validation/pattern", "^[0-9]{5}$"),
                )
                .child(AttributeDef::value("Contact/version").property("validation/const", "v1")),
        ),
    )
}
