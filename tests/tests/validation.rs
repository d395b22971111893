//! Validation terms over compiled layers.

use layers_tests::prelude::*;

fn contact() -> Scenario {
    Scenario::new("contact")
        .with_validation()
        .layer(fixture::contact())
        .compile("Contact")
}

#[test]
fn test_valid_document_passes() {
    contact()
        .document(
            &[
                ("Contact/email", "a@example.org"),
                ("Contact/kind", "home"),
                ("Contact/zip", "12345"),
                ("Contact/version", "v1"),
            ],
            0,
        )
        .run()
        .unwrap();
}

#[test]
fn test_every_validator_reports() {
    // GIVEN a document breaking each constraint once
    // THEN one violation per constraint
    contact()
        .document(
            &[("Contact/kind", "other"), ("Contact/zip", "12a45"), ("Contact/version", "v2")],
            4,
        )
        .run()
        .unwrap();
}

#[test]
fn test_absent_optional_values_pass() {
    contact()
        .document(&[("Contact/email", "a@example.org")], 0)
        .document(&[], 1)
        .run()
        .unwrap();
}

#[test]
fn test_pattern_compiled_once_per_node() {
    contact()
        .expect(|a| {
            a.custom(|layer| {
                layer
                    .attribute("Contact/zip")
                    .and_then(|n| layer.graph().node(n).ok())
                    .and_then(|n| n.compiled.get::<regex_lite::Regex>("validation/pattern"))
                    .map(|re| re.is_match("54321"))
                    .unwrap_or(false)
            })
        })
        .run()
        .unwrap();
}

#[test]
fn test_invalid_pattern_fails_compilation() {
    let layer = LayerBuilder::schema("Bad")
        .root(
            AttributeDef::object("Bad")
                .child(AttributeDef::value("Bad/code").property("validation/pattern", "([0-9")),
        )
        .build()
        .unwrap();

    Scenario::new("bad pattern")
        .with_validation()
        .layer(layer)
        .compile("Bad")
        .expect(|a| a.error("Cannot compile term validation/pattern"))
        .run()
        .unwrap();
}

#[test]
fn test_constraints_follow_references() {
    // GIVEN a schema referencing the contact layer
    let customer = LayerBuilder::schema("Customer")
        .root(
            AttributeDef::object("Customer")
                .child(AttributeDef::value("Customer/id"))
                .child(AttributeDef::reference("Customer/contact", "Contact")),
        )
        .build()
        .unwrap();

    // WHEN the email is missing
    // THEN the required constraint copied in from Contact fires
    Scenario::new("customer")
        .with_validation()
        .layer(fixture::contact())
        .layer(customer)
        .compile("Customer")
        .expect(|a| a.has("Contact/email").property("Contact/email", "validation/required", true))
        .document(&[("Customer/id", "c-1")], 1)
        .run()
        .unwrap();
}

mod formats {
    use super::*;
    use layers_constraint::{Format, FORMAT};

    fn event() -> Scenario {
        let layer = LayerBuilder::schema("Event")
            .root(
                AttributeDef::object("Event")
                    .child(AttributeDef::value("Event/day").property(FORMAT, "date"))
                    .child(AttributeDef::value("Event/at").property(FORMAT, "date-time"))
                    .child(AttributeDef::value("Event/contact").property(FORMAT, "email"))
                    .child(AttributeDef::value("Event/link").property(FORMAT, "uri")),
            )
            .build()
            .unwrap();
        Scenario::new("event").with_validation().layer(layer).compile("Event")
    }

    #[test]
    fn test_well_formed_values_pass() {
        event()
            .document(
                &[
                    ("Event/day", "2024-02-29"),
                    ("Event/at", "2024-02-29T18:30:00+01:00"),
                    ("Event/contact", "events@example.org"),
                    ("Event/link", "https://example.org/e/1"),
                ],
                0,
            )
            .run()
            .unwrap();
    }

    #[test]
    fn test_each_format_reports() {
        // GIVEN one malformed value per format
        // THEN one violation each
        event()
            .document(
                &[
                    ("Event/day", "2023-02-29"),
                    ("Event/at", "2024-02-29 18:30"),
                    ("Event/contact", "events.example.org"),
                    ("Event/link", "example.org/e/1"),
                ],
                4,
            )
            .run()
            .unwrap();
    }

    #[test]
    fn test_empty_values_are_not_checked() {
        event()
            .document(&[("Event/day", ""), ("Event/link", "")], 0)
            .run()
            .unwrap();
    }

    #[test]
    fn test_format_compiled_as_artifact() {
        event()
            .expect(|a| {
                a.custom(|layer| {
                    layer
                        .attribute("Event/at")
                        .and_then(|n| layer.graph().node(n).ok())
                        .and_then(|n| n.compiled.get::<Format>(FORMAT))
                        == Some(&Format::DateTime)
                })
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_unknown_format_fails_compilation() {
        let layer = LayerBuilder::schema("Bad")
            .root(
                AttributeDef::object("Bad")
                    .child(AttributeDef::value("Bad/phone").property(FORMAT, "phone")),
            )
            .build()
            .unwrap();

        Scenario::new("bad format")
            .with_validation()
            .layer(layer)
            .compile("Bad")
            .expect(|a| a.error("Cannot compile term validation/json/format"))
            .run()
            .unwrap();
    }
}
