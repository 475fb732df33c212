//! Serialization tests for the script format (Dialogue → script)

use crate::common::{fixture, turn};
use insta::assert_snapshot;
use multilogue_babel::formats::script::serialize_script;
use multilogue_babel::transforms::normalize_script;
use multilogue_babel::{Dialogue, Format, FormatRegistry, ScriptFormat};

#[test]
fn test_fixture_normalizes_to_canonical_form() {
    let formatted = normalize_script(&fixture("socrates.plato")).unwrap();
    assert_snapshot!(formatted, @r"
    Socrates (user):
    What is justice?
    Is it telling the truth and paying back what one owes?

    Cephalus (user):
    That is my view.

    Polemarchus (assistant):
    Giving each his due.
    \Simonides (poet):
    said as much, and he is wise.

    Thrasymachus (sophist):
    Listen, then.

    Justice is nothing but
    the advantage of the stronger.
    ");
}

#[test]
fn test_normalization_is_stable() {
    let once = normalize_script(&fixture("socrates.plato")).unwrap();
    let twice = normalize_script(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_output_ends_with_single_newline() {
    let doc = Dialogue::new(vec![turn("Socrates", "user", &["Hi"])]);
    let text = serialize_script(&doc);
    assert!(text.ends_with("Hi\n"));
    assert!(!text.ends_with("\n\n"));
}

#[test]
fn test_header_shaped_content_survives() {
    let doc = Dialogue::new(vec![turn(
        "Socrates",
        "user",
        &["Glaucon (assistant):\nGlaucon:", "\\escaped\nGlaucon (assistant"],
    )]);
    let format = ScriptFormat::default();
    let text = format.serialize(&doc).unwrap();
    assert_eq!(format.parse(&text).unwrap(), doc);
}

#[test]
fn test_registry_uses_script_format() {
    let registry = FormatRegistry::default();
    let doc = registry
        .parse("Socrates:\nHi", "script")
        .unwrap();
    assert_eq!(
        registry.serialize(&doc, "script").unwrap(),
        "Socrates (user):\nHi\n"
    );
}
