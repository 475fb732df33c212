//! Tests for the message list mapping (Dialogue ↔ messages)

use crate::common::{fixture, republic, turn};
use insta::assert_snapshot;
use multilogue_babel::formats::messages::{
    from_messages, messages_from_json, messages_to_json, to_messages,
};
use multilogue_babel::transforms::messages_to_script;
use multilogue_babel::{FormatRegistry, MappingError, Message, Role};

#[test]
fn test_documented_example() {
    assert_eq!(
        to_messages(&republic()),
        vec![
            Message::new(Role::User, "Socrates", "What is justice?"),
            Message::new(Role::Assistant, "Glaucon", "Giving each his due."),
        ]
    );
}

#[test]
fn test_wire_json() {
    let json = messages_to_json(&to_messages(&republic())).unwrap();
    assert_snapshot!(json, @r#"
    [
      {
        "role": "user",
        "name": "Socrates",
        "content": "What is justice?"
      },
      {
        "role": "assistant",
        "name": "Glaucon",
        "content": "Giving each his due."
      }
    ]
    "#);
}

#[test]
fn test_fixture_to_script() {
    let messages = messages_from_json(&fixture("symposium.json")).unwrap();
    assert_eq!(messages.len(), 4);
    assert_snapshot!(messages_to_script(&messages).unwrap(), @r"
    Narrator (system):
    A dinner party at the house of Agathon.

    Phaedrus (user):
    Love is the eldest of the gods.

    And the source of the greatest goods.

    Aristophanes (assistant):
    Once we were round,
    with four arms and four legs.
    ");
}

#[test]
fn test_fixture_drops_empty_message() {
    let messages = messages_from_json(&fixture("symposium.json")).unwrap();
    let doc = from_messages(&messages).unwrap();
    let speakers: Vec<_> = doc.iter().map(|turn| turn.speaker()).collect();
    assert_eq!(speakers, ["Narrator", "Phaedrus", "Aristophanes"]);
}

#[test]
fn test_paragraphs_split_on_blank_lines() {
    let messages = vec![Message::new(Role::User, "Phaedrus", "one\n \ntwo\n\n\n\nthree")];
    let doc = from_messages(&messages).unwrap();
    assert_eq!(doc.turns(), [turn("Phaedrus", "user", &["one", "two", "three"])]);
}

#[test]
fn test_missing_name() {
    let json = r#"[{"role":"user","name":"Socrates","content":"Hi"},{"role":"assistant","name":"","content":"Hello"}]"#;
    let messages = messages_from_json(json).unwrap();
    assert_eq!(
        from_messages(&messages),
        Err(MappingError::MissingName { index: 1 })
    );
}

#[test]
fn test_missing_field_is_a_json_error() {
    let err = messages_from_json(r#"[{"role":"user","content":"Hi"}]"#).unwrap_err();
    assert!(matches!(err, MappingError::Json(message) if message.contains("name")));
}

#[test]
fn test_registry_round_trip() {
    let registry = FormatRegistry::default();
    let json = registry.serialize(&republic(), "messages").unwrap();
    assert_eq!(registry.parse(&json, "messages").unwrap(), republic());
}
