//! Parsing tests for the script format (script → Dialogue)

use crate::common::{fixture, republic, turn};
use multilogue_babel::formats::script::{parse_script, ScriptRules};
use multilogue_babel::{ParseErrorKind, Role, ValidationError};

fn parse(source: &str) -> Result<multilogue_babel::Dialogue, multilogue_babel::ParseError> {
    parse_script(source, &ScriptRules::default())
}

#[test]
fn test_documented_example() {
    let source = "Socrates (user):\nWhat is justice?\n\nGlaucon (assistant):\nGiving each his due.\n";
    assert_eq!(parse(source).unwrap(), republic());
}

#[test]
fn test_fixture_turns() {
    let doc = parse(&fixture("socrates.plato")).unwrap();
    assert_eq!(
        doc.turns(),
        [
            turn(
                "Socrates",
                "user",
                &["What is justice?\nIs it telling the truth and paying back what one owes?"]
            ),
            turn("Cephalus", "user", &["That is my view."]),
            turn(
                "Polemarchus",
                "assistant",
                &["Giving each his due.\nSimonides (poet):\nsaid as much, and he is wise."]
            ),
            turn(
                "Thrasymachus",
                "sophist",
                &[
                    "Listen, then.",
                    "Justice is nothing but\nthe advantage of the stronger."
                ]
            ),
        ]
    );
}

#[test]
fn test_leading_noise_is_ignored() {
    let doc = parse("random text\n\nSocrates (user):\nHi").unwrap();
    assert_eq!(doc.turns(), [turn("Socrates", "user", &["Hi"])]);
}

#[test]
fn test_unterminated_header_without_content() {
    let err = parse("Socrates (user):\nHi\n\nGlaucon (assistant\n").unwrap_err();
    assert_eq!(err.line, 4);
    assert_eq!(
        err.kind,
        ParseErrorKind::UnterminatedHeader("Glaucon (assistant".to_string())
    );
}

#[test]
fn test_error_message_names_line() {
    let err = parse("\n\nSocrates (user)\nHi").unwrap_err();
    assert_eq!(
        err.to_string(),
        "line 3: unterminated turn header 'Socrates (user)'"
    );
}

#[test]
fn test_no_header_anywhere() {
    let err = parse("Just some notes.\nNothing else.").unwrap_err();
    assert_eq!(err.line, 1);
    assert_eq!(err.kind, ParseErrorKind::MissingHeader);
}

#[test]
fn test_escaped_speaker_header_is_rejected() {
    // A header cannot start with the escape, so the line is content and the
    // script has no header at all.
    let err = parse("\\Socrates (user):\nHi").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MissingHeader);
}

#[test]
fn test_invalid_role_in_header_is_content() {
    let doc = parse("Socrates (user):\nA remark (with spaces in it):\n").unwrap();
    assert_eq!(
        doc.turns()[0].paragraphs(),
        ["A remark (with spaces in it):"]
    );
}

#[test]
fn test_empty_speaker() {
    let err = parse("Socrates (user):\nHi\n\n (assistant):\nHello").unwrap_err();
    assert_eq!(err.line, 4);
    assert_eq!(
        err.kind,
        ParseErrorKind::InvalidTurn(ValidationError::EmptySpeaker)
    );
}

#[test]
fn test_role_matching_is_case_sensitive() {
    let doc = parse("Socrates (User):\nHi").unwrap();
    assert_eq!(doc.turns()[0].role(), &Role::Other("User".to_string()));
}

#[test]
fn test_roleless_header_needs_block_start() {
    let doc = parse("Socrates (user):\nConsider:\nSecond Point:\n\nGlaucon:\nYes.").unwrap();
    assert_eq!(doc.len(), 2);
    assert_eq!(
        doc.turns()[0].paragraphs(),
        ["Consider:\nSecond Point:"]
    );
    assert_eq!(doc.turns()[1].speaker(), "Glaucon");
}

#[test]
fn test_configured_default_role() {
    let rules = ScriptRules {
        default_role: Role::Assistant,
    };
    let doc = parse_script("Glaucon:\nYes.", &rules).unwrap();
    assert_eq!(doc.turns()[0].role(), &Role::Assistant);
}

#[test]
fn test_whitespace_only_script() {
    assert!(parse("").unwrap().is_empty());
    assert!(parse("\n   \n\t\n").unwrap().is_empty());
}
