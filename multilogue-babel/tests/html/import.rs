//! Import tests for HTML format (HTML → Dialogue)

use crate::common::{fixture, republic, turn};
use multilogue_babel::formats::html::{extract_markup, render_markup, HtmlOptions};
use multilogue_babel::transforms::{markup_to_messages, markup_to_script};
use multilogue_babel::{ExtractionWarning, Format, HtmlFormat, WarningKind};

#[test]
fn test_fixture_best_effort() {
    let extracted = extract_markup(&fixture("republic.html"));

    assert_eq!(
        extracted.value.turns(),
        [
            turn("Socrates", "user", &["What is justice?"]),
            turn(
                "Glaucon",
                "assistant",
                &["Giving each his due.", "Or so Simonides says.\nI am less sure."]
            ),
            turn("Thrasymachus", "sophist", &["The advantage of the stronger."]),
        ]
    );
    assert_eq!(
        extracted.warnings,
        vec![ExtractionWarning {
            block: 2,
            kind: WarningKind::MissingAttribute("data-speaker"),
        }]
    );
}

#[test]
fn test_fixture_strict() {
    let err = extract_markup(&fixture("republic.html")).strict().unwrap_err();
    assert_eq!(err.to_string(), "turn block 2: missing required attribute 'data-speaker'");
}

#[test]
fn test_fixture_to_script() {
    let script = markup_to_script(&fixture("republic.html"));
    assert!(!script.is_clean());
    assert!(script.value.starts_with("Socrates (user):\nWhat is justice?\n\nGlaucon (assistant):\n"));
    assert!(script.value.ends_with("Thrasymachus (sophist):\nThe advantage of the stronger.\n"));
}

#[test]
fn test_fixture_to_messages() {
    let messages = markup_to_messages(&fixture("republic.html")).value;
    assert_eq!(messages.len(), 3);
    assert_eq!(
        messages[1].content,
        "Giving each his due.\n\nOr so Simonides says.\nI am less sure."
    );
}

#[test]
fn test_render_then_extract() {
    let doc = republic();
    for options in [HtmlOptions::default(), HtmlOptions::standalone()] {
        let html = render_markup(&doc, &options).unwrap();
        let extracted = extract_markup(&html);
        assert!(extracted.is_clean());
        assert_eq!(extracted.value, doc);
    }
}

#[test]
fn test_markup_without_blocks() {
    let extracted = extract_markup("<p>Nothing to see here.</p>");
    assert!(extracted.is_clean());
    assert!(extracted.value.is_empty());
}

#[test]
fn test_format_parse_never_fails() {
    let doc = HtmlFormat::default()
        .parse(&fixture("republic.html"))
        .unwrap();
    assert_eq!(doc.len(), 3);
}

#[test]
fn test_render_then_extract_with_control_characters() {
    use multilogue_babel::formats::script::{parse_script, ScriptRules};
    use multilogue_babel::{Dialogue, Role, Turn};

    let cases = [
        Turn::new("Socrates", Role::User, ["one\rtwo"]).unwrap(),
        Turn::new("Socrates", Role::User, ["a\0b", "bell\x07 and\u{7f} delete"]).unwrap(),
        Turn::new("Glaucon\tof Athens", Role::Assistant, ["tab\tinside"]).unwrap(),
    ];
    for turn in cases {
        let doc = Dialogue::new(vec![turn]);
        let html = render_markup(&doc, &HtmlOptions::default()).unwrap();
        let extracted = extract_markup(&html);
        assert!(extracted.is_clean(), "{:?}", extracted.warnings);
        assert_eq!(extracted.value, doc);
    }

    let parsed = parse_script("Socrates (user):\na\rb\0c\n", &ScriptRules::default()).unwrap();
    assert_eq!(parsed.turns()[0].paragraphs(), ["a\nbc"]);
    let html = render_markup(&parsed, &HtmlOptions::default()).unwrap();
    assert_eq!(extract_markup(&html).value, parsed);
}
