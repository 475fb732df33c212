//! Export tests for HTML format (Dialogue → HTML)

use crate::common::{republic, turn};
use insta::assert_snapshot;
use multilogue_babel::formats::html::{default_css, render_dom, render_markup, HtmlOptions};
use multilogue_babel::transforms::script_to_markup;
use multilogue_babel::{Dialogue, FormatRegistry, ScriptRules};
use std::collections::HashMap;

#[test]
fn test_fragment_from_script() {
    let html = script_to_markup(
        "Socrates:\nWhat is justice?\n\nGlaucon (assistant):\nGiving each\nhis due.",
        &ScriptRules::default(),
        &HtmlOptions::default(),
    )
    .unwrap();
    assert_snapshot!(html, @r#"
    <div class="multilogue-turn" data-speaker="Socrates" data-role="user" data-turn="0"><p class="multilogue-paragraph">What is justice?</p></div>
    <div class="multilogue-turn" data-speaker="Glaucon" data-role="assistant" data-turn="1"><p class="multilogue-paragraph">Giving each<br>his due.</p></div>
    "#);
}

#[test]
fn test_one_block_per_turn() {
    let html = render_markup(&republic(), &HtmlOptions::default()).unwrap();
    assert_eq!(html.lines().count(), 2);
    assert_eq!(html.matches("class=\"multilogue-turn\"").count(), 2);
    assert_eq!(html.matches("<p class=\"multilogue-paragraph\">").count(), 2);
}

#[test]
fn test_turn_positions_are_attributes() {
    let doc = Dialogue::new(vec![
        turn("A", "user", &["one"]),
        turn("B", "assistant", &["two"]),
        turn("C", "system", &["three"]),
    ]);
    let html = render_markup(&doc, &HtmlOptions::default()).unwrap();
    for (index, speaker) in ["A", "B", "C"].iter().enumerate() {
        assert!(html.contains(&format!(
            "data-speaker=\"{speaker}\" data-role=\"{}\" data-turn=\"{index}\"",
            ["user", "assistant", "system"][index]
        )));
    }
}

#[test]
fn test_empty_dialogue_renders_empty_tree() {
    let dom = render_dom(&Dialogue::default());
    assert!(dom.document.children.borrow().is_empty());
    assert_eq!(
        render_markup(&Dialogue::default(), &HtmlOptions::default()).unwrap(),
        ""
    );
}

#[test]
fn test_standalone_embeds_stylesheet() {
    let options = HtmlOptions::standalone().with_title("The Republic");
    let html = render_markup(&republic(), &options).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>The Republic</title>"));
    assert!(html.contains(default_css()));
    assert!(html.contains("<meta name=\"generator\" content=\"multilogue-babel\">"));
}

#[test]
fn test_default_title() {
    let html = render_markup(&republic(), &HtmlOptions::standalone()).unwrap();
    assert!(html.contains("<title>Multilogue</title>"));
}

#[test]
fn test_stylesheet_shows_speaker_from_attribute() {
    let css = default_css();
    assert!(css.contains(".multilogue-turn::before"));
    assert!(css.contains("attr(data-speaker)"));
}

#[test]
fn test_registry_options() {
    let registry = FormatRegistry::default();
    let mut options = HashMap::new();
    options.insert("standalone".to_string(), "yes".to_string());
    options.insert("custom-css".to_string(), "body { color: red; }".to_string());

    let html = registry
        .serialize_with_options(&republic(), "html", &options)
        .unwrap();
    assert!(html.contains("body { color: red; }"));
}
