//! Conversion entry points
//!
//! The four conversions the surrounding application needs, plus a formatter.
//! All of them are pure: same input, same output, no I/O.
//!
//! | Function               | Direction                       | Failure mode                 |
//! |------------------------|---------------------------------|------------------------------|
//! | [`script_to_markup`]   | script → HTML                   | `ParseError`, whole call     |
//! | [`markup_to_script`]   | HTML → script                   | skipped blocks as warnings   |
//! | [`markup_to_messages`] | HTML → message list             | skipped blocks as warnings   |
//! | [`messages_to_script`] | message list → script           | `MappingError`               |

use crate::error::{FormatError, MappingError, ParseError};
use crate::formats::html::{extract_markup, render_markup, Extracted, HtmlOptions};
use crate::formats::messages::{from_messages, to_messages, Message};
use crate::formats::script::{parse_script, serialize_script, ScriptRules};

/// Parse a script and render it as HTML
///
/// # Example
///
/// ```ignore
/// use multilogue_babel::transforms::script_to_markup;
/// use multilogue_babel::{HtmlOptions, ScriptRules};
///
/// let html = script_to_markup("Socrates (user):\nHi\n", &ScriptRules::default(), &HtmlOptions::default()).unwrap();
/// assert!(html.contains(r#"data-speaker="Socrates""#));
/// ```
pub fn script_to_markup(
    source: &str,
    rules: &ScriptRules,
    options: &HtmlOptions,
) -> Result<String, FormatError> {
    let doc = parse_script(source, rules)?;
    render_markup(&doc, options)
}

/// Recover the canonical script from rendered HTML
pub fn markup_to_script(markup: &str) -> Extracted<String> {
    extract_markup(markup).map(|doc| serialize_script(&doc))
}

/// Build the chat message list from rendered HTML
pub fn markup_to_messages(markup: &str) -> Extracted<Vec<Message>> {
    extract_markup(markup).map(|doc| to_messages(&doc))
}

/// Serialize a message list as a canonical script
pub fn messages_to_script(messages: &[Message]) -> Result<String, MappingError> {
    Ok(serialize_script(&from_messages(messages)?))
}

/// Round-trip a script through the model: parse and re-serialize
///
/// # Example
///
/// ```ignore
/// use multilogue_babel::transforms::normalize_script;
///
/// let formatted = normalize_script("Socrates:\n  Hi  \n\n\n").unwrap();
/// assert_eq!(formatted, "Socrates (user):\nHi\n");
/// ```
pub fn normalize_script(source: &str) -> Result<String, ParseError> {
    normalize_script_with_rules(source, &ScriptRules::default())
}

pub fn normalize_script_with_rules(source: &str, rules: &ScriptRules) -> Result<String, ParseError> {
    Ok(serialize_script(&parse_script(source, rules)?))
}

/// Whether a stored script holds no content at all.
///
/// Missing and whitespace-only scripts count as blank; callers route those
/// to their "no content yet" path instead of converting.
pub fn is_blank(script: Option<&str>) -> bool {
    script.map_or(true, |text| text.trim().is_empty())
}
