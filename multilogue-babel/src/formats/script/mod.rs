//! Plain-text script format
//!
//! The hand-editable form of a dialogue:
//!
//! ```text
//! Socrates (user):
//! What is justice?
//!
//! Glaucon (assistant):
//! Giving each his due.
//! ```
//!
//! A header is `Name (role):` on its own line; everything up to the next
//! header is that turn's content. At the start of a block a bare `Name:` is
//! accepted too and takes [`ScriptRules::default_role`]. Content lines that
//! would look like a header are escaped with a leading `\`.

mod parser;
mod rules;
mod serializer;

pub use parser::parse_script;
pub use rules::ScriptRules;
pub use serializer::serialize_script;

use crate::dialogue::Dialogue;
use crate::error::FormatError;
use crate::format::Format;

/// Format implementation for plain-text scripts
#[derive(Debug, Clone, Default)]
pub struct ScriptFormat {
    rules: ScriptRules,
}

impl ScriptFormat {
    pub fn new(rules: ScriptRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScriptRules {
        &self.rules
    }
}

impl Format for ScriptFormat {
    fn name(&self) -> &str {
        "script"
    }

    fn description(&self) -> &str {
        "Hand-editable dialogue script"
    }

    fn file_extensions(&self) -> &[&str] {
        &["plato", "txt", "text", "md"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Dialogue, FormatError> {
        Ok(parse_script(source, &self.rules)?)
    }

    fn serialize(&self, doc: &Dialogue) -> Result<String, FormatError> {
        Ok(serialize_script(doc))
    }
}
