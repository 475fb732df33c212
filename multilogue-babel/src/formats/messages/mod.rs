//! Chat message list format
//!
//! The shape a language-model API consumes: `[{role, name, content}, ...]`,
//! one message per turn, paragraphs joined by a blank line. As a file format
//! the list is written as JSON.

mod mapper;

pub use mapper::{
    append_reply, from_messages, messages_from_json, messages_to_json, to_messages, Message,
    WorkerReply, PARAGRAPH_SEPARATOR,
};
pub(crate) use mapper::{check_role, json_error};

use crate::dialogue::Dialogue;
use crate::error::FormatError;
use crate::format::Format;

/// Format implementation for JSON message lists
#[derive(Debug, Clone, Copy, Default)]
pub struct MessagesFormat;

impl Format for MessagesFormat {
    fn name(&self) -> &str {
        "messages"
    }

    fn description(&self) -> &str {
        "Chat message list as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Dialogue, FormatError> {
        let messages = messages_from_json(source)?;
        Ok(from_messages(&messages)?)
    }

    fn serialize(&self, doc: &Dialogue) -> Result<String, FormatError> {
        Ok(messages_to_json(&to_messages(doc))?)
    }
}
