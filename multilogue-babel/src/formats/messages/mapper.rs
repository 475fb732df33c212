//! Dialogue ↔ chat message list mapping

use crate::dialogue::{Dialogue, Role, Turn};
use crate::error::MappingError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Separator between paragraphs inside a message's `content`
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// One chat message as a model API expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub name: String,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
            content: content.into(),
        }
    }
}

impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role().clone(),
            name: turn.speaker().to_string(),
            content: turn.paragraphs().join(PARAGRAPH_SEPARATOR),
        }
    }
}

/// The `{role, content}` part of a successful worker answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReply {
    pub role: Role,
    pub content: String,
}

/// One message per turn, in order.
pub fn to_messages(doc: &Dialogue) -> Vec<Message> {
    doc.iter().map(Message::from).collect()
}

/// Rebuild a dialogue from messages.
///
/// Messages whose content is blank are dropped; a blank name is an error.
pub fn from_messages(messages: &[Message]) -> Result<Dialogue, MappingError> {
    let mut turns = Vec::with_capacity(messages.len());
    for (index, message) in messages.iter().enumerate() {
        if message.name.trim().is_empty() {
            return Err(MappingError::MissingName { index });
        }
        if message.content.trim().is_empty() {
            debug!(index, name = %message.name, "dropping message without content");
            continue;
        }
        let turn = Turn::new(&message.name, message.role.clone(), [&message.content])
            .map_err(|source| MappingError::InvalidTurn { index, source })?;
        turns.push(turn);
    }
    Ok(Dialogue::new(turns))
}

/// Append a worker reply, labelled with `name`, at the tail of `messages`.
///
/// Earlier messages are left untouched.
pub fn append_reply(
    mut messages: Vec<Message>,
    reply: WorkerReply,
    name: &str,
) -> Result<Vec<Message>, MappingError> {
    let content = reply.content.trim();
    if content.is_empty() {
        return Err(MappingError::EmptyReply);
    }
    messages.push(Message::new(reply.role, name, content));
    Ok(messages)
}

pub fn messages_from_json(source: &str) -> Result<Vec<Message>, MappingError> {
    let value: Value = serde_json::from_str(source).map_err(json_error)?;
    if let Some(entries) = value.as_array() {
        for entry in entries {
            check_role(entry.get("role"))?;
        }
    }
    serde_json::from_value(value).map_err(json_error)
}

/// Name the offending role instead of surfacing a generic serde message.
pub(crate) fn check_role(role: Option<&Value>) -> Result<(), MappingError> {
    match role.and_then(Value::as_str) {
        Some(raw) => Role::new(raw)
            .map(|_| ())
            .map_err(|_| MappingError::InvalidRole(raw.to_string())),
        None => Ok(()),
    }
}

pub(crate) fn json_error(err: serde_json::Error) -> MappingError {
    MappingError::Json(err.to_string())
}

pub fn messages_to_json(messages: &[Message]) -> Result<String, MappingError> {
    serde_json::to_string_pretty(messages).map_err(json_error)
}
