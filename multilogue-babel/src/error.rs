//! Error types for dialogue conversions
//!
//! The taxonomy follows where each failure originates:
//!
//! - [`ValidationError`]: a turn violates the model invariants while being built.
//! - [`ParseError`]: a hand-edited script is malformed; carries the 1-based line.
//! - [`ExtractionWarning`]: a rendered markup block is unusable; collected, never thrown.
//! - [`MappingError`]: a chat message list cannot be mapped back into turns.
//! - [`FormatError`]: umbrella returned by the [`crate::Format`] trait and registry.

use thiserror::Error;

/// A turn could not be constructed because it breaks a model invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("speaker name is empty")]
    EmptySpeaker,
    #[error("speaker name '{0}' spans several lines")]
    MultilineSpeaker(String),
    #[error("speaker name '{0}' starts with the script escape character")]
    EscapedSpeaker(String),
    #[error("speaker name '{}' contains control character {:?}", .speaker.escape_debug(), .found)]
    ControlCharacter { speaker: String, found: char },
    #[error("role '{0}' is not a bare identifier")]
    InvalidRole(String),
    #[error("turn by '{speaker}' has no content")]
    EmptyContent { speaker: String },
}

/// Malformed script text, located at a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// `Name (role)` or `Name (role` without the closing `):`
    #[error("unterminated turn header '{0}'")]
    UnterminatedHeader(String),
    /// Content was found but no header appears anywhere in the script
    #[error("content has no preceding turn header")]
    MissingHeader,
    #[error(transparent)]
    InvalidTurn(#[from] ValidationError),
}

/// A markup turn block that was skipped during extraction.
///
/// `block` is the 0-based position of the block among all turn blocks found
/// in the markup, skipped ones included.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("turn block {block}: {kind}")]
pub struct ExtractionWarning {
    pub block: usize,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarningKind {
    #[error("missing required attribute '{0}'")]
    MissingAttribute(&'static str),
    #[error(transparent)]
    InvalidTurn(#[from] ValidationError),
}

/// A chat message list entry could not be mapped to a turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("message {index} has no speaker name")]
    MissingName { index: usize },
    #[error("message {index}: {source}")]
    InvalidTurn {
        index: usize,
        #[source]
        source: ValidationError,
    },
    #[error("role '{0}' is not a bare identifier")]
    InvalidRole(String),
    #[error("worker reply has no content")]
    EmptyReply,
    #[error("invalid message list: {0}")]
    Json(String),
}

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Format does not support the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}
