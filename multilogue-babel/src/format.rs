//! Format trait definition
//!
//! This module defines the core Format trait that all dialogue representations implement.
//! The trait provides a uniform interface for parsing and serializing dialogues.

use crate::dialogue::Dialogue;
use crate::error::FormatError;
use std::collections::HashMap;

/// Trait for dialogue formats
///
/// Implementors provide conversion between a string representation and a [`Dialogue`].
/// Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_parsing(&self) -> bool {
///         true
///     }
///
///     fn parse(&self, source: &str) -> Result<Dialogue, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "script", "html", "messages")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    ///
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → Dialogue)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (Dialogue → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a Dialogue
    fn parse(&self, _source: &str) -> Result<Dialogue, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a Dialogue into source text
    fn serialize(&self, _doc: &Dialogue) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }

    /// Serialize a Dialogue, optionally using extra parameters.
    ///
    /// Formats without options can rely on the default implementation, which
    /// delegates to [`Format::serialize`] and refuses any parameter.
    fn serialize_with_options(
        &self,
        doc: &Dialogue,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        if options.is_empty() {
            self.serialize(doc)
        } else {
            Err(FormatError::NotSupported(format!(
                "Format '{}' does not support extra parameters",
                self.name()
            )))
        }
    }
}
