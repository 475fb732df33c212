//! HTML format implementation
//!
//! Bidirectional conversion between dialogues and HTML5 markup.
//!
//! # Library Choice
//!
//! The `html5ever` + `markup5ever_rcdom` pair covers both directions: the
//! renderer builds an `RcDom` and serializes it, the extractor parses any HTML
//! (fragment or complete document) back into the same tree type.
//!
//! # Element Mapping
//!
//! | Model     | HTML                                                                       |
//! |-----------|----------------------------------------------------------------------------|
//! | Turn      | `<div class="multilogue-turn" data-speaker=".." data-role=".." data-turn="N">` |
//! | Paragraph | `<p class="multilogue-paragraph">`                                         |
//! | Soft break| `<br>`                                                                     |
//!
//! Attribution lives only in the attributes. The stylesheet (`css/multilogue.css`)
//! shows the speaker with `attr(data-speaker)`, so the markup never contains a
//! visible name that the extractor would have to strip again.
//!
//! # Strictness
//!
//! Rendering cannot fail on a valid dialogue. Extraction never fails: blocks
//! without `data-speaker` / `data-role`, with an invalid role, or without any
//! paragraph are skipped and reported as [`crate::error::ExtractionWarning`]s
//! in an [`Extracted`] value.

mod extractor;
mod renderer;

pub use extractor::{extract_dom, extract_markup, Extracted};
pub use renderer::{default_css, render_dom, render_markup, HtmlOptions};

use crate::dialogue::Dialogue;
use crate::error::FormatError;
use crate::format::Format;
use std::collections::HashMap;
use tracing::warn;

/// Format implementation for HTML
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    options: HtmlOptions,
}

impl HtmlFormat {
    pub fn new(options: HtmlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML5 turn blocks, optionally as a standalone page"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Dialogue, FormatError> {
        let extracted = extract_markup(source);
        for warning in &extracted.warnings {
            warn!(block = warning.block, "skipping turn block: {}", warning.kind);
        }
        Ok(extracted.value)
    }

    fn serialize(&self, doc: &Dialogue) -> Result<String, FormatError> {
        render_markup(doc, &self.options)
    }

    fn serialize_with_options(
        &self,
        doc: &Dialogue,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let options = self.options.clone().from_params(options)?;
        render_markup(doc, &options)
    }
}
