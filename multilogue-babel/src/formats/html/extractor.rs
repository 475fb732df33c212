//! Markup extraction (HTML → Dialogue)
//!
//! Accepts any HTML, fragment or full document. Turn blocks are found by
//! class; their attributes give speaker and role, their `<p>` descendants give
//! the paragraphs. Broken blocks are skipped and reported, never fatal.

use super::renderer::{ROLE_ATTR, SPEAKER_ATTR, TURN_CLASS};
use crate::dialogue::{Dialogue, Role, Turn};
use crate::error::{ExtractionWarning, WarningKind};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// A best-effort result together with what had to be skipped to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<T> {
    pub value: T,
    pub warnings: Vec<ExtractionWarning>,
}

impl<T> Extracted<T> {
    pub fn new(value: T, warnings: Vec<ExtractionWarning>) -> Self {
        Self { value, warnings }
    }

    /// Whether nothing was skipped
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// The value, or the first warning when anything was skipped.
    pub fn strict(self) -> Result<T, ExtractionWarning> {
        match self.warnings.into_iter().next() {
            Some(warning) => Err(warning),
            None => Ok(self.value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extracted<U> {
        Extracted {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// Extract a dialogue from HTML
pub fn extract_markup(source: &str) -> Extracted<Dialogue> {
    let dom = html5ever::parse_document(RcDom::default(), Default::default()).one(source);
    extract_dom(&dom)
}

/// Extract a dialogue from an already built markup tree
pub fn extract_dom(dom: &RcDom) -> Extracted<Dialogue> {
    let mut blocks = Vec::new();
    find_blocks(&dom.document, &mut blocks);

    let mut turns = Vec::new();
    let mut warnings = Vec::new();
    for (block, handle) in blocks.iter().enumerate() {
        match read_block(handle) {
            Ok(turn) => turns.push(turn),
            Err(kind) => warnings.push(ExtractionWarning { block, kind }),
        }
    }

    Extracted::new(Dialogue::new(turns), warnings)
}

fn find_blocks(node: &Handle, blocks: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        if is_turn_block(child) {
            blocks.push(child.clone());
        } else {
            find_blocks(child, blocks);
        }
    }
}

fn is_turn_block(node: &Handle) -> bool {
    attribute(node, "class")
        .is_some_and(|class| class.split_ascii_whitespace().any(|c| c == TURN_CLASS))
}

fn attribute(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

fn is_element(node: &Handle, tag: &str) -> bool {
    matches!(&node.data, NodeData::Element { name, .. } if &*name.local == tag)
}

fn read_block(block: &Handle) -> Result<Turn, WarningKind> {
    let speaker =
        attribute(block, SPEAKER_ATTR).ok_or(WarningKind::MissingAttribute(SPEAKER_ATTR))?;
    let role = attribute(block, ROLE_ATTR).ok_or(WarningKind::MissingAttribute(ROLE_ATTR))?;
    let role = Role::new(&role)?;

    let mut paragraphs = Vec::new();
    collect_paragraphs(block, &mut paragraphs);

    Ok(Turn::new(speaker, role, paragraphs)?)
}

fn collect_paragraphs(node: &Handle, paragraphs: &mut Vec<String>) {
    for child in node.children.borrow().iter() {
        if is_turn_block(child) {
            continue;
        }
        if is_element(child, "p") {
            let mut text = String::new();
            collect_text(child, &mut text);
            paragraphs.push(text);
        } else {
            collect_paragraphs(child, paragraphs);
        }
    }
}

/// Text of a paragraph: `<br>` is a line break, source line breaks are spaces.
fn collect_text(node: &Handle, text: &mut String) {
    for child in node.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => push_flowed(text, &contents.borrow()),
            NodeData::Element { .. } if is_element(child, "br") => text.push('\n'),
            NodeData::Element { .. } => collect_text(child, text),
            _ => {}
        }
    }
}

fn push_flowed(text: &mut String, raw: &str) {
    let mut pending = String::new();
    for c in raw.chars() {
        if c.is_whitespace() {
            pending.push(c);
            continue;
        }
        flush_whitespace(text, &mut pending);
        text.push(c);
    }
    flush_whitespace(text, &mut pending);
}

fn flush_whitespace(text: &mut String, pending: &mut String) {
    if pending.contains(['\n', '\r']) {
        text.push(' ');
    } else {
        text.push_str(pending);
    }
    pending.clear();
}
