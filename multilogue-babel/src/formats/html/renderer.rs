//! Markup rendering (Dialogue → HTML)
//!
//! Pipeline: Dialogue → RcDom → HTML string, optionally wrapped in a complete
//! document with the embedded stylesheet.

use crate::dialogue::{Dialogue, Turn};
use crate::error::FormatError;
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

pub(crate) const TURN_CLASS: &str = "multilogue-turn";
pub(crate) const PARAGRAPH_CLASS: &str = "multilogue-paragraph";
pub(crate) const SPEAKER_ATTR: &str = "data-speaker";
pub(crate) const ROLE_ATTR: &str = "data-role";
pub(crate) const TURN_ATTR: &str = "data-turn";

const DEFAULT_TITLE: &str = "Multilogue";

/// Options for HTML rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Wrap the turn blocks in a complete HTML5 document
    pub standalone: bool,
    /// Document title, only used when standalone
    pub title: Option<String>,
    /// Optional CSS appended after the default stylesheet
    pub custom_css: Option<String>,
}

impl HtmlOptions {
    pub fn standalone() -> Self {
        Self {
            standalone: true,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_custom_css(mut self, css: impl Into<String>) -> Self {
        self.custom_css = Some(css.into());
        self
    }

    /// Read options from `--extra-*` style parameters.
    ///
    /// Recognized keys: `standalone`, `title`, `custom-css`.
    pub(crate) fn from_params(
        mut self,
        params: &HashMap<String, String>,
    ) -> Result<Self, FormatError> {
        for (key, value) in params {
            match key.as_str() {
                "standalone" => {
                    self.standalone = match value.as_str() {
                        "" | "true" | "yes" | "1" => true,
                        "false" | "no" | "0" => false,
                        other => {
                            return Err(FormatError::Serialization(format!(
                                "Invalid value '{other}' for 'standalone'"
                            )))
                        }
                    }
                }
                "title" => self.title = Some(value.clone()),
                "custom-css" => self.custom_css = Some(value.clone()),
                other => {
                    return Err(FormatError::NotSupported(format!(
                        "Unknown html parameter '{other}'"
                    )))
                }
            }
        }
        Ok(self)
    }
}

/// The stylesheet embedded in standalone documents
pub fn default_css() -> &'static str {
    include_str!("../../../css/multilogue.css")
}

/// Build the markup tree for a dialogue.
///
/// The document node holds one turn block per turn, in order. A dialogue
/// without turns yields a document without children.
pub fn render_dom(doc: &Dialogue) -> RcDom {
    let dom = RcDom::default();
    for (index, turn) in doc.iter().enumerate() {
        dom.document
            .children
            .borrow_mut()
            .push(build_turn(index, turn));
    }
    dom
}

/// Render a dialogue to HTML
pub fn render_markup(doc: &Dialogue, options: &HtmlOptions) -> Result<String, FormatError> {
    let dom = render_dom(doc);
    let fragment = serialize_dom(&dom)?;
    if options.standalone {
        Ok(wrap_in_document(&fragment, options))
    } else {
        Ok(fragment)
    }
}

fn build_turn(index: usize, turn: &Turn) -> Handle {
    let position = index.to_string();
    let block = create_element(
        "div",
        vec![
            ("class", TURN_CLASS),
            (SPEAKER_ATTR, turn.speaker()),
            (ROLE_ATTR, turn.role().as_str()),
            (TURN_ATTR, &position),
        ],
    );

    for paragraph in turn.paragraphs() {
        let para = create_element("p", vec![("class", PARAGRAPH_CLASS)]);
        for (line_index, line) in paragraph.split('\n').enumerate() {
            if line_index > 0 {
                para.children
                    .borrow_mut()
                    .push(create_element("br", vec![]));
            }
            para.children.borrow_mut().push(create_text(line));
        }
        block.children.borrow_mut().push(para);
    }

    block
}

/// Create an HTML element with attributes
fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Serialize the turn blocks, one per line
fn serialize_dom(dom: &RcDom) -> Result<String, FormatError> {
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    let mut blocks = Vec::new();
    for child in dom.document.children.borrow().iter() {
        let mut output = Vec::new();
        let serializable = SerializableHandle::from(child.clone());
        serialize(&mut output, &serializable, opts.clone()).map_err(|e| {
            FormatError::Serialization(format!("HTML serialization failed: {e}"))
        })?;
        let block = String::from_utf8(output)
            .map_err(|e| FormatError::Serialization(format!("UTF-8 conversion failed: {e}")))?;
        blocks.push(block);
    }

    Ok(blocks.join("\n"))
}

fn wrap_in_document(body_html: &str, options: &HtmlOptions) -> String {
    let css = default_css();
    let custom_css = options.custom_css.as_deref().unwrap_or("");
    let title = html_escape(options.title.as_deref().unwrap_or(DEFAULT_TITLE));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="generator" content="multilogue-babel">
  <title>{title}</title>
  <style>
{css}
{custom_css}
  </style>
</head>
<body>
<div class="multilogue-dialogue">
{body_html}
</div>
</body>
</html>
"#
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
