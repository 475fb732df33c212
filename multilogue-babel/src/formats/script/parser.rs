//! Script parsing (script text → Dialogue)
//!
//! Single pass over the lines. A turn opens at a header line and collects
//! every following content line; blank lines close the current paragraph.
//! The parser is all-or-nothing: it returns a complete dialogue or the first
//! error with its line number.

use super::rules::ScriptRules;
use crate::dialogue::{is_identifier, validate_speaker, Dialogue, Role, Turn};
use crate::error::{ParseError, ParseErrorKind, ValidationError};
use tracing::debug;

/// A content line starting with this character is never read as a header.
/// One leading occurrence is stripped.
pub(crate) const ESCAPE: char = '\\';

const NAME_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}', '"',
];
const NAME_MAX_WORDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    Header {
        speaker: &'a str,
        role: Option<&'a str>,
    },
    Unterminated,
    Content,
}

/// Classify a trimmed, non-empty line.
///
/// `Name (role):` is a header anywhere. `Name:` and the unterminated forms
/// only count at a block start, and only with a name-like `Name`.
pub(crate) fn classify(line: &str, block_start: bool) -> LineKind<'_> {
    if line.starts_with(ESCAPE) {
        return LineKind::Content;
    }
    if let Some(head) = line.strip_suffix(':') {
        let head = head.trim_end();
        if let Some((speaker, role)) = split_role(head) {
            return LineKind::Header {
                speaker,
                role: Some(role),
            };
        }
        if block_start && is_name_like(head) {
            return LineKind::Header {
                speaker: head,
                role: None,
            };
        }
        return LineKind::Content;
    }
    if block_start && is_unterminated(line) {
        LineKind::Unterminated
    } else {
        LineKind::Content
    }
}

/// Whether a paragraph line must be written with a leading [`ESCAPE`] to
/// survive a re-parse as content.
pub(crate) fn needs_escape(line: &str) -> bool {
    line.starts_with(ESCAPE) || classify(line, true) != LineKind::Content
}

/// `Name (role)` → (`Name`, `role`), using the last parenthesis pair.
fn split_role(head: &str) -> Option<(&str, &str)> {
    let inner = head.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let role = inner[open + 1..].trim();
    is_identifier(role).then(|| (inner[..open].trim(), role))
}

fn is_unterminated(line: &str) -> bool {
    let body = line.strip_suffix(')').unwrap_or(line);
    match body.rfind('(') {
        Some(open) => {
            is_identifier(body[open + 1..].trim()) && is_name_like(body[..open].trim_end())
        }
        None => false,
    }
}

fn is_name_like(candidate: &str) -> bool {
    let words: Vec<&str> = candidate.split_whitespace().collect();
    !words.is_empty()
        && words.len() <= NAME_MAX_WORDS
        && !candidate.contains(NAME_PUNCTUATION)
        && words
            .iter()
            .all(|word| word.chars().next().is_some_and(|c| !c.is_lowercase()))
}

/// `Name:` that [`is_name_like`] turned down.
fn looks_like_roleless_header(line: &str) -> bool {
    !line.starts_with(ESCAPE) && line.strip_suffix(':').is_some_and(|head| !head.trim().is_empty())
}

struct OpenTurn<'a> {
    line: usize,
    speaker: String,
    role: Role,
    paragraphs: Vec<String>,
    current: Vec<&'a str>,
}

impl<'a> OpenTurn<'a> {
    fn new(line: usize, speaker: String, role: Role) -> Self {
        Self {
            line,
            speaker,
            role,
            paragraphs: Vec::new(),
            current: Vec::new(),
        }
    }

    fn push_line(&mut self, text: &'a str) {
        self.current.push(text);
    }

    fn end_paragraph(&mut self) {
        if !self.current.is_empty() {
            self.paragraphs.push(self.current.join("\n"));
            self.current.clear();
        }
    }

    /// Finish the turn. A header without content yields `None`.
    fn close(mut self) -> Result<Option<Turn>, ParseError> {
        self.end_paragraph();
        match Turn::new(&self.speaker, self.role, &self.paragraphs) {
            Ok(turn) => Ok(Some(turn)),
            Err(ValidationError::EmptyContent { speaker }) => {
                debug!(line = self.line, %speaker, "dropping turn header without content");
                Ok(None)
            }
            Err(err) => Err(ParseError::new(self.line, err.into())),
        }
    }
}

/// Parse a script into a dialogue.
pub fn parse_script(source: &str, rules: &ScriptRules) -> Result<Dialogue, ParseError> {
    let mut turns = Vec::new();
    let mut open: Option<OpenTurn<'_>> = None;
    let mut seen_header = false;
    let mut first_noise: Option<usize> = None;
    let mut noise_lines = 0usize;
    let mut block_start = true;

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();

        if line.is_empty() {
            if let Some(turn) = open.as_mut() {
                turn.end_paragraph();
            }
            block_start = true;
            continue;
        }

        let content = match classify(line, block_start) {
            LineKind::Header { speaker, role } => {
                let speaker = validate_speaker(speaker)
                    .map_err(|err| ParseError::new(line_no, err.into()))?;
                let role = match role {
                    Some(role) => {
                        Role::new(role).map_err(|err| ParseError::new(line_no, err.into()))?
                    }
                    None => rules.default_role.clone(),
                };
                seen_header = true;
                if let Some(done) = open.replace(OpenTurn::new(line_no, speaker, role)) {
                    turns.extend(done.close()?);
                }
                None
            }
            LineKind::Unterminated => {
                return Err(ParseError::new(
                    line_no,
                    ParseErrorKind::UnterminatedHeader(line.to_string()),
                ));
            }
            LineKind::Content => {
                if block_start && open.is_some() && looks_like_roleless_header(line) {
                    debug!(
                        line = line_no,
                        text = line,
                        "reading block-start line as content; write `Name (role):` to start a turn"
                    );
                }
                Some(line.strip_prefix(ESCAPE).unwrap_or(line))
            }
        };

        if let Some(text) = content {
            match open.as_mut() {
                Some(turn) => turn.push_line(text),
                None => {
                    first_noise.get_or_insert(line_no);
                    noise_lines += 1;
                }
            }
        }
        block_start = false;
    }

    if let Some(done) = open.take() {
        turns.extend(done.close()?);
    }

    if let Some(line) = first_noise {
        if !seen_header {
            return Err(ParseError::new(line, ParseErrorKind::MissingHeader));
        }
        debug!(
            first_line = line,
            lines = noise_lines,
            "ignoring content before the first turn header"
        );
    }

    Ok(Dialogue::new(turns))
}
