//! In-memory dialogue model.
//!
//! A [`Dialogue`] is an ordered list of [`Turn`]s. Turns are values: their
//! constructor normalizes and validates, so every turn that exists is already
//! in canonical form and equality between turns is plain structural equality.
//! That property is what makes the script, markup and message conversions
//! converge after a single normalization pass.

mod role;

pub use role::Role;
pub(crate) use role::is_identifier;

use crate::error::ValidationError;

/// One speaker's contribution: identity, role and one or more paragraphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    speaker: String,
    role: Role,
    paragraphs: Vec<String>,
}

impl Turn {
    /// Build a turn from raw parts.
    ///
    /// The speaker is trimmed and must be a single non-empty line free of
    /// control characters. Paragraphs are split on blank lines (`\r\n`, `\n`
    /// and a lone `\r` all end a line), control characters other than tab are
    /// removed, every line is trimmed and empty paragraphs are discarded; at
    /// least one paragraph must remain.
    pub fn new<S, I, P>(speaker: S, role: Role, paragraphs: I) -> Result<Self, ValidationError>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let speaker = validate_speaker(speaker.as_ref())?;
        let paragraphs = normalize_paragraphs(paragraphs);
        if paragraphs.is_empty() {
            return Err(ValidationError::EmptyContent { speaker });
        }
        Ok(Self {
            speaker,
            role,
            paragraphs,
        })
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Paragraphs in order; soft line breaks are kept as `\n`.
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }
}

/// Trimmed speaker name, or the reason it cannot name a turn.
pub(crate) fn validate_speaker(raw: &str) -> Result<String, ValidationError> {
    let speaker = raw.trim();
    if speaker.is_empty() {
        return Err(ValidationError::EmptySpeaker);
    }
    if speaker.contains(['\n', '\r']) {
        return Err(ValidationError::MultilineSpeaker(speaker.to_string()));
    }
    if speaker.starts_with('\\') {
        return Err(ValidationError::EscapedSpeaker(speaker.to_string()));
    }
    if let Some(found) = speaker.chars().find(|c| is_stripped_control(*c)) {
        return Err(ValidationError::ControlCharacter {
            speaker: speaker.to_string(),
            found,
        });
    }
    Ok(speaker.to_string())
}

/// Controls that do not survive HTML parsing unchanged. Tab is kept.
fn is_stripped_control(c: char) -> bool {
    c.is_control() && c != '\t'
}

/// Split on any line ending, drop stripped controls and trim.
fn clean_lines(paragraph: &str) -> impl Iterator<Item = String> + '_ {
    paragraph
        .split("\r\n")
        .flat_map(|chunk| chunk.split(['\n', '\r']))
        .map(|line| {
            line.chars()
                .filter(|c| !is_stripped_control(*c))
                .collect::<String>()
                .trim()
                .to_string()
        })
}

fn normalize_paragraphs<I, P>(paragraphs: I) -> Vec<String>
where
    I: IntoIterator<Item = P>,
    P: AsRef<str>,
{
    let mut normalized = Vec::new();
    for paragraph in paragraphs {
        let mut lines: Vec<String> = Vec::new();
        for line in clean_lines(paragraph.as_ref()) {
            if line.is_empty() {
                if !lines.is_empty() {
                    normalized.push(lines.join("\n"));
                    lines.clear();
                }
            } else {
                lines.push(line);
            }
        }
        if !lines.is_empty() {
            normalized.push(lines.join("\n"));
        }
    }
    normalized
}

/// An ordered conversation. May be empty ("no content yet").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dialogue {
    turns: Vec<Turn>,
}

impl Dialogue {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }
}

impl FromIterator<Turn> for Dialogue {
    fn from_iter<T: IntoIterator<Item = Turn>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dialogue {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

impl IntoIterator for Dialogue {
    type Item = Turn;
    type IntoIter = std::vec::IntoIter<Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_trims_speaker_and_lines() {
        let turn = Turn::new("  Socrates ", Role::User, ["  What is justice?  "]).unwrap();
        assert_eq!(turn.speaker(), "Socrates");
        assert_eq!(turn.paragraphs(), ["What is justice?"]);
    }

    #[test]
    fn turn_keeps_soft_line_breaks() {
        let turn = Turn::new("Glaucon", Role::Assistant, ["first line\n  second line"]).unwrap();
        assert_eq!(turn.paragraphs(), ["first line\nsecond line"]);
    }

    #[test]
    fn turn_splits_paragraphs_on_blank_lines() {
        let turn = Turn::new("Glaucon", Role::Assistant, ["one\n\n \ntwo", "", "three"]).unwrap();
        assert_eq!(turn.paragraphs(), ["one", "two", "three"]);
    }

    #[test]
    fn turn_treats_lone_carriage_return_as_line_break() {
        let turn = Turn::new("Glaucon", Role::Assistant, ["one\rtwo\r\nthree\r\rfour"]).unwrap();
        assert_eq!(turn.paragraphs(), ["one\ntwo\nthree", "four"]);
    }

    #[test]
    fn turn_strips_control_characters_from_content() {
        let turn = Turn::new("Glaucon", Role::Assistant, ["a\0b\x07c\u{7f}d\u{85}\te"]).unwrap();
        assert_eq!(turn.paragraphs(), ["abcd\te"]);

        assert_eq!(
            Turn::new("Glaucon", Role::Assistant, ["\0\x01"]),
            Err(ValidationError::EmptyContent {
                speaker: "Glaucon".to_string()
            })
        );
    }

    #[test]
    fn turn_rejects_control_characters_in_speaker() {
        assert_eq!(
            Turn::new("Soc\0rates", Role::User, ["hi"]),
            Err(ValidationError::ControlCharacter {
                speaker: "Soc\0rates".to_string(),
                found: '\0',
            })
        );
        assert!(Turn::new("Soc\trates", Role::User, ["hi"]).is_ok());
    }

    #[test]
    fn turn_rejects_empty_speaker() {
        assert_eq!(
            Turn::new("   ", Role::User, ["hi"]),
            Err(ValidationError::EmptySpeaker)
        );
    }

    #[test]
    fn turn_rejects_multiline_speaker() {
        assert!(matches!(
            Turn::new("A\nB", Role::User, ["hi"]),
            Err(ValidationError::MultilineSpeaker(_))
        ));
    }

    #[test]
    fn turn_rejects_speaker_starting_with_escape() {
        assert!(matches!(
            Turn::new("\\Bob", Role::User, ["hi"]),
            Err(ValidationError::EscapedSpeaker(_))
        ));
    }

    #[test]
    fn turn_rejects_missing_content() {
        assert_eq!(
            Turn::new("Socrates", Role::User, ["  ", "\n\n"]),
            Err(ValidationError::EmptyContent {
                speaker: "Socrates".to_string()
            })
        );
        assert!(Turn::new("Socrates", Role::User, Vec::<String>::new()).is_err());
    }

    #[test]
    fn dialogue_collects_in_order() {
        let dialogue: Dialogue = ["A", "B", "C"]
            .into_iter()
            .map(|name| Turn::new(name, Role::User, ["x"]).unwrap())
            .collect();
        let names: Vec<_> = dialogue.iter().map(Turn::speaker).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(dialogue.len(), 3);
        assert!(Dialogue::default().is_empty());
    }
}
