//! Script serialization (Dialogue → script text)
//!
//! Output is canonical: every header carries its role, one blank line
//! separates paragraphs and turns, and each line ends with `\n`.

use super::parser::{needs_escape, ESCAPE};
use crate::dialogue::Dialogue;

/// Serialize a dialogue to its canonical script form.
///
/// Paragraph lines that would otherwise be read back as a header, or that
/// already start with the escape character, are written with a leading
/// [`ESCAPE`].
pub fn serialize_script(doc: &Dialogue) -> String {
    let mut output = String::new();
    for (index, turn) in doc.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        output.push_str(&format!("{} ({}):\n", turn.speaker(), turn.role()));
        for (p_index, paragraph) in turn.paragraphs().iter().enumerate() {
            if p_index > 0 {
                output.push('\n');
            }
            for line in paragraph.lines() {
                if needs_escape(line) {
                    output.push(ESCAPE);
                }
                output.push_str(line);
                output.push('\n');
            }
        }
    }
    output
}
