//! Format implementations
//!
//! Each format converts between a [`crate::Dialogue`] and one text
//! representation: the hand-edited script, rendered HTML, and the chat
//! message list sent to a model worker.

pub mod html;
pub mod messages;
pub mod script;

pub use html::{default_css, Extracted, HtmlFormat, HtmlOptions};
pub use messages::{Message, MessagesFormat, WorkerReply};
pub use script::{ScriptFormat, ScriptRules};
