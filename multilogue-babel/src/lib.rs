//! Conversions between the three shapes of a multi-party dialogue
//!
//!     A dialogue lives in three places at once:
//!         - a plain-text script, the canonical form a person edits and that gets persisted,
//!         - rendered HTML markup, the form that is displayed (and re-edited in place),
//!         - an ordered chat message list, the form a language-model worker consumes.
//!
//!     This crate converts between them through one in-memory model, [`Dialogue`], and keeps the
//!     conversions convergent: after a single normalization pass every round trip is the identity.
//!
//!     This is a pure lib, that is, it powers the multilogue cli but is shell agnostic: no code
//!     here prints, reads env vars or touches files.
//!
//! Architecture
//!
//!     Every format goes through the model and nothing else. There is no intermediate
//!     representation beyond [`Dialogue`] / [`Turn`], since a dialogue is flat: an ordered list of
//!     turns, each a speaker, a role and paragraphs.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # Error taxonomy
//!     ├── dialogue                # Turn / Dialogue / Role model
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── script              # Hand-edited text: parser, serializer, rules
//!     │   ├── html                # Markup: renderer, extractor
//!     │   └── messages            # Chat message list mapping
//!     ├── transforms.rs           # The conversion entry points
//!     ├── worker.rs               # Model-worker request/outcome boundary
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── <format>
//!     │   └── <testname>.rs
//!     ├── properties.rs           # Round trip laws with proptest
//!     └── fixtures
//!         └── <docname>.<ext>
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Strictness
//!
//!     Script parsing fails hard, with a line number: the script is hand edited and that is where
//!     mistakes happen. Markup extraction degrades instead, skipping broken blocks and reporting
//!     them, since the markup was produced by the renderer in the first place.
//!
//! Worker boundary
//!
//!     Sending the dialogue to a model is asynchronous and happens outside this crate. The
//!     [`worker::Exchange`] type keeps one request in flight at a time, tags it with an id and
//!     refuses outcomes that do not belong to it; [`worker::WorkerLink`] runs a [`worker::Worker`]
//!     implementation on its own tokio task.
//!
pub mod dialogue;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;
pub mod transforms;
pub mod worker;

pub use dialogue::{Dialogue, Role, Turn};
pub use error::{
    ExtractionWarning, FormatError, MappingError, ParseError, ParseErrorKind, ValidationError,
    WarningKind,
};
pub use format::Format;
pub use formats::{
    default_css, Extracted, HtmlFormat, HtmlOptions, Message, MessagesFormat, ScriptFormat,
    ScriptRules, WorkerReply,
};
pub use registry::FormatRegistry;
