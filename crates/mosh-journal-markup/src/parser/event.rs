//! # Parser Events
//!
//! Events are the intermediate representation between tokenizing and tree
//! building. The [`Parser`](super::Parser) turns raw tokens into a flat
//! sequence of events with decoded text and split-out attributes; the
//! [`Sink`](super::sink::Sink) owns every tree-construction decision
//! (implied end tags, void elements, stray closers).
//!
//! ```text
//! <ul><li>one<li>two</ul>
//!
//! Open(ul)
//!   Open(li) Text("one")
//!   Open(li) Text("two")      ← Sink closes the first li here
//! Close(ul)
//! ```

use crate::tree::Attribute;

/// An event emitted by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A start tag. `self_closing` records a trailing `/>`.
    Open {
        name: String,
        attrs: Vec<Attribute>,
        self_closing: bool,
    },

    /// An end tag, name lowercased.
    Close { name: String },

    /// Character data with entities already decoded.
    Text(String),

    /// Contents of a raw text element (`script`, `style`), kept verbatim.
    RawText(String),

    /// Comment body without the `<!--`/`-->` delimiters.
    Comment(String),

    /// A `<!...>` declaration, verbatim.
    Doctype(String),
}

impl Event {
    /// Create an open event with no attributes.
    pub fn open(name: &str) -> Self {
        Event::Open {
            name: name.to_string(),
            attrs: Vec::new(),
            self_closing: false,
        }
    }

    /// Create a close event.
    pub fn close(name: &str) -> Self {
        Event::Close {
            name: name.to_string(),
        }
    }
}
