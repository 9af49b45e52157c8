//! Tagged-text markup parsing.
//!
//! Turns text such as `"<b>bold</b> &amp; plain"` into plain text plus a list
//! of closed [`Tag`]s, each covering a byte range of the plain text. Styling is
//! applied elsewhere; this crate only knows about tags, entities and line
//! breaks.
//!
//! # Example
//!
//! ```
//! use richmark_markup::parse;
//!
//! let markup = parse("Hello <em>world</em> &amp; you");
//! assert_eq!(markup.text, "Hello world & you");
//! assert_eq!(markup.tags[0].name(), "em");
//! assert_eq!(markup.tags[0].range(), Some(6..11));
//! ```

mod charset;
mod entities;
mod parser;
mod scanner;
mod tag;

pub use charset::{Alphanumeric, CharSet, Predicate, Whitespace};
pub use entities::{decode_entity, escape};
pub use parser::{Markup, ParseDiagnostic, parse};
pub use scanner::{BitDigits, ScanError, Scanner};
pub use tag::{LINE_BREAK_TAG, Tag, TagAttributes};
