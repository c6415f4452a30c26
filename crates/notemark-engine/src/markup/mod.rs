//! The note-markup parser: raw note text in, document tree out.
//!
//! Data flows one way: text → tokens → tree. Parsing is synchronous and
//! pure; independent callers may parse concurrently since no state is
//! shared beyond the read-only title resolver.

mod builder;
mod code;
mod context;
mod error;
pub mod outline;
mod tags;
mod tokenizer;

pub use error::ParseError;
pub use tokenizer::{Cursor, Token, TokenKind};

use crate::models::Document;
use crate::resolve::TitleResolver;

use builder::TreeBuilder;

/// Parse one note's text into a document tree.
///
/// The text must open, after leading whitespace, with a `#` heading — the
/// note's own title. A grammar error aborts the parse and discards the
/// partial tree; unresolved `\note` references and unrecognized tags do not.
pub fn parse_note(text: &str, resolver: &dyn TitleResolver) -> Result<Document, ParseError> {
    let mut cur = Cursor::new(text);
    TreeBuilder::new(resolver).run(&mut cur)
}
