//! Deferred construction of code content.
//!
//! One token of lookahead cannot tell a single-line inline code element from
//! a multi-line block: `\code` may be followed by a braced payload or by
//! nothing but `|` lines. Content therefore accumulates in a plain buffer
//! and the real tree node is materialized only when the context closes.

use crate::models::NodeKind;

use super::tokenizer::{Cursor, TokenKind};

/// Buffer for an open code context, before any tree node exists for it.
#[derive(Debug)]
pub(crate) struct CodeAccumulator {
    code: String,
    block_style: bool,
    seen_content: bool,
    min_leading: Option<usize>,
    language: Option<String>,
}

impl CodeAccumulator {
    pub fn new(language: Option<String>) -> Self {
        Self {
            code: String::new(),
            block_style: false,
            seen_content: false,
            min_leading: None,
            language,
        }
    }

    /// Append inline (brace-form) content, escaped for safe embedding.
    pub fn push_inline(&mut self, text: &str) {
        self.code.push_str(&html_escape::encode_text(text));
    }

    /// Append one `|` line. Blank lines before the first real content are
    /// discarded; after that every line is kept, blank or not. The minimum
    /// leading-space count only tracks kept non-blank lines.
    pub fn push_line(&mut self, raw: &str) {
        self.block_style = true;
        let blank = raw.trim().is_empty();
        if !blank {
            self.seen_content = true;
        }
        if !self.seen_content {
            return;
        }
        if !blank {
            let leading = raw.len() - raw.trim_start_matches(' ').len();
            self.min_leading = Some(self.min_leading.map_or(leading, |m| m.min(leading)));
        }
        self.code.push_str(&html_escape::encode_text(raw));
        self.code.push('\n');
    }

    /// Build the final node, de-indenting block content by the recorded
    /// minimum leading-space count.
    pub fn materialize(mut self) -> NodeKind {
        if self.block_style
            && let Some(min) = self.min_leading
            && min > 0
        {
            self.code = dedent(&self.code, min);
        }
        NodeKind::CodeBlock {
            language: self.language,
            code: self.code,
            block_style: self.block_style,
        }
    }
}

/// Strip exactly `n` leading spaces from every line that has them. Lines
/// shorter than the prefix (blank lines kept inside a block) stay unchanged.
fn dedent(code: &str, n: usize) -> String {
    let prefix = " ".repeat(n);
    let mut out = String::with_capacity(code.len());
    for (i, line) in code.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.strip_prefix(prefix.as_str()).unwrap_or(line));
    }
    out
}

/// Capture a brace-delimited code payload into `acc`.
///
/// The depth counter starts at 1 on the opening brace; inner braces are kept
/// as content and the closing brace that returns the depth to zero is
/// consumed but not appended.
pub(crate) fn capture_braced(cur: &mut Cursor<'_>, acc: &mut CodeAccumulator) {
    if !cur.expect(TokenKind::Operator, Some("{")) {
        return;
    }
    let mut depth = 1usize;
    while !cur.is_eof() && cur.error().is_none() && depth != 0 {
        cur.advance();
        if cur.at(TokenKind::Operator, Some("{")) {
            depth += 1;
        } else if cur.at(TokenKind::Operator, Some("}")) {
            depth -= 1;
        }
        if depth != 0 {
            acc.push_inline(&cur.current().literal_text());
        }
    }
}
