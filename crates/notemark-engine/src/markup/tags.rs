//! Grammar helpers for the escaped tag directives `\link`, `\note`, `\code`.

use std::collections::BTreeMap;

use super::tokenizer::{Cursor, TokenKind};

/// Attribute list of a `\code[...]` tag: positional values plus named
/// `key=value` pairs. Duplicate named keys keep the last value.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct TagAttributes {
    pub positional: Vec<String>,
    pub named: BTreeMap<String, String>,
}

/// Collect the braced content of `\link{...}` / `\note{...}`.
///
/// Every token between the braces contributes its literal surface text;
/// nothing inside is interpreted, so nested tags arrive verbatim. Content
/// cut short by end of input keeps what was collected.
pub(crate) fn collect_braced(cur: &mut Cursor<'_>) -> String {
    let mut content = String::new();
    if !cur.expect(TokenKind::Operator, Some("{")) {
        return content;
    }
    cur.advance();
    while !cur.is_eof() && cur.error().is_none() && !cur.at(TokenKind::Operator, Some("}")) {
        content.push_str(&cur.current().literal_text());
        cur.advance();
    }
    content
}

/// Split link content into `(title, url)`.
///
/// The content is scanned from its right end for a `>`; if the text before
/// it ends (after right-trimming) with `-`, the content splits there. A `>`
/// is far less likely inside a url than in a title, which is why the scan
/// runs backwards. Contents shorter than three characters, or without the
/// marker, are used whole as both title and url.
pub(crate) fn split_link(content: &str) -> (String, String) {
    if content.len() >= 3 {
        let bytes = content.as_bytes();
        let mut pos = content.len() - 1;
        while pos > 1 && bytes[pos] != b'>' {
            pos -= 1;
        }
        if pos > 1 && bytes[pos] == b'>' {
            let before = content[..pos].trim_end();
            if let Some(title) = before.strip_suffix('-') {
                let url = content[pos + 1..].trim();
                return (title.trim().to_string(), url.to_string());
            }
        }
    }
    (content.to_string(), content.to_string())
}

/// Parse the optional `[...]` attribute list after `\code`.
///
/// Entries are `TEXT` or `TEXT=TEXT`, separated by commas, closed by `]`.
/// Any missing expected token sets the cursor's error flag, making a
/// malformed list fatal like the rest of the grammar.
pub(crate) fn parse_attributes(cur: &mut Cursor<'_>) -> TagAttributes {
    let mut attrs = TagAttributes::default();
    if !cur.expect(TokenKind::Operator, Some("[")) {
        return attrs;
    }
    loop {
        cur.advance();
        if cur.error().is_some() || cur.at(TokenKind::Operator, Some("]")) {
            break;
        }
        if !cur.require(TokenKind::Text, None) {
            break;
        }
        let key = cur.current().value.clone().unwrap_or_default();
        cur.advance();
        if cur.at(TokenKind::Operator, Some("=")) {
            if !cur.expect(TokenKind::Text, None) {
                break;
            }
            attrs
                .named
                .insert(key, cur.current().value.clone().unwrap_or_default());
            cur.advance();
            if cur.at(TokenKind::Operator, Some("]")) {
                break;
            }
            if !cur.require(TokenKind::Operator, Some(",")) {
                break;
            }
        } else if cur.at(TokenKind::Operator, Some(",")) {
            attrs.positional.push(key);
        } else if cur.at(TokenKind::Operator, Some("]")) {
            attrs.positional.push(key);
            break;
        } else {
            cur.require(TokenKind::Operator, Some(","));
            break;
        }
    }
    attrs
}
