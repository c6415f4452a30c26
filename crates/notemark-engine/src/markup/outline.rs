//! Plain-text outline of a parsed tree, for snapshot tests and debugging.

use std::fmt::Write;

use crate::models::{Document, NodeId, NodeKind};

/// Render an indented, one-line-per-node outline of the document.
pub fn outline(doc: &Document) -> String {
    let mut out = String::new();
    for &child in doc.children(doc.root()) {
        write_node(doc, child, 0, &mut out);
    }
    out
}

fn write_node(doc: &Document, id: NodeId, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    match &doc.node(id).kind {
        NodeKind::Root => {}
        NodeKind::Title { level, text } => {
            let _ = writeln!(out, "{pad}title[{level}] {text:?}");
        }
        NodeKind::Paragraph => {
            let _ = writeln!(out, "{pad}paragraph");
        }
        NodeKind::List => {
            let _ = writeln!(out, "{pad}list");
        }
        NodeKind::ListItem => {
            let _ = writeln!(out, "{pad}item");
        }
        NodeKind::CodeBlock {
            language,
            code,
            block_style,
        } => {
            let style = if *block_style { "block" } else { "inline" };
            match language {
                Some(lang) => {
                    let _ = writeln!(out, "{pad}code[{style},{lang}] {code:?}");
                }
                None => {
                    let _ = writeln!(out, "{pad}code[{style}] {code:?}");
                }
            }
        }
        NodeKind::Link { url, title } => {
            let _ = writeln!(out, "{pad}link[{url}] {title:?}");
        }
        NodeKind::NoteReference { title, target } => {
            let target = target.as_deref().unwrap_or("broken");
            let _ = writeln!(out, "{pad}note[{target}] {title:?}");
        }
        NodeKind::Text(text) => {
            let _ = writeln!(out, "{pad}text {text:?}");
        }
    }
    for &child in doc.children(id) {
        write_node(doc, child, depth + 1, out);
    }
}
