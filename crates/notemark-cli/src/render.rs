//! HTML rendering of a parsed note tree.
//!
//! The element mapping is the one the note viewer uses: headings become
//! `h1..h6`, paragraphs `p`, lists `ul`/`li`, links open in a new tab, note
//! references become `note-link` anchors (`broken` when unresolved), and
//! code becomes `code.code-inline` or `code.code-block > pre`. Inline text
//! is escaped here; code content arrives pre-escaped from the parser.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};
use notemark_engine::{Document, NodeId, NodeKind};

/// Render the document as an HTML fragment.
pub fn to_html(doc: &Document) -> String {
    let mut out = String::new();
    children_html(doc, doc.root(), &mut out);
    out
}

fn children_html(doc: &Document, id: NodeId, out: &mut String) {
    for &child in doc.children(id) {
        node_html(doc, child, out);
    }
}

fn node_html(doc: &Document, id: NodeId, out: &mut String) {
    match &doc.node(id).kind {
        NodeKind::Root => children_html(doc, id, out),
        NodeKind::Title { level, text } => {
            let _ = writeln!(out, "<h{level}>{}</h{level}>", encode_text(text));
        }
        NodeKind::Paragraph => {
            out.push_str("<p>");
            children_html(doc, id, out);
            out.push_str("</p>\n");
        }
        NodeKind::List => {
            out.push_str("<ul>\n");
            children_html(doc, id, out);
            out.push_str("</ul>\n");
        }
        NodeKind::ListItem => {
            out.push_str("<li>");
            children_html(doc, id, out);
            out.push_str("</li>\n");
        }
        NodeKind::CodeBlock {
            code, block_style, ..
        } => {
            if *block_style {
                let _ = write!(out, "<code class=\"code-block\"><pre>{code}</pre></code>\n");
            } else {
                let _ = write!(out, "<code class=\"code-inline\">{code}</code>");
            }
        }
        NodeKind::Link { url, title } => {
            let _ = write!(
                out,
                "<a href=\"{}\" target=\"_blank\">{}</a>",
                encode_double_quoted_attribute(url),
                encode_text(title)
            );
        }
        NodeKind::NoteReference { title, target } => {
            match target {
                Some(id) => {
                    let _ = write!(
                        out,
                        "<a class=\"note-link\" href=\"#{}\">{}</a>",
                        encode_double_quoted_attribute(id),
                        encode_text(title)
                    );
                }
                None => {
                    let _ = write!(
                        out,
                        "<a class=\"note-link broken\" href=\"#\">{}</a>",
                        encode_text(title)
                    );
                }
            };
        }
        NodeKind::Text(text) => out.push_str(&encode_text(text)),
    }
}

#[cfg(test)]
mod tests {
    use notemark_engine::{TitleIndex, parse_note};
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(text: &str) -> String {
        let doc = parse_note(text, &TitleIndex::new()).unwrap();
        to_html(&doc)
    }

    #[test]
    fn renders_title_and_paragraph() {
        assert_eq!(
            render("# My Note\n\nHello."),
            "<h1>My Note</h1>\n<p>Hello.</p>\n"
        );
    }

    #[test]
    fn escapes_inline_text() {
        assert_eq!(
            render("# t\n\na < b"),
            "<h1>t</h1>\n<p>a &lt; b</p>\n"
        );
    }

    #[test]
    fn renders_nested_lists() {
        assert_eq!(
            render("# t\n\n- a\n  - b"),
            "<h1>t</h1>\n<ul>\n<li><p>a</p>\n<ul>\n<li><p>b</p>\n</li>\n</ul>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn renders_links_with_target_blank() {
        assert_eq!(
            render("# t\n\n\\link{Example - >https://x.test}"),
            "<h1>t</h1>\n<p><a href=\"https://x.test\" target=\"_blank\">Example</a></p>\n"
        );
    }

    #[test]
    fn renders_broken_note_references_degraded() {
        assert_eq!(
            render("# t\n\n\\note{Missing}"),
            "<h1>t</h1>\n<p><a class=\"note-link broken\" href=\"#\">Missing</a></p>\n"
        );
    }

    #[test]
    fn resolved_note_reference_targets_the_id() {
        let index = TitleIndex::from_entries([("Other".to_string(), "other_note".to_string())]);
        let doc = parse_note("# t\n\n\\note{Other}", &index).unwrap();
        assert_eq!(
            to_html(&doc),
            "<h1>t</h1>\n<p><a class=\"note-link\" href=\"#other_note\">Other</a></p>\n"
        );
    }

    #[test]
    fn code_content_is_not_double_escaped() {
        assert_eq!(
            render("# t\n\n\\code[]{a < b}"),
            "<h1>t</h1>\n<p><code class=\"code-inline\">a &lt; b</code></p>\n"
        );
    }

    #[test]
    fn block_code_wraps_in_pre() {
        assert_eq!(
            render("# t\n\n| one\n| two"),
            "<h1>t</h1>\n<p><code class=\"code-block\"><pre>one\ntwo\n</pre></code></p>\n"
        );
    }
}
