//! The context-stack tree builder.
//!
//! Tokens are consumed one at a time; a stack of open structural contexts
//! decides where new content attaches. Margins drive nesting: deeper
//! indentation opens nested contexts, shallower indentation closes them.

use super::code::{CodeAccumulator, capture_braced};
use super::context::{ContextKind, Frame};
use super::error::ParseError;
use super::tags::{TagAttributes, collect_braced, parse_attributes, split_link};
use super::tokenizer::{Cursor, Token, TokenKind};
use crate::models::{Document, NodeArena, NodeId, NodeKind};
use crate::resolve::TitleResolver;

pub(crate) struct TreeBuilder<'r> {
    arena: NodeArena,
    stack: Vec<Frame>,
    resolver: &'r dyn TitleResolver,
}

impl<'r> TreeBuilder<'r> {
    pub fn new(resolver: &'r dyn TitleResolver) -> Self {
        let mut arena = NodeArena::default();
        let root = arena.push(NodeKind::Root);
        Self {
            arena,
            stack: vec![Frame::Open {
                kind: ContextKind::Root,
                margin: 0,
                node: root,
            }],
            resolver,
        }
    }

    /// Drive the main loop to completion. A failed parse returns only the
    /// error; the partial tree is dropped with `self`.
    pub fn run(mut self, cur: &mut Cursor<'_>) -> Result<Document, ParseError> {
        // A note must open with its own heading.
        cur.expect(TokenKind::Title, None);

        let mut pending = true;
        while !cur.is_eof() && cur.error().is_none() {
            if pending {
                pending = false;
            } else {
                cur.advance();
            }
            self.dispatch(cur);
        }

        if let Some(err) = cur.take_error() {
            return Err(err);
        }

        while self.stack.len() > 1 {
            self.pop();
        }
        let root = self.top_node();
        Ok(self.arena.into_document(root))
    }

    fn dispatch(&mut self, cur: &mut Cursor<'_>) {
        let tok = cur.current().clone();
        match tok.kind {
            TokenKind::Title => self.title(&tok),
            TokenKind::ParagraphBreak => self.start_paragraph(tok.margin),
            TokenKind::BulletMark => self.start_list_item(tok.margin),
            TokenKind::Text | TokenKind::Space => {
                self.append_inline(tok.value.as_deref().unwrap_or(""));
            }
            TokenKind::Tag => match tok.value.as_deref() {
                Some("link") => self.tag_link(cur),
                Some("note") => self.tag_note(cur),
                Some("code") => self.tag_code(cur),
                // Unrecognized tags fall back to their surface text.
                _ => self.append_inline(&tok.literal_text()),
            },
            TokenKind::CodeLine => self.code_line(&tok),
            TokenKind::Eof => {}
            // Stray operators are re-emitted literally: no input is dropped.
            TokenKind::Operator | TokenKind::Unknown => {
                self.append_inline(&tok.literal_text());
            }
        }
    }

    /// Body headings always flatten nesting: pop everything, then append.
    fn title(&mut self, tok: &Token) {
        while self.top().kind() != ContextKind::Root {
            self.pop();
        }
        let level = tok.margin.clamp(1, 6) as u8;
        let text = tok.value.clone().unwrap_or_default();
        self.arena
            .new_child(self.top_node(), NodeKind::Title { level, text });
    }

    /// Close contexts the new paragraph does not belong to, then open it.
    fn start_paragraph(&mut self, margin: usize) {
        while self.stack.len() > 1
            && (self.top().margin() > margin
                || matches!(
                    self.top().kind(),
                    ContextKind::Paragraph | ContextKind::Code
                ))
        {
            self.pop();
        }
        self.push_frame(ContextKind::Paragraph, NodeKind::Paragraph, margin);
    }

    /// Margin-aware bullet handling. Deeper margins open a nested list under
    /// the enclosing item; a margin seen before attaches as a sibling at
    /// that depth. The item's first line is itself a paragraph so further
    /// paragraphs and bullets can nest under it.
    fn start_list_item(&mut self, margin: usize) {
        while self.stack.len() > 1 {
            let close = match self.top().kind() {
                ContextKind::Paragraph | ContextKind::Code => true,
                ContextKind::ListItem => self.top().margin() >= margin,
                ContextKind::List => self.top().margin() > margin,
                ContextKind::Root => false,
            };
            if !close {
                break;
            }
            self.pop();
        }
        if self.top().kind() != ContextKind::List {
            self.push_frame(ContextKind::List, NodeKind::List, margin);
        }
        self.push_frame(ContextKind::ListItem, NodeKind::ListItem, margin);
        self.push_frame(ContextKind::Paragraph, NodeKind::Paragraph, margin);
    }

    /// `\link{...}`: capture braced content, split into title and url.
    fn tag_link(&mut self, cur: &mut Cursor<'_>) {
        let content = collect_braced(cur);
        if cur.error().is_some() {
            return;
        }
        let (title, url) = split_link(&content);
        self.append_node(NodeKind::Link { url, title });
    }

    /// `\note{...}`: resolve the display title against the external lookup.
    /// An unknown title degrades to a broken reference, it never aborts.
    fn tag_note(&mut self, cur: &mut Cursor<'_>) {
        let title = collect_braced(cur);
        if cur.error().is_some() {
            return;
        }
        let target = self.resolver.resolve(&title);
        self.append_node(NodeKind::NoteReference { title, target });
    }

    /// `\code[attrs]{...}` or `\code` followed by `|` lines. The raw
    /// character after the tag (or attribute list) decides the form.
    fn tag_code(&mut self, cur: &mut Cursor<'_>) {
        let attrs = if cur.peek_char() == Some('[') {
            parse_attributes(cur)
        } else {
            TagAttributes::default()
        };
        if cur.error().is_some() {
            return;
        }

        // "plain" suppresses language-specific handling downstream.
        let language = attrs
            .positional
            .first()
            .filter(|v| v.as_str() == "plain")
            .cloned();
        let mut acc = CodeAccumulator::new(language);

        if cur.peek_char() == Some('{') {
            capture_braced(cur, &mut acc);
            self.append_node(acc.materialize());
        } else {
            // Deferred form: leave the context open for `|` lines.
            self.stack.push(Frame::Code { margin: 0, acc });
        }
    }

    /// A `|` line: open a block-style code context if none is open, then
    /// accumulate the raw line.
    fn code_line(&mut self, tok: &Token) {
        if self.top().kind() != ContextKind::Code {
            self.start_paragraph(tok.margin);
            self.stack.push(Frame::Code {
                margin: tok.margin,
                acc: CodeAccumulator::new(None),
            });
        }
        if let Some(Frame::Code { acc, .. }) = self.stack.last_mut() {
            acc.push_line(tok.value.as_deref().unwrap_or(""));
        }
    }

    /// Append inline text to the innermost node-owning frame. An open code
    /// context cannot hold inline children, so it closes first.
    fn append_inline(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        while self.top().kind() == ContextKind::Code {
            self.pop();
        }
        self.arena.push_text(self.top_node(), text);
    }

    fn append_node(&mut self, kind: NodeKind) {
        while self.top().kind() == ContextKind::Code {
            self.pop();
        }
        let id = self.arena.push(kind);
        self.arena.append_child(self.top_node(), id);
    }

    fn top(&self) -> &Frame {
        self.stack.last().expect("stack always holds the root frame")
    }

    /// The node of the innermost frame that owns one. Code frames have no
    /// node until they are popped.
    fn top_node(&self) -> NodeId {
        self.stack
            .iter()
            .rev()
            .find_map(|f| match f {
                Frame::Open { node, .. } => Some(*node),
                Frame::Code { .. } => None,
            })
            .expect("the root frame owns a node")
    }

    fn push_frame(&mut self, kind: ContextKind, node_kind: NodeKind, margin: usize) {
        let node = self.arena.new_child(self.top_node(), node_kind);
        self.stack.push(Frame::Open { kind, margin, node });
    }

    /// Pop the top frame. Popping a code context materializes its node now
    /// that the inline/block ambiguity is resolved.
    fn pop(&mut self) {
        debug_assert!(self.stack.len() > 1, "the root frame is never popped");
        if let Some(Frame::Code { acc, .. }) = self.stack.pop() {
            let id = self.arena.push(acc.materialize());
            self.arena.append_child(self.top_node(), id);
        }
    }
}
