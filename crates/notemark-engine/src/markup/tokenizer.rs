//! Hand-written tokenizer for the note markup.
//!
//! The lexer switches mode on position: at the start of a line it decides
//! between bullets, headings, code lines, paragraph breaks and soft line
//! breaks, tracking indentation; mid-line it produces tag escapes, operator
//! characters, spaces and text runs. Every byte of the input lands in some
//! token, so unrecognized input can always fall back to its surface text.

use std::fmt;

use tracing::trace;

use super::error::ParseError;

/// Characters that form single-character `Operator` tokens mid-line. The
/// newline is caught by the start-of-line rule first and the backslash by the
/// tag rule, so neither is ever actually emitted as an operator.
const OPERATORS: &[u8] = b",=[]{}\n\\";

fn is_operator(b: u8) -> bool {
    OPERATORS.contains(&b)
}

fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Unknown,
    Title,
    ParagraphBreak,
    BulletMark,
    Tag,
    Operator,
    Space,
    Text,
    CodeLine,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::Title => "TITLE",
            TokenKind::ParagraphBreak => "PARAGRAPH_BREAK",
            TokenKind::BulletMark => "BULLET_MARK",
            TokenKind::Tag => "TAG",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Space => "SPACE",
            TokenKind::Text => "TEXT",
            TokenKind::CodeLine => "CODE_LINE",
            TokenKind::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// One lexed token.
///
/// `margin` carries the heading level for `Title`, the offset of the item
/// content from its line start for `BulletMark`, and the indentation of the
/// following line for `ParagraphBreak` and `CodeLine`. It is zero elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<String>,
    pub margin: usize,
}

impl Token {
    fn bare(kind: TokenKind) -> Self {
        Self {
            kind,
            value: None,
            margin: 0,
        }
    }

    fn with_value(kind: TokenKind, value: String) -> Self {
        Self {
            kind,
            value: Some(value),
            margin: 0,
        }
    }

    /// Whether this token matches a kind and, optionally, an exact value.
    pub fn is(&self, kind: TokenKind, value: Option<&str>) -> bool {
        if self.kind != kind {
            return false;
        }
        match value {
            None => true,
            Some(v) => self.value.as_deref() == Some(v),
        }
    }

    /// The surface text this token was read from. Used for literal fallback:
    /// a tag regrows its backslash, valueless tokens render as nothing.
    pub fn literal_text(&self) -> String {
        match self.kind {
            TokenKind::Tag => format!("\\{}", self.value.as_deref().unwrap_or("")),
            _ => self.value.clone().unwrap_or_default(),
        }
    }
}

/// Position into the source plus the current token and the error flag.
///
/// Once an error is set the cursor is frozen: `advance` becomes a no-op and
/// the builder is expected to stop.
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    tok: Token,
    err: Option<ParseError>,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            tok: Token::bare(TokenKind::Unknown),
            err: None,
        }
    }

    pub fn current(&self) -> &Token {
        &self.tok
    }

    pub fn is_eof(&self) -> bool {
        self.tok.kind == TokenKind::Eof
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.err.as_ref()
    }

    pub fn take_error(&mut self) -> Option<ParseError> {
        self.err.take()
    }

    /// Current token matches a kind and optional value.
    pub fn at(&self, kind: TokenKind, value: Option<&str>) -> bool {
        self.tok.is(kind, value)
    }

    /// Raw character at the cursor position, without tokenizing. The tag
    /// dispatcher uses this one-character lookahead to tell `\code[..]{..}`
    /// from the deferred line form.
    pub fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    /// Read the next token.
    pub fn advance(&mut self) -> &Token {
        if self.err.is_some() {
            return &self.tok;
        }
        self.tok = self.next_token();
        trace!("token {} at {}: {:?}", self.tok.kind, self.pos, self.tok.value);
        &self.tok
    }

    /// Advance and require a kind (and optionally a value), setting the error
    /// flag on mismatch. Returns whether the expectation held.
    pub fn expect(&mut self, kind: TokenKind, value: Option<&str>) -> bool {
        self.advance();
        self.require(kind, value)
    }

    /// Require the current token to match without advancing, setting the
    /// error flag exactly like [`Cursor::expect`] on mismatch.
    pub fn require(&mut self, kind: TokenKind, value: Option<&str>) -> bool {
        if self.err.is_some() {
            return false;
        }
        if self.tok.is(kind, value) {
            return true;
        }
        let got_value = self.tok.value.clone().unwrap_or_default();
        self.err = Some(if self.tok.kind != kind {
            match value {
                None => ParseError::UnexpectedKind {
                    expected: kind,
                    got: self.tok.kind,
                    got_value,
                },
                Some(v) => ParseError::UnexpectedToken {
                    expected: kind,
                    expected_value: v.to_string(),
                    got: self.tok.kind,
                    got_value,
                },
            }
        } else {
            ParseError::UnexpectedValue {
                expected: value.unwrap_or_default().to_string(),
                got: got_value,
            }
        });
        false
    }

    fn next_token(&mut self) -> Token {
        let bytes = self.src.as_bytes();
        if self.pos >= bytes.len() {
            return Token::bare(TokenKind::Eof);
        }
        // Start-of-line lexing applies before the first token and on every
        // newline. The position-0 case must not re-trigger: a soft-break
        // token consumes no input, and the tokenizer has to keep moving.
        let before_first = self.pos == 0 && self.tok.kind == TokenKind::Unknown;
        if before_first || bytes[self.pos] == b'\n' {
            return self.line_start_token();
        }

        let b = bytes[self.pos];
        if b == b'\\' {
            self.pos += 1;
            let start = self.pos;
            self.eat_word();
            return Token::with_value(TokenKind::Tag, self.src[start..self.pos].to_string());
        }
        if is_operator(b) {
            self.pos += 1;
            return Token::with_value(TokenKind::Operator, (b as char).to_string());
        }
        if is_space(b) {
            self.pos += 1;
            return Token::with_value(TokenKind::Space, (b as char).to_string());
        }
        let start = self.pos;
        self.eat_word();
        Token::with_value(TokenKind::Text, self.src[start..self.pos].to_string())
    }

    /// Lexing at a line boundary: consume the newline, the indentation and
    /// any following blank lines, then decide what the line starts.
    fn line_start_token(&mut self) -> Token {
        let bytes = self.src.as_bytes();
        if self.pos != 0 {
            self.pos += 1; // the newline itself
        }
        let mut line_start = self.pos;

        // Indentation of the line right after the break.
        while self.pos < bytes.len() && is_space(bytes[self.pos]) {
            self.pos += 1;
        }

        // Cross any run of blank lines, remembering where the last one began.
        let mut blank_run = false;
        while self.pos < bytes.len() && (is_space(bytes[self.pos]) || bytes[self.pos] == b'\n') {
            if bytes[self.pos] == b'\n' {
                blank_run = true;
                line_start = self.pos + 1;
            }
            self.pos += 1;
        }

        if self.pos >= bytes.len() {
            return Token::bare(TokenKind::Eof);
        }

        let margin = self.pos - line_start;
        match bytes[self.pos] {
            b'-' | b'*' => {
                self.pos += 1;
                while self.pos < bytes.len() && is_space(bytes[self.pos]) {
                    self.pos += 1;
                }
                Token {
                    kind: TokenKind::BulletMark,
                    value: None,
                    margin: self.pos - line_start,
                }
            }
            b'#' => {
                let mut level = 0usize;
                while self.pos < bytes.len() && bytes[self.pos] == b'#' {
                    level += 1;
                    self.pos += 1;
                }
                let text = self.take_line();
                Token {
                    kind: TokenKind::Title,
                    value: Some(text.trim().to_string()),
                    margin: level.min(6),
                }
            }
            b'|' => {
                self.pos += 1;
                let text = self.take_line();
                Token {
                    kind: TokenKind::CodeLine,
                    value: Some(text.to_string()),
                    margin,
                }
            }
            _ if blank_run => Token {
                kind: TokenKind::ParagraphBreak,
                value: None,
                margin,
            },
            _ => {
                // A single line break and its indentation collapse into one
                // leading space: a soft break is inline whitespace.
                let start = self.pos;
                while self.pos < bytes.len() && is_space(bytes[self.pos]) {
                    self.pos += 1;
                }
                Token::with_value(TokenKind::Text, format!(" {}", &self.src[start..self.pos]))
            }
        }
    }

    /// Rest of the current line, leaving the newline unconsumed.
    fn take_line(&mut self) -> &'a str {
        let src = self.src;
        let bytes = src.as_bytes();
        let start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
            self.pos += 1;
        }
        &src[start..self.pos]
    }

    fn eat_word(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && !is_operator(bytes[self.pos]) && !is_space(bytes[self.pos])
        {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        let mut cur = Cursor::new(input);
        let mut out = vec![];
        loop {
            let tok = cur.advance().clone();
            let done = tok.kind == TokenKind::Eof;
            out.push(tok);
            if done {
                break;
            }
        }
        out
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_is_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn whitespace_only_input_is_eof() {
        assert_eq!(kinds("  \n \t \n"), vec![TokenKind::Eof]);
    }

    #[test]
    fn title_with_level_and_trimmed_text() {
        let toks = lex("## A title  ");
        assert_eq!(toks[0].kind, TokenKind::Title);
        assert_eq!(toks[0].margin, 2);
        assert_eq!(toks[0].value.as_deref(), Some("A title"));
    }

    #[test]
    fn title_level_caps_at_six() {
        let toks = lex("######## deep");
        assert_eq!(toks[0].kind, TokenKind::Title);
        assert_eq!(toks[0].margin, 6);
    }

    #[test]
    fn hash_mid_line_is_plain_text() {
        let toks = lex("# t\nissue #42");
        let texts: Vec<_> = toks
            .iter()
            .filter(|t| t.kind == TokenKind::Text)
            .map(|t| t.value.clone().unwrap())
            .collect();
        assert_eq!(texts, vec![" ", "issue", "#42"]);
    }

    #[test]
    fn soft_break_collapses_to_a_space() {
        let toks = lex("# t\none\ntwo");
        assert_eq!(
            toks.iter()
                .map(|t| t.value.clone().unwrap_or_default())
                .collect::<Vec<_>>()
                .concat(),
            "t one two"
        );
    }

    #[test]
    fn blank_run_becomes_paragraph_break_with_margin() {
        let toks = lex("# t\n\n  indented");
        assert_eq!(toks[1].kind, TokenKind::ParagraphBreak);
        assert_eq!(toks[1].margin, 2);
    }

    #[test]
    fn paragraph_break_margin_counts_the_last_line_only() {
        // The blank run may cross several lines; only the indentation of the
        // line that carries content counts.
        let toks = lex("# t\n   \n\n    x");
        assert_eq!(toks[1].kind, TokenKind::ParagraphBreak);
        assert_eq!(toks[1].margin, 4);
    }

    #[test]
    fn bullet_margin_is_content_offset() {
        let toks = lex("# t\n- item");
        assert_eq!(toks[1].kind, TokenKind::BulletMark);
        assert_eq!(toks[1].margin, 2);

        let toks = lex("# t\n  - item");
        assert_eq!(toks[1].kind, TokenKind::BulletMark);
        assert_eq!(toks[1].margin, 4);
    }

    #[test]
    fn star_bullet_matches_dash_bullet() {
        let toks = lex("# t\n* item");
        assert_eq!(toks[1].kind, TokenKind::BulletMark);
        assert_eq!(toks[1].margin, 2);
    }

    #[test]
    fn code_line_is_verbatim_after_the_bar() {
        let toks = lex("# t\n|  let x = [1, 2];");
        assert_eq!(toks[1].kind, TokenKind::CodeLine);
        assert_eq!(toks[1].value.as_deref(), Some("  let x = [1, 2];"));
    }

    #[test]
    fn tag_is_a_backslash_word() {
        let toks = lex("# t\n\\link{x}");
        assert_eq!(toks[2].kind, TokenKind::Tag);
        assert_eq!(toks[2].value.as_deref(), Some("link"));
        assert_eq!(toks[3].kind, TokenKind::Operator);
        assert_eq!(toks[3].value.as_deref(), Some("{"));
    }

    #[test]
    fn backslash_before_operator_is_an_empty_tag() {
        let toks = lex("# t\na\\,b");
        assert_eq!(toks[3].kind, TokenKind::Tag);
        assert_eq!(toks[3].value.as_deref(), Some(""));
        assert_eq!(toks[3].literal_text(), "\\");
        assert_eq!(toks[4].kind, TokenKind::Operator);
    }

    #[test]
    fn operators_are_single_characters() {
        let toks = lex("# t\na=b,c");
        let ops: Vec<_> = toks
            .iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.value.clone().unwrap())
            .collect();
        assert_eq!(ops, vec!["=", ","]);
    }

    #[test]
    fn trailing_text_at_end_of_input_is_kept() {
        let toks = lex("# t\nbody");
        assert_eq!(toks[2].kind, TokenKind::Text);
        assert_eq!(toks[2].value.as_deref(), Some("body"));
        assert_eq!(toks.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn unterminated_title_line_stops_at_end_of_input() {
        let toks = lex("# only a title");
        assert_eq!(toks[0].kind, TokenKind::Title);
        assert_eq!(toks[0].value.as_deref(), Some("only a title"));
        assert_eq!(toks[1].kind, TokenKind::Eof);
    }

    #[test]
    fn expect_reports_wrong_kind() {
        let mut cur = Cursor::new("plain text");
        assert!(!cur.expect(TokenKind::Title, None));
        let err = cur.take_error().unwrap();
        assert!(err.to_string().contains("TITLE"));
    }

    #[test]
    fn expect_reports_wrong_value_separately() {
        let mut cur = Cursor::new("# t");
        cur.advance();
        assert!(!cur.expect(TokenKind::Operator, Some("{")));
        let err = cur.take_error().unwrap();
        // Wrong kind altogether: the message names both kinds.
        assert!(err.to_string().contains("OPERATOR"));
        assert!(err.to_string().contains("EOF"));
    }

    #[test]
    fn errored_cursor_refuses_to_advance() {
        let mut cur = Cursor::new("words here");
        cur.expect(TokenKind::Title, None);
        assert!(cur.error().is_some());
        let frozen = cur.current().clone();
        cur.advance();
        assert_eq!(*cur.current(), frozen);
    }

    #[test]
    fn unicode_text_runs_stay_intact() {
        let toks = lex("# t\ncaf\u{e9} na\u{ef}ve");
        assert_eq!(toks[2].value.as_deref(), Some("caf\u{e9}"));
        assert_eq!(toks[4].value.as_deref(), Some("na\u{ef}ve"));
    }
}
