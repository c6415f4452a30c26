use thiserror::Error;

use super::tokenizer::TokenKind;

/// A structural grammar error. Fatal to the parse that raised it: the
/// partially built tree is discarded and only the error is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The next token had the wrong kind.
    #[error("expected token of kind {expected}, got '{got_value}' of kind {got}")]
    UnexpectedKind {
        expected: TokenKind,
        got: TokenKind,
        got_value: String,
    },

    /// A specific token was required and the next token's kind didn't match.
    #[error("expected token '{expected_value}' of kind {expected}, got '{got_value}' of kind {got}")]
    UnexpectedToken {
        expected: TokenKind,
        expected_value: String,
        got: TokenKind,
        got_value: String,
    },

    /// The kind matched but the value didn't.
    #[error("expected '{expected}', got '{got}'")]
    UnexpectedValue { expected: String, got: String },
}
