//! Tokens: a lexeme plus the trivia that preceded it.

use crate::TokenKind;
use serde::Serialize;

/// One token of the input stream.
///
/// `trivia` holds the whitespace and comments between the previous token and
/// this one; concatenating `trivia + value` over the whole stream (plus the
/// terminal `eof` trivia) reproduces the input verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Kind from the closed set; identifiers spelling a keyword are re-kinded.
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Exact source text of the token.
    pub value: String,
    /// Whitespace and comments preceding the token.
    pub trivia: String,
    /// 1-based line number at the start of the token.
    pub line: u32,
    /// 0-based position in the token stream.
    pub index: u32,
}

impl Token {
    /// Synthesize a token that never came from source, for autofix splices.
    #[must_use]
    pub fn synthetic(kind: TokenKind, value: impl Into<String>, trivia: impl Into<String>) -> Token {
        Token {
            kind,
            value: value.into(),
            trivia: trivia.into(),
            line: 1,
            index: 0,
        }
    }
}
