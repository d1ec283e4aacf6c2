//! Syntax errors and the shared context-window rendering.
//!
//! Both fatal syntax errors and validation diagnostics point at a token and
//! print a window of the surrounding source with a caret. The window is
//! defined over tokens, not raw offsets: up to five tokens on either side,
//! the preceding text cut down to its last line and the following text to
//! its first.

use crate::{Token, TokenKind};
use serde::Serialize;
use widl_common::text::last_line;

/// How many tokens of context to print on either side of the error.
const MAX_CONTEXT_TOKENS: usize = 5;

/// A fatal error raised by the tokenizer or the parser.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxError {
    /// Decorated message: context header plus the bare message.
    pub message: String,
    /// The raw message without location decoration.
    pub bare_message: String,
    /// Printable window around the offending token, caret included.
    pub context: String,
    /// 1-based line of the offending token.
    pub line: u32,
    /// Caller-supplied label for the source, if any.
    pub source_name: Option<String>,
    /// The complete original input text.
    pub input: String,
    /// The token vector produced so far.
    pub tokens: Vec<Token>,
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// Whether a message renders as a syntax or a validation problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Validation,
}

impl ErrorKind {
    fn label(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "Syntax",
            ErrorKind::Validation => "Validation",
        }
    }

    /// Syntax errors describe what came before; validation diagnostics what
    /// they sit inside.
    fn context_word(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "since",
            ErrorKind::Validation => "inside",
        }
    }
}

/// The named construct an error occurred in, for the message header.
#[derive(Clone, Copy, Debug)]
pub struct ConstructName<'a> {
    /// Construct spelling as it appears in source (`interface`, `dictionary`, …).
    pub construct: &'a str,
    pub name: &'a str,
    pub partial: bool,
}

/// A rendered error header: decorated message, context window, line.
#[derive(Clone, Debug)]
pub struct RenderedError {
    pub message: String,
    pub context: String,
    pub line: u32,
}

/// Render the message header and context window for an error bound to
/// `tokens[position]`.
#[must_use]
pub fn render_error(
    tokens: &[Token],
    position: usize,
    kind: ErrorKind,
    source_name: Option<&str>,
    current: Option<ConstructName<'_>>,
    bare_message: &str,
) -> RenderedError {
    if tokens.is_empty() {
        return RenderedError {
            message: format!("{} error: {bare_message}", kind.label()),
            context: format!("{} error:", kind.label()),
            line: 1,
        };
    }
    let position = position.min(tokens.len() - 1);
    let line = line_of(tokens, position);

    let preceding = {
        let from = position.saturating_sub(MAX_CONTEXT_TOKENS);
        let mut text = concat_tokens(&tokens[from..position]);
        // Close the window right where the offending token starts.
        if tokens[position].kind != TokenKind::Eof {
            text.push_str(&tokens[position].trivia);
        }
        last_line(&text).to_string()
    };
    let subsequent = {
        let to = (position + MAX_CONTEXT_TOKENS).min(tokens.len());
        let text = concat_tokens(&tokens[position..to]);
        let text = if tokens[position].kind == TokenKind::Eof {
            text
        } else {
            text[tokens[position].trivia.len()..].to_string()
        };
        match text.find('\n') {
            Some(pos) => text[..pos].to_string(),
            None => text,
        }
    };
    let caret_pad = " ".repeat(preceding.chars().count());
    let source_context = format!("{preceding}{subsequent}\n{caret_pad}^");

    let in_source_name = source_name.map_or(String::new(), |name| format!(" in {name}"));
    let grammatical_context = current.map_or(String::new(), |c| {
        format!(
            ", {} `{}{} {}`",
            kind.context_word(),
            if c.partial { "partial " } else { "" },
            c.construct,
            c.name
        )
    });
    let context = format!(
        "{} error at line {line}{in_source_name}{grammatical_context}:\n{source_context}",
        kind.label()
    );
    let message = format!("{context} {bare_message}");
    RenderedError {
        message,
        context,
        line,
    }
}

fn line_of(tokens: &[Token], position: usize) -> u32 {
    match tokens.get(position) {
        Some(token) if token.kind != TokenKind::Eof => token.line,
        _ if position > 0 => tokens[position - 1].line,
        _ => 1,
    }
}

fn concat_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&token.trivia);
        out.push_str(&token.value);
    }
    out
}
