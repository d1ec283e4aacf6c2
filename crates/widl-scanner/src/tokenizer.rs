//! The tokenizer: splits input into tokens with attached trivia.
//!
//! Whitespace and comments are never tokens. They accumulate in a pending
//! buffer and ride along as the `trivia` of the next significant token; the
//! terminal `eof` token carries whatever trivia is left at end of input.
//!
//! The matchers below are hand translations of the grammar's lexical
//! regexes, anchored at the cursor.

use crate::error::{render_error, ErrorKind, SyntaxError};
use crate::{text_to_keyword, Token, TokenKind, PUNCTUATIONS, RESERVED_IDENTIFIERS};
use widl_common::text::unescape;

/// Tokenize a full source text.
///
/// Returns the token vector terminated by an `eof` token, or a fatal
/// [`SyntaxError`] for reserved identifiers and non-progressing input.
pub fn tokenize(input: &str, source_name: Option<&str>) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut trivia = String::new();
    let mut line: u32 = 1;
    let mut index: u32 = 0;
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let next = rest.chars().next().unwrap_or('\0');

        // Trivia first: whitespace runs and comments.
        if matches!(next, '\t' | '\n' | '\r' | ' ') {
            let len = match_whitespace(rest);
            line += newline_count(&rest[..len]);
            trivia.push_str(&rest[..len]);
            pos += len;
            continue;
        }
        if next == '/' {
            if let Some(len) = match_comment(rest) {
                line += newline_count(&rest[..len]);
                trivia.push_str(&rest[..len]);
                pos += len;
                continue;
            }
        }

        let mut matched: Option<(TokenKind, usize)> = None;
        let mut is_identifier = false;
        if next == '-' || next == '.' || next == '_' || next.is_ascii_alphanumeric() {
            if let Some(len) = match_decimal(rest) {
                matched = Some((TokenKind::Decimal, len));
            } else if let Some(len) = match_integer(rest) {
                matched = Some((TokenKind::Integer, len));
            } else if let Some(len) = match_identifier(rest) {
                matched = Some((TokenKind::Identifier, len));
                is_identifier = true;
            }
        } else if next == '"' {
            if let Some(len) = match_string(rest) {
                matched = Some((TokenKind::String, len));
            }
        }
        if matched.is_none() {
            for (text, kind) in PUNCTUATIONS {
                if rest.starts_with(text) {
                    matched = Some((kind, text.len()));
                    break;
                }
            }
        }
        if matched.is_none() {
            if let Some(len) = match_other(rest) {
                matched = Some((TokenKind::Other, len));
            }
        }

        let Some((mut kind, len)) = matched else {
            return Err(no_progress_error(input, source_name, tokens, line));
        };
        let value = &rest[..len];
        if is_identifier {
            // The reserved check fires on the raw lexeme, before keyword
            // rewriting, so `_constructor` is rejected outright.
            if RESERVED_IDENTIFIERS.contains(&value) {
                tokens.push(Token {
                    kind,
                    value: value.to_string(),
                    trivia: std::mem::take(&mut trivia),
                    line,
                    index,
                });
                let message = format!(
                    "{} is a reserved identifier and must not be used.",
                    unescape(value)
                );
                return Err(reserved_error(input, source_name, tokens, &message));
            }
            if let Some(keyword) = text_to_keyword(value) {
                kind = keyword;
            }
        }
        tokens.push(Token {
            kind,
            value: value.to_string(),
            trivia: std::mem::take(&mut trivia),
            line,
            index,
        });
        pos += len;
        index += 1;
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        value: String::new(),
        trivia,
        line,
        index,
    });
    Ok(tokens)
}

fn reserved_error(
    input: &str,
    source_name: Option<&str>,
    tokens: Vec<Token>,
    message: &str,
) -> SyntaxError {
    let rendered = render_error(
        &tokens,
        tokens.len() - 1,
        ErrorKind::Syntax,
        source_name,
        None,
        message,
    );
    SyntaxError {
        message: rendered.message,
        bare_message: message.to_string(),
        context: rendered.context,
        line: rendered.line,
        source_name: source_name.map(str::to_string),
        input: input.to_string(),
        tokens,
    }
}

fn no_progress_error(
    input: &str,
    source_name: Option<&str>,
    tokens: Vec<Token>,
    line: u32,
) -> SyntaxError {
    let message = "Token stream not progressing";
    SyntaxError {
        message: format!("Syntax error at line {line}: {message}"),
        bare_message: message.to_string(),
        context: format!("Syntax error at line {line}:"),
        line,
        source_name: source_name.map(str::to_string),
        input: input.to_string(),
        tokens,
    }
}

fn newline_count(text: &str) -> u32 {
    text.bytes().filter(|&b| b == b'\n').count() as u32
}

// =============================================================================
// Anchored matchers
// =============================================================================

/// `[\t\n\r ]+`
fn match_whitespace(s: &str) -> usize {
    s.bytes()
        .take_while(|&b| matches!(b, b'\t' | b'\n' | b'\r' | b' '))
        .count()
}

/// One `//…` (up to, not including, the newline) or one balanced `/* … */`.
/// An unterminated block comment does not match; the `/` then falls through
/// to the `other` class.
fn match_comment(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        Some(b'/') => Some(s.find('\n').unwrap_or(s.len())),
        Some(b'*') => s[2..].find("*/").map(|end| 2 + end + 2),
        _ => None,
    }
}

fn count_digits(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count()
}

/// `-?(?=[0-9]*\.|[0-9]+[eE])(([0-9]+\.[0-9]*|[0-9]*\.[0-9]+)([Ee][-+]?[0-9]+)?|[0-9]+[Ee][-+]?[0-9]+)`
fn match_decimal(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let start = usize::from(bytes.first() == Some(&b'-'));

    // Lookahead: digits then a dot, or at least one digit then an exponent.
    let ahead = start + count_digits(bytes, start);
    let dotted = bytes.get(ahead) == Some(&b'.');
    let exponential = ahead > start && matches!(bytes.get(ahead).copied(), Some(b'e' | b'E'));
    if !dotted && !exponential {
        return None;
    }

    let int_digits = count_digits(bytes, start);
    if bytes.get(start + int_digits) == Some(&b'.') {
        let frac_from = start + int_digits + 1;
        let frac_digits = count_digits(bytes, frac_from);
        if int_digits == 0 && frac_digits == 0 {
            return None;
        }
        let end = frac_from + frac_digits;
        return Some(end + match_exponent(&bytes[end..]).unwrap_or(0));
    }
    if int_digits == 0 {
        return None;
    }
    let end = start + int_digits;
    match_exponent(&bytes[end..]).map(|exp| end + exp)
}

/// `[Ee][-+]?[0-9]+`
fn match_exponent(bytes: &[u8]) -> Option<usize> {
    if !matches!(bytes.first().copied(), Some(b'e' | b'E')) {
        return None;
    }
    let signed = matches!(bytes.get(1).copied(), Some(b'-' | b'+'));
    let digits_from = if signed { 2 } else { 1 };
    let digits = count_digits(bytes, digits_from);
    if digits == 0 {
        return None;
    }
    Some(digits_from + digits)
}

/// `-?(0([Xx][0-9A-Fa-f]+|[0-7]*)|[1-9][0-9]*)`
fn match_integer(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let start = usize::from(bytes.first() == Some(&b'-'));
    match bytes.get(start) {
        Some(b'0') => {
            if matches!(bytes.get(start + 1).copied(), Some(b'X' | b'x')) {
                let hex = bytes[start + 2..]
                    .iter()
                    .take_while(|b| b.is_ascii_hexdigit())
                    .count();
                if hex > 0 {
                    return Some(start + 2 + hex);
                }
            }
            let octal = bytes[start + 1..]
                .iter()
                .take_while(|&&b| matches!(b, b'0'..=b'7'))
                .count();
            Some(start + 1 + octal)
        }
        Some(b'1'..=b'9') => Some(start + 1 + count_digits(bytes, start + 1)),
        _ => None,
    }
}

/// `[_-]?[A-Za-z][0-9A-Z_a-z-]*`
fn match_identifier(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let start = usize::from(matches!(bytes.first().copied(), Some(b'_' | b'-')));
    if !bytes.get(start).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    let tail = bytes[start + 1..]
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-'))
        .count();
    Some(start + 1 + tail)
}

/// `"[^"]*"`
fn match_string(s: &str) -> Option<usize> {
    debug_assert!(s.starts_with('"'));
    s[1..].find('"').map(|end| 1 + end + 1)
}

/// `[^\t\n\r 0-9A-Za-z]` - a single character nothing else claimed.
fn match_other(s: &str) -> Option<usize> {
    let c = s.chars().next()?;
    if matches!(c, '\t' | '\n' | '\r' | ' ') || c.is_ascii_alphanumeric() {
        None
    } else {
        Some(c.len_utf8())
    }
}
