use widl_scanner::{tokenize, SyntaxError, Token, TokenKind};

fn tokens(source: &str) -> Vec<Token> {
    tokenize(source, None).expect("input should tokenize")
}

fn kinds(source: &str) -> Vec<TokenKind> {
    tokens(source).iter().map(|t| t.kind).collect()
}

fn tokenize_err(source: &str) -> SyntaxError {
    tokenize(source, None).expect_err("input should fail to tokenize")
}

// =========================================================================
// Trivia attachment
// =========================================================================

#[test]
fn trivia_plus_lexeme_reconstructs_the_input() {
    let source = "  // header\ninterface /* inline */ Foo {\n  attribute long x;\n};\n";
    let rebuilt: String = tokens(source)
        .iter()
        .map(|t| format!("{}{}", t.trivia, t.value))
        .collect();
    assert_eq!(rebuilt, source);
}

#[test]
fn comment_only_input_yields_a_lone_eof_carrying_the_trivia() {
    let source = "//comment\n";
    let tokens = tokens(source);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!(tokens[0].value, "");
    assert_eq!(tokens[0].trivia, "//comment\n");
}

#[test]
fn block_comments_and_whitespace_accrete_onto_the_next_token() {
    let tokens = tokens("/* a */ /* b */ interface");
    assert_eq!(tokens[0].kind, TokenKind::Interface);
    assert_eq!(tokens[0].trivia, "/* a */ /* b */ ");
}

#[test]
fn unterminated_block_comment_degrades_to_other_tokens() {
    let tokens = tokens("/*x");
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![
            TokenKind::Other,
            TokenKind::Other,
            TokenKind::Identifier,
            TokenKind::Eof
        ]
    );
}

// =========================================================================
// Keyword rewriting and reserved identifiers
// =========================================================================

#[test]
fn keyword_lexemes_are_rekinded_but_unchanged() {
    let tokens = tokens("interface sequence maplike Uint8ClampedArray DOMString plain");
    let expected = [
        (TokenKind::Interface, "interface"),
        (TokenKind::Sequence, "sequence"),
        (TokenKind::Maplike, "maplike"),
        (TokenKind::Uint8ClampedArray, "Uint8ClampedArray"),
        (TokenKind::DOMString, "DOMString"),
        (TokenKind::Identifier, "plain"),
    ];
    for (token, (kind, value)) in tokens.iter().zip(expected) {
        assert_eq!(token.kind, kind);
        assert_eq!(token.value, value);
    }
}

#[test]
fn negative_infinity_is_a_single_keyword_token() {
    assert_eq!(
        kinds("-Infinity"),
        vec![TokenKind::NegativeInfinity, TokenKind::Eof]
    );
}

#[test]
fn tostring_is_a_reserved_identifier() {
    let error = tokenize_err("interface A { toString; };");
    assert_eq!(
        error.bare_message,
        "toString is a reserved identifier and must not be used."
    );
}

#[test]
fn underscore_constructor_is_rejected_before_keyword_rewriting() {
    let error = tokenize_err("_constructor");
    assert_eq!(
        error.bare_message,
        "constructor is a reserved identifier and must not be used."
    );
    assert_eq!(error.tokens.last().map(|t| t.value.as_str()), Some("_constructor"));
}

#[test]
fn escaped_identifiers_keep_their_underscore_lexeme() {
    let tokens = tokens("_interface");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "_interface");
}

// =========================================================================
// Numbers
// =========================================================================

#[test]
fn decimal_forms_match_the_lexical_grammar() {
    for source in ["3.14", "-0.5", ".5", "4.", "1e3", "-2.5e-2", "10E+1"] {
        let tokens = tokens(source);
        assert_eq!(tokens[0].kind, TokenKind::Decimal, "for {source:?}");
        assert_eq!(tokens[0].value, source, "for {source:?}");
    }
}

#[test]
fn integer_forms_match_the_lexical_grammar() {
    for source in ["0", "42", "-7", "0x1F", "0755", "-0xaB"] {
        let tokens = tokens(source);
        assert_eq!(tokens[0].kind, TokenKind::Integer, "for {source:?}");
        assert_eq!(tokens[0].value, source, "for {source:?}");
    }
}

#[test]
fn broken_hex_prefix_falls_back_to_zero_then_identifier() {
    let tokens = tokens("0xg");
    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].value, "0");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, "xg");
}

#[test]
fn incomplete_exponent_is_not_part_of_the_number() {
    let tokens = tokens("1e");
    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].value, "1");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, "e");
}

// =========================================================================
// Punctuation, strings, other
// =========================================================================

#[test]
fn ellipsis_is_one_token() {
    assert_eq!(
        kinds("(... )"),
        vec![
            TokenKind::OpenParen,
            TokenKind::Ellipsis,
            TokenKind::CloseParen,
            TokenKind::Eof
        ]
    );
}

#[test]
fn strings_span_to_the_closing_quote() {
    let tokens = tokens("\"a b c\"");
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "\"a b c\"");
}

#[test]
fn lone_quote_and_stray_symbols_become_other_tokens() {
    assert_eq!(
        kinds("\"unterminated"),
        vec![TokenKind::Other, TokenKind::Identifier, TokenKind::Eof]
    );
    assert_eq!(kinds("@"), vec![TokenKind::Other, TokenKind::Eof]);
}

// =========================================================================
// Indices and lines
// =========================================================================

#[test]
fn token_indices_are_dense_and_lines_monotonic() {
    let tokens = tokens("interface A {\n  attribute long x;\n};\n");
    let mut last_line = 0;
    for (position, token) in tokens.iter().enumerate() {
        assert_eq!(token.index as usize, position);
        assert!(token.line >= last_line);
        last_line = token.line;
    }
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
}

#[test]
fn line_numbers_count_newlines_in_trivia() {
    let tokens = tokens("a\n\nb");
    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[1].line, 3);
}
