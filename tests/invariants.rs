//! The quantified invariants: round-trip, trivia coverage, token indices,
//! keyword rewriting, and reserved-identifier rejection.

use widl::{parse, tokenize, write, TokenKind};

const CORPUS: &[&str] = &[
    "",
    "  \n",
    "//comment\n",
    "interface Foo { };",
    "interface Foo { };\n",
    "[Exposed=Window]\ninterface Bar : Foo {\n  readonly attribute long x;\n  void f(optional long n = 0);\n};\n",
    "dictionary D { required long x; };\ntypedef D T;\n",
    "enum E { \"a\", \"b\", };\nWindow includes Mixin;\n",
    "callback Cb = void ();\ncallback interface CI { void run(); };\n",
    "namespace N { readonly attribute short tab; const long K = 7; };\n",
    "partial dictionary D { long extra; };\n",
    "interface I {\n  /* keep */ stringifier; // me\n  iterable<long>;\n};\n",
];

#[test]
fn write_after_parse_reproduces_every_corpus_input() {
    for source in CORPUS {
        let document =
            parse(source).unwrap_or_else(|e| panic!("expected {source:?} to parse: {e}"));
        assert_eq!(&write(&document), source, "round-trip failed for {source:?}");
    }
}

#[test]
fn trivia_and_lexemes_cover_every_input_bytewise() {
    for source in CORPUS {
        let tokens = tokenize(source, None)
            .unwrap_or_else(|e| panic!("expected {source:?} to tokenize: {e}"));
        let rebuilt: String = tokens
            .iter()
            .map(|t| format!("{}{}", t.trivia, t.value))
            .collect();
        assert_eq!(&rebuilt, source, "trivia coverage failed for {source:?}");
    }
}

#[test]
fn token_indices_are_positions_and_lines_never_decrease() {
    for source in CORPUS {
        let tokens = tokenize(source, None).expect("corpus tokenizes");
        let mut line = 0;
        for (position, token) in tokens.iter().enumerate() {
            assert_eq!(token.index as usize, position);
            assert!(token.line >= line);
            line = token.line;
        }
    }
}

#[test]
fn the_document_keeps_the_token_vector_it_was_parsed_from() {
    let source = "interface Foo { };";
    let document = parse(source).expect("parses");
    let standalone = tokenize(source, None).expect("tokenizes");
    assert_eq!(document.tokens, standalone);
    assert_eq!(document.eof.kind, TokenKind::Eof);
    assert_eq!(document.tokens.last(), Some(&document.eof));
}

#[test]
fn identifiers_spelling_keywords_are_rekinded_with_lexeme_intact() {
    let tokens = tokenize("constructor readonly FrozenArray NaN notakeyword", None).expect("tokenizes");
    let expected = [
        TokenKind::Constructor,
        TokenKind::Readonly,
        TokenKind::FrozenArray,
        TokenKind::NaN,
        TokenKind::Identifier,
    ];
    for (token, kind) in tokens.iter().zip(expected) {
        assert_eq!(token.kind, kind);
        assert_eq!(token.kind.as_str() == token.value, token.kind != TokenKind::Identifier);
    }
}

#[test]
fn reserved_identifier_rejection_uses_the_exact_message() {
    let error = parse("interface A { attribute long toString; };")
        .expect_err("toString must be rejected");
    assert_eq!(
        error.bare_message,
        "toString is a reserved identifier and must not be used."
    );
}
