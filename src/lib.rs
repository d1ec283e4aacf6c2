//! widl - a WebIDL processor.
//!
//! Lossless tokenizer, trivia-preserving recursive-descent parser, writer,
//! and semantic validator with deferred autofixes. The tree keeps every
//! character of the input: for any parseable `input`,
//! `write(&parse(input)?) == input`.
//!
//! ```
//! let document = widl::parse("interface Foo { };").unwrap();
//! let diagnostics = widl::validate(&document);
//! assert_eq!(diagnostics[0].kind.as_str(), "require-exposed");
//! assert_eq!(widl::write(&document), "interface Foo { };");
//! ```

pub use widl_common::ParseOptions;
pub use widl_emitter::write;
pub use widl_parser::{parse, parse_with_options, Document, NodeArena, NodeData, NodeIndex};
pub use widl_scanner::{tokenize, SyntaxError, Token, TokenKind};
pub use widl_validator::{apply, validate, Diagnostic, DiagnosticKind, Fix};

/// Everything a consumer usually needs in one import.
pub mod prelude {
    pub use crate::{
        apply, parse, parse_with_options, validate, write, Diagnostic, DiagnosticKind, Document,
        Fix, ParseOptions, SyntaxError, Token, TokenKind,
    };
}
