//! WebIDL tokenizer for the widl processor.
//!
//! This crate provides the lexical analysis phase:
//! - `TokenKind` - the closed set of token types
//! - `Token` - a lexeme with its preceding trivia
//! - `tokenize` - the tokenizer itself
//! - `SyntaxError` - the fatal error type shared with the parser

pub mod error;
pub mod token;
pub mod tokenizer;

pub use error::SyntaxError;
pub use token::Token;
pub use tokenizer::tokenize;

use serde::{Serialize, Serializer};

// =============================================================================
// TokenKind - the closed token set
// =============================================================================

/// Every kind of token the tokenizer can produce.
///
/// Keywords get one variant each; an `Identifier` whose lexeme is a known
/// keyword is re-kinded to that keyword's variant while keeping its lexeme.
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Hash)]
pub enum TokenKind {
    // Lexical classes
    Decimal = 0,
    Integer = 1,
    Identifier = 2,
    String = 3,
    Other = 4,
    Eof = 5,
    // Punctuation
    OpenParen = 6,
    CloseParen = 7,
    Comma = 8,
    Ellipsis = 9,
    Colon = 10,
    Semicolon = 11,
    LessThan = 12,
    Equals = 13,
    GreaterThan = 14,
    Question = 15,
    OpenBracket = 16,
    CloseBracket = 17,
    OpenBrace = 18,
    CloseBrace = 19,
    // Type-name keywords
    ArrayBuffer = 20,
    DataView = 21,
    Int8Array = 22,
    Int16Array = 23,
    Int32Array = 24,
    Uint8Array = 25,
    Uint16Array = 26,
    Uint32Array = 27,
    Uint8ClampedArray = 28,
    Float32Array = 29,
    Float64Array = 30,
    Any = 31,
    Object = 32,
    Symbol = 33,
    // String-type keywords
    ByteString = 34,
    DOMString = 35,
    USVString = 36,
    // Argument-name keywords
    Async = 37,
    Attribute = 38,
    Callback = 39,
    Const = 40,
    Constructor = 41,
    Deleter = 42,
    Dictionary = 43,
    Enum = 44,
    Getter = 45,
    Includes = 46,
    Inherit = 47,
    Interface = 48,
    Iterable = 49,
    Maplike = 50,
    Namespace = 51,
    Partial = 52,
    Required = 53,
    Setlike = 54,
    Setter = 55,
    Static = 56,
    Stringifier = 57,
    Typedef = 58,
    Unrestricted = 59,
    // Other terminals
    NegativeInfinity = 60,
    FrozenArray = 61,
    Infinity = 62,
    NaN = 63,
    Promise = 64,
    Boolean = 65,
    Byte = 66,
    Double = 67,
    False = 68,
    Float = 69,
    Long = 70,
    Mixin = 71,
    Null = 72,
    Octet = 73,
    Optional = 74,
    Or = 75,
    Readonly = 76,
    Record = 77,
    Sequence = 78,
    Short = 79,
    True = 80,
    Unsigned = 81,
    Void = 82, // LastKeyword and LastToken
}

impl TokenKind {
    pub const FIRST_PUNCTUATION: TokenKind = TokenKind::OpenParen;
    pub const LAST_PUNCTUATION: TokenKind = TokenKind::CloseBrace;
    pub const FIRST_KEYWORD: TokenKind = TokenKind::ArrayBuffer;
    pub const LAST_KEYWORD: TokenKind = TokenKind::Void;
    pub const FIRST_TYPE_NAME_KEYWORD: TokenKind = TokenKind::ArrayBuffer;
    pub const LAST_TYPE_NAME_KEYWORD: TokenKind = TokenKind::Symbol;
    pub const FIRST_STRING_TYPE: TokenKind = TokenKind::ByteString;
    pub const LAST_STRING_TYPE: TokenKind = TokenKind::USVString;
    pub const FIRST_ARGUMENT_NAME_KEYWORD: TokenKind = TokenKind::Async;
    pub const LAST_ARGUMENT_NAME_KEYWORD: TokenKind = TokenKind::Unrestricted;

    /// The wire spelling of this kind: the keyword lexeme, the punctuation
    /// glyph, or the lexical class name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Decimal => "decimal",
            TokenKind::Integer => "integer",
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string",
            TokenKind::Other => "other",
            TokenKind::Eof => "eof",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Ellipsis => "...",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::LessThan => "<",
            TokenKind::Equals => "=",
            TokenKind::GreaterThan => ">",
            TokenKind::Question => "?",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::ArrayBuffer => "ArrayBuffer",
            TokenKind::DataView => "DataView",
            TokenKind::Int8Array => "Int8Array",
            TokenKind::Int16Array => "Int16Array",
            TokenKind::Int32Array => "Int32Array",
            TokenKind::Uint8Array => "Uint8Array",
            TokenKind::Uint16Array => "Uint16Array",
            TokenKind::Uint32Array => "Uint32Array",
            TokenKind::Uint8ClampedArray => "Uint8ClampedArray",
            TokenKind::Float32Array => "Float32Array",
            TokenKind::Float64Array => "Float64Array",
            TokenKind::Any => "any",
            TokenKind::Object => "object",
            TokenKind::Symbol => "symbol",
            TokenKind::ByteString => "ByteString",
            TokenKind::DOMString => "DOMString",
            TokenKind::USVString => "USVString",
            TokenKind::Async => "async",
            TokenKind::Attribute => "attribute",
            TokenKind::Callback => "callback",
            TokenKind::Const => "const",
            TokenKind::Constructor => "constructor",
            TokenKind::Deleter => "deleter",
            TokenKind::Dictionary => "dictionary",
            TokenKind::Enum => "enum",
            TokenKind::Getter => "getter",
            TokenKind::Includes => "includes",
            TokenKind::Inherit => "inherit",
            TokenKind::Interface => "interface",
            TokenKind::Iterable => "iterable",
            TokenKind::Maplike => "maplike",
            TokenKind::Namespace => "namespace",
            TokenKind::Partial => "partial",
            TokenKind::Required => "required",
            TokenKind::Setlike => "setlike",
            TokenKind::Setter => "setter",
            TokenKind::Static => "static",
            TokenKind::Stringifier => "stringifier",
            TokenKind::Typedef => "typedef",
            TokenKind::Unrestricted => "unrestricted",
            TokenKind::NegativeInfinity => "-Infinity",
            TokenKind::FrozenArray => "FrozenArray",
            TokenKind::Infinity => "Infinity",
            TokenKind::NaN => "NaN",
            TokenKind::Promise => "Promise",
            TokenKind::Boolean => "boolean",
            TokenKind::Byte => "byte",
            TokenKind::Double => "double",
            TokenKind::False => "false",
            TokenKind::Float => "float",
            TokenKind::Long => "long",
            TokenKind::Mixin => "mixin",
            TokenKind::Null => "null",
            TokenKind::Octet => "octet",
            TokenKind::Optional => "optional",
            TokenKind::Or => "or",
            TokenKind::Readonly => "readonly",
            TokenKind::Record => "record",
            TokenKind::Sequence => "sequence",
            TokenKind::Short => "short",
            TokenKind::True => "true",
            TokenKind::Unsigned => "unsigned",
            TokenKind::Void => "void",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// =============================================================================
// Token classification
// =============================================================================

/// Check if a token kind is a keyword.
#[must_use]
pub fn token_is_keyword(kind: TokenKind) -> bool {
    let k = kind as u16;
    k >= TokenKind::FIRST_KEYWORD as u16 && k <= TokenKind::LAST_KEYWORD as u16
}

/// Check if a token kind is punctuation.
#[must_use]
pub fn token_is_punctuation(kind: TokenKind) -> bool {
    let k = kind as u16;
    k >= TokenKind::FIRST_PUNCTUATION as u16 && k <= TokenKind::LAST_PUNCTUATION as u16
}

/// Check if a token kind is a type-name keyword (`ArrayBuffer`, `any`, …).
#[must_use]
pub fn token_is_type_name_keyword(kind: TokenKind) -> bool {
    let k = kind as u16;
    k >= TokenKind::FIRST_TYPE_NAME_KEYWORD as u16 && k <= TokenKind::LAST_TYPE_NAME_KEYWORD as u16
}

/// Check if a token kind is a string type (`ByteString`, `DOMString`, `USVString`).
#[must_use]
pub fn token_is_string_type(kind: TokenKind) -> bool {
    let k = kind as u16;
    k >= TokenKind::FIRST_STRING_TYPE as u16 && k <= TokenKind::LAST_STRING_TYPE as u16
}

/// Check if a token kind may stand in for an argument name.
#[must_use]
pub fn token_is_argument_name_keyword(kind: TokenKind) -> bool {
    let k = kind as u16;
    k >= TokenKind::FIRST_ARGUMENT_NAME_KEYWORD as u16
        && k <= TokenKind::LAST_ARGUMENT_NAME_KEYWORD as u16
}

// =============================================================================
// Text to keyword lookup
// =============================================================================

/// Convert a lexeme to its keyword kind, if it is a keyword.
#[must_use]
pub fn text_to_keyword(text: &str) -> Option<TokenKind> {
    match text {
        // Type-name keywords
        "ArrayBuffer" => Some(TokenKind::ArrayBuffer),
        "DataView" => Some(TokenKind::DataView),
        "Int8Array" => Some(TokenKind::Int8Array),
        "Int16Array" => Some(TokenKind::Int16Array),
        "Int32Array" => Some(TokenKind::Int32Array),
        "Uint8Array" => Some(TokenKind::Uint8Array),
        "Uint16Array" => Some(TokenKind::Uint16Array),
        "Uint32Array" => Some(TokenKind::Uint32Array),
        "Uint8ClampedArray" => Some(TokenKind::Uint8ClampedArray),
        "Float32Array" => Some(TokenKind::Float32Array),
        "Float64Array" => Some(TokenKind::Float64Array),
        "any" => Some(TokenKind::Any),
        "object" => Some(TokenKind::Object),
        "symbol" => Some(TokenKind::Symbol),
        // String-type keywords
        "ByteString" => Some(TokenKind::ByteString),
        "DOMString" => Some(TokenKind::DOMString),
        "USVString" => Some(TokenKind::USVString),
        // Argument-name keywords
        "async" => Some(TokenKind::Async),
        "attribute" => Some(TokenKind::Attribute),
        "callback" => Some(TokenKind::Callback),
        "const" => Some(TokenKind::Const),
        "constructor" => Some(TokenKind::Constructor),
        "deleter" => Some(TokenKind::Deleter),
        "dictionary" => Some(TokenKind::Dictionary),
        "enum" => Some(TokenKind::Enum),
        "getter" => Some(TokenKind::Getter),
        "includes" => Some(TokenKind::Includes),
        "inherit" => Some(TokenKind::Inherit),
        "interface" => Some(TokenKind::Interface),
        "iterable" => Some(TokenKind::Iterable),
        "maplike" => Some(TokenKind::Maplike),
        "namespace" => Some(TokenKind::Namespace),
        "partial" => Some(TokenKind::Partial),
        "required" => Some(TokenKind::Required),
        "setlike" => Some(TokenKind::Setlike),
        "setter" => Some(TokenKind::Setter),
        "static" => Some(TokenKind::Static),
        "stringifier" => Some(TokenKind::Stringifier),
        "typedef" => Some(TokenKind::Typedef),
        "unrestricted" => Some(TokenKind::Unrestricted),
        // Other terminals
        "-Infinity" => Some(TokenKind::NegativeInfinity),
        "FrozenArray" => Some(TokenKind::FrozenArray),
        "Infinity" => Some(TokenKind::Infinity),
        "NaN" => Some(TokenKind::NaN),
        "Promise" => Some(TokenKind::Promise),
        "boolean" => Some(TokenKind::Boolean),
        "byte" => Some(TokenKind::Byte),
        "double" => Some(TokenKind::Double),
        "false" => Some(TokenKind::False),
        "float" => Some(TokenKind::Float),
        "long" => Some(TokenKind::Long),
        "mixin" => Some(TokenKind::Mixin),
        "null" => Some(TokenKind::Null),
        "octet" => Some(TokenKind::Octet),
        "optional" => Some(TokenKind::Optional),
        "or" => Some(TokenKind::Or),
        "readonly" => Some(TokenKind::Readonly),
        "record" => Some(TokenKind::Record),
        "sequence" => Some(TokenKind::Sequence),
        "short" => Some(TokenKind::Short),
        "true" => Some(TokenKind::True),
        "unsigned" => Some(TokenKind::Unsigned),
        "void" => Some(TokenKind::Void),
        _ => None,
    }
}

/// Identifiers that are flat out rejected by the tokenizer.
pub const RESERVED_IDENTIFIERS: [&str; 3] = ["_constructor", "toString", "_toString"];

/// Punctuation prefixes in match order.
pub(crate) const PUNCTUATIONS: [(&str, TokenKind); 14] = [
    ("(", TokenKind::OpenParen),
    (")", TokenKind::CloseParen),
    (",", TokenKind::Comma),
    ("...", TokenKind::Ellipsis),
    (":", TokenKind::Colon),
    (";", TokenKind::Semicolon),
    ("<", TokenKind::LessThan),
    ("=", TokenKind::Equals),
    (">", TokenKind::GreaterThan),
    ("?", TokenKind::Question),
    ("[", TokenKind::OpenBracket),
    ("]", TokenKind::CloseBracket),
    ("{", TokenKind::OpenBrace),
    ("}", TokenKind::CloseBrace),
];
