//! Hard limits that keep malformed input from taking the process down.

/// Maximum recursion depth while parsing nested types and unions.
///
/// Chosen well above anything found in real IDL fragments; the parser
/// reports a syntax error instead of overflowing the stack.
pub const MAX_PARSER_RECURSION_DEPTH: u32 = 256;
