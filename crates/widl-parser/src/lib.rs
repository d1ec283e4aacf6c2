//! Trivia-preserving recursive-descent WebIDL parser.
//!
//! This crate provides:
//! - `NodeArena` / `NodeData` - typed syntax-tree storage, one variant per
//!   production, parent links as non-owning indices
//! - `ParserState` - the token cursor and production parsers
//! - `Document` - the owning result of a parse
//! - `fragment` - re-parsing of short synthesized fragments for autofixes

pub mod arena;
pub mod node;
pub mod state;
mod state_definitions;
mod state_members;
mod state_types;

pub use arena::{Node, NodeArena, NodeIndex};
pub use node::{first_token, first_token_mut, NodeData};
pub use state::ParserState;

use widl_common::ParseOptions;
use widl_scanner::{SyntaxError, Token};

/// The owning result of a parse: the token vector, the node arena, the
/// top-level definitions in source order, and the terminal `eof` token
/// whose trivia closes out the document. Dropping a `Document` reclaims
/// the whole parse.
#[derive(Clone, Debug)]
pub struct Document {
    pub tokens: Vec<Token>,
    pub arena: NodeArena,
    pub definitions: Vec<NodeIndex>,
    pub eof: Token,
    pub source_name: Option<String>,
}

impl Document {
    /// The lowest-indexed token reachable from a node; its source position.
    #[must_use]
    pub fn first_token(&self, index: NodeIndex) -> Option<&Token> {
        first_token(&self.arena, index)
    }
}

/// Parse a WebIDL fragment into a [`Document`].
pub fn parse(input: &str) -> Result<Document, SyntaxError> {
    parse_with_options(input, &ParseOptions::default())
}

/// Parse with caller-supplied options (source labeling).
pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<Document, SyntaxError> {
    let mut state = ParserState::new(input, options)?;
    let tokens = state.token_vector().to_vec();
    let (definitions, eof) = state.parse_definitions()?;
    Ok(Document {
        tokens,
        arena: state.into_arena(),
        definitions,
        eof,
        source_name: options.source_name.clone(),
    })
}

/// Re-parsing of short synthesized fragments into an existing arena.
///
/// Autofixes build their replacement nodes by tokenizing literal text and
/// parsing it with the same productions, so spliced subtrees are
/// indistinguishable from hand-written ones. Each helper takes the arena by
/// value and hands it back alongside the new node's index.
pub mod fragment {
    use super::*;
    use widl_scanner::TokenKind;

    /// Parse a whole `[…]` extended-attribute block.
    pub fn ext_attrs_block(
        arena: NodeArena,
        text: &str,
    ) -> Result<(NodeArena, NodeIndex), SyntaxError> {
        let mut state = ParserState::fragment(text, arena)?;
        let block = state
            .parse_extended_attributes()?
            .ok_or_else(|| state.error("Expected an extended attribute block"))?;
        Ok((state.into_arena(), block))
    }

    /// Parse a single extended attribute, keeping a trailing `,` as its
    /// separator when present.
    pub fn ext_attr_with_separator(
        arena: NodeArena,
        text: &str,
    ) -> Result<(NodeArena, NodeIndex), SyntaxError> {
        let mut state = ParserState::fragment(text, arena)?;
        let attr = state
            .parse_extended_attribute()?
            .ok_or_else(|| state.error("Expected an extended attribute"))?;
        let separator = state.consume_one(TokenKind::Comma);
        state.arena[attr].data.set_separator(separator);
        Ok((state.into_arena(), attr))
    }

    /// Parse a `constructor(…);` member.
    pub fn constructor(
        arena: NodeArena,
        text: &str,
    ) -> Result<(NodeArena, NodeIndex), SyntaxError> {
        let mut state = ParserState::fragment(text, arena)?;
        let member = state
            .parse_constructor()?
            .ok_or_else(|| state.error("Expected a constructor"))?;
        Ok((state.into_arena(), member))
    }

    /// Parse a `= value` default.
    pub fn default_value(
        arena: NodeArena,
        text: &str,
    ) -> Result<(NodeArena, NodeIndex), SyntaxError> {
        let mut state = ParserState::fragment(text, arena)?;
        let default = state
            .parse_default()?
            .ok_or_else(|| state.error("Expected a default value"))?;
        Ok((state.into_arena(), default))
    }
}
