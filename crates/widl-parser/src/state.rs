//! Parser state - the token cursor and shared parsing machinery.
//!
//! Every production either returns a node (having consumed its tokens) or
//! returns `None` having consumed nothing; committed productions raise a
//! `SyntaxError` instead of returning `None`. Backtracking is explicit:
//! speculative productions save the cursor on entry and `unconsume` back to
//! it before giving up.

use crate::arena::{NodeArena, NodeIndex};
use tracing::trace;
use widl_common::limits::MAX_PARSER_RECURSION_DEPTH;
use widl_common::ParseOptions;
use widl_scanner::error::{render_error, ConstructName, ErrorKind};
use widl_scanner::{tokenize, SyntaxError, Token, TokenKind};

pub(crate) type ParseResult<T> = Result<T, SyntaxError>;

/// The named definition currently being parsed, for error headers
/// (`Syntax error at line 3, since \`interface Foo\`: …`).
#[derive(Clone, Debug)]
pub(crate) struct CurrentDefinition {
    pub construct: &'static str,
    pub name: String,
    pub partial: bool,
}

/// Recursive-descent parser over a pre-tokenized stream.
pub struct ParserState {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    input: String,
    source_name: Option<String>,
    pub arena: NodeArena,
    pub(crate) current: Option<CurrentDefinition>,
    depth: u32,
}

impl ParserState {
    /// Tokenize `input` and set the cursor at the first token.
    pub fn new(input: &str, options: &ParseOptions) -> Result<ParserState, SyntaxError> {
        let tokens = tokenize(input, options.source_name.as_deref())?;
        Ok(ParserState {
            tokens,
            position: 0,
            input: input.to_string(),
            source_name: options.source_name.clone(),
            arena: NodeArena::new(),
            current: None,
            depth: 0,
        })
    }

    /// Parser for a short synthesized fragment, building nodes into an
    /// existing arena so autofixes can splice into the tree they repair.
    pub fn fragment(input: &str, arena: NodeArena) -> Result<ParserState, SyntaxError> {
        let tokens = tokenize(input, None)?;
        Ok(ParserState {
            tokens,
            position: 0,
            input: input.to_string(),
            source_name: None,
            arena,
            current: None,
            depth: 0,
        })
    }

    #[must_use]
    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    #[must_use]
    pub fn token_vector(&self) -> &[Token] {
        &self.tokens
    }

    // =========================================================================
    // Cursor primitives
    // =========================================================================

    /// True iff the current token has the given kind; consumes nothing.
    pub(crate) fn probe(&self, kind: TokenKind) -> bool {
        self.tokens
            .get(self.position)
            .is_some_and(|t| t.kind == kind)
    }

    /// Consume and return the current token if its kind is one of `candidates`.
    pub(crate) fn consume(&mut self, candidates: &[TokenKind]) -> Option<Token> {
        let token = self.tokens.get(self.position)?;
        if candidates.contains(&token.kind) {
            let token = token.clone();
            self.position += 1;
            Some(token)
        } else {
            None
        }
    }

    pub(crate) fn consume_one(&mut self, kind: TokenKind) -> Option<Token> {
        self.consume(&[kind])
    }

    /// Consume the current token if its kind satisfies `predicate`.
    pub(crate) fn consume_matching(
        &mut self,
        predicate: impl Fn(TokenKind) -> bool,
    ) -> Option<Token> {
        let token = self.tokens.get(self.position)?;
        if predicate(token.kind) {
            let token = token.clone();
            self.position += 1;
            Some(token)
        } else {
            None
        }
    }

    /// Rewind the cursor to a previously saved position.
    pub(crate) fn unconsume(&mut self, position: usize) {
        self.position = position;
    }

    /// A syntax error bound to the current cursor position.
    pub(crate) fn error(&self, message: &str) -> SyntaxError {
        self.error_at(self.position, message)
    }

    /// A syntax error bound to an arbitrary token position.
    pub(crate) fn error_at(&self, position: usize, message: &str) -> SyntaxError {
        let current = self.current.as_ref().map(|c| ConstructName {
            construct: c.construct,
            name: &c.name,
            partial: c.partial,
        });
        let rendered = render_error(
            &self.tokens,
            position,
            ErrorKind::Syntax,
            self.source_name.as_deref(),
            current,
            message,
        );
        SyntaxError {
            message: rendered.message,
            bare_message: message.to_string(),
            context: rendered.context,
            line: rendered.line,
            source_name: self.source_name.clone(),
            input: self.input.clone(),
            tokens: self.tokens.clone(),
        }
    }

    pub(crate) fn enter_recursion(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_PARSER_RECURSION_DEPTH {
            return Err(self.error("Maximum parse depth exceeded"));
        }
        Ok(())
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.depth -= 1;
    }

    // =========================================================================
    // List combinator
    // =========================================================================

    /// Parse a comma-separated list. The separator token lands on the item
    /// it follows. A comma with no item after it is an error unless
    /// `allow_dangler` is set.
    pub(crate) fn parse_list<F>(
        &mut self,
        allow_dangler: bool,
        list_name: &str,
        mut parser: F,
    ) -> ParseResult<Vec<NodeIndex>>
    where
        F: FnMut(&mut ParserState) -> ParseResult<Option<NodeIndex>>,
    {
        let mut items = Vec::new();
        let Some(first) = parser(self)? else {
            return Ok(items);
        };
        let separator = self.consume_one(TokenKind::Comma);
        let mut more = separator.is_some();
        self.arena[first].data.set_separator(separator);
        items.push(first);
        while more {
            match parser(self)? {
                Some(item) => {
                    let separator = self.consume_one(TokenKind::Comma);
                    more = separator.is_some();
                    self.arena[item].data.set_separator(separator);
                    items.push(item);
                }
                None => {
                    if !allow_dangler {
                        return Err(self.error(&format!("Trailing comma in {list_name}")));
                    }
                    break;
                }
            }
        }
        Ok(items)
    }

    // =========================================================================
    // Top level
    // =========================================================================

    /// Parse the whole stream: a sequence of definitions, then `eof`.
    pub fn parse_definitions(&mut self) -> ParseResult<(Vec<NodeIndex>, Token)> {
        let mut definitions = Vec::new();
        loop {
            let ext_attrs = self.parse_extended_attributes()?;
            if self.probe(TokenKind::Eof) {
                if ext_attrs.is_some() {
                    return Err(self.error("Stray extended attributes"));
                }
                break;
            }
            let Some(definition) = self.parse_definition()? else {
                return Err(self.error("Unrecognised tokens"));
            };
            if let Some(ext_attrs) = ext_attrs {
                self.arena.set_ext_attrs(definition, ext_attrs);
            }
            trace!(
                kind = self.arena[definition].data.kind_str(),
                "parsed definition"
            );
            definitions.push(definition);
        }
        let eof = self
            .consume_one(TokenKind::Eof)
            .ok_or_else(|| self.error("Expected end of input"))?;
        Ok((definitions, eof))
    }
}
