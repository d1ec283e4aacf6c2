//! Parser state - type productions.

use crate::arena::NodeIndex;
use crate::node::{NodeData, TypeData, TypeTokens};
use crate::state::{ParseResult, ParserState};
use widl_scanner::{token_is_string_type, token_is_type_name_keyword, TokenKind};

/// Generic type constructors.
const GENERIC_KINDS: &[TokenKind] = &[
    TokenKind::FrozenArray,
    TokenKind::Promise,
    TokenKind::Sequence,
    TokenKind::Record,
];

impl ParserState {
    /// Extended attributes, then a single or union type.
    pub(crate) fn parse_type_with_ext_attrs(&mut self) -> ParseResult<Option<NodeIndex>> {
        let ext_attrs = self.parse_extended_attributes()?;
        let Some(idl_type) = self.parse_type()? else {
            return Ok(None);
        };
        if let Some(ext_attrs) = ext_attrs {
            self.arena.set_ext_attrs(idl_type, ext_attrs);
        }
        Ok(Some(idl_type))
    }

    pub(crate) fn parse_type(&mut self) -> ParseResult<Option<NodeIndex>> {
        self.enter_recursion()?;
        let result = match self.parse_single_type()? {
            Some(idl_type) => Ok(Some(idl_type)),
            None => self.parse_union_type(),
        };
        self.exit_recursion();
        result
    }

    /// A type usable as a return type: any type, or `void`.
    pub(crate) fn parse_return_type(&mut self) -> ParseResult<Option<NodeIndex>> {
        if let Some(idl_type) = self.parse_type()? {
            return Ok(Some(idl_type));
        }
        let Some(void) = self.consume_one(TokenKind::Void) else {
            return Ok(None);
        };
        Ok(Some(self.alloc_type(TypeTokens {
            base: Some(void),
            ..Default::default()
        })))
    }

    /// The restricted type of a `const`: primitive or identifier. Commits.
    pub(crate) fn parse_const_type(&mut self) -> ParseResult<NodeIndex> {
        if let Some(idl_type) = self.parse_primitive_type()? {
            return Ok(idl_type);
        }
        let base = self
            .consume_one(TokenKind::Identifier)
            .ok_or_else(|| self.error("Const lacks a type"))?;
        Ok(self.alloc_type(TypeTokens {
            base: Some(base),
            ..Default::default()
        }))
    }

    // =========================================================================
    // Single types
    // =========================================================================

    fn parse_single_type(&mut self) -> ParseResult<Option<NodeIndex>> {
        let mut idl_type = self.parse_generic_type()?;
        if idl_type.is_none() {
            idl_type = self.parse_primitive_type()?;
        }
        let idl_type = match idl_type {
            Some(idl_type) => idl_type,
            None => {
                let mut base = self.consume_one(TokenKind::Identifier);
                if base.is_none() {
                    base = self.consume_matching(|kind| {
                        token_is_string_type(kind) || token_is_type_name_keyword(kind)
                    });
                }
                let Some(base) = base else {
                    return Ok(None);
                };
                if self.probe(TokenKind::LessThan) {
                    return Err(self.error(&format!("Unsupported generic type {}", base.value)));
                }
                self.alloc_type(TypeTokens {
                    base: Some(base),
                    ..Default::default()
                })
            }
        };
        if let NodeData::Type(ty) = &self.arena[idl_type].data {
            if ty.generic() == Some("Promise") && self.probe(TokenKind::Question) {
                return Err(self.error("Promise type cannot be nullable"));
            }
        }
        self.parse_type_suffix(idl_type)?;
        Ok(Some(idl_type))
    }

    fn parse_generic_type(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(base) = self.consume(GENERIC_KINDS) else {
            return Ok(None);
        };
        let mut tokens = TypeTokens {
            base: Some(base.clone()),
            ..Default::default()
        };
        tokens.open = Some(
            self.consume_one(TokenKind::LessThan)
                .ok_or_else(|| self.error(&format!("No opening bracket after {}", base.value)))?,
        );
        let mut subtypes = Vec::new();
        match base.kind {
            TokenKind::Promise => {
                if self.probe(TokenKind::OpenBracket) {
                    return Err(self.error("Promise type cannot have extended attribute"));
                }
                let subtype = self
                    .parse_return_type()?
                    .ok_or_else(|| self.error("Missing Promise subtype"))?;
                subtypes.push(subtype);
            }
            TokenKind::Sequence | TokenKind::FrozenArray => {
                let subtype = self.parse_type_with_ext_attrs()?.ok_or_else(|| {
                    self.error(&format!("Missing type argument in {}<>", base.value))
                })?;
                subtypes.push(subtype);
            }
            TokenKind::Record => {
                if self.probe(TokenKind::OpenBracket) {
                    return Err(self.error("Record key cannot have extended attribute"));
                }
                let key = self
                    .consume(&[
                        TokenKind::ByteString,
                        TokenKind::DOMString,
                        TokenKind::USVString,
                    ])
                    .ok_or_else(|| {
                        self.error("Record key must be one of: ByteString, DOMString, USVString")
                    })?;
                let key_type = self.alloc_type(TypeTokens {
                    base: Some(key),
                    ..Default::default()
                });
                let separator = self
                    .consume_one(TokenKind::Comma)
                    .ok_or_else(|| self.error("Missing comma after record key type"))?;
                self.arena[key_type].data.set_separator(Some(separator));
                subtypes.push(key_type);
                let value = self
                    .parse_type_with_ext_attrs()?
                    .ok_or_else(|| self.error("Error parsing generic type record"))?;
                subtypes.push(value);
            }
            _ => return Err(self.error("Unsupported generic type")),
        }
        tokens.close = Some(
            self.consume_one(TokenKind::GreaterThan)
                .ok_or_else(|| self.error(&format!("Missing closing bracket after {}", base.value)))?,
        );
        Ok(Some(self.arena.alloc(NodeData::Type(TypeData {
            tokens,
            ext_attrs: None,
            subtypes,
            union: false,
        }))))
    }

    /// Integer and float forms. The `unsigned`/`unrestricted` prefixes
    /// commit: once consumed, the mandatory base must follow.
    fn parse_primitive_type(&mut self) -> ParseResult<Option<NodeIndex>> {
        let prefix = self.consume_one(TokenKind::Unsigned);
        let base = self.consume(&[TokenKind::Short, TokenKind::Long]);
        if let Some(base) = base {
            let postfix = self.consume_one(TokenKind::Long);
            return Ok(Some(self.alloc_type(TypeTokens {
                prefix,
                base: Some(base),
                postfix,
                ..Default::default()
            })));
        }
        if prefix.is_some() {
            return Err(self.error("Failed to parse integer type"));
        }
        let prefix = self.consume_one(TokenKind::Unrestricted);
        let base = self.consume(&[TokenKind::Float, TokenKind::Double]);
        if let Some(base) = base {
            return Ok(Some(self.alloc_type(TypeTokens {
                prefix,
                base: Some(base),
                ..Default::default()
            })));
        }
        if prefix.is_some() {
            return Err(self.error("Failed to parse float type"));
        }
        if let Some(base) = self.consume(&[TokenKind::Boolean, TokenKind::Byte, TokenKind::Octet]) {
            return Ok(Some(self.alloc_type(TypeTokens {
                base: Some(base),
                ..Default::default()
            })));
        }
        Ok(None)
    }

    // =========================================================================
    // Union types
    // =========================================================================

    fn parse_union_type(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(open) = self.consume_one(TokenKind::OpenParen) else {
            return Ok(None);
        };
        let mut tokens = TypeTokens {
            open: Some(open),
            ..Default::default()
        };
        let mut subtypes = Vec::new();
        loop {
            let subtype = self
                .parse_type_with_ext_attrs()?
                .ok_or_else(|| self.error("No type after open parenthesis or 'or' in union type"))?;
            if let NodeData::Type(ty) = &self.arena[subtype].data {
                if ty.idl_type_name().as_deref() == Some("any") {
                    return Err(self.error("Type `any` cannot be included in a union type"));
                }
                if ty.generic() == Some("Promise") {
                    return Err(self.error("Type `Promise` cannot be included in a union type"));
                }
            }
            subtypes.push(subtype);
            let or = self.consume_one(TokenKind::Or);
            let done = or.is_none();
            self.arena[subtype].data.set_separator(or);
            if done {
                break;
            }
        }
        if subtypes.len() < 2 {
            return Err(self.error("At least two types are expected in a union type but found less"));
        }
        tokens.close = Some(
            self.consume_one(TokenKind::CloseParen)
                .ok_or_else(|| self.error("Unterminated union type"))?,
        );
        let union = self.arena.alloc(NodeData::Type(TypeData {
            tokens,
            ext_attrs: None,
            subtypes,
            union: true,
        }));
        self.parse_type_suffix(union)?;
        Ok(Some(union))
    }

    /// `?` suffix; at most one.
    fn parse_type_suffix(&mut self, idl_type: NodeIndex) -> ParseResult<()> {
        if let Some(nullable) = self.consume_one(TokenKind::Question) {
            if let NodeData::Type(ty) = &mut self.arena[idl_type].data {
                ty.tokens.nullable = Some(nullable);
            }
        }
        if self.probe(TokenKind::Question) {
            return Err(self.error("Can't nullable more than once"));
        }
        Ok(())
    }

    fn alloc_type(&mut self, tokens: TypeTokens) -> NodeIndex {
        self.arena.alloc(NodeData::Type(TypeData {
            tokens,
            ext_attrs: None,
            subtypes: Vec::new(),
            union: false,
        }))
    }
}
