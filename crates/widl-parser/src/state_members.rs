//! Parser state - member productions, arguments, defaults, and extended
//! attributes.

use crate::arena::NodeIndex;
use crate::node::{
    ArgumentData, ArgumentTokens, AttributeData, AttributeTokens, ConstantData, ConstantTokens,
    ConstructorData, ConstructorTokens, DefaultData, DefaultTokens, ExtendedAttributeData,
    ExtendedAttributeTokens, ExtendedAttributesData, ExtendedAttributesTokens, FieldData,
    FieldTokens, IterableLikeData, IterableLikeTokens, NodeData, OperationData, OperationTokens,
    WrappedTokenData, WrappedTokenTokens,
};
use crate::state::{ParseResult, ParserState};
use widl_scanner::{token_is_argument_name_keyword, Token, TokenKind};

/// Token kinds allowed as a const value.
const CONST_VALUE_KINDS: &[TokenKind] = &[
    TokenKind::True,
    TokenKind::False,
    TokenKind::Infinity,
    TokenKind::NegativeInfinity,
    TokenKind::NaN,
    TokenKind::Decimal,
    TokenKind::Integer,
];

/// Token kinds allowed after `=` in a default: const values plus strings,
/// `null`, and the empty `[]` / `{}` forms.
const DEFAULT_VALUE_KINDS: &[TokenKind] = &[
    TokenKind::True,
    TokenKind::False,
    TokenKind::Infinity,
    TokenKind::NegativeInfinity,
    TokenKind::NaN,
    TokenKind::Decimal,
    TokenKind::Integer,
    TokenKind::String,
    TokenKind::Null,
    TokenKind::OpenBracket,
    TokenKind::OpenBrace,
];

/// Token kinds an extended-attribute right-hand side may consist of.
const EXT_ATTR_RHS_KINDS: &[TokenKind] = &[
    TokenKind::Identifier,
    TokenKind::Decimal,
    TokenKind::Integer,
    TokenKind::String,
];

impl ParserState {
    // =========================================================================
    // Constants and constructors
    // =========================================================================

    pub(crate) fn parse_constant(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(base) = self.consume_one(TokenKind::Const) else {
            return Ok(None);
        };
        let mut tokens = ConstantTokens {
            base: Some(base),
            ..Default::default()
        };
        let idl_type = self.parse_const_type()?;
        if self.probe(TokenKind::Question) {
            return Err(self.error("Unexpected nullable constant type"));
        }
        tokens.name = Some(
            self.consume_one(TokenKind::Identifier)
                .ok_or_else(|| self.error("Const lacks a name"))?,
        );
        tokens.assign = Some(
            self.consume_one(TokenKind::Equals)
                .ok_or_else(|| self.error("Const lacks value assignment"))?,
        );
        tokens.value = Some(
            self.consume(CONST_VALUE_KINDS)
                .ok_or_else(|| self.error("Const lacks a value"))?,
        );
        tokens.termination = Some(
            self.consume_one(TokenKind::Semicolon)
                .ok_or_else(|| self.error("Unterminated const, expected ';'"))?,
        );
        Ok(Some(self.arena.alloc(NodeData::Constant(ConstantData {
            tokens,
            ext_attrs: None,
            idl_type: Some(idl_type),
        }))))
    }

    pub(crate) fn parse_constructor(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(base) = self.consume_one(TokenKind::Constructor) else {
            return Ok(None);
        };
        let mut tokens = ConstructorTokens {
            base: Some(base),
            ..Default::default()
        };
        tokens.open = Some(
            self.consume_one(TokenKind::OpenParen)
                .ok_or_else(|| self.error("No argument list in constructor"))?,
        );
        let arguments = self.parse_argument_list()?;
        tokens.close = Some(
            self.consume_one(TokenKind::CloseParen)
                .ok_or_else(|| self.error("Unterminated constructor"))?,
        );
        tokens.termination = Some(
            self.consume_one(TokenKind::Semicolon)
                .ok_or_else(|| self.error("No semicolon after constructor"))?,
        );
        Ok(Some(self.arena.alloc(NodeData::Constructor(
            ConstructorData {
                tokens,
                ext_attrs: None,
                arguments,
            },
        ))))
    }

    // =========================================================================
    // Special-prefixed members
    // =========================================================================

    pub(crate) fn parse_static_member(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(special) = self.consume_one(TokenKind::Static) else {
            return Ok(None);
        };
        if let Some(member) = self.parse_attribute(Some(special.clone()), false, false)? {
            return Ok(Some(member));
        }
        if let Some(member) = self.parse_operation(Some(special), false)? {
            return Ok(Some(member));
        }
        Err(self.error("No body in static member"))
    }

    pub(crate) fn parse_stringifier_member(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(special) = self.consume_one(TokenKind::Stringifier) else {
            return Ok(None);
        };
        if let Some(member) = self.parse_attribute(Some(special.clone()), false, false)? {
            return Ok(Some(member));
        }
        if let Some(member) = self.parse_operation(Some(special), true)? {
            return Ok(Some(member));
        }
        Err(self.error("Unterminated stringifier"))
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Parse an attribute. With no `special` supplied and `no_inherit`
    /// unset, an `inherit` prefix is attempted; `readonly` demands the
    /// read-only form (namespaces).
    pub(crate) fn parse_attribute(
        &mut self,
        special: Option<Token>,
        no_inherit: bool,
        readonly: bool,
    ) -> ParseResult<Option<NodeIndex>> {
        let start = self.position;
        let mut tokens = AttributeTokens {
            special,
            ..Default::default()
        };
        if tokens.special.is_none() && !no_inherit {
            tokens.special = self.consume_one(TokenKind::Inherit);
        }
        let inherited = tokens
            .special
            .as_ref()
            .is_some_and(|t| t.kind == TokenKind::Inherit);
        if inherited && self.probe(TokenKind::Readonly) {
            return Err(self.error("Inherited attributes cannot be read-only"));
        }
        tokens.readonly = self.consume_one(TokenKind::Readonly);
        if readonly && tokens.readonly.is_none() && self.probe(TokenKind::Attribute) {
            return Err(self.error("Attributes must be readonly in this context"));
        }
        let Some(base) = self.consume_one(TokenKind::Attribute) else {
            self.unconsume(start);
            return Ok(None);
        };
        tokens.base = Some(base);
        let idl_type = self
            .parse_type_with_ext_attrs()?
            .ok_or_else(|| self.error("Attribute lacks a type"))?;
        if let NodeData::Type(ty) = &self.arena[idl_type].data {
            let generic_base = ty.tokens.base.clone();
            match ty.generic() {
                Some("sequence") => {
                    return Err(self.generic_attribute_error(generic_base, "sequence"));
                }
                Some("record") => {
                    return Err(self.generic_attribute_error(generic_base, "record"));
                }
                _ => {}
            }
        }
        tokens.name = Some(
            self.consume_one(TokenKind::Identifier)
                .or_else(|| self.consume(&[TokenKind::Async, TokenKind::Required]))
                .ok_or_else(|| self.error("Attribute lacks a name"))?,
        );
        tokens.termination = Some(
            self.consume_one(TokenKind::Semicolon)
                .ok_or_else(|| self.error("Unterminated attribute, expected ';'"))?,
        );
        Ok(Some(self.arena.alloc(NodeData::Attribute(AttributeData {
            tokens,
            ext_attrs: None,
            idl_type: Some(idl_type),
        }))))
    }

    /// The sequence/record rejection is bound to the generic's own token.
    fn generic_attribute_error(
        &self,
        base: Option<Token>,
        generic: &str,
    ) -> widl_scanner::SyntaxError {
        let message = format!("Attributes cannot accept {generic} types");
        match base {
            Some(token) => self.error_at(token.index as usize, &message),
            None => self.error(&message),
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Parse an operation. A `stringifier` special with an immediate `;`
    /// yields the bare-stringifier short form; `regular` forbids the
    /// getter/setter/deleter specials.
    pub(crate) fn parse_operation(
        &mut self,
        special: Option<Token>,
        regular: bool,
    ) -> ParseResult<Option<NodeIndex>> {
        let mut tokens = OperationTokens {
            special,
            ..Default::default()
        };
        let stringifier = tokens
            .special
            .as_ref()
            .is_some_and(|t| t.kind == TokenKind::Stringifier);
        if stringifier {
            if let Some(termination) = self.consume_one(TokenKind::Semicolon) {
                tokens.termination = Some(termination);
                return Ok(Some(self.arena.alloc(NodeData::Operation(OperationData {
                    tokens,
                    ext_attrs: None,
                    idl_type: None,
                    arguments: Vec::new(),
                }))));
            }
        }
        if tokens.special.is_none() && !regular {
            tokens.special = self.consume(&[
                TokenKind::Getter,
                TokenKind::Setter,
                TokenKind::Deleter,
            ]);
        }
        let idl_type = self
            .parse_return_type()?
            .ok_or_else(|| self.error("Missing return type"))?;
        tokens.name = self
            .consume_one(TokenKind::Identifier)
            .or_else(|| self.consume_one(TokenKind::Includes));
        tokens.open = Some(
            self.consume_one(TokenKind::OpenParen)
                .ok_or_else(|| self.error("Invalid operation"))?,
        );
        let arguments = self.parse_argument_list()?;
        tokens.close = Some(
            self.consume_one(TokenKind::CloseParen)
                .ok_or_else(|| self.error("Unterminated operation"))?,
        );
        tokens.termination = Some(
            self.consume_one(TokenKind::Semicolon)
                .ok_or_else(|| self.error("Unterminated operation, expected ';'"))?,
        );
        Ok(Some(self.arena.alloc(NodeData::Operation(OperationData {
            tokens,
            ext_attrs: None,
            idl_type: Some(idl_type),
            arguments,
        }))))
    }

    // =========================================================================
    // Iterable-likes
    // =========================================================================

    pub(crate) fn parse_iterable_like(&mut self) -> ParseResult<Option<NodeIndex>> {
        let start = self.position;
        let mut tokens = IterableLikeTokens::default();
        tokens.readonly = self.consume_one(TokenKind::Readonly);
        if tokens.readonly.is_none() {
            tokens.r#async = self.consume_one(TokenKind::Async);
        }
        tokens.base = if tokens.readonly.is_some() {
            self.consume(&[TokenKind::Maplike, TokenKind::Setlike])
        } else if tokens.r#async.is_some() {
            self.consume_one(TokenKind::Iterable)
        } else {
            self.consume(&[
                TokenKind::Iterable,
                TokenKind::Maplike,
                TokenKind::Setlike,
            ])
        };
        let Some(base) = tokens.base.clone() else {
            self.unconsume(start);
            return Ok(None);
        };
        let construct = match base.kind {
            TokenKind::Maplike => "maplike",
            TokenKind::Setlike => "setlike",
            _ => "iterable",
        };
        let second_required = base.kind == TokenKind::Maplike;
        let second_allowed = second_required || base.kind == TokenKind::Iterable;
        let argument_allowed = tokens.r#async.is_some() && base.kind == TokenKind::Iterable;
        tokens.open = Some(self.consume_one(TokenKind::LessThan).ok_or_else(|| {
            self.error(&format!("Missing less-than sign `<` in {construct} declaration"))
        })?);
        let first = self.parse_type_with_ext_attrs()?.ok_or_else(|| {
            self.error(&format!("Missing a type argument in {construct} declaration"))
        })?;
        let mut idl_types = vec![first];
        if second_allowed {
            let separator = self.consume_one(TokenKind::Comma);
            if separator.is_some() {
                self.arena[first].data.set_separator(separator);
                let second = self.parse_type_with_ext_attrs()?.ok_or_else(|| {
                    self.error(&format!(
                        "Missing second type argument in {construct} declaration"
                    ))
                })?;
                idl_types.push(second);
            } else if second_required {
                return Err(self.error(&format!(
                    "Missing second type argument in {construct} declaration"
                )));
            }
        }
        tokens.close = Some(self.consume_one(TokenKind::GreaterThan).ok_or_else(|| {
            self.error(&format!(
                "Missing greater-than sign `>` in {construct} declaration"
            ))
        })?);
        let mut arguments = Vec::new();
        if self.probe(TokenKind::OpenParen) {
            if !argument_allowed {
                return Err(self.error("Arguments are only allowed for `async iterable`"));
            }
            tokens.args_open = self.consume_one(TokenKind::OpenParen);
            arguments = self.parse_argument_list()?;
            tokens.args_close = Some(
                self.consume_one(TokenKind::CloseParen)
                    .ok_or_else(|| self.error("Unterminated async iterable argument list"))?,
            );
        }
        tokens.termination = Some(self.consume_one(TokenKind::Semicolon).ok_or_else(|| {
            self.error(&format!("Missing semicolon after {construct} declaration"))
        })?);
        Ok(Some(self.arena.alloc(NodeData::IterableLike(
            IterableLikeData {
                tokens,
                ext_attrs: None,
                idl_types,
                arguments,
            },
        ))))
    }

    // =========================================================================
    // Dictionary fields
    // =========================================================================

    pub(crate) fn parse_field(&mut self) -> ParseResult<Option<NodeIndex>> {
        let mut tokens = FieldTokens::default();
        tokens.required = self.consume_one(TokenKind::Required);
        let idl_type = self
            .parse_type_with_ext_attrs()?
            .ok_or_else(|| self.error("Dictionary member lacks a type"))?;
        tokens.name = Some(
            self.consume_one(TokenKind::Identifier)
                .ok_or_else(|| self.error("Dictionary member lacks a name"))?,
        );
        let default = self.parse_default()?;
        if tokens.required.is_some() && default.is_some() {
            return Err(self.error("Required member must not have a default"));
        }
        tokens.termination = Some(
            self.consume_one(TokenKind::Semicolon)
                .ok_or_else(|| self.error("Unterminated dictionary member, expected ';'"))?,
        );
        Ok(Some(self.arena.alloc(NodeData::Field(FieldData {
            tokens,
            ext_attrs: None,
            idl_type: Some(idl_type),
            default,
        }))))
    }

    // =========================================================================
    // Arguments and defaults
    // =========================================================================

    pub(crate) fn parse_argument_list(&mut self) -> ParseResult<Vec<NodeIndex>> {
        self.parse_list(false, "arguments list", |state| state.parse_argument())
    }

    fn parse_argument(&mut self) -> ParseResult<Option<NodeIndex>> {
        let start = self.position;
        let ext_attrs = self.parse_extended_attributes()?;
        let mut tokens = ArgumentTokens::default();
        tokens.optional = self.consume_one(TokenKind::Optional);
        let Some(idl_type) = self.parse_type_with_ext_attrs()? else {
            self.unconsume(start);
            return Ok(None);
        };
        if tokens.optional.is_none() {
            tokens.variadic = self.consume_one(TokenKind::Ellipsis);
        }
        let mut name = self.consume_one(TokenKind::Identifier);
        if name.is_none() {
            name = self.consume_matching(token_is_argument_name_keyword);
        }
        let Some(name) = name else {
            self.unconsume(start);
            return Ok(None);
        };
        tokens.name = Some(name);
        let default = if tokens.optional.is_some() {
            self.parse_default()?
        } else {
            None
        };
        Ok(Some(self.arena.alloc(NodeData::Argument(ArgumentData {
            tokens,
            ext_attrs,
            idl_type: Some(idl_type),
            default,
        }))))
    }

    /// `= value`, or nothing.
    pub(crate) fn parse_default(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(assign) = self.consume_one(TokenKind::Equals) else {
            return Ok(None);
        };
        let value = self
            .consume(DEFAULT_VALUE_KINDS)
            .ok_or_else(|| self.error("No value for default"))?;
        let mut expression = vec![value.clone()];
        if value.kind == TokenKind::OpenBracket {
            let close = self
                .consume_one(TokenKind::CloseBracket)
                .ok_or_else(|| self.error("Default sequence value must be empty"))?;
            expression.push(close);
        } else if value.kind == TokenKind::OpenBrace {
            let close = self
                .consume_one(TokenKind::CloseBrace)
                .ok_or_else(|| self.error("Default dictionary value must be empty"))?;
            expression.push(close);
        }
        Ok(Some(self.arena.alloc(NodeData::Default(DefaultData {
            tokens: DefaultTokens {
                assign: Some(assign),
            },
            expression,
        }))))
    }

    // =========================================================================
    // Extended attributes
    // =========================================================================

    /// `[A, B=C, …]`, or `None` when no block is present.
    pub(crate) fn parse_extended_attributes(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(open) = self.consume_one(TokenKind::OpenBracket) else {
            return Ok(None);
        };
        let items = self.parse_list(false, "extended attribute", |state| {
            state.parse_extended_attribute()
        })?;
        let close = self
            .consume_one(TokenKind::CloseBracket)
            .ok_or_else(|| self.error("Unexpected closing token of extended attribute"))?;
        if items.is_empty() {
            return Err(self.error("Found an empty extended attribute"));
        }
        Ok(Some(self.arena.alloc(NodeData::ExtendedAttributes(
            ExtendedAttributesData {
                tokens: ExtendedAttributesTokens {
                    open: Some(open),
                    close: Some(close),
                },
                items,
            },
        ))))
    }

    /// One attribute: a name, then optionally `=` with a single value, a
    /// parenthesized value list, or a parenthesized argument list.
    pub(crate) fn parse_extended_attribute(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(name) = self.consume_one(TokenKind::Identifier) else {
            return Ok(None);
        };
        let mut tokens = ExtendedAttributeTokens {
            name: Some(name),
            ..Default::default()
        };
        let mut rhs_list = Vec::new();
        let mut arguments = Vec::new();
        tokens.assign = self.consume_one(TokenKind::Equals);
        if tokens.assign.is_some() {
            tokens.secondary_name = self.consume(EXT_ATTR_RHS_KINDS);
        }
        tokens.open = self.consume_one(TokenKind::OpenParen);
        if tokens.open.is_some() {
            if tokens.assign.is_some() && tokens.secondary_name.is_none() {
                rhs_list = self.parse_list(false, "extended attribute argument", |state| {
                    state.parse_wrapped_token()
                })?;
            } else {
                arguments = self.parse_argument_list()?;
            }
            tokens.close = Some(
                self.consume_one(TokenKind::CloseParen)
                    .ok_or_else(|| self.error("Unexpected token in extended attribute argument list"))?,
            );
        } else if tokens.assign.is_some() && tokens.secondary_name.is_none() {
            return Err(self.error("No right hand side to extended attribute assignment"));
        }
        Ok(Some(self.arena.alloc(NodeData::ExtendedAttribute(
            ExtendedAttributeData {
                tokens,
                rhs_list,
                arguments,
            },
        ))))
    }

    fn parse_wrapped_token(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(value) = self.consume(EXT_ATTR_RHS_KINDS) else {
            return Ok(None);
        };
        Ok(Some(self.arena.alloc(NodeData::WrappedToken(
            WrappedTokenData {
                tokens: WrappedTokenTokens {
                    value: Some(value),
                    separator: None,
                },
            },
        ))))
    }
}
