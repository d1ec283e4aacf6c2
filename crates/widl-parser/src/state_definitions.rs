//! Parser state - top-level definition productions and the container body.

use crate::arena::NodeIndex;
use crate::node::{
    CallbackFunctionData, CallbackFunctionTokens, ContainerData, ContainerTokens, EnumData,
    EnumTokens, EnumValueData, EnumValueTokens, IncludesData, IncludesTokens, NodeData,
    TypedefData, TypedefTokens,
};
use crate::state::{CurrentDefinition, ParseResult, ParserState};
use widl_common::text::unescape;
use widl_scanner::{Token, TokenKind};

/// One entry in a container's ordered member-parser list.
///
/// Order matters: attribute is attempted before operation because an
/// operation attempt consumes an identifier as its return type and commits.
#[derive(Clone, Copy, Debug)]
pub(crate) enum MemberParser {
    Constant,
    Constructor,
    Static,
    Stringifier,
    IterableLike,
    Attribute { no_inherit: bool, readonly: bool },
    Operation { regular: bool },
    Field,
}

const INTERFACE_MEMBERS: &[MemberParser] = &[
    MemberParser::Constant,
    MemberParser::Constructor,
    MemberParser::Static,
    MemberParser::Stringifier,
    MemberParser::IterableLike,
    MemberParser::Attribute {
        no_inherit: false,
        readonly: false,
    },
    MemberParser::Operation { regular: false },
];

const MIXIN_MEMBERS: &[MemberParser] = &[
    MemberParser::Constant,
    MemberParser::Stringifier,
    MemberParser::Attribute {
        no_inherit: true,
        readonly: false,
    },
    MemberParser::Operation { regular: true },
];

const CALLBACK_INTERFACE_MEMBERS: &[MemberParser] = &[
    MemberParser::Constant,
    MemberParser::Operation { regular: true },
];

const DICTIONARY_MEMBERS: &[MemberParser] = &[MemberParser::Field];

const NAMESPACE_MEMBERS: &[MemberParser] = &[
    MemberParser::Attribute {
        no_inherit: true,
        readonly: true,
    },
    MemberParser::Constant,
    MemberParser::Operation { regular: true },
];

impl ParserState {
    /// Try each top-level production in order.
    pub(crate) fn parse_definition(&mut self) -> ParseResult<Option<NodeIndex>> {
        if let Some(def) = self.parse_callback()? {
            return Ok(Some(def));
        }
        if let Some(def) = self.parse_interface_like(None)? {
            return Ok(Some(def));
        }
        if let Some(def) = self.parse_partial()? {
            return Ok(Some(def));
        }
        if let Some(def) = self.parse_dictionary(None)? {
            return Ok(Some(def));
        }
        if let Some(def) = self.parse_enum()? {
            return Ok(Some(def));
        }
        if let Some(def) = self.parse_typedef()? {
            return Ok(Some(def));
        }
        if let Some(def) = self.parse_includes()? {
            return Ok(Some(def));
        }
        self.parse_namespace(None)
    }

    // =========================================================================
    // Callbacks
    // =========================================================================

    fn parse_callback(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(callback) = self.consume_one(TokenKind::Callback) else {
            return Ok(None);
        };
        if self.probe(TokenKind::Interface) {
            return self.parse_callback_interface(callback).map(Some);
        }
        self.parse_callback_function(callback).map(Some)
    }

    fn parse_callback_interface(&mut self, callback: Token) -> ParseResult<NodeIndex> {
        let base = self
            .consume_one(TokenKind::Interface)
            .ok_or_else(|| self.error("Callback interface lacks the interface keyword"))?;
        let tokens = ContainerTokens {
            callback: Some(callback),
            base: Some(base),
            ..Default::default()
        };
        self.parse_container(
            tokens,
            "callback interface",
            true,
            CALLBACK_INTERFACE_MEMBERS,
            NodeData::CallbackInterface,
        )
    }

    fn parse_callback_function(&mut self, base: Token) -> ParseResult<NodeIndex> {
        let mut tokens = CallbackFunctionTokens {
            base: Some(base),
            ..Default::default()
        };
        let name = self
            .consume_one(TokenKind::Identifier)
            .ok_or_else(|| self.error("Callback lacks a name"))?;
        self.current = Some(CurrentDefinition {
            construct: "callback",
            name: unescape(&name.value).to_string(),
            partial: false,
        });
        tokens.name = Some(name);
        tokens.assign = Some(
            self.consume_one(TokenKind::Equals)
                .ok_or_else(|| self.error("Callback lacks an assignment"))?,
        );
        let idl_type = self
            .parse_return_type()?
            .ok_or_else(|| self.error("Callback lacks a return type"))?;
        tokens.open = Some(
            self.consume_one(TokenKind::OpenParen)
                .ok_or_else(|| self.error("Callback lacks parentheses for arguments"))?,
        );
        let arguments = self.parse_argument_list()?;
        tokens.close = Some(
            self.consume_one(TokenKind::CloseParen)
                .ok_or_else(|| self.error("Unterminated callback"))?,
        );
        tokens.termination = Some(
            self.consume_one(TokenKind::Semicolon)
                .ok_or_else(|| self.error("Unterminated callback, expected ';'"))?,
        );
        Ok(self.arena.alloc(NodeData::CallbackFunction(
            CallbackFunctionData {
                tokens,
                ext_attrs: None,
                idl_type: Some(idl_type),
                arguments,
            },
        )))
    }

    // =========================================================================
    // Interfaces and mixins
    // =========================================================================

    fn parse_interface_like(
        &mut self,
        partial: Option<Token>,
    ) -> ParseResult<Option<NodeIndex>> {
        let Some(base) = self.consume_one(TokenKind::Interface) else {
            return Ok(None);
        };
        if let Some(mixin) = self.parse_mixin(&base, &partial)? {
            return Ok(Some(mixin));
        }
        let inheritable = partial.is_none();
        let tokens = ContainerTokens {
            partial,
            base: Some(base),
            ..Default::default()
        };
        self.parse_container(
            tokens,
            "interface",
            inheritable,
            INTERFACE_MEMBERS,
            NodeData::Interface,
        )
        .map(Some)
    }

    fn parse_mixin(
        &mut self,
        base: &Token,
        partial: &Option<Token>,
    ) -> ParseResult<Option<NodeIndex>> {
        let Some(mixin) = self.consume_one(TokenKind::Mixin) else {
            return Ok(None);
        };
        let tokens = ContainerTokens {
            partial: partial.clone(),
            base: Some(base.clone()),
            mixin: Some(mixin),
            ..Default::default()
        };
        self.parse_container(
            tokens,
            "interface mixin",
            false,
            MIXIN_MEMBERS,
            NodeData::Mixin,
        )
        .map(Some)
    }

    // =========================================================================
    // Partials, dictionaries, namespaces
    // =========================================================================

    fn parse_partial(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(partial) = self.consume_one(TokenKind::Partial) else {
            return Ok(None);
        };
        if let Some(def) = self.parse_dictionary(Some(partial.clone()))? {
            return Ok(Some(def));
        }
        if let Some(def) = self.parse_interface_like(Some(partial.clone()))? {
            return Ok(Some(def));
        }
        if let Some(def) = self.parse_namespace(Some(partial))? {
            return Ok(Some(def));
        }
        Err(self.error("Partial doesn't apply to anything"))
    }

    fn parse_dictionary(&mut self, partial: Option<Token>) -> ParseResult<Option<NodeIndex>> {
        let Some(base) = self.consume_one(TokenKind::Dictionary) else {
            return Ok(None);
        };
        let inheritable = partial.is_none();
        let tokens = ContainerTokens {
            partial,
            base: Some(base),
            ..Default::default()
        };
        self.parse_container(
            tokens,
            "dictionary",
            inheritable,
            DICTIONARY_MEMBERS,
            NodeData::Dictionary,
        )
        .map(Some)
    }

    fn parse_namespace(&mut self, partial: Option<Token>) -> ParseResult<Option<NodeIndex>> {
        let Some(base) = self.consume_one(TokenKind::Namespace) else {
            return Ok(None);
        };
        let tokens = ContainerTokens {
            partial,
            base: Some(base),
            ..Default::default()
        };
        self.parse_container(
            tokens,
            "namespace",
            false,
            NAMESPACE_MEMBERS,
            NodeData::Namespace,
        )
        .map(Some)
    }

    /// Shared container parse: name, optional inheritance, then the body
    /// loop that tries each allowed member parser in order until `}`.
    fn parse_container(
        &mut self,
        mut tokens: ContainerTokens,
        construct: &'static str,
        inheritable: bool,
        allowed: &[MemberParser],
        make: fn(ContainerData) -> NodeData,
    ) -> ParseResult<NodeIndex> {
        let name = self
            .consume_one(TokenKind::Identifier)
            .ok_or_else(|| self.error(&format!("Missing name in {construct}")))?;
        self.current = Some(CurrentDefinition {
            construct,
            name: unescape(&name.value).to_string(),
            partial: tokens.partial.is_some(),
        });
        tokens.name = Some(name);
        if inheritable {
            if let Some(colon) = self.consume_one(TokenKind::Colon) {
                tokens.colon = Some(colon);
                tokens.inheritance = Some(
                    self.consume_one(TokenKind::Identifier)
                        .ok_or_else(|| self.error("Inheritance lacks a type"))?,
                );
            }
        }
        tokens.open = Some(
            self.consume_one(TokenKind::OpenBrace)
                .ok_or_else(|| self.error(&format!("Bodyless {construct}")))?,
        );
        let mut members = Vec::new();
        loop {
            if let Some(close) = self.consume_one(TokenKind::CloseBrace) {
                tokens.close = Some(close);
                tokens.termination = Some(
                    self.consume_one(TokenKind::Semicolon)
                        .ok_or_else(|| self.error(&format!("Missing semicolon after {construct}")))?,
                );
                break;
            }
            let ext_attrs = self.parse_extended_attributes()?;
            let member = self
                .parse_member(allowed)?
                .ok_or_else(|| self.error("Unknown member"))?;
            if let Some(ext_attrs) = ext_attrs {
                self.arena.set_ext_attrs(member, ext_attrs);
            }
            members.push(member);
        }
        Ok(self.arena.alloc(make(ContainerData {
            tokens,
            ext_attrs: None,
            members,
        })))
    }

    fn parse_member(&mut self, allowed: &[MemberParser]) -> ParseResult<Option<NodeIndex>> {
        for parser in allowed {
            let parsed = match *parser {
                MemberParser::Constant => self.parse_constant()?,
                MemberParser::Constructor => self.parse_constructor()?,
                MemberParser::Static => self.parse_static_member()?,
                MemberParser::Stringifier => self.parse_stringifier_member()?,
                MemberParser::IterableLike => self.parse_iterable_like()?,
                MemberParser::Attribute {
                    no_inherit,
                    readonly,
                } => self.parse_attribute(None, no_inherit, readonly)?,
                MemberParser::Operation { regular } => self.parse_operation(None, regular)?,
                MemberParser::Field => self.parse_field()?,
            };
            if parsed.is_some() {
                return Ok(parsed);
            }
        }
        Ok(None)
    }

    // =========================================================================
    // Enums, typedefs, includes
    // =========================================================================

    fn parse_enum(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(base) = self.consume_one(TokenKind::Enum) else {
            return Ok(None);
        };
        let mut tokens = EnumTokens {
            base: Some(base),
            ..Default::default()
        };
        let name = self
            .consume_one(TokenKind::Identifier)
            .ok_or_else(|| self.error("No name for enum"))?;
        self.current = Some(CurrentDefinition {
            construct: "enum",
            name: unescape(&name.value).to_string(),
            partial: false,
        });
        tokens.name = Some(name);
        tokens.open = Some(
            self.consume_one(TokenKind::OpenBrace)
                .ok_or_else(|| self.error("Bodyless enum"))?,
        );
        let values = self.parse_list(true, "enumeration", |state| state.parse_enum_value())?;
        if self.probe(TokenKind::String) {
            return Err(self.error("No comma between enum values"));
        }
        tokens.close = Some(
            self.consume_one(TokenKind::CloseBrace)
                .ok_or_else(|| self.error("Unexpected value in enum"))?,
        );
        if values.is_empty() {
            return Err(self.error("No value in enum"));
        }
        tokens.termination = Some(
            self.consume_one(TokenKind::Semicolon)
                .ok_or_else(|| self.error("No semicolon after enum"))?,
        );
        Ok(Some(self.arena.alloc(NodeData::Enum(EnumData {
            tokens,
            ext_attrs: None,
            values,
        }))))
    }

    fn parse_enum_value(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(value) = self.consume_one(TokenKind::String) else {
            return Ok(None);
        };
        Ok(Some(self.arena.alloc(NodeData::EnumValue(EnumValueData {
            tokens: EnumValueTokens {
                value: Some(value),
                separator: None,
            },
        }))))
    }

    fn parse_typedef(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(base) = self.consume_one(TokenKind::Typedef) else {
            return Ok(None);
        };
        let mut tokens = TypedefTokens {
            base: Some(base),
            ..Default::default()
        };
        let idl_type = self
            .parse_type_with_ext_attrs()?
            .ok_or_else(|| self.error("Typedef lacks a type"))?;
        let name = self
            .consume_one(TokenKind::Identifier)
            .ok_or_else(|| self.error("Typedef lacks a name"))?;
        self.current = Some(CurrentDefinition {
            construct: "typedef",
            name: unescape(&name.value).to_string(),
            partial: false,
        });
        tokens.name = Some(name);
        tokens.termination = Some(
            self.consume_one(TokenKind::Semicolon)
                .ok_or_else(|| self.error("Unterminated typedef, expected ';'"))?,
        );
        Ok(Some(self.arena.alloc(NodeData::Typedef(TypedefData {
            tokens,
            ext_attrs: None,
            idl_type: Some(idl_type),
        }))))
    }

    fn parse_includes(&mut self) -> ParseResult<Option<NodeIndex>> {
        let Some(target) = self.consume_one(TokenKind::Identifier) else {
            return Ok(None);
        };
        let Some(includes) = self.consume_one(TokenKind::Includes) else {
            // The identifier belonged to something else entirely.
            self.unconsume(target.index as usize);
            return Ok(None);
        };
        let mut tokens = IncludesTokens {
            target: Some(target),
            includes: Some(includes),
            ..Default::default()
        };
        tokens.mixin = Some(
            self.consume_one(TokenKind::Identifier)
                .ok_or_else(|| self.error("Incomplete includes statement"))?,
        );
        tokens.termination = Some(
            self.consume_one(TokenKind::Semicolon)
                .ok_or_else(|| self.error("No semicolon after includes statement"))?,
        );
        Ok(Some(self.arena.alloc(NodeData::Includes(IncludesData {
            tokens,
            ext_attrs: None,
        }))))
    }
}
