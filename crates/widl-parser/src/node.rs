//! Typed syntax-tree nodes, one variant per grammar production.
//!
//! Every node owns the tokens it consumed, as a struct of optional token
//! roles fixed per kind, plus indices of its child nodes. The writer
//! reproduces the source verbatim by emitting each node's tokens in its
//! source order, so parsers must store every token they consume.

use crate::arena::{NodeArena, NodeIndex};
use widl_common::text::unescape;
use widl_scanner::{Token, TokenKind};

// =============================================================================
// Token dictionaries
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct ExtendedAttributesTokens {
    pub open: Option<Token>,
    pub close: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct ExtendedAttributeTokens {
    pub name: Option<Token>,
    pub assign: Option<Token>,
    pub secondary_name: Option<Token>,
    pub open: Option<Token>,
    pub close: Option<Token>,
    pub separator: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct WrappedTokenTokens {
    pub value: Option<Token>,
    pub separator: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct TypeTokens {
    pub prefix: Option<Token>,
    pub base: Option<Token>,
    pub postfix: Option<Token>,
    pub open: Option<Token>,
    pub close: Option<Token>,
    pub nullable: Option<Token>,
    pub separator: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct DefaultTokens {
    pub assign: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct ArgumentTokens {
    pub optional: Option<Token>,
    pub variadic: Option<Token>,
    pub name: Option<Token>,
    pub separator: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct EnumTokens {
    pub base: Option<Token>,
    pub name: Option<Token>,
    pub open: Option<Token>,
    pub close: Option<Token>,
    pub termination: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct EnumValueTokens {
    pub value: Option<Token>,
    pub separator: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct TypedefTokens {
    pub base: Option<Token>,
    pub name: Option<Token>,
    pub termination: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct IncludesTokens {
    pub target: Option<Token>,
    pub includes: Option<Token>,
    pub mixin: Option<Token>,
    pub termination: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct CallbackFunctionTokens {
    pub base: Option<Token>,
    pub name: Option<Token>,
    pub assign: Option<Token>,
    pub open: Option<Token>,
    pub close: Option<Token>,
    pub termination: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct ContainerTokens {
    pub callback: Option<Token>,
    pub partial: Option<Token>,
    pub base: Option<Token>,
    pub mixin: Option<Token>,
    pub name: Option<Token>,
    pub colon: Option<Token>,
    pub inheritance: Option<Token>,
    pub open: Option<Token>,
    pub close: Option<Token>,
    pub termination: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct ConstantTokens {
    pub base: Option<Token>,
    pub name: Option<Token>,
    pub assign: Option<Token>,
    pub value: Option<Token>,
    pub termination: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct ConstructorTokens {
    pub base: Option<Token>,
    pub open: Option<Token>,
    pub close: Option<Token>,
    pub termination: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct AttributeTokens {
    pub special: Option<Token>,
    pub readonly: Option<Token>,
    pub base: Option<Token>,
    pub name: Option<Token>,
    pub termination: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct OperationTokens {
    pub special: Option<Token>,
    pub name: Option<Token>,
    pub open: Option<Token>,
    pub close: Option<Token>,
    pub termination: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct IterableLikeTokens {
    pub readonly: Option<Token>,
    pub r#async: Option<Token>,
    pub base: Option<Token>,
    pub open: Option<Token>,
    pub close: Option<Token>,
    pub args_open: Option<Token>,
    pub args_close: Option<Token>,
    pub termination: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct FieldTokens {
    pub required: Option<Token>,
    pub name: Option<Token>,
    pub termination: Option<Token>,
}

// =============================================================================
// Node data, one struct per production
// =============================================================================

/// `[A, B=C, D(long x)]`
#[derive(Clone, Debug, Default)]
pub struct ExtendedAttributesData {
    pub tokens: ExtendedAttributesTokens,
    pub items: Vec<NodeIndex>,
}

/// One extended attribute with its optional right-hand side.
///
/// `rhs_list` holds wrapped tokens for the `=(a, b)` list forms; `arguments`
/// holds argument nodes when a parenthesized argument list is present.
#[derive(Clone, Debug, Default)]
pub struct ExtendedAttributeData {
    pub tokens: ExtendedAttributeTokens,
    pub rhs_list: Vec<NodeIndex>,
    pub arguments: Vec<NodeIndex>,
}

impl ExtendedAttributeData {
    #[must_use]
    pub fn name(&self) -> &str {
        self.tokens.name.as_ref().map_or("", |t| t.value.as_str())
    }
}

/// A bare token inside an extended-attribute rhs list.
#[derive(Clone, Debug, Default)]
pub struct WrappedTokenData {
    pub tokens: WrappedTokenTokens,
}

/// Any type: plain, generic, or union.
///
/// `subtypes` is empty for plain types; `union` distinguishes `(A or B)`
/// from generics, whose name sits in `tokens.base`.
#[derive(Clone, Debug, Default)]
pub struct TypeData {
    pub tokens: TypeTokens,
    pub ext_attrs: Option<NodeIndex>,
    pub subtypes: Vec<NodeIndex>,
    pub union: bool,
}

impl TypeData {
    #[must_use]
    pub fn nullable(&self) -> bool {
        self.tokens.nullable.is_some()
    }

    /// Generic constructor name (`sequence`, `record`, …) when this is a
    /// parameterized type.
    #[must_use]
    pub fn generic(&self) -> Option<&str> {
        if self.union || self.subtypes.is_empty() {
            return None;
        }
        self.tokens.base.as_ref().map(|t| t.value.as_str())
    }

    /// The (unescaped) name of a plain type, `None` for generics and unions.
    #[must_use]
    pub fn idl_type_name(&self) -> Option<String> {
        if self.union || !self.subtypes.is_empty() {
            return None;
        }
        let base = self.tokens.base.as_ref()?;
        let mut name = String::new();
        if let Some(prefix) = &self.tokens.prefix {
            name.push_str(&prefix.value);
            name.push(' ');
        }
        if base.kind == TokenKind::Identifier {
            name.push_str(unescape(&base.value));
        } else {
            name.push_str(&base.value);
        }
        if let Some(postfix) = &self.tokens.postfix {
            name.push(' ');
            name.push_str(&postfix.value);
        }
        Some(name)
    }
}

/// `= value` on a dictionary field or optional argument.
#[derive(Clone, Debug, Default)]
pub struct DefaultData {
    pub tokens: DefaultTokens,
    /// The value tokens: one const value, string, or `null`, or the paired
    /// brackets of `[]` / `{}`.
    pub expression: Vec<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct ArgumentData {
    pub tokens: ArgumentTokens,
    pub ext_attrs: Option<NodeIndex>,
    pub idl_type: Option<NodeIndex>,
    pub default: Option<NodeIndex>,
}

impl ArgumentData {
    #[must_use]
    pub fn name(&self) -> &str {
        self.tokens
            .name
            .as_ref()
            .map_or("", |t| unescape(&t.value))
    }

    #[must_use]
    pub fn optional(&self) -> bool {
        self.tokens.optional.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub struct EnumData {
    pub tokens: EnumTokens,
    pub ext_attrs: Option<NodeIndex>,
    pub values: Vec<NodeIndex>,
}

#[derive(Clone, Debug, Default)]
pub struct EnumValueData {
    pub tokens: EnumValueTokens,
}

impl EnumValueData {
    /// The enumeration value without its quotes.
    #[must_use]
    pub fn value(&self) -> &str {
        self.tokens
            .value
            .as_ref()
            .map_or("", |t| t.value.trim_matches('"'))
    }
}

#[derive(Clone, Debug, Default)]
pub struct TypedefData {
    pub tokens: TypedefTokens,
    pub ext_attrs: Option<NodeIndex>,
    pub idl_type: Option<NodeIndex>,
}

#[derive(Clone, Debug, Default)]
pub struct IncludesData {
    pub tokens: IncludesTokens,
    pub ext_attrs: Option<NodeIndex>,
}

impl IncludesData {
    #[must_use]
    pub fn target(&self) -> &str {
        self.tokens
            .target
            .as_ref()
            .map_or("", |t| unescape(&t.value))
    }

    #[must_use]
    pub fn mixin(&self) -> &str {
        self.tokens
            .mixin
            .as_ref()
            .map_or("", |t| unescape(&t.value))
    }
}

#[derive(Clone, Debug, Default)]
pub struct CallbackFunctionData {
    pub tokens: CallbackFunctionTokens,
    pub ext_attrs: Option<NodeIndex>,
    pub idl_type: Option<NodeIndex>,
    pub arguments: Vec<NodeIndex>,
}

/// Shared layout of interface, mixin, callback interface, dictionary, and
/// namespace definitions.
#[derive(Clone, Debug, Default)]
pub struct ContainerData {
    pub tokens: ContainerTokens,
    pub ext_attrs: Option<NodeIndex>,
    pub members: Vec<NodeIndex>,
}

impl ContainerData {
    #[must_use]
    pub fn name(&self) -> &str {
        self.tokens
            .name
            .as_ref()
            .map_or("", |t| unescape(&t.value))
    }

    #[must_use]
    pub fn partial(&self) -> bool {
        self.tokens.partial.is_some()
    }

    /// Unescaped name of the inherited definition, if any.
    #[must_use]
    pub fn inheritance(&self) -> Option<&str> {
        self.tokens
            .inheritance
            .as_ref()
            .map(|t| unescape(&t.value))
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConstantData {
    pub tokens: ConstantTokens,
    pub ext_attrs: Option<NodeIndex>,
    pub idl_type: Option<NodeIndex>,
}

#[derive(Clone, Debug, Default)]
pub struct ConstructorData {
    pub tokens: ConstructorTokens,
    pub ext_attrs: Option<NodeIndex>,
    pub arguments: Vec<NodeIndex>,
}

#[derive(Clone, Debug, Default)]
pub struct AttributeData {
    pub tokens: AttributeTokens,
    pub ext_attrs: Option<NodeIndex>,
    pub idl_type: Option<NodeIndex>,
}

impl AttributeData {
    #[must_use]
    pub fn name(&self) -> &str {
        self.tokens
            .name
            .as_ref()
            .map_or("", |t| unescape(&t.value))
    }

    /// `static`, `stringifier`, or `inherit`, if present.
    #[must_use]
    pub fn special(&self) -> &str {
        self.tokens.special.as_ref().map_or("", |t| t.value.as_str())
    }
}

#[derive(Clone, Debug, Default)]
pub struct OperationData {
    pub tokens: OperationTokens,
    pub ext_attrs: Option<NodeIndex>,
    /// Return type; absent only for the bare `stringifier;` short form.
    pub idl_type: Option<NodeIndex>,
    pub arguments: Vec<NodeIndex>,
}

impl OperationData {
    #[must_use]
    pub fn name(&self) -> &str {
        self.tokens
            .name
            .as_ref()
            .map_or("", |t| unescape(&t.value))
    }

    /// `getter`, `setter`, `deleter`, `static`, or `stringifier`, if present.
    #[must_use]
    pub fn special(&self) -> &str {
        self.tokens.special.as_ref().map_or("", |t| t.value.as_str())
    }
}

#[derive(Clone, Debug, Default)]
pub struct IterableLikeData {
    pub tokens: IterableLikeTokens,
    pub ext_attrs: Option<NodeIndex>,
    pub idl_types: Vec<NodeIndex>,
    pub arguments: Vec<NodeIndex>,
}

impl IterableLikeData {
    #[must_use]
    pub fn readonly(&self) -> bool {
        self.tokens.readonly.is_some()
    }

    #[must_use]
    pub fn is_async(&self) -> bool {
        self.tokens.r#async.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FieldData {
    pub tokens: FieldTokens,
    pub ext_attrs: Option<NodeIndex>,
    pub idl_type: Option<NodeIndex>,
    pub default: Option<NodeIndex>,
}

impl FieldData {
    #[must_use]
    pub fn name(&self) -> &str {
        self.tokens
            .name
            .as_ref()
            .map_or("", |t| unescape(&t.value))
    }

    #[must_use]
    pub fn required(&self) -> bool {
        self.tokens.required.is_some()
    }
}

// =============================================================================
// NodeData - the production sum type
// =============================================================================

#[derive(Clone, Debug)]
pub enum NodeData {
    Interface(ContainerData),
    Mixin(ContainerData),
    CallbackInterface(ContainerData),
    Dictionary(ContainerData),
    Namespace(ContainerData),
    Enum(EnumData),
    EnumValue(EnumValueData),
    Typedef(TypedefData),
    Includes(IncludesData),
    CallbackFunction(CallbackFunctionData),
    Constant(ConstantData),
    Constructor(ConstructorData),
    Attribute(AttributeData),
    Operation(OperationData),
    IterableLike(IterableLikeData),
    Field(FieldData),
    Argument(ArgumentData),
    Type(TypeData),
    Default(DefaultData),
    ExtendedAttributes(ExtendedAttributesData),
    ExtendedAttribute(ExtendedAttributeData),
    WrappedToken(WrappedTokenData),
}

impl NodeData {
    /// The kind discriminator as a stable string.
    #[must_use]
    pub fn kind_str(&self) -> &'static str {
        match self {
            NodeData::Interface(_) => "interface",
            NodeData::Mixin(_) => "interface mixin",
            NodeData::CallbackInterface(_) => "callback interface",
            NodeData::Dictionary(_) => "dictionary",
            NodeData::Namespace(_) => "namespace",
            NodeData::Enum(_) => "enum",
            NodeData::EnumValue(_) => "enum-value",
            NodeData::Typedef(_) => "typedef",
            NodeData::Includes(_) => "includes",
            NodeData::CallbackFunction(_) => "callback",
            NodeData::Constant(_) => "const",
            NodeData::Constructor(_) => "constructor",
            NodeData::Attribute(_) => "attribute",
            NodeData::Operation(_) => "operation",
            NodeData::IterableLike(data) => match data.tokens.base.as_ref().map(|t| t.kind) {
                Some(TokenKind::Maplike) => "maplike",
                Some(TokenKind::Setlike) => "setlike",
                _ => "iterable",
            },
            NodeData::Field(_) => "field",
            NodeData::Argument(_) => "argument",
            NodeData::Type(_) => "type",
            NodeData::Default(_) => "default",
            NodeData::ExtendedAttributes(_) => "extended-attributes",
            NodeData::ExtendedAttribute(_) => "extended-attribute",
            NodeData::WrappedToken(_) => "token",
        }
    }

    /// The name a top-level definition introduces, if it has one.
    #[must_use]
    pub fn definition_name(&self) -> Option<&str> {
        match self {
            NodeData::Interface(data)
            | NodeData::Mixin(data)
            | NodeData::CallbackInterface(data)
            | NodeData::Dictionary(data)
            | NodeData::Namespace(data) => Some(data.name()),
            NodeData::Enum(data) => data.tokens.name.as_ref().map(|t| unescape(&t.value)),
            NodeData::Typedef(data) => data.tokens.name.as_ref().map(|t| unescape(&t.value)),
            NodeData::CallbackFunction(data) => {
                data.tokens.name.as_ref().map(|t| unescape(&t.value))
            }
            _ => None,
        }
    }

    /// Whether this definition is a partial fragment.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        match self {
            NodeData::Interface(data)
            | NodeData::Mixin(data)
            | NodeData::CallbackInterface(data)
            | NodeData::Dictionary(data)
            | NodeData::Namespace(data) => data.partial(),
            _ => false,
        }
    }

    /// Every child node index, in declaration order.
    #[must_use]
    pub fn children(&self) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let ext = |out: &mut Vec<NodeIndex>, e: &Option<NodeIndex>| out.extend(e.iter().copied());
        match self {
            NodeData::Interface(data)
            | NodeData::Mixin(data)
            | NodeData::CallbackInterface(data)
            | NodeData::Dictionary(data)
            | NodeData::Namespace(data) => {
                ext(&mut out, &data.ext_attrs);
                out.extend(data.members.iter().copied());
            }
            NodeData::Enum(data) => {
                ext(&mut out, &data.ext_attrs);
                out.extend(data.values.iter().copied());
            }
            NodeData::EnumValue(_) | NodeData::WrappedToken(_) | NodeData::Default(_) => {}
            NodeData::Typedef(data) => {
                ext(&mut out, &data.ext_attrs);
                ext(&mut out, &data.idl_type);
            }
            NodeData::Includes(data) => ext(&mut out, &data.ext_attrs),
            NodeData::CallbackFunction(data) => {
                ext(&mut out, &data.ext_attrs);
                ext(&mut out, &data.idl_type);
                out.extend(data.arguments.iter().copied());
            }
            NodeData::Constant(data) => {
                ext(&mut out, &data.ext_attrs);
                ext(&mut out, &data.idl_type);
            }
            NodeData::Constructor(data) => {
                ext(&mut out, &data.ext_attrs);
                out.extend(data.arguments.iter().copied());
            }
            NodeData::Attribute(data) => {
                ext(&mut out, &data.ext_attrs);
                ext(&mut out, &data.idl_type);
            }
            NodeData::Operation(data) => {
                ext(&mut out, &data.ext_attrs);
                ext(&mut out, &data.idl_type);
                out.extend(data.arguments.iter().copied());
            }
            NodeData::IterableLike(data) => {
                ext(&mut out, &data.ext_attrs);
                out.extend(data.idl_types.iter().copied());
                out.extend(data.arguments.iter().copied());
            }
            NodeData::Field(data) => {
                ext(&mut out, &data.ext_attrs);
                ext(&mut out, &data.idl_type);
                ext(&mut out, &data.default);
            }
            NodeData::Argument(data) => {
                ext(&mut out, &data.ext_attrs);
                ext(&mut out, &data.idl_type);
                ext(&mut out, &data.default);
            }
            NodeData::Type(data) => {
                ext(&mut out, &data.ext_attrs);
                out.extend(data.subtypes.iter().copied());
            }
            NodeData::ExtendedAttributes(data) => out.extend(data.items.iter().copied()),
            NodeData::ExtendedAttribute(data) => {
                out.extend(data.rhs_list.iter().copied());
                out.extend(data.arguments.iter().copied());
            }
        }
        out
    }

    /// The extended-attribute block attached to this node, if any.
    #[must_use]
    pub fn ext_attrs(&self) -> Option<NodeIndex> {
        match self {
            NodeData::Interface(data)
            | NodeData::Mixin(data)
            | NodeData::CallbackInterface(data)
            | NodeData::Dictionary(data)
            | NodeData::Namespace(data) => data.ext_attrs,
            NodeData::Enum(data) => data.ext_attrs,
            NodeData::Typedef(data) => data.ext_attrs,
            NodeData::Includes(data) => data.ext_attrs,
            NodeData::CallbackFunction(data) => data.ext_attrs,
            NodeData::Constant(data) => data.ext_attrs,
            NodeData::Constructor(data) => data.ext_attrs,
            NodeData::Attribute(data) => data.ext_attrs,
            NodeData::Operation(data) => data.ext_attrs,
            NodeData::IterableLike(data) => data.ext_attrs,
            NodeData::Field(data) => data.ext_attrs,
            NodeData::Argument(data) => data.ext_attrs,
            NodeData::Type(data) => data.ext_attrs,
            _ => None,
        }
    }

    pub(crate) fn set_ext_attrs(&mut self, ext_attrs: Option<NodeIndex>) {
        match self {
            NodeData::Interface(data)
            | NodeData::Mixin(data)
            | NodeData::CallbackInterface(data)
            | NodeData::Dictionary(data)
            | NodeData::Namespace(data) => data.ext_attrs = ext_attrs,
            NodeData::Enum(data) => data.ext_attrs = ext_attrs,
            NodeData::Typedef(data) => data.ext_attrs = ext_attrs,
            NodeData::Includes(data) => data.ext_attrs = ext_attrs,
            NodeData::CallbackFunction(data) => data.ext_attrs = ext_attrs,
            NodeData::Constant(data) => data.ext_attrs = ext_attrs,
            NodeData::Constructor(data) => data.ext_attrs = ext_attrs,
            NodeData::Attribute(data) => data.ext_attrs = ext_attrs,
            NodeData::Operation(data) => data.ext_attrs = ext_attrs,
            NodeData::IterableLike(data) => data.ext_attrs = ext_attrs,
            NodeData::Field(data) => data.ext_attrs = ext_attrs,
            NodeData::Argument(data) => data.ext_attrs = ext_attrs,
            NodeData::Type(data) => data.ext_attrs = ext_attrs,
            other => unreachable!("no extended attributes on {}", other.kind_str()),
        }
    }

    /// The list separator trailing this node, when it was parsed as a
    /// comma- or `or`-separated item.
    #[must_use]
    pub fn separator(&self) -> Option<&Token> {
        match self {
            NodeData::Argument(data) => data.tokens.separator.as_ref(),
            NodeData::EnumValue(data) => data.tokens.separator.as_ref(),
            NodeData::Type(data) => data.tokens.separator.as_ref(),
            NodeData::ExtendedAttribute(data) => data.tokens.separator.as_ref(),
            NodeData::WrappedToken(data) => data.tokens.separator.as_ref(),
            _ => None,
        }
    }

    /// Replace the trailing list separator; autofixes use this to repair
    /// comma placement after removing an item.
    pub fn set_separator(&mut self, separator: Option<Token>) {
        match self {
            NodeData::Argument(data) => data.tokens.separator = separator,
            NodeData::EnumValue(data) => data.tokens.separator = separator,
            NodeData::Type(data) => data.tokens.separator = separator,
            NodeData::ExtendedAttribute(data) => data.tokens.separator = separator,
            NodeData::WrappedToken(data) => data.tokens.separator = separator,
            other => unreachable!("no separator role on {}", other.kind_str()),
        }
    }
}

// =============================================================================
// First-token lookup
// =============================================================================

/// The roles a node's first token can occupy, for mutable lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenRole {
    Open,
    Name,
    Prefix,
    Base,
    Optional,
    Readonly,
    Async,
    Special,
    Required,
    Partial,
    Callback,
    Target,
    Assign,
    Value,
}

/// The lowest-indexed token reachable from a node, extended attributes
/// included. This determines the node's source position.
#[must_use]
pub fn first_token(arena: &NodeArena, index: NodeIndex) -> Option<&Token> {
    let (owner, role) = first_token_location(arena, index)?;
    token_ref(&arena[owner].data, role)
}

/// Mutable access to a node's first token, for autofix trivia repair.
pub fn first_token_mut(arena: &mut NodeArena, index: NodeIndex) -> Option<&mut Token> {
    let (owner, role) = first_token_location(arena, index)?;
    token_mut(&mut arena[owner].data, role)
}

fn first_token_location(arena: &NodeArena, index: NodeIndex) -> Option<(NodeIndex, TokenRole)> {
    // A non-empty extended-attribute block always leads its owner.
    if let Some(ext) = arena[index].data.ext_attrs() {
        if let Some(found) = first_token_location(arena, ext) {
            return Some(found);
        }
    }
    let via_child =
        |child: NodeIndex| first_token_location(arena, child);
    match &arena[index].data {
        NodeData::ExtendedAttributes(data) => data
            .tokens
            .open
            .as_ref()
            .map(|_| (index, TokenRole::Open))
            .or_else(|| data.items.first().copied().and_then(via_child)),
        NodeData::ExtendedAttribute(_) => Some((index, TokenRole::Name)),
        NodeData::WrappedToken(_) => Some((index, TokenRole::Value)),
        NodeData::Type(data) => {
            if data.tokens.prefix.is_some() {
                Some((index, TokenRole::Prefix))
            } else if data.union {
                Some((index, TokenRole::Open))
            } else if data.tokens.base.is_some() {
                Some((index, TokenRole::Base))
            } else {
                data.subtypes.first().copied().and_then(via_child)
            }
        }
        NodeData::Default(_) => Some((index, TokenRole::Assign)),
        NodeData::Argument(data) => {
            if data.tokens.optional.is_some() {
                Some((index, TokenRole::Optional))
            } else {
                data.idl_type.and_then(via_child)
            }
        }
        NodeData::Enum(_) | NodeData::Typedef(_) | NodeData::CallbackFunction(_) => {
            Some((index, TokenRole::Base))
        }
        NodeData::EnumValue(_) => Some((index, TokenRole::Value)),
        NodeData::Includes(_) => Some((index, TokenRole::Target)),
        NodeData::Interface(data)
        | NodeData::Mixin(data)
        | NodeData::CallbackInterface(data)
        | NodeData::Dictionary(data)
        | NodeData::Namespace(data) => {
            if data.tokens.callback.is_some() {
                Some((index, TokenRole::Callback))
            } else if data.tokens.partial.is_some() {
                Some((index, TokenRole::Partial))
            } else {
                Some((index, TokenRole::Base))
            }
        }
        NodeData::Constant(_) | NodeData::Constructor(_) => Some((index, TokenRole::Base)),
        NodeData::Attribute(data) => {
            if data.tokens.special.is_some() {
                Some((index, TokenRole::Special))
            } else if data.tokens.readonly.is_some() {
                Some((index, TokenRole::Readonly))
            } else {
                Some((index, TokenRole::Base))
            }
        }
        NodeData::Operation(data) => {
            if data.tokens.special.is_some() {
                Some((index, TokenRole::Special))
            } else if let Some(idl_type) = data.idl_type {
                via_child(idl_type)
            } else {
                Some((index, TokenRole::Name))
            }
        }
        NodeData::IterableLike(data) => {
            if data.tokens.readonly.is_some() {
                Some((index, TokenRole::Readonly))
            } else if data.tokens.r#async.is_some() {
                Some((index, TokenRole::Async))
            } else {
                Some((index, TokenRole::Base))
            }
        }
        NodeData::Field(data) => {
            if data.tokens.required.is_some() {
                Some((index, TokenRole::Required))
            } else {
                data.idl_type.and_then(via_child)
            }
        }
    }
}

fn token_ref(data: &NodeData, role: TokenRole) -> Option<&Token> {
    match (data, role) {
        (NodeData::ExtendedAttributes(d), TokenRole::Open) => d.tokens.open.as_ref(),
        (NodeData::ExtendedAttribute(d), TokenRole::Name) => d.tokens.name.as_ref(),
        (NodeData::WrappedToken(d), TokenRole::Value) => d.tokens.value.as_ref(),
        (NodeData::Type(d), TokenRole::Prefix) => d.tokens.prefix.as_ref(),
        (NodeData::Type(d), TokenRole::Open) => d.tokens.open.as_ref(),
        (NodeData::Type(d), TokenRole::Base) => d.tokens.base.as_ref(),
        (NodeData::Default(d), TokenRole::Assign) => d.tokens.assign.as_ref(),
        (NodeData::Argument(d), TokenRole::Optional) => d.tokens.optional.as_ref(),
        (NodeData::Enum(d), TokenRole::Base) => d.tokens.base.as_ref(),
        (NodeData::EnumValue(d), TokenRole::Value) => d.tokens.value.as_ref(),
        (NodeData::Typedef(d), TokenRole::Base) => d.tokens.base.as_ref(),
        (NodeData::Includes(d), TokenRole::Target) => d.tokens.target.as_ref(),
        (NodeData::CallbackFunction(d), TokenRole::Base) => d.tokens.base.as_ref(),
        (
            NodeData::Interface(d)
            | NodeData::Mixin(d)
            | NodeData::CallbackInterface(d)
            | NodeData::Dictionary(d)
            | NodeData::Namespace(d),
            role,
        ) => match role {
            TokenRole::Callback => d.tokens.callback.as_ref(),
            TokenRole::Partial => d.tokens.partial.as_ref(),
            TokenRole::Base => d.tokens.base.as_ref(),
            _ => None,
        },
        (NodeData::Constant(d), TokenRole::Base) => d.tokens.base.as_ref(),
        (NodeData::Constructor(d), TokenRole::Base) => d.tokens.base.as_ref(),
        (NodeData::Attribute(d), TokenRole::Special) => d.tokens.special.as_ref(),
        (NodeData::Attribute(d), TokenRole::Readonly) => d.tokens.readonly.as_ref(),
        (NodeData::Attribute(d), TokenRole::Base) => d.tokens.base.as_ref(),
        (NodeData::Operation(d), TokenRole::Special) => d.tokens.special.as_ref(),
        (NodeData::Operation(d), TokenRole::Name) => d.tokens.name.as_ref(),
        (NodeData::IterableLike(d), TokenRole::Readonly) => d.tokens.readonly.as_ref(),
        (NodeData::IterableLike(d), TokenRole::Async) => d.tokens.r#async.as_ref(),
        (NodeData::IterableLike(d), TokenRole::Base) => d.tokens.base.as_ref(),
        (NodeData::Field(d), TokenRole::Required) => d.tokens.required.as_ref(),
        _ => None,
    }
}

fn token_mut(data: &mut NodeData, role: TokenRole) -> Option<&mut Token> {
    match (data, role) {
        (NodeData::ExtendedAttributes(d), TokenRole::Open) => d.tokens.open.as_mut(),
        (NodeData::ExtendedAttribute(d), TokenRole::Name) => d.tokens.name.as_mut(),
        (NodeData::WrappedToken(d), TokenRole::Value) => d.tokens.value.as_mut(),
        (NodeData::Type(d), TokenRole::Prefix) => d.tokens.prefix.as_mut(),
        (NodeData::Type(d), TokenRole::Open) => d.tokens.open.as_mut(),
        (NodeData::Type(d), TokenRole::Base) => d.tokens.base.as_mut(),
        (NodeData::Default(d), TokenRole::Assign) => d.tokens.assign.as_mut(),
        (NodeData::Argument(d), TokenRole::Optional) => d.tokens.optional.as_mut(),
        (NodeData::Enum(d), TokenRole::Base) => d.tokens.base.as_mut(),
        (NodeData::EnumValue(d), TokenRole::Value) => d.tokens.value.as_mut(),
        (NodeData::Typedef(d), TokenRole::Base) => d.tokens.base.as_mut(),
        (NodeData::Includes(d), TokenRole::Target) => d.tokens.target.as_mut(),
        (NodeData::CallbackFunction(d), TokenRole::Base) => d.tokens.base.as_mut(),
        (
            NodeData::Interface(d)
            | NodeData::Mixin(d)
            | NodeData::CallbackInterface(d)
            | NodeData::Dictionary(d)
            | NodeData::Namespace(d),
            role,
        ) => match role {
            TokenRole::Callback => d.tokens.callback.as_mut(),
            TokenRole::Partial => d.tokens.partial.as_mut(),
            TokenRole::Base => d.tokens.base.as_mut(),
            _ => None,
        },
        (NodeData::Constant(d), TokenRole::Base) => d.tokens.base.as_mut(),
        (NodeData::Constructor(d), TokenRole::Base) => d.tokens.base.as_mut(),
        (NodeData::Attribute(d), TokenRole::Special) => d.tokens.special.as_mut(),
        (NodeData::Attribute(d), TokenRole::Readonly) => d.tokens.readonly.as_mut(),
        (NodeData::Attribute(d), TokenRole::Base) => d.tokens.base.as_mut(),
        (NodeData::Operation(d), TokenRole::Special) => d.tokens.special.as_mut(),
        (NodeData::Operation(d), TokenRole::Name) => d.tokens.name.as_mut(),
        (NodeData::IterableLike(d), TokenRole::Readonly) => d.tokens.readonly.as_mut(),
        (NodeData::IterableLike(d), TokenRole::Async) => d.tokens.r#async.as_mut(),
        (NodeData::IterableLike(d), TokenRole::Base) => d.tokens.base.as_mut(),
        (NodeData::Field(d), TokenRole::Required) => d.tokens.required.as_mut(),
        _ => None,
    }
}
