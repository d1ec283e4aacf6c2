//! The writer: turns a syntax tree back into text.
//!
//! Every node's tokens are emitted as `trivia + lexeme` in the order the
//! parser consumed them, so an unmutated tree reproduces its input
//! byte for byte, and a tree edited by autofixes prints as if the fixed
//! form had been written by hand.

use widl_parser::{Document, NodeArena, NodeData, NodeIndex};
use widl_scanner::Token;

/// Write a document back to text.
#[must_use]
pub fn write(document: &Document) -> String {
    let mut out = String::new();
    for definition in &document.definitions {
        node(&document.arena, &mut out, *definition);
    }
    out.push_str(&document.eof.trivia);
    out
}

fn token(out: &mut String, token: &Option<Token>) {
    if let Some(token) = token {
        out.push_str(&token.trivia);
        out.push_str(&token.value);
    }
}

fn nodes(arena: &NodeArena, out: &mut String, indices: &[NodeIndex]) {
    for index in indices {
        node(arena, out, *index);
    }
}

fn opt_node(arena: &NodeArena, out: &mut String, index: Option<NodeIndex>) {
    if let Some(index) = index {
        node(arena, out, index);
    }
}

fn node(arena: &NodeArena, out: &mut String, index: NodeIndex) {
    match &arena[index].data {
        NodeData::ExtendedAttributes(data) => {
            token(out, &data.tokens.open);
            nodes(arena, out, &data.items);
            token(out, &data.tokens.close);
        }
        NodeData::ExtendedAttribute(data) => {
            token(out, &data.tokens.name);
            token(out, &data.tokens.assign);
            token(out, &data.tokens.secondary_name);
            token(out, &data.tokens.open);
            nodes(arena, out, &data.rhs_list);
            nodes(arena, out, &data.arguments);
            token(out, &data.tokens.close);
            token(out, &data.tokens.separator);
        }
        NodeData::WrappedToken(data) => {
            token(out, &data.tokens.value);
            token(out, &data.tokens.separator);
        }
        NodeData::Type(data) => {
            opt_node(arena, out, data.ext_attrs);
            if data.union {
                token(out, &data.tokens.open);
                nodes(arena, out, &data.subtypes);
                token(out, &data.tokens.close);
            } else if data.subtypes.is_empty() {
                token(out, &data.tokens.prefix);
                token(out, &data.tokens.base);
                token(out, &data.tokens.postfix);
            } else {
                token(out, &data.tokens.base);
                token(out, &data.tokens.open);
                nodes(arena, out, &data.subtypes);
                token(out, &data.tokens.close);
            }
            token(out, &data.tokens.nullable);
            token(out, &data.tokens.separator);
        }
        NodeData::Default(data) => {
            token(out, &data.tokens.assign);
            for value in &data.expression {
                out.push_str(&value.trivia);
                out.push_str(&value.value);
            }
        }
        NodeData::Argument(data) => {
            opt_node(arena, out, data.ext_attrs);
            token(out, &data.tokens.optional);
            opt_node(arena, out, data.idl_type);
            token(out, &data.tokens.variadic);
            token(out, &data.tokens.name);
            opt_node(arena, out, data.default);
            token(out, &data.tokens.separator);
        }
        NodeData::Enum(data) => {
            opt_node(arena, out, data.ext_attrs);
            token(out, &data.tokens.base);
            token(out, &data.tokens.name);
            token(out, &data.tokens.open);
            nodes(arena, out, &data.values);
            token(out, &data.tokens.close);
            token(out, &data.tokens.termination);
        }
        NodeData::EnumValue(data) => {
            token(out, &data.tokens.value);
            token(out, &data.tokens.separator);
        }
        NodeData::Typedef(data) => {
            opt_node(arena, out, data.ext_attrs);
            token(out, &data.tokens.base);
            opt_node(arena, out, data.idl_type);
            token(out, &data.tokens.name);
            token(out, &data.tokens.termination);
        }
        NodeData::Includes(data) => {
            opt_node(arena, out, data.ext_attrs);
            token(out, &data.tokens.target);
            token(out, &data.tokens.includes);
            token(out, &data.tokens.mixin);
            token(out, &data.tokens.termination);
        }
        NodeData::CallbackFunction(data) => {
            opt_node(arena, out, data.ext_attrs);
            token(out, &data.tokens.base);
            token(out, &data.tokens.name);
            token(out, &data.tokens.assign);
            opt_node(arena, out, data.idl_type);
            token(out, &data.tokens.open);
            nodes(arena, out, &data.arguments);
            token(out, &data.tokens.close);
            token(out, &data.tokens.termination);
        }
        NodeData::Interface(data)
        | NodeData::Mixin(data)
        | NodeData::CallbackInterface(data)
        | NodeData::Dictionary(data)
        | NodeData::Namespace(data) => {
            opt_node(arena, out, data.ext_attrs);
            token(out, &data.tokens.callback);
            token(out, &data.tokens.partial);
            token(out, &data.tokens.base);
            token(out, &data.tokens.mixin);
            token(out, &data.tokens.name);
            token(out, &data.tokens.colon);
            token(out, &data.tokens.inheritance);
            token(out, &data.tokens.open);
            nodes(arena, out, &data.members);
            token(out, &data.tokens.close);
            token(out, &data.tokens.termination);
        }
        NodeData::Constant(data) => {
            opt_node(arena, out, data.ext_attrs);
            token(out, &data.tokens.base);
            opt_node(arena, out, data.idl_type);
            token(out, &data.tokens.name);
            token(out, &data.tokens.assign);
            token(out, &data.tokens.value);
            token(out, &data.tokens.termination);
        }
        NodeData::Constructor(data) => {
            opt_node(arena, out, data.ext_attrs);
            token(out, &data.tokens.base);
            token(out, &data.tokens.open);
            nodes(arena, out, &data.arguments);
            token(out, &data.tokens.close);
            token(out, &data.tokens.termination);
        }
        NodeData::Attribute(data) => {
            opt_node(arena, out, data.ext_attrs);
            token(out, &data.tokens.special);
            token(out, &data.tokens.readonly);
            token(out, &data.tokens.base);
            opt_node(arena, out, data.idl_type);
            token(out, &data.tokens.name);
            token(out, &data.tokens.termination);
        }
        NodeData::Operation(data) => {
            opt_node(arena, out, data.ext_attrs);
            token(out, &data.tokens.special);
            opt_node(arena, out, data.idl_type);
            token(out, &data.tokens.name);
            token(out, &data.tokens.open);
            nodes(arena, out, &data.arguments);
            token(out, &data.tokens.close);
            token(out, &data.tokens.termination);
        }
        NodeData::IterableLike(data) => {
            opt_node(arena, out, data.ext_attrs);
            token(out, &data.tokens.readonly);
            token(out, &data.tokens.r#async);
            token(out, &data.tokens.base);
            token(out, &data.tokens.open);
            nodes(arena, out, &data.idl_types);
            token(out, &data.tokens.close);
            token(out, &data.tokens.args_open);
            nodes(arena, out, &data.arguments);
            token(out, &data.tokens.args_close);
            token(out, &data.tokens.termination);
        }
        NodeData::Field(data) => {
            opt_node(arena, out, data.ext_attrs);
            token(out, &data.tokens.required);
            opt_node(arena, out, data.idl_type);
            token(out, &data.tokens.name);
            opt_node(arena, out, data.default);
            token(out, &data.tokens.termination);
        }
    }
}
