//! Deferred tree edits attached to diagnostics.
//!
//! A [`Fix`] names the edit and the nodes it touches; [`apply`] performs it
//! in place. Replacement subtrees come from tokenizing short literal
//! fragments and parsing them with the regular productions, directly into
//! the document's arena, so spliced nodes are indistinguishable from
//! hand-written ones. Indentation is recovered from neighbouring trivia.
//!
//! Fixes that touch overlapping regions do not commute; callers should
//! re-parse and re-validate between applications.

use widl_common::text::{get_last_indentation, member_indentation};
use widl_parser::{first_token, first_token_mut, fragment, Document, NodeData, NodeIndex};
use widl_scanner::{SyntaxError, Token, TokenKind};

/// A deferred mutation of the tree offered by a validation rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fix {
    /// Insert `[Exposed=Window]`, creating the extended-attribute block if
    /// absent or prepending `Exposed=Window,` to an existing one.
    AddExposedWindow { definition: NodeIndex },
    /// Turn a legacy `[Constructor(…)]` extended attribute into a
    /// `constructor(…);` member.
    ConstructorMember {
        interface: NodeIndex,
        attribute: NodeIndex,
    },
    /// Insert `optional ` before a trailing dictionary argument's type.
    OptionalDictionaryArgument { argument: NodeIndex },
    /// Append ` = {}` to an optional dictionary argument.
    DefaultDictionaryArgument { argument: NodeIndex },
}

/// Apply a fix to the tree it was issued against. A fix whose
/// preconditions no longer hold (the tree changed since validation) leaves
/// the document untouched.
pub fn apply(document: &mut Document, fix: &Fix) -> Result<(), SyntaxError> {
    match *fix {
        Fix::AddExposedWindow { definition } => add_exposed_window(document, definition),
        Fix::ConstructorMember {
            interface,
            attribute,
        } => constructor_member(document, interface, attribute),
        Fix::OptionalDictionaryArgument { argument } => {
            optional_dictionary_argument(document, argument);
            Ok(())
        }
        Fix::DefaultDictionaryArgument { argument } => {
            default_dictionary_argument(document, argument)
        }
    }
}

// =============================================================================
// [Exposed=Window]
// =============================================================================

fn add_exposed_window(document: &mut Document, definition: NodeIndex) -> Result<(), SyntaxError> {
    let existing = document.arena[definition].data.ext_attrs();
    let has_items = existing.is_some_and(|block| {
        matches!(
            &document.arena[block].data,
            NodeData::ExtendedAttributes(data) if !data.items.is_empty()
        )
    });
    if has_items {
        let block = existing.unwrap_or(definition);
        let arena = std::mem::take(&mut document.arena);
        let (arena, exposed) = fragment::ext_attr_with_separator(arena, "Exposed=Window,")?;
        document.arena = arena;
        let first_item = match &document.arena[block].data {
            NodeData::ExtendedAttributes(data) => data.items.first().copied(),
            _ => None,
        };
        if let Some(first_item) = first_item {
            if let Some(token) = first_token_mut(&mut document.arena, first_item) {
                if !token.trivia.starts_with(char::is_whitespace) {
                    token.trivia.insert(0, ' ');
                }
            }
        }
        if let NodeData::ExtendedAttributes(data) = &mut document.arena[block].data {
            data.items.insert(0, exposed);
        }
        document.arena.adopt(exposed, block);
    } else {
        let arena = std::mem::take(&mut document.arena);
        let (arena, block) = fragment::ext_attrs_block(arena, "[Exposed=Window]")?;
        document.arena = arena;
        // The new block takes over the definition's leading trivia; the
        // definition drops to a fresh line at its original indentation.
        let leading = base_token_mut(&mut document.arena, definition)
            .map(|token| std::mem::take(&mut token.trivia))
            .unwrap_or_default();
        if let Some(token) = base_token_mut(&mut document.arena, definition) {
            token.trivia = format!("\n{}", get_last_indentation(&leading));
        }
        if let NodeData::ExtendedAttributes(data) = &mut document.arena[block].data {
            if let Some(open) = data.tokens.open.as_mut() {
                open.trivia = leading;
            }
        }
        document.arena.set_ext_attrs(definition, block);
    }
    Ok(())
}

// =============================================================================
// [Constructor] -> constructor();
// =============================================================================

fn constructor_member(
    document: &mut Document,
    interface: NodeIndex,
    attribute: NodeIndex,
) -> Result<(), SyntaxError> {
    let Some(block) = document.arena[interface].data.ext_attrs() else {
        return Ok(());
    };
    let (block_open_trivia, items) = match &document.arena[block].data {
        NodeData::ExtendedAttributes(data) => (
            data.tokens
                .open
                .as_ref()
                .map(|t| t.trivia.clone())
                .unwrap_or_default(),
            data.items.clone(),
        ),
        _ => return Ok(()),
    };
    let Some(position) = items.iter().position(|&item| item == attribute) else {
        return Ok(());
    };
    let members = match &document.arena[interface].data {
        NodeData::Interface(data) => data.members.clone(),
        _ => return Ok(()),
    };

    let indentation = get_last_indentation(&block_open_trivia).to_string();
    let member_indent = members
        .first()
        .and_then(|&first| first_token(&document.arena, first))
        .map_or_else(
            || member_indentation(&block_open_trivia),
            |token| get_last_indentation(&token.trivia).to_string(),
        );

    let arena = std::mem::take(&mut document.arena);
    let (arena, constructor) =
        fragment::constructor(arena, &format!("\n{member_indent}constructor();"))?;
    document.arena = arena;

    // The legacy attribute's arguments move onto the new member wholesale,
    // trivia included.
    let arguments = match &mut document.arena[attribute].data {
        NodeData::ExtendedAttribute(data) => std::mem::take(&mut data.arguments),
        _ => Vec::new(),
    };
    if let NodeData::Constructor(data) = &mut document.arena[constructor].data {
        data.arguments = arguments.clone();
    }
    for argument in &arguments {
        document.arena.adopt(*argument, constructor);
    }

    // After the last existing constructor, or first.
    let insert_at = members
        .iter()
        .rposition(|&m| matches!(document.arena[m].data, NodeData::Constructor(_)))
        .map_or(0, |i| i + 1);
    document.arena.insert_member(interface, insert_at, constructor);

    if let NodeData::Interface(data) = &mut document.arena[interface].data {
        if let Some(close) = data.tokens.close.as_mut() {
            if !close.trivia.contains('\n') {
                close.trivia.push('\n');
                close.trivia.push_str(&indentation);
            }
        }
    }

    remove_ext_attr(document, interface, block, position);
    Ok(())
}

/// Remove `items[position]` from an extended-attribute block, repairing
/// separators and trivia so the written form keeps its lexical shape.
fn remove_ext_attr(
    document: &mut Document,
    owner: NodeIndex,
    block: NodeIndex,
    position: usize,
) {
    let (removed, remaining, open_trivia) = match &mut document.arena[block].data {
        NodeData::ExtendedAttributes(data) => {
            let removed = data.items.remove(position);
            if data.items.is_empty() {
                let open_trivia = data.tokens.open.take().map(|t| t.trivia);
                data.tokens.close = None;
                (removed, Vec::new(), open_trivia)
            } else {
                (removed, data.items.clone(), None)
            }
        }
        _ => return,
    };
    if remaining.is_empty() {
        // The brackets are gone; their leading trivia moves onto the
        // definition so indentation survives.
        if let Some(open_trivia) = open_trivia {
            if let Some(token) = base_token_mut(&mut document.arena, owner) {
                token.trivia = open_trivia;
            }
        }
    } else if position == remaining.len() {
        // Removed the last attribute: the one before it no longer needs
        // its separator.
        document.arena[remaining[position - 1]]
            .data
            .set_separator(None);
    } else {
        // Removed from the front or middle: the next attribute inherits the
        // removed one's leading trivia.
        let removed_trivia = match &document.arena[removed].data {
            NodeData::ExtendedAttribute(data) => {
                data.tokens.name.as_ref().map(|t| t.trivia.clone())
            }
            _ => None,
        };
        if let Some(removed_trivia) = removed_trivia {
            if let Some(token) = first_token_mut(&mut document.arena, remaining[position]) {
                token.trivia = removed_trivia;
            }
        }
    }
}

// =============================================================================
// Dictionary arguments
// =============================================================================

fn optional_dictionary_argument(document: &mut Document, argument: NodeIndex) {
    let idl_type = match &document.arena[argument].data {
        NodeData::Argument(data) => data.idl_type,
        _ => None,
    };
    let Some(idl_type) = idl_type else { return };
    let Some(first) = first_token(&document.arena, idl_type) else {
        return;
    };
    let mut optional = Token::synthetic(TokenKind::Optional, "optional", first.trivia.clone());
    optional.line = first.line;
    optional.index = first.index;
    if let Some(token) = first_token_mut(&mut document.arena, idl_type) {
        token.trivia = " ".to_string();
    }
    if let NodeData::Argument(data) = &mut document.arena[argument].data {
        data.tokens.optional = Some(optional);
    }
}

fn default_dictionary_argument(
    document: &mut Document,
    argument: NodeIndex,
) -> Result<(), SyntaxError> {
    if !matches!(&document.arena[argument].data, NodeData::Argument(_)) {
        return Ok(());
    }
    let arena = std::mem::take(&mut document.arena);
    let (arena, default) = fragment::default_value(arena, " = {}")?;
    document.arena = arena;
    document.arena.set_default(argument, default);
    Ok(())
}

/// The first token a definition owns directly (`callback`, `partial`, or
/// the construct keyword), skipping extended attributes.
fn base_token_mut<'a>(
    arena: &'a mut widl_parser::NodeArena,
    definition: NodeIndex,
) -> Option<&'a mut Token> {
    match &mut arena[definition].data {
        NodeData::Interface(data)
        | NodeData::Mixin(data)
        | NodeData::CallbackInterface(data)
        | NodeData::Dictionary(data)
        | NodeData::Namespace(data) => data
            .tokens
            .callback
            .as_mut()
            .or(data.tokens.partial.as_mut())
            .or(data.tokens.base.as_mut()),
        NodeData::Enum(data) => data.tokens.base.as_mut(),
        NodeData::Typedef(data) => data.tokens.base.as_mut(),
        NodeData::CallbackFunction(data) => data.tokens.base.as_mut(),
        NodeData::Includes(data) => data.tokens.target.as_mut(),
        _ => None,
    }
}
