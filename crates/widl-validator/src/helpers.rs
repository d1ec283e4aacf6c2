//! Recursive analyses over mutually recursive definitions.
//!
//! Both analyses may recurse through typedef chains and dictionary
//! inheritance that form cycles; the three-state cache in
//! [`crate::defs::AnalysisCache`] guards them. Re-entering a pending
//! computation returns the pessimistic answer - "no dictionary found" and
//! "no required field" respectively - which is the deliberate halting
//! policy, not an approximation bug.

use crate::defs::{CacheState, Definitions};
use widl_parser::{Document, NodeData, NodeIndex};

/// A successful dictionary-containment result: the type node that refers to
/// the dictionary, and the dictionary definition itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DictionaryInclusion {
    pub reference: NodeIndex,
    pub dictionary: NodeIndex,
}

/// Whether `idl_type` ultimately references a dictionary.
///
/// Plain references are looked up in `defs.unique`; typedefs recurse into
/// their target with memoization; union types recurse into each subtype.
/// A nullable reference does not count unless `use_nullable_inner` is set.
pub fn idl_type_includes_dictionary(
    document: &Document,
    defs: &mut Definitions,
    idl_type: NodeIndex,
    use_nullable_inner: bool,
) -> Option<DictionaryInclusion> {
    let NodeData::Type(ty) = &document.arena[idl_type].data else {
        return None;
    };
    if !ty.union {
        if !ty.subtypes.is_empty() {
            // Generics carry their element types; the type itself is not a
            // dictionary reference.
            return None;
        }
        let name = ty.idl_type_name()?;
        let nullable = ty.nullable();
        let def = defs.unique.get(&name).copied()?;
        match &document.arena[def].data {
            NodeData::Typedef(typedef) => {
                match defs.cache.typedef_includes_dictionary.get(&def) {
                    Some(CacheState::Pending) => return None,
                    Some(CacheState::Resolved(cached)) => {
                        return cached.map(|dictionary| DictionaryInclusion {
                            reference: idl_type,
                            dictionary,
                        });
                    }
                    None => {}
                }
                defs.cache
                    .typedef_includes_dictionary
                    .insert(def, CacheState::Pending);
                let target = typedef.idl_type;
                let result = target
                    .and_then(|target| idl_type_includes_dictionary(document, defs, target, false));
                defs.cache.typedef_includes_dictionary.insert(
                    def,
                    CacheState::Resolved(result.map(|r| r.dictionary)),
                );
                result.map(|r| DictionaryInclusion {
                    reference: idl_type,
                    dictionary: r.dictionary,
                })
            }
            NodeData::Dictionary(_) if use_nullable_inner || !nullable => {
                Some(DictionaryInclusion {
                    reference: idl_type,
                    dictionary: def,
                })
            }
            _ => None,
        }
    } else {
        let subtypes = ty.subtypes.clone();
        for subtype in subtypes {
            if let Some(result) = idl_type_includes_dictionary(document, defs, subtype, false) {
                let subtype_is_union = matches!(
                    &document.arena[subtype].data,
                    NodeData::Type(inner) if inner.union
                );
                if subtype_is_union {
                    return Some(result);
                }
                return Some(DictionaryInclusion {
                    reference: subtype,
                    dictionary: result.dictionary,
                });
            }
        }
        None
    }
}

/// Whether `dictionary` or anything up its inheritance chain declares a
/// required field. An unknown superclass is assumed to have one.
pub fn dictionary_includes_required_field(
    document: &Document,
    defs: &mut Definitions,
    dictionary: NodeIndex,
) -> bool {
    match defs.cache.dictionary_includes_required_field.get(&dictionary) {
        Some(CacheState::Pending) => return false,
        Some(CacheState::Resolved(result)) => return *result,
        None => {}
    }
    defs.cache
        .dictionary_includes_required_field
        .insert(dictionary, CacheState::Pending);

    let NodeData::Dictionary(data) = &document.arena[dictionary].data else {
        return false;
    };
    let mut result = data.members.iter().any(|&field| {
        matches!(&document.arena[field].data, NodeData::Field(f) if f.required())
    });
    if !result {
        if let Some(parent) = data.inheritance() {
            result = match defs.unique.get(parent).copied() {
                Some(superdict)
                    if matches!(&document.arena[superdict].data, NodeData::Dictionary(_)) =>
                {
                    dictionary_includes_required_field(document, defs, superdict)
                }
                Some(_) => false,
                // Assume required members in the unknown inherited dictionary.
                None => true,
            };
        }
    }
    defs.cache
        .dictionary_includes_required_field
        .insert(dictionary, CacheState::Resolved(result));
    result
}

/// True when every argument after `argument` in its parent's list is
/// optional, i.e. making this one optional would be well-formed.
#[must_use]
pub fn is_last_required_argument(document: &Document, argument: NodeIndex) -> bool {
    let Some(parent) = document.arena[argument].parent else {
        return true;
    };
    let arguments: &[NodeIndex] = match &document.arena[parent].data {
        NodeData::Operation(data) => &data.arguments,
        NodeData::Constructor(data) => &data.arguments,
        NodeData::CallbackFunction(data) => &data.arguments,
        NodeData::IterableLike(data) => &data.arguments,
        NodeData::ExtendedAttribute(data) => &data.arguments,
        _ => return true,
    };
    let Some(position) = arguments.iter().position(|&a| a == argument) else {
        return true;
    };
    arguments[position + 1..].iter().all(|&later| {
        matches!(&document.arena[later].data, NodeData::Argument(a) if a.optional())
    })
}
