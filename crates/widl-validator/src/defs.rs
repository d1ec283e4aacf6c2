//! The definition index built after parsing: name tables over the
//! top-level definitions, plus memoization for the recursive analyses.

use rustc_hash::FxHashMap;
use widl_parser::{Document, NodeData, NodeIndex};

/// One entry of an analysis cache.
///
/// An absent entry means "not computed". `Pending` marks a computation in
/// progress and doubles as the cycle guard: re-entering a pending entry
/// yields the analysis' pessimistic answer instead of recursing forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheState<T> {
    Pending,
    Resolved(T),
}

/// Memoization tables for the recursive analyses, keyed by definition.
#[derive(Clone, Debug, Default)]
pub struct AnalysisCache {
    /// For a typedef: the dictionary its target ultimately references.
    pub typedef_includes_dictionary: FxHashMap<NodeIndex, CacheState<Option<NodeIndex>>>,
    /// For a dictionary: whether its inheritance chain has a required field.
    pub dictionary_includes_required_field: FxHashMap<NodeIndex, CacheState<bool>>,
}

/// Name tables over a document's top-level definitions.
#[derive(Clone, Debug, Default)]
pub struct Definitions {
    /// The original top-level sequence.
    pub all: Vec<NodeIndex>,
    /// Non-partial definitions by name, first declaration wins.
    pub unique: FxHashMap<String, NodeIndex>,
    /// Later definitions whose name was already taken.
    pub duplicates: Vec<NodeIndex>,
    /// Partial fragments grouped by name.
    pub partials: FxHashMap<String, Vec<NodeIndex>>,
    /// `A includes B;` statements in source order.
    pub includes: Vec<NodeIndex>,
    /// Mixin definitions by name.
    pub mixins: FxHashMap<String, NodeIndex>,
    pub cache: AnalysisCache,
}

impl Definitions {
    /// Index a document's definitions. Duplicate-name diagnostics are the
    /// validator's job; indexing only groups.
    #[must_use]
    pub fn build(document: &Document) -> Definitions {
        let mut defs = Definitions {
            all: document.definitions.clone(),
            ..Default::default()
        };
        for &index in &document.definitions {
            let data = &document.arena[index].data;
            if let NodeData::Includes(_) = data {
                defs.includes.push(index);
                continue;
            }
            let Some(name) = data.definition_name() else {
                continue;
            };
            if data.is_partial() {
                defs.partials.entry(name.to_string()).or_default().push(index);
                continue;
            }
            if let NodeData::Mixin(_) = data {
                defs.mixins.insert(name.to_string(), index);
            }
            if defs.unique.contains_key(name) {
                defs.duplicates.push(index);
            } else {
                defs.unique.insert(name.to_string(), index);
            }
        }
        defs
    }
}
