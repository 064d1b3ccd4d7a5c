//! Outline merger: one deduplicated forest from several contexts.
//!
//! When one file is compiled under several project contexts, each context is
//! converted against the same shared forest. Every sibling list stays sorted
//! by [`OrderKey`], so placing a candidate is a binary search that either
//! finds an equivalent node (merge) or yields the insertion point (insert).
//!
//! # Order Key
//!
//! Absolute offsets can shift between contexts, so the key is built only
//! from what identifies a declaration within its scope:
//!
//! ```text
//! (kind, name, signature, occurrence)
//! ```
//!
//! `occurrence` counts earlier siblings with the same `(kind, name,
//! signature)` in the same context and scope, so two identical declarations
//! inside one context stay distinct while the n-th one in context B still
//! finds the n-th one from context A.
//!
//! # Scope Discipline
//!
//! A `ScopeCursor` is bound to one sibling list. Descending into a node
//! creates a child cursor that borrows the node's children; returning from
//! the recursion drops it. Contexts are merged strictly one at a time.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::builder::ElementBuilder;
use crate::convert::{ConvertOptions, Converter};
use crate::element::{ElementKind, OutlineElement};
use crate::symbols::SymbolResolver;
use crate::syntax::{CompilationUnit, DeclarationNode};
use crate::text::SourceText;

// ============================================================================
// Order Key
// ============================================================================

/// Total, context-stable ordering and equivalence key for siblings.
///
/// Merged sibling lists follow this key, not source order: the members of an
/// enum merged from two contexts come out sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderKey {
    pub kind: ElementKind,
    pub name: String,
    pub signature: String,
    pub occurrence: u32,
}

impl std::fmt::Display for OrderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}({})#{}",
            self.kind, self.name, self.signature, self.occurrence
        )
    }
}

// ============================================================================
// Merge Forest
// ============================================================================

#[derive(Debug)]
struct MergeNode {
    key: OrderKey,
    /// Childless element; children live in `children` until finalized.
    element: OutlineElement,
    children: Vec<MergeNode>,
}

impl MergeNode {
    fn finish(self) -> OutlineElement {
        let mut element = self.element;
        element.children = self.children.into_iter().map(MergeNode::finish).collect();
        element
    }
}

/// Insertion point into one sibling list for one context.
struct ScopeCursor<'s> {
    siblings: &'s mut Vec<MergeNode>,
    context: &'s str,
    occurrences: HashMap<(ElementKind, String, String), u32>,
}

impl<'s> ScopeCursor<'s> {
    fn new(siblings: &'s mut Vec<MergeNode>, context: &'s str) -> Self {
        ScopeCursor {
            siblings,
            context,
            occurrences: HashMap::new(),
        }
    }

    /// Key for the next candidate seen in this scope.
    fn order_key(&mut self, element: &OutlineElement, signature: String) -> OrderKey {
        let counter = self
            .occurrences
            .entry((element.kind, element.name.clone(), signature.clone()))
            .or_insert(0);
        let occurrence = *counter;
        *counter += 1;
        OrderKey {
            kind: element.kind,
            name: element.name.clone(),
            signature,
            occurrence,
        }
    }

    /// Merge or insert `element`, then return a cursor over its children.
    fn enter(&mut self, key: OrderKey, mut element: OutlineElement) -> ScopeCursor<'_> {
        let index = match self.siblings.binary_search_by(|node| node.key.cmp(&key)) {
            Ok(index) => {
                self.siblings[index]
                    .element
                    .add_owning_context(self.context);
                trace!(%key, context = self.context, "merged into existing node");
                index
            }
            Err(index) => {
                element.add_owning_context(self.context);
                self.siblings.insert(
                    index,
                    MergeNode {
                        key,
                        element,
                        children: Vec::new(),
                    },
                );
                trace!(index, context = self.context, "inserted new node");
                index
            }
        };
        ScopeCursor::new(&mut self.siblings[index].children, self.context)
    }
}

/// Shared, single-writer forest that contexts are merged into.
#[derive(Debug, Default)]
pub struct OutlineMerger {
    roots: Vec<MergeNode>,
    contexts: Vec<String>,
}

impl OutlineMerger {
    pub fn new() -> Self {
        OutlineMerger::default()
    }

    /// Merge one context's compilation unit into the forest.
    pub fn merge(&mut self, context: &str, unit: &CompilationUnit, converter: &Converter<'_>) {
        debug!(context, members = unit.members.len(), "merging context");
        if !self.contexts.iter().any(|c| c == context) {
            self.contexts.push(context.to_string());
        }
        let mut root = ScopeCursor::new(&mut self.roots, context);
        merge_members(converter, &unit.members, &mut root);
    }

    /// Contexts merged so far, in merge order.
    pub fn contexts(&self) -> &[String] {
        &self.contexts
    }

    /// Finalize into an outline forest.
    pub fn finish(self) -> Vec<OutlineElement> {
        self.roots.into_iter().map(MergeNode::finish).collect()
    }
}

/// Depth-first, parent before children, left to right.
fn merge_members(converter: &Converter<'_>, members: &[DeclarationNode], cursor: &mut ScopeCursor<'_>) {
    for node in members {
        for candidate in converter.candidates(node) {
            let key = cursor.order_key(&candidate.element, candidate.signature);
            let mut child = cursor.enter(key, candidate.element);
            merge_members(converter, candidate.members, &mut child);
        }
    }
}

// ============================================================================
// Convenience Entry Point
// ============================================================================

/// One project context sharing the logical file.
#[derive(Clone, Copy)]
pub struct ContextInput<'a> {
    pub id: &'a str,
    pub unit: &'a CompilationUnit,
    pub text: &'a SourceText,
    pub resolver: &'a dyn SymbolResolver,
}

/// Merge `contexts` in order into one forest.
pub fn merge_contexts(
    contexts: &[ContextInput<'_>],
    builder: ElementBuilder<'_>,
    options: ConvertOptions,
) -> Vec<OutlineElement> {
    let mut merger = OutlineMerger::new();
    for input in contexts {
        let converter = Converter::new(input.text, input.resolver, builder, options);
        merger.merge(input.id, input.unit, &converter);
    }
    merger.finish()
}

// ============================================================================
// Tests
// ============================================================================
