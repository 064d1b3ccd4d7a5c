//! Tree converter: declaration nodes to an outline forest.
//!
//! Each [`DeclarationNode`] variant has one handler that turns the node into
//! zero or more [`Candidate`]s: a childless element plus the member nodes to
//! recurse into. Both the single-context converter here and the multi-context
//! merger in [`crate::merge`] consume candidates, so dispatch and span
//! selection live in exactly one place.
//!
//! ## Skipped Nodes
//!
//! - Unresolved symbol: the node and its whole subtree are dropped.
//! - [`DeclarationNode::Unknown`]: the node is skipped, siblings continue.
//!
//! Neither is an error.

use tracing::{debug, trace};

use crate::builder::ElementBuilder;
use crate::element::OutlineElement;
use crate::ranges::DeclarationSpans;
use crate::symbols::{ResolvedSymbol, SymbolResolver};
use crate::syntax::{
    CompilationUnit, DeclarationNode, DelegateDeclaration, EnumBlock, EnumMemberDeclaration,
    EventBlock, FieldDeclaration, MethodBlock, NamespaceBlock, NodeId, PropertyBlock, TypeBlock,
};
use crate::text::SourceText;

/// Conversion switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Emit property and event accessors as children.
    pub expose_accessors: bool,
}

/// One element produced by a handler, before its children are attached.
#[derive(Debug)]
pub struct Candidate<'u> {
    pub element: OutlineElement,
    /// Member nodes to convert as children.
    pub members: &'u [DeclarationNode],
    /// Normalized parameter types; part of the merge order key.
    pub signature: String,
}

/// Converter for one context: one source text and one resolver.
pub struct Converter<'a> {
    text: &'a SourceText,
    resolver: &'a dyn SymbolResolver,
    builder: ElementBuilder<'a>,
    options: ConvertOptions,
}

impl<'a> Converter<'a> {
    pub fn new(
        text: &'a SourceText,
        resolver: &'a dyn SymbolResolver,
        builder: ElementBuilder<'a>,
        options: ConvertOptions,
    ) -> Self {
        Converter {
            text,
            resolver,
            builder,
            options,
        }
    }

    /// Convert a compilation unit's top-level members.
    pub fn convert_unit(&self, unit: &CompilationUnit) -> Vec<OutlineElement> {
        self.convert(&unit.members)
    }

    /// Convert a member list, attaching children in source order.
    pub fn convert(&self, members: &[DeclarationNode]) -> Vec<OutlineElement> {
        let mut out = Vec::with_capacity(members.len());
        for node in members {
            for candidate in self.candidates(node) {
                let mut element = candidate.element;
                element.children = self.convert(candidate.members);
                out.push(element);
            }
        }
        out
    }

    /// Dispatch one node to its category handler.
    pub fn candidates<'u>(&self, node: &'u DeclarationNode) -> Vec<Candidate<'u>> {
        match node {
            DeclarationNode::Type(block) => self.type_block(block).into_iter().collect(),
            DeclarationNode::Delegate(decl) => self.delegate(decl).into_iter().collect(),
            DeclarationNode::Enum(block) => self.enum_block(block).into_iter().collect(),
            DeclarationNode::Namespace(block) => self.namespace(block).into_iter().collect(),
            DeclarationNode::Method(block) => self.method(block).into_iter().collect(),
            DeclarationNode::Property(block) => self.property(block).into_iter().collect(),
            DeclarationNode::Event(block) => self.event(block).into_iter().collect(),
            DeclarationNode::Field(decl) => self.fields(decl),
            DeclarationNode::EnumMember(decl) => self.enum_member(decl).into_iter().collect(),
            DeclarationNode::Unknown => {
                debug!(category = ?node.category(), "skipping unrecognized declaration");
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------------

    fn type_block<'u>(&self, block: &'u TypeBlock) -> Option<Candidate<'u>> {
        let spans = DeclarationSpans {
            attributes: block.attributes,
            full: block.full,
            name: block.identifier,
        };
        self.candidate(block.id, &spans, &block.members)
    }

    fn delegate<'u>(&self, decl: &'u DelegateDeclaration) -> Option<Candidate<'u>> {
        let spans = DeclarationSpans {
            attributes: decl.attributes,
            full: decl.full,
            name: decl.identifier,
        };
        self.candidate(decl.id, &spans, &[])
    }

    fn enum_block<'u>(&self, block: &'u EnumBlock) -> Option<Candidate<'u>> {
        let spans = DeclarationSpans {
            attributes: block.attributes,
            full: block.full,
            name: block.identifier,
        };
        self.candidate(block.id, &spans, &block.members)
    }

    fn namespace<'u>(&self, block: &'u NamespaceBlock) -> Option<Candidate<'u>> {
        let spans = DeclarationSpans {
            attributes: None,
            full: block.full,
            name: block.name,
        };
        self.candidate(block.id, &spans, &block.members)
    }

    fn method<'u>(&self, block: &'u MethodBlock) -> Option<Candidate<'u>> {
        let spans = DeclarationSpans {
            attributes: block.attributes,
            full: block.full,
            name: block.name_span(),
        };
        self.candidate(block.id, &spans, &[])
    }

    fn property<'u>(&self, block: &'u PropertyBlock) -> Option<Candidate<'u>> {
        let spans = DeclarationSpans {
            attributes: block.attributes,
            full: block.full,
            name: block.identifier,
        };
        self.candidate(block.id, &spans, self.accessors(&block.accessors))
    }

    fn event<'u>(&self, block: &'u EventBlock) -> Option<Candidate<'u>> {
        let spans = DeclarationSpans {
            attributes: block.attributes,
            full: block.full,
            name: block.identifier,
        };
        self.candidate(block.id, &spans, self.accessors(&block.accessors))
    }

    /// One candidate per declarator, sharing the statement's spans.
    fn fields<'u>(&self, decl: &'u FieldDeclaration) -> Vec<Candidate<'u>> {
        decl.declarators
            .iter()
            .filter_map(|declarator| {
                let spans = DeclarationSpans {
                    attributes: decl.attributes,
                    full: decl.full,
                    name: declarator.identifier,
                };
                self.candidate(declarator.id, &spans, &[])
            })
            .collect()
    }

    fn enum_member<'u>(&self, decl: &'u EnumMemberDeclaration) -> Option<Candidate<'u>> {
        let spans = DeclarationSpans {
            attributes: decl.attributes,
            full: decl.full,
            name: decl.identifier,
        };
        self.candidate(decl.id, &spans, &[])
    }

    fn accessors<'u>(&self, accessors: &'u [DeclarationNode]) -> &'u [DeclarationNode] {
        if self.options.expose_accessors {
            accessors
        } else {
            &[]
        }
    }

    /// Resolve, build, and pair with members. `None` drops the subtree.
    fn candidate<'u>(
        &self,
        id: NodeId,
        spans: &DeclarationSpans,
        members: &'u [DeclarationNode],
    ) -> Option<Candidate<'u>> {
        let symbol = self.resolver.resolve(id);
        let Some(element) = self.builder.build(self.text, spans, symbol.as_ref()) else {
            trace!(node = %id, "no element for node");
            return None;
        };
        let signature = symbol
            .as_ref()
            .map(ResolvedSymbol::signature_key)
            .unwrap_or_default();
        Some(Candidate {
            element,
            members,
            signature,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
