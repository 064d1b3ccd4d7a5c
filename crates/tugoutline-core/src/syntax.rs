//! Declaration node model supplied by a language front end.
//!
//! The front end (lexer, parser, binder) is external. It hands over a
//! compilation unit: a list of [`DeclarationNode`]s with character spans and
//! per-node ids that its [`SymbolResolver`](crate::symbols::SymbolResolver)
//! understands.
//!
//! # Node Ids
//!
//! - Ids are only meaningful within one context; the same declaration may
//!   carry different ids in different contexts.
//! - A field statement declares several names; each [`FieldDeclarator`] has
//!   its own id because each name resolves to its own symbol.
//!
//! # Categories
//!
//! [`DeclarationNode`] is closed over the categories the converter handles.
//! Anything else deserializes to [`DeclarationNode::Unknown`], which the
//! converter skips.

use serde::{Deserialize, Serialize};

use crate::text::TextSpan;

/// Per-context identifier of a declaration node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID.
    pub fn new(id: u32) -> Self {
        NodeId(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

// ============================================================================
// Compilation Unit
// ============================================================================

/// Top-level member list of one parsed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationUnit {
    #[serde(default)]
    pub members: Vec<DeclarationNode>,
}

impl CompilationUnit {
    pub fn new(members: Vec<DeclarationNode>) -> Self {
        CompilationUnit { members }
    }
}

// ============================================================================
// Declaration Nodes
// ============================================================================

/// Declaration category discriminant, used for handler lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationCategory {
    Type,
    Delegate,
    Enum,
    Namespace,
    Method,
    Property,
    Event,
    Field,
    EnumMember,
    Unknown,
}

/// A declaration supplied by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum DeclarationNode {
    /// Class, structure, interface or module block.
    Type(TypeBlock),
    /// Delegate signature.
    Delegate(DelegateDeclaration),
    Enum(EnumBlock),
    Namespace(NamespaceBlock),
    /// Method, constructor, operator or accessor block.
    Method(MethodBlock),
    Property(PropertyBlock),
    Event(EventBlock),
    /// One field statement declaring one or more names.
    Field(FieldDeclaration),
    EnumMember(EnumMemberDeclaration),
    /// A declaration form outside the handled set.
    #[serde(other)]
    Unknown,
}

impl DeclarationNode {
    /// Category of this node.
    pub fn category(&self) -> DeclarationCategory {
        match self {
            DeclarationNode::Type(_) => DeclarationCategory::Type,
            DeclarationNode::Delegate(_) => DeclarationCategory::Delegate,
            DeclarationNode::Enum(_) => DeclarationCategory::Enum,
            DeclarationNode::Namespace(_) => DeclarationCategory::Namespace,
            DeclarationNode::Method(_) => DeclarationCategory::Method,
            DeclarationNode::Property(_) => DeclarationCategory::Property,
            DeclarationNode::Event(_) => DeclarationCategory::Event,
            DeclarationNode::Field(_) => DeclarationCategory::Field,
            DeclarationNode::EnumMember(_) => DeclarationCategory::EnumMember,
            DeclarationNode::Unknown => DeclarationCategory::Unknown,
        }
    }
}

/// Class, structure, interface or module block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBlock {
    pub id: NodeId,
    #[serde(default)]
    pub attributes: Option<TextSpan>,
    pub full: TextSpan,
    /// Identifier token.
    #[serde(default)]
    pub identifier: Option<TextSpan>,
    #[serde(default)]
    pub members: Vec<DeclarationNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateDeclaration {
    pub id: NodeId,
    #[serde(default)]
    pub attributes: Option<TextSpan>,
    pub full: TextSpan,
    #[serde(default)]
    pub identifier: Option<TextSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumBlock {
    pub id: NodeId,
    #[serde(default)]
    pub attributes: Option<TextSpan>,
    pub full: TextSpan,
    #[serde(default)]
    pub identifier: Option<TextSpan>,
    #[serde(default)]
    pub members: Vec<DeclarationNode>,
}

/// Namespace block. Namespaces carry no attribute list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceBlock {
    pub id: NodeId,
    pub full: TextSpan,
    /// Span of the (possibly dotted) namespace name.
    #[serde(default)]
    pub name: Option<TextSpan>,
    #[serde(default)]
    pub members: Vec<DeclarationNode>,
}

/// Syntactic flavor of a method-like block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodBlockKind {
    /// Plain method (`Sub`/`Function`).
    Ordinary,
    Constructor,
    Operator,
    /// Property or event accessor (`Get`, `Set`, `AddHandler`, ...).
    Accessor,
}

/// Method-like block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodBlock {
    pub id: NodeId,
    pub kind: MethodBlockKind,
    #[serde(default)]
    pub attributes: Option<TextSpan>,
    pub full: TextSpan,
    /// Declared identifier, or operator token for operators.
    #[serde(default)]
    pub identifier: Option<TextSpan>,
    /// Declaring keyword: `New` for constructors, `Get`/`Set`/... for accessors.
    #[serde(default)]
    pub keyword: Option<TextSpan>,
}

impl MethodBlock {
    /// Span naming this block. Total over [`MethodBlockKind`]; `None` only
    /// when the front end did not supply the relevant token.
    pub fn name_span(&self) -> Option<TextSpan> {
        match self.kind {
            MethodBlockKind::Accessor | MethodBlockKind::Constructor => self.keyword,
            MethodBlockKind::Ordinary | MethodBlockKind::Operator => self.identifier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyBlock {
    pub id: NodeId,
    #[serde(default)]
    pub attributes: Option<TextSpan>,
    pub full: TextSpan,
    #[serde(default)]
    pub identifier: Option<TextSpan>,
    /// Accessor method blocks, in source order.
    #[serde(default)]
    pub accessors: Vec<DeclarationNode>,
}

/// Event declaration; custom events carry accessor blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBlock {
    pub id: NodeId,
    #[serde(default)]
    pub attributes: Option<TextSpan>,
    pub full: TextSpan,
    #[serde(default)]
    pub identifier: Option<TextSpan>,
    #[serde(default)]
    pub accessors: Vec<DeclarationNode>,
}

/// A field statement (`Dim x, y As Integer`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    #[serde(default)]
    pub attributes: Option<TextSpan>,
    /// Span of the whole statement, shared by every declared name.
    pub full: TextSpan,
    pub declarators: Vec<FieldDeclarator>,
}

/// One name declared by a field statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeclarator {
    pub id: NodeId,
    #[serde(default)]
    pub identifier: Option<TextSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMemberDeclaration {
    pub id: NodeId,
    #[serde(default)]
    pub attributes: Option<TextSpan>,
    pub full: TextSpan,
    #[serde(default)]
    pub identifier: Option<TextSpan>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(kind: MethodBlockKind) -> MethodBlock {
        MethodBlock {
            id: NodeId::new(1),
            kind,
            attributes: None,
            full: TextSpan::new(0, 40),
            identifier: Some(TextSpan::new(4, 10)),
            keyword: Some(TextSpan::new(0, 3)),
        }
    }

    #[test]
    fn method_name_span_is_kind_specific() {
        assert_eq!(
            method(MethodBlockKind::Ordinary).name_span(),
            Some(TextSpan::new(4, 10))
        );
        assert_eq!(
            method(MethodBlockKind::Operator).name_span(),
            Some(TextSpan::new(4, 10))
        );
        assert_eq!(
            method(MethodBlockKind::Constructor).name_span(),
            Some(TextSpan::new(0, 3))
        );
        assert_eq!(
            method(MethodBlockKind::Accessor).name_span(),
            Some(TextSpan::new(0, 3))
        );
    }

    #[test]
    fn missing_keyword_leaves_constructor_unnamed() {
        let mut ctor = method(MethodBlockKind::Constructor);
        ctor.keyword = None;
        assert_eq!(ctor.name_span(), None);
    }

    #[test]
    fn deserializes_tagged_nodes() {
        let json = r#"[
            {"node": "type", "id": 1, "full": {"start": 0, "end": 30},
             "identifier": {"start": 6, "end": 11},
             "members": [
                {"node": "field", "full": {"start": 13, "end": 20},
                 "declarators": [{"id": 2, "identifier": {"start": 17, "end": 18}}]}
             ]},
            {"node": "option_statement"}
        ]"#;
        let nodes: Vec<DeclarationNode> = serde_json::from_str(json).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].category(), DeclarationCategory::Type);
        assert_eq!(nodes[1], DeclarationNode::Unknown);
        let DeclarationNode::Type(block) = &nodes[0] else {
            panic!("expected type block");
        };
        assert_eq!(block.members[0].category(), DeclarationCategory::Field);
    }
}
