//! Resolved symbols and the resolver seam.
//!
//! The semantic resolver is external. For every declaration node it either
//! returns a [`ResolvedSymbol`] or reports "unresolved" (`None`), which can
//! happen on malformed or partially bound code.
//!
//! # Display Forms
//!
//! Two formatting granularities are derived from a symbol:
//! - [`ResolvedSymbol::short_display`]: the outline row (`Add(Integer, Integer)`)
//! - [`ResolvedSymbol::qualified_display`]: tooltip-level detail
//!   (`Geometry.Point.Add(x: Integer, y: Integer): Integer`)
//!
//! Both are independent of source formatting: type names and identifiers are
//! whitespace-normalized before they are joined.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::syntax::NodeId;

// ============================================================================
// Symbol Kind
// ============================================================================

/// Semantic category of a resolved symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Namespace,
    Class,
    Structure,
    Module,
    Interface,
    Enum,
    Delegate,
    Method,
    Constructor,
    Operator,
    /// Property or event accessor.
    Accessor,
    Property,
    Event,
    Field,
    EnumMember,
}

impl SymbolKind {
    /// Whether symbols of this kind have a parameter list in their display form.
    pub fn has_parameter_list(&self) -> bool {
        matches!(
            self,
            SymbolKind::Method
                | SymbolKind::Constructor
                | SymbolKind::Operator
                | SymbolKind::Accessor
                | SymbolKind::Delegate
        )
    }
}

// ============================================================================
// Accessibility and Modifiers
// ============================================================================

/// Declared accessibility of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    Public,
    Protected,
    /// `Friend` / `internal`.
    Internal,
    ProtectedInternal,
    PrivateProtected,
    Private,
}

impl Accessibility {
    /// Output string for the `accessibility` property.
    pub fn as_str(&self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Protected => "protected",
            Accessibility::Internal => "internal",
            Accessibility::ProtectedInternal => "protected_internal",
            Accessibility::PrivateProtected => "private_protected",
            Accessibility::Private => "private",
        }
    }
}

/// Declaration modifier on a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Abstract,
    /// `NotInheritable` / `sealed`.
    Sealed,
    /// `Overridable` / `virtual`.
    Virtual,
    /// `Overrides` / `override`.
    Override,
    ReadOnly,
    Const,
    Async,
    Partial,
    /// `Shadows` / `new`.
    Shadows,
    Extern,
}

impl Modifier {
    /// Property key suffix for this modifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Abstract => "abstract",
            Modifier::Sealed => "sealed",
            Modifier::Virtual => "virtual",
            Modifier::Override => "override",
            Modifier::ReadOnly => "readOnly",
            Modifier::Const => "const",
            Modifier::Async => "async",
            Modifier::Partial => "partial",
            Modifier::Shadows => "shadows",
            Modifier::Extern => "extern",
        }
    }
}

/// A parameter of a method-like symbol or indexed property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

// ============================================================================
// ResolvedSymbol
// ============================================================================

/// Semantic information about one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSymbol {
    pub kind: SymbolKind,
    pub name: String,
    /// Enclosing namespaces and types, outermost first.
    #[serde(default)]
    pub containers: Vec<String>,
    /// `None` when the symbol has no defined accessibility (namespaces).
    #[serde(default)]
    pub accessibility: Option<Accessibility>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Return type for methods, member type for fields/properties/events.
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl ResolvedSymbol {
    /// Create a symbol with no container, accessibility, or signature.
    pub fn new(kind: SymbolKind, name: impl Into<String>) -> Self {
        ResolvedSymbol {
            kind,
            name: name.into(),
            containers: Vec::new(),
            accessibility: None,
            is_static: false,
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type: None,
            modifiers: Vec::new(),
        }
    }

    /// Set the enclosing container path.
    pub fn in_containers<I, S>(mut self, containers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.containers = containers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = Some(accessibility);
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_type_parameters<I, S>(mut self, type_parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_parameters = type_parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
        self
    }

    fn has_parameter_list(&self) -> bool {
        self.kind.has_parameter_list() || !self.parameters.is_empty()
    }

    fn name_with_type_parameters(&self) -> String {
        let name = normalize_whitespace(&self.name);
        if self.type_parameters.is_empty() {
            return name;
        }
        let params: Vec<String> = self
            .type_parameters
            .iter()
            .map(|p| normalize_whitespace(p))
            .collect();
        format!("{}<{}>", name, params.join(", "))
    }

    /// Short form for the outline row.
    ///
    /// Method-like symbols and indexed properties list their parameter types
    /// so overloads stay distinguishable.
    pub fn short_display(&self) -> String {
        let name = self.name_with_type_parameters();
        if !self.has_parameter_list() {
            return name;
        }
        let types: Vec<String> = self
            .parameters
            .iter()
            .map(|p| normalize_whitespace(&p.type_name))
            .collect();
        format!("{}({})", name, types.join(", "))
    }

    /// Fully qualified, signature-level form.
    pub fn qualified_display(&self) -> String {
        let mut out = String::new();
        for container in &self.containers {
            out.push_str(&normalize_whitespace(container));
            out.push('.');
        }
        out.push_str(&self.name_with_type_parameters());

        if self.has_parameter_list() {
            let params: Vec<String> = self
                .parameters
                .iter()
                .map(|p| {
                    format!(
                        "{}: {}",
                        normalize_whitespace(&p.name),
                        normalize_whitespace(&p.type_name)
                    )
                })
                .collect();
            out.push('(');
            out.push_str(&params.join(", "));
            out.push(')');
        }

        if let Some(return_type) = &self.return_type {
            out.push_str(": ");
            out.push_str(&normalize_whitespace(return_type));
        }
        out
    }

    /// Comma-joined normalized parameter types. Empty for parameterless symbols.
    pub fn signature_key(&self) -> String {
        self.parameters
            .iter()
            .map(|p| normalize_whitespace(&p.type_name))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Collapse whitespace runs and drop whitespace around punctuation, so
/// `List( Of  T )` and `List(Of T)` format identically.
pub fn normalize_whitespace(text: &str) -> String {
    const TIGHT_AFTER: &[char] = &['(', '<', '[', '.'];
    const TIGHT_BEFORE: &[char] = &[')', '>', ']', '.', ','];

    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            let prev_tight = out.chars().last().is_some_and(|p| TIGHT_AFTER.contains(&p));
            if !prev_tight && !TIGHT_BEFORE.contains(&ch) {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(ch);
        if ch == ',' {
            pending_space = true;
        }
    }
    out
}

// ============================================================================
// Resolver
// ============================================================================

/// Semantic resolver for one context.
pub trait SymbolResolver {
    /// Resolve a declaration node; `None` means "unresolved".
    fn resolve(&self, node: NodeId) -> Option<ResolvedSymbol>;
}

/// In-memory resolver backed by a node-id keyed table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTable {
    symbols: HashMap<NodeId, ResolvedSymbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn insert(&mut self, node: NodeId, symbol: ResolvedSymbol) {
        self.symbols.insert(node, symbol);
    }

    pub fn get(&self, node: NodeId) -> Option<&ResolvedSymbol> {
        self.symbols.get(&node)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl FromIterator<(NodeId, ResolvedSymbol)> for SymbolTable {
    fn from_iter<T: IntoIterator<Item = (NodeId, ResolvedSymbol)>>(iter: T) -> Self {
        SymbolTable {
            symbols: iter.into_iter().collect(),
        }
    }
}

impl SymbolResolver for SymbolTable {
    fn resolve(&self, node: NodeId) -> Option<ResolvedSymbol> {
        self.symbols.get(&node).cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn add_method() -> ResolvedSymbol {
        ResolvedSymbol::new(SymbolKind::Method, "Add")
            .in_containers(["Geometry", "Point"])
            .with_accessibility(Accessibility::Public)
            .with_parameters(vec![
                Parameter::new("x", "Integer"),
                Parameter::new("y", "Integer"),
            ])
            .with_return_type("Integer")
    }

    mod display_tests {
        use super::*;

        #[test]
        fn short_form_lists_parameter_types() {
            assert_eq!(add_method().short_display(), "Add(Integer, Integer)");
        }

        #[test]
        fn qualified_form_includes_containers_and_return_type() {
            assert_eq!(
                add_method().qualified_display(),
                "Geometry.Point.Add(x: Integer, y: Integer): Integer"
            );
        }

        #[test]
        fn parameterless_method_keeps_empty_parens() {
            let symbol = ResolvedSymbol::new(SymbolKind::Method, "Run");
            assert_eq!(symbol.short_display(), "Run()");
            assert_eq!(symbol.qualified_display(), "Run()");
        }

        #[test]
        fn field_has_no_parameter_list() {
            let symbol = ResolvedSymbol::new(SymbolKind::Field, "x")
                .in_containers(["Point"])
                .with_return_type("Integer");
            assert_eq!(symbol.short_display(), "x");
            assert_eq!(symbol.qualified_display(), "Point.x: Integer");
        }

        #[test]
        fn generic_type_shows_type_parameters() {
            let symbol =
                ResolvedSymbol::new(SymbolKind::Class, "Cache").with_type_parameters(["TKey", "TValue"]);
            assert_eq!(symbol.short_display(), "Cache<TKey, TValue>");
        }

        #[test]
        fn indexed_property_lists_parameters() {
            let symbol = ResolvedSymbol::new(SymbolKind::Property, "Item")
                .with_parameters(vec![Parameter::new("index", "Integer")]);
            assert_eq!(symbol.short_display(), "Item(Integer)");
        }

        #[test]
        fn source_whitespace_does_not_leak_into_display() {
            let tight = ResolvedSymbol::new(SymbolKind::Method, "Load")
                .with_parameters(vec![Parameter::new("items", "List(Of String)")]);
            let loose = ResolvedSymbol::new(SymbolKind::Method, "Load")
                .with_parameters(vec![Parameter::new(" items ", "List(  Of\n String )")]);
            assert_eq!(tight.short_display(), loose.short_display());
            assert_eq!(tight.qualified_display(), loose.qualified_display());
        }
    }

    #[test]
    fn normalize_whitespace_rules() {
        assert_eq!(normalize_whitespace("  a   b  "), "a b");
        assert_eq!(normalize_whitespace("Dictionary( Of  K , V )"), "Dictionary(Of K, V)");
        assert_eq!(normalize_whitespace("System . Text"), "System.Text");
        assert_eq!(normalize_whitespace("Pair(Of K,V)"), "Pair(Of K, V)");
    }

    #[test]
    fn signature_key_is_type_only() {
        assert_eq!(add_method().signature_key(), "Integer,Integer");
    }

    #[test]
    fn with_modifier_deduplicates() {
        let symbol = ResolvedSymbol::new(SymbolKind::Method, "M")
            .with_modifier(Modifier::Async)
            .with_modifier(Modifier::Async);
        assert_eq!(symbol.modifiers, vec![Modifier::Async]);
    }

    #[test]
    fn symbol_table_resolves_by_node_id() {
        let table: SymbolTable = [(NodeId::new(3), add_method())].into_iter().collect();
        assert_eq!(table.resolve(NodeId::new(3)).unwrap().name, "Add");
        assert!(table.resolve(NodeId::new(4)).is_none());
    }

    #[test]
    fn symbol_table_deserializes_from_object_keyed_by_id() {
        let json = r#"{"7": {"kind": "field", "name": "x", "accessibility": "private"}}"#;
        let table: SymbolTable = serde_json::from_str(json).unwrap();
        let symbol = table.get(NodeId::new(7)).unwrap();
        assert_eq!(symbol.kind, SymbolKind::Field);
        assert_eq!(symbol.accessibility, Some(Accessibility::Private));
        assert!(!symbol.is_static);
    }
}
