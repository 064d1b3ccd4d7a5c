//! Outline element model: the uniform output node for one declaration.
//!
//! An [`OutlineElement`] carries:
//! - a semantic [`ElementKind`]
//! - a short `name` for the outline row and a qualified `display_name`
//! - up to three ranges keyed by [`RangeTag`] (`Full` is always present)
//! - ordered [`Properties`] (baseline entries first, then provider entries)
//! - ordered children
//! - the owning contexts that produced it (multi-context merges only)

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::types::TextRange;

// ============================================================================
// Element Kind
// ============================================================================

/// Declaration category of an outline element.
///
/// The variant order is the kind rank used by merged sibling ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Namespace,
    /// Class-like type (class, structure, module).
    Class,
    Interface,
    Enum,
    Delegate,
    EnumMember,
    Field,
    Constructor,
    Property,
    Event,
    Method,
}

impl ElementKind {
    /// Output name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Namespace => "namespace",
            ElementKind::Class => "class",
            ElementKind::Interface => "interface",
            ElementKind::Enum => "enum",
            ElementKind::Delegate => "delegate",
            ElementKind::EnumMember => "enum_member",
            ElementKind::Field => "field",
            ElementKind::Constructor => "constructor",
            ElementKind::Property => "property",
            ElementKind::Event => "event",
            ElementKind::Method => "method",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Ranges
// ============================================================================

/// Tag identifying one of an element's ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeTag {
    /// The whole declaration, attribute list included.
    Full,
    /// The identifier (or keyword) naming the declaration.
    Name,
    /// The attribute/annotation list preceding the declaration.
    Attributes,
}

/// Mapping from range tag to line/column range.
pub type OutlineRanges = BTreeMap<RangeTag, TextRange>;

// ============================================================================
// Properties
// ============================================================================

/// A scalar property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<usize> for PropertyValue {
    fn from(value: usize) -> Self {
        PropertyValue::Int(value as i64)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

/// Insertion-ordered string-keyed property map.
///
/// Serializes as a JSON object whose key order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, PropertyValue)>,
}

impl Properties {
    /// Create an empty property map.
    pub fn new() -> Self {
        Properties::default()
    }

    /// Insert a property. An existing key keeps its position and takes the
    /// new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a property by key.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// ============================================================================
// OutlineElement
// ============================================================================

/// One node of an outline tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineElement {
    pub kind: ElementKind,
    /// Short display form, used for the outline row.
    pub name: String,
    /// Qualified, signature-level display form.
    pub display_name: String,
    pub ranges: OutlineRanges,
    pub properties: Properties,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineElement>,
    /// Contexts that produced an equivalent node, in first-insertion order.
    /// Empty in single-context mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub owning_contexts: Vec<String>,
}

impl OutlineElement {
    /// Create a childless element with no properties.
    pub fn new(
        kind: ElementKind,
        name: impl Into<String>,
        display_name: impl Into<String>,
        ranges: OutlineRanges,
    ) -> Self {
        OutlineElement {
            kind,
            name: name.into(),
            display_name: display_name.into(),
            ranges,
            properties: Properties::new(),
            children: Vec::new(),
            owning_contexts: Vec::new(),
        }
    }

    /// Look up one of the element's ranges.
    pub fn range(&self, tag: RangeTag) -> Option<&TextRange> {
        self.ranges.get(&tag)
    }

    /// Whether the element has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Record a context as an owner. Returns `false` if it was already present.
    pub fn add_owning_context(&mut self, context: &str) -> bool {
        if self.owning_contexts.iter().any(|c| c == context) {
            return false;
        }
        self.owning_contexts.push(context.to_string());
        true
    }

    /// Number of elements in this subtree, self included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(OutlineElement::subtree_len)
            .sum::<usize>()
    }
}

// ============================================================================
// Tests
// ============================================================================
