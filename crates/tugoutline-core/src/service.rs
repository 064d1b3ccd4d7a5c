//! Request-level outline service.
//!
//! The service answers "give me the outline for file X". Documents come from
//! a [`DocumentSource`]; a file the source does not know (or has no contexts
//! for yet) yields `None`, which callers report as "no outline available".
//!
//! ## Modes
//!
//! - One context, or merging disabled: the first context is converted on its
//!   own and elements carry no owning contexts.
//! - Several contexts with merging enabled: contexts are merged in the order
//!   the source lists them.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::builder::ElementBuilder;
use crate::config::OutlineConfig;
use crate::convert::{ConvertOptions, Converter};
use crate::element::OutlineElement;
use crate::error::OutlineError;
use crate::merge::OutlineMerger;
use crate::provider::ProviderRegistry;
use crate::symbols::SymbolTable;
use crate::syntax::CompilationUnit;
use crate::text::SourceText;

// ============================================================================
// Documents
// ============================================================================

/// One project context's view of a file.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    /// Context identifier (project name).
    pub name: String,
    pub text: SourceText,
    pub unit: CompilationUnit,
    pub symbols: SymbolTable,
}

/// A logical file and every context that compiles it.
#[derive(Debug, Clone)]
pub struct Document {
    pub file: String,
    pub contexts: Vec<DocumentContext>,
}

/// Supplier of parsed and resolved documents.
pub trait DocumentSource {
    /// The document for `file`, or `None` if it is not available.
    fn document(&self, file: &str) -> Option<&Document>;
}

/// In-memory document source keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: BTreeMap<String, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        DocumentStore::default()
    }

    /// Add or replace a document.
    pub fn insert(&mut self, document: Document) {
        self.documents.insert(document.file.clone(), document);
    }

    /// Known file names, sorted.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for DocumentStore {
    fn document(&self, file: &str) -> Option<&Document> {
        self.documents.get(file)
    }
}

// ============================================================================
// Service
// ============================================================================

/// A finished outline for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    pub file: String,
    /// Contexts that contributed, in processing order.
    pub contexts: Vec<String>,
    pub elements: Vec<OutlineElement>,
}

/// Builds outlines with a fixed provider registry and options.
#[derive(Debug)]
pub struct OutlineService {
    providers: ProviderRegistry,
    options: ConvertOptions,
    merge_contexts: bool,
}

impl OutlineService {
    pub fn new(providers: ProviderRegistry, options: ConvertOptions, merge_contexts: bool) -> Self {
        OutlineService {
            providers,
            options,
            merge_contexts,
        }
    }

    /// Service configured from an [`OutlineConfig`].
    pub fn from_config(config: &OutlineConfig) -> Result<Self, OutlineError> {
        Ok(OutlineService::new(
            config.registry()?,
            config.convert_options(),
            config.outline.merge_contexts,
        ))
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Build the outline for `file`. `None` means no outline is available.
    pub fn outline_for(&self, source: &dyn DocumentSource, file: &str) -> Option<Outline> {
        let Some(document) = source.document(file) else {
            debug!(file, "document not available");
            return None;
        };
        let Some(first) = document.contexts.first() else {
            debug!(file, "document has no contexts");
            return None;
        };

        let builder = ElementBuilder::new(&self.providers);
        let outline = if self.merge_contexts && document.contexts.len() > 1 {
            let mut merger = OutlineMerger::new();
            for context in &document.contexts {
                let converter =
                    Converter::new(&context.text, &context.symbols, builder, self.options);
                merger.merge(&context.name, &context.unit, &converter);
            }
            let contexts = merger.contexts().to_vec();
            Outline {
                file: document.file.clone(),
                contexts,
                elements: merger.finish(),
            }
        } else {
            let converter = Converter::new(&first.text, &first.symbols, builder, self.options);
            Outline {
                file: document.file.clone(),
                contexts: vec![first.name.clone()],
                elements: converter.convert_unit(&first.unit),
            }
        };

        info!(
            file,
            contexts = outline.contexts.len(),
            elements = outline.elements.iter().map(OutlineElement::subtree_len).sum::<usize>(),
            "outline built"
        );
        Some(outline)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{ResolvedSymbol, SymbolKind};
    use crate::syntax::{DeclarationNode, NodeId, TypeBlock};
    use crate::text::TextSpan;

    fn context(name: &str, class: &str) -> DocumentContext {
        let source = format!("Class {}\nEnd Class", class);
        let len = source.chars().count() as u32;
        let unit = CompilationUnit::new(vec![DeclarationNode::Type(TypeBlock {
            id: NodeId::new(1),
            attributes: None,
            full: TextSpan::new(0, len),
            identifier: Some(TextSpan::new(6, 6 + class.len() as u32)),
            members: Vec::new(),
        })]);
        let symbols: SymbolTable = [(NodeId::new(1), ResolvedSymbol::new(SymbolKind::Class, class))]
            .into_iter()
            .collect();
        DocumentContext {
            name: name.to_string(),
            text: SourceText::new(source),
            unit,
            symbols,
        }
    }

    fn store() -> DocumentStore {
        let mut store = DocumentStore::new();
        store.insert(Document {
            file: "Shapes.vb".to_string(),
            contexts: vec![context("ProjectA", "Circle"), context("ProjectB", "Square")],
        });
        store.insert(Document {
            file: "Empty.vb".to_string(),
            contexts: Vec::new(),
        });
        store
    }

    #[test]
    fn unknown_file_is_unavailable() {
        let service = OutlineService::new(ProviderRegistry::new(), ConvertOptions::default(), true);
        assert!(service.outline_for(&store(), "Missing.vb").is_none());
    }

    #[test]
    fn document_without_contexts_is_unavailable() {
        let service = OutlineService::new(ProviderRegistry::new(), ConvertOptions::default(), true);
        assert!(service.outline_for(&store(), "Empty.vb").is_none());
    }

    #[test]
    fn merges_all_contexts_by_default() {
        let service = OutlineService::from_config(&OutlineConfig::default()).unwrap();
        let outline = service.outline_for(&store(), "Shapes.vb").unwrap();
        assert_eq!(outline.contexts, vec!["ProjectA", "ProjectB"]);
        let names: Vec<&str> = outline.elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Circle", "Square"]);
        assert_eq!(outline.elements[0].owning_contexts, vec!["ProjectA"]);
    }

    #[test]
    fn merge_disabled_converts_first_context_only() {
        let service = OutlineService::new(ProviderRegistry::new(), ConvertOptions::default(), false);
        let outline = service.outline_for(&store(), "Shapes.vb").unwrap();
        assert_eq!(outline.contexts, vec!["ProjectA"]);
        assert_eq!(outline.elements.len(), 1);
        assert!(outline.elements[0].owning_contexts.is_empty());
    }

    #[test]
    fn store_lists_files_sorted() {
        let store = store();
        assert_eq!(store.files().collect::<Vec<_>>(), vec!["Empty.vb", "Shapes.vb"]);
        assert_eq!(store.len(), 2);
    }
}
