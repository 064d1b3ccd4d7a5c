//! Fixture documents: declarations and symbols for one file, per context.
//!
//! A fixture stands in for the external front end. It carries what a parser
//! and binder would hand over for each project context that compiles a file.
//!
//! # Example Fixture
//!
//! ```json
//! {
//!   "file": "Shapes.vb",
//!   "source": "Namespace N\n  Class C\n  End Class\nEnd Namespace",
//!   "contexts": [
//!     {
//!       "name": "ProjectA",
//!       "declarations": [
//!         {"node": "namespace", "id": 1, "full": {"start": 0, "end": 47},
//!          "name": {"start": 10, "end": 11}, "members": []}
//!       ],
//!       "symbols": {"1": {"kind": "namespace", "name": "N"}}
//!     }
//!   ]
//! }
//! ```
//!
//! A context may override `source` when its preprocessed text differs.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use tracing::debug;
use tugoutline_core::error::OutlineError;
use tugoutline_core::service::{Document, DocumentContext, DocumentStore};
use tugoutline_core::symbols::SymbolTable;
use tugoutline_core::syntax::{CompilationUnit, DeclarationNode};
use tugoutline_core::text::SourceText;

/// A fixture file as written on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FixtureDocument {
    /// Logical file name the outline is requested for.
    pub file: String,
    /// Source text shared by contexts that do not override it.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub contexts: Vec<FixtureContext>,
}

/// One context's view of the file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FixtureContext {
    pub name: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub declarations: Vec<DeclarationNode>,
    /// Resolved symbols keyed by node id; missing ids are unresolved.
    #[serde(default)]
    pub symbols: SymbolTable,
}

impl FixtureDocument {
    /// Convert into a service document, checking context names and sources.
    pub fn into_document(self, origin: &str) -> Result<Document, OutlineError> {
        let mut seen = HashSet::new();
        let mut contexts = Vec::with_capacity(self.contexts.len());
        for context in self.contexts {
            if !seen.insert(context.name.clone()) {
                return Err(OutlineError::invalid_fixture(
                    origin,
                    format!("duplicate context '{}'", context.name),
                ));
            }
            let source = context
                .source
                .or_else(|| self.source.clone())
                .ok_or_else(|| {
                    OutlineError::invalid_fixture(
                        origin,
                        format!("context '{}' has no source", context.name),
                    )
                })?;
            contexts.push(DocumentContext {
                name: context.name,
                text: SourceText::new(source),
                unit: CompilationUnit::new(context.declarations),
                symbols: context.symbols,
            });
        }
        Ok(Document {
            file: self.file,
            contexts,
        })
    }
}

/// Read and parse a fixture from an explicit path.
pub fn read_fixture(path: &Path) -> Result<FixtureDocument, OutlineError> {
    if !path.exists() {
        return Err(OutlineError::file_not_found(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| OutlineError::invalid_fixture(path.display().to_string(), e.to_string()))
}

/// Load a fixture into a single-document store.
///
/// Returns the store and the logical file name to request.
pub fn load_store(path: &Path) -> Result<(DocumentStore, String), OutlineError> {
    let fixture = read_fixture(path)?;
    let document = fixture.into_document(&path.display().to_string())?;
    let file = document.file.clone();
    debug!(
        fixture = %path.display(),
        file = %file,
        contexts = document.contexts.len(),
        "loaded fixture"
    );
    let mut store = DocumentStore::new();
    store.insert(document);
    Ok((store, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tugoutline_core::service::DocumentSource;

    const FIXTURE: &str = r#"{
        "file": "Point.vb",
        "source": "Class Point\nEnd Class",
        "contexts": [
            {"name": "A",
             "declarations": [{"node": "type", "id": 1, "full": {"start": 0, "end": 21},
                               "identifier": {"start": 6, "end": 11}}],
             "symbols": {"1": {"kind": "class", "name": "Point"}}},
            {"name": "B", "source": "Class Point\r\nEnd Class"}
        ]
    }"#;

    fn write(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("fixture.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_contexts_with_source_override() {
        let dir = TempDir::new().unwrap();
        let (store, file) = load_store(&write(&dir, FIXTURE)).unwrap();
        assert_eq!(file, "Point.vb");
        let document = store.document("Point.vb").unwrap();
        assert_eq!(document.contexts.len(), 2);
        assert_eq!(document.contexts[0].symbols.len(), 1);
        assert_eq!(document.contexts[1].text.as_str(), "Class Point\r\nEnd Class");
        assert!(document.contexts[1].unit.members.is_empty());
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_store(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, OutlineError::FileNotFound { .. }));
    }

    #[test]
    fn malformed_json_is_invalid_fixture() {
        let dir = TempDir::new().unwrap();
        let err = load_store(&write(&dir, "{\"file\": ")).unwrap_err();
        assert!(matches!(err, OutlineError::InvalidFixture { .. }));
    }

    #[test]
    fn context_without_any_source_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = load_store(&write(&dir, r#"{"file": "a.vb", "contexts": [{"name": "A"}]}"#))
            .unwrap_err();
        assert!(err.to_string().contains("context 'A' has no source"));
    }

    #[test]
    fn duplicate_context_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        let content =
            r#"{"file": "a.vb", "source": "", "contexts": [{"name": "A"}, {"name": "A"}]}"#;
        let err = load_store(&write(&dir, content)).unwrap_err();
        assert!(err.to_string().contains("duplicate context 'A'"));
    }
}
