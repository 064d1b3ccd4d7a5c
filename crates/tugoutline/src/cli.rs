//! CLI command implementations.
//!
//! Each command loads the fixture, builds the outline through the service,
//! and returns a response value. Writing the response is left to `main`, so
//! commands are testable without spawning the binary.

use std::path::{Path, PathBuf};

use tracing::info_span;
use tugoutline_core::config::{find_project_root_from, OutlineConfig};
use tugoutline_core::error::OutlineError;
use tugoutline_core::output::{ElementAtResponse, OutlineResponse};
use tugoutline_core::query::{element_at, filter};
use tugoutline_core::service::OutlineService;
use tugoutline_core::types::Position;

use crate::fixture::load_store;

/// Per-invocation overrides layered on top of the loaded config.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    /// Convert only the first context.
    pub no_merge: bool,
    /// Emit property and event accessors as children.
    pub expose_accessors: bool,
}

impl Overrides {
    fn apply(&self, config: &mut OutlineConfig) {
        if self.no_merge {
            config.outline.merge_contexts = false;
        }
        if self.expose_accessors {
            config.outline.expose_accessors = true;
        }
    }
}

/// Resolve the effective config.
///
/// An explicit `--config` path wins. Otherwise the nearest `.tugoutline/`
/// directory above the fixture is used, falling back to defaults.
pub fn load_config(explicit: Option<&Path>, fixture: &Path) -> Result<OutlineConfig, OutlineError> {
    if let Some(path) = explicit {
        return OutlineConfig::load(path);
    }
    let start = fixture
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    match find_project_root_from(&start) {
        Some(root) => OutlineConfig::load_from_project(&root),
        None => Ok(OutlineConfig::default()),
    }
}

/// Build the full outline for a fixture.
pub fn run_outline(
    config: &OutlineConfig,
    overrides: Overrides,
    fixture: &Path,
) -> Result<OutlineResponse, OutlineError> {
    let _span = info_span!("outline", fixture = %fixture.display()).entered();
    let mut config = config.clone();
    overrides.apply(&mut config);

    let service = OutlineService::from_config(&config)?;
    let (store, file) = load_store(fixture)?;
    Ok(match service.outline_for(&store, &file) {
        Some(outline) => OutlineResponse::from_outline(outline),
        None => OutlineResponse::unavailable(file),
    })
}

/// Build the outline and keep only elements matching `query`.
pub fn run_find(
    config: &OutlineConfig,
    overrides: Overrides,
    fixture: &Path,
    query: &str,
) -> Result<OutlineResponse, OutlineError> {
    let mut response = run_outline(config, overrides, fixture)?;
    response.elements = filter(&response.elements, query);
    Ok(response)
}

/// Find the innermost element at a 1-based line and column.
pub fn run_at(
    config: &OutlineConfig,
    overrides: Overrides,
    fixture: &Path,
    line: u32,
    col: u32,
) -> Result<ElementAtResponse, OutlineError> {
    if line == 0 || col == 0 {
        return Err(OutlineError::invalid_args(
            "line and col are 1-based and must be >= 1",
        ));
    }
    let position = Position::new(line - 1, col - 1);

    let response = run_outline(config, overrides, fixture)?;
    if !response.is_available() {
        return Ok(ElementAtResponse::unavailable(response.file, position));
    }
    let element = element_at(&response.elements, position).cloned();
    Ok(ElementAtResponse::new(response.file, position, element))
}
