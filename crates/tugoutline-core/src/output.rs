//! JSON and text output for outline responses.
//!
//! ## Response Shape
//!
//! 1. **Status first:** every response starts with `status` (`ok`,
//!    `unavailable` or `error`)
//! 2. **Versioned:** `schema_version` lets consumers detect format changes
//! 3. **Deterministic:** same input, same output; element order is the
//!    outline order, property order is insertion order
//!
//! "No outline available" is not an error: it is an `unavailable` response
//! with empty `contexts` and `elements`.

use std::io::{self, Write};

use serde::Serialize;

use crate::element::{OutlineElement, RangeTag};
use crate::error::{OutlineError, OutputErrorCode};
use crate::query::flatten;
use crate::service::Outline;
use crate::types::Position;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Response Structs
// ============================================================================

/// Response for the outline and find commands.
#[derive(Debug, Clone, Serialize)]
pub struct OutlineResponse {
    /// Status: "ok" or "unavailable".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    pub file: String,
    /// Contexts that contributed, in processing order.
    pub contexts: Vec<String>,
    pub elements: Vec<OutlineElement>,
}

impl OutlineResponse {
    /// Create an ok response from a finished outline.
    pub fn from_outline(outline: Outline) -> Self {
        OutlineResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            file: outline.file,
            contexts: outline.contexts,
            elements: outline.elements,
        }
    }

    /// Response for a file with no outline available.
    pub fn unavailable(file: impl Into<String>) -> Self {
        OutlineResponse {
            status: "unavailable".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            file: file.into(),
            contexts: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Whether an outline was produced.
    pub fn is_available(&self) -> bool {
        self.status != "unavailable"
    }
}

/// Response for the element-at-position command.
#[derive(Debug, Clone, Serialize)]
pub struct ElementAtResponse {
    /// Status: "ok" or "unavailable".
    pub status: String,
    pub schema_version: String,
    pub file: String,
    pub position: Position,
    /// Innermost element at the position; explicit `null` when none.
    pub element: Option<OutlineElement>,
}

impl ElementAtResponse {
    pub fn new(file: impl Into<String>, position: Position, element: Option<OutlineElement>) -> Self {
        ElementAtResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            file: file.into(),
            position,
            element,
        }
    }

    pub fn unavailable(file: impl Into<String>, position: Position) -> Self {
        ElementAtResponse {
            status: "unavailable".to_string(),
            ..ElementAtResponse::new(file, position, None)
        }
    }
}

/// Error information for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Numeric error code (also the exit code).
    pub code: u8,
    /// Human-readable message.
    pub message: String,
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from an OutlineError.
    pub fn from_error(err: &OutlineError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo {
                code: OutputErrorCode::from(err).code(),
                message: err.to_string(),
            },
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Render one element as a text line, without indentation.
///
/// Format: `<kind> <name> [l:c-l:c] {ctx, ...}`; the context set is omitted
/// in single-context outlines.
pub fn render_line(element: &OutlineElement) -> String {
    let mut line = format!("{} {}", element.kind, element.name);
    if let Some(full) = element.range(RangeTag::Full) {
        line.push_str(&format!(" [{}]", full));
    }
    if !element.owning_contexts.is_empty() {
        line.push_str(&format!(" {{{}}}", element.owning_contexts.join(", ")));
    }
    line
}

/// Render a forest as indented text, two spaces per level.
pub fn render_text(elements: &[OutlineElement], writer: &mut impl Write) -> io::Result<()> {
    for (depth, element) in flatten(elements) {
        writeln!(writer, "{:indent$}{}", "", render_line(element), indent = depth * 2)?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
