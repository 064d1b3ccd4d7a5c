//! Error types and exit codes for tugoutline.
//!
//! Conversion itself never fails: unresolved symbols and unknown declaration
//! categories produce empty results. `OutlineError` covers everything around
//! it: loading documents, reading config, and emitting output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad flags, malformed config or fixture)
//! - `3`: Resolution errors (file not found)
//! - `10`: Internal errors (I/O failures while reading or writing)

use std::fmt;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable exit codes, also reported in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// Resolution errors (file not found).
    ResolutionError = 3,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for the service and CLI.
#[derive(Debug, Error)]
pub enum OutlineError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Fixture document is structurally invalid.
    #[error("invalid fixture {path}: {reason}")]
    InvalidFixture { path: String, reason: String },

    /// Configuration could not be read or is invalid.
    #[error("config error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&OutlineError> for OutputErrorCode {
    fn from(err: &OutlineError) -> Self {
        match err {
            OutlineError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            OutlineError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            OutlineError::InvalidFixture { .. } => OutputErrorCode::InvalidArguments,
            OutlineError::Config { .. } => OutputErrorCode::InvalidArguments,
            OutlineError::Io(_) => OutputErrorCode::InternalError,
        }
    }
}

impl From<OutlineError> for OutputErrorCode {
    fn from(err: OutlineError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl OutlineError {
    pub fn invalid_args(message: impl Into<String>) -> Self {
        OutlineError::InvalidArguments {
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        OutlineError::FileNotFound { path: path.into() }
    }

    pub fn invalid_fixture(path: impl Into<String>, reason: impl Into<String>) -> Self {
        OutlineError::InvalidFixture {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        OutlineError::Config {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
