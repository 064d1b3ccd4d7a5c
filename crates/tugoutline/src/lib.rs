//! Tugoutline - structure outlines for files compiled under several contexts.
//!
//! This crate provides the CLI binary for tugoutline.
//!
//! ## Modules
//!
//! - `cli` - CLI command implementations
//! - `fixture` - Fixture documents standing in for the language front end

pub mod cli;
pub mod fixture;

// Re-export core types for convenience
pub use tugoutline_core::error::{OutlineError, OutputErrorCode};
pub use tugoutline_core::output::{ErrorResponse, OutlineResponse, SCHEMA_VERSION};
