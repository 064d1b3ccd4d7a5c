//! Core infrastructure for tugoutline.
//!
//! This crate turns declaration nodes plus resolved symbols into outline trees:
//! - Range extraction from character spans
//! - Element building with pluggable metadata providers
//! - Single-context tree conversion
//! - Multi-context merging into one deduplicated forest
//! - Request-level service over a document source
//! - Queries, JSON/text output, configuration, and error codes

pub mod builder;
pub mod config;
pub mod convert;
pub mod element;
pub mod error;
pub mod merge;
pub mod output;
pub mod provider;
pub mod query;
pub mod ranges;
pub mod service;
pub mod symbols;
pub mod syntax;
pub mod text;
pub mod types;
