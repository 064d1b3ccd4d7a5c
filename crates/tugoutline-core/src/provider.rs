//! Metadata provider protocol.
//!
//! A [`MetadataProvider`] is a pure function from a resolved symbol to a list
//! of `(key, value)` pairs. Providers are registered once, in order, in a
//! [`ProviderRegistry`] that the element builder consults for every element.
//!
//! # Key Namespacing
//!
//! Keys returned by a provider are local to it. The registry prefixes each
//! key with the provider's name (`signature.parameterCount`), so providers
//! cannot collide with each other or with the baseline `accessibility` and
//! `static` properties.
//!
//! # Failure Policy
//!
//! Providers fail open: an `Err` or a panic is logged and that provider's
//! pairs are dropped. Baseline properties and the remaining providers are unaffected,
//! and the element is still emitted.

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;
use tracing::warn;

use crate::element::{Properties, PropertyValue};
use crate::symbols::{ResolvedSymbol, SymbolKind};

/// Error reported by a metadata provider.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        ProviderError {
            message: message.into(),
        }
    }
}

/// Pluggable producer of extension properties.
pub trait MetadataProvider: Send + Sync {
    /// Provider name, used as the key namespace.
    fn name(&self) -> &str;

    /// Produce properties for a resolved symbol. Must not have side effects.
    fn properties_for(
        &self,
        symbol: &ResolvedSymbol,
    ) -> Result<Vec<(String, PropertyValue)>, ProviderError>;
}

// ============================================================================
// Registry
// ============================================================================

/// Ordered list of registered providers.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Box<dyn MetadataProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        ProviderRegistry::default()
    }

    /// Registry with every built-in provider, in their default order.
    pub fn with_builtins() -> Self {
        let mut registry = ProviderRegistry::new();
        for name in BUILTIN_PROVIDERS {
            if let Some(provider) = builtin_provider(name) {
                registry.register(provider);
            }
        }
        registry
    }

    /// Append a provider. Registration order is output order.
    pub fn register(&mut self, provider: Box<dyn MetadataProvider>) {
        self.providers.push(provider);
    }

    /// Names of registered providers, in order.
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Invoke every provider for `symbol`, appending namespaced pairs to
    /// `properties` in registration order.
    pub fn apply(&self, symbol: &ResolvedSymbol, properties: &mut Properties) {
        for provider in &self.providers {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| provider.properties_for(symbol)))
                .unwrap_or_else(|_| Err(ProviderError::new("provider panicked")));
            match outcome {
                Ok(pairs) => {
                    for (key, value) in pairs {
                        properties.insert(format!("{}.{}", provider.name(), key), value);
                    }
                }
                Err(err) => {
                    warn!(
                        provider = provider.name(),
                        symbol = %symbol.name,
                        error = %err,
                        "metadata provider failed; skipping its properties"
                    );
                }
            }
        }
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

// ============================================================================
// Built-in Providers
// ============================================================================

/// Names of the built-in providers, in default registration order.
pub const BUILTIN_PROVIDERS: &[&str] = &["declaration", "modifiers", "signature"];

/// Construct a built-in provider by name.
pub fn builtin_provider(name: &str) -> Option<Box<dyn MetadataProvider>> {
    match name {
        "declaration" => Some(Box::new(DeclarationProvider)),
        "modifiers" => Some(Box::new(ModifiersProvider)),
        "signature" => Some(Box::new(SignatureProvider)),
        _ => None,
    }
}

/// Reports the flavor hidden behind a shared element kind: which class-like
/// type, or which method-like member.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationProvider;

impl MetadataProvider for DeclarationProvider {
    fn name(&self) -> &str {
        "declaration"
    }

    fn properties_for(
        &self,
        symbol: &ResolvedSymbol,
    ) -> Result<Vec<(String, PropertyValue)>, ProviderError> {
        let pair = match symbol.kind {
            SymbolKind::Class => Some(("typeKind", "class")),
            SymbolKind::Structure => Some(("typeKind", "struct")),
            SymbolKind::Module => Some(("typeKind", "module")),
            SymbolKind::Method => Some(("methodKind", "ordinary")),
            SymbolKind::Operator => Some(("methodKind", "operator")),
            SymbolKind::Accessor => Some(("methodKind", "accessor")),
            _ => None,
        };
        Ok(pair
            .map(|(key, value)| vec![(key.to_string(), PropertyValue::from(value))])
            .unwrap_or_default())
    }
}

/// One `true` entry per declaration modifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifiersProvider;

impl MetadataProvider for ModifiersProvider {
    fn name(&self) -> &str {
        "modifiers"
    }

    fn properties_for(
        &self,
        symbol: &ResolvedSymbol,
    ) -> Result<Vec<(String, PropertyValue)>, ProviderError> {
        Ok(symbol
            .modifiers
            .iter()
            .map(|m| (m.as_str().to_string(), PropertyValue::Bool(true)))
            .collect())
    }
}

/// Signature shape: parameter and type parameter counts, return type.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureProvider;

impl MetadataProvider for SignatureProvider {
    fn name(&self) -> &str {
        "signature"
    }

    fn properties_for(
        &self,
        symbol: &ResolvedSymbol,
    ) -> Result<Vec<(String, PropertyValue)>, ProviderError> {
        let mut pairs = Vec::new();
        if symbol.kind.has_parameter_list() || !symbol.parameters.is_empty() {
            pairs.push((
                "parameterCount".to_string(),
                PropertyValue::from(symbol.parameters.len()),
            ));
        }
        if !symbol.type_parameters.is_empty() {
            pairs.push((
                "typeParameterCount".to_string(),
                PropertyValue::from(symbol.type_parameters.len()),
            ));
        }
        if let Some(return_type) = &symbol.return_type {
            pairs.push((
                "returnType".to_string(),
                PropertyValue::from(crate::symbols::normalize_whitespace(return_type)),
            ));
        }
        Ok(pairs)
    }
}

// ============================================================================
// Tests
// ============================================================================
