//! Element builder: one declaration plus its resolved symbol to one element.
//!
//! The builder fails closed. Without a resolved symbol it produces nothing,
//! and the caller drops the node together with its whole subtree.

use tracing::debug;

use crate::element::{ElementKind, OutlineElement, Properties};
use crate::provider::ProviderRegistry;
use crate::ranges::{extract_ranges, DeclarationSpans};
use crate::symbols::{ResolvedSymbol, SymbolKind};
use crate::text::SourceText;

/// Map a symbol's semantic category to the outline kind.
///
/// Kinds come from the symbol, never from the syntax, so a structure, a
/// module and a class all report as [`ElementKind::Class`], and operators and
/// accessors report as [`ElementKind::Method`].
pub fn element_kind(kind: SymbolKind) -> ElementKind {
    match kind {
        SymbolKind::Namespace => ElementKind::Namespace,
        SymbolKind::Class | SymbolKind::Structure | SymbolKind::Module => ElementKind::Class,
        SymbolKind::Interface => ElementKind::Interface,
        SymbolKind::Enum => ElementKind::Enum,
        SymbolKind::Delegate => ElementKind::Delegate,
        SymbolKind::Method | SymbolKind::Operator | SymbolKind::Accessor => ElementKind::Method,
        SymbolKind::Constructor => ElementKind::Constructor,
        SymbolKind::Property => ElementKind::Property,
        SymbolKind::Event => ElementKind::Event,
        SymbolKind::Field => ElementKind::Field,
        SymbolKind::EnumMember => ElementKind::EnumMember,
    }
}

/// Builds childless outline elements.
#[derive(Debug, Clone, Copy)]
pub struct ElementBuilder<'p> {
    providers: &'p ProviderRegistry,
}

impl<'p> ElementBuilder<'p> {
    pub fn new(providers: &'p ProviderRegistry) -> Self {
        ElementBuilder { providers }
    }

    /// Build the element for one declaration.
    ///
    /// Returns `None` if the symbol is unresolved or the declaration has an
    /// empty full span. Providers run only for elements that are emitted.
    pub fn build(
        &self,
        text: &SourceText,
        spans: &DeclarationSpans,
        symbol: Option<&ResolvedSymbol>,
    ) -> Option<OutlineElement> {
        let Some(symbol) = symbol else {
            debug!(full = ?spans.full, "unresolved declaration; omitting subtree");
            return None;
        };

        let Some(ranges) = extract_ranges(text, spans) else {
            debug!(symbol = %symbol.name, "declaration has an empty full span; omitting");
            return None;
        };

        let mut element = OutlineElement::new(
            element_kind(symbol.kind),
            symbol.short_display(),
            symbol.qualified_display(),
            ranges,
        );
        element.properties = self.properties(symbol);
        Some(element)
    }

    /// Baseline properties followed by provider properties.
    fn properties(&self, symbol: &ResolvedSymbol) -> Properties {
        let mut properties = Properties::new();
        if let Some(accessibility) = symbol.accessibility {
            properties.insert("accessibility", accessibility.as_str());
        }
        properties.insert("static", symbol.is_static);
        self.providers.apply(symbol, &mut properties);
        properties
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{PropertyValue, RangeTag};
    use crate::provider::{MetadataProvider, ProviderError};
    use crate::symbols::Accessibility;
    use crate::text::TextSpan;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const SOURCE: &str = "Public Shared Function Area() As Double\nEnd Function";

    fn spans() -> DeclarationSpans {
        DeclarationSpans {
            attributes: None,
            full: TextSpan::new(0, 52),
            name: Some(TextSpan::new(23, 27)),
        }
    }

    fn area() -> ResolvedSymbol {
        ResolvedSymbol::new(SymbolKind::Method, "Area")
            .in_containers(["Shapes", "Circle"])
            .with_accessibility(Accessibility::Public)
            .with_static(true)
            .with_return_type("Double")
    }

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    impl MetadataProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn properties_for(
            &self,
            _symbol: &ResolvedSymbol,
        ) -> Result<Vec<(String, PropertyValue)>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[test]
    fn builds_element_with_baseline_properties() {
        let registry = ProviderRegistry::new();
        let builder = ElementBuilder::new(&registry);
        let text = SourceText::new(SOURCE);

        let element = builder.build(&text, &spans(), Some(&area())).unwrap();
        assert_eq!(element.kind, ElementKind::Method);
        assert_eq!(element.name, "Area()");
        assert_eq!(element.display_name, "Shapes.Circle.Area(): Double");
        assert_eq!(element.range(RangeTag::Name).unwrap().start.column, 23);
        let keys: Vec<&str> = element.properties.keys().collect();
        assert_eq!(keys, vec!["accessibility", "static"]);
        assert_eq!(element.properties.get("static"), Some(&PropertyValue::Bool(true)));
        assert!(element.children.is_empty());
    }

    #[test]
    fn accessibility_omitted_when_undefined() {
        let registry = ProviderRegistry::new();
        let builder = ElementBuilder::new(&registry);
        let text = SourceText::new(SOURCE);
        let namespace = ResolvedSymbol::new(SymbolKind::Namespace, "Shapes");

        let element = builder.build(&text, &spans(), Some(&namespace)).unwrap();
        assert!(element.properties.get("accessibility").is_none());
        assert_eq!(element.properties.get("static"), Some(&PropertyValue::Bool(false)));
    }

    #[test]
    fn unresolved_symbol_builds_nothing_and_skips_providers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ProviderRegistry::new();
        registry.register(Box::new(CountingProvider {
            calls: Arc::clone(&calls),
        }));
        let builder = ElementBuilder::new(&registry);
        let text = SourceText::new(SOURCE);

        assert!(builder.build(&text, &spans(), None).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(builder.build(&text, &spans(), Some(&area())).is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn builtin_providers_follow_baseline() {
        let registry = ProviderRegistry::with_builtins();
        let builder = ElementBuilder::new(&registry);
        let text = SourceText::new(SOURCE);

        let element = builder.build(&text, &spans(), Some(&area())).unwrap();
        let keys: Vec<&str> = element.properties.keys().collect();
        assert_eq!(
            keys,
            vec![
                "accessibility",
                "static",
                "declaration.methodKind",
                "signature.parameterCount",
                "signature.returnType",
            ]
        );
    }

    #[test]
    fn kind_comes_from_symbol_category() {
        assert_eq!(element_kind(SymbolKind::Structure), ElementKind::Class);
        assert_eq!(element_kind(SymbolKind::Module), ElementKind::Class);
        assert_eq!(element_kind(SymbolKind::Operator), ElementKind::Method);
        assert_eq!(element_kind(SymbolKind::Constructor), ElementKind::Constructor);
    }
}
