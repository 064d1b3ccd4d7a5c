//! Range extraction: character spans to tagged line/column ranges.
//!
//! Every declaration category shares this single path. The extractor only
//! looks at the source buffer; it never consults symbol state.

use tracing::trace;

use crate::element::{OutlineRanges, RangeTag};
use crate::text::{SourceText, TextSpan};

/// The three syntactic sub-spans of a declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclarationSpans {
    /// Attribute/annotation list, if any.
    pub attributes: Option<TextSpan>,
    /// Whole declaration.
    pub full: TextSpan,
    /// Identifier or keyword naming the declaration.
    pub name: Option<TextSpan>,
}

/// Translate declaration spans to ranges.
///
/// - An absent or empty span is omitted rather than emitted as a zero range.
/// - An empty `full` span, or one lying wholly past the end of the text,
///   yields `None`: every element needs a non-empty `Full` range.
/// - `Name` and `Attributes` spans that are not inside `full` are dropped so
///   the containment invariant holds for every emitted element.
pub fn extract_ranges(text: &SourceText, spans: &DeclarationSpans) -> Option<OutlineRanges> {
    if spans.full.is_empty() {
        return None;
    }
    // Offsets clamp to the end of the text, so a span past the end collapses.
    let full = text.range(spans.full);
    if full.is_empty() {
        trace!(full = ?spans.full, len = text.len(), "full span lies past the end of the text");
        return None;
    }

    let mut ranges = OutlineRanges::new();
    ranges.insert(RangeTag::Full, full);

    for (tag, span) in [
        (RangeTag::Name, spans.name),
        (RangeTag::Attributes, spans.attributes),
    ] {
        let Some(span) = span.filter(|s| !s.is_empty()) else {
            continue;
        };
        if !spans.full.contains(&span) {
            trace!(?tag, ?span, full = ?spans.full, "dropping range outside full span");
            continue;
        }
        ranges.insert(tag, text.range(span));
    }

    Some(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextRange;

    const SOURCE: &str = "<Serializable>\nClass Point\nEnd Class";

    fn spans() -> DeclarationSpans {
        DeclarationSpans {
            attributes: Some(TextSpan::new(0, 14)),
            full: TextSpan::new(0, 36),
            name: Some(TextSpan::new(21, 26)),
        }
    }

    #[test]
    fn all_three_ranges() {
        let text = SourceText::new(SOURCE);
        let ranges = extract_ranges(&text, &spans()).unwrap();
        assert_eq!(ranges[&RangeTag::Full], TextRange::new(0, 0, 2, 9));
        assert_eq!(ranges[&RangeTag::Name], TextRange::new(1, 6, 1, 11));
        assert_eq!(ranges[&RangeTag::Attributes], TextRange::new(0, 0, 0, 14));
    }

    #[test]
    fn missing_attribute_list_is_omitted() {
        let text = SourceText::new(SOURCE);
        let spans = DeclarationSpans {
            attributes: None,
            ..spans()
        };
        let ranges = extract_ranges(&text, &spans).unwrap();
        assert!(!ranges.contains_key(&RangeTag::Attributes));
        assert_eq!(ranges.len(), 2);
    }

    #[test]
    fn default_span_is_treated_as_absent() {
        let text = SourceText::new(SOURCE);
        let spans = DeclarationSpans {
            attributes: Some(TextSpan::default()),
            name: Some(TextSpan::default()),
            ..spans()
        };
        let ranges = extract_ranges(&text, &spans).unwrap();
        assert_eq!(ranges.len(), 1);
        assert!(ranges.contains_key(&RangeTag::Full));
    }

    #[test]
    fn empty_full_span_yields_nothing() {
        let text = SourceText::new(SOURCE);
        let spans = DeclarationSpans {
            full: TextSpan::new(5, 5),
            ..spans()
        };
        assert!(extract_ranges(&text, &spans).is_none());
    }

    #[test]
    fn full_span_past_end_of_text_yields_nothing() {
        let text = SourceText::new("Class C");
        let spans = DeclarationSpans {
            attributes: None,
            full: TextSpan::new(20, 30),
            name: Some(TextSpan::new(24, 25)),
        };
        assert!(extract_ranges(&text, &spans).is_none());
    }

    #[test]
    fn full_span_overrunning_end_is_clamped() {
        let text = SourceText::new("Class C");
        let spans = DeclarationSpans {
            attributes: None,
            full: TextSpan::new(0, 30),
            name: Some(TextSpan::new(6, 7)),
        };
        let ranges = extract_ranges(&text, &spans).unwrap();
        assert_eq!(ranges[&RangeTag::Full], TextRange::new(0, 0, 0, 7));
    }

    #[test]
    fn name_outside_full_is_dropped() {
        let text = SourceText::new(SOURCE);
        let spans = DeclarationSpans {
            full: TextSpan::new(15, 36),
            name: Some(TextSpan::new(21, 26)),
            attributes: Some(TextSpan::new(0, 14)),
        };
        let ranges = extract_ranges(&text, &spans).unwrap();
        assert!(ranges.contains_key(&RangeTag::Name));
        assert!(!ranges.contains_key(&RangeTag::Attributes));
    }
}
