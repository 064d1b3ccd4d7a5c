//! Source text utilities: character spans and offset to line:column conversion.
//!
//! ## Coordinate Conventions
//!
//! - Offsets are **character offsets** (Unicode scalar values), 0-indexed
//! - Lines and columns are **0-indexed**
//! - `\n`, `\r\n` and a lone `\r` each terminate a line
//!
//! Offsets past the end of the text clamp to the end position, so a span
//! produced against a slightly longer buffer still maps to a valid range.

use serde::{Deserialize, Serialize};

use crate::types::{Position, TextRange};

// ============================================================================
// TextSpan
// ============================================================================

/// A half-open character span `[start, end)` into a source buffer.
///
/// The default span (`0..0`) is the "absent" span: the range extractor
/// omits it instead of emitting a zero-width range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    /// Start character offset (inclusive).
    pub start: u32,
    /// End character offset (exclusive).
    pub end: u32,
}

impl TextSpan {
    /// Create a new span. A reversed pair is normalized so `start <= end`.
    pub fn new(start: u32, end: u32) -> Self {
        if start <= end {
            TextSpan { start, end }
        } else {
            TextSpan {
                start: end,
                end: start,
            }
        }
    }

    /// Length of the span in characters.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this span contains another span entirely.
    pub fn contains(&self, other: &TextSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

// ============================================================================
// SourceText
// ============================================================================

/// A source buffer with a precomputed line index.
///
/// Build once per text with O(n); each offset lookup is O(log n) via binary
/// search over line start offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
    /// Character offsets where each line begins. `line_starts[0] == 0`.
    line_starts: Vec<u32>,
    /// Total length in characters.
    char_len: u32,
}

impl SourceText {
    /// Build a source text and its line index.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0u32];
        let mut offset = 0u32;
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            offset += 1;
            match ch {
                '\n' => line_starts.push(offset),
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                        offset += 1;
                    }
                    line_starts.push(offset);
                }
                _ => {}
            }
        }

        SourceText {
            text,
            line_starts,
            char_len: offset,
        }
    }

    /// The underlying text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length of the text in characters.
    pub fn len(&self) -> u32 {
        self.char_len
    }

    /// Check if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// Number of lines (a text without a trailing newline still has one line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a character offset to a 0-indexed position.
    pub fn position(&self, offset: u32) -> Position {
        let offset = offset.min(self.char_len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        Position::new(line as u32, offset - self.line_starts[line])
    }

    /// Convert a span to a line/column range.
    pub fn range(&self, span: TextSpan) -> TextRange {
        TextRange {
            start: self.position(span.start),
            end: self.position(span.end),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod span_tests {
        use super::*;

        #[test]
        fn reversed_span_is_normalized() {
            let span = TextSpan::new(10, 4);
            assert_eq!(span, TextSpan::new(4, 10));
            assert_eq!(span.len(), 6);
        }

        #[test]
        fn default_span_is_empty() {
            assert!(TextSpan::default().is_empty());
        }

        #[test]
        fn contains_is_inclusive_at_both_ends() {
            let outer = TextSpan::new(2, 20);
            assert!(outer.contains(&TextSpan::new(2, 20)));
            assert!(outer.contains(&TextSpan::new(5, 9)));
            assert!(!outer.contains(&TextSpan::new(1, 9)));
            assert!(!outer.contains(&TextSpan::new(5, 21)));
        }
    }

    mod position_tests {
        use super::*;

        #[test]
        fn first_line_columns() {
            let text = SourceText::new("abc\ndef");
            assert_eq!(text.position(0), Position::new(0, 0));
            assert_eq!(text.position(2), Position::new(0, 2));
            assert_eq!(text.position(3), Position::new(0, 3));
        }

        #[test]
        fn line_start_after_newline() {
            let text = SourceText::new("abc\ndef\nghi");
            assert_eq!(text.position(4), Position::new(1, 0));
            assert_eq!(text.position(9), Position::new(2, 1));
            assert_eq!(text.line_count(), 3);
        }

        #[test]
        fn crlf_counts_as_one_break() {
            let text = SourceText::new("ab\r\ncd\rxy");
            assert_eq!(text.line_count(), 3);
            assert_eq!(text.position(4), Position::new(1, 0));
            assert_eq!(text.position(7), Position::new(2, 0));
        }

        #[test]
        fn offsets_count_characters_not_bytes() {
            let text = SourceText::new("é€x\ny");
            assert_eq!(text.len(), 5);
            assert_eq!(text.position(2), Position::new(0, 2));
            assert_eq!(text.position(4), Position::new(1, 0));
        }

        #[test]
        fn offset_past_end_clamps() {
            let text = SourceText::new("ab\ncd");
            assert_eq!(text.position(100), Position::new(1, 2));
        }

        #[test]
        fn empty_text_has_single_line() {
            let text = SourceText::new("");
            assert!(text.is_empty());
            assert_eq!(text.line_count(), 1);
            assert_eq!(text.position(0), Position::new(0, 0));
        }
    }

    #[test]
    fn range_of_single_line_span() {
        let text = SourceText::new("Class Point\n  Dim x\nEnd Class");
        let span = TextSpan::new(6, 11);
        let range = text.range(span);
        assert_eq!(range.start, Position::new(0, 6));
        assert_eq!(range.end, Position::new(0, 11));
    }
}
