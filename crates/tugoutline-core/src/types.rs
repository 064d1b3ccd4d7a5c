//! Common position types shared between the element, query and output modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Position
// ============================================================================

/// A 0-indexed line/column position in a source text.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed).
    pub line: u32,
    /// Column number (0-indexed, characters).
    pub column: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }

    /// Comparison key for deterministic sorting: (line, column).
    fn sort_key(&self) -> (u32, u32) {
        (self.line, self.column)
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// ============================================================================
// TextRange
// ============================================================================

/// A line/column range: (startLine, startCol) to (endLine, endCol).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    /// Create a range from its four coordinates.
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        TextRange {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
        }
    }

    /// Check if the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this range contains another range entirely.
    pub fn contains(&self, other: &TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check if a position falls inside the range (end inclusive, so a caret
    /// sitting right after the last character still counts).
    pub fn contains_position(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

impl std::fmt::Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_order_by_line_then_column() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }

    #[test]
    fn range_containment() {
        let outer = TextRange::new(1, 0, 5, 10);
        assert!(outer.contains(&TextRange::new(1, 0, 1, 4)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&TextRange::new(0, 3, 1, 4)));
    }

    #[test]
    fn position_containment_includes_end() {
        let range = TextRange::new(2, 4, 2, 9);
        assert!(range.contains_position(Position::new(2, 9)));
        assert!(!range.contains_position(Position::new(2, 10)));
    }

    #[test]
    fn display_format() {
        assert_eq!(TextRange::new(0, 1, 2, 3).to_string(), "0:1-2:3");
    }
}
