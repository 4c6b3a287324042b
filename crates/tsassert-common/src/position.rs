//! Line/column position utilities.
//!
//! The core works in byte offsets (`Span`); source maps and any future LSP
//! front-end need line/column positions. This module bridges the two.

use crate::span::Span;

/// A 0-indexed line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Maps byte offsets to line/column positions for a single source file.
///
/// Built once per file and reused across every candidate site, since
/// computing it is O(n) but each lookup is O(log n).
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    #[must_use]
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineMap { line_starts }
    }

    /// Convert a byte offset into a 0-indexed line/column position.
    #[must_use]
    pub fn position_for(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_at) => insert_at.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        Position::new(line as u32, offset.saturating_sub(line_start))
    }

    #[must_use]
    pub fn span_to_range(&self, span: Span) -> (Position, Position) {
        (self.position_for(span.start), self.position_for(span.end))
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line() {
        let map = LineMap::build("abc");
        assert_eq!(map.position_for(0), Position::new(0, 0));
        assert_eq!(map.position_for(2), Position::new(0, 2));
    }

    #[test]
    fn multi_line() {
        let map = LineMap::build("ab\ncd\nef");
        assert_eq!(map.position_for(0), Position::new(0, 0));
        assert_eq!(map.position_for(3), Position::new(1, 0));
        assert_eq!(map.position_for(4), Position::new(1, 1));
        assert_eq!(map.position_for(7), Position::new(2, 1));
    }
}
