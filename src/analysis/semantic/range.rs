//! Classified token ranges in host-document coordinates.

use std::cmp::Ordering;
use tower_lsp_server::ls_types::{Position, Range};

/// One classified span of the host document, before delta encoding.
///
/// Constructed ranges are never empty or inverted and never span more than
/// one line; the visitor filters such spans out before building one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemanticRange {
    pub range: Range,
    pub token_type: u32,
    pub modifier: u32,
}

impl SemanticRange {
    pub fn new(range: Range, token_type: u32, modifier: u32) -> Self {
        Self {
            range,
            token_type,
            modifier,
        }
    }

    /// Convenience constructor for a range on a single line.
    pub fn on_line(line: u32, start: u32, end: u32, token_type: u32, modifier: u32) -> Self {
        Self::new(
            Range::new(Position::new(line, start), Position::new(line, end)),
            token_type,
            modifier,
        )
    }

    pub fn start(&self) -> Position {
        self.range.start
    }

    pub fn end(&self) -> Position {
        self.range.end
    }

    pub fn is_single_line(&self) -> bool {
        self.range.start.line == self.range.end.line
    }

    /// Length in UTF-16 units of a single-line range.
    pub fn length(&self) -> Option<u32> {
        if !self.is_single_line() {
            return None;
        }
        self.range
            .end
            .character
            .checked_sub(self.range.start.character)
            .filter(|len| *len > 0)
    }

    /// Whether this range overlaps `other`. Touching ranges do not overlap,
    /// except that an empty `other` overlaps a range containing its position.
    pub fn overlaps(&self, other: &Range) -> bool {
        ranges_overlap(&self.range, other)
    }
}

pub(crate) fn ranges_overlap(a: &Range, b: &Range) -> bool {
    if b.start == b.end {
        return a.start <= b.start && b.start <= a.end;
    }
    a.start < b.end && b.start < a.end
}

impl Ord for SemanticRange {
    fn cmp(&self, other: &Self) -> Ordering {
        self.range
            .start
            .cmp(&other.range.start)
            .then(self.range.end.cmp(&other.range.end))
            .then(self.token_type.cmp(&other.token_type))
            .then(self.modifier.cmp(&other.modifier))
    }
}

impl PartialOrd for SemanticRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_by_start_then_end() {
        let mut ranges = vec![
            SemanticRange::on_line(1, 0, 2, 0, 0),
            SemanticRange::on_line(0, 5, 9, 0, 0),
            SemanticRange::on_line(0, 5, 7, 0, 0),
            SemanticRange::on_line(0, 1, 2, 0, 0),
        ];
        ranges.sort();
        let starts: Vec<_> = ranges
            .iter()
            .map(|r| (r.start().line, r.start().character, r.end().character))
            .collect();
        assert_eq!(starts, vec![(0, 1, 2), (0, 5, 7), (0, 5, 9), (1, 0, 2)]);
    }

    #[test]
    fn test_length() {
        assert_eq!(SemanticRange::on_line(0, 3, 7, 0, 0).length(), Some(4));
        assert_eq!(SemanticRange::on_line(0, 3, 3, 0, 0).length(), None);
        let multi = SemanticRange::new(
            Range::new(Position::new(0, 3), Position::new(1, 1)),
            0,
            0,
        );
        assert_eq!(multi.length(), None);
    }

    #[test]
    fn test_overlaps() {
        let token = SemanticRange::on_line(2, 4, 8, 0, 0);
        let inside = Range::new(Position::new(2, 5), Position::new(2, 6));
        let before = Range::new(Position::new(0, 0), Position::new(2, 4));
        let after = Range::new(Position::new(2, 8), Position::new(3, 0));
        let caret = Range::new(Position::new(2, 8), Position::new(2, 8));
        assert!(token.overlaps(&inside));
        assert!(!token.overlaps(&before));
        assert!(!token.overlaps(&after));
        assert!(token.overlaps(&caret));
    }
}
