//! Byte offset to line/column mapping.

use crate::position::{OffsetRange, Position, Range};

/// Precomputed newline table for converting byte offsets into editor
/// [`Position`]s.
///
/// Built once per file; lookups are a binary search over line starts.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line. Always contains at least one
    /// entry, for line 0 at offset 0.
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Build a line index for `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Convert a byte offset into a 0-indexed line/column position.
    ///
    /// Offsets past the end of the text clamp to the last position. The
    /// column is a byte offset from the line start; callers displaying to
    /// users typically add 1 to both coordinates.
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let character = offset - self.line_starts[line];
        Position::new(line as u32, character as u32)
    }

    /// Convert a byte offset range into an editor range.
    #[must_use]
    pub fn range(&self, range: OffsetRange) -> Range {
        Range::new(self.position(range.start), self.position(range.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line() {
        let index = LineIndex::new("hello\nworld\n");
        assert_eq!(index.position(0), Position::new(0, 0));
        assert_eq!(index.position(4), Position::new(0, 4));
    }

    #[test]
    fn later_lines() {
        let index = LineIndex::new("hello\nworld\nlast");
        assert_eq!(index.position(6), Position::new(1, 0));
        assert_eq!(index.position(11), Position::new(1, 5));
        assert_eq!(index.position(12), Position::new(2, 0));
        assert_eq!(index.position(16), Position::new(2, 4));
    }

    #[test]
    fn offset_past_end_clamps() {
        let index = LineIndex::new("ab");
        assert_eq!(index.position(99), Position::new(0, 2));
    }

    #[test]
    fn range_mapping() {
        let index = LineIndex::new("a\nbc\n");
        let range = index.range(OffsetRange::new(2, 4));
        assert_eq!(range.start, Position::new(1, 0));
        assert_eq!(range.end, Position::new(1, 2));
    }
}
