//! Host document text with offset ↔ LSP position mapping.
//!
//! Offsets are UTF-8 byte offsets (what the syntax tree stores); positions
//! are LSP line / UTF-16 character pairs (what tokens are reported in).

use line_index::{LineCol, LineIndex, TextSize, WideEncoding, WideLineCol};
use tower_lsp_server::ls_types::Position;

pub struct SourceText {
    text: String,
    index: LineIndex,
}

impl std::fmt::Debug for SourceText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceText")
            .field("len", &self.text.len())
            .finish()
    }
}

impl SourceText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let index = LineIndex::new(&text);
        Self { text, index }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text of the byte span `[start, end)`, or `""` when the span is not a
    /// valid char-aligned slice of the document.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        self.text.get(start..end).unwrap_or("")
    }

    /// Convert a byte offset to an LSP position. Offsets past the end clamp
    /// to the end of the document.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line_col = self.index.line_col(TextSize::from(offset as u32));
        let character = self
            .index
            .to_wide(WideEncoding::Utf16, line_col)
            .map(|wide| wide.col)
            .unwrap_or(line_col.col);
        Position::new(line_col.line, character)
    }

    /// Convert an LSP position to a byte offset.
    ///
    /// Returns `None` when the line does not exist; characters past the end
    /// of an existing line clamp to the line end.
    pub fn offset(&self, position: Position) -> Option<usize> {
        let line_start = self.line_start(position.line)?;
        let line_end = self.line_end(position.line);
        let wide = WideLineCol {
            line: position.line,
            col: position.character,
        };
        let offset = self
            .index
            .to_utf8(WideEncoding::Utf16, wide)
            .and_then(|line_col| self.index.offset(line_col))
            .map(usize::from)
            .unwrap_or(line_end);
        Some(offset.clamp(line_start, line_end))
    }

    /// Like [`SourceText::offset`], but positions past the last line clamp to the end.
    pub fn offset_clamped(&self, position: Position) -> usize {
        self.offset(position).unwrap_or(self.text.len())
    }

    /// Byte offset at which the given line starts.
    pub fn line_start(&self, line: u32) -> Option<usize> {
        self.index
            .offset(LineCol { line, col: 0 })
            .map(usize::from)
    }

    /// Byte offset of the end of the given line, excluding its line break.
    fn line_end(&self, line: u32) -> usize {
        match self.line_start(line + 1) {
            Some(next) => {
                let before_newline = next.saturating_sub(1);
                if self.text[..before_newline].ends_with('\r') {
                    before_newline - 1
                } else {
                    before_newline
                }
            }
            None => self.text.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ascii() {
        let text = SourceText::new("abc\ndef\n");
        assert_eq!(text.position(0), Position::new(0, 0));
        assert_eq!(text.position(3), Position::new(0, 3));
        assert_eq!(text.position(4), Position::new(1, 0));
        assert_eq!(text.position(6), Position::new(1, 2));
        assert_eq!(text.position(100), Position::new(2, 0));
    }

    #[test]
    fn test_position_counts_utf16_units() {
        // "é" is 2 bytes / 1 UTF-16 unit, "𝄞" is 4 bytes / 2 UTF-16 units
        let text = SourceText::new("é𝄞x");
        assert_eq!(text.position(2), Position::new(0, 1));
        assert_eq!(text.position(6), Position::new(0, 3));
        assert_eq!(text.position(7), Position::new(0, 4));
    }

    #[test]
    fn test_offset_roundtrip() {
        let text = SourceText::new("é𝄞x\n<p>");
        for offset in [0, 2, 6, 7, 8, 9, 11] {
            let position = text.position(offset);
            assert_eq!(text.offset(position), Some(offset), "offset {offset}");
        }
    }

    #[test]
    fn test_offset_out_of_range() {
        let text = SourceText::new("ab\ncd");
        assert_eq!(text.offset(Position::new(5, 0)), None);
        assert_eq!(text.offset_clamped(Position::new(5, 0)), 5);
        assert_eq!(text.offset(Position::new(0, 99)), Some(2));
    }

    #[test]
    fn test_slice_and_line_start() {
        let text = SourceText::new("ab\ncd");
        assert_eq!(text.slice(3, 5), "cd");
        assert_eq!(text.slice(4, 99), "");
        assert_eq!(text.line_start(1), Some(3));
    }
}
