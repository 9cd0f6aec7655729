//! Rope-backed line index and UTF-16 coordinate conversion.
//!
//! Protocol positions address lines by index and columns in UTF-16 code units. The rope stores
//! text by Unicode scalar value, so every public entry point converts at the boundary.

use crate::error::{AnalysisError, AnalysisResult};
use ropey::Rope;

/// A zero-based position; `character` counts UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Line index (0-based).
    pub line: u32,
    /// Column in UTF-16 code units (0-based).
    pub character: u32,
}

impl Position {
    /// Create a new position.
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open range between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    /// Start position (inclusive).
    pub start: Position,
    /// End position (exclusive).
    pub end: Position,
}

impl Range {
    /// Create a new range.
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Conversions between UTF-16 columns and Rust string offsets within a single line.
pub struct CoordinateConverter;

impl CoordinateConverter {
    /// UTF-16 length of `text`.
    pub fn utf16_len(text: &str) -> usize {
        text.encode_utf16().count()
    }

    /// UTF-16 column of the byte offset `byte` (which must be a char boundary).
    pub fn byte_to_utf16(text: &str, byte: usize) -> usize {
        Self::utf16_len(&text[..byte.min(text.len())])
    }

    /// Byte offset of a UTF-16 column.
    ///
    /// Returns `None` when the column lies past the end of `text` or inside a surrogate pair.
    pub fn utf16_to_byte(text: &str, utf16_offset: usize) -> Option<usize> {
        let mut current = 0;
        for (byte, ch) in text.char_indices() {
            if current == utf16_offset {
                return Some(byte);
            }
            if current > utf16_offset {
                return None;
            }
            current += ch.len_utf16();
        }
        (current == utf16_offset).then_some(text.len())
    }

    /// Char (Unicode scalar) offset of a UTF-16 column, with the same failure rules as
    /// [`CoordinateConverter::utf16_to_byte`].
    pub fn utf16_to_char(text: &str, utf16_offset: usize) -> Option<usize> {
        let byte = Self::utf16_to_byte(text, utf16_offset)?;
        Some(text[..byte].chars().count())
    }
}

/// Strip one trailing `\r\n`, `\n` or `\r`.
fn trim_line_break(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .or_else(|| line.strip_suffix('\r'))
        .unwrap_or(line)
}

/// Logical line index backed by a rope.
///
/// Lines break on `\n`, `\r\n` and a lone `\r`, the same set LSP clients use. Unicode separators
/// such as U+2028 stay inside their line.
///
/// Cloning is O(1) (the rope shares its nodes), which makes document snapshots cheap.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an empty index (one empty line).
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build an index from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total line count. A trailing line break starts a final empty line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character (Unicode scalar) count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// The complete text.
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }

    /// Text of the given line, excluding its line terminator.
    pub fn get_line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let text = self.rope.line(line).to_string();
        Some(trim_line_break(&text).to_string())
    }

    /// Iterate every line (without terminators) in order.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.rope
            .lines()
            .map(|line| trim_line_break(&line.to_string()).to_string())
    }

    /// Convert a protocol position to a character offset in the document.
    ///
    /// Fails with [`AnalysisError::InvalidPosition`] when the line does not exist or the column
    /// lies outside the line (or inside a surrogate pair).
    pub fn char_offset(&self, position: Position) -> AnalysisResult<usize> {
        let invalid = || AnalysisError::InvalidPosition {
            line: position.line,
            character: position.character,
        };

        let line = position.line as usize;
        let line_text = self.get_line_text(line).ok_or_else(invalid)?;
        let char_in_line =
            CoordinateConverter::utf16_to_char(&line_text, position.character as usize)
                .ok_or_else(invalid)?;

        Ok(self.rope.line_to_char(line) + char_in_line)
    }

    /// Convert a character offset into a protocol position (clamped to the document end).
    pub fn position_of(&self, char_offset: usize) -> Position {
        let char_offset = char_offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(char_offset);
        let line_start = self.rope.line_to_char(line);
        let character: usize = self
            .rope
            .slice(line_start..char_offset)
            .chars()
            .map(char::len_utf16)
            .sum();

        Position::new(line as u32, character as u32)
    }

    /// Replace the characters in `start..end` with `text`.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) {
        let len = self.rope.len_chars();
        let start = start.min(len);
        let end = end.clamp(start, len);

        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_line_index() {
        let index = LineIndex::new();
        assert_eq!(index.line_count(), 1); // Rope empty document has 1 line
        assert_eq!(index.char_count(), 0);
        assert_eq!(index.get_line_text(0).as_deref(), Some(""));
    }

    #[test]
    fn test_line_text_strips_terminators() {
        let index = LineIndex::from_text("app \"Shop\":\r\n  title: Shop\n");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.get_line_text(0).as_deref(), Some("app \"Shop\":"));
        assert_eq!(index.get_line_text(1).as_deref(), Some("  title: Shop"));
        assert_eq!(index.get_line_text(2).as_deref(), Some(""));
        assert_eq!(index.get_line_text(3), None);
    }

    #[test]
    fn test_unicode_separators_do_not_break_lines() {
        let index = LineIndex::from_text("a\u{2028}b\u{0085}c\u{000C}d\nnext\rlast");
        assert_eq!(index.line_count(), 3);
        assert_eq!(
            index.get_line_text(0).as_deref(),
            Some("a\u{2028}b\u{0085}c\u{000C}d")
        );
        assert_eq!(index.get_line_text(1).as_deref(), Some("next"));
        assert_eq!(index.get_line_text(2).as_deref(), Some("last"));
        assert_eq!(index.char_offset(Position::new(1, 0)), Ok(8));
    }

    #[test]
    fn test_lines_matches_get_line_text() {
        let index = LineIndex::from_text("a\nb\r\nc");
        let lines: Vec<String> = index.lines().collect();
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_char_offset() {
        let index = LineIndex::from_text("ABC\nDEF\nGHI");

        assert_eq!(index.char_offset(Position::new(0, 0)), Ok(0));
        assert_eq!(index.char_offset(Position::new(0, 3)), Ok(3));
        assert_eq!(index.char_offset(Position::new(1, 0)), Ok(4));
        assert_eq!(index.char_offset(Position::new(2, 2)), Ok(10));
    }

    #[test]
    fn test_char_offset_rejects_out_of_range() {
        let index = LineIndex::from_text("ABC\nDEF");

        assert_eq!(
            index.char_offset(Position::new(2, 0)),
            Err(AnalysisError::InvalidPosition {
                line: 2,
                character: 0
            })
        );
        assert!(index.char_offset(Position::new(0, 4)).is_err());
    }

    #[test]
    fn test_utf16_columns() {
        // '👋' is two UTF-16 code units.
        let index = LineIndex::from_text("a👋b");

        assert_eq!(index.char_offset(Position::new(0, 1)), Ok(1));
        assert_eq!(index.char_offset(Position::new(0, 3)), Ok(2));
        assert!(index.char_offset(Position::new(0, 2)).is_err());
        assert_eq!(index.position_of(2), Position::new(0, 3));
    }

    #[test]
    fn test_converter_cjk() {
        let text = "你好 world";
        assert_eq!(CoordinateConverter::utf16_len(text), 8);
        assert_eq!(CoordinateConverter::utf16_to_byte(text, 2), Some(6));
        assert_eq!(CoordinateConverter::byte_to_utf16(text, 6), 2);
        assert_eq!(CoordinateConverter::utf16_to_byte(text, 9), None);
    }

    #[test]
    fn test_replace() {
        let mut index = LineIndex::from_text("Hello World");

        index.replace(6, 6, "Beautiful ");
        assert_eq!(index.get_text(), "Hello Beautiful World");

        index.replace(6, 16, "");
        assert_eq!(index.get_text(), "Hello World");

        index.replace(0, 5, "Goodbye");
        assert_eq!(index.get_text(), "Goodbye World");
    }

    #[test]
    fn test_large_document() {
        let text = (0..10_000)
            .map(|i| format!("model M{i}:"))
            .collect::<Vec<_>>()
            .join("\n");
        let index = LineIndex::from_text(&text);

        assert_eq!(index.line_count(), 10_000);
        assert_eq!(index.get_line_text(5000).as_deref(), Some("model M5000:"));
    }
}
