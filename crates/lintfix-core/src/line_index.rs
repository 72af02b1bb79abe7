//! Rope-backed logical line index.
//!
//! Offsets are character offsets (Unicode scalar values) unless a method name says `byte`.
//! Lines are 0-based, matching document coordinates rather than analyzer coordinates.

use ropey::Rope;

/// Logical line index over an immutable document snapshot.
///
/// Rope provides O(log N) line lookups, which keeps per-diagnostic offset resolution cheap even
/// for large files.
#[derive(Debug, Clone)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an index for an empty document.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build the index from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total line count (an empty document has one line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Character offset of the first character of `line`.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        if line >= self.rope.len_lines() {
            return None;
        }
        Some(self.rope.line_to_char(line))
    }

    /// Character offset just past the last character of `line`, excluding `\n` / `\r\n`.
    pub fn line_end(&self, line: usize) -> Option<usize> {
        let start = self.line_start(line)?;
        let next = if line + 1 < self.rope.len_lines() {
            self.rope.line_to_char(line + 1)
        } else {
            self.rope.len_chars()
        };

        let mut end = next;
        if end > start && self.rope.char(end - 1) == '\n' {
            end -= 1;
        }
        if end > start && self.rope.char(end - 1) == '\r' {
            end -= 1;
        }
        Some(end)
    }

    /// Text of `line` without its line terminator.
    pub fn get_line_text(&self, line: usize) -> Option<String> {
        let start = self.line_start(line)?;
        let end = self.line_end(line)?;
        Some(self.rope.slice(start..end).to_string())
    }

    /// Character at `char_offset`, if inside the document.
    pub fn char_at(&self, char_offset: usize) -> Option<char> {
        (char_offset < self.rope.len_chars()).then(|| self.rope.char(char_offset))
    }

    /// Text in `start..end` (character offsets, clamped to the document).
    pub fn slice(&self, start: usize, end: usize) -> String {
        let len = self.rope.len_chars();
        let end = end.min(len);
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Get line number and column (both in characters) from a character offset.
    pub fn char_offset_to_position(&self, char_offset: usize) -> (usize, usize) {
        let char_offset = char_offset.min(self.rope.len_chars());

        let line_idx = self.rope.char_to_line(char_offset);
        let line_start_char = self.rope.line_to_char(line_idx);

        (line_idx, char_offset - line_start_char)
    }

    /// Get a character offset from line and column, clamping the column to the line length.
    pub fn position_to_char_offset(&self, line: usize, column: usize) -> usize {
        match (self.line_start(line), self.line_end(line)) {
            (Some(start), Some(end)) => start + column.min(end - start),
            _ => self.rope.len_chars(),
        }
    }

    /// Convert a character offset into a UTF-8 byte offset.
    pub fn char_offset_to_byte_offset(&self, char_offset: usize) -> usize {
        self.rope
            .char_to_byte(char_offset.min(self.rope.len_chars()))
    }

    /// Convert a UTF-8 byte offset into a character offset.
    ///
    /// Offsets inside a multi-byte character resolve to that character.
    pub fn byte_offset_to_char_offset(&self, byte_offset: usize) -> usize {
        self.rope
            .byte_to_char(byte_offset.min(self.rope.len_bytes()))
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}
