//! Immutable document snapshot used while resolving fixes.

use crate::error::EditError;
use crate::fix::{TextEdit, TextRange};
use crate::line_index::LineIndex;

/// A read-only snapshot of one source file.
///
/// All offsets are character offsets; all lines are 0-based.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    line_index: LineIndex,
}

impl Document {
    /// Create a snapshot from text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_index = LineIndex::from_text(&text);
        Self { text, line_index }
    }

    /// Full text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The underlying line index.
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.line_index.line_count()
    }

    /// Length in characters.
    pub fn char_count(&self) -> usize {
        self.line_index.char_count()
    }

    /// Offset of the first character of `line`.
    pub fn line_start_offset(&self, line: usize) -> Option<usize> {
        self.line_index.line_start(line)
    }

    /// Offset just past the last character of `line`, excluding the line terminator.
    pub fn line_end_offset(&self, line: usize) -> Option<usize> {
        self.line_index.line_end(line)
    }

    /// The range of `line` without its terminator.
    pub fn line_range(&self, line: usize) -> Option<TextRange> {
        Some(TextRange::new(
            self.line_start_offset(line)?,
            self.line_end_offset(line)?,
        ))
    }

    /// Text of `line` without its terminator.
    pub fn line_text(&self, line: usize) -> Option<String> {
        self.line_index.get_line_text(line)
    }

    /// Leading spaces and tabs of `line`.
    pub fn line_indent(&self, line: usize) -> String {
        self.line_text(line)
            .map(|text| {
                text.chars()
                    .take_while(|c| *c == ' ' || *c == '\t')
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Character at `offset`.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.line_index.char_at(offset)
    }

    /// Text covered by `range` (clamped to the document).
    pub fn slice(&self, range: TextRange) -> String {
        self.line_index.slice(range.start, range.end)
    }

    /// Apply one candidate's edits and return the resulting text.
    ///
    /// Edits are expressed against this snapshot. They are applied from the end of the document
    /// backwards so earlier offsets stay valid; inserts sharing an offset keep their order.
    pub fn apply_edits(&self, edits: &[TextEdit]) -> Result<String, EditError> {
        let len = self.char_count();
        let mut sorted = edits.iter().collect::<Vec<_>>();
        sorted.sort_by_key(|edit| (edit.range.start, edit.range.end));

        for edit in &sorted {
            if edit.range.start > edit.range.end || edit.range.end > len {
                return Err(EditError::OutOfRange {
                    start: edit.range.start,
                    end: edit.range.end,
                    len,
                });
            }
        }
        for pair in sorted.windows(2) {
            if pair[0].range.end > pair[1].range.start {
                return Err(EditError::Overlap(pair[1].range.start));
            }
        }

        let mut out = self.text.clone();
        for edit in sorted.iter().rev() {
            let start = self.line_index.char_offset_to_byte_offset(edit.range.start);
            let end = self.line_index.char_offset_to_byte_offset(edit.range.end);
            out.replace_range(start..end, &edit.new_text);
        }
        Ok(out)
    }
}
