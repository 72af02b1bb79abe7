//! Analyzer diagnostics as consumed by the fix engine.
//!
//! Positions follow the analyzer's convention: 1-based lines and columns, with column `0`
//! meaning "no column reported". Document coordinates used elsewhere in this crate are
//! 0-based; [`Diagnostic::document_line`] bridges the two.

use std::path::PathBuf;

/// A reported source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePosition {
    /// 1-based line.
    pub line: usize,
    /// 1-based column, `0` if unknown.
    pub column: usize,
}

impl SourcePosition {
    /// Create a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// An inclusive line range carried by block-level diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// First line.
    pub from: usize,
    /// Last line (inclusive).
    pub to: usize,
}

impl LineRange {
    /// Create a new range.
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Move both ends by `shift` lines, saturating at zero.
    pub fn shifted(self, shift: isize) -> Self {
        Self {
            from: self.from.saturating_add_signed(shift),
            to: self.to.saturating_add_signed(shift),
        }
    }
}

/// A single issue reported by the external analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Rule identifier used for dispatch (for golangci-lint: the reporting linter).
    pub rule: String,
    /// Message text, verbatim.
    pub message: String,
    /// File the issue was reported for.
    pub file: PathBuf,
    /// Reported position.
    pub position: SourcePosition,
    /// Optional line range (`whitespace`, `dupl`, ...).
    pub line_range: Option<LineRange>,
    /// Name of the tool that produced the issue.
    pub source: String,
}

impl Diagnostic {
    /// Create a diagnostic whose rule and source share a linter name.
    pub fn new(
        linter: impl Into<String>,
        message: impl Into<String>,
        file: impl Into<PathBuf>,
        position: SourcePosition,
    ) -> Self {
        let linter = linter.into();
        Self {
            rule: linter.clone(),
            message: message.into(),
            file: file.into(),
            position,
            line_range: None,
            source: linter,
        }
    }

    /// Attach a line range.
    pub fn with_line_range(mut self, range: LineRange) -> Self {
        self.line_range = Some(range);
        self
    }

    /// The 0-based document line for an unedited document.
    pub fn document_line(&self) -> usize {
        self.position.line.saturating_sub(1)
    }

    /// `line_override - line`: the shift to apply to analyzer line numbers carried by this
    /// diagnostic so they address the current document.
    pub fn line_shift(&self, line_override: usize) -> isize {
        line_override as isize - self.position.line as isize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_shift_maps_analyzer_lines_to_document_lines() {
        let diag = Diagnostic::new(
            "whitespace",
            "unnecessary leading newline",
            "a.go",
            SourcePosition::new(5, 1),
        )
        .with_line_range(LineRange::new(5, 7));

        let shift = diag.line_shift(diag.document_line());
        assert_eq!(shift, -1);
        assert_eq!(diag.line_range.unwrap().shifted(shift), LineRange::new(4, 6));
    }

    #[test]
    fn test_shifted_saturates() {
        assert_eq!(LineRange::new(1, 2).shifted(-5), LineRange::new(0, 0));
    }
}
