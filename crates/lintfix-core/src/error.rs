use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Invariant violations reported by fix strategies.
///
/// "No applicable fix" is never an error: it is an empty [`Resolution`](crate::Resolution).
pub enum FixError {
    #[error("diagnostic for rule '{rule}' is missing its line range")]
    /// The strategy needs `line_range` but the diagnostic carries none.
    MissingLineRange {
        /// Rule identifier of the offending diagnostic.
        rule: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced when applying text edits to a [`Document`](crate::Document).
pub enum EditError {
    #[error("edit range {start}..{end} is outside the document ({len} chars)")]
    /// An edit addresses characters past the end of the document.
    OutOfRange {
        /// Range start.
        start: usize,
        /// Range end.
        end: usize,
        /// Document length in characters.
        len: usize,
    },

    #[error("edits overlap at offset {0}")]
    /// Two edits of the same candidate touch the same characters.
    Overlap(usize),
}
