//! Fix candidates and the edits they carry.
//!
//! Strategies never mutate a document or a syntax tree. They return descriptions of edits that
//! the host applies under its own undo/transaction discipline (or via
//! [`Document::apply_edits`](crate::Document::apply_edits) in headless use).

/// A half-open character-offset range (`start..end`) in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextRange {
    /// Range start offset (inclusive), in Unicode scalar values from the start of the document.
    pub start: usize,
    /// Range end offset (exclusive), in Unicode scalar values from the start of the document.
    pub end: usize,
}

impl TextRange {
    /// Create a new range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty range at `offset`.
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Returns `true` if `offset` lies within `start..end`.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// A single atomic text edit: replace `range` with `new_text`.
///
/// - insert: empty `range`
/// - delete: empty `new_text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// The range to replace (character offsets).
    pub range: TextRange,
    /// Replacement text (may contain newlines).
    pub new_text: String,
}

impl TextEdit {
    /// Insert `text` at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: TextRange::empty(offset),
            new_text: text.into(),
        }
    }

    /// Delete `range`.
    pub fn delete(range: TextRange) -> Self {
        Self {
            range,
            new_text: String::new(),
        }
    }

    /// Replace `range` with `text`.
    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: text.into(),
        }
    }
}

/// What applying a fix candidate does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixAction {
    /// Plain text edits, applied together as one atomic change.
    Edits(Vec<TextEdit>),
    /// Rename the declaration at `range` and every usage of it (host refactoring).
    Rename {
        /// Range of the declared name.
        range: TextRange,
        /// The new identifier.
        new_name: String,
    },
    /// Introduce a named constant holding the literal at `range` (host refactoring).
    IntroduceConstant {
        /// Range of the literal occurrence.
        range: TextRange,
        /// Literal text, quotes included.
        literal: String,
    },
    /// Send the user to an explanation instead of editing code.
    OpenExplanation {
        /// Documentation URL.
        url: String,
    },
    /// Open a host settings page.
    OpenSettings {
        /// Settings page name as the host presents it.
        page: String,
    },
}

/// A proposed, independently appliable resolution of a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixCandidate {
    /// Human-readable label shown in the host's quick-fix menu.
    pub label: String,
    /// The change this candidate performs.
    pub action: FixAction,
}

impl FixCandidate {
    /// A candidate made of text edits.
    pub fn edits(label: impl Into<String>, edits: Vec<TextEdit>) -> Self {
        Self {
            label: label.into(),
            action: FixAction::Edits(edits),
        }
    }

    /// Text edits carried by this candidate, if it is edit-based.
    pub fn text_edits(&self) -> Option<&[TextEdit]> {
        match &self.action {
            FixAction::Edits(edits) => Some(edits),
            _ => None,
        }
    }
}

/// Outcome of resolving one diagnostic.
///
/// No candidates is a valid "no fix available" outcome. `highlight` is independent of whether a
/// fix exists; `None` lets the host fall back to its own range for the diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Zero or more fix candidates.
    pub candidates: Vec<FixCandidate>,
    /// Range to underline.
    pub highlight: Option<TextRange>,
}

impl Resolution {
    /// No fix and no highlight.
    pub fn none() -> Self {
        Self::default()
    }

    /// A single candidate with an optional highlight.
    pub fn single(candidate: FixCandidate, highlight: Option<TextRange>) -> Self {
        Self {
            candidates: vec![candidate],
            highlight,
        }
    }

    /// No fix, only a highlight.
    pub fn highlight_only(highlight: Option<TextRange>) -> Self {
        Self {
            candidates: Vec::new(),
            highlight,
        }
    }

    /// Returns `true` if at least one candidate is offered.
    pub fn has_fix(&self) -> bool {
        !self.candidates.is_empty()
    }
}
