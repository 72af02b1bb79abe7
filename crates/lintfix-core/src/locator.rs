//! Map a diagnostic position onto an anchor node.
//!
//! Diagnostics point at a token, while fixes operate on an enclosing construct whose kind
//! depends on the rule. The locator resolves the leaf at the reported position and walks
//! ancestor links until the required [`NodeKind`] is found.

use crate::diagnostic::{Diagnostic, LineRange};
use crate::document::Document;
use crate::syntax::{NodeKind, SyntaxNode, SyntaxTree};

/// Character offset a diagnostic addresses once moved to `line_override`.
///
/// The reported column is clamped to the line. Column `0` anchors at the first non-whitespace
/// character. Returns `None` if `line_override` is outside the document.
pub fn anchor_offset(
    document: &Document,
    diagnostic: &Diagnostic,
    line_override: usize,
) -> Option<usize> {
    let start = document.line_start_offset(line_override)?;
    let end = document.line_end_offset(line_override)?;

    let offset = match diagnostic.position.column {
        0 => {
            let indent = document.line_indent(line_override).chars().count();
            start + indent
        }
        column => document
            .line_index()
            .position_to_char_offset(line_override, column - 1),
    };
    Some(offset.min(end))
}

/// The diagnostic's line range moved by `line_override - diagnostic.line`.
pub fn shifted_line_range(diagnostic: &Diagnostic, line_override: usize) -> Option<LineRange> {
    let shift = diagnostic.line_shift(line_override);
    diagnostic.line_range.map(|range| range.shifted(shift))
}

/// Walk from `node` (inclusive) up to the root, returning the first node of `kind`.
pub fn enclosing<N: SyntaxNode>(node: N, kind: NodeKind) -> Option<N> {
    let mut current = Some(node);
    while let Some(node) = current {
        if node.kind() == kind {
            return Some(node);
        }
        current = node.parent();
    }
    None
}

/// Find the node of `kind` enclosing the diagnostic's (line-corrected) position.
///
/// When nothing of `kind` covers the position, the character before it is tried, as long as
/// it is on the same line.
pub fn locate<'t, T: SyntaxTree>(
    tree: &'t T,
    document: &Document,
    diagnostic: &Diagnostic,
    line_override: usize,
    kind: NodeKind,
) -> Option<T::Node<'t>> {
    let Some(offset) = anchor_offset(document, diagnostic, line_override) else {
        tracing::debug!(
            rule = %diagnostic.rule,
            line_override,
            "diagnostic line is outside the document"
        );
        return None;
    };

    let find = |offset: usize| tree.leaf_at(offset).and_then(|leaf| enclosing(leaf, kind));
    // A column one past the last character (godot) lands just after the token it is about.
    let found = find(offset).or_else(|| {
        let line_start = document.line_start_offset(line_override)?;
        if offset > line_start {
            find(offset - 1)
        } else {
            None
        }
    });
    if found.is_none() {
        tracing::debug!(rule = %diagnostic.rule, offset, ?kind, "no anchor node found");
    }
    found
}
