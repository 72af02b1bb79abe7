//! Batch resolution of diagnostics into inspections.

use crate::diagnostic::Diagnostic;
use crate::dispatch::DispatchTable;
use crate::document::Document;
use crate::error::{EditError, FixError};
use crate::fix::{Resolution, TextEdit};
use crate::syntax::SyntaxTree;

/// A resolved diagnostic, ready for the host to surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    /// The diagnostic as reported.
    pub diagnostic: Diagnostic,
    /// Fix candidates and highlight range.
    pub resolution: Resolution,
}

/// Resolve one diagnostic at `line_override` (0-based document line).
pub fn resolve<T: SyntaxTree>(
    tree: &T,
    document: &Document,
    diagnostic: &Diagnostic,
    line_override: usize,
) -> Result<Resolution, FixError> {
    let strategy = DispatchTable::global().resolve(&diagnostic.rule);
    tracing::debug!(rule = %diagnostic.rule, ?strategy, line_override, "resolving diagnostic");
    strategy.synthesize(tree, document, diagnostic, line_override)
}

/// Resolve a batch of diagnostics reported against `document`.
///
/// `line_override` maps each diagnostic to its current document line; hosts that track edits
/// since the analyzer run supply their own mapping, others can use
/// [`Diagnostic::document_line`]. Diagnostics whose strategy reports an invariant violation are
/// logged and skipped; they never abort the batch.
pub fn inspect<'d, T, F>(
    tree: &T,
    document: &Document,
    diagnostics: impl IntoIterator<Item = &'d Diagnostic>,
    mut line_override: F,
) -> Vec<Inspection>
where
    T: SyntaxTree,
    F: FnMut(&Diagnostic) -> usize,
{
    let mut out = Vec::new();
    for diagnostic in diagnostics {
        let line = line_override(diagnostic);
        match resolve(tree, document, diagnostic, line) {
            Ok(resolution) => out.push(Inspection {
                diagnostic: diagnostic.clone(),
                resolution,
            }),
            Err(err) => {
                tracing::warn!(
                    rule = %diagnostic.rule,
                    file = %diagnostic.file.display(),
                    "skipping diagnostic: {err}"
                );
            }
        }
    }
    out
}

/// Result of [`apply_fixes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFixes {
    /// Document text after all applied candidates.
    pub text: String,
    /// Number of candidates applied.
    pub applied: usize,
    /// Candidates skipped because an already applied candidate changed their span.
    pub skipped: usize,
}

/// Apply the first edit-based candidate of every inspection, one candidate at a time.
///
/// Candidates are taken from the end of the document backwards so offsets computed against
/// the input snapshot stay valid. A candidate that reaches into text an applied candidate
/// already changed no longer applies and is skipped.
pub fn apply_fixes(
    document: &Document,
    inspections: &[Inspection],
) -> Result<AppliedFixes, EditError> {
    let mut pending = inspections
        .iter()
        .filter_map(|inspection| {
            inspection
                .resolution
                .candidates
                .iter()
                .find_map(|candidate| candidate.text_edits())
                .filter(|edits| !edits.is_empty())
                .map(|edits| (inspection, edits))
        })
        .collect::<Vec<_>>();
    pending.sort_by_key(|(_, edits)| std::cmp::Reverse(span(edits)));

    let mut current = document.clone();
    let mut floor = document.char_count();
    let mut applied = 0;
    let mut skipped = 0;
    for (inspection, edits) in pending {
        let (start, end) = span(edits);
        if end > floor {
            tracing::debug!(
                rule = %inspection.diagnostic.rule,
                start,
                end,
                "fix no longer applies"
            );
            skipped += 1;
            continue;
        }
        current = Document::new(current.apply_edits(edits)?);
        floor = start;
        applied += 1;
    }

    Ok(AppliedFixes {
        text: current.text().to_string(),
        applied,
        skipped,
    })
}

/// `(min start, max end)` over a non-empty edit list.
fn span(edits: &[TextEdit]) -> (usize, usize) {
    edits.iter().fold((usize::MAX, 0), |(start, end), edit| {
        (start.min(edit.range.start), end.max(edit.range.end))
    })
}
