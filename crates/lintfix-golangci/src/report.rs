//! golangci-lint JSON reports → core diagnostics.

use crate::error::ReportError;
use crate::process::{LintCommand, ProcessRunner};
use lintfix_core::{Diagnostic, LineRange, SourcePosition};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawReport {
    #[serde(default)]
    issues: Option<Vec<RawIssue>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawIssue {
    from_linter: String,
    text: String,
    pos: RawPosition,
    #[serde(default)]
    line_range: Option<RawLineRange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawPosition {
    filename: String,
    #[serde(default)]
    line: usize,
    #[serde(default)]
    column: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawLineRange {
    from: usize,
    to: usize,
}

impl From<RawIssue> for Diagnostic {
    fn from(issue: RawIssue) -> Self {
        let position = SourcePosition::new(issue.pos.line, issue.pos.column);
        let diagnostic =
            Diagnostic::new(issue.from_linter, issue.text, issue.pos.filename, position);
        match issue.line_range {
            Some(range) => diagnostic.with_line_range(LineRange::new(range.from, range.to)),
            None => diagnostic,
        }
    }
}

/// Parse a report. A `null` or missing `Issues` array is an empty batch.
pub fn parse_report(json: &str) -> Result<Vec<Diagnostic>, ReportError> {
    let report: RawReport = serde_json::from_str(json)?;
    Ok(report
        .issues
        .unwrap_or_default()
        .into_iter()
        .map(Diagnostic::from)
        .collect())
}

/// Run the analyzer and parse its report.
///
/// golangci-lint exits with 1 when it found issues; only an empty standard output counts as
/// a failure.
pub fn run_report<R: ProcessRunner + ?Sized>(
    runner: &R,
    command: &LintCommand,
) -> Result<Vec<Diagnostic>, ReportError> {
    let output = runner.run(command)?;
    if output.stdout.trim().is_empty() {
        return Err(ReportError::Failed {
            code: output.exit_code,
            stderr: output.stderr.trim().to_string(),
        });
    }
    if !output.stderr.is_empty() {
        tracing::debug!(stderr = %output.stderr.trim(), "analyzer stderr");
    }
    let diagnostics = parse_report(&output.stdout)?;
    tracing::debug!(count = diagnostics.len(), exit_code = ?output.exit_code, "parsed report");
    Ok(diagnostics)
}
