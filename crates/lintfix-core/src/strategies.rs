//! Fix strategies, one per rule family.
//!
//! Each strategy is a pure function of (tree, document, diagnostic, corrected line). Message
//! parsing is kept inside the strategy that needs it: the formats come from individual
//! linters, not from a shared schema.

use crate::diagnostic::Diagnostic;
use crate::document::Document;
use crate::error::FixError;
use crate::fix::{FixAction, FixCandidate, Resolution, TextEdit, TextRange};
use crate::locator::{anchor_offset, enclosing, locate, shifted_line_range};
use crate::syntax::{NodeKind, SyntaxNode, SyntaxTree};

/// The identifier Go uses for values that are intentionally discarded.
pub const DISCARD_IDENTIFIER: &str = "_";

/// Settings page that configures external formatters on save.
pub const FORMATTER_SETTINGS_PAGE: &str = "File Watchers";

/// A fix strategy selected by the [`DispatchTable`](crate::DispatchTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Insert a `//nolint:<linter>` directive above the reported line.
    SuppressLine,
    /// Rename an ineffectual assignment target to `_`.
    UnusedValueRename,
    /// Replace a parameter's type with the narrower one the linter suggests.
    ParameterTypeNarrowing,
    /// Delete empty lines inside the reported line range.
    RedundantWhitespace,
    /// Extract a repeated string literal into a constant.
    StringConstant,
    /// Terminate a comment with a period.
    CommentPeriod,
    /// Rename the package to its external test package.
    TestPackage,
    /// Add the `f` suffix printf-like functions are expected to carry.
    PrintfFuncName,
    /// Add the cases a switch is missing.
    ExhaustiveSwitch,
    /// Insert a blank line before the reported statement.
    NewlineBefore,
    /// Point the user at documentation instead of editing code.
    Explanation(&'static str),
    /// Point the user at the formatter settings.
    FormatterSettings,
    /// Highlight the first line of a duplicated block, no fix.
    DuplicateCode,
    /// Suppress a magic-number report on its line.
    MagicNumber,
    /// Suppress `unparam` for the function owning the reported parameter.
    UnusedParameter,
    /// Suppress the given linter for the whole enclosing function.
    FunctionSuppress(&'static str),
}

impl Strategy {
    /// Compute fix candidates and a highlight range for `diagnostic`.
    ///
    /// `line_override` is the 0-based document line the diagnostic refers to now.
    pub fn synthesize<T: SyntaxTree>(
        &self,
        tree: &T,
        document: &Document,
        diagnostic: &Diagnostic,
        line_override: usize,
    ) -> Result<Resolution, FixError> {
        let ctx = Context {
            tree,
            document,
            diagnostic,
            line_override,
        };

        match *self {
            Self::SuppressLine => Ok(suppress_line(&ctx)),
            Self::UnusedValueRename => Ok(unused_value_rename(&ctx)),
            Self::ParameterTypeNarrowing => Ok(parameter_type_narrowing(&ctx)),
            Self::RedundantWhitespace => redundant_whitespace(&ctx),
            Self::StringConstant => Ok(string_constant(&ctx)),
            Self::CommentPeriod => Ok(comment_period(&ctx)),
            Self::TestPackage => Ok(test_package(&ctx)),
            Self::PrintfFuncName => Ok(printf_func_name(&ctx)),
            Self::ExhaustiveSwitch => Ok(exhaustive_switch(&ctx)),
            Self::NewlineBefore => Ok(newline_before(&ctx)),
            Self::Explanation(url) => Ok(explanation(url)),
            Self::FormatterSettings => Ok(formatter_settings()),
            Self::DuplicateCode => duplicate_code(&ctx),
            Self::MagicNumber => Ok(magic_number(&ctx)),
            Self::UnusedParameter => Ok(unused_parameter(&ctx)),
            Self::FunctionSuppress(linter) => Ok(function_suppress(&ctx, linter)),
        }
    }
}

struct Context<'a, T> {
    tree: &'a T,
    document: &'a Document,
    diagnostic: &'a Diagnostic,
    line_override: usize,
}

impl<'a, T: SyntaxTree> Context<'a, T> {
    fn locate(&self, kind: NodeKind) -> Option<T::Node<'a>> {
        locate(
            self.tree,
            self.document,
            self.diagnostic,
            self.line_override,
            kind,
        )
    }

    fn missing_line_range(&self) -> FixError {
        FixError::MissingLineRange {
            rule: self.diagnostic.rule.clone(),
        }
    }
}

/// The word after the last space of a message, with backtick quoting removed.
///
/// `"ineffectual assignment to `x`"` → `"x"`.
fn last_word(message: &str) -> &str {
    let tail = message.rsplit(' ').next().unwrap_or(message);
    tail.trim_matches('`')
}

/// Everything after the first `": "` of a message.
///
/// `"missing cases in switch of type Dir: East, West"` → `"East, West"`.
fn after_first_colon(message: &str) -> Option<&str> {
    message
        .split_once(": ")
        .map(|(_, rest)| rest)
        .filter(|rest| !rest.is_empty())
}

/// `//nolint:<linter>`.
pub fn nolint_directive(linter: &str) -> String {
    format!("//nolint:{linter}")
}

fn suppressed_linter(diagnostic: &Diagnostic) -> &str {
    if diagnostic.source.is_empty() {
        &diagnostic.rule
    } else {
        &diagnostic.source
    }
}

/// Insert a directive line above `line`, indented like it.
fn directive_above(document: &Document, line: usize, linter: &str) -> Option<TextEdit> {
    let start = document.line_start_offset(line)?;
    let indent = document.line_indent(line);
    Some(TextEdit::insert(
        start,
        format!("{indent}{}\n", nolint_directive(linter)),
    ))
}

fn suppress_line_candidate(
    document: &Document,
    line: usize,
    linter: &str,
) -> Option<FixCandidate> {
    let edit = directive_above(document, line, linter)?;
    Some(FixCandidate::edits(
        format!("Suppress '{linter}' for this line"),
        vec![edit],
    ))
}

fn suppress_line<T: SyntaxTree>(ctx: &Context<'_, T>) -> Resolution {
    let linter = suppressed_linter(ctx.diagnostic);
    match suppress_line_candidate(ctx.document, ctx.line_override, linter) {
        Some(candidate) => Resolution::single(candidate, None),
        None => Resolution::none(),
    }
}

fn unused_value_rename<T: SyntaxTree>(ctx: &Context<'_, T>) -> Resolution {
    // A definition (`x := 1`) is never renamed: later usages would change meaning. A
    // reference (`x = 1`) can be renamed to `_` in place.
    let Some(reference) = ctx.locate(NodeKind::Reference) else {
        return Resolution::none();
    };

    let variable = last_word(&ctx.diagnostic.message);
    if reference.text() != variable {
        return Resolution::none();
    }

    let range = reference.range();
    Resolution::single(
        FixCandidate::edits(
            format!("Rename '{variable}' to {DISCARD_IDENTIFIER}"),
            vec![TextEdit::replace(range, DISCARD_IDENTIFIER)],
        ),
        Some(range),
    )
}

fn parameter_type_narrowing<T: SyntaxTree>(ctx: &Context<'_, T>) -> Resolution {
    let Some(parameter) = ctx.locate(NodeKind::ParameterDeclaration) else {
        return Resolution::none();
    };
    // The type clause is always the last child of a parameter declaration.
    let Some(type_node) = parameter.last_child() else {
        return Resolution::none();
    };

    let suggested = last_word(&ctx.diagnostic.message);
    let range = type_node.range();
    Resolution::single(
        FixCandidate::edits(
            format!("Replace parameter type with '{suggested}'"),
            vec![TextEdit::replace(range, suggested)],
        ),
        Some(range),
    )
}

/// Delete an empty line together with its terminator.
///
/// The phantom line after a trailing newline has no terminator of its own and is left alone.
fn delete_empty_line(document: &Document, line: usize) -> Option<TextEdit> {
    let start = document.line_start_offset(line)?;
    let next = document.line_start_offset(line + 1)?;
    Some(TextEdit::delete(TextRange::new(start, next)))
}

fn redundant_whitespace<T: SyntaxTree>(ctx: &Context<'_, T>) -> Result<Resolution, FixError> {
    let range = shifted_line_range(ctx.diagnostic, ctx.line_override)
        .ok_or_else(|| ctx.missing_line_range())?;
    let document = ctx.document;

    let mut edits = Vec::new();
    for line in (range.from..=range.to).rev() {
        let (Some(start), Some(end)) = (
            document.line_start_offset(line),
            document.line_end_offset(line),
        ) else {
            continue;
        };
        // Only truly empty lines: a line holding spaces or tabs is not what the linter flags.
        if start == end
            && let Some(edit) = delete_empty_line(document, line)
        {
            edits.push(edit);
        }
    }

    let highlight = match (
        document.line_start_offset(range.from),
        document.line_end_offset(range.to),
    ) {
        (Some(start), Some(end)) if start <= end => Some(TextRange::new(start, end)),
        _ => None,
    };

    if edits.is_empty() {
        return Ok(Resolution::highlight_only(highlight));
    }
    Ok(Resolution::single(
        FixCandidate::edits("Remove whitespace", edits),
        highlight,
    ))
}

fn string_constant<T: SyntaxTree>(ctx: &Context<'_, T>) -> Resolution {
    let Some(literal) = ctx.locate(NodeKind::StringLiteral) else {
        return Resolution::none();
    };
    let range = literal.range();
    Resolution::single(
        FixCandidate {
            label: format!("Introduce constant for {}", literal.text()),
            action: FixAction::IntroduceConstant {
                range,
                literal: literal.text().to_string(),
            },
        },
        Some(range),
    )
}

/// Comment text with a terminating period.
///
/// Line comments get the period appended; block comments get it before the closing `*/`.
pub fn with_trailing_period(comment: &str) -> String {
    if let Some(body) = comment.strip_suffix("*/")
        && comment.starts_with("/*")
    {
        let trimmed = body.trim_end();
        return format!("{trimmed}.{}*/", &body[trimmed.len()..]);
    }
    format!("{comment}.")
}

fn comment_period<T: SyntaxTree>(ctx: &Context<'_, T>) -> Resolution {
    let Some(comment) = ctx.locate(NodeKind::Comment) else {
        return Resolution::none();
    };
    // The linter only fires when the period is missing, so the text is not re-checked.
    let range = comment.range();
    Resolution::single(
        FixCandidate::edits(
            "Add '.' to the end",
            vec![TextEdit::replace(range, with_trailing_period(comment.text()))],
        ),
        Some(range),
    )
}

fn test_package<T: SyntaxTree>(ctx: &Context<'_, T>) -> Resolution {
    let Some(name) = ctx
        .locate(NodeKind::PackageClause)
        .and_then(|clause| clause.name())
    else {
        return Resolution::none();
    };

    let new_name = format!("{}_test", name.text());
    let range = name.range();
    Resolution::single(
        FixCandidate::edits(
            format!("Rename package to '{new_name}'"),
            vec![TextEdit::replace(range, new_name.as_str())],
        ),
        Some(range),
    )
}

fn printf_func_name<T: SyntaxTree>(ctx: &Context<'_, T>) -> Resolution {
    let Some(name) = ctx
        .locate(NodeKind::FunctionDeclaration)
        .and_then(|function| function.name())
    else {
        return Resolution::none();
    };

    let new_name = format!("{}f", name.text());
    let range = name.range();
    Resolution::single(
        FixCandidate {
            label: format!("Rename to '{new_name}'"),
            action: FixAction::Rename { range, new_name },
        },
        Some(range),
    )
}

fn append_case<N: SyntaxNode>(
    document: &Document,
    switch: &N,
    last_clause: Option<&N>,
    cases: &str,
) -> Option<TextEdit> {
    let brace = switch.range().end.checked_sub(1)?;
    if document.char_at(brace) != Some('}') {
        return None;
    }

    let line_index = document.line_index();
    let (brace_line, brace_column) = line_index.char_offset_to_position(brace);
    let indent = match last_clause {
        Some(clause) => {
            let (clause_line, _) = line_index.char_offset_to_position(clause.range().start);
            document.line_indent(clause_line)
        }
        None => document.line_indent(brace_line),
    };
    let clause = format!("{indent}case {cases}:\n");

    if brace_column == document.line_indent(brace_line).chars().count() {
        let line_start = document.line_start_offset(brace_line)?;
        Some(TextEdit::insert(line_start, clause))
    } else {
        Some(TextEdit::insert(brace, format!("\n{clause}")))
    }
}

fn exhaustive_switch<T: SyntaxTree>(ctx: &Context<'_, T>) -> Resolution {
    let Some(switch) = ctx.locate(NodeKind::SwitchStatement) else {
        return Resolution::none();
    };
    let highlight = switch.condition().map(|condition| condition.range());

    let clauses = switch
        .children()
        .into_iter()
        .filter(|child| matches!(child.kind(), NodeKind::CaseClause | NodeKind::DefaultClause))
        .collect::<Vec<_>>();
    // A trailing default already covers every value.
    if clauses
        .last()
        .is_some_and(|clause| clause.kind() == NodeKind::DefaultClause)
    {
        return Resolution::highlight_only(highlight);
    }

    let Some(edit) = after_first_colon(&ctx.diagnostic.message)
        .and_then(|cases| append_case(ctx.document, &switch, clauses.last(), cases))
    else {
        return Resolution::highlight_only(highlight);
    };

    Resolution::single(
        FixCandidate::edits("Add missing cases", vec![edit]),
        highlight,
    )
}

fn newline_before<T: SyntaxTree>(ctx: &Context<'_, T>) -> Resolution {
    let Some(start) = ctx.document.line_start_offset(ctx.line_override) else {
        return Resolution::none();
    };
    if !matches!(ctx.document.char_at(start), Some(' ' | '\t')) {
        return Resolution::none();
    }

    let highlight = anchor_offset(ctx.document, ctx.diagnostic, ctx.line_override)
        .and_then(|offset| ctx.tree.leaf_at(offset))
        .map(|leaf| leaf.range());
    Resolution::single(
        FixCandidate::edits(
            "Insert new line before",
            vec![TextEdit::insert(start, "\n")],
        ),
        highlight,
    )
}

fn explanation(url: &str) -> Resolution {
    Resolution::single(
        FixCandidate {
            label: "Show explanation".to_string(),
            action: FixAction::OpenExplanation {
                url: url.to_string(),
            },
        },
        None,
    )
}

fn formatter_settings() -> Resolution {
    Resolution::single(
        FixCandidate {
            label: format!("Configure {FORMATTER_SETTINGS_PAGE}"),
            action: FixAction::OpenSettings {
                page: FORMATTER_SETTINGS_PAGE.to_string(),
            },
        },
        None,
    )
}

fn duplicate_code<T: SyntaxTree>(ctx: &Context<'_, T>) -> Result<Resolution, FixError> {
    if ctx.diagnostic.line_range.is_none() {
        return Err(ctx.missing_line_range());
    }
    // Only the first line: a whole duplicated block underlined is noise.
    Ok(Resolution::highlight_only(
        ctx.document.line_range(ctx.line_override),
    ))
}

fn magic_number<T: SyntaxTree>(ctx: &Context<'_, T>) -> Resolution {
    let Some(literal) = ctx.locate(NodeKind::NumberLiteral) else {
        return Resolution::none();
    };
    let linter = suppressed_linter(ctx.diagnostic);
    match suppress_line_candidate(ctx.document, ctx.line_override, linter) {
        Some(candidate) => Resolution::single(candidate, Some(literal.range())),
        None => Resolution::highlight_only(Some(literal.range())),
    }
}

fn function_suppress_candidate<N: SyntaxNode>(
    document: &Document,
    function: &N,
    linter: &str,
) -> Option<FixCandidate> {
    let name = function
        .name()
        .map(|name| name.text().to_string())
        .unwrap_or_else(|| DISCARD_IDENTIFIER.to_string());
    let (line, _) = document
        .line_index()
        .char_offset_to_position(function.range().start);
    let edit = directive_above(document, line, linter)?;
    Some(FixCandidate::edits(
        format!("Suppress '{linter}' for function '{name}'"),
        vec![edit],
    ))
}

fn unused_parameter<T: SyntaxTree>(ctx: &Context<'_, T>) -> Resolution {
    let Some(parameter) = ctx.locate(NodeKind::ParameterDeclaration) else {
        return Resolution::none();
    };
    let highlight = Some(parameter.range());

    let candidate = enclosing(parameter, NodeKind::FunctionDeclaration).and_then(|function| {
        function_suppress_candidate(ctx.document, &function, suppressed_linter(ctx.diagnostic))
    });
    match candidate {
        Some(candidate) => Resolution::single(candidate, highlight),
        None => Resolution::highlight_only(highlight),
    }
}

fn function_suppress<T: SyntaxTree>(ctx: &Context<'_, T>, linter: &str) -> Resolution {
    let Some(function) = ctx.locate(NodeKind::FunctionDeclaration) else {
        return Resolution::none();
    };
    let highlight = function.name().map(|name| name.range());
    match function_suppress_candidate(ctx.document, &function, linter) {
        Some(candidate) => Resolution::single(candidate, highlight),
        None => Resolution::highlight_only(highlight),
    }
}
