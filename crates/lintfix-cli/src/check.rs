use crate::cli::CheckArgs;
use anyhow::{Context, Result};
use lintfix_core::{Diagnostic, Document, FixAction, FixCandidate, Inspection, apply_fixes, inspect};
use lintfix_golangci::{LintCommand, Platform, SystemRunner, parse_report, run_report};
use lintfix_treesitter::GoSyntaxTree;
use std::fs;
use std::path::{Path, PathBuf};

pub fn execute(args: &CheckArgs) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let file = fs::canonicalize(&args.file)
        .with_context(|| format!("failed to resolve {}", args.file.display()))?;
    let (diagnostics, base) = load_diagnostics(args, &file)?;
    let diagnostics = diagnostics
        .into_iter()
        .filter(|diagnostic| same_file(&diagnostic.file, &base, &file))
        .collect::<Vec<_>>();

    let document = Document::new(text.as_str());
    let tree = GoSyntaxTree::parse(text).context("failed to parse Go source")?;
    if tree.has_errors() {
        tracing::warn!(file = %args.file.display(), "source has syntax errors");
    }

    let inspections = inspect(&tree, &document, &diagnostics, Diagnostic::document_line);
    if inspections.is_empty() {
        println!("{}: no issues", args.file.display());
    }
    for inspection in &inspections {
        print_inspection(&args.file, inspection);
    }

    if args.apply {
        let result = apply_fixes(&document, &inspections)?;
        if result.applied > 0 {
            fs::write(&args.file, &result.text)
                .with_context(|| format!("failed to write {}", args.file.display()))?;
        }
        println!("applied {} fix(es), skipped {}", result.applied, result.skipped);
    }
    Ok(())
}

/// Diagnostics plus the directory their relative paths are resolved against.
fn load_diagnostics(args: &CheckArgs, file: &Path) -> Result<(Vec<Diagnostic>, PathBuf)> {
    if let Some(report) = &args.report {
        let json = fs::read_to_string(report)
            .with_context(|| format!("failed to read {}", report.display()))?;
        let diagnostics = parse_report(&json)
            .with_context(|| format!("failed to parse {}", report.display()))?;
        let base = match &args.report_root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("failed to read the current directory")?,
        };
        return Ok((diagnostics, base));
    }

    // The linter runs next to the file; a relative linter path must survive the move.
    let base = file.parent().map(Path::to_path_buf).unwrap_or_default();
    let linter = if args.linter.components().count() > 1 {
        fs::canonicalize(&args.linter).unwrap_or_else(|_| args.linter.clone())
    } else {
        args.linter.clone()
    };
    let target = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut command = LintCommand::golangci(linter, [target]).current_dir(&base);
    if let Some(distribution) = args.wsl.as_deref() {
        command = Platform::detect(Some(distribution))?.build_command(&command);
    }
    let diagnostics = run_report(&SystemRunner, &command)
        .with_context(|| format!("failed to run {}", args.linter.display()))?;
    Ok((diagnostics, base))
}

/// `reported` (relative to `base` unless absolute) names the canonical path `file`.
fn same_file(reported: &Path, base: &Path, file: &Path) -> bool {
    let resolved = base.join(reported);
    fs::canonicalize(&resolved).is_ok_and(|resolved| resolved == file)
}

fn print_inspection(file: &Path, inspection: &Inspection) {
    let diagnostic = &inspection.diagnostic;
    println!(
        "{}:{}:{}: {} ({})",
        file.display(),
        diagnostic.position.line,
        diagnostic.position.column,
        diagnostic.message,
        diagnostic.rule
    );
    if inspection.resolution.candidates.is_empty() {
        println!("    no fix available");
    }
    for candidate in &inspection.resolution.candidates {
        println!("    fix: {}", describe(candidate));
    }
}

fn describe(candidate: &FixCandidate) -> String {
    match &candidate.action {
        FixAction::Edits(_) => candidate.label.clone(),
        FixAction::Rename { new_name, .. } => {
            format!("{} (rename all usages to {new_name})", candidate.label)
        }
        FixAction::IntroduceConstant { .. } => format!("{} (refactoring)", candidate.label),
        FixAction::OpenExplanation { url } => format!("{}: {url}", candidate.label),
        FixAction::OpenSettings { page } => format!("{} (settings: {page})", candidate.label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::ffi::OsString;

    #[test]
    fn test_same_file_resolves_against_base() {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        fs::create_dir(root.join("cmd")).unwrap();
        fs::write(root.join("main.go"), "package main\n").unwrap();
        fs::write(root.join("cmd").join("main.go"), "package main\n").unwrap();
        let file = root.join("cmd").join("main.go");

        assert!(same_file(Path::new("cmd/main.go"), &root, &file));
        assert!(same_file(Path::new("./cmd/../cmd/main.go"), &root, &file));
        assert!(same_file(&file, Path::new("/elsewhere"), &file));
        assert!(!same_file(Path::new("main.go"), &root, &file));
        assert!(!same_file(Path::new("missing.go"), &root, &file));
    }

    #[test]
    fn test_check_applies_fixes_from_saved_report() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("main.go");
        let source = [
            "package main",
            "",
            "import \"fmt\"",
            "",
            "func main() {",
            "\tx := 0",
            "\tfmt.Println(x)",
            "\tx = 1",
            "}",
        ];
        fs::write(&file, source.join("\n") + "\n").unwrap();
        let report = dir.path().join("report.json");
        fs::write(
            &report,
            r#"{"Issues": [{"FromLinter": "ineffassign", "Text": "ineffectual assignment to x",
                "Pos": {"Filename": "main.go", "Line": 8, "Column": 2}}]}"#,
        )
        .unwrap();

        let argv: Vec<OsString> = vec![
            "lintfix".into(),
            "check".into(),
            file.clone().into(),
            "--report".into(),
            report.clone().into(),
            "--report-root".into(),
            dir.path().into(),
            "--apply".into(),
        ];
        let cli = Cli::try_parse_from(argv).unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        execute(&args).unwrap();

        let fixed = fs::read_to_string(&file).unwrap();
        assert_eq!(fixed.lines().nth(7), Some("\t_ = 1"));
        assert_eq!(fixed.lines().nth(5), Some("\tx := 0"));
    }
}
