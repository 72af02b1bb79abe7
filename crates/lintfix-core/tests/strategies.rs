mod common;

use common::ArenaTree;
use lintfix_core::{
    Diagnostic, Document, FixAction, FixCandidate, FixError, LineRange, NodeKind, Resolution,
    SourcePosition, TextEdit, TextRange, inspect, resolve,
};
use pretty_assertions::assert_eq;

fn source(lines: &[&str]) -> String {
    lines.join("\n")
}

/// Range of `needle` within document line `line`.
fn range_on_line(document: &Document, line: usize, needle: &str) -> TextRange {
    let text = document.line_text(line).unwrap();
    let column = text.find(needle).unwrap();
    let start = document.line_start_offset(line).unwrap() + column;
    TextRange::new(start, start + needle.len())
}

fn diagnostic(rule: &str, message: &str, line: usize, column: usize) -> Diagnostic {
    Diagnostic::new(rule, message, "main.go", SourcePosition::new(line, column))
}

fn apply_single(document: &Document, resolution: &Resolution) -> String {
    assert_eq!(resolution.candidates.len(), 1);
    let edits = resolution.candidates[0].text_edits().unwrap();
    document.apply_edits(edits).unwrap()
}

const ASSIGNMENTS: &[&str] = &[
    "package main",
    "",
    "import \"fmt\"",
    "",
    "func main() {",
    "\tx := 0",
    "\tfmt.Println(x)",
    "\ty := 2",
    "\tfmt.Println(y)",
    "\tx = 1",
    "}",
];

fn assignments_tree(document: &Document) -> ArenaTree {
    let mut tree = ArenaTree::new(document.text());
    let function = tree.add(NodeKind::FunctionDeclaration, "func main() {", 0, ArenaTree::ROOT);
    tree.add_range(NodeKind::Definition, range_on_line(document, 5, "x"), function);
    tree.add_range(NodeKind::Reference, range_on_line(document, 9, "x"), function);
    tree
}

#[test]
fn test_ineffassign_renames_reference_to_discard() {
    let document = Document::new(source(ASSIGNMENTS));
    let tree = assignments_tree(&document);
    let diag = diagnostic("ineffassign", "ineffectual assignment to `x`", 10, 2);

    let resolution = resolve(&tree, &document, &diag, diag.document_line()).unwrap();

    let x = range_on_line(&document, 9, "x");
    assert_eq!(
        resolution,
        Resolution::single(
            FixCandidate::edits("Rename 'x' to _", vec![TextEdit::replace(x, "_")]),
            Some(x),
        )
    );
    let fixed = Document::new(apply_single(&document, &resolution));
    assert_eq!(fixed.line_text(9).as_deref(), Some("\t_ = 1"));
    assert_eq!(fixed.line_text(5).as_deref(), Some("\tx := 0"));
}

#[test]
fn test_ineffassign_name_mismatch_offers_nothing() {
    let document = Document::new(source(ASSIGNMENTS));
    let tree = assignments_tree(&document);
    let diag = diagnostic("ineffassign", "ineffectual assignment to `y`", 10, 2);

    let resolution = resolve(&tree, &document, &diag, 9).unwrap();
    assert_eq!(resolution, Resolution::none());
}

#[test]
fn test_ineffassign_never_renames_definition() {
    let document = Document::new(source(ASSIGNMENTS));
    let tree = assignments_tree(&document);
    let diag = diagnostic("ineffassign", "ineffectual assignment to `x`", 6, 2);

    let resolution = resolve(&tree, &document, &diag, 5).unwrap();
    assert!(!resolution.has_fix());
}

const WHITESPACE: &[&str] = &[
    "package main",
    "",
    "func f() int {",
    "\ta := 1",
    "\tb := 2",
    "",
    "\treturn a + b",
    "}",
];

#[test]
fn test_whitespace_deletes_only_the_empty_line() {
    let document = Document::new(source(WHITESPACE));
    let tree = ArenaTree::new(document.text());
    let diag = diagnostic("whitespace", "unnecessary trailing newline", 4, 1)
        .with_line_range(LineRange::new(4, 6));

    // line_override == line: no shift
    let resolution = resolve(&tree, &document, &diag, 4).unwrap();

    let deleted = TextRange::new(
        document.line_start_offset(5).unwrap(),
        document.line_start_offset(6).unwrap(),
    );
    assert_eq!(
        resolution.candidates,
        vec![FixCandidate::edits(
            "Remove whitespace",
            vec![TextEdit::delete(deleted)]
        )]
    );
    assert_eq!(
        resolution.highlight,
        Some(TextRange::new(
            document.line_start_offset(4).unwrap(),
            document.line_end_offset(6).unwrap(),
        ))
    );

    let fixed = apply_single(&document, &resolution);
    assert_eq!(
        fixed,
        source(&[
            "package main",
            "",
            "func f() int {",
            "\ta := 1",
            "\tb := 2",
            "\treturn a + b",
            "}",
        ])
    );
}

#[test]
fn test_whitespace_keeps_lines_with_horizontal_whitespace() {
    let mut lines = WHITESPACE.to_vec();
    lines[5] = " \t";
    let document = Document::new(source(&lines));
    let tree = ArenaTree::new(document.text());
    let diag = diagnostic("whitespace", "unnecessary trailing newline", 4, 1)
        .with_line_range(LineRange::new(4, 6));

    let resolution = resolve(&tree, &document, &diag, 4).unwrap();

    assert!(!resolution.has_fix());
    assert_eq!(
        resolution.highlight,
        Some(TextRange::new(
            document.line_start_offset(4).unwrap(),
            document.line_end_offset(6).unwrap(),
        ))
    );
}

#[test]
fn test_whitespace_applies_line_shift_and_scans_in_reverse() {
    let document = Document::new(source(&[
        "// one",
        "// two",
        "func f() {",
        "",
        "",
        "\tg()",
        "}",
    ]));
    let tree = ArenaTree::new(document.text());
    // Reported against the file before two lines were added on top: the block was lines 2..3
    // (1-based) and now sits on document lines 3..4.
    let diag = diagnostic("whitespace", "unnecessary leading newline", 2, 1)
        .with_line_range(LineRange::new(2, 3));

    let resolution = resolve(&tree, &document, &diag, 3).unwrap();

    let edits = resolution.candidates[0].text_edits().unwrap();
    let starts = edits.iter().map(|e| e.range.start).collect::<Vec<_>>();
    assert_eq!(
        starts,
        vec![
            document.line_start_offset(4).unwrap(),
            document.line_start_offset(3).unwrap(),
        ]
    );
    assert_eq!(
        apply_single(&document, &resolution),
        source(&["// one", "// two", "func f() {", "\tg()", "}"])
    );
}

#[test]
fn test_whitespace_without_line_range_is_an_error() {
    let document = Document::new(source(WHITESPACE));
    let tree = ArenaTree::new(document.text());
    let diag = diagnostic("whitespace", "unnecessary trailing newline", 4, 1);

    assert_eq!(
        resolve(&tree, &document, &diag, 4),
        Err(FixError::MissingLineRange {
            rule: "whitespace".to_string()
        })
    );
}

#[test]
fn test_unknown_rule_suppresses_line_deterministically() {
    let document = Document::new(source(WHITESPACE));
    let tree = ArenaTree::new(document.text());
    let diag = diagnostic("gosec", "G404: Use of weak random number generator", 4, 2);

    let first = resolve(&tree, &document, &diag, 3).unwrap();
    let second = resolve(&tree, &document, &diag, 3).unwrap();
    assert_eq!(first, second);

    let fixed = Document::new(apply_single(&document, &first));
    assert_eq!(fixed.line_text(3).as_deref(), Some("\t//nolint:gosec"));
    assert_eq!(fixed.line_text(4).as_deref(), Some("\ta := 1"));
    assert_eq!(first.highlight, None);
}

const SWITCH: &[&str] = &[
    "package main",
    "",
    "func f(d Dir) {",
    "\tswitch d {",
    "\tcase North:",
    "\t}",
    "}",
];

fn switch_tree(document: &Document, last_clause: NodeKind, clause_text: &str) -> ArenaTree {
    let mut tree = ArenaTree::new(document.text());
    let switch_start = range_on_line(document, 3, "switch").start;
    let switch_end = document.line_end_offset(5).unwrap();
    let switch = tree.add_range(
        NodeKind::SwitchStatement,
        TextRange::new(switch_start, switch_end),
        ArenaTree::ROOT,
    );
    let condition = tree.add_range(NodeKind::Reference, range_on_line(document, 3, "d"), switch);
    tree.set_condition(switch, condition);
    tree.add_range(last_clause, range_on_line(document, 4, clause_text), switch);
    tree
}

#[test]
fn test_exhaustive_appends_missing_cases() {
    let document = Document::new(source(SWITCH));
    let tree = switch_tree(&document, NodeKind::CaseClause, "case North:");
    let diag = diagnostic(
        "exhaustive",
        "missing cases in switch of type main.Dir: main.East, main.West",
        4,
        2,
    );

    let resolution = resolve(&tree, &document, &diag, 3).unwrap();

    assert_eq!(resolution.highlight, Some(range_on_line(&document, 3, "d")));
    let fixed = Document::new(apply_single(&document, &resolution));
    assert_eq!(fixed.line_text(4).as_deref(), Some("\tcase North:"));
    assert_eq!(
        fixed.line_text(5).as_deref(),
        Some("\tcase main.East, main.West:")
    );
    assert_eq!(fixed.line_text(6).as_deref(), Some("\t}"));
}

#[test]
fn test_exhaustive_with_trailing_default_offers_nothing() {
    let mut lines = SWITCH.to_vec();
    lines[4] = "\tdefault:";
    let document = Document::new(source(&lines));
    let tree = switch_tree(&document, NodeKind::DefaultClause, "default:");
    let diag = diagnostic(
        "exhaustive",
        "missing cases in switch of type main.Dir: main.East",
        4,
        2,
    );

    let resolution = resolve(&tree, &document, &diag, 3).unwrap();

    assert!(!resolution.has_fix());
    assert_eq!(resolution.highlight, Some(range_on_line(&document, 3, "d")));
}

#[test]
fn test_godot_appends_exactly_one_period() {
    let document = Document::new(source(&["package main", "", "// Run runs", "func Run() {}"]));
    let mut tree = ArenaTree::new(document.text());
    tree.add(NodeKind::Comment, "// Run runs", 0, ArenaTree::ROOT);
    let diag = diagnostic("godot", "Comment should end in a period", 3, 11);

    let resolution = resolve(&tree, &document, &diag, 2).unwrap();

    let fixed = Document::new(apply_single(&document, &resolution));
    assert_eq!(fixed.line_text(2).as_deref(), Some("// Run runs."));
    assert_eq!(resolution.highlight, Some(tree.find("// Run runs", 0)));
}

#[test]
fn test_godot_column_past_comment_end_still_finds_comment() {
    let document = Document::new(source(&["package main", "", "// Run runs", "func Run() {}"]));
    let mut tree = ArenaTree::new(document.text());
    tree.add(NodeKind::Comment, "// Run runs", 0, ArenaTree::ROOT);

    let past_end = diagnostic("godot", "Comment should end in a period", 3, 12);
    let resolution = resolve(&tree, &document, &past_end, 2).unwrap();
    let fixed = Document::new(apply_single(&document, &resolution));
    assert_eq!(fixed.line_text(2).as_deref(), Some("// Run runs."));

    // The previous character is on another line: no comment there.
    let next_line = diagnostic("godot", "Comment should end in a period", 4, 1);
    assert_eq!(
        resolve(&tree, &document, &next_line, 3).unwrap(),
        Resolution::none()
    );
}

#[test]
fn test_testpackage_renames_package() {
    let document = Document::new("package store\n\nimport \"testing\"\n");
    let mut tree = ArenaTree::new(document.text());
    let clause = tree.add(NodeKind::PackageClause, "package store", 0, ArenaTree::ROOT);
    let name = tree.add(NodeKind::Name, "store", 0, clause);
    tree.set_name(clause, name);
    let diag = diagnostic(
        "testpackage",
        "package should be `store_test` instead of `store`",
        1,
        9,
    );

    let resolution = resolve(&tree, &document, &diag, 0).unwrap();

    assert_eq!(
        apply_single(&document, &resolution),
        "package store_test\n\nimport \"testing\"\n"
    );
    assert_eq!(resolution.highlight, Some(tree.find("store", 0)));
}

#[test]
fn test_goprintffuncname_renames_through_host() {
    let document = Document::new("package main\n\nfunc log(format string, args ...any) {}\n");
    let mut tree = ArenaTree::new(document.text());
    let function = tree.add(
        NodeKind::FunctionDeclaration,
        "func log(format string, args ...any) {}",
        0,
        ArenaTree::ROOT,
    );
    let name = tree.add(NodeKind::Name, "log", 0, function);
    tree.set_name(function, name);
    let diag = diagnostic(
        "goprintffuncname",
        "printf-like formatting function 'log' should be named 'logf'",
        3,
        6,
    );

    let resolution = resolve(&tree, &document, &diag, 2).unwrap();

    assert_eq!(
        resolution.candidates[0].action,
        FixAction::Rename {
            range: tree.find("log", 0),
            new_name: "logf".to_string(),
        }
    );
}

const PARAMS: &[&str] = &[
    "package main",
    "",
    "func helper(w *os.File, n int) {",
    "\tw.Write(nil)",
    "}",
];

fn params_tree(document: &Document, with_function: bool) -> ArenaTree {
    let mut tree = ArenaTree::new(document.text());
    let parent = if with_function {
        let function = tree.add(
            NodeKind::FunctionDeclaration,
            "func helper(w *os.File, n int) {\n\tw.Write(nil)\n}",
            0,
            ArenaTree::ROOT,
        );
        let name = tree.add(NodeKind::Name, "helper", 0, function);
        tree.set_name(function, name);
        function
    } else {
        ArenaTree::ROOT
    };
    let first = tree.add(NodeKind::ParameterDeclaration, "w *os.File", 0, parent);
    tree.add(NodeKind::Definition, "w", 0, first);
    tree.add(NodeKind::Other, "*os.File", 0, first);
    let second = tree.add(NodeKind::ParameterDeclaration, "n int", 0, parent);
    let n = tree.find("n int", 0).start;
    tree.add_range(NodeKind::Definition, TextRange::new(n, n + 1), second);
    tree.add(NodeKind::Other, "int", 0, second);
    tree
}

#[test]
fn test_interfacer_replaces_parameter_type() {
    let document = Document::new(source(PARAMS));
    let tree = params_tree(&document, true);
    let diag = diagnostic("interfacer", "`w` can be `io.Writer`", 3, 13);

    let resolution = resolve(&tree, &document, &diag, 2).unwrap();

    assert_eq!(resolution.highlight, Some(tree.find("*os.File", 0)));
    let fixed = Document::new(apply_single(&document, &resolution));
    assert_eq!(
        fixed.line_text(2).as_deref(),
        Some("func helper(w io.Writer, n int) {")
    );
}

#[test]
fn test_unparam_suppresses_enclosing_function() {
    let document = Document::new(source(PARAMS));
    let tree = params_tree(&document, true);
    let diag = diagnostic("unparam", "helper - n is unused", 3, 25);

    let resolution = resolve(&tree, &document, &diag, 2).unwrap();

    assert_eq!(resolution.highlight, Some(tree.find("n int", 0)));
    assert_eq!(
        resolution.candidates[0].label,
        "Suppress 'unparam' for function 'helper'"
    );
    let fixed = Document::new(apply_single(&document, &resolution));
    assert_eq!(fixed.line_text(2).as_deref(), Some("//nolint:unparam"));
    assert_eq!(
        fixed.line_text(3).as_deref(),
        Some("func helper(w *os.File, n int) {")
    );
}

#[test]
fn test_unparam_without_enclosing_function_only_highlights() {
    let document = Document::new(source(PARAMS));
    let tree = params_tree(&document, false);
    let diag = diagnostic("unparam", "helper - n is unused", 3, 25);

    let resolution = resolve(&tree, &document, &diag, 2).unwrap();

    assert_eq!(resolution, Resolution::highlight_only(Some(tree.find("n int", 0))));
}

#[test]
fn test_function_level_suppression() {
    let document = Document::new(source(PARAMS));
    let tree = params_tree(&document, true);
    let diag = diagnostic("gocyclo", "cyclomatic complexity 31 of func `helper` is high", 3, 1);

    let resolution = resolve(&tree, &document, &diag, 2).unwrap();

    assert_eq!(resolution.highlight, Some(tree.find("helper", 0)));
    let fixed = Document::new(apply_single(&document, &resolution));
    assert_eq!(fixed.line_text(2).as_deref(), Some("//nolint:gocyclo"));
}

#[test]
fn test_nlreturn_inserts_blank_line_before_indented_statement() {
    let document = Document::new(source(&["func f() int {", "\tg()", "\treturn 1", "}"]));
    let mut tree = ArenaTree::new(document.text());
    tree.add(NodeKind::Other, "return", 0, ArenaTree::ROOT);
    let diag = diagnostic("nlreturn", "return with no blank line before", 3, 2);

    let resolution = resolve(&tree, &document, &diag, 2).unwrap();

    assert_eq!(resolution.highlight, Some(tree.find("return", 0)));
    assert_eq!(
        apply_single(&document, &resolution),
        source(&["func f() int {", "\tg()", "", "\treturn 1", "}"])
    );
}

#[test]
fn test_nlreturn_without_leading_whitespace_offers_nothing() {
    let document = Document::new(source(&["func f() int {", "return 1", "}"]));
    let tree = ArenaTree::new(document.text());
    let diag = diagnostic("nlreturn", "return with no blank line before", 2, 1);

    assert_eq!(resolve(&tree, &document, &diag, 1).unwrap(), Resolution::none());
}

#[test]
fn test_dupl_highlights_first_line_only() {
    let document = Document::new(source(WHITESPACE));
    let tree = ArenaTree::new(document.text());
    let diag = diagnostic("dupl", "4-7 lines are duplicate of `other.go:10-13`", 4, 1)
        .with_line_range(LineRange::new(4, 7));

    let resolution = resolve(&tree, &document, &diag, 3).unwrap();

    assert_eq!(resolution, Resolution::highlight_only(document.line_range(3)));
}

#[test]
fn test_goconst_introduces_constant() {
    let document = Document::new("package main\n\nvar a = f(\"retry\")\n");
    let mut tree = ArenaTree::new(document.text());
    tree.add(NodeKind::StringLiteral, "\"retry\"", 0, ArenaTree::ROOT);
    let diag = diagnostic(
        "goconst",
        "string `retry` has 3 occurrences, make it a constant",
        3,
        11,
    );

    let resolution = resolve(&tree, &document, &diag, 2).unwrap();

    let range = tree.find("\"retry\"", 0);
    assert_eq!(
        resolution.candidates[0].action,
        FixAction::IntroduceConstant {
            range,
            literal: "\"retry\"".to_string(),
        }
    );
    assert_eq!(resolution.highlight, Some(range));
}

#[test]
fn test_gomnd_suppresses_line_and_highlights_literal() {
    let document = Document::new("func f() {\n\ttime.Sleep(42)\n}");
    let mut tree = ArenaTree::new(document.text());
    tree.add(NodeKind::NumberLiteral, "42", 0, ArenaTree::ROOT);
    let diag = diagnostic("gomnd", "mnd: Magic number: 42, in <argument> detected", 2, 13);

    let resolution = resolve(&tree, &document, &diag, 1).unwrap();

    assert_eq!(resolution.highlight, Some(tree.find("42", 0)));
    assert_eq!(
        apply_single(&document, &resolution),
        "func f() {\n\t//nolint:gomnd\n\ttime.Sleep(42)\n}"
    );
}

#[test]
fn test_explanation_and_settings_redirects() {
    let document = Document::new("package main\n");
    let tree = ArenaTree::new(document.text());

    let scopelint = diagnostic(
        "scopelint",
        "Using the variable on range scope `v` in function literal",
        1,
        1,
    );
    let resolution = resolve(&tree, &document, &scopelint, 0).unwrap();
    assert!(matches!(
        &resolution.candidates[0].action,
        FixAction::OpenExplanation { url } if url.ends_with("scopelint.md")
    ));

    let gofumpt = diagnostic("gofumpt", "File is not `gofumpt`-ed", 1, 1);
    let resolution = resolve(&tree, &document, &gofumpt, 0).unwrap();
    assert_eq!(
        resolution.candidates[0].action,
        FixAction::OpenSettings {
            page: "File Watchers".to_string()
        }
    );
}

#[test]
fn test_inspect_skips_invalid_diagnostics() {
    let document = Document::new(source(ASSIGNMENTS));
    let tree = assignments_tree(&document);
    let diagnostics = vec![
        diagnostic("ineffassign", "ineffectual assignment to `x`", 10, 2),
        diagnostic("whitespace", "unnecessary trailing newline", 4, 1),
        diagnostic("gosec", "G104: Errors unhandled.", 7, 2),
    ];

    let inspections = inspect(&tree, &document, &diagnostics, Diagnostic::document_line);

    let rules = inspections
        .iter()
        .map(|i| i.diagnostic.rule.as_str())
        .collect::<Vec<_>>();
    assert_eq!(rules, vec!["ineffassign", "gosec"]);
    assert!(inspections.iter().all(|i| i.resolution.has_fix()));
}

#[test]
fn test_out_of_range_line_is_not_a_crash() {
    let document = Document::new("package main\n");
    let tree = ArenaTree::new(document.text());
    let diag = diagnostic("ineffassign", "ineffectual assignment to `x`", 40, 2);

    assert_eq!(resolve(&tree, &document, &diag, 39).unwrap(), Resolution::none());
}
