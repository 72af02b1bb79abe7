use lintfix_core::{LineIndex, NodeKind, SyntaxNode, SyntaxTree, TextRange};
use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

/// Errors produced while parsing Go sources.
#[derive(Debug, Error)]
pub enum GoParseError {
    #[error("tree-sitter language error: {0}")]
    /// Loading the Go grammar into the parser failed.
    Language(String),

    #[error("tree-sitter parse produced no tree")]
    /// The parser gave up without producing a tree.
    NoTree,
}

/// A reusable Go parser.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    /// Create a parser loaded with the Go grammar.
    pub fn new() -> Result<Self, GoParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| GoParseError::Language(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse one document snapshot.
    pub fn parse(&mut self, text: impl Into<String>) -> Result<GoSyntaxTree, GoParseError> {
        let text = text.into();
        let tree = self
            .parser
            .parse(&text, None)
            .ok_or(GoParseError::NoTree)?;
        let has_errors = tree.root_node().has_error();
        tracing::debug!(bytes = text.len(), has_errors, "parsed Go source");

        Ok(GoSyntaxTree {
            line_index: LineIndex::from_text(&text),
            text,
            tree,
        })
    }
}

/// A parsed Go document.
///
/// Offsets exposed through [`SyntaxTree`] and [`SyntaxNode`] are character offsets, matching
/// `lintfix_core::Document`.
pub struct GoSyntaxTree {
    text: String,
    tree: Tree,
    line_index: LineIndex,
}

impl GoSyntaxTree {
    /// Parse `text` with a fresh parser.
    pub fn parse(text: impl Into<String>) -> Result<Self, GoParseError> {
        GoParser::new()?.parse(text)
    }

    /// Source text the tree was parsed from.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if the parse contains syntax errors.
    ///
    /// Strategies still work on partially broken trees; the flag is informational.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    fn wrap<'a>(&'a self, node: Node<'a>) -> GoNode<'a> {
        GoNode { node, tree: self }
    }
}

impl SyntaxTree for GoSyntaxTree {
    type Node<'a> = GoNode<'a>;

    fn leaf_at(&self, offset: usize) -> Option<Self::Node<'_>> {
        if offset > self.line_index.char_count() {
            return None;
        }
        let byte = self.line_index.char_offset_to_byte_offset(offset);
        let root = self.tree.root_node();
        let leaf = root.descendant_for_byte_range(byte, byte).unwrap_or(root);
        Some(self.wrap(leaf))
    }
}

/// A handle to one node of a [`GoSyntaxTree`].
#[derive(Clone, Copy)]
pub struct GoNode<'a> {
    node: Node<'a>,
    tree: &'a GoSyntaxTree,
}

impl<'a> GoNode<'a> {
    fn wrap(&self, node: Node<'a>) -> Self {
        Self {
            node,
            tree: self.tree,
        }
    }
}

impl std::fmt::Debug for GoNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoNode")
            .field("kind", &self.node.kind())
            .field("range", &self.range())
            .finish()
    }
}

impl SyntaxNode for GoNode<'_> {
    fn kind(&self) -> NodeKind {
        classify(self.node)
    }

    fn range(&self) -> TextRange {
        let index = &self.tree.line_index;
        TextRange::new(
            index.byte_offset_to_char_offset(self.node.start_byte()),
            index.byte_offset_to_char_offset(self.node.end_byte()),
        )
    }

    fn text(&self) -> &str {
        self.tree
            .text
            .get(self.node.byte_range())
            .unwrap_or_default()
    }

    fn parent(&self) -> Option<Self> {
        self.node.parent().map(|node| self.wrap(node))
    }

    fn children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|node| self.wrap(node))
            .collect()
    }

    fn name(&self) -> Option<Self> {
        let name = match self.node.kind() {
            // `package_clause` has no field names; its only named child is the identifier.
            "package_clause" => self.node.named_child(0),
            _ => self.node.child_by_field_name("name"),
        };
        name.map(|node| self.wrap(node))
    }

    fn condition(&self) -> Option<Self> {
        self.node
            .child_by_field_name("value")
            .map(|node| self.wrap(node))
    }
}

fn classify(node: Node<'_>) -> NodeKind {
    match node.kind() {
        "source_file" => NodeKind::SourceFile,
        "identifier" if is_definition(node) => NodeKind::Definition,
        "identifier" => NodeKind::Reference,
        "package_identifier" | "field_identifier" | "type_identifier" => NodeKind::Name,
        "parameter_declaration" | "variadic_parameter_declaration" => {
            NodeKind::ParameterDeclaration
        }
        "function_declaration" | "method_declaration" => NodeKind::FunctionDeclaration,
        "package_clause" => NodeKind::PackageClause,
        "expression_switch_statement" => NodeKind::SwitchStatement,
        "expression_case" => NodeKind::CaseClause,
        "default_case" => NodeKind::DefaultClause,
        "interpreted_string_literal" | "raw_string_literal" => NodeKind::StringLiteral,
        "int_literal" | "float_literal" | "imaginary_literal" => NodeKind::NumberLiteral,
        "comment" => NodeKind::Comment,
        _ => NodeKind::Other,
    }
}

/// Whether an `identifier` introduces a binding rather than using one.
fn is_definition(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        "var_spec"
        | "const_spec"
        | "parameter_declaration"
        | "variadic_parameter_declaration"
        | "function_declaration" => has_field_child(parent, "name", node),
        "expression_list" => parent.parent().is_some_and(|owner| match owner.kind() {
            "short_var_declaration" => has_field_child(owner, "left", parent),
            "range_clause" => {
                has_field_child(owner, "left", parent) && has_token_child(owner, ":=")
            }
            _ => false,
        }),
        _ => false,
    }
}

fn has_field_child(parent: Node<'_>, field: &str, child: Node<'_>) -> bool {
    let mut cursor = parent.walk();
    let found = parent
        .children_by_field_name(field, &mut cursor)
        .any(|node| node.id() == child.id());
    found
}

fn has_token_child(parent: Node<'_>, token: &str) -> bool {
    let mut cursor = parent.walk();
    let found = parent
        .children(&mut cursor)
        .any(|node| !node.is_named() && node.kind() == token);
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_at(tree: &GoSyntaxTree, needle: &str, nth: usize) -> NodeKind {
        let (byte, _) = tree.text().match_indices(needle).nth(nth).unwrap();
        let offset = tree.line_index.byte_offset_to_char_offset(byte);
        tree.leaf_at(offset).unwrap().kind()
    }

    #[test]
    fn test_identifiers_split_into_definitions_and_references() {
        let tree = GoSyntaxTree::parse(
            "package main\n\nfunc main() {\n\tx := 0\n\tx = 1\n\tfor i := range xs {\n\t\t_ = i\n\t}\n}\n",
        )
        .unwrap();

        assert_eq!(kind_at(&tree, "x", 0), NodeKind::Definition);
        assert_eq!(kind_at(&tree, "x = 1", 0), NodeKind::Reference);
        assert_eq!(kind_at(&tree, "i :=", 0), NodeKind::Definition);
        assert_eq!(kind_at(&tree, "xs", 0), NodeKind::Reference);
        assert_eq!(kind_at(&tree, "main", 1), NodeKind::Definition);
    }

    #[test]
    fn test_range_assignment_is_a_reference() {
        let tree = GoSyntaxTree::parse(
            "package main\n\nfunc f(xs []int) {\n\tvar i int\n\tfor i = range xs {\n\t}\n}\n",
        )
        .unwrap();

        assert_eq!(kind_at(&tree, "i = range", 0), NodeKind::Reference);
        assert_eq!(kind_at(&tree, "i int", 0), NodeKind::Definition);
    }

    #[test]
    fn test_ranges_are_character_offsets() {
        let text = "package main\n\n// héllo\nvar s = \"ü\"\n";
        let tree = GoSyntaxTree::parse(text).unwrap();

        let literal_start = text.chars().position(|c| c == '"').unwrap();
        let leaf = tree.leaf_at(literal_start + 1).unwrap();
        let literal = lintfix_core::locator::enclosing(leaf, NodeKind::StringLiteral).unwrap();
        assert_eq!(
            literal.range(),
            TextRange::new(literal_start, literal_start + 3)
        );
        assert_eq!(literal.text(), "\"ü\"");
    }

    #[test]
    fn test_leaf_at_past_end_is_none() {
        let tree = GoSyntaxTree::parse("package main\n").unwrap();
        assert!(tree.leaf_at(13).is_some());
        assert!(tree.leaf_at(14).is_none());
    }
}
