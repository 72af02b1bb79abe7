//! Syntax-tree interfaces.
//!
//! The host owns and parses the tree. This crate only needs a handful of read-only
//! capabilities: find the leaf at an offset, walk to parents and children, and a few
//! structural accessors. Integrations (`lintfix-treesitter`) map their grammar's node types
//! onto [`NodeKind`].

use crate::fix::TextRange;

/// Language-neutral node categories the fix strategies ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The file root.
    SourceFile,
    /// An identifier used as a reference (`x` in `x = 1`).
    Reference,
    /// An identifier that declares a binding (`x` in `x := 1`).
    Definition,
    /// Any other name token (package names, method names, type names).
    Name,
    /// A single parameter declaration, name(s) plus type.
    ParameterDeclaration,
    /// A function or method declaration.
    FunctionDeclaration,
    /// The `package` clause.
    PackageClause,
    /// A value switch statement.
    SwitchStatement,
    /// A non-default clause of a switch.
    CaseClause,
    /// The default clause of a switch.
    DefaultClause,
    /// A string literal.
    StringLiteral,
    /// A numeric literal.
    NumberLiteral,
    /// A line or block comment.
    Comment,
    /// Anything else.
    Other,
}

/// A transient handle to one node of an externally owned tree.
///
/// Handles are cheap to clone and only valid for the duration of one fix-resolution call.
pub trait SyntaxNode: Clone {
    /// Category of this node.
    fn kind(&self) -> NodeKind;

    /// Character range covered by this node.
    fn range(&self) -> TextRange;

    /// Source text of this node.
    fn text(&self) -> &str;

    /// Parent node; `None` at the root.
    fn parent(&self) -> Option<Self>;

    /// Direct children, in source order, including anonymous tokens.
    fn children(&self) -> Vec<Self>;

    /// The declared name of a declaration-like node (function name, package name, ...).
    fn name(&self) -> Option<Self>;

    /// The scrutinee of a switch-like node.
    fn condition(&self) -> Option<Self>;

    /// Last direct child.
    fn last_child(&self) -> Option<Self> {
        self.children().pop()
    }
}

/// A parsed tree for one document snapshot.
pub trait SyntaxTree {
    /// Node handle type.
    type Node<'a>: SyntaxNode
    where
        Self: 'a;

    /// The smallest node covering the character at `offset`.
    fn leaf_at(&self, offset: usize) -> Option<Self::Node<'_>>;
}
