#![warn(missing_docs)]
//! `lintfix-treesitter` - tree-sitter Go syntax trees for `lintfix-core`.
//!
//! Parses Go sources with `tree-sitter-go` and exposes the result through
//! `lintfix_core::SyntaxTree`, so the fix strategies can locate anchor nodes in real code.
//! Grammar node types are folded onto `lintfix_core::NodeKind`; identifiers are split into
//! definitions and references by looking at the construct that binds them.

mod tree;

pub use tree::{GoNode, GoParseError, GoParser, GoSyntaxTree};
