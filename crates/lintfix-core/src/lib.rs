#![warn(missing_docs)]
//! `lintfix-core` - quick-fix resolution for external analyzer diagnostics.
//!
//! # Overview
//!
//! Given a diagnostic reported by `golangci-lint` (rule, message, position) and a parsed syntax
//! tree of the current document, this crate locates the node the diagnostic is about and
//! synthesizes fix candidates, or declines to offer one. It never mutates the tree or the
//! document: candidates describe edits for the host to apply.
//!
//! ```text
//! Diagnostic ──► DispatchTable ──► Strategy ──► locator (leaf + ancestor walk)
//!                                       │
//!                                       └──► Resolution { candidates, highlight }
//! ```
//!
//! The syntax tree is an external collaborator, abstracted by [`SyntaxTree`] and
//! [`SyntaxNode`]. `lintfix-treesitter` implements them for Go sources.
//!
//! # Module Description
//!
//! - [`line_index`] - Rope based line index
//! - [`document`] - immutable document snapshot and edit application
//! - [`diagnostic`] - diagnostic data model
//! - [`syntax`] - syntax-tree traits
//! - [`locator`] - diagnostic position → anchor node
//! - [`strategies`] - per-rule fix strategies
//! - [`dispatch`] - rule → strategy table
//! - [`engine`] - batch resolution

pub mod diagnostic;
pub mod dispatch;
pub mod document;
pub mod engine;
mod error;
pub mod fix;
pub mod line_index;
pub mod locator;
pub mod strategies;
pub mod syntax;

pub use diagnostic::{Diagnostic, LineRange, SourcePosition};
pub use dispatch::DispatchTable;
pub use document::Document;
pub use engine::{AppliedFixes, Inspection, apply_fixes, inspect, resolve};
pub use error::{EditError, FixError};
pub use fix::{FixAction, FixCandidate, Resolution, TextEdit, TextRange};
pub use line_index::LineIndex;
pub use strategies::Strategy;
pub use syntax::{NodeKind, SyntaxNode, SyntaxTree};
