#![allow(dead_code)]

use lintfix_core::{NodeKind, SyntaxNode, SyntaxTree, TextRange};

struct NodeData {
    kind: NodeKind,
    range: TextRange,
    text: String,
    parent: Option<usize>,
    children: Vec<usize>,
    name: Option<usize>,
    condition: Option<usize>,
}

/// A hand-built tree over an ASCII source, for exercising strategies without a parser.
pub struct ArenaTree {
    source: String,
    nodes: Vec<NodeData>,
}

#[derive(Clone, Copy)]
pub struct ArenaNode<'a> {
    tree: &'a ArenaTree,
    id: usize,
}

impl ArenaTree {
    /// A tree whose root (`SourceFile`) spans the whole source.
    pub fn new(source: &str) -> Self {
        let mut tree = Self {
            source: source.to_string(),
            nodes: Vec::new(),
        };
        tree.push(NodeKind::SourceFile, TextRange::new(0, source.len()), None);
        tree
    }

    pub const ROOT: usize = 0;

    /// Range of the `nth` (0-based) occurrence of `needle`.
    pub fn find(&self, needle: &str, nth: usize) -> TextRange {
        let start = self
            .source
            .match_indices(needle)
            .nth(nth)
            .map(|(idx, _)| idx)
            .unwrap_or_else(|| panic!("{needle:?} #{nth} not in source"));
        TextRange::new(start, start + needle.len())
    }

    /// Add a node over the `nth` occurrence of `needle`.
    pub fn add(&mut self, kind: NodeKind, needle: &str, nth: usize, parent: usize) -> usize {
        let range = self.find(needle, nth);
        self.push(kind, range, Some(parent))
    }

    /// Add a node over an explicit range.
    pub fn add_range(&mut self, kind: NodeKind, range: TextRange, parent: usize) -> usize {
        self.push(kind, range, Some(parent))
    }

    pub fn set_name(&mut self, id: usize, name: usize) {
        self.nodes[id].name = Some(name);
    }

    pub fn set_condition(&mut self, id: usize, condition: usize) {
        self.nodes[id].condition = Some(condition);
    }

    fn push(&mut self, kind: NodeKind, range: TextRange, parent: Option<usize>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(NodeData {
            kind,
            range,
            text: self.source[range.start..range.end].to_string(),
            parent,
            children: Vec::new(),
            name: None,
            condition: None,
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    fn node(&self, id: usize) -> ArenaNode<'_> {
        ArenaNode { tree: self, id }
    }
}

impl SyntaxNode for ArenaNode<'_> {
    fn kind(&self) -> NodeKind {
        self.tree.nodes[self.id].kind
    }

    fn range(&self) -> TextRange {
        self.tree.nodes[self.id].range
    }

    fn text(&self) -> &str {
        &self.tree.nodes[self.id].text
    }

    fn parent(&self) -> Option<Self> {
        self.tree.nodes[self.id].parent.map(|id| self.tree.node(id))
    }

    fn children(&self) -> Vec<Self> {
        self.tree.nodes[self.id]
            .children
            .iter()
            .map(|id| self.tree.node(*id))
            .collect()
    }

    fn name(&self) -> Option<Self> {
        self.tree.nodes[self.id].name.map(|id| self.tree.node(id))
    }

    fn condition(&self) -> Option<Self> {
        self.tree.nodes[self.id].condition.map(|id| self.tree.node(id))
    }
}

impl SyntaxTree for ArenaTree {
    type Node<'a> = ArenaNode<'a>;

    fn leaf_at(&self, offset: usize) -> Option<Self::Node<'_>> {
        let best = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.range.contains(offset))
            .min_by_key(|(_, node)| node.range.end - node.range.start)
            .map(|(id, _)| id)
            .unwrap_or(Self::ROOT);
        Some(self.node(best))
    }
}
