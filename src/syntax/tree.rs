// Copyright (c) 2016-2021 Fabian Schuiki

//! The parse tree.
//!
//! Nodes live in an arena owned by the `Tree` and refer to each other by
//! `NodeId`. Rewrites during parsing may leave nodes behind that are no longer
//! reachable from the root; they stay in the arena but are never visited.

use crate::token::{self, Token};
use std::io::Write;
use widl_common::source::Span;
use widl_pargen::{GrammarTable, NT_BIAS};

/// A reference to a node in a `Tree`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node represents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A token of the input, with its token kind.
    Token(u16),
    /// A nonterminal, with the offset of its dispatch block in the table.
    Nonterm(u16),
}

impl NodeKind {
    /// The node's type code. Nonterminals are numbered from `NT_BIAS` on.
    pub fn code(self) -> u16 {
        match self {
            NodeKind::Token(kind) => kind,
            NodeKind::Nonterm(offset) => NT_BIAS + offset,
        }
    }

    pub fn is_token(self) -> bool {
        matches!(self, NodeKind::Token(_))
    }

    pub fn is_nonterm(self) -> bool {
        matches!(self, NodeKind::Nonterm(_))
    }
}

/// A node of the parse tree.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    /// The token text of a leaf; empty for nonterminals.
    pub text: String,
    pub line: usize,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Descriptive text attached by a comment sink.
    pub comments: Vec<String>,
}

impl Node {
    pub(crate) fn leaf(token: &Token) -> Node {
        Node {
            kind: NodeKind::Token(token.kind),
            text: token.text.clone(),
            line: token.line,
            span: token.span,
            parent: None,
            children: vec![],
            comments: vec![],
        }
    }
}

/// A parse tree.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Tree {
    pub(crate) fn new() -> Tree {
        Default::default()
    }

    pub(crate) fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// The root node.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been finished by the parser.
    pub fn root(&self) -> NodeId {
        match self.root {
            Some(root) => root,
            None => panic!("tree has no root"),
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id.0].text
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// The children of a node that are nonterminals.
    pub fn nonterm_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .cloned()
            .filter(move |&c| self.kind(c).is_nonterm())
    }

    /// The first direct child that is a token of the given kind.
    pub fn find_token(&self, id: NodeId, kind: u16) -> Option<NodeId> {
        self.children(id)
            .iter()
            .cloned()
            .find(|&c| self.kind(c) == NodeKind::Token(kind))
    }

    /// The tokens below a node, in source order.
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![];
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if node.kind.is_token() {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().cloned());
        }
        out
    }

    pub fn add_comment(&mut self, id: NodeId, text: impl Into<String>) {
        self.nodes[id.0].comments.push(text.into());
    }

    pub fn comments(&self, id: NodeId) -> &[String] {
        &self.nodes[id.0].comments
    }

    /// The number of nodes reachable from the root.
    pub fn len(&self) -> usize {
        match self.root {
            Some(root) => 1 + self.descendants(root),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn descendants(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            count += self.nodes[id.0].children.len();
            stack.extend(self.nodes[id.0].children.iter().cloned());
        }
        count
    }

    /// Point the parent reference of every node reachable from the root at
    /// its actual parent.
    pub(crate) fn normalize(&mut self) {
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        if let Some(root) = self.root {
            self.nodes[root.0].parent = None;
        }
        while let Some(id) = stack.pop() {
            for i in 0..self.nodes[id.0].children.len() {
                let child = self.nodes[id.0].children[i];
                self.nodes[child.0].parent = Some(id);
                stack.push(child);
            }
        }
    }

    /// Print the tree, one node per line, indented by depth.
    pub fn dump(&self, table: &GrammarTable, out: &mut impl Write) -> std::io::Result<()> {
        let mut stack = match self.root {
            Some(root) => vec![(root, 0)],
            None => return Ok(()),
        };
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.0];
            write!(out, "{:1$}", "", depth * 2)?;
            match node.kind {
                NodeKind::Nonterm(offset) => {
                    writeln!(out, "{}", table.name_of(offset).unwrap_or("?"))?
                }
                NodeKind::Token(kind @ token::IDENTIFIER)
                | NodeKind::Token(kind @ token::INTEGER)
                | NodeKind::Token(kind @ token::FLOAT)
                | NodeKind::Token(kind @ token::STRING) => {
                    writeln!(out, "{} {:?}", token::describe(kind), node.text)?
                }
                NodeKind::Token(kind) => writeln!(out, "{}", token::describe(kind))?,
            }
            for comment in &node.comments {
                writeln!(out, "{:1$}# {2}", "", depth * 2 + 2, comment.trim())?;
            }
            stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
        }
        Ok(())
    }
}

impl std::ops::Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}
