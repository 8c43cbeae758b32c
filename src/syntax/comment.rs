// Copyright (c) 2016-2021 Fabian Schuiki

//! The interface to the association of comments with declarations.
//!
//! The parser does not interpret comments. It hands every comment token and
//! every identifier that names a declaration to a `CommentSink`, strictly in
//! source order, and calls `finish` once the tree is complete.

use crate::token::Token;
use crate::tree::{NodeId, Tree};

/// Receives the comments and naming identifiers of a parse.
pub trait CommentSink {
    /// A comment was read.
    fn comment(&mut self, token: &Token) {
        let _ = token;
    }

    /// An identifier that names a declaration was added to the tree.
    fn identifier(&mut self, node: NodeId, token: &Token) {
        let _ = (node, token);
    }

    /// The tree is complete. Descriptive text may be attached to its nodes.
    fn finish(&mut self, tree: &mut Tree) {
        let _ = tree;
    }
}

/// Discards all comments.
impl CommentSink for () {}

impl<T: CommentSink + ?Sized> CommentSink for &mut T {
    fn comment(&mut self, token: &Token) {
        (**self).comment(token)
    }

    fn identifier(&mut self, node: NodeId, token: &Token) {
        (**self).identifier(node, token)
    }

    fn finish(&mut self, tree: &mut Tree) {
        (**self).finish(tree)
    }
}

/// An event seen by a `CommentLog`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommentEvent {
    Comment { text: String, line: usize },
    Identifier { node: NodeId, name: String, line: usize },
}

/// Records the comments and naming identifiers of a parse.
#[derive(Clone, Debug, Default)]
pub struct CommentLog {
    pub events: Vec<CommentEvent>,
    /// The number of trees finished.
    pub finished: usize,
}

impl CommentLog {
    pub fn new() -> CommentLog {
        Default::default()
    }
}

impl CommentSink for CommentLog {
    fn comment(&mut self, token: &Token) {
        self.events.push(CommentEvent::Comment {
            text: token.text.clone(),
            line: token.line,
        });
    }

    fn identifier(&mut self, node: NodeId, token: &Token) {
        self.events.push(CommentEvent::Identifier {
            node,
            name: token.text.clone(),
            line: token.line,
        });
    }

    fn finish(&mut self, _tree: &mut Tree) {
        self.finished += 1;
    }
}
