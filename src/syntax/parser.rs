// Copyright (c) 2016-2021 Fabian Schuiki

//! A parser that interprets a compiled grammar table.
//!
//! Parsing starts at the root nonterminal of the table. To expand a
//! nonterminal, the parser looks up the current token in the nonterminal's
//! dispatch block and follows the selected production. Terminals are
//! consumed into leaves, nonterminals are expanded recursively. A production
//! whose last item refers back to the nonterminal being expanded restarts the
//! expansion in place, such that repetitions iterate instead of recursing.
//!
//! As each nonterminal completes, its node is rewritten according to the
//! nonterminal's `Roles` before being attached to its parent.

use crate::comment::CommentSink;
use crate::lexer::Lexer;
use crate::token::{self, Token};
use crate::tree::{Node, NodeId, NodeKind, Tree};
use std::collections::HashSet;
use widl_common::errors::{Error, Result};
use widl_common::source::Span;
use widl_pargen::{GrammarTable, EMPTY, END, NT_BIAS};

/// The structural rewrites that apply to nonterminals of a grammar.
#[derive(Clone, Debug, Default)]
pub struct Roles {
    lists: HashSet<u16>,
    scoped: HashSet<u16>,
    decls: HashSet<u16>,
}

impl Roles {
    pub fn new() -> Roles {
        Default::default()
    }

    /// Mark a nonterminal as the tail of a separated repetition. Its
    /// separators are dropped and its items attached to its parent.
    pub fn list(mut self, table: &GrammarTable, name: &str) -> Result<Roles> {
        self.lists.insert(lookup(table, name)?);
        Ok(self)
    }

    /// Mark a nonterminal as a `::`-qualified name, which is folded into a
    /// single identifier.
    pub fn scoped(mut self, table: &GrammarTable, name: &str) -> Result<Roles> {
        self.scoped.insert(lookup(table, name)?);
        Ok(self)
    }

    /// Mark a nonterminal as a declaration, whose identifiers name it.
    pub fn decl(mut self, table: &GrammarTable, name: &str) -> Result<Roles> {
        self.decls.insert(lookup(table, name)?);
        Ok(self)
    }

    pub fn is_list(&self, offset: u16) -> bool {
        self.lists.contains(&offset)
    }

    pub fn is_scoped(&self, offset: u16) -> bool {
        self.scoped.contains(&offset)
    }

    pub fn is_decl(&self, offset: u16) -> bool {
        self.decls.contains(&offset)
    }
}

fn lookup(table: &GrammarTable, name: &str) -> Result<u16> {
    table
        .offset_of(name)
        .ok_or_else(|| Error::grammar(None, format!("unknown non-terminal `{}`", name)))
}

/// The result of expanding a nonterminal.
enum Expansion {
    /// The nonterminal produced a node.
    Node(NodeId),
    /// The nonterminal was a list; its items go directly to the parent.
    Splice(Vec<NodeId>),
    /// The nonterminal matched nothing.
    Absent,
}

/// A parser for a single token stream.
pub struct Parser<'g, S> {
    table: &'g GrammarTable,
    roles: &'g Roles,
    lexer: Lexer,
    sink: S,
    token: Token,
    tree: Tree,
}

impl<'g, S: CommentSink> Parser<'g, S> {
    pub fn new(table: &'g GrammarTable, roles: &'g Roles, lexer: Lexer, sink: S) -> Self {
        let token = Token::eof(lexer.source_name().clone(), lexer.line(), 0);
        Parser {
            table,
            roles,
            lexer,
            sink,
            token,
            tree: Tree::new(),
        }
    }

    /// Parse the entire token stream into a tree.
    pub fn parse(mut self) -> Result<Tree> {
        self.bump()?;
        let root_offset = self.table.root();
        let root = match self.expand(root_offset)? {
            Expansion::Node(id) => id,
            Expansion::Splice(children) => {
                let node = nonterm(root_offset, children, &self.tree);
                self.tree.add(node)
            }
            Expansion::Absent => {
                let node = nonterm(root_offset, vec![], &self.tree);
                self.tree.add(node)
            }
        };
        if !self.token.is_eof() {
            return Err(Error::syntax(
                self.token.loc(),
                format!("expected end of input, found {}", self.token),
            ));
        }
        self.tree.set_root(root);
        self.tree.normalize();
        self.sink.finish(&mut self.tree);
        debug!("Parsed tree of {} nodes", self.tree.len());
        Ok(self.tree)
    }

    /// Advance to the next token that is not a comment.
    fn bump(&mut self) -> Result<()> {
        loop {
            let token = self.lexer.next_token()?;
            if token::is_comment(token.kind) {
                self.sink.comment(&token);
                continue;
            }
            trace!("Next token {:?}", token);
            self.token = token;
            return Ok(());
        }
    }

    /// Find the production a nonterminal's dispatch block selects for the
    /// current token. Returns `None` if the nonterminal may be empty and no
    /// production applies.
    fn dispatch(&self, offset: u16) -> Result<Option<u16>> {
        let code = self.table.code();
        let mut pos = offset as usize;
        loop {
            match code[pos] {
                END => {
                    let msg = if self.token.is_eof() {
                        "unexpected end of input".to_string()
                    } else {
                        format!("unexpected token {}", self.token)
                    };
                    return Err(Error::syntax(self.token.loc(), msg));
                }
                EMPTY => return Ok(None),
                term if token::matches(term, self.token.kind) => return Ok(Some(code[pos + 1])),
                _ => pos += 2,
            }
        }
    }

    fn expand(&mut self, offset: u16) -> Result<Expansion> {
        trace!(
            "Expanding {} at {:?}",
            self.table.name_of(offset).unwrap_or("?"),
            self.token
        );
        let table = self.table;
        let code = table.code();
        let mut children = vec![];
        'restart: while let Some(prod) = self.dispatch(offset)? {
            let mut pos = prod as usize;
            while code[pos] != END {
                let item = code[pos];
                if item >= NT_BIAS {
                    let nt = item - NT_BIAS;
                    if nt == offset && code[pos + 1] == END {
                        continue 'restart;
                    }
                    match self.expand(nt)? {
                        Expansion::Node(id) => children.push(id),
                        Expansion::Splice(ids) => children.extend(ids),
                        Expansion::Absent => (),
                    }
                } else {
                    if !token::matches(item, self.token.kind) {
                        return Err(Error::syntax(
                            self.token.loc(),
                            format!("expected {}, found {}", token::describe(item), self.token),
                        ));
                    }
                    let leaf = self.tree.add(Node::leaf(&self.token));
                    if item == token::IDENTIFIER && self.roles.is_decl(offset) {
                        self.sink.identifier(leaf, &self.token);
                    }
                    children.push(leaf);
                    self.bump()?;
                }
                pos += 1;
            }
            break;
        }
        Ok(self.complete(offset, children))
    }

    /// Apply the structural rewrites to a completed nonterminal.
    fn complete(&mut self, offset: u16, children: Vec<NodeId>) -> Expansion {
        if self.roles.is_list(offset) {
            let tree = &self.tree;
            return Expansion::Splice(
                children
                    .into_iter()
                    .filter(|&id| tree.kind(id).is_nonterm())
                    .collect(),
            );
        }
        if children.is_empty() {
            return Expansion::Absent;
        }
        let folded = if self.roles.is_scoped(offset) {
            self.fold_scoped_name(&children)
        } else {
            None
        };
        let children = folded.map(|name| vec![name]).unwrap_or(children);
        let node = nonterm(offset, children, &self.tree);
        Expansion::Node(self.tree.add(node))
    }

    /// Concatenate the `::` separators and identifiers of a qualified name
    /// into one identifier. Other leaves are dropped. Returns `None` if the
    /// name has neither.
    fn fold_scoped_name(&mut self, children: &[NodeId]) -> Option<NodeId> {
        let tree = &self.tree;
        let leaves: Vec<_> = children
            .iter()
            .flat_map(|&id| tree.leaves(id))
            .filter(|&id| match tree.kind(id) {
                NodeKind::Token(token::DOUBLE_COLON) | NodeKind::Token(token::IDENTIFIER) => true,
                _ => false,
            })
            .collect();
        if leaves.is_empty() {
            return None;
        }
        let first = &self.tree[leaves[0]];
        let last = &self.tree[leaves[leaves.len() - 1]];
        let node = Node {
            kind: NodeKind::Token(token::IDENTIFIER),
            text: leaves.iter().map(|&id| self.tree.text(id)).collect(),
            line: first.line,
            span: Span::union(first.span, last.span),
            parent: None,
            children: vec![],
            comments: vec![],
        };
        Some(self.tree.add(node))
    }
}

/// Create a nonterminal node over the given children.
fn nonterm(offset: u16, children: Vec<NodeId>, tree: &Tree) -> Node {
    let (line, span) = match (children.first(), children.last()) {
        (Some(&first), Some(&last)) => (
            tree[first].line,
            Span::union(tree[first].span, tree[last].span),
        ),
        _ => (1, Span::default()),
    };
    Node {
        kind: NodeKind::Nonterm(offset),
        text: String::new(),
        line,
        span,
        parent: None,
        children,
        comments: vec![],
    }
}
