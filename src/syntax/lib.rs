// Copyright (c) 2016-2021 Fabian Schuiki

//! The Web IDL lexer and parser of the widl project.
//!
//! The parser is driven by a table compiled from a grammar description. The
//! Web IDL grammar in `webidl.grammar` is compiled the first time it is
//! needed.

#[macro_use]
extern crate log;

pub mod comment;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod tree;

pub use crate::comment::{CommentEvent, CommentLog, CommentSink};
pub use crate::lexer::Lexer;
pub use crate::parser::{Parser, Roles};
pub use crate::tree::{Node, NodeId, NodeKind, Tree};

use widl_common::errors::Result;
use widl_common::source::Source;

/// Parse a sequence of sources as one Web IDL document.
pub fn parse(sources: impl IntoIterator<Item = Source>, sink: impl CommentSink) -> Result<Tree> {
    let grammar = grammar::webidl()?;
    let lexer = Lexer::new(sources);
    Parser::new(&grammar.table, &grammar.roles, lexer, sink).parse()
}
