//! An LL(1) grammar compiler.
//!
//! Reads a textual grammar description, computes the FIRST set of every
//! nonterminal, rejects grammars that are not LL(1), and encodes the result
//! into the flat dispatch table interpreted by the widl parser.

#[macro_use]
extern crate log;

pub mod context;
pub mod encode;
pub mod first;
pub mod reader;

pub use crate::encode::{unpack_names, GrammarTable, EMPTY, END, NT_BIAS};

use crate::context::{Context, ContextArena};
use widl_common::errors::Result;

/// Compile a grammar description into a table.
pub fn compile(input: &str) -> Result<GrammarTable> {
    let arena = ContextArena::default();
    let mut cx = Context::new(&arena);
    reader::read_grammar(&mut cx, input)?;
    first::build_first_sets(&mut cx)?;
    encode::encode(&mut cx)
}
