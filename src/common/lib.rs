// Copyright (c) 2016-2021 Fabian Schuiki

//! This crate contains the fundamental utilities used by the rest of the widl
//! parser: the token numbering shared between grammar compiler and parser,
//! input sources, a buffered byte reader, and the error type.

pub mod errors;
pub mod reader;
pub mod source;
pub mod token;

pub use self::errors::{Error, Result};

/// The options that govern a single invocation of the parser.
pub struct Session {
    pub opts: SessionOptions,
}

impl Session {
    pub fn new() -> Session {
        Session {
            opts: Default::default(),
        }
    }
}

impl Default for Session {
    fn default() -> Session {
        Session::new()
    }
}

#[derive(Debug, Default)]
pub struct SessionOptions {
    /// Treat all inputs as one logical stream instead of parsing each one
    /// separately.
    pub chain_inputs: bool,
    /// Additional output requested by the user.
    pub verbosity: Verbosity,
}

bitflags::bitflags! {
    /// Additional information to print while parsing.
    #[derive(Default)]
    pub struct Verbosity: u8 {
        /// Print the comments and naming identifiers seen during the parse.
        const COMMENTS = 1 << 0;
        /// Print the nonterminal name table of the grammar.
        const NAMES = 1 << 1;
    }
}
