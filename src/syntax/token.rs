// Copyright (c) 2016-2021 Fabian Schuiki

//! The tokens produced by the lexer.

pub use widl_common::token::*;

use std::fmt;
use widl_common::source::{Location, RcStr, Span};

/// A token of the input, together with its position.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    /// The token kind, as numbered in `widl_common::token`.
    pub kind: u16,
    /// The text of the token. Strings and comments exclude their delimiters.
    pub text: String,
    /// The name of the source the token was read from.
    pub source: RcStr,
    /// The line the token starts on.
    pub line: usize,
    /// The bytes the token covers in its source, including delimiters.
    pub span: Span,
}

impl Token {
    /// Create an end-of-input token.
    pub fn eof(source: RcStr, line: usize, offset: usize) -> Token {
        Token {
            kind: EOF,
            text: String::new(),
            source,
            line,
            span: Span::new(offset, offset),
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == EOF
    }

    /// The location of the token, for diagnostics.
    pub fn loc(&self) -> Location {
        Location::new(self.source.clone(), self.line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_eof() {
            write!(f, "end of input")
        } else {
            write!(f, "`{}`", self.text)
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {:?} at {}:{} {:?}",
            describe(self.kind),
            self.text,
            self.source,
            self.line,
            self.span
        )
    }
}
