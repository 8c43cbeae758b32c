// Copyright (c) 2016-2021 Fabian Schuiki

//! Utilities to implement diagnostics and error reporting facilities.
//!
//! Every failure in the parser is fatal. Library code hands an [`Error`] back
//! to its caller; only the command line drivers turn it into a message and an
//! exit code.

use crate::source::{Location, RcStr};
use std::fmt;

/// A result carrying an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// An error raised while compiling a grammar or parsing an input.
#[derive(Debug)]
pub enum Error {
    /// The grammar description is malformed, incomplete, or not LL(1).
    Grammar {
        /// The line of the grammar text the error was found on, if any.
        line: Option<usize>,
        message: String,
    },
    /// The input contains a character sequence that does not form a token.
    Lex { loc: Location, message: String },
    /// The token stream does not match the grammar.
    Syntax { loc: Location, message: String },
    /// An input source could not be opened or read.
    Io { path: RcStr, error: std::io::Error },
}

impl Error {
    pub fn grammar(line: impl Into<Option<usize>>, message: impl Into<String>) -> Error {
        Error::Grammar {
            line: line.into(),
            message: message.into(),
        }
    }

    pub fn lex(loc: Location, message: impl Into<String>) -> Error {
        Error::Lex {
            loc,
            message: message.into(),
        }
    }

    pub fn syntax(loc: Location, message: impl Into<String>) -> Error {
        Error::Syntax {
            loc,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<RcStr>, error: std::io::Error) -> Error {
        Error::Io {
            path: path.into(),
            error,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Grammar {
                line: Some(line),
                message,
            } => write!(f, "line {}: {}", line, message),
            Error::Grammar {
                line: None,
                message,
            } => write!(f, "{}", message),
            Error::Lex { loc, message } | Error::Syntax { loc, message } => {
                write!(f, "{}: {}", loc, message)
            }
            Error::Io { path, error } => write!(f, "{}: {}", path, error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let loc = Location::new("foo.idl".into(), 12);
        assert_eq!(
            format!("{}", Error::lex(loc.clone(), "unterminated string")),
            "foo.idl: 12: unterminated string"
        );
        assert_eq!(
            format!("{}", Error::syntax(loc, "unexpected end of input")),
            "foo.idl: 12: unexpected end of input"
        );
        assert_eq!(
            format!("{}", Error::grammar(3, "missing ]")),
            "line 3: missing ]"
        );
        assert_eq!(
            format!("{}", Error::grammar(None, "undefined non-terminal `Foo`")),
            "undefined non-terminal `Foo`"
        );
    }

    #[test]
    fn io_source() {
        use std::error::Error as _;
        let err = Error::io(
            "missing.idl",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.source().is_some());
        assert_eq!(format!("{}", err), "missing.idl: no such file");
    }
}
