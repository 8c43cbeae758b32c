// Copyright (c) 2016-2021 Fabian Schuiki

//! Input sources and the locations within them.

use crate::errors::{Error, Result};
use std::fmt;
use std::io::Read;
use std::rc::Rc;

/// A reference-counted string, used for source names shared by every token.
pub type RcStr = Rc<str>;

/// The name under which standard input appears in diagnostics.
pub const STDIN_NAME: &str = "<stdin>";

/// A named input source that has not yet been read.
pub struct Source {
    name: RcStr,
    input: Box<dyn Read>,
}

impl Source {
    /// Open the file at `path`. The path `-` denotes standard input.
    pub fn open(path: &str) -> Result<Source> {
        if path == "-" {
            return Ok(Source::from_reader(STDIN_NAME, std::io::stdin()));
        }
        match std::fs::File::open(path) {
            Ok(f) => Ok(Source::from_reader(path, f)),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    /// Create a source that reads from an arbitrary reader.
    pub fn from_reader(name: impl Into<RcStr>, input: impl Read + 'static) -> Source {
        Source {
            name: name.into(),
            input: Box::new(input),
        }
    }

    /// Create a source from an in-memory string.
    pub fn from_string(name: impl Into<RcStr>, content: impl Into<String>) -> Source {
        Source::from_reader(name, std::io::Cursor::new(content.into().into_bytes()))
    }

    /// The name of the source as it appears in diagnostics.
    pub fn name(&self) -> &RcStr {
        &self.name
    }

    /// Split the source into its name and the underlying reader.
    pub fn into_parts(self) -> (RcStr, Box<dyn Read>) {
        (self.name, self.input)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Source({:?})", self.name)
    }
}

/// A span of bytes within a source, expressed as a half-open interval
/// `[begin,end)`.
#[derive(Copy, Clone, Default, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    /// Create a new span from two byte offsets.
    pub fn new(begin: usize, end: usize) -> Span {
        Span { begin, end }
    }

    /// Create a new span that covers both `a` and `b`.
    pub fn union(a: Span, b: Span) -> Span {
        use std::cmp::{max, min};
        Span {
            begin: min(a.begin, b.begin),
            end: max(a.end, b.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}

/// A line within a named source, used to report errors.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub source: RcStr,
    pub line: usize,
}

impl Location {
    pub fn new(source: RcStr, line: usize) -> Location {
        Location { source, line }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.line)
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}
