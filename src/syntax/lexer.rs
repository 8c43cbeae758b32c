// Copyright (c) 2016-2021 Fabian Schuiki

//! A lexical analyzer for Web IDL files.
//!
//! The lexer reads a queue of sources as one logical stream. Tokens never
//! span two sources: the end of a source terminates the token being scanned,
//! and the line counter starts over at the beginning of the next source.

use crate::token::*;
use std::collections::VecDeque;
use widl_common::errors::{Error, Result};
use widl_common::reader::{AccumulatingReader, Reader};
use widl_common::source::{Location, RcStr, Source, Span};

/// A lexical analyzer for Web IDL files.
pub struct Lexer {
    pending: VecDeque<Source>,
    rd: AccumulatingReader,
    name: RcStr,
    line: usize,
    done: bool,
}

/// The states of the numeric literal scanner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Num {
    Start,
    Int,
    Hex,
    Octal,
    BadOctal,
    Point,
    ExpStart,
    ExpSign,
    Exp,
}

impl Lexer {
    /// Create a lexer over a sequence of sources.
    pub fn new(sources: impl IntoIterator<Item = Source>) -> Lexer {
        let mut pending: VecDeque<_> = sources.into_iter().collect();
        let (name, input) = match pending.pop_front() {
            Some(src) => src.into_parts(),
            None => ("<empty>".into(), Box::new(std::io::empty()) as Box<dyn std::io::Read>),
        };
        debug!("Lexing `{}`", name);
        Lexer {
            pending,
            rd: AccumulatingReader::new(input),
            name,
            line: 1,
            done: false,
        }
    }

    /// The name of the source currently being read.
    pub fn source_name(&self) -> &RcStr {
        &self.name
    }

    /// The current line within the current source.
    pub fn line(&self) -> usize {
        self.line
    }

    fn loc(&self, line: usize) -> Location {
        Location::new(self.name.clone(), line)
    }

    /// Check whether the input ended because of a read error.
    fn check_io(&mut self) -> Result<()> {
        match self.rd.take_error() {
            Some(e) => Err(Error::io(self.name.clone(), e)),
            None => Ok(()),
        }
    }

    /// Produce the next token. Comments are returned as tokens; at the end of
    /// all sources an end-of-input token is returned.
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            self.rd.clear();
            match self.rd.peek(0) {
                None => {
                    self.check_io()?;
                    match self.pending.pop_front() {
                        Some(src) => {
                            let (name, input) = src.into_parts();
                            debug!("Lexing `{}`", name);
                            self.rd = AccumulatingReader::new(input);
                            self.name = name;
                            self.line = 1;
                        }
                        None => {
                            return Ok(Token::eof(
                                self.name.clone(),
                                self.line,
                                self.rd.position(),
                            ))
                        }
                    }
                }
                Some(b'\n') => {
                    self.rd.consume(1);
                    self.line += 1;
                }
                Some(b' ') | Some(b'\t') | Some(b'\r') => self.rd.consume(1),
                Some(c) => return self.scan(c),
            }
        }
    }

    fn scan(&mut self, c: u8) -> Result<Token> {
        let line = self.line;
        match c {
            b'/' if self.rd.peek(1) == Some(b'*') => self.block_comment(line),
            b'/' if self.rd.peek(1) == Some(b'/') => self.inline_comment(line),
            b'-' | b'0'..=b'9' => self.number(line),
            b'"' => self.string(line),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                let mut len = 1;
                while let Some(b'a'..=b'z') | Some(b'A'..=b'Z') | Some(b'0'..=b'9') | Some(b'_') =
                    self.rd.peek(len)
                {
                    len += 1;
                }
                self.rd.consume(len);
                let kind = keyword(self.rd.slice()).unwrap_or(IDENTIFIER);
                self.make(kind, line, 0, 0)
            }
            b':' if self.rd.peek(1) == Some(b':') => {
                self.rd.consume(2);
                self.make(DOUBLE_COLON, line, 0, 0)
            }
            0 => Err(self.nul(line)),
            c if c.is_ascii() => {
                self.rd.consume(1);
                self.make(c as u16, line, 0, 0)
            }
            c => Err(Error::lex(
                self.loc(line),
                format!("unrecognised character {:#04x}", c),
            )),
        }
    }

    fn nul(&self, line: usize) -> Error {
        Error::lex(self.loc(line), "\\0 byte not allowed")
    }

    /// Finish the token consumed since the last `clear()`, dropping `front`
    /// and `back` delimiter bytes from its text. Strings and comments may hold
    /// arbitrary bytes; invalid UTF-8 in them is replaced with U+FFFD.
    fn make(&mut self, kind: u16, line: usize, front: usize, back: usize) -> Result<Token> {
        self.check_io()?;
        let bytes = self.rd.slice();
        let text = String::from_utf8_lossy(&bytes[front..bytes.len() - back]).into_owned();
        let token = Token {
            kind,
            text,
            source: self.name.clone(),
            line,
            span: Span::new(self.rd.start(), self.rd.position()),
        };
        trace!("Lexed {:?}", token);
        Ok(token)
    }

    fn block_comment(&mut self, line: usize) -> Result<Token> {
        self.rd.consume(2);
        loop {
            match self.rd.peek(0) {
                None => {
                    self.check_io()?;
                    return Err(Error::lex(self.loc(line), "unterminated comment"));
                }
                Some(0) => return Err(self.nul(self.line)),
                Some(b'*') if self.rd.peek(1) == Some(b'/') => {
                    self.rd.consume(2);
                    return self.make(BLOCK_COMMENT, line, 2, 2);
                }
                Some(c) => {
                    if c == b'\n' {
                        self.line += 1;
                    }
                    self.rd.consume(1);
                }
            }
        }
    }

    fn inline_comment(&mut self, line: usize) -> Result<Token> {
        self.rd.consume(2);
        loop {
            match self.rd.peek(0) {
                None | Some(b'\n') => break,
                Some(0) => return Err(self.nul(line)),
                Some(_) => self.rd.consume(1),
            }
        }
        let token = self.make(INLINE_COMMENT, line, 2, 0)?;
        if self.rd.peek(0) == Some(b'\n') {
            self.rd.consume(1);
            self.line += 1;
        }
        Ok(token)
    }

    fn string(&mut self, line: usize) -> Result<Token> {
        self.rd.consume(1);
        loop {
            match self.rd.peek(0) {
                None | Some(b'\n') => {
                    self.check_io()?;
                    return Err(Error::lex(self.loc(line), "unterminated string"));
                }
                Some(0) => return Err(self.nul(line)),
                Some(b'"') => {
                    self.rd.consume(1);
                    return self.make(STRING, line, 1, 1);
                }
                Some(_) => self.rd.consume(1),
            }
        }
    }

    /// Scan a numeric literal, or a lone `-`.
    fn number(&mut self, line: usize) -> Result<Token> {
        let start = if self.rd.peek(0) == Some(b'-') { 1 } else { 0 };
        let mut len = start;
        let mut octal_end = 0;
        let mut state = Num::Start;
        while let Some(c) = self.rd.peek(len) {
            state = match (state, c) {
                (Num::Start, b'0') => Num::Octal,
                (Num::Start, b'1'..=b'9') => Num::Int,
                (Num::Octal, b'x') | (Num::Octal, b'X') if len == start + 1 => Num::Hex,
                (Num::Hex, c) if c.is_ascii_hexdigit() => Num::Hex,
                (Num::Int, b'0'..=b'9') => Num::Int,
                (Num::Octal, b'0'..=b'7') => Num::Octal,
                (Num::Octal, b'8'..=b'9') => {
                    octal_end = len;
                    Num::BadOctal
                }
                (Num::BadOctal, b'0'..=b'9') => Num::BadOctal,
                (Num::Int, b'.') | (Num::Octal, b'.') | (Num::BadOctal, b'.') => Num::Point,
                (Num::Point, b'0'..=b'9') => Num::Point,
                (Num::Int, b'e')
                | (Num::Int, b'E')
                | (Num::Octal, b'e')
                | (Num::Octal, b'E')
                | (Num::BadOctal, b'e')
                | (Num::BadOctal, b'E')
                | (Num::Point, b'e')
                | (Num::Point, b'E') => Num::ExpStart,
                (Num::ExpStart, b'-') => Num::ExpSign,
                (Num::ExpStart, b'0'..=b'9')
                | (Num::ExpSign, b'0'..=b'9')
                | (Num::Exp, b'0'..=b'9') => Num::Exp,
                _ => break,
            };
            len += 1;
        }
        let (kind, len) = match state {
            Num::Start => (b'-' as u16, 1),
            Num::Int | Num::Octal => (INTEGER, len),
            Num::BadOctal => (INTEGER, octal_end),
            Num::Hex if len == start + 2 => (INTEGER, start + 1),
            Num::Hex => (INTEGER, len),
            Num::Point | Num::Exp => (FLOAT, len),
            Num::ExpStart => (FLOAT, len - 1),
            Num::ExpSign => (FLOAT, len - 2),
        };
        self.rd.consume(len);
        self.make(kind, line, 0, 0)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.is_eof() => {
                self.done = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::new(vec![Source::from_string("test.idl", input)])
            .map(|t| t.unwrap())
            .collect()
    }

    fn check(input: &str, expected: &[(u16, &str)]) {
        let actual: Vec<_> = lex(input)
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect();
        let expected: Vec<_> = expected
            .iter()
            .map(|&(k, t)| (k, t.to_string()))
            .collect();
        assert_eq!(actual, expected);
    }

    fn check_error(input: &str, expected: &str) {
        let err = Lexer::new(vec![Source::from_string("test.idl", input)])
            .find_map(|t| t.err())
            .expect("lexer should fail");
        assert_eq!(err.to_string(), expected);
    }

    fn p(c: u8) -> u16 {
        c as u16
    }

    #[test]
    fn idents_and_keywords() {
        check(
            "interface Foo_1 _bar readonlyx readonly",
            &[
                (keyword(b"interface").unwrap(), "interface"),
                (IDENTIFIER, "Foo_1"),
                (IDENTIFIER, "_bar"),
                (IDENTIFIER, "readonlyx"),
                (keyword(b"readonly").unwrap(), "readonly"),
            ],
        );
    }

    #[test]
    fn punctuation() {
        check(
            "a::b : {};?=",
            &[
                (IDENTIFIER, "a"),
                (DOUBLE_COLON, "::"),
                (IDENTIFIER, "b"),
                (p(b':'), ":"),
                (p(b'{'), "{"),
                (p(b'}'), "}"),
                (p(b';'), ";"),
                (p(b'?'), "?"),
                (p(b'='), "="),
            ],
        );
    }

    #[test]
    fn integers() {
        check("0", &[(INTEGER, "0")]);
        check("42 -17", &[(INTEGER, "42"), (INTEGER, "-17")]);
        check("0755", &[(INTEGER, "0755")]);
        check("0x1fE", &[(INTEGER, "0x1fE")]);
        check("-0X10", &[(INTEGER, "-0X10")]);
    }

    #[test]
    fn bad_octal_truncates() {
        check("09", &[(INTEGER, "0"), (INTEGER, "9")]);
        check("0128", &[(INTEGER, "012"), (INTEGER, "8")]);
    }

    #[test]
    fn empty_hex_collapses() {
        check("0x", &[(INTEGER, "0"), (IDENTIFIER, "x")]);
        check("-0x;", &[(INTEGER, "-0"), (IDENTIFIER, "x"), (p(b';'), ";")]);
    }

    #[test]
    fn lone_minus() {
        check("-a", &[(p(b'-'), "-"), (IDENTIFIER, "a")]);
        check("-", &[(p(b'-'), "-")]);
        check(
            "- Infinity",
            &[(p(b'-'), "-"), (keyword(b"Infinity").unwrap(), "Infinity")],
        );
    }

    #[test]
    fn floats() {
        check("1.5e-3", &[(FLOAT, "1.5e-3")]);
        check("0.25 -3.", &[(FLOAT, "0.25"), (FLOAT, "-3.")]);
        check("6E23", &[(FLOAT, "6E23")]);
        check("1.2.3", &[(FLOAT, "1.2"), (p(b'.'), "."), (INTEGER, "3")]);
    }

    #[test]
    fn exponent_backoff() {
        check("1e", &[(FLOAT, "1"), (IDENTIFIER, "e")]);
        check("2.5e-;", &[(FLOAT, "2.5"), (IDENTIFIER, "e"), (p(b'-'), "-"), (p(b';'), ";")]);
    }

    #[test]
    fn strings() {
        check(
            "\"hello world\" \"\"",
            &[(STRING, "hello world"), (STRING, "")],
        );
        check_error("\"abc\ndef\"", "test.idl: 1: unterminated string");
        check_error("x \"abc", "test.idl: 1: unterminated string");
    }

    #[test]
    fn comments() {
        let tokens = lex("/* one\n two */ a // three\nb");
        let actual: Vec<_> = tokens
            .iter()
            .map(|t| (t.kind, t.text.as_str(), t.line))
            .collect();
        assert_eq!(
            actual,
            vec![
                (BLOCK_COMMENT, " one\n two ", 1),
                (IDENTIFIER, "a", 2),
                (INLINE_COMMENT, " three", 2),
                (IDENTIFIER, "b", 3),
            ]
        );
        check_error("/* open\n", "test.idl: 1: unterminated comment");
    }

    #[test]
    fn nul_byte() {
        check_error("a \0 b", "test.idl: 1: \\0 byte not allowed");
        check_error("\"a\0\"", "test.idl: 1: \\0 byte not allowed");
    }

    #[test]
    fn non_ascii() {
        check_error("a \u{e9}", "test.idl: 1: unrecognised character 0xc3");
        check("/* caf\u{e9} */", &[(BLOCK_COMMENT, " caf\u{e9} ")]);
    }

    #[test]
    fn control_bytes_are_punctuation() {
        check(
            "a \x0c b \x7f",
            &[(IDENTIFIER, "a"), (0x0c, "\x0c"), (IDENTIFIER, "b"), (0x7f, "\x7f")],
        );
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let input: &[u8] = b"\"a\xffb\" // \xfe\n";
        let actual: Vec<_> = Lexer::new(vec![Source::from_reader("test.idl", input)])
            .map(|t| t.unwrap())
            .map(|t| (t.kind, t.text))
            .collect();
        assert_eq!(
            actual,
            vec![
                (STRING, "a\u{fffd}b".to_string()),
                (INLINE_COMMENT, " \u{fffd}".to_string()),
            ]
        );
    }

    #[test]
    fn read_errors_name_the_source() {
        struct Broken {
            sent: bool,
        }
        impl std::io::Read for Broken {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.sent {
                    return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
                }
                self.sent = true;
                buf[..4].copy_from_slice(b"foo ");
                Ok(4)
            }
        }
        let mut lexer = Lexer::new(vec![
            Source::from_reader("broken.idl", Broken { sent: false }),
            Source::from_string("next.idl", "bar"),
        ]);
        assert_eq!(lexer.next_token().unwrap().text, "foo");
        match lexer.next_token() {
            Err(Error::Io { path, error }) => {
                assert_eq!(&*path, "broken.idl");
                assert_eq!(error.to_string(), "disk gone");
            }
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[test]
    fn lines_and_spans() {
        let tokens = lex("a\r\n  bc\n\n\tdef");
        let actual: Vec<_> = tokens.iter().map(|t| (t.line, t.span)).collect();
        assert_eq!(
            actual,
            vec![(1, Span::new(0, 1)), (2, Span::new(5, 7)), (4, Span::new(10, 13))]
        );
    }

    #[test]
    fn chained_sources() {
        let mut lexer = Lexer::new(vec![
            Source::from_string("a.idl", "foo 12"),
            Source::from_string("b.idl", "34 bar\nbaz"),
        ]);
        let mut actual = vec![];
        loop {
            let t = lexer.next_token().unwrap();
            if t.is_eof() {
                assert_eq!(&*t.source, "b.idl");
                break;
            }
            actual.push((t.text, t.source.to_string(), t.line));
        }
        assert_eq!(
            actual,
            vec![
                ("foo".to_string(), "a.idl".to_string(), 1),
                ("12".to_string(), "a.idl".to_string(), 1),
                ("34".to_string(), "b.idl".to_string(), 1),
                ("bar".to_string(), "b.idl".to_string(), 1),
                ("baz".to_string(), "b.idl".to_string(), 2),
            ]
        );
    }

    #[test]
    fn chained_short_token() {
        // A source ending in the middle of a literal yields the short token
        // and continues with the next source.
        check_chain(&["0x", "1e"], &[(INTEGER, "0"), (IDENTIFIER, "x"), (FLOAT, "1"), (IDENTIFIER, "e")]);
        check_chain(&["\"a\"", "/**/"], &[(STRING, "a"), (BLOCK_COMMENT, "")]);
    }

    fn check_chain(inputs: &[&str], expected: &[(u16, &str)]) {
        let sources = inputs
            .iter()
            .enumerate()
            .map(|(i, s)| Source::from_string(format!("{}.idl", i), *s));
        let actual: Vec<_> = Lexer::new(sources)
            .map(|t| t.unwrap())
            .map(|t| (t.kind, t.text))
            .collect();
        let expected: Vec<_> = expected
            .iter()
            .map(|&(k, t)| (k, t.to_string()))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn long_identifier() {
        let name = "x".repeat(5000);
        check(&format!("{} y", name), &[(IDENTIFIER, name.as_str()), (IDENTIFIER, "y")]);
    }

    #[test]
    fn end_of_input() {
        let mut lexer = Lexer::new(vec![Source::from_string("test.idl", "a\n")]);
        assert_eq!(lexer.next_token().unwrap().text, "a");
        let eof = lexer.next_token().unwrap();
        assert!(eof.is_eof());
        assert_eq!(eof.line, 2);
        assert_eq!(format!("{}", eof), "end of input");
        assert!(lexer.next_token().unwrap().is_eof());
    }
}
