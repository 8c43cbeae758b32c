// Copyright (c) 2016-2021 Fabian Schuiki

//! A buffered, peekable byte stream for lexers.

use std::cmp::max;
use std::io::Read;

/// A trait that can supply a peekable stream of bytes.
pub trait Reader {
    /// The byte `offset` bytes past the current position, or `None` beyond
    /// the end of the input.
    fn peek(&mut self, offset: usize) -> Option<u8>;
    /// Advance the current position by `amount` bytes.
    fn consume(&mut self, amount: usize);
    /// Forget the bytes consumed so far.
    fn clear(&mut self);
    /// The bytes consumed since the last call to `clear()`.
    fn slice(&self) -> &[u8];
}

/// A reader that accumulates the bytes of the token currently being scanned
/// in a buffer that grows geometrically, such that a token of any length can
/// be held in memory at once.
pub struct AccumulatingReader {
    rd: Box<dyn Read>,
    buf: Vec<u8>,
    /// Absolute offset of `buf[0]` within the input.
    offset: usize,
    base: usize,
    pos: usize,
    tail: usize,
    error: Option<std::io::Error>,
}

impl AccumulatingReader {
    pub fn new(rd: Box<dyn Read>) -> AccumulatingReader {
        AccumulatingReader {
            rd,
            buf: Vec::new(),
            offset: 0,
            base: 0,
            pos: 0,
            tail: 0,
            error: None,
        }
    }

    /// Grow and fill the internal buffer such that at least `min_len` bytes
    /// are present, or the end of the input has been reached. This may shift
    /// the buffer contents around, so indices derived from `base`, `pos`, or
    /// `tail` must be recalculated afterwards.
    fn refill(&mut self, mut min_len: usize) {
        // Move the buffer contents to the beginning to make more space at the
        // end.
        if self.base > 0 {
            self.buf.copy_within(self.base..self.tail, 0);
            self.offset += self.base;
            self.pos -= self.base;
            self.tail -= self.base;
            min_len -= self.base;
            self.base = 0;
        }

        // Double the buffer until the requested length fits.
        while min_len > self.buf.len() {
            let new_len = max(self.buf.len() * 2, 32);
            self.buf.resize(new_len, 0);
        }

        // Keep reading until at least min_len bytes are in the buffer. A read
        // error ends the input; the lexer picks it up through `take_error`.
        while min_len > self.tail && self.error.is_none() {
            match self.rd.read(&mut self.buf[self.tail..]) {
                Ok(0) => break,
                Ok(n) => self.tail += n,
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => self.error = Some(e),
            }
        }
    }

    /// The absolute offset of the current position within the input.
    pub fn position(&self) -> usize {
        self.offset + self.pos
    }

    /// The absolute offset of the first byte consumed since the last call to
    /// `clear()`.
    pub fn start(&self) -> usize {
        self.offset + self.base
    }

    /// The number of bytes the internal buffer can currently hold.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Take the error that ended the input early, if any.
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }
}

impl Reader for AccumulatingReader {
    fn peek(&mut self, off: usize) -> Option<u8> {
        // If the requested offset lies outside the chunk of the input that is
        // currently in memory, refill the buffer first.
        if self.pos + off >= self.tail {
            self.refill(self.pos + off + 1);
        }
        let idx = self.pos + off;
        if idx < self.tail {
            Some(self.buf[idx])
        } else {
            None
        }
    }

    fn consume(&mut self, amt: usize) {
        self.pos += amt;
        debug_assert!(self.pos <= self.tail);
    }

    fn clear(&mut self) {
        self.base = self.pos
    }

    fn slice(&self) -> &[u8] {
        &self.buf[self.base..self.pos]
    }
}
