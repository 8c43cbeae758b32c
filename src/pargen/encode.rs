//! Encoding of a compiled grammar into a flat table.
//!
//! The table is a sequence of 16 bit codes. Each nonterminal starts with its
//! dispatch block, a list of `(terminal, production offset)` pairs closed by
//! `EMPTY` if the nonterminal may derive nothing and `END` otherwise. The
//! nonterminal's productions follow, each a list of items closed by `END`.
//! A terminal item is its token code, a nonterminal item is `NT_BIAS` plus
//! the offset of the nonterminal's dispatch block. Empty productions occupy
//! no space.

use crate::context::{Context, Item};
use std::io::Write;
use widl_common::errors::{Error, Result};
use widl_common::token;

/// Closes a production, or a dispatch block of a nonterminal that must not
/// be empty.
pub const END: u16 = 0;
/// Closes the dispatch block of a nonterminal that may be empty.
pub const EMPTY: u16 = 1;
/// Added to the offset of a nonterminal to form its code.
pub const NT_BIAS: u16 = 0x100;

/// A compiled grammar.
#[derive(Clone, PartialEq, Eq)]
pub struct GrammarTable {
    code: Vec<u16>,
    /// The nonterminals and their offsets, in definition order.
    names: Vec<(String, u16)>,
}

/// Assign offsets to all nonterminals and productions, and write the table.
pub fn encode(cx: &mut Context) -> Result<GrammarTable> {
    let nts: Vec<_> = cx.defined().collect();

    // Assign offsets.
    let mut offset = 0usize;
    for &nt in &nts {
        let data = cx.data_mut(nt);
        data.offset = checked_offset(offset)?;
        offset += data.first.len() * 2 + 1;
        for prod in &mut data.prods {
            if !prod.is_epsilon() {
                prod.offset = checked_offset(offset)?;
                offset += prod.items.len() + 1;
            }
        }
    }

    // Write the table.
    let mut code = Vec::with_capacity(offset);
    let mut names = Vec::with_capacity(nts.len());
    for &nt in &nts {
        let data = cx.data(nt);
        debug_assert_eq!(code.len(), data.offset as usize);
        names.push((nt.name().to_string(), data.offset));

        // Exact matches come first, such that they take precedence over the
        // `other` wildcard when the parser scans the block.
        let exact = data.first.iter().filter(|&&(c, _)| c != token::OTHER);
        let wildcard = data.first.iter().filter(|&&(c, _)| c == token::OTHER);
        for &(term, prod) in exact.chain(wildcard) {
            code.push(term);
            code.push(data.prods[prod].offset);
        }
        code.push(if data.can_be_empty { EMPTY } else { END });

        for prod in data.prods.iter().filter(|p| !p.is_epsilon()) {
            debug_assert_eq!(code.len(), prod.offset as usize);
            for item in &prod.items {
                code.push(match *item {
                    Item::Nonterm(nt) => NT_BIAS + cx.data(nt).offset,
                    Item::Term { code, .. } | Item::Literal { code, .. } => code,
                });
            }
            code.push(END);
        }
    }
    info!(
        "Encoded {} non-terminals into {} table entries",
        names.len(),
        code.len()
    );
    Ok(GrammarTable { code, names })
}

fn checked_offset(offset: usize) -> Result<u16> {
    if offset > (std::u16::MAX - NT_BIAS) as usize {
        Err(Error::grammar(
            None,
            format!("grammar table too large ({} entries)", offset),
        ))
    } else {
        Ok(offset as u16)
    }
}

impl GrammarTable {
    /// The flat table of codes.
    pub fn code(&self) -> &[u16] {
        &self.code
    }

    /// The offset of the root nonterminal, which is the one defined first.
    pub fn root(&self) -> u16 {
        self.names.first().map(|&(_, off)| off).unwrap_or(0)
    }

    /// Find the offset of a nonterminal.
    pub fn offset_of(&self, name: &str) -> Option<u16> {
        self.names
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, off)| off)
    }

    /// Find the name of the nonterminal at an offset.
    pub fn name_of(&self, offset: u16) -> Option<&str> {
        self.names
            .iter()
            .find(|&&(_, off)| off == offset)
            .map(|(name, _)| name.as_str())
    }

    /// The names of all nonterminals, each prefixed with its offset as two
    /// little-endian bytes and terminated by a NUL byte.
    pub fn packed_names(&self) -> Vec<u8> {
        let mut out = vec![];
        for (name, off) in &self.names {
            out.push((off & 0xff) as u8);
            out.push((off >> 8) as u8);
            out.extend_from_slice(name.as_bytes());
            out.push(0);
        }
        out
    }

    /// Write the table as a Rust array expression.
    pub fn write_body(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "// Generated by widl-pargen. Do not edit.")?;
        writeln!(out, "[")?;
        for (i, (name, off)) in self.names.iter().enumerate() {
            let end = self
                .names
                .get(i + 1)
                .map(|&(_, next)| next as usize)
                .unwrap_or(self.code.len());
            let mut pos = *off as usize;
            writeln!(out, "    /* {}: {} */", off, name)?;

            // The dispatch block.
            let start = pos;
            while self.code[pos] != END && self.code[pos] != EMPTY {
                pos += 2;
            }
            pos += 1;
            write_line(out, &self.code[start..pos])?;

            // The productions.
            while pos < end {
                let start = pos;
                while self.code[pos] != END {
                    pos += 1;
                }
                pos += 1;
                write_line(out, &self.code[start..pos])?;
            }
        }
        writeln!(out, "]")?;
        Ok(())
    }

    /// Write named constants for the node codes of all nonterminals, and the
    /// packed name table.
    pub fn write_header(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "// Generated by widl-pargen. Do not edit.")?;
        for (name, off) in &self.names {
            writeln!(
                out,
                "pub const NT_{}: u16 = {:#06x};",
                screaming_snake_case(name),
                NT_BIAS + off
            )?;
        }
        write!(out, "pub static NT_NAMES: &[u8] = b\"")?;
        for b in self.packed_names() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                write!(out, "{}", b as char)?;
            } else {
                write!(out, "\\x{:02x}", b)?;
            }
        }
        writeln!(out, "\";")?;
        Ok(())
    }
}

/// Decode a packed name table into offsets and names.
pub fn unpack_names(packed: &[u8]) -> Vec<(u16, String)> {
    let mut out = vec![];
    let mut rest = packed;
    while rest.len() >= 2 {
        let off = rest[0] as u16 | (rest[1] as u16) << 8;
        let len = rest[2..].iter().position(|&b| b == 0).unwrap_or(rest.len() - 2);
        out.push((off, String::from_utf8_lossy(&rest[2..2 + len]).into_owned()));
        rest = rest.get(3 + len..).unwrap_or(&[]);
    }
    out
}

fn write_line(out: &mut impl Write, codes: &[u16]) -> std::io::Result<()> {
    write!(out, "   ")?;
    for c in codes {
        write!(out, " {:#06x},", c)?;
    }
    writeln!(out)
}

fn screaming_snake_case(name: &str) -> String {
    let mut out = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        out.push(c.to_ascii_uppercase());
    }
    out
}

impl std::fmt::Debug for GrammarTable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "GrammarTable({} non-terminals, {} entries)",
            self.names.len(),
            self.code.len()
        )
    }
}
