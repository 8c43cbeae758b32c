//! Reading the textual grammar description.
//!
//! A grammar is a sequence of rules such as
//!
//! ```text
//! [1] Definitions → Definition Definitions
//!                 | ε
//! [2] Definition  → "interface" identifier "{" Members "}" ";"
//! ```
//!
//! A rule starts at a `[n]` marker, at the start of the file, or with an
//! uppercase word that leads its line and is followed by `→`. The first
//! uppercase word of a rule defines the nonterminal; `→` opens its first
//! production and `|` opens each alternative. Within a production, uppercase
//! words reference nonterminals, lowercase words name terminals, and quoted
//! text is a literal token. `ε` marks an explicitly empty production and `#`
//! starts a comment that runs to the end of the line.

use crate::context::{Context, Item, Nonterm};
use itertools::Itertools;
use widl_common::errors::{Error, Result};
use widl_common::token;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Kind<'s> {
    Marker,
    Nonterm(&'s str),
    Term(&'s str),
    Literal(&'s str),
    Arrow,
    Bar,
    Epsilon,
}

#[derive(Copy, Clone, Debug)]
struct Tok<'s> {
    kind: Kind<'s>,
    line: usize,
    leads_line: bool,
}

/// Split the grammar text into tokens.
fn tokenize(input: &str) -> Result<Vec<Tok>> {
    let mut toks = vec![];
    let mut iter = input.char_indices().peekable();
    let mut line = 1;
    let mut leads_line = true;
    while let Some((i, c)) = iter.next() {
        let kind = match c {
            '\n' => {
                line += 1;
                leads_line = true;
                continue;
            }
            ' ' | '\t' | '\r' => continue,
            '#' => {
                while iter.peek().map(|&(_, c)| c != '\n').unwrap_or(false) {
                    iter.next();
                }
                continue;
            }
            '[' => {
                loop {
                    match iter.next() {
                        Some((_, ']')) => break,
                        Some((_, '\n')) | None => return Err(Error::grammar(line, "missing ]")),
                        Some(_) => (),
                    }
                }
                Kind::Marker
            }
            '"' => {
                let start = i + 1;
                let end = loop {
                    match iter.next() {
                        Some((j, '"')) => break j,
                        Some((_, '\n')) | None => {
                            return Err(Error::grammar(line, "unterminated string"))
                        }
                        Some(_) => (),
                    }
                };
                Kind::Literal(&input[start..end])
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = i + c.len_utf8();
                while let Some(&(j, c)) = iter.peek() {
                    if !(c.is_ascii_alphanumeric() || c == '_') {
                        break;
                    }
                    end = j + c.len_utf8();
                    iter.next();
                }
                let word = &input[i..end];
                if c.is_ascii_uppercase() {
                    Kind::Nonterm(word)
                } else {
                    Kind::Term(word)
                }
            }
            '→' => Kind::Arrow,
            '|' => Kind::Bar,
            'ε' => Kind::Epsilon,
            c => {
                return Err(Error::grammar(
                    line,
                    format!("unrecognised character `{}`", c.escape_default()),
                ))
            }
        };
        toks.push(Tok {
            kind,
            line,
            leads_line,
        });
        leads_line = false;
    }
    Ok(toks)
}

/// The state threaded through the reading of a grammar.
struct Builder<'a, 'c> {
    cx: &'c mut Context<'a>,
    /// The nonterminal whose rule is being read.
    current: Option<Nonterm<'a>>,
    /// Whether the next uppercase word defines a nonterminal.
    at_definition: bool,
    /// The items of the open production, if there is one.
    production: Option<Vec<Item<'a>>>,
    /// Whether the open production was marked with `ε`.
    epsilon: bool,
}

impl<'a, 'c> Builder<'a, 'c> {
    /// Close the open production and add it to the current nonterminal.
    fn finish_production(&mut self) {
        if let (Some(nt), Some(items)) = (self.current, self.production.take()) {
            self.cx.add_production(nt, items);
        }
        self.epsilon = false;
    }

    /// Close the current rule.
    fn finish_rule(&mut self, line: usize) -> Result<()> {
        self.finish_production();
        if let Some(nt) = self.current.take() {
            if self.cx.data(nt).prods.is_empty() {
                return Err(Error::grammar(
                    line,
                    format!("non-terminal `{}` has no productions", nt),
                ));
            }
        }
        Ok(())
    }

    fn define(&mut self, name: &str, line: usize) -> Result<()> {
        self.finish_rule(line)?;
        let nt = self.nonterm(name, line);
        if let Err(earlier) = self.cx.define(nt, line) {
            return Err(Error::grammar(
                line,
                format!(
                    "non-terminal `{}` defined twice (first on line {})",
                    nt, earlier
                ),
            ));
        }
        self.current = Some(nt);
        self.at_definition = false;
        Ok(())
    }

    fn nonterm(&mut self, name: &str, line: usize) -> Nonterm<'a> {
        let nt = self.cx.intern_nonterm(name);
        let data = self.cx.data_mut(nt);
        if data.first_seen == 0 {
            data.first_seen = line;
        }
        nt
    }

    fn open_production(&mut self, what: &str, line: usize) -> Result<()> {
        if self.current.is_none() {
            return Err(Error::grammar(
                line,
                format!("`{}` outside of a rule", what),
            ));
        }
        self.finish_production();
        self.production = Some(vec![]);
        Ok(())
    }

    fn push(&mut self, item: Item<'a>, line: usize) -> Result<()> {
        if self.epsilon {
            return Err(Error::grammar(
                line,
                format!("`{}` in a production marked empty", item),
            ));
        }
        match self.production {
            Some(ref mut items) => {
                items.push(item);
                Ok(())
            }
            None => Err(Error::grammar(
                line,
                format!("`{}` outside of a production", item),
            )),
        }
    }
}

/// Read a grammar description into a context.
pub fn read_grammar<'a>(cx: &mut Context<'a>, input: &str) -> Result<()> {
    let toks = tokenize(input)?;
    let mut bld = Builder {
        cx: &mut *cx,
        current: None,
        at_definition: true,
        production: None,
        epsilon: false,
    };
    for (i, tok) in toks.iter().enumerate() {
        let line = tok.line;
        match tok.kind {
            Kind::Marker => {
                bld.finish_rule(line)?;
                bld.at_definition = true;
            }
            Kind::Nonterm(name) => {
                let opens_rule = tok.leads_line
                    && toks.get(i + 1).map(|t| t.kind) == Some(Kind::Arrow);
                if bld.at_definition || opens_rule {
                    bld.define(name, line)?;
                } else {
                    let nt = bld.nonterm(name, line);
                    bld.push(Item::Nonterm(nt), line)?;
                }
            }
            Kind::Term(name) => {
                let code = token::terminal(name).ok_or_else(|| {
                    Error::grammar(line, format!("unknown terminal `{}`", name))
                })?;
                let name = bld.cx.intern_str(name);
                bld.push(Item::Term { name, code }, line)?;
            }
            Kind::Literal(text) => {
                let code = token::literal(text).ok_or_else(|| {
                    Error::grammar(line, format!("invalid literal \"{}\"", text))
                })?;
                let text = bld.cx.intern_str(text);
                bld.push(Item::Literal { text, code }, line)?;
            }
            Kind::Arrow => {
                if bld.production.is_some() {
                    return Err(Error::grammar(line, "unexpected `→` within a production"));
                }
                bld.open_production("→", line)?;
            }
            Kind::Bar => {
                if bld.production.is_none() {
                    return Err(Error::grammar(line, "`|` before the first production"));
                }
                bld.open_production("|", line)?;
            }
            Kind::Epsilon => match bld.production {
                Some(ref items) if items.is_empty() => bld.epsilon = true,
                Some(_) => return Err(Error::grammar(line, "`ε` in a non-empty production")),
                None => return Err(Error::grammar(line, "`ε` outside of a production")),
            },
        }
    }
    let last_line = toks.last().map(|t| t.line).unwrap_or(1);
    bld.finish_rule(last_line)?;

    // Every nonterminal that was referenced must have been defined.
    let undefined: Vec<_> = cx.nonterms().filter(|&nt| cx.data(nt).defined_at.is_none()).collect();
    if let Some(&first) = undefined.first() {
        return Err(Error::grammar(
            cx.data(first).first_seen,
            format!(
                "undefined non-terminal {}",
                undefined.iter().map(|nt| format!("`{}`", nt)).format(", ")
            ),
        ));
    }
    if cx.defined().next().is_none() {
        return Err(Error::grammar(None, "grammar defines no non-terminals"));
    }
    info!(
        "Read {} non-terminals with {} productions",
        cx.defined().count(),
        cx.defined().map(|nt| cx.data(nt).prods.len()).sum::<usize>()
    );
    Ok(())
}
