//! The in-memory representation of a grammar.

use itertools::Itertools;
use std::collections::HashMap;
use typed_arena::Arena;

/// Owns the names interned by a `Context`.
#[derive(Default)]
pub struct ContextArena {
    names: Arena<u8>,
}

/// A grammar under construction.
///
/// Nonterminals are kept in the order of their first appearance. Definition
/// order is tracked separately, since the table encoder lays nonterminals out
/// in the order in which the grammar defines them.
pub struct Context<'a> {
    arena: &'a ContextArena,
    nonterms: Vec<NontermData<'a>>,
    lookup: HashMap<&'a str, Nonterm<'a>>,
    defined: Vec<Nonterm<'a>>,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Context").finish_non_exhaustive()
    }
}

impl<'a> Context<'a> {
    pub fn new(arena: &'a ContextArena) -> Self {
        Context {
            arena,
            nonterms: Default::default(),
            lookup: Default::default(),
            defined: Default::default(),
        }
    }

    /// Allocate a string in the context's arena.
    pub fn intern_str(&self, s: &str) -> &'a str {
        self.arena.names.alloc_str(s)
    }

    /// Allocate a nonterminal, or return the existing one with that name.
    pub fn intern_nonterm(&mut self, name: &str) -> Nonterm<'a> {
        if let Some(&nt) = self.lookup.get(name) {
            nt
        } else {
            let interned_name = self.intern_str(name);
            let nt = Nonterm(interned_name, self.nonterms.len());
            self.nonterms.push(NontermData::new(nt));
            self.lookup.insert(interned_name, nt);
            nt
        }
    }

    /// Try to find an already-interned nonterminal.
    pub fn lookup_nonterm(&self, name: &str) -> Option<Nonterm<'a>> {
        self.lookup.get(name).cloned()
    }

    /// Mark a nonterminal as defined on the given line.
    ///
    /// Returns the line of the earlier definition if there is one.
    pub fn define(&mut self, nt: Nonterm<'a>, line: usize) -> Result<(), usize> {
        let data = &mut self.nonterms[nt.1];
        if let Some(earlier) = data.defined_at {
            return Err(earlier);
        }
        data.defined_at = Some(line);
        self.defined.push(nt);
        Ok(())
    }

    /// Add a production to a nonterminal. Returns its index among the
    /// nonterminal's productions.
    pub fn add_production(&mut self, nt: Nonterm<'a>, items: Vec<Item<'a>>) -> usize {
        let prods = &mut self.nonterms[nt.1].prods;
        prods.push(Production {
            nt,
            items,
            offset: 0,
        });
        trace!("Added production {}", prods[prods.len() - 1]);
        prods.len() - 1
    }

    /// Obtain an iterator over all nonterminals, in order of appearance.
    pub fn nonterms(&self) -> impl Iterator<Item = Nonterm<'a>> + '_ {
        self.nonterms.iter().map(|data| data.nt)
    }

    /// Obtain an iterator over the defined nonterminals, in definition order.
    pub fn defined(&self) -> impl Iterator<Item = Nonterm<'a>> + '_ {
        self.defined.iter().cloned()
    }

    /// Access the data associated with a nonterminal.
    pub fn data(&self, nt: Nonterm<'a>) -> &NontermData<'a> {
        &self.nonterms[nt.1]
    }

    /// Mutably access the data associated with a nonterminal.
    pub fn data_mut(&mut self, nt: Nonterm<'a>) -> &mut NontermData<'a> {
        &mut self.nonterms[nt.1]
    }
}

/// A nonterminal.
#[derive(Copy, Clone)]
pub struct Nonterm<'a>(&'a str, usize);

impl<'a> Nonterm<'a> {
    pub fn name(self) -> &'a str {
        self.0
    }
}

impl std::fmt::Display for Nonterm<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Debug for Nonterm<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl PartialEq for Nonterm<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.1 == other.1
    }
}

impl Eq for Nonterm<'_> {}

impl PartialOrd for Nonterm<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Nonterm<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.1.cmp(&other.1)
    }
}

impl std::hash::Hash for Nonterm<'_> {
    fn hash<H: std::hash::Hasher>(&self, h: &mut H) {
        self.1.hash(h)
    }
}

/// Everything the compiler knows about a nonterminal.
pub struct NontermData<'a> {
    pub nt: Nonterm<'a>,
    pub prods: Vec<Production<'a>>,
    /// The grammar line that defines the nonterminal.
    pub defined_at: Option<usize>,
    /// The grammar line on which the nonterminal was first seen.
    pub first_seen: usize,
    /// Whether the nonterminal may derive the empty sequence.
    pub can_be_empty: bool,
    /// Maps each terminal that can begin the nonterminal to the index of the
    /// production it selects, in order of discovery.
    pub first: Vec<(u16, usize)>,
    /// The offset of the nonterminal's dispatch block in the encoded table.
    pub offset: u16,
}

impl<'a> NontermData<'a> {
    fn new(nt: Nonterm<'a>) -> Self {
        NontermData {
            nt,
            prods: vec![],
            defined_at: None,
            first_seen: 0,
            can_be_empty: false,
            first: vec![],
            offset: 0,
        }
    }
}

/// A production of a nonterminal.
pub struct Production<'a> {
    pub nt: Nonterm<'a>,
    pub items: Vec<Item<'a>>,
    /// The offset of the production in the encoded table. Empty productions
    /// occupy no space and keep offset 0.
    pub offset: u16,
}

impl Production<'_> {
    pub fn is_epsilon(&self) -> bool {
        self.items.is_empty()
    }
}

impl std::fmt::Display for Production<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.items.is_empty() {
            write!(f, "{} -> ε", self.nt)
        } else {
            write!(f, "{} -> {}", self.nt, self.items.iter().format(" "))
        }
    }
}

impl std::fmt::Debug for Production<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

/// An element of a production.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Item<'a> {
    /// A reference to a nonterminal.
    Nonterm(Nonterm<'a>),
    /// A terminal named by a lowercase word, such as `identifier`.
    Term { name: &'a str, code: u16 },
    /// A quoted literal, such as `";"` or `"interface"`.
    Literal { text: &'a str, code: u16 },
}

impl std::fmt::Display for Item<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Item::Nonterm(nt) => write!(f, "{}", nt),
            Item::Term { name, .. } => write!(f, "{}", name),
            Item::Literal { text, .. } => write!(f, "\"{}\"", text),
        }
    }
}

impl std::fmt::Debug for Item<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}
