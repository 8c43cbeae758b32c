//! Computation of FIRST sets and detection of LL(1) conflicts.

use crate::context::{Context, Item, Nonterm};
use widl_common::errors::{Error, Result};
use widl_common::token;

/// Compute the FIRST set of every nonterminal in the context.
///
/// Each terminal that can begin a nonterminal is mapped to the production it
/// selects. If two productions of one nonterminal can begin with the same
/// terminal, the grammar is not LL(1) and an error naming the nonterminal is
/// returned. A nonterminal is marked as possibly empty if one of its
/// productions derives the empty sequence.
pub fn build_first_sets(cx: &mut Context) -> Result<()> {
    let nts: Vec<_> = cx.defined().collect();
    for nt in nts {
        let mut first = vec![];
        let mut can_be_empty = false;
        for (index, prod) in cx.data(nt).prods.iter().enumerate() {
            let mut stack = vec![nt];
            let path = Path {
                cx: &*cx,
                top: nt,
                prod: index,
            };
            if path.add_initial_terms(&prod.items, &mut first, &mut stack)? {
                can_be_empty = true;
            }
        }
        debug!(
            "FIRST({}) = {{{}}}{}",
            nt,
            first
                .iter()
                .map(|&(code, _)| token::describe(code))
                .collect::<Vec<_>>()
                .join(", "),
            if can_be_empty { " + ε" } else { "" }
        );
        let data = cx.data_mut(nt);
        data.first = first;
        data.can_be_empty = can_be_empty;
    }
    info!("Computed FIRST sets of {} non-terminals", cx.defined().count());
    Ok(())
}

/// The production of a nonterminal whose initial terminals are being
/// collected.
struct Path<'a, 'c> {
    cx: &'c Context<'a>,
    top: Nonterm<'a>,
    prod: usize,
}

impl<'a, 'c> Path<'a, 'c> {
    /// Register the terminals that can begin `items` against the production.
    ///
    /// Returns whether the items can derive the empty sequence. `stack` holds
    /// the nonterminals currently being expanded, which is used to detect
    /// left recursion.
    fn add_initial_terms(
        &self,
        items: &[Item<'a>],
        first: &mut Vec<(u16, usize)>,
        stack: &mut Vec<Nonterm<'a>>,
    ) -> Result<bool> {
        for item in items {
            match *item {
                Item::Nonterm(nt) => {
                    if stack.contains(&nt) {
                        return Err(Error::grammar(
                            self.cx.data(nt).defined_at,
                            format!("grammar is left-recursive at `{}`", nt),
                        ));
                    }
                    stack.push(nt);
                    let mut nullable = false;
                    for prod in &self.cx.data(nt).prods {
                        nullable |= self.add_initial_terms(&prod.items, first, stack)?;
                    }
                    stack.pop();
                    if !nullable {
                        return Ok(false);
                    }
                }
                Item::Term { code, .. } | Item::Literal { code, .. } => {
                    self.add_entry(code, first)?;
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn add_entry(&self, code: u16, first: &mut Vec<(u16, usize)>) -> Result<()> {
        match first.iter().find(|&&(c, _)| c == code) {
            Some(&(_, prod)) if prod == self.prod => Ok(()),
            Some(&(_, prod)) => {
                let prods = &self.cx.data(self.top).prods;
                Err(Error::grammar(
                    self.cx.data(self.top).defined_at,
                    format!(
                        "grammar not LL(1) at start of `{}`: {} begins both `{}` and `{}`",
                        self.top,
                        token::describe(code),
                        prods[prod],
                        prods[self.prod]
                    ),
                ))
            }
            None => {
                first.push((code, self.prod));
                Ok(())
            }
        }
    }
}
