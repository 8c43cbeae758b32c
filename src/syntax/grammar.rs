// Copyright (c) 2016-2021 Fabian Schuiki

//! The Web IDL grammar.
//!
//! The grammar is embedded as text and compiled on first use. The compiled
//! table is shared by all parsers for the lifetime of the process.

use crate::parser::Roles;
use once_cell::sync::OnceCell;
use widl_common::errors::Result;
use widl_pargen::GrammarTable;

/// The text of the Web IDL grammar.
pub static WEBIDL_GRAMMAR: &str = include_str!("webidl.grammar");

/// Nonterminals that only carry the tail of a separated repetition.
pub static LISTS: &[&str] = &[
    "Arguments",
    "ExtendedAttributes",
    "ScopedNames",
    "InterfaceMembers",
    "ExceptionMembers",
];

/// Nonterminals that form `::`-qualified names.
pub static SCOPED_NAMES: &[&str] = &["ScopedName"];

/// Nonterminals whose identifier names the declaration.
pub static DECLARATIONS: &[&str] = &[
    "Module",
    "Interface",
    "Exception",
    "Const",
    "Attribute",
    "Operation",
    "Argument",
    "ExceptionMember",
    "Typedef",
    "Valuetype",
];

/// A compiled grammar together with the rewrites of its nonterminals.
#[derive(Debug)]
pub struct Grammar {
    pub table: GrammarTable,
    pub roles: Roles,
}

impl Grammar {
    /// Compile a grammar and resolve the names of its roles.
    pub fn new(
        source: &str,
        lists: &[&str],
        scoped_names: &[&str],
        declarations: &[&str],
    ) -> Result<Grammar> {
        let table = widl_pargen::compile(source)?;
        let mut roles = Roles::new();
        for name in lists {
            roles = roles.list(&table, name)?;
        }
        for name in scoped_names {
            roles = roles.scoped(&table, name)?;
        }
        for name in declarations {
            roles = roles.decl(&table, name)?;
        }
        Ok(Grammar { table, roles })
    }
}

static WEBIDL: OnceCell<Grammar> = OnceCell::new();

/// The compiled Web IDL grammar.
pub fn webidl() -> Result<&'static Grammar> {
    WEBIDL.get_or_try_init(|| {
        info!("Compiling the Web IDL grammar");
        Grammar::new(WEBIDL_GRAMMAR, LISTS, SCOPED_NAMES, DECLARATIONS)
    })
}
