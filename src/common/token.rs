// Copyright (c) 2016-2021 Fabian Schuiki

//! The numbering of token kinds, shared by the grammar compiler and the
//! lexer.
//!
//! Punctuation is numbered by its byte value, which is always below `0x80`.
//! The structural kinds and the keywords occupy the codes from `0x80` up to
//! `0xff`, such that every token kind fits below the nonterminal codes of a
//! compiled grammar table.

/// A `/* ... */` comment.
pub const BLOCK_COMMENT: u16 = 0x80;
/// A `// ...` comment.
pub const INLINE_COMMENT: u16 = 0x81;
pub const INTEGER: u16 = 0x82;
pub const FLOAT: u16 = 0x83;
pub const IDENTIFIER: u16 = 0x84;
pub const STRING: u16 = 0x85;
/// The `::` scope separator.
pub const DOUBLE_COLON: u16 = 0x86;
/// The code of the first keyword in `KEYWORDS`.
pub const KEYWORD_BASE: u16 = 0x87;
/// A wildcard that matches any punctuation outside of `(){}[],`.
pub const OTHER: u16 = 0xfe;
/// The end of all input.
pub const EOF: u16 = 0xff;

/// The keywords of the language, in the order that defines their codes.
pub static KEYWORDS: &[&str] = &[
    "DOMString",
    "Infinity",
    "NaN",
    "any",
    "attribute",
    "boolean",
    "byte",
    "caller",
    "const",
    "creator",
    "deleter",
    "double",
    "exception",
    "false",
    "float",
    "getraises",
    "getter",
    "implements",
    "in",
    "interface",
    "long",
    "module",
    "null",
    "object",
    "octet",
    "optional",
    "raises",
    "readonly",
    "sequence",
    "setraises",
    "setter",
    "short",
    "static",
    "stringifier",
    "true",
    "typedef",
    "unsigned",
    "valuetype",
    "void",
];

/// Punctuation that the `OTHER` wildcard never matches.
pub const RESERVED_PUNCTUATION: &[u8] = b"(){}[],";

/// Look up the keyword code for an identifier.
pub fn keyword(text: &[u8]) -> Option<u16> {
    KEYWORDS
        .iter()
        .position(|kw| kw.len() == text.len() && kw.as_bytes() == text)
        .map(|i| KEYWORD_BASE + i as u16)
}

/// Look up the code for a terminal named by a lowercase word in a grammar.
pub fn terminal(name: &str) -> Option<u16> {
    match name {
        "identifier" => Some(IDENTIFIER),
        "integer" => Some(INTEGER),
        "float" => Some(FLOAT),
        "string" => Some(STRING),
        "other" => Some(OTHER),
        _ => None,
    }
}

/// Look up the code for a quoted literal in a grammar. A literal is a single
/// punctuation character, the `::` separator, or a keyword.
pub fn literal(text: &str) -> Option<u16> {
    if text == "::" {
        return Some(DOUBLE_COLON);
    }
    match text.as_bytes() {
        [c] if c.is_ascii_punctuation() => Some(*c as u16),
        bytes => keyword(bytes),
    }
}

/// Check whether a single punctuation character is matched by `OTHER`.
pub fn is_other(code: u16) -> bool {
    code < 0x80 && !RESERVED_PUNCTUATION.contains(&(code as u8))
}

/// Check whether a token of kind `actual` is accepted where the grammar
/// expects `expected`.
pub fn matches(expected: u16, actual: u16) -> bool {
    expected == actual || (expected == OTHER && is_other(actual))
}

/// Check whether the kind is a comment.
pub fn is_comment(code: u16) -> bool {
    code == BLOCK_COMMENT || code == INLINE_COMMENT
}

/// A human-readable description of a token kind, for use in diagnostics.
pub fn describe(code: u16) -> String {
    match code {
        BLOCK_COMMENT | INLINE_COMMENT => "comment".into(),
        INTEGER => "integer".into(),
        FLOAT => "float".into(),
        IDENTIFIER => "identifier".into(),
        STRING => "string".into(),
        DOUBLE_COLON => "`::`".into(),
        OTHER => "punctuation".into(),
        EOF => "end of input".into(),
        c if c < 0x80 => format!("`{}`", c as u8 as char),
        c => match KEYWORDS.get((c - KEYWORD_BASE) as usize) {
            Some(kw) => format!("`{}`", kw),
            None => format!("token {:#x}", c),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_fit() {
        assert!(KEYWORD_BASE + (KEYWORDS.len() as u16) <= OTHER);
        assert_eq!(keyword(b"interface"), Some(KEYWORD_BASE + 19));
        assert_eq!(keyword(b"DOMString"), Some(KEYWORD_BASE));
        assert_eq!(keyword(b"interfaces"), None);
        assert_eq!(keyword(b"Interface"), None);
    }

    #[test]
    fn literals() {
        assert_eq!(literal(";"), Some(b';' as u16));
        assert_eq!(literal("::"), Some(DOUBLE_COLON));
        assert_eq!(literal("void"), keyword(b"void"));
        assert_eq!(literal("a"), None);
        assert_eq!(literal("::x"), None);
        assert_eq!(terminal("identifier"), Some(IDENTIFIER));
        assert_eq!(terminal("number"), None);
    }

    #[test]
    fn wildcard() {
        assert!(matches(OTHER, b'=' as u16));
        assert!(matches(OTHER, b'-' as u16));
        assert!(!matches(OTHER, b',' as u16));
        assert!(!matches(OTHER, b'(' as u16));
        assert!(!matches(OTHER, IDENTIFIER));
        assert!(!matches(OTHER, EOF));
        assert!(matches(b',' as u16, b',' as u16));
    }

    #[test]
    fn descriptions() {
        assert_eq!(describe(b';' as u16), "`;`");
        assert_eq!(describe(keyword(b"module").unwrap()), "`module`");
        assert_eq!(describe(EOF), "end of input");
    }
}
