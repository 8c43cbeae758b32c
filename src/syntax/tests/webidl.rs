// Copyright (c) 2016-2021 Fabian Schuiki

//! End-to-end tests of the Web IDL parser.

use widl_common::source::Source;
use widl_syntax::grammar::webidl;
use widl_syntax::token::{IDENTIFIER, INTEGER};
use widl_syntax::*;

fn parse(input: &str) -> Tree {
    parse_with(input, ())
}

fn parse_with(input: &str, sink: impl CommentSink) -> Tree {
    match widl_syntax::parse(vec![Source::from_string("test.idl", input)], sink) {
        Ok(tree) => tree,
        Err(e) => panic!("{}", e),
    }
}

fn parse_err(input: &str) -> String {
    widl_syntax::parse(vec![Source::from_string("test.idl", input)], ())
        .unwrap_err()
        .to_string()
}

fn name(tree: &Tree, id: NodeId) -> &'static str {
    match tree.kind(id) {
        NodeKind::Nonterm(off) => webidl().unwrap().table.name_of(off).unwrap(),
        NodeKind::Token(_) => "token",
    }
}

fn nonterms(tree: &Tree, id: NodeId) -> Vec<&'static str> {
    tree.nonterm_children(id).map(|c| name(tree, c)).collect()
}

fn ident(tree: &Tree, id: NodeId) -> &str {
    tree.text(tree.find_token(id, IDENTIFIER).unwrap())
}

#[test]
fn minimal_interface() {
    let tree = parse("interface Foo {\n  attribute long bar;\n  void baz();\n};\n");
    let root = tree.root();
    assert_eq!(name(&tree, root), "Definitions");
    assert_eq!(nonterms(&tree, root), vec!["Interface"]);

    let iface = tree.children(root)[0];
    assert_eq!(ident(&tree, iface), "Foo");
    assert_eq!(nonterms(&tree, iface), vec!["Attribute", "Operation"]);

    let members: Vec<_> = tree.nonterm_children(iface).collect();
    assert_eq!(ident(&tree, members[0]), "bar");
    assert_eq!(ident(&tree, members[1]), "baz");
    assert_eq!(tree.node(members[0]).line, 2);
    assert_eq!(tree.node(members[1]).line, 3);
    for &m in &members {
        assert_eq!(tree.parent(m), Some(iface));
    }
}

#[test]
fn empty_document() {
    let tree = parse("// nothing to see\n");
    assert!(tree.children(tree.root()).is_empty());
}

#[test]
fn modules_and_inheritance() {
    let tree = parse(
        "module dom {\n\
           interface Node : ::core::Object, events::EventTarget {\n\
             readonly attribute DOMString? nodeName;\n\
           };\n\
           Node implements Mixin;\n\
         };\n",
    );
    let module = tree.children(tree.root())[0];
    assert_eq!(name(&tree, module), "Module");
    assert_eq!(ident(&tree, module), "dom");

    let defs = tree.nonterm_children(module).next().unwrap();
    assert_eq!(nonterms(&tree, defs), vec!["Interface", "ImplementsStatement"]);

    let iface = tree.children(defs)[0];
    assert_eq!(
        nonterms(&tree, iface),
        vec!["InterfaceInheritance", "Attribute"]
    );
    let inheritance = tree.nonterm_children(iface).next().unwrap();
    let list = tree.nonterm_children(inheritance).next().unwrap();
    assert_eq!(name(&tree, list), "ScopedNameList");
    let bases: Vec<_> = tree
        .nonterm_children(list)
        .map(|scoped| {
            assert_eq!(tree.children(scoped).len(), 1);
            tree.text(tree.children(scoped)[0]).to_string()
        })
        .collect();
    assert_eq!(bases, vec!["::core::Object", "events::EventTarget"]);
}

#[test]
fn argument_list_is_flattened() {
    let tree = parse(
        "interface Canvas {\n\
           static void draw(in unsigned long x, optional long long y, [TreatNullAs=EmptyString] DOMString label) raises (Error);\n\
         };\n",
    );
    let iface = tree.children(tree.root())[0];
    let op = tree.nonterm_children(iface).next().unwrap();
    assert_eq!(name(&tree, op), "Operation");
    assert_eq!(ident(&tree, op), "draw");
    assert_eq!(
        nonterms(&tree, op),
        vec!["Qualifiers", "ReturnType", "ArgumentList", "Raises"]
    );
    let args = tree
        .nonterm_children(op)
        .find(|&c| name(&tree, c) == "ArgumentList")
        .unwrap();
    let names: Vec<_> = tree
        .nonterm_children(args)
        .map(|arg| {
            assert_eq!(name(&tree, arg), "Argument");
            ident(&tree, arg).to_string()
        })
        .collect();
    assert_eq!(names, vec!["x", "y", "label"]);
}

#[test]
fn extended_attributes() {
    let tree = parse(
        "[Constructor(in long x, in float y), NoInterfaceObject, Prefix=::dom]\n\
         interface Point { };\n",
    );
    let root = tree.root();
    assert_eq!(nonterms(&tree, root), vec!["ExtendedAttributeList", "Interface"]);
    let list = tree.children(root)[0];
    assert_eq!(
        nonterms(&tree, list),
        vec!["ExtendedAttribute", "ExtendedAttribute", "ExtendedAttribute"]
    );
}

#[test]
fn constants_and_exceptions() {
    let tree = parse(
        "exception DOMException {\n\
           const unsigned short INDEX_SIZE_ERR = 1;\n\
           const double LIMIT = -Infinity;\n\
           unsigned short code;\n\
         };\n\
         typedef sequence<Point?> Points;\n\
         valuetype DOMString2 DOMString;\n",
    );
    let root = tree.root();
    assert_eq!(nonterms(&tree, root), vec!["Exception", "Typedef", "Valuetype"]);
    let exc = tree.children(root)[0];
    assert_eq!(
        nonterms(&tree, exc),
        vec!["Const", "Const", "ExceptionMember"]
    );
    let first = tree.nonterm_children(exc).next().unwrap();
    assert_eq!(ident(&tree, first), "INDEX_SIZE_ERR");
    let value = tree
        .nonterm_children(first)
        .find(|&c| name(&tree, c) == "ConstValue")
        .unwrap();
    let leaf = tree.find_token(value, INTEGER).unwrap();
    assert_eq!(tree.text(leaf), "1");
}

#[test]
fn stringifiers() {
    let tree = parse("interface A { stringifier; stringifier attribute DOMString s; };");
    let iface = tree.children(tree.root())[0];
    assert_eq!(nonterms(&tree, iface), vec!["Stringifier", "Stringifier"]);
}

#[test]
fn declaration_names_reach_the_sink() {
    let mut log = CommentLog::new();
    parse_with(
        "/** The node. */\n\
         interface Node {\n\
           /** Its name. */\n\
           attribute DOMString name;\n\
           void f(long a);\n\
         };\n",
        &mut log,
    );
    let events: Vec<_> = log
        .events
        .iter()
        .map(|e| match e {
            CommentEvent::Comment { text, line } => format!("{}: comment{}", line, text),
            CommentEvent::Identifier { name, line, .. } => format!("{}: {}", line, name),
        })
        .collect();
    assert_eq!(
        events,
        vec![
            "1: comment* The node. ",
            "2: Node",
            "3: comment* Its name. ",
            "4: name",
            "5: f",
            "5: a",
        ]
    );
    assert_eq!(log.finished, 1);
}

#[test]
fn chained_sources() {
    let tree = widl_syntax::parse(
        vec![
            Source::from_string("a.idl", "interface A {};"),
            Source::from_string("b.idl", "interface B {};"),
        ],
        (),
    )
    .unwrap();
    let names: Vec<_> = tree
        .nonterm_children(tree.root())
        .map(|c| ident(&tree, c).to_string())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn syntax_errors() {
    assert_eq!(
        parse_err("interface Foo {\n  attribute long;\n};"),
        "test.idl: 2: expected identifier, found `;`"
    );
    assert_eq!(
        parse_err("interface Foo {"),
        "test.idl: 1: expected `}`, found end of input"
    );
    assert_eq!(
        parse_err("interface Foo {};\n}"),
        "test.idl: 2: expected end of input, found `}`"
    );
    assert_eq!(parse_err("const long x = ;"), "test.idl: 1: unexpected token `;`");
}

#[test]
fn dump() {
    let tree = parse("typedef long Index;");
    let mut out = vec![];
    tree.dump(&webidl().unwrap().table, &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert_eq!(
        out,
        "Definitions\n\
         \x20 Typedef\n\
         \x20   `typedef`\n\
         \x20   Type\n\
         \x20     UnsignedIntegerType\n\
         \x20       IntegerType\n\
         \x20         `long`\n\
         \x20   identifier \"Index\"\n\
         \x20   `;`\n"
    );
}
