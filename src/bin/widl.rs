// Copyright (c) 2016-2021 Fabian Schuiki

//! A parser for Web IDL interface definitions.

#[macro_use]
extern crate log;

use clap::{App, Arg, ArgMatches};
use std::{io::Write, str::FromStr};
use widl::errors::{Error, Result};
use widl::source::Source;
use widl::syntax::{grammar, CommentEvent, CommentLog, Lexer, Parser};
use widl::{Session, Verbosity};

fn main() {
    let matches = App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("A parser for Web IDL interface definitions.")
        .arg(
            Arg::with_name("verbosity")
                .short("v")
                .multiple(true)
                .help("Increase message verbosity"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .help("Silence all output"),
        )
        .arg(
            Arg::with_name("timestamp")
                .short("t")
                .help("prepend log lines with a timestamp")
                .takes_value(true)
                .possible_values(&["none", "sec", "ms", "ns"]),
        )
        .arg(
            Arg::with_name("verbosity-opts")
                .short("V")
                .help("Sets verbosity settings")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .possible_values(&["comments", "names"]),
        )
        .arg(
            Arg::with_name("chain")
                .short("c")
                .long("chain")
                .help("Parse all inputs as one document"),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("The input files to parse; `-` reads standard input")
                .multiple(true)
                .required(true),
        )
        .get_matches();

    // Configure the logger.
    let verbose = matches.occurrences_of("verbosity") as usize + 1;
    let quiet = matches.is_present("quiet");
    let ts = matches
        .value_of("timestamp")
        .map(|v| {
            stderrlog::Timestamp::from_str(v).unwrap_or_else(|_| {
                clap::Error {
                    message: "invalid value for 'timestamp'".into(),
                    kind: clap::ErrorKind::InvalidValue,
                    info: None,
                }
                .exit()
            })
        })
        .unwrap_or(stderrlog::Timestamp::Off);

    if let Err(e) = stderrlog::new()
        .quiet(quiet)
        .verbosity(verbose)
        .timestamp(ts)
        .init()
    {
        eprintln!("warning: cannot initialize logging: {}", e);
    }

    // Configure the session.
    let mut session = Session::new();
    session.opts.chain_inputs = matches.is_present("chain");
    for v in matches
        .values_of("verbosity-opts")
        .into_iter()
        .flat_map(|v| v)
    {
        session.opts.verbosity |= match v {
            "comments" => Verbosity::COMMENTS,
            "names" => Verbosity::NAMES,
            _ => unreachable!(),
        };
    }

    // Invoke the parser.
    if let Err(e) = parse(&session, &matches) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn parse(sess: &Session, matches: &ArgMatches) -> Result<()> {
    let grammar = grammar::webidl()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let write_err = |e| Error::io("<stdout>", e);

    if sess.opts.verbosity.contains(Verbosity::NAMES) {
        for (offset, name) in widl::pargen::unpack_names(&grammar.table.packed_names()) {
            writeln!(out, "{:#06x} {}", widl::pargen::NT_BIAS + offset, name).map_err(write_err)?;
        }
    }

    // Either parse every input on its own, or all of them as one stream.
    let inputs: Vec<&str> = matches.values_of("INPUT").into_iter().flatten().collect();
    let groups: Vec<Vec<&str>> = if sess.opts.chain_inputs {
        vec![inputs]
    } else {
        inputs.into_iter().map(|input| vec![input]).collect()
    };

    for group in groups {
        info!("Parsing {}", group.join(", "));
        let sources = group
            .iter()
            .map(|path| Source::open(path))
            .collect::<Result<Vec<_>>>()?;
        let mut log = CommentLog::new();
        let lexer = Lexer::new(sources);
        let tree = Parser::new(&grammar.table, &grammar.roles, lexer, &mut log).parse()?;
        tree.dump(&grammar.table, &mut out).map_err(write_err)?;

        if sess.opts.verbosity.contains(Verbosity::COMMENTS) {
            for event in &log.events {
                let written = match event {
                    CommentEvent::Comment { text, line } => {
                        writeln!(out, "comment at line {}: {}", line, text.trim())
                    }
                    CommentEvent::Identifier { name, line, .. } => {
                        writeln!(out, "name at line {}: {}", line, name)
                    }
                };
                written.map_err(write_err)?;
            }
        }
    }
    Ok(())
}
