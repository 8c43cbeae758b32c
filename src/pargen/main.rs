//! A grammar compiler for the widl parser.

#[macro_use]
extern crate log;

use anyhow::{anyhow, Context as _, Result};
use clap::{App, Arg};
use std::io::Write;

fn main() -> Result<()> {
    let matches = App::new("widl-pargen")
        .version(clap::crate_version!())
        .author(clap::crate_authors!())
        .about("Compiles an LL(1) grammar into a widl parser table.")
        .arg(
            Arg::with_name("grammar")
                .takes_value(true)
                .required(true)
                .number_of_values(1),
        )
        .arg(
            Arg::with_name("header")
                .short("H")
                .long("header")
                .help("Emit the nonterminal offsets and name table instead of the table body."),
        )
        .get_matches();

    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .init();

    let path = matches.value_of("grammar").unwrap_or_default();
    let input = std::fs::read_to_string(path).with_context(|| format!("cannot read `{}`", path))?;
    let table = widl_pargen::compile(&input).map_err(|e| anyhow!("{}: {}", path, e))?;
    info!(
        "Grammar `{}` compiled into {} entries",
        path,
        table.code().len()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if matches.is_present("header") {
        table.write_header(&mut out)?;
    } else {
        table.write_body(&mut out)?;
    }
    out.flush()?;
    Ok(())
}
