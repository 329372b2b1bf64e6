//! Command-line interface for the `ocq` query tool.
//!
//! `ocq` parses ocean-colour record filter queries and shows how they are
//! read: the canonical text, the syntax tree, or the raw lexemes.

mod cli;

use std::process::ExitCode;

use clap::Parser;

use cli::{args::Cli, commands, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_level) {
        eprintln!("error: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    commands::run(&cli.command)
}
