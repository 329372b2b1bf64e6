//! Command implementations and dispatch.

pub mod check;
pub mod parse;
pub mod tokens;

use std::process::ExitCode;

use super::args::Commands;

/// Dispatches to the selected subcommand.
pub fn run(command: &Commands) -> ExitCode {
    match command {
        Commands::Parse(cmd) => parse::run(cmd),
        Commands::Tokens(cmd) => tokens::run(cmd),
        Commands::Check(cmd) => check::run(cmd),
    }
}
