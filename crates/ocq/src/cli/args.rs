//! Clap argument definitions for the `ocq` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "ocq")]
#[command(about = "Ocean-colour query tool - parse and inspect record filter queries")]
pub struct Cli {
    /// Diagnostic log level, written to stderr
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Verbosity of diagnostic logging.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational messages.
    Info,
    /// Parser decisions.
    Debug,
    /// Every lexeme.
    Trace,
}

/// Shared output mode flags.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `ocq parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Queries to parse
    #[arg(required = true, allow_hyphen_values = true)]
    pub queries: Vec<String>,

    /// Print the syntax tree, one node per line
    #[arg(long, conflicts_with = "json")]
    pub tree: bool,

    /// Output mode flags.
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for `ocq tokens`.
#[derive(Args, Debug, Clone)]
pub struct TokensCommand {
    /// Query to tokenize
    #[arg(allow_hyphen_values = true)]
    pub query: String,

    /// Output mode flags.
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for `ocq check`.
#[derive(Args, Debug, Clone)]
pub struct CheckCommand {
    /// Queries to validate
    #[arg(required = true, allow_hyphen_values = true)]
    pub queries: Vec<String>,
}

/// Supported `ocq` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse queries and print their canonical form
    Parse(ParseCommand),

    /// Show the lexemes the tokenizer produces for a query
    Tokens(TokensCommand),

    /// Validate queries, reporting the first syntax error
    Check(CheckCommand),
}
