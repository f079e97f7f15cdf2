//! CLI module for the golite compiler
//!
//! ## Commands
//!
//! - `build <files>...` - Compile files and every package they import
//! - `<files>...` - Same as `build` with default settings
//! - `--lex <file>` / `--parse <file>` - Debug dumps of tokens / declarations
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::config::CompilerConfig;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Concurrent compiler frontend for golite sources
#[derive(Parser, Debug)]
#[command(name = "golite")]
#[command(version = VERSION)]
#[command(about = "Concurrent compiler frontend for golite sources", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Files to compile (default action when no subcommand given)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    // Debug/development flags
    /// Tokenize only (debug)
    #[arg(long = "lex", value_name = "FILE", conflicts_with_all = ["files", "parse_file"])]
    pub lex_file: Option<PathBuf>,

    /// Parse only (debug)
    #[arg(long = "parse", value_name = "FILE", conflicts_with = "files")]
    pub parse_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile files and every package they import
    Build(BuildArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct BuildArgs {
    /// Source files to compile
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Package search root, searched before GOLITE_PATH (repeatable)
    #[arg(short = 'I', value_name = "DIR")]
    pub include: Vec<PathBuf>,

    /// Keep compiling after the first error
    #[arg(short = 'k', long)]
    pub keep_going: bool,

    /// Slots per reply mailbox and loop inbox
    #[arg(long, value_name = "N", value_parser = parse_depth)]
    pub mailbox_depth: Option<usize>,
}

impl BuildArgs {
    /// Flags layered over `base`: `-I` roots first, in the order given.
    pub fn apply(&self, base: CompilerConfig) -> CompilerConfig {
        let keep_going = self.keep_going || base.keep_going;
        let mut config = base.with_keep_going(keep_going);
        for dir in self.include.iter().rev() {
            config = config.with_search_path_first(dir.clone());
        }
        if let Some(depth) = self.mailbox_depth {
            config = config.with_mailbox_depth(depth);
        }
        config
    }
}

fn parse_depth(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("expected a positive integer, found '{raw}'")),
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    // Handle debug flags first
    if let Some(file) = cli.lex_file {
        return commands::lex_file(&file.to_string_lossy());
    }
    if let Some(file) = cli.parse_file {
        return commands::parse_file(&file.to_string_lossy());
    }

    match cli.command {
        Some(Command::Build(args)) => commands::build_files(&args),
        None if !cli.files.is_empty() => {
            let args = BuildArgs {
                files: cli.files,
                ..BuildArgs::default()
            };
            commands::build_files(&args)
        }
        None => {
            // No command and no files - show help
            let _ = Cli::command().print_help();
            Err(CliError::new("", ExitCode::FAILURE))
        }
    }
}
