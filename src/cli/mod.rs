//! CLI module for nodekind
//!
//! ## Commands
//!
//! - `generate [TABLE] --out DIR` - Generate Rust artifacts and a JSON manifest
//! - `list [TABLE]` - Print every entry with its opcode and inclusion decision
//! - `check [TABLE]` - Validate a table against a gate configuration
//!
//! Every command accepts `--gate name=value` (repeatable), `--gates FILE` and `--soft-fallback include|exclude`.
//! Without a `TABLE` argument the bundled C2 node table is used.
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

use clap::{Args, Parser, Subcommand, ValueEnum};
use nodekind_core::SoftFallback;

use crate::config::Output;

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

const VERSION: &str = crate::version::NODEKIND_VERSION;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Generate node-kind artifacts from a declaration table
#[derive(Parser, Debug)]
#[command(name = "nodekind")]
#[command(version = VERSION)]
#[command(about = "Generate node-kind artifacts from a declaration table", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Table selection and gate resolution, shared by every command.
#[derive(Args, Debug, Clone)]
pub struct TableArgs {
    /// Declaration table (default: bundled C2 node table)
    #[arg(value_name = "TABLE")]
    pub table: Option<PathBuf>,

    /// Set a gate (repeatable; overrides --gates)
    #[arg(long = "gate", value_name = "NAME=VALUE")]
    pub gates: Vec<String>,

    /// JSON object of gate values
    #[arg(long = "gates", value_name = "FILE")]
    pub gates_file: Option<PathBuf>,

    /// What soft-gated entries do when their capability is off
    #[arg(long, value_enum, default_value_t = SoftFallbackArg::Exclude)]
    pub soft_fallback: SoftFallbackArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftFallbackArg {
    Include,
    Exclude,
}

impl From<SoftFallbackArg> for SoftFallback {
    fn from(arg: SoftFallbackArg) -> Self {
        match arg {
            SoftFallbackArg::Include => SoftFallback::Include,
            SoftFallbackArg::Exclude => SoftFallback::Exclude,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputArg {
    Opcodes,
    Names,
    Stubs,
    Visitor,
    Manifest,
}

impl From<OutputArg> for Output {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Opcodes => Output::Opcodes,
            OutputArg::Names => Output::Names,
            OutputArg::Stubs => Output::Stubs,
            OutputArg::Visitor => Output::Visitor,
            OutputArg::Manifest => Output::Manifest,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate Rust artifacts and a JSON manifest
    Generate {
        #[command(flatten)]
        table: TableArgs,
        /// Output directory
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
        /// Keep gated-out entries as reserved slots (ids equal declaration positions)
        #[arg(long)]
        reserve_slots: bool,
        /// Only generate these outputs (comma-separated)
        #[arg(long, value_enum, value_delimiter = ',')]
        only: Vec<OutputArg>,
        /// Check that DIR is up to date without writing
        #[arg(long)]
        check: bool,
        /// Show a diff of out-of-date files (implies --check)
        #[arg(long)]
        diff: bool,
    },

    /// Print every entry with its opcode and inclusion decision
    List {
        #[command(flatten)]
        table: TableArgs,
    },

    /// Validate a table against a gate configuration, including everything `generate` would reject
    Check {
        #[command(flatten)]
        table: TableArgs,
    },
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
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Generate {
            table,
            out,
            reserve_slots,
            only,
            check,
            diff,
        } => {
            let outputs: Vec<Output> = only.into_iter().map(Output::from).collect();
            let options = commands::GenerateOptions {
                out,
                reserve_slots,
                outputs,
                check: check || diff,
                diff,
            };
            commands::generate(&table, &options)
        }
        Command::List { table } => commands::list(&table),
        Command::Check { table } => commands::check(&table),
    }
}

// ============================================================================
// Tests
// ============================================================================
