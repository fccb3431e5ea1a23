//! Library side of the `docsim` CLI.
//!
//! The binary entry point lives in `main.rs`; this crate exposes the argument
//! parser, command implementations and file ingestion so that `xtask` can
//! render man pages and completions from [`command()`].
//!
//! - [`Cli`] / [`Commands`] - clap definitions
//! - [`commands`] - one module per subcommand
//! - [`ingest`] - path to [`docsim_core::Document`] conversion (PDF, DOCX, text)
//! - `server` - MCP tools (feature `mcp`)

pub mod commands;
pub mod ingest;
pub mod observability;

#[cfg(feature = "mcp")]
pub mod server;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// When to colorize terminal output.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Follow terminal detection.
    #[default]
    Auto,
    /// Force colors on.
    Always,
    /// Force colors off.
    Never,
}

impl ColorChoice {
    /// Set the process-wide owo-colors override. Call once at startup.
    pub fn apply(self) {
        match self {
            Self::Auto => owo_colors::unset_override(),
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                Log filter (e.g., debug, docsim_core=trace)
    DOCSIM_LOG_PATH         Explicit JSONL log file path
    DOCSIM_LOG_DIR          Log directory (file: docsim.jsonl)
    DOCSIM_<KEY>            Override any config key; nest with __
                            (e.g., DOCSIM_COMPARE__MIN_MATCH_LENGTH=10)
";
/// Command-line interface definition for docsim.
#[derive(Parser)]
#[command(name = "docsim")]
#[command(about = "Pairwise document similarity and AI-text likelihood scoring", long_about = None)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print the bare version number and exit
    #[arg(long)]
    pub version_only: bool,

    /// Load this configuration file on top of discovered ones
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Change to DIR before doing anything else
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub chdir: Option<PathBuf>,

    /// Errors only; also hides progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Machine-readable JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Compare files pairwise and report similarity
    Compare(commands::compare::CompareArgs),

    /// Show two files with their shared regions emphasised
    Highlight(commands::highlight::HighlightArgs),

    /// Score a file for AI-generated writing style
    Detect(commands::detect::DetectArgs),

    /// Show package information and effective configuration
    Info(commands::info::InfoArgs),

    /// Start MCP (Model Context Protocol) server on stdio
    #[cfg(feature = "mcp")]
    Serve(commands::serve::ServeArgs),
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}
