//! CLI argument definitions for face-relations.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "face-relations")]
#[command(version)]
#[command(about = "Spanish NIF/NIE/CIF validation and FACe relations lookup", long_about = None)]
#[command(
    after_help = "EXAMPLES:\n    face-relations validate 12345678Z ESA58818501\n    face-relations control X1234567\n    face-relations query --cif A58818501\n    face-relations query --oc L01281230 --format json"
)]
pub struct Cli {
    /// Suppress all non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log polling and request details to stderr (repeat for trace output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file to load on top of the global and project configs
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate one or more NIF/NIE/CIF identifiers
    ///
    /// Exits with status 1 when any identifier is invalid.
    Validate {
        /// Identifiers to check (an ES prefix is accepted)
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the expected check character for an identifier prefix
    Control {
        /// The first eight characters of an identifier (an ES prefix is accepted)
        prefix: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Query the FACe relations directory
    Query {
        /// Entity tax identifier (NIF/NIE/CIF)
        #[arg(long)]
        cif: Option<String>,
        /// Accounting office code
        #[arg(long)]
        oc: Option<String>,
        /// Managing body code
        #[arg(long)]
        og: Option<String>,
        /// Processing unit code
        #[arg(long)]
        ut: Option<String>,
        /// Extra filter (can be specified multiple times, format: key=value)
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
        /// Override the configured endpoint
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
        /// Give up after this many empty answers (default: poll until answered)
        #[arg(long, value_name = "N")]
        max_attempts: Option<usize>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show the effective configuration
    Config,
    /// Show version information (with -v, also commit and build date)
    Version,
    /// Generate shell completions
    Completion {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Generate man page
    #[command(hide = true)]
    Man {
        /// Output directory for the man page (defaults to current directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}
