use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored
    Terminal,
    /// Machine-readable report array
    Json,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => Self::Terminal,
            OutputFormat::Json => Self::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "modlint")]
#[command(about = "Static compliance linter for packaged addon modules", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check one or more module trees for compliance defects
    Check {
        /// Module root directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Accepted platform version, e.g. 14.0 (overrides the config file)
        #[arg(long = "accepted-version", env = "MODLINT_ACCEPTED_VERSION")]
        accepted_version: Option<String>,

        /// Configuration file (default: discover .modlint.toml upward)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run checks and modules sequentially
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Increase verbosity level (can be repeated: -v, -vv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },
}
