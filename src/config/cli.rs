//! Command-line argument definitions for engine-info.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command-line interface for engine-info.
#[derive(Debug, Parser)]
#[command(name = "engine-info")]
#[command(
    author,
    version,
    about = "Report the active context and CPU capacity of the local container engine"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Engine program to invoke (defaults to `docker`).
    #[arg(long, global = true)]
    pub engine_command: Option<String>,

    /// Seconds each engine probe may run before it is reported as hung.
    #[arg(long, global = true)]
    pub probe_timeout_secs: Option<u64>,

    /// Emit debug logging to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Print the name of the active engine context.
    Context,

    /// Print the number of CPU cores the engine reports.
    Ncpu,

    /// Print both the context name and the CPU count.
    Report,
}
