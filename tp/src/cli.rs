//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tempo - time-ordered task scheduler
#[derive(Parser)]
#[command(
    name = "tempo",
    about = "Run shell jobs on intervals from a single time-ordered loop",
    version,
    after_help = "Logs are written to: ~/.local/share/tempo/logs/tempo.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Load the config and run its jobs until done or stopped
    Run,

    /// Parse and validate a config file without running anything
    Validate {
        /// Config file to check
        file: PathBuf,
    },
}
