//! CLI command definitions for the `mnemond` binary.
//!
//! Uses clap derive macros for argument parsing.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// User-memory and profile service.
#[derive(Parser)]
#[command(name = "mnemond", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (overrides config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind (overrides config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
