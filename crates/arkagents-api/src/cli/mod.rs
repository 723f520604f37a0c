//! CLI command definitions for the `arkagents` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod status;

use clap::{Parser, Subcommand};

/// Run and inspect the ArkAgents chat service.
#[derive(Parser)]
#[command(name = "arkagents", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Address to bind. Defaults to the configured host.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on. Defaults to the configured port.
        #[arg(long, short)]
        port: Option<u16>,

        /// Keep agents and messages in memory instead of SQLite.
        #[arg(long)]
        in_memory: bool,
    },

    /// Show agent and message counts and provider configuration.
    Status,
}

impl Cli {
    /// Default log filter for the chosen verbosity, used when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn,arkagents=info",
            1 => "info,arkagents=debug",
            _ => "trace",
        }
    }
}
