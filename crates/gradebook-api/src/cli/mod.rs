//! CLI command definitions and dispatch for the `gradebook` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod discover;
pub mod seed;
pub mod serve;
pub mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Student grade management: terminal client and grade service.
#[derive(Parser)]
#[command(name = "gradebook", version, about, long_about = None)]
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

    /// Config file (default: <data dir>/config.toml).
    #[arg(long, global = true, env = "GRADEBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the grade service and register it with the discovery registry.
    Serve {
        /// Host to bind to (overrides service.host).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides service.port).
        #[arg(short, long)]
        port: Option<u16>,

        /// Discovery registry URL (overrides discovery.endpoint).
        #[arg(long)]
        registry: Option<String>,

        /// Service name to register under (overrides service.name).
        #[arg(long)]
        name: Option<String>,
    },

    /// Open the interactive terminal client.
    Shell,

    /// List healthy instances registered under a service name.
    Discover {
        /// Service name (default: service.name from the config).
        name: Option<String>,
    },

    /// Load the demo data set into an empty database.
    Seed {
        /// Password given to every demo account.
        #[arg(long, default_value = "pass123")]
        password: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
