//! CLI module for loggamus.
//!
//! This module provides the command-line interface using Clap.

pub mod commands;
pub mod util;

use clap::{Parser, Subcommand};

/// loggamus - Check pipeline documents and log through them.
#[derive(Parser)]
#[command(
    name = "loggamus",
    version,
    about = "Check pipeline documents and log through them"
)]
pub struct Cli {
    /// Report assembly progress on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Assemble a document and print what got registered.
    Check {
        /// Pipeline document (.json or .toml)
        config: String,
    },
    /// Log one message through an assembled document.
    Log {
        /// Pipeline document (.json or .toml)
        #[arg(short, long)]
        config: String,
        /// Logger path; the document's default when omitted
        #[arg(short, long)]
        logger: Option<String>,
        /// Level name (FINE, DEBUG, INFO, WARN, ERROR, FATAL or a registered one)
        level: String,
        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
    },
}

pub use commands::{cmd_check, cmd_log};
pub use util::{assemble, resolve_level};
