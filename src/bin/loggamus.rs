//! `loggamus` binary: validate a pipeline document, or log through one.
//!
//! Usage:
//!   loggamus check <config>                                  Print the manifest
//!   loggamus log -c <config> [-l <logger>] <level> <msg>...  Log a message

use clap::Parser;
use loggamus::LogLevel;
use loggamus::cli::{Cli, Command, cmd_check, cmd_log};
use loggamus::internal;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Must be ready before assembly so factory diagnostics are captured
    internal::init(if cli.verbose {
        LogLevel::DEBUG
    } else {
        LogLevel::WARN
    });

    match cli.command {
        Command::Check { config } => cmd_check(&config),
        Command::Log {
            config,
            logger,
            level,
            message,
        } => cmd_log(&config, logger.as_deref(), &level, &message),
    }
}
