//! Log command implementation.

use crate::cli::util::{assemble, resolve_level};
use crate::global;
use crate::internal;
use std::process::ExitCode;

/// Handles `loggamus log --config <f> [--logger <path>] <level> <message>...`.
///
/// Without `--logger`, the document's default is used, falling back to the
/// process default (stdout).
#[must_use]
pub fn cmd_log(config: &str, logger: Option<&str>, level: &str, message: &[String]) -> ExitCode {
    let registries = match assemble(config) {
        Ok(r) => r,
        Err(e) => {
            internal::error("LOG", &format!("{config}: {e}"));
            return ExitCode::FAILURE;
        }
    };

    let level = match resolve_level(&registries, level) {
        Ok(l) => l,
        Err(e) => {
            internal::error("LOG", &e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let target = match logger {
        Some(path) => {
            let Some(found) = registries.loggers.get_object(path) else {
                internal::error("LOG", &format!("No logger named \"{path}\" in {config}"));
                return ExitCode::FAILURE;
            };
            found
        }
        None => registries
            .default_logger()
            .unwrap_or_else(global::default_logger),
    };

    target.log(message.join(" "), &level);
    ExitCode::SUCCESS
}
