//! Check command implementation.

use crate::cli::util::assemble;
use crate::internal;
use std::process::ExitCode;

/// Handles `loggamus check <config>`: prints the registry manifest as JSON.
#[must_use]
pub fn cmd_check(config: &str) -> ExitCode {
    let registries = match assemble(config) {
        Ok(r) => r,
        Err(e) => {
            internal::error("CHECK", &format!("{config}: {e}"));
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&registries.manifest()) {
        Ok(manifest) => {
            println!("{manifest}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            internal::error("CHECK", &format!("Cannot render manifest: {e}"));
            ExitCode::FAILURE
        }
    }
}
