//! Loggamus's own diagnostic logger, used to report assembly progress and
//! sink write failures through the same pipeline it serves.
//!
//! Uses `OnceLock` so the logger is initialized exactly once, even if several
//! entry points (CLI, embedders, tests) race to call `init`.

use crate::level::LogLevel;
use crate::logger::Logger;
use crate::output::TerminalOutput;
use std::sync::{Arc, OnceLock};

static INTERNAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Name the internal logger reports under.
pub const NAME: &str = "loggamus";

/// Starts reporting at `level` and above on stderr. Only the first call takes
/// effect; later calls are no-ops.
pub fn init(level: LogLevel) {
    if INTERNAL_LOGGER.get().is_some() {
        return;
    }
    if let Ok(logger) = build_internal_logger(level.clone())
        && INTERNAL_LOGGER.set(logger).is_ok()
    {
        debug("INTERNAL", &format!("Internal logger ready at {level}"));
    }
}

fn build_internal_logger(level: LogLevel) -> Result<Logger, crate::Error> {
    let colors = std::env::var_os("NO_COLOR").is_none();
    Logger::builder(NAME)
        .sink(Arc::new(TerminalOutput::stderr().colors(colors)))
        .min_level(level)
        .min_trace(LogLevel::MAX)
        .silent_failures()
        .build()
}

/// Pre-init calls silently vanish rather than failing, so sinks and the
/// factory can report unconditionally.
fn log(level: &LogLevel, scope: &str, msg: &str) {
    if let Some(logger) = INTERNAL_LOGGER.get() {
        logger.log(format!("[{scope}] {msg}"), level);
    }
}

pub fn trace(scope: &str, msg: &str) {
    log(&LogLevel::FINE, scope, msg);
}

pub fn debug(scope: &str, msg: &str) {
    log(&LogLevel::DEBUG, scope, msg);
}

pub fn info(scope: &str, msg: &str) {
    log(&LogLevel::INFO, scope, msg);
}

pub fn warn(scope: &str, msg: &str) {
    log(&LogLevel::WARN, scope, msg);
}

/// Failed writes, broken configuration and other errors the caller cannot
/// see because the logging call itself returns nothing.
pub fn error(scope: &str, msg: &str) {
    log(&LogLevel::ERROR, scope, msg);
}
