//! The process-wide default logger.
//!
//! Until [`init`] or [`set_default`] runs, the default is a logger named
//! `default` writing colored text to stdout. [`crate::Factory::assemble`]
//! replaces it when the document names a default.

use crate::level::LogLevel;
use crate::logger::{Logger, Message};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

static DEFAULT: RwLock<Option<Arc<Logger>>> = RwLock::new(None);

/// Name of the logger created on first use when no default was set.
pub const DEFAULT_NAME: &str = "default";

/// Installs `logger` as the default unless one is already set. Returns the
/// logger that is the default afterwards.
pub fn init(logger: Arc<Logger>) -> Arc<Logger> {
    let mut slot = DEFAULT.write();
    slot.get_or_insert(logger).clone()
}

/// Replaces the default, returning the previous one if any.
pub fn set_default(logger: Arc<Logger>) -> Option<Arc<Logger>> {
    DEFAULT.write().replace(logger)
}

/// The current default, creating the stdout logger on first use.
#[must_use]
pub fn default_logger() -> Arc<Logger> {
    if let Some(logger) = DEFAULT.read().as_ref() {
        return logger.clone();
    }
    let mut slot = DEFAULT.write();
    slot.get_or_insert_with(|| {
        Arc::new(Logger::new(DEFAULT_NAME).expect("Default logger must build"))
    })
    .clone()
}

#[track_caller]
pub fn log(message: impl Into<Message>, level: &LogLevel) {
    default_logger().log(message, level);
}

#[track_caller]
pub fn log_with(message: impl Into<Message>, level: &LogLevel, meta: Value) {
    default_logger().log_with(message, level, meta);
}

#[track_caller]
pub fn fatal(message: impl Into<Message>) {
    default_logger().fatal(message);
}

#[track_caller]
pub fn error(message: impl Into<Message>) {
    default_logger().error(message);
}

#[track_caller]
pub fn warn(message: impl Into<Message>) {
    default_logger().warn(message);
}

#[track_caller]
pub fn info(message: impl Into<Message>) {
    default_logger().info(message);
}

#[track_caller]
pub fn debug(message: impl Into<Message>) {
    default_logger().debug(message);
}

#[track_caller]
pub fn fine(message: impl Into<Message>) {
    default_logger().fine(message);
}
