//! The per-call logging state machine.
//!
//! Each call runs the same steps: the level gate, the trace decision (a
//! one-shot override wins over `min_trace`), the styled message, the optional
//! call-site and failure-origin traces, and a single flush into the sink.
//! Everything mutable sits behind one mutex, so concurrent calls on the same
//! logger serialize and each output sees them in call order.

mod builder;
mod message;
mod trace;

pub use builder::LoggerBuilder;
pub use message::{Failure, Message};

use crate::Error;
use crate::fmt::{Style, StyleMap};
use crate::internal;
use crate::level::LogLevel;
use crate::printer::Printer;
use crate::sink::{Metadata, SharedSink};
use crate::stack::{StackFrame, StackProvider};
use parking_lot::Mutex;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

pub struct Logger {
    path: String,
    stack: Arc<dyn StackProvider>,
    report_failures: bool,
    state: Mutex<State>,
}

struct State {
    min_level: LogLevel,
    min_trace: LogLevel,
    trace_depth: usize,
    error_depth: usize,
    styles: StyleMap,
    printer: Printer,
    trace_next: Option<bool>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Logger")
            .field("path", &self.path)
            .field("min_level", &state.min_level)
            .field("min_trace", &state.min_trace)
            .field("trace_depth", &state.trace_depth)
            .field("error_depth", &state.error_depth)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// A builder with the defaults: FINE and up, traces from ERROR, one
    /// frame deep, colored stdout.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name.into())
    }

    /// Shorthand for `Logger::builder(name).build()`.
    ///
    /// # Errors
    /// [`Error::EmptyName`] when `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        Self::builder(name).build()
    }

    /// A builder for `path/name`, every setting copied from this logger as it
    /// is now. The child is independent once built.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::child_of(self, name.into())
    }

    /// Full path, `parent/child` for children.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn min_level(&self) -> LogLevel {
        self.state.lock().min_level.clone()
    }

    #[must_use]
    pub fn min_trace(&self) -> LogLevel {
        self.state.lock().min_trace.clone()
    }

    #[must_use]
    pub fn trace_depth(&self) -> usize {
        self.state.lock().trace_depth
    }

    #[must_use]
    pub fn error_depth(&self) -> usize {
        self.state.lock().error_depth
    }

    #[must_use]
    pub fn styles(&self) -> StyleMap {
        self.state.lock().styles.clone()
    }

    #[must_use]
    pub fn sink(&self) -> SharedSink {
        self.state.lock().printer.sink().clone()
    }

    pub fn set_min_level(&self, level: LogLevel) -> &Self {
        self.state.lock().min_level = level;
        self
    }

    pub fn set_min_trace(&self, level: LogLevel) -> &Self {
        self.state.lock().min_trace = level;
        self
    }

    pub fn set_trace_depth(&self, depth: usize) -> &Self {
        self.state.lock().trace_depth = depth;
        self
    }

    pub fn set_error_depth(&self, depth: usize) -> &Self {
        self.state.lock().error_depth = depth;
        self
    }

    /// Rebinds the logger, replacing its printer.
    ///
    /// # Errors
    /// [`Error::NoChannels`] when the sink consumes neither channel; the old
    /// sink stays bound.
    pub fn set_sink(&self, sink: SharedSink) -> Result<&Self, Error> {
        let printer = Printer::new(sink)?;
        self.state.lock().printer = printer;
        Ok(self)
    }

    /// Merges style overrides; see [`StyleMap::apply`].
    pub fn apply_styles<I, K>(&self, overrides: I) -> &Self
    where
        I: IntoIterator<Item = (K, Style)>,
        K: Into<String>,
    {
        self.state.lock().styles.apply(overrides);
        self
    }

    /// Overrides the trace decision for the next call that passes the level
    /// gate, then reverts to `min_trace`.
    pub fn force_stack_trace(&self, trace: bool) -> &Self {
        self.state.lock().trace_next = Some(trace);
        self
    }

    #[track_caller]
    pub fn log(&self, message: impl Into<Message>, level: &LogLevel) {
        self.dispatch(message.into(), level, None, Location::caller());
    }

    /// Like [`Logger::log`], attaching `meta` to the record's `metadata`
    /// field. It is never printed.
    #[track_caller]
    pub fn log_with(&self, message: impl Into<Message>, level: &LogLevel, meta: Value) {
        self.dispatch(message.into(), level, Some(meta), Location::caller());
    }

    #[track_caller]
    pub fn fatal(&self, message: impl Into<Message>) {
        self.dispatch(message.into(), &LogLevel::FATAL, None, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<Message>) {
        self.dispatch(message.into(), &LogLevel::ERROR, None, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<Message>) {
        self.dispatch(message.into(), &LogLevel::WARN, None, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<Message>) {
        self.dispatch(message.into(), &LogLevel::INFO, None, Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<Message>) {
        self.dispatch(message.into(), &LogLevel::DEBUG, None, Location::caller());
    }

    #[track_caller]
    pub fn fine(&self, message: impl Into<Message>) {
        self.dispatch(message.into(), &LogLevel::FINE, None, Location::caller());
    }

    fn dispatch(
        &self,
        message: Message,
        level: &LogLevel,
        user: Option<Value>,
        location: &Location<'_>,
    ) {
        let Some(_entered) = Reentry::enter(self) else {
            if self.report_failures {
                internal::warn(
                    "LOGGER",
                    &format!("{}: dropped a message logged from inside its own sink", self.path),
                );
            }
            return;
        };
        let mut guard = self.state.lock();
        if *level < guard.min_level {
            return;
        }

        let forced = guard.trace_next.take();
        let failure = match &message {
            Message::Failure(f) => Some(f),
            Message::Plain(_) => None,
        };
        let do_trace = failure.is_some() || forced.unwrap_or(*level >= guard.min_trace);

        let state = &mut *guard;
        let printer = &mut state.printer;
        let styles = &state.styles;

        if do_trace {
            printer.endl(1);
        }
        printer.apply(styles.get(level.name())).write(message.text());

        let mut meta = Metadata::new(&self.path, level);
        if do_trace {
            let mut frames: Vec<StackFrame> = self
                .stack
                .capture(0)
                .take(state.trace_depth.max(1))
                .collect();
            fill_location(&mut frames, location);
            printer.endl(1);
            trace::render(
                printer,
                styles,
                frames.iter().take(state.trace_depth),
                trace::LOGGED,
            );
            meta.logged_at = Some(trace::call_site(frames.first()));
        }
        if let Some(failure) = failure {
            trace::render(
                printer,
                styles,
                failure.frames().iter().take(state.error_depth),
                trace::THROWN,
            );
            meta.error_at = Some(trace::call_site(failure.frames().first()));
        }
        meta.metadata = user;

        let result = printer.flush(1, &meta);
        drop(guard);
        if let Err(e) = result
            && self.report_failures
        {
            internal::error("LOGGER", &format!("{}: sink write failed: {e}", self.path));
        }
    }
}

thread_local! {
    static ACTIVE: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks a logger as dispatching on this thread. A sink that logs through the
/// logger currently writing to it would otherwise wait on its own state lock.
struct Reentry(usize);

impl Reentry {
    fn enter(logger: &Logger) -> Option<Self> {
        let id = std::ptr::from_ref(logger) as usize;
        ACTIVE.with_borrow_mut(|active| {
            if active.contains(&id) {
                None
            } else {
                active.push(id);
                Some(Self(id))
            }
        })
    }
}

impl Drop for Reentry {
    fn drop(&mut self) {
        ACTIVE.with_borrow_mut(|active| {
            if let Some(i) = active.iter().rposition(|&id| id == self.0) {
                active.remove(i);
            }
        });
    }
}

/// Gives frame 0 the caller's location when the native stack could not. A
/// named frame keeps its own (possibly missing) source.
fn fill_location(frames: &mut Vec<StackFrame>, location: &Location<'_>) {
    match frames.first_mut() {
        None => frames.push(StackFrame::from_location(location)),
        Some(first)
            if first.function_name.is_none()
                && first.file_path.is_none()
                && first.line_number.is_none() =>
        {
            first.file_path = Some(location.file().to_string());
            first.line_number = Some(location.line());
        }
        Some(_) => {}
    }
}
