use super::{Logger, State};
use crate::Error;
use crate::fmt::{Style, StyleMap};
use crate::level::LogLevel;
use crate::output::TerminalOutput;
use crate::printer::Printer;
use crate::sink::SharedSink;
use crate::stack::{BacktraceProvider, StackProvider};
use parking_lot::Mutex;
use std::sync::Arc;

/// Configures a [`Logger`]. Obtained from [`Logger::builder`] with defaults,
/// or from [`Logger::child`] pre-filled with the parent's current settings.
pub struct LoggerBuilder {
    parent: Option<String>,
    name: String,
    sink: Option<SharedSink>,
    min_level: LogLevel,
    min_trace: LogLevel,
    trace_depth: usize,
    error_depth: usize,
    styles: StyleMap,
    stack: Arc<dyn StackProvider>,
    report_failures: bool,
}

impl LoggerBuilder {
    pub(super) fn new(name: String) -> Self {
        Self {
            parent: None,
            name,
            sink: None,
            min_level: LogLevel::FINE,
            min_trace: LogLevel::ERROR,
            trace_depth: 1,
            error_depth: 1,
            styles: StyleMap::default(),
            stack: Arc::new(BacktraceProvider),
            report_failures: true,
        }
    }

    pub(super) fn child_of(parent: &Logger, name: String) -> Self {
        let state = parent.state.lock();
        Self {
            parent: Some(parent.path.clone()),
            name,
            sink: Some(state.printer.sink().clone()),
            min_level: state.min_level.clone(),
            min_trace: state.min_trace.clone(),
            trace_depth: state.trace_depth,
            error_depth: state.error_depth,
            styles: state.styles.clone(),
            stack: parent.stack.clone(),
            report_failures: parent.report_failures,
        }
    }

    /// Root of the sink graph. Defaults to colored stdout.
    #[must_use]
    pub fn sink(mut self, sink: SharedSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Calls below this level are dropped before anything is printed.
    #[must_use]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Calls at or above this level carry a call-site trace.
    #[must_use]
    pub fn min_trace(mut self, level: LogLevel) -> Self {
        self.min_trace = level;
        self
    }

    #[must_use]
    pub const fn trace_depth(mut self, depth: usize) -> Self {
        self.trace_depth = depth;
        self
    }

    #[must_use]
    pub const fn error_depth(mut self, depth: usize) -> Self {
        self.error_depth = depth;
        self
    }

    /// Merged into the current map; see [`StyleMap::apply`].
    #[must_use]
    pub fn styles<I, K>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, Style)>,
        K: Into<String>,
    {
        self.styles.apply(overrides);
        self
    }

    #[must_use]
    pub fn stack_provider(mut self, provider: Arc<dyn StackProvider>) -> Self {
        self.stack = provider;
        self
    }

    /// The internal logger must not report its own write failures to itself.
    #[must_use]
    pub(crate) const fn silent_failures(mut self) -> Self {
        self.report_failures = false;
        self
    }

    /// # Errors
    /// [`Error::EmptyName`] for an empty name, [`Error::NoChannels`] when the
    /// sink consumes neither channel.
    pub fn build(self) -> Result<Logger, Error> {
        if self.name.is_empty() {
            return Err(Error::EmptyName(if self.parent.is_some() {
                "child logger"
            } else {
                "logger"
            }));
        }
        let path = match self.parent {
            Some(parent) => format!("{parent}/{}", self.name),
            None => self.name,
        };
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TerminalOutput::new()));
        let printer = Printer::new(sink)?;

        Ok(Logger {
            path,
            stack: self.stack,
            report_failures: self.report_failures,
            state: Mutex::new(State {
                min_level: self.min_level,
                min_trace: self.min_trace,
                trace_depth: self.trace_depth,
                error_depth: self.error_depth,
                styles: self.styles,
                printer,
                trace_next: None,
            }),
        })
    }
}
