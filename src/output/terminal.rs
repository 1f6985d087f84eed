//! Terminal output: the default destination of every logger.

use crate::sink::{Metadata, Payload, Sink};
use parking_lot::Mutex;
use std::io::{self, Write};

enum Stream {
    Stdout,
    Stderr,
    Writer(Mutex<Box<dyn Write + Send>>),
}

/// Writes the styled channel to a stream, or the raw channel when colors are
/// disabled (piped output, CI logs).
pub struct TerminalOutput {
    stream: Stream,
    colors: bool,
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalOutput {
    /// Colored output on stdout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stream: Stream::Stdout,
            colors: true,
        }
    }

    #[must_use]
    pub const fn stderr() -> Self {
        Self {
            stream: Stream::Stderr,
            colors: true,
        }
    }

    /// Any writer, e.g. a buffer under test.
    #[must_use]
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            stream: Stream::Writer(Mutex::new(Box::new(writer))),
            colors: true,
        }
    }

    #[must_use]
    pub const fn colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }
}

impl Sink for TerminalOutput {
    fn uses_pretty(&self) -> bool {
        self.colors
    }

    fn uses_raw(&self) -> bool {
        !self.colors
    }

    fn write(
        &self,
        pretty: Option<&Payload>,
        raw: Option<&Payload>,
        _meta: &Metadata,
    ) -> Result<(), crate::Error> {
        let Some(data) = (if self.colors { pretty } else { raw }) else {
            return Ok(());
        };

        match &self.stream {
            Stream::Stdout => write!(io::stdout(), "{data}")?,
            Stream::Stderr => write!(io::stderr(), "{data}")?,
            Stream::Writer(w) => {
                let mut w = w.lock();
                write!(w, "{data}")?;
                w.flush()?;
            }
        }
        Ok(())
    }
}
