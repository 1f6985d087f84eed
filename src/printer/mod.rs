//! Builds the text of a single log call and hands it to a sink.
//!
//! A [`Printer`] is bound to one sink for its whole life. Which channels it
//! keeps is decided once, from the sink's flags, so a raw-only file pipeline
//! never pays for escape codes and a terminal never pays for the raw copy.

mod buffer;

pub use buffer::Buffer;

use crate::Error;
use crate::fmt::{Color, Modifier, Style};
use crate::sink::{Metadata, Payload, SharedSink};

pub struct Printer {
    sink: SharedSink,
    buffer: Buffer,
}

impl Printer {
    /// # Errors
    /// [`Error::NoChannels`] when `sink` consumes neither channel.
    pub fn new(sink: SharedSink) -> Result<Self, Error> {
        let buffer = Buffer::for_sink(sink.as_ref())?;
        Ok(Self { sink, buffer })
    }

    #[must_use]
    pub const fn sink(&self) -> &SharedSink {
        &self.sink
    }

    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn write(&mut self, text: &str) -> &mut Self {
        self.buffer.text(text);
        self
    }

    pub fn endl(&mut self, count: usize) -> &mut Self {
        self.write(&"\n".repeat(count))
    }

    pub fn color(&mut self, color: Color) -> &mut Self {
        self.buffer.format(color.fg());
        self
    }

    pub fn background(&mut self, color: Color) -> &mut Self {
        self.buffer.format(color.bg());
        self
    }

    pub fn style(&mut self, mods: &[Modifier]) -> &mut Self {
        for m in mods {
            self.buffer.format(m.code());
        }
        self
    }

    pub fn reset(&mut self) -> &mut Self {
        self.style(&[Modifier::Reset])
    }

    /// Applies a style's color, then its modifiers. `None` is a no-op.
    pub fn apply(&mut self, style: Option<&Style>) -> &mut Self {
        if let Some(style) = style {
            if let Some(color) = style.color {
                self.color(color);
            }
            self.style(&style.mods);
        }
        self
    }

    /// Resets styling, appends `newlines` line breaks, writes both kept
    /// channels to the sink and clears the buffer for the next call.
    ///
    /// # Errors
    /// Whatever the sink returns. The buffer is cleared either way.
    pub fn flush(&mut self, newlines: usize, meta: &Metadata) -> Result<(), Error> {
        self.reset();
        if newlines != 0 {
            self.endl(newlines);
        }
        let pretty = self.buffer.pretty().map(Payload::from);
        let raw = self.buffer.raw().map(Payload::from);
        let result = self.sink.write(pretty.as_ref(), raw.as_ref(), meta);
        self.buffer.discard();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LogLevel;
    use crate::output::MemoryOutput;
    use std::sync::Arc;

    fn printer(pretty: bool, raw: bool) -> (Arc<MemoryOutput>, Printer) {
        let spy = Arc::new(MemoryOutput::new(pretty, raw));
        let printer = Printer::new(spy.clone()).unwrap();
        (spy, printer)
    }

    #[test]
    fn no_channels_is_rejected() {
        assert!(matches!(
            Printer::new(Arc::new(MemoryOutput::new(false, false))),
            Err(Error::NoChannels)
        ));
    }

    #[test]
    fn raw_buffer_drops_format_tokens() {
        let (spy, mut p) = printer(false, true);
        p.color(Color::Red).style(&[Modifier::Bright]).write("hi");
        p.flush(1, &Metadata::new("t", &LogLevel::INFO)).unwrap();

        let rec = &spy.records()[0];
        assert_eq!(rec.pretty, None);
        assert_eq!(rec.raw, Some(Payload::from("hi\n")));
    }

    #[test]
    fn dual_buffer_keeps_both() {
        let (spy, mut p) = printer(true, true);
        p.color(Color::Green).write("ok");
        p.flush(0, &Metadata::new("t", &LogLevel::INFO)).unwrap();

        let rec = &spy.records()[0];
        assert_eq!(rec.pretty, Some(Payload::from("\x1b[32mok\x1b[0m")));
        assert_eq!(rec.raw, Some(Payload::from("ok")));
    }

    #[test]
    fn flush_clears_buffer() {
        let (spy, mut p) = printer(false, true);
        let meta = Metadata::new("t", &LogLevel::INFO);
        p.write("one");
        p.flush(0, &meta).unwrap();
        p.write("two");
        p.flush(0, &meta).unwrap();

        let raws: Vec<_> = spy.records().into_iter().filter_map(|r| r.raw).collect();
        assert_eq!(raws, vec![Payload::from("one"), Payload::from("two")]);
    }
}
