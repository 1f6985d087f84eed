use crate::stack::{BacktraceProvider, StackFrame, StackProvider};
use std::fmt;
use std::panic::Location;

/// What a log call prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Plain(String),
    /// Always traced; its origin frames follow the call-site frames.
    Failure(Failure),
}

impl Message {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Failure(failure) => failure.text(),
        }
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Self::Plain(s.to_string())
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Self::Plain(s)
    }
}

impl From<&String> for Message {
    fn from(s: &String) -> Self {
        Self::Plain(s.clone())
    }
}

impl From<Failure> for Message {
    fn from(f: Failure) -> Self {
        Self::Failure(f)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A failure with the stack captured where it was created, not where it is
/// logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    text: String,
    frames: Vec<StackFrame>,
}

impl Failure {
    #[track_caller]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            frames: capture_here(Location::caller()),
        }
    }

    /// Text is the error followed by its `source()` chain, `: `-separated.
    #[track_caller]
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut text = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            text.push_str(": ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(text)
    }

    /// A failure whose origin frames are already known.
    #[must_use]
    pub fn with_frames(text: impl Into<String>, frames: Vec<StackFrame>) -> Self {
        Self {
            text: text.into(),
            frames,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::error::Error for Failure {}

fn capture_here(location: &Location<'_>) -> Vec<StackFrame> {
    let mut frames: Vec<StackFrame> = BacktraceProvider.capture(0).collect();
    super::fill_location(&mut frames, location);
    frames
}
