use crate::Error;
use crate::sink::Sink;

/// Accumulates the text of one log call.
///
/// Plain text goes to every kept channel; format tokens (escape codes) only
/// to the styled one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Buffer {
    Dual { pretty: String, raw: String },
    Pretty(String),
    Raw(String),
}

impl Buffer {
    /// Keeps exactly the channels `sink` consumes.
    ///
    /// # Errors
    /// [`Error::NoChannels`] when the sink consumes neither channel.
    pub fn for_sink(sink: &dyn Sink) -> Result<Self, Error> {
        match (sink.uses_pretty(), sink.uses_raw()) {
            (true, true) => Ok(Self::Dual {
                pretty: String::new(),
                raw: String::new(),
            }),
            (true, false) => Ok(Self::Pretty(String::new())),
            (false, true) => Ok(Self::Raw(String::new())),
            (false, false) => Err(Error::NoChannels),
        }
    }

    pub fn text(&mut self, text: &str) {
        match self {
            Self::Dual { pretty, raw } => {
                pretty.push_str(text);
                raw.push_str(text);
            }
            Self::Pretty(pretty) => pretty.push_str(text),
            Self::Raw(raw) => raw.push_str(text),
        }
    }

    pub fn format(&mut self, token: &str) {
        match self {
            Self::Dual { pretty, .. } | Self::Pretty(pretty) => pretty.push_str(token),
            Self::Raw(_) => {}
        }
    }

    #[must_use]
    pub fn pretty(&self) -> Option<&str> {
        match self {
            Self::Dual { pretty, .. } | Self::Pretty(pretty) => Some(pretty),
            Self::Raw(_) => None,
        }
    }

    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Dual { raw, .. } | Self::Raw(raw) => Some(raw),
            Self::Pretty(_) => None,
        }
    }

    pub fn discard(&mut self) {
        match self {
            Self::Dual { pretty, raw } => {
                pretty.clear();
                raw.clear();
            }
            Self::Pretty(s) | Self::Raw(s) => s.clear(),
        }
    }
}
