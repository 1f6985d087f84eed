use super::{Metadata, Payload, SharedSink, Sink};

/// Fans every write out to its downstreams, in declaration order.
pub struct Pipe {
    downstreams: Vec<SharedSink>,
    uses_pretty: bool,
    uses_raw: bool,
}

impl Pipe {
    #[must_use]
    pub fn new(downstreams: Vec<SharedSink>) -> Self {
        let uses_pretty = downstreams.iter().any(|d| d.uses_pretty());
        let uses_raw = downstreams.iter().any(|d| d.uses_raw());
        Self {
            downstreams,
            uses_pretty,
            uses_raw,
        }
    }

    #[must_use]
    pub fn downstreams(&self) -> &[SharedSink] {
        &self.downstreams
    }

    /// Writes to every child even after a failure; returns the first error.
    pub(crate) fn fan_out(
        &self,
        pretty: Option<&Payload>,
        raw: Option<&Payload>,
        meta: &Metadata,
    ) -> Result<(), crate::Error> {
        let mut first_err = None;
        for downstream in &self.downstreams {
            if let Err(e) = downstream.write(pretty, raw, meta) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl Sink for Pipe {
    fn uses_pretty(&self) -> bool {
        self.uses_pretty
    }

    fn uses_raw(&self) -> bool {
        self.uses_raw
    }

    fn write(
        &self,
        pretty: Option<&Payload>,
        raw: Option<&Payload>,
        meta: &Metadata,
    ) -> Result<(), crate::Error> {
        self.fan_out(pretty, raw, meta)
    }
}
