//! In-memory output that keeps every write it receives.

use crate::sink::{Metadata, Payload, Sink};
use parking_lot::Mutex;

/// One recorded write.
#[derive(Debug, Clone, PartialEq)]
pub struct Captured {
    pub pretty: Option<Payload>,
    pub raw: Option<Payload>,
    pub meta: Metadata,
}

/// Records writes for later inspection; the channel flags are whatever the
/// caller asks for.
#[derive(Debug)]
pub struct MemoryOutput {
    pretty: bool,
    raw: bool,
    records: Mutex<Vec<Captured>>,
}

impl MemoryOutput {
    #[must_use]
    pub const fn new(pretty: bool, raw: bool) -> Self {
        Self {
            pretty,
            raw,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Consumes both channels.
    #[must_use]
    pub const fn dual() -> Self {
        Self::new(true, true)
    }

    #[must_use]
    pub fn records(&self) -> Vec<Captured> {
        self.records.lock().clone()
    }

    /// Returns the recorded writes and starts over.
    pub fn take(&self) -> Vec<Captured> {
        std::mem::take(&mut *self.records.lock())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl Sink for MemoryOutput {
    fn uses_pretty(&self) -> bool {
        self.pretty
    }

    fn uses_raw(&self) -> bool {
        self.raw
    }

    fn write(
        &self,
        pretty: Option<&Payload>,
        raw: Option<&Payload>,
        meta: &Metadata,
    ) -> Result<(), crate::Error> {
        self.records.lock().push(Captured {
            pretty: pretty.cloned(),
            raw: raw.cloned(),
            meta: meta.clone(),
        });
        Ok(())
    }
}
