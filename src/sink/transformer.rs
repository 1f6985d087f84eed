use super::mapper::{MapFn, Mapper, Mapping};
use super::{Metadata, Payload, SharedSink, Sink};
use std::sync::Arc;

/// A mapper for structural rewrites such as prepending a metadata header.
///
/// Routing rules are exactly those of [`Mapper`]; the separate type exists so
/// configuration documents can name structural rewrites on their own.
pub struct Transformer {
    inner: Mapper,
}

impl Transformer {
    /// Prefixes each channel with the record's metadata, framed by rules.
    #[must_use]
    pub fn metadata_header(downstreams: Vec<SharedSink>) -> Self {
        Self {
            inner: Mapper::new(Mapping::PlainText, downstreams),
        }
    }

    #[must_use]
    pub fn new(f: MapFn, downstreams: Vec<SharedSink>) -> Self {
        Self {
            inner: Mapper::new(Mapping::Custom(f), downstreams),
        }
    }

    pub fn custom<F>(f: F, downstreams: Vec<SharedSink>) -> Self
    where
        F: Fn(&Payload, &Metadata) -> Payload + Send + Sync + 'static,
    {
        Self::new(Arc::new(f), downstreams)
    }
}

impl Sink for Transformer {
    fn uses_pretty(&self) -> bool {
        self.inner.uses_pretty()
    }

    fn uses_raw(&self) -> bool {
        self.inner.uses_raw()
    }

    fn write(
        &self,
        pretty: Option<&Payload>,
        raw: Option<&Payload>,
        meta: &Metadata,
    ) -> Result<(), crate::Error> {
        self.inner.write(pretty, raw, meta)
    }
}
