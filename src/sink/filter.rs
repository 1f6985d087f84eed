use super::{Metadata, Payload, Pipe, Predicate, SharedSink, Sink};

/// Forwards a record unchanged only when its predicate holds; otherwise the
/// whole subtree sees nothing.
pub struct Filter {
    predicate: Predicate,
    pipe: Pipe,
}

impl Filter {
    #[must_use]
    pub fn new(predicate: Predicate, downstreams: Vec<SharedSink>) -> Self {
        Self {
            predicate,
            pipe: Pipe::new(downstreams),
        }
    }
}

impl Sink for Filter {
    fn uses_pretty(&self) -> bool {
        self.pipe.uses_pretty()
    }

    fn uses_raw(&self) -> bool {
        self.pipe.uses_raw()
    }

    fn write(
        &self,
        pretty: Option<&Payload>,
        raw: Option<&Payload>,
        meta: &Metadata,
    ) -> Result<(), crate::Error> {
        if (self.predicate)(pretty, raw, meta) {
            self.pipe.fan_out(pretty, raw, meta)
        } else {
            Ok(())
        }
    }
}
