use super::{Metadata, Payload, Pipe, SharedSink, Sink};
use serde_json::Value;
use std::sync::Arc;

/// Per-channel rewrite used by [`Mapping::Custom`].
pub type MapFn = Arc<dyn Fn(&Payload, &Metadata) -> Payload + Send + Sync>;

/// How a [`Mapper`] rewrites each channel.
#[derive(Clone)]
pub enum Mapping {
    /// Wraps the text in a banner that prints the metadata above it.
    PlainText,
    /// `{ ...metadata, "message": data }` as a structured object.
    Object,
    /// The same object as `Object`, serialized to a compact JSON string.
    Json,
    Custom(MapFn),
}

impl std::fmt::Debug for Mapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlainText => f.write_str("PlainText"),
            Self::Object => f.write_str("Object"),
            Self::Json => f.write_str("Json"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Mapping {
    fn apply(&self, data: &Payload, meta: &Metadata) -> Payload {
        match self {
            Self::PlainText => Payload::Text(banner(data, meta)),
            Self::Object => Payload::Object(merge_object(data, meta)),
            Self::Json => Payload::Text(merge_object(data, meta).to_string()),
            Self::Custom(f) => f(data, meta),
        }
    }
}

/// Rewrites each channel before forwarding.
///
/// A channel is rewritten and forwarded only if the caller supplied a
/// non-empty value for it and this node's subtree consumes it; otherwise the
/// children receive `None` for that channel.
pub struct Mapper {
    mapping: Mapping,
    pipe: Pipe,
}

impl Mapper {
    #[must_use]
    pub fn new(mapping: Mapping, downstreams: Vec<SharedSink>) -> Self {
        Self {
            mapping,
            pipe: Pipe::new(downstreams),
        }
    }

    #[must_use]
    pub fn to_plain_text(downstreams: Vec<SharedSink>) -> Self {
        Self::new(Mapping::PlainText, downstreams)
    }

    #[must_use]
    pub fn to_object(downstreams: Vec<SharedSink>) -> Self {
        Self::new(Mapping::Object, downstreams)
    }

    #[must_use]
    pub fn to_json(downstreams: Vec<SharedSink>) -> Self {
        Self::new(Mapping::Json, downstreams)
    }

    pub fn custom<F>(f: F, downstreams: Vec<SharedSink>) -> Self
    where
        F: Fn(&Payload, &Metadata) -> Payload + Send + Sync + 'static,
    {
        Self::new(Mapping::Custom(Arc::new(f)), downstreams)
    }

    #[must_use]
    pub const fn mapping(&self) -> &Mapping {
        &self.mapping
    }
}

impl Sink for Mapper {
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
        let pretty = pretty
            .filter(|p| !p.is_empty() && self.uses_pretty())
            .map(|p| self.mapping.apply(p, meta));
        let raw = raw
            .filter(|r| !r.is_empty() && self.uses_raw())
            .map(|r| self.mapping.apply(r, meta));
        self.pipe.fan_out(pretty.as_ref(), raw.as_ref(), meta)
    }
}

const BANNER_OUTER: &str = "********************************************************************************";
const BANNER_INNER: &str = "--------------------------------------------------------------------------------";

/// Metadata block above the data, framed by 80-column rules.
pub(crate) fn banner(data: &Payload, meta: &Metadata) -> String {
    let meta = serde_json::to_string_pretty(meta).unwrap_or_default();
    format!("{BANNER_OUTER}\n{meta}\n{BANNER_INNER}\n{data}\n{BANNER_OUTER}\n\n\n")
}

fn merge_object(data: &Payload, meta: &Metadata) -> Value {
    let mut object = match meta.to_value() {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    object.insert("message".to_string(), data.to_value());
    Value::Object(object)
}
