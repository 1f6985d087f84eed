//! What travels through the sink graph: the two text channels and the
//! metadata record attached to every flushed log call.

use crate::level::LogLevel;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// A channel value. Printers only produce text; mappers may turn it into a
/// structured object on its way to the outputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Object(Value),
}

impl Payload {
    /// Empty text and JSON `null` count as "nothing to forward".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(t) => t.is_empty(),
            Self::Object(v) => v.is_null(),
        }
    }

    /// Text as-is; objects as compact JSON.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(t) => Cow::Borrowed(t),
            Self::Object(v) => Cow::Owned(v.to_string()),
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(t) => Value::String(t.clone()),
            Self::Object(v) => v.clone(),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Value> for Payload {
    fn from(v: Value) -> Self {
        Self::Object(v)
    }
}

/// Rendered attribution for one stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub caller: String,
    pub source: String,
}

/// Attached to every write. Optional fields are omitted from the serialized
/// form when absent, so `metadata: None` and `metadata: Some(Value::Null)`
/// stay distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub logger: String,
    pub timestamp: String,
    pub log_level: String,
    pub log_level_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_at: Option<CallSite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_at: Option<CallSite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Metadata {
    /// Stamps the current UTC time with millisecond precision.
    #[must_use]
    pub fn new(logger: impl Into<String>, level: &LogLevel) -> Self {
        Self {
            logger: logger.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            log_level: level.name().to_string(),
            log_level_id: level.rank(),
            logged_at: None,
            error_at: None,
            metadata: None,
        }
    }

    /// Looks up a top-level field by its serialized name. `None` means the
    /// field is absent (unknown name, or an optional field that is unset).
    #[must_use]
    pub fn get(&self, prop: &str) -> Option<Value> {
        let site = |s: &CallSite| serde_json::json!({ "caller": s.caller, "source": s.source });
        match prop {
            "logger" => Some(Value::from(self.logger.as_str())),
            "timestamp" => Some(Value::from(self.timestamp.as_str())),
            "log_level" => Some(Value::from(self.log_level.as_str())),
            "log_level_id" => Some(Value::from(self.log_level_id)),
            "logged_at" => self.logged_at.as_ref().map(site),
            "error_at" => self.error_at.as_ref().map(site),
            "metadata" => self.metadata.clone(),
            _ => None,
        }
    }

    /// Looks up a field of the user-supplied metadata object.
    #[must_use]
    pub fn user(&self, prop: &str) -> Option<&Value> {
        self.metadata.as_ref().and_then(|m| m.get(prop))
    }

    /// The serialized record as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
