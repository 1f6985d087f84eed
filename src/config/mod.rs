//! The declarative pipeline document: outputs, pipes, loggers and the
//! default logger, as read from JSON or TOML.
//!
//! Sections keep their declaration order, so components are registered in
//! the order they are written.

use crate::fmt::Style;
use crate::internal;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A whole pipeline. Every section may be omitted, but a document that
/// declares nothing at all is rejected by the factory.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Document {
    pub outputs: IndexMap<String, OutputEntry>,
    pub pipes: IndexMap<String, DownstreamEntry>,
    pub loggers: IndexMap<String, LoggerEntry>,
    /// Logger (by full path) to install as the process-wide default.
    pub default: Option<String>,
}

/// `{ class, options }`: a builder path and whatever it accepts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputEntry {
    pub class: String,
    #[serde(default)]
    pub options: Value,
}

/// A reference to, or inline definition of, an output or pipe.
///
/// With `name`, the entry refers to a component registered earlier.
/// Without it, `class`/`options` (and `downstreams` for pipes) build an
/// anonymous one. Top-level pipes use the same shape but must not set `type`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DownstreamEntry {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub class: Option<String>,
    pub options: Value,
    pub downstreams: Option<Vec<DownstreamEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggerEntry {
    pub options: LoggerOptions,
    /// Forked from this logger, depth first.
    pub children: IndexMap<String, LoggerEntry>,
}

/// Anything left out is inherited: from the parent for children, from the
/// logger defaults otherwise.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggerOptions {
    pub minlevel: Option<String>,
    pub mintrace: Option<String>,
    pub tracedepth: Option<usize>,
    pub errordepth: Option<usize>,
    pub output: Option<DownstreamEntry>,
    pub styles: IndexMap<String, Style>,
}

impl Document {
    /// Reads a document from disk. `~` is expanded; files ending in `.toml`
    /// are parsed as TOML, anything else as JSON.
    ///
    /// # Errors
    /// Fails if the file cannot be read or does not parse.
    pub fn load(path: impl AsRef<str>) -> Result<Self, crate::Error> {
        let expanded = shellexpand::tilde(path.as_ref());
        let path = Path::new(expanded.as_ref());
        internal::debug("CONFIG", &format!("Loading {}", path.display()));

        let content = fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let doc = if is_toml {
            Self::from_toml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };

        internal::info(
            "CONFIG",
            &format!(
                "Loaded {}: {} outputs, {} pipes, {} loggers",
                path.display(),
                doc.outputs.len(),
                doc.pipes.len(),
                doc.loggers.len()
            ),
        );
        Ok(doc)
    }

    /// # Errors
    /// [`crate::Error::Json`] on malformed input.
    pub fn from_json_str(content: &str) -> Result<Self, crate::Error> {
        Ok(serde_json::from_str(content)?)
    }

    /// # Errors
    /// [`crate::Error::Toml`] on malformed input.
    pub fn from_toml_str(content: &str) -> Result<Self, crate::Error> {
        Ok(toml::from_str(content)?)
    }

    /// Number of declared components across all three sections.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.outputs.len() + self.pipes.len() + self.loggers.len()
    }
}
