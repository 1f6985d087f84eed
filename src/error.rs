//! Unified error type for every loggamus operation.
//!
//! Configuration and construction failures carry the offending name or path so
//! a broken pipeline document can be fixed without a debugger.

use std::fmt;

/// Error type for loggamus operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error from an output or while reading a configuration file.
    Io(std::io::Error),
    /// JSON parsing or serialization error.
    Json(serde_json::Error),
    /// TOML configuration parsing error.
    Toml(toml::de::Error),
    /// A registry already holds an object under this name.
    DuplicateName { category: &'static str, name: String },
    /// A builder is already registered under this path.
    DuplicateBuilder { category: &'static str, path: String },
    /// No builder is registered under this path.
    MissingBuilder { category: &'static str, path: String },
    /// A named reference could not be resolved.
    Unresolved { category: &'static str, name: String },
    /// A downstream entry declared a type other than `output` or `pipe`.
    UnknownDownstreamType(String),
    /// Top-level pipes are implicitly of type `pipe` and must not declare one.
    TopLevelPipeType(String),
    /// An inline or top-level pipe did not declare its downstreams.
    MissingDownstreams(String),
    /// The configuration document declares no outputs, pipes or loggers.
    EmptyDocument,
    /// A logger, child logger or registry entry was given an empty name.
    EmptyName(&'static str),
    /// A file output was constructed without a path.
    MissingOutputPath,
    /// A printer was bound to a sink that consumes neither channel.
    NoChannels,
    /// Unknown color name.
    UnknownColor(String),
    /// Unknown style modifier name.
    UnknownModifier(String),
    /// Unknown level comparison (expected eq, ne, gt, ge, lt or le).
    UnknownComparison(String),
    /// A predicate combinator was given no predicates.
    EmptyPredicates(&'static str),
    /// Unknown or malformed log level.
    InvalidLevel(String),
    /// Builder options did not match the expected shape.
    InvalidOptions { path: String, reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Toml(e) => write!(f, "parse error: {e}"),
            Self::DuplicateName { category, name } => {
                write!(f, "{category}: there is already an object named \"{name}\"")
            }
            Self::DuplicateBuilder { category, path } => {
                write!(f, "{category}: there is already a builder at \"{path}\"")
            }
            Self::MissingBuilder { category, path } => {
                write!(f, "{category}: no builder at \"{path}\"")
            }
            Self::Unresolved { category, name } => {
                write!(f, "{category}: cannot find \"{name}\"")
            }
            Self::UnknownDownstreamType(t) => write!(f, "unrecognized downstream type \"{t}\""),
            Self::TopLevelPipeType(name) => write!(
                f,
                "top level pipe \"{name}\" must not declare a type, \"pipe\" is inferred"
            ),
            Self::MissingDownstreams(name) => {
                write!(f, "pipe \"{name}\" must declare downstreams")
            }
            Self::EmptyDocument => write!(f, "pipeline configuration must declare components"),
            Self::EmptyName(what) => write!(f, "{what} must be named"),
            Self::MissingOutputPath => write!(f, "an output file path is mandatory"),
            Self::NoChannels => write!(f, "sink consumes neither pretty nor raw text"),
            Self::UnknownColor(c) => write!(f, "no such color: {c}"),
            Self::UnknownModifier(m) => write!(f, "no such modifier: {m}"),
            Self::UnknownComparison(c) => write!(f, "unknown log level comparison \"{c}\""),
            Self::EmptyPredicates(op) => {
                write!(f, "predicate \"{op}\" requires one or more arguments")
            }
            Self::InvalidLevel(level) => write!(f, "invalid log level: {level}"),
            Self::InvalidOptions { path, reason } => {
                write!(f, "invalid options for \"{path}\": {reason}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Toml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}
