//! Severity levels that gate which messages reach the sink graph.
//!
//! Levels are open: the built-ins cover the usual range, but any caller can
//! mint a new named level with an arbitrary rank. Every comparison looks at the
//! rank only, so two levels with different names and the same rank are equal.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A named severity. `PartialEq`/`Ord` (and therefore `eq`, `ne`, `lt`, `le`,
/// `gt`, `ge`) compare ranks.
#[derive(Debug, Clone)]
pub struct LogLevel {
    name: Cow<'static, str>,
    rank: i32,
}

impl LogLevel {
    pub const FINE: Self = Self::builtin("FINE", 0);
    pub const DEBUG: Self = Self::builtin("DEBUG", 10);
    pub const INFO: Self = Self::builtin("INFO", 20);
    pub const WARN: Self = Self::builtin("WARN", 30);
    pub const ERROR: Self = Self::builtin("ERROR", 40);
    pub const FATAL: Self = Self::builtin("FATAL", 50);

    /// Lower bound: a logger whose minimum is `$MIN` lets everything through.
    pub const MIN: Self = Self::builtin("$MIN", -9999);
    /// Upper bound: a trace threshold of `$MAX` disables call-site traces.
    pub const MAX: Self = Self::builtin("$MAX", 9999);

    const fn builtin(name: &'static str, rank: i32) -> Self {
        Self {
            name: Cow::Borrowed(name),
            rank,
        }
    }

    /// Defines an additional level.
    #[must_use]
    pub fn new(name: impl Into<String>, rank: i32) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            rank,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn rank(&self) -> i32 {
        self.rank
    }

    /// The six standard levels followed by the two sentinels.
    #[must_use]
    pub const fn builtins() -> [Self; 8] {
        [
            Self::FINE,
            Self::DEBUG,
            Self::INFO,
            Self::WARN,
            Self::ERROR,
            Self::FATAL,
            Self::MIN,
            Self::MAX,
        ]
    }
}

impl PartialEq for LogLevel {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
    }
}

impl Eq for LogLevel {}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank.cmp(&other.rank)
    }
}

impl Hash for LogLevel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank.hash(state);
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::FINE
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Returned by `FromStr` when the name matches no built-in level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level: '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FINE" => Ok(Self::FINE),
            "DEBUG" => Ok(Self::DEBUG),
            "INFO" => Ok(Self::INFO),
            "WARN" | "WARNING" => Ok(Self::WARN),
            "ERROR" | "ERR" => Ok(Self::ERROR),
            "FATAL" => Ok(Self::FATAL),
            "$MIN" => Ok(Self::MIN),
            "$MAX" => Ok(Self::MAX),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
