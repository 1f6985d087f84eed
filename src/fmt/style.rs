//! Per-logger styling: which color and modifiers each level name, and each
//! stack-frame role, is printed with.

use super::{Color, Modifier};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reserved style keys for the parts of a rendered stack frame.
pub mod roles {
    /// The ` at ` / ` in ` connective text.
    pub const CALLSITE: &str = "$CALLSITE";
    /// Anonymous functions and closures.
    pub const LAMBDA: &str = "$LAMBDA";
    /// Plain functions and instance members.
    pub const FUNCTION: &str = "$FUNCTION";
    /// Static (associated) members.
    pub const STATIC: &str = "$STATIC";
    pub const PATH: &str = "$PATH";
    pub const LINE: &str = "$LINE";
}

/// `color: None` leaves the current foreground untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub color: Option<Color>,
    pub mods: Vec<Modifier>,
}

impl Style {
    #[must_use]
    pub fn new(color: Color, mods: &[Modifier]) -> Self {
        Self {
            color: Some(color),
            mods: mods.to_vec(),
        }
    }
}

/// Maps level names and [`roles`] keys to styles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleMap {
    styles: HashMap<String, Style>,
}

impl Default for StyleMap {
    fn default() -> Self {
        use Color::{Blue, Cyan, Green, Red, White, Yellow};
        use Modifier::{Bright, Dim, Underline};

        let styles = [
            ("FINE", Style::new(White, &[Dim])),
            ("DEBUG", Style::new(Blue, &[Bright])),
            ("INFO", Style::new(Green, &[])),
            ("WARN", Style::new(Yellow, &[])),
            ("ERROR", Style::new(Red, &[Bright])),
            ("FATAL", Style::new(Red, &[Underline])),
            (roles::CALLSITE, Style::new(White, &[Dim])),
            (roles::LAMBDA, Style::new(White, &[Bright])),
            (roles::FUNCTION, Style::new(Green, &[Bright])),
            (roles::STATIC, Style::new(Blue, &[Bright])),
            (roles::PATH, Style::new(Yellow, &[Bright])),
            (roles::LINE, Style::new(Cyan, &[Bright])),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self { styles }
    }
}

impl StyleMap {
    /// A map with no entries at all; every lookup misses.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            styles: HashMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Style> {
        self.styles.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, style: Style) {
        self.styles.insert(key.into(), style);
    }

    /// Merges overrides key by key. An override without a color keeps the
    /// existing entry's color; modifiers are always replaced.
    pub fn apply<I, K>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, Style)>,
        K: Into<String>,
    {
        for (key, style) in overrides {
            let key = key.into();
            let color = style
                .color
                .or_else(|| self.styles.get(&key).and_then(|s| s.color));
            self.styles.insert(
                key,
                Style {
                    color,
                    mods: style.mods,
                },
            );
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
