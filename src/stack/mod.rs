//! Call-stack capture and frame classification.
//!
//! A [`StackProvider`] hands out the frames above the logging machinery as a
//! [`Frames`] iterator that can be walked exactly once. Rendering a frame never
//! fails: missing names, files or lines degrade to sentinel text.

mod native;

pub use native::BacktraceProvider;

use parking_lot::RwLock;
use regex::Regex;
use std::panic::Location;

/// Caller text for frames without a function name.
pub const LAMBDA_CALLER: &str = "[[Lambda Function]]";
/// Type text for static frames whose owning type is unknown.
pub const UNKNOWN_TYPE: &str = "[[Type]]";
/// Stands in for a missing file path, or for a whole missing source.
pub const UNKNOWN_SOURCE: &str = "<unknown>";
/// Stands in for a missing line number.
pub const UNKNOWN_LINE: &str = "<?>";

/// One captured frame. Frame 0 of a capture is nearest the call site.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackFrame {
    pub function_name: Option<String>,
    pub type_name: Option<String>,
    pub is_static: bool,
    pub file_path: Option<String>,
    pub line_number: Option<u32>,
}

/// How a frame's caller is rendered and styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRole {
    /// No function name: closures and anonymous functions.
    Lambda,
    /// Associated function, rendered `Type::name`.
    Static,
    /// Method on a type, rendered `Type.name`.
    Instance,
    /// Free function, rendered `name`.
    Function,
}

impl StackFrame {
    /// A frame carrying only a source location, as produced by `#[track_caller]`.
    #[must_use]
    pub fn from_location(location: &Location<'_>) -> Self {
        Self {
            file_path: Some(location.file().to_string()),
            line_number: Some(location.line()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn role(&self) -> FrameRole {
        match (&self.function_name, &self.type_name) {
            (None, _) => FrameRole::Lambda,
            (Some(_), _) if self.is_static => FrameRole::Static,
            (Some(_), Some(_)) => FrameRole::Instance,
            (Some(_), None) => FrameRole::Function,
        }
    }

    /// The caller as rendered in traces and in `logged_at.caller`.
    #[must_use]
    pub fn caller(&self) -> String {
        let Some(function) = &self.function_name else {
            return LAMBDA_CALLER.to_string();
        };
        match (self.role(), &self.type_name) {
            (FrameRole::Static, ty) => {
                format!("{}::{function}", ty.as_deref().unwrap_or(UNKNOWN_TYPE))
            }
            (FrameRole::Instance, Some(ty)) => format!("{ty}.{function}"),
            _ => function.clone(),
        }
    }

    /// `path:line` with the app root trimmed; `None` when neither part is known.
    #[must_use]
    pub fn source(&self) -> Option<String> {
        if self.file_path.is_none() && self.line_number.is_none() {
            return None;
        }
        let path = self
            .file_path
            .as_deref()
            .map_or_else(|| UNKNOWN_SOURCE.to_string(), strip_app_root);
        let line = self
            .line_number
            .map_or_else(|| UNKNOWN_LINE.to_string(), |l| l.to_string());
        Some(format!("{path}:{line}"))
    }
}

/// A finite, ordered, single-pass sequence of frames.
#[derive(Debug)]
pub struct Frames {
    inner: std::vec::IntoIter<StackFrame>,
}

impl Frames {
    #[must_use]
    pub fn new(frames: Vec<StackFrame>) -> Self {
        Self {
            inner: frames.into_iter(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Iterator for Frames {
    type Item = StackFrame;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Frames {}

/// Source of call stacks for trace rendering.
pub trait StackProvider: Send + Sync {
    /// Frames strictly above the logging machinery, after dropping `skip`
    /// more. Must not block or fail; an unavailable stack is an empty one.
    fn capture(&self, skip: usize) -> Frames;
}

/// Always returns the same frames. Useful for deterministic traces.
#[derive(Debug, Clone, Default)]
pub struct FixedProvider {
    frames: Vec<StackFrame>,
}

impl FixedProvider {
    #[must_use]
    pub const fn new(frames: Vec<StackFrame>) -> Self {
        Self { frames }
    }
}

impl StackProvider for FixedProvider {
    fn capture(&self, skip: usize) -> Frames {
        Frames::new(self.frames.iter().skip(skip).cloned().collect())
    }
}

static APP_ROOT: RwLock<Option<Regex>> = RwLock::new(None);

/// Trims, from every rendered source path, the directory `parents` levels
/// above the calling file. `set_app_root(1)` called from `src/main.rs` trims
/// the crate directory, so paths render as `src/main.rs:12`.
#[track_caller]
pub fn set_app_root(parents: usize) {
    let caller = Location::caller();
    let file = BacktraceProvider
        .capture(0)
        .next()
        .and_then(|f| f.file_path)
        .unwrap_or_else(|| caller.file().to_string());
    set_app_root_path(&parent_dir(&file, parents));
}

/// Trims an explicit prefix from every rendered source path.
pub fn set_app_root_path(prefix: &str) {
    let prefix = prefix.trim_end_matches(['/', '\\']);
    let pattern = format!(r"^(?:\w+://)?{}[/\\]", regex::escape(prefix));
    // Escaped input always yields a valid pattern.
    *APP_ROOT.write() = Regex::new(&pattern).ok();
}

pub fn clear_app_root() {
    *APP_ROOT.write() = None;
}

fn parent_dir(file: &str, parents: usize) -> String {
    let without_scheme = file.split_once("://").map_or(file, |(_, rest)| rest);
    let mut dir = without_scheme;
    for _ in 0..parents {
        dir = dir.rfind(['/', '\\']).map_or("", |i| &dir[..i]);
    }
    dir.to_string()
}

/// Applies the configured app root to `path`.
#[must_use]
pub fn strip_app_root(path: &str) -> String {
    APP_ROOT
        .read()
        .as_ref()
        .map_or_else(|| path.to_string(), |re| re.replace(path, "").into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(function: Option<&str>, ty: Option<&str>, is_static: bool) -> StackFrame {
        StackFrame {
            function_name: function.map(String::from),
            type_name: ty.map(String::from),
            is_static,
            file_path: None,
            line_number: None,
        }
    }

    #[test]
    fn roles_follow_name_and_type() {
        assert_eq!(frame(None, Some("T"), true).role(), FrameRole::Lambda);
        assert_eq!(frame(Some("f"), Some("T"), true).role(), FrameRole::Static);
        assert_eq!(frame(Some("f"), Some("T"), false).role(), FrameRole::Instance);
        assert_eq!(frame(Some("f"), None, false).role(), FrameRole::Function);
    }

    #[test]
    fn caller_uses_role_accessor() {
        assert_eq!(frame(None, None, false).caller(), LAMBDA_CALLER);
        assert_eq!(frame(Some("new"), Some("Pool"), true).caller(), "Pool::new");
        assert_eq!(frame(Some("new"), None, true).caller(), "[[Type]]::new");
        assert_eq!(frame(Some("run"), Some("Pool"), false).caller(), "Pool.run");
        assert_eq!(frame(Some("main"), None, false).caller(), "main");
    }

    #[test]
    fn missing_parts_render_sentinels() {
        let mut f = frame(Some("f"), None, false);
        assert_eq!(f.source(), None);
        f.line_number = Some(3);
        assert_eq!(f.source().as_deref(), Some("<unknown>:3"));
        f.line_number = None;
        f.file_path = Some("a.rs".into());
        assert_eq!(f.source().as_deref(), Some("a.rs:<?>"));
    }

    #[test]
    fn parent_dir_drops_trailing_components() {
        assert_eq!(parent_dir("/home/u/app/src/main.rs", 2), "/home/u/app");
        assert_eq!(parent_dir("file:///srv/app/index.rs", 1), "/srv/app");
    }

    #[test]
    fn fixed_provider_skips() {
        let provider = FixedProvider::new(vec![frame(Some("a"), None, false), frame(Some("b"), None, false)]);
        let names: Vec<_> = provider.capture(1).map(|f| f.caller()).collect();
        assert_eq!(names, vec!["b"]);
    }
}
