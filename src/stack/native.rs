//! Native stack capture via the `backtrace` crate.

use super::{Frames, StackFrame, StackProvider};

/// Module paths whose frames belong to the logging machinery.
const MACHINERY: [&str; 4] = [
    concat!(env!("CARGO_CRATE_NAME"), "::logger::"),
    concat!(env!("CARGO_CRATE_NAME"), "::global::"),
    concat!(env!("CARGO_CRATE_NAME"), "::internal::"),
    concat!(env!("CARGO_CRATE_NAME"), "::stack::"),
];

/// Runtime frames that may sit between machinery frames in unoptimized builds.
const TRANSPARENT: [&str; 6] = [
    "std::",
    "core::",
    "alloc::",
    "backtrace::",
    "parking_lot::",
    "lock_api::",
];

/// Resolves the native stack. Frames from inlined calls are kept, so a trace
/// may show more entries than the call chain has physical frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceProvider;

impl StackProvider for BacktraceProvider {
    fn capture(&self, skip: usize) -> Frames {
        let trace = backtrace::Backtrace::new();
        let symbols: Vec<Symbol> = trace
            .frames()
            .iter()
            .flat_map(backtrace::BacktraceFrame::symbols)
            .map(|s| Symbol {
                name: s.name().map(|n| format!("{n:#}")),
                file: s.filename().map(|p| p.display().to_string()),
                line: s.lineno(),
            })
            .collect();

        // Inlined machinery leaves nothing to anchor on; the caller's
        // `Location` stands in for the whole trace.
        let Some(start) = call_site_index(&symbols) else {
            return Frames::empty();
        };
        Frames::new(
            symbols
                .into_iter()
                .skip(start + skip)
                .map(Symbol::into_frame)
                .collect(),
        )
    }
}

struct Symbol {
    name: Option<String>,
    file: Option<String>,
    line: Option<u32>,
}

impl Symbol {
    fn into_frame(self) -> StackFrame {
        let mut frame = self.name.as_deref().map(parse_symbol).unwrap_or_default();
        frame.file_path = self.file;
        frame.line_number = self.line;
        frame
    }
}

#[derive(PartialEq, Eq)]
enum Kind {
    Machinery,
    Transparent,
    Foreign,
}

fn kind(name: Option<&str>) -> Kind {
    let Some(name) = name else {
        return Kind::Transparent;
    };
    let bare = name.trim_start_matches('<');
    if MACHINERY.iter().any(|p| bare.starts_with(p)) && !bare.contains("::tests::") {
        Kind::Machinery
    } else if TRANSPARENT.iter().any(|p| bare.starts_with(p)) {
        Kind::Transparent
    } else {
        Kind::Foreign
    }
}

/// Index of the first foreign frame past the innermost run of machinery.
/// `None` when no machinery frame was seen.
fn call_site_index(symbols: &[Symbol]) -> Option<usize> {
    let mut start = None;
    for (i, symbol) in symbols.iter().enumerate() {
        match kind(symbol.name.as_deref()) {
            Kind::Machinery => start = Some(i + 1),
            Kind::Foreign if start.is_some() => return Some(i),
            Kind::Transparent | Kind::Foreign => {}
        }
    }
    start
}

/// Splits a demangled path on `::`, ignoring separators inside `<...>`.
fn split_path(path: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut begin = 0;
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' if i == 0 || bytes[i - 1] != b'-' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                parts.push(&path[begin..i]);
                i += 2;
                begin = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&path[begin..]);
    parts
}

fn strip_generics(segment: &str) -> &str {
    segment.find('<').map_or(segment, |i| &segment[..i])
}

fn is_type_segment(segment: &str) -> bool {
    segment.chars().next().is_some_and(char::is_uppercase)
}

/// Classifies a demangled symbol.
///
/// Closures have no function name. `<T as Trait>::m` is a method on `T`;
/// `path::T::f` is an associated function of `T`; anything else is free.
pub(super) fn parse_symbol(name: &str) -> StackFrame {
    let mut parts = split_path(name);
    // Turbofish arguments trail the function name: `f::<T>`.
    while parts.len() > 1 && parts.last().is_some_and(|p| p.starts_with('<')) {
        parts.pop();
    }
    let Some(&last) = parts.last() else {
        return StackFrame::default();
    };
    let bare = strip_generics(last);
    if bare.is_empty() || last.starts_with('{') {
        return StackFrame::default();
    }
    let function = Some(bare.to_string());

    let owner = parts.len().checked_sub(2).map(|i| parts[i]);
    match owner {
        Some(qualified) if qualified.starts_with('<') => {
            let inner = qualified.trim_start_matches('<').trim_end_matches('>');
            let self_ty = inner.split(" as ").next().unwrap_or(inner);
            let ty = split_path(self_ty)
                .last()
                .map(|s| strip_generics(s).to_string());
            StackFrame {
                function_name: function,
                type_name: ty,
                is_static: false,
                ..StackFrame::default()
            }
        }
        Some(segment) if is_type_segment(segment) => StackFrame {
            function_name: function,
            type_name: Some(strip_generics(segment).to_string()),
            is_static: true,
            ..StackFrame::default()
        },
        _ => StackFrame {
            function_name: function,
            ..StackFrame::default()
        },
    }
}
