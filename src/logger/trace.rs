use crate::fmt::{Color, StyleMap, roles};
use crate::printer::Printer;
use crate::sink::CallSite;
use crate::stack::{FrameRole, StackFrame, UNKNOWN_SOURCE};

pub(super) const LOGGED: (&str, Color) = ("Logged", Color::Cyan);
pub(super) const THROWN: (&str, Color) = ("Thrown", Color::Magenta);

const INDENT: &str = "      ";

/// Renders one line per frame. Only the first line carries the verb.
pub(super) fn render<'a>(
    printer: &mut Printer,
    styles: &StyleMap,
    frames: impl IntoIterator<Item = &'a StackFrame>,
    (verb, tint): (&str, Color),
) {
    for (i, frame) in frames.into_iter().enumerate() {
        render_frame(printer, styles, frame, (i == 0).then_some((verb, tint)));
    }
}

fn render_frame(
    printer: &mut Printer,
    styles: &StyleMap,
    frame: &StackFrame,
    verb: Option<(&str, Color)>,
) {
    let callsite = styles.get(roles::CALLSITE);
    printer.reset();
    match verb {
        Some((verb, tint)) => {
            printer.color(tint).write(verb).reset();
        }
        None => {
            printer.write(INDENT);
        }
    }
    printer.apply(callsite).write(" at ");

    let role = match frame.role() {
        FrameRole::Lambda => roles::LAMBDA,
        FrameRole::Static => roles::STATIC,
        FrameRole::Instance | FrameRole::Function => roles::FUNCTION,
    };
    printer
        .reset()
        .apply(styles.get(role))
        .write(&frame.caller())
        .reset();

    match frame.source() {
        None => {
            printer.apply(callsite).write(" in ").write(UNKNOWN_SOURCE).endl(1);
        }
        Some(source) => {
            let (path, line) = source.rsplit_once(':').unwrap_or((source.as_str(), ""));
            printer.apply(callsite).write(" in ").reset();
            printer.apply(styles.get(roles::PATH)).write(path).reset();
            printer
                .apply(styles.get(roles::LINE))
                .write(":")
                .write(line)
                .endl(1);
        }
    }
}

/// The metadata form of a frame.
pub(super) fn call_site(frame: Option<&StackFrame>) -> CallSite {
    frame.map_or_else(
        || CallSite {
            caller: UNKNOWN_SOURCE.to_string(),
            source: UNKNOWN_SOURCE.to_string(),
        },
        |f| CallSite {
            caller: f.caller(),
            source: f.source().unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
        },
    )
}
