//! Tests for the logger state machine.

use loggamus::stack::FixedProvider;
use loggamus::{
    Color, Error, Failure, LogLevel, Logger, MemoryOutput, Metadata, Payload, SharedSink, Sink,
    StackFrame, Style,
};
use serde_json::json;
use std::sync::{Arc, OnceLock};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

fn raw_spy() -> Arc<MemoryOutput> {
    Arc::new(MemoryOutput::new(false, true))
}

fn frame(function: Option<&str>, ty: Option<&str>, is_static: bool, file: Option<&str>, line: Option<u32>) -> StackFrame {
    StackFrame {
        function_name: function.map(String::from),
        type_name: ty.map(String::from),
        is_static,
        file_path: file.map(String::from),
        line_number: line,
    }
}

fn fixed(frames: Vec<StackFrame>) -> Arc<FixedProvider> {
    Arc::new(FixedProvider::new(frames))
}

fn raw_text(spy: &MemoryOutput, i: usize) -> String {
    spy.records()[i]
        .raw
        .as_ref()
        .map(|p| p.as_text().into_owned())
        .unwrap_or_default()
}

#[test]
fn builder_defaults() {
    let logger = Logger::builder("root").sink(raw_spy()).build().unwrap();
    assert_eq!(logger.path(), "root");
    assert_eq!(logger.min_level(), LogLevel::FINE);
    assert_eq!(logger.min_trace(), LogLevel::ERROR);
    assert_eq!(logger.trace_depth(), 1);
    assert_eq!(logger.error_depth(), 1);
}

#[test]
fn empty_name_is_rejected() {
    assert!(matches!(Logger::new(""), Err(Error::EmptyName(_))));
}

#[test]
fn level_gate_drops_below_min() {
    let spy = raw_spy();
    let logger = Logger::builder("root")
        .sink(spy.clone())
        .min_level(LogLevel::WARN)
        .build()
        .unwrap();

    logger.fine("x");
    logger.debug("x");
    logger.info("x");
    assert!(spy.is_empty());

    logger.warn("x");
    logger.fatal("x");
    assert_eq!(spy.len(), 2);
}

#[test]
fn warn_gate_with_error_trace() {
    let spy = raw_spy();
    let logger = Logger::builder("root")
        .sink(spy.clone())
        .min_level(LogLevel::WARN)
        .min_trace(LogLevel::ERROR)
        .build()
        .unwrap();

    logger.log("x", &LogLevel::INFO);
    assert_eq!(spy.len(), 0);

    logger.log("x", &LogLevel::WARN);
    assert_eq!(spy.len(), 1);
    assert_eq!(spy.records()[0].meta.logged_at, None);

    logger.log("x", &LogLevel::ERROR);
    assert_eq!(spy.len(), 2);
    let site = spy.records()[1].meta.logged_at.clone().unwrap();
    assert!(!site.source.starts_with("<unknown>"));
    assert!(!site.source.ends_with("<?>"));
}

#[test]
fn forced_trace_is_one_shot() {
    let spy = raw_spy();
    let logger = Logger::builder("root")
        .sink(spy.clone())
        .stack_provider(fixed(vec![frame(Some("main"), None, false, Some("/app/main.rs"), Some(1))]))
        .build()
        .unwrap();

    logger.force_stack_trace(true);
    logger.info("traced");
    logger.info("plain");

    let records = spy.records();
    assert!(records[0].meta.logged_at.is_some());
    assert!(records[1].meta.logged_at.is_none());
}

#[test]
fn forced_off_suppresses_one_trace() {
    let spy = raw_spy();
    let logger = Logger::builder("root").sink(spy.clone()).build().unwrap();

    logger.force_stack_trace(false);
    logger.error("untraced");
    logger.error("traced");

    let records = spy.records();
    assert!(records[0].meta.logged_at.is_none());
    assert!(records[1].meta.logged_at.is_some());
}

#[test]
fn gated_calls_do_not_consume_forced_trace() {
    let spy = raw_spy();
    let logger = Logger::builder("root")
        .sink(spy.clone())
        .min_level(LogLevel::WARN)
        .build()
        .unwrap();

    logger.force_stack_trace(true);
    logger.info("dropped");
    logger.warn("traced");

    assert_eq!(spy.len(), 1);
    assert!(spy.records()[0].meta.logged_at.is_some());
}

#[test]
fn child_snapshots_parent() {
    let spy = raw_spy();
    let parent = Logger::builder("root")
        .sink(spy.clone())
        .min_level(LogLevel::INFO)
        .trace_depth(3)
        .build()
        .unwrap();
    let child = parent.child("db").build().unwrap();

    assert_eq!(child.path(), "root/db");
    assert_eq!(child.min_level(), LogLevel::INFO);
    assert_eq!(child.trace_depth(), 3);
    assert!(Arc::ptr_eq(&child.sink(), &parent.sink()));

    parent.set_min_level(LogLevel::ERROR);
    parent.apply_styles([("INFO", Style::new(Color::Magenta, &[]))]);
    assert_eq!(child.min_level(), LogLevel::INFO);
    assert_eq!(child.styles().get("INFO").and_then(|s| s.color), Some(Color::Green));

    child.info("still logged");
    assert_eq!(spy.len(), 1);
    assert_eq!(spy.records()[0].meta.logger, "root/db");
}

#[test]
fn child_overrides_and_name_check() {
    let parent = Logger::builder("root").sink(raw_spy()).build().unwrap();
    let child = parent
        .child("net")
        .min_level(LogLevel::DEBUG)
        .build()
        .unwrap();
    assert_eq!(child.min_level(), LogLevel::DEBUG);
    assert_eq!(parent.min_level(), LogLevel::FINE);

    let grandchild = child.child("tcp").build().unwrap();
    assert_eq!(grandchild.path(), "root/net/tcp");

    assert!(matches!(parent.child("").build(), Err(Error::EmptyName(_))));
}

#[test]
fn call_site_trace_renders_frames() {
    let spy = raw_spy();
    let logger = Logger::builder("root")
        .sink(spy.clone())
        .trace_depth(2)
        .stack_provider(fixed(vec![
            frame(Some("new"), Some("Pool"), true, Some("/app/src/pool.rs"), Some(12)),
            frame(None, None, false, None, None),
            frame(Some("main"), None, false, Some("/app/src/main.rs"), Some(3)),
        ]))
        .build()
        .unwrap();

    logger.error("boom");

    assert_eq!(
        raw_text(&spy, 0),
        "\nboom\nLogged at Pool::new in /app/src/pool.rs:12\n       at [[Lambda Function]] in <unknown>\n\n"
    );
    let site = spy.records()[0].meta.logged_at.clone().unwrap();
    assert_eq!(site.caller, "Pool::new");
    assert_eq!(site.source, "/app/src/pool.rs:12");
}

#[test]
fn zero_depth_still_records_call_site() {
    let spy = raw_spy();
    let logger = Logger::builder("root")
        .sink(spy.clone())
        .trace_depth(0)
        .stack_provider(fixed(vec![frame(Some("run"), None, false, Some("/app/run.rs"), Some(9))]))
        .build()
        .unwrap();

    logger.error("boom");

    assert_eq!(raw_text(&spy, 0), "\nboom\n\n");
    assert_eq!(spy.records()[0].meta.logged_at.clone().unwrap().caller, "run");
}

#[test]
fn failure_is_always_traced_with_origin() {
    let spy = raw_spy();
    let logger = Logger::builder("root")
        .sink(spy.clone())
        .stack_provider(fixed(vec![frame(Some("main"), None, false, Some("/app/src/main.rs"), Some(3))]))
        .build()
        .unwrap();

    let failure = Failure::with_frames(
        "disk full",
        vec![frame(Some("save"), Some("Store"), false, Some("/app/src/store.rs"), Some(40))],
    );
    logger.warn(failure);

    assert_eq!(
        raw_text(&spy, 0),
        "\ndisk full\nLogged at main in /app/src/main.rs:3\nThrown at Store.save in /app/src/store.rs:40\n\n"
    );
    let meta = &spy.records()[0].meta;
    assert_eq!(meta.logged_at.as_ref().unwrap().caller, "main");
    let origin = meta.error_at.as_ref().unwrap();
    assert_eq!(origin.caller, "Store.save");
    assert_eq!(origin.source, "/app/src/store.rs:40");
}

#[test]
fn failure_frames_respect_error_depth() {
    let spy = raw_spy();
    let logger = Logger::builder("root")
        .sink(spy.clone())
        .error_depth(2)
        .stack_provider(fixed(vec![frame(Some("main"), None, false, Some("/m.rs"), Some(1))]))
        .build()
        .unwrap();

    let failure = Failure::with_frames(
        "f",
        vec![
            frame(Some("a"), None, false, Some("/a.rs"), Some(1)),
            frame(Some("b"), None, false, Some("/b.rs"), Some(2)),
            frame(Some("c"), None, false, Some("/c.rs"), Some(3)),
        ],
    );
    logger.error(failure);

    let text = raw_text(&spy, 0);
    assert!(text.contains("Thrown at a in /a.rs:1\n"));
    assert!(text.contains("       at b in /b.rs:2\n"));
    assert!(!text.contains("/c.rs"));
}

#[test]
fn failure_without_frames_gets_sentinels() {
    let spy = raw_spy();
    let logger = Logger::builder("root").sink(spy.clone()).build().unwrap();

    logger.error(Failure::with_frames("lost", Vec::new()));

    let origin = spy.records()[0].meta.error_at.clone().unwrap();
    assert_eq!(origin.caller, "<unknown>");
    assert_eq!(origin.source, "<unknown>");
}

#[test]
fn captured_failure_points_here() {
    let spy = raw_spy();
    let logger = Logger::builder("root").sink(spy.clone()).build().unwrap();

    logger.error(Failure::new("created here"));

    let origin = spy.records()[0].meta.error_at.clone().unwrap();
    assert!(!origin.source.starts_with("<unknown>"));
}

#[test]
fn empty_stack_falls_back_to_caller_location() {
    let spy = raw_spy();
    let logger = Logger::builder("root")
        .sink(spy.clone())
        .stack_provider(fixed(Vec::new()))
        .build()
        .unwrap();

    logger.error("here");

    let site = spy.records()[0].meta.logged_at.clone().unwrap();
    assert_eq!(site.caller, "[[Lambda Function]]");
    assert!(site.source.contains("logger.rs:"));
}

#[test]
fn user_metadata_only_when_supplied() {
    let spy = raw_spy();
    let logger = Logger::builder("root").sink(spy.clone()).build().unwrap();

    logger.info("a");
    logger.log_with("b", &LogLevel::INFO, json!({"request": 7}));
    logger.log_with("c", &LogLevel::INFO, serde_json::Value::Null);

    let records = spy.records();
    assert_eq!(records[0].meta.metadata, None);
    assert_eq!(records[1].meta.metadata, Some(json!({"request": 7})));
    assert_eq!(records[2].meta.metadata, Some(serde_json::Value::Null));
}

#[test]
fn metadata_describes_the_call() {
    let spy = raw_spy();
    let logger = Logger::builder("svc").sink(spy.clone()).build().unwrap();

    logger.warn("careful");

    let meta = &spy.records()[0].meta;
    assert_eq!(meta.logger, "svc");
    assert_eq!(meta.log_level, "WARN");
    assert_eq!(meta.log_level_id, 30);
    assert!(meta.timestamp.ends_with('Z'));
    assert_eq!(meta.timestamp.len(), "2024-01-01T00:00:00.000Z".len());
}

#[test]
fn raw_only_sink_never_sees_escape_codes() {
    let spy = raw_spy();
    let logger = Logger::builder("root").sink(spy.clone()).build().unwrap();

    logger.error("styled in a terminal");

    let record = &spy.records()[0];
    assert_eq!(record.pretty, None);
    assert!(!raw_text(&spy, 0).contains('\x1b'));
}

#[test]
fn pretty_only_sink_gets_styles() {
    let spy = Arc::new(MemoryOutput::new(true, false));
    let logger = Logger::builder("root").sink(spy.clone()).build().unwrap();

    logger.info("x");
    logger.log("y", &LogLevel::new("NOTICE", 25));

    let records = spy.records();
    assert_eq!(records[0].raw, None);
    assert_eq!(records[0].pretty, Some(Payload::from("\x1b[32mx\x1b[0m\n")));
    assert_eq!(records[1].pretty, Some(Payload::from("y\x1b[0m\n")));
}

#[test]
fn style_overrides_merge() {
    let spy = Arc::new(MemoryOutput::new(true, false));
    let logger = Logger::builder("root")
        .sink(spy.clone())
        .styles([("INFO", Style { color: None, mods: vec![loggamus::Modifier::Underline] })])
        .build()
        .unwrap();

    logger.info("x");

    assert_eq!(
        spy.records()[0].pretty,
        Some(Payload::from("\x1b[32m\x1b[4mx\x1b[0m\n"))
    );
}

#[test]
fn set_sink_rejects_channel_less_sinks() {
    let spy = raw_spy();
    let logger = Logger::builder("root").sink(spy.clone()).build().unwrap();

    let result = logger.set_sink(Arc::new(MemoryOutput::new(false, false)));
    assert!(matches!(result, Err(Error::NoChannels)));

    logger.info("still bound");
    assert_eq!(spy.len(), 1);
}

struct Broken {
    attempts: AtomicUsize,
}

impl Sink for Broken {
    fn uses_pretty(&self) -> bool {
        false
    }

    fn uses_raw(&self) -> bool {
        true
    }

    fn write(&self, _: Option<&Payload>, _: Option<&Payload>, _: &Metadata) -> Result<(), Error> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(Error::Io(std::io::Error::other("disk gone")))
    }
}

#[test]
fn sink_failures_do_not_escape_log_calls() {
    let broken = Arc::new(Broken {
        attempts: AtomicUsize::new(0),
    });
    let logger = Logger::builder("root")
        .sink(broken.clone() as SharedSink)
        .build()
        .unwrap();

    logger.info("one");
    logger.info("two");

    assert_eq!(broken.attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn concurrent_calls_stay_whole() {
    let spy = raw_spy();
    let logger = Arc::new(Logger::builder("root").sink(spy.clone()).build().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    logger.info(format!("t{t}-{i}"));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let records = spy.records();
    assert_eq!(records.len(), 200);
    for record in records {
        let text = record.raw.unwrap().as_text().into_owned();
        assert!(text.starts_with('t'));
        assert_eq!(text.matches('\n').count(), 1);
    }
}

/// Logs through `logger` (once set) on every write, then records the write.
struct Echo {
    logger: OnceLock<Arc<Logger>>,
    spy: Arc<MemoryOutput>,
}

impl Echo {
    fn new(spy: Arc<MemoryOutput>) -> Arc<Self> {
        Arc::new(Self {
            logger: OnceLock::new(),
            spy,
        })
    }
}

impl Sink for Echo {
    fn uses_pretty(&self) -> bool {
        false
    }

    fn uses_raw(&self) -> bool {
        true
    }

    fn write(&self, pretty: Option<&Payload>, raw: Option<&Payload>, meta: &Metadata) -> Result<(), Error> {
        if let Some(logger) = self.logger.get() {
            logger.info("echo");
        }
        self.spy.write(pretty, raw, meta)
    }
}

#[test]
fn logging_from_own_sink_is_dropped() {
    let spy = raw_spy();
    let echo = Echo::new(spy.clone());
    let logger = Arc::new(Logger::builder("root").sink(echo.clone()).build().unwrap());
    echo.logger.set(logger.clone()).unwrap();

    logger.info("outer");
    logger.info("again");

    let texts: Vec<_> = (0..spy.len()).map(|i| raw_text(&spy, i)).collect();
    assert_eq!(texts, vec!["outer\n", "again\n"]);
}

#[test]
fn sinks_may_log_through_other_loggers() {
    let audit_spy = raw_spy();
    let audit = Arc::new(Logger::builder("audit").sink(audit_spy.clone()).build().unwrap());

    let spy = raw_spy();
    let echo = Echo::new(spy.clone());
    echo.logger.set(audit).unwrap();
    let logger = Logger::builder("root").sink(echo).build().unwrap();

    logger.info("one");
    logger.info("two");

    assert_eq!(spy.len(), 2);
    assert_eq!(audit_spy.len(), 2);
    assert_eq!(audit_spy.records()[0].meta.logger, "audit");
}
