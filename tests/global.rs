//! Tests for the process-wide default logger.

use loggamus::global;
use loggamus::{LogLevel, Logger, MemoryOutput};
use serde_json::json;
use std::sync::Arc;

// One test, since the default is process-wide.
#[test]
fn default_logger_lifecycle() {
    let spy = Arc::new(MemoryOutput::new(false, true));
    let first = Arc::new(
        Logger::builder("first")
            .sink(spy.clone())
            .min_trace(LogLevel::MAX)
            .build()
            .unwrap(),
    );

    let installed = global::init(first.clone());
    assert!(Arc::ptr_eq(&installed, &first));
    assert!(Arc::ptr_eq(&global::default_logger(), &first));

    let second = Arc::new(Logger::builder("second").sink(spy.clone()).build().unwrap());
    let kept = global::init(second.clone());
    assert!(Arc::ptr_eq(&kept, &first));

    global::info("via default");
    global::log_with("with meta", &LogLevel::WARN, json!({"id": 1}));
    global::fine("fine too");

    let records = spy.records();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.meta.logger == "first"));
    assert_eq!(records[1].meta.metadata, Some(json!({"id": 1})));

    let previous = global::set_default(second.clone()).unwrap();
    assert!(Arc::ptr_eq(&previous, &first));
    global::error("now second");
    let last = spy.records().pop().unwrap();
    assert_eq!(last.meta.logger, "second");
    assert!(last.meta.logged_at.is_some());
}
