//! Tests for sink graph routing: pipes, mappers, transformers and filters.

use loggamus::sink::predicate::{self, Comparison};
use loggamus::{
    Error, Filter, LogLevel, Logger, Mapper, MemoryOutput, Metadata, Payload, Pipe, SharedSink,
    Sink, Transformer,
};
use serde_json::{Value, json};
use std::sync::Arc;

fn meta(level: &LogLevel) -> Metadata {
    Metadata::new("root", level)
}

fn text(p: &str) -> Payload {
    Payload::from(p)
}

#[test]
fn pipe_derives_channel_flags_from_children() {
    let raw = Arc::new(MemoryOutput::new(false, true));
    let pretty = Arc::new(MemoryOutput::new(true, false));

    let only_raw = Pipe::new(vec![raw.clone() as SharedSink]);
    assert!(!only_raw.uses_pretty());
    assert!(only_raw.uses_raw());

    let both = Pipe::new(vec![raw as SharedSink, pretty as SharedSink]);
    assert!(both.uses_pretty());
    assert!(both.uses_raw());

    let empty = Pipe::new(Vec::new());
    assert!(!empty.uses_pretty());
    assert!(!empty.uses_raw());
}

#[test]
fn flags_propagate_through_nested_nodes() {
    let raw = Arc::new(MemoryOutput::new(false, true));
    let mapper = Mapper::to_json(vec![
        Arc::new(Pipe::new(vec![raw as SharedSink])) as SharedSink,
    ]);
    assert!(!mapper.uses_pretty());
    assert!(mapper.uses_raw());
}

#[test]
fn logger_behind_raw_only_graph_never_styles() {
    let raw = Arc::new(MemoryOutput::new(false, true));
    let graph: SharedSink = Arc::new(Pipe::new(vec![raw.clone() as SharedSink]));
    let logger = Logger::builder("root").sink(graph).build().unwrap();

    logger.warn("plain please");

    let record = &raw.records()[0];
    assert_eq!(record.pretty, None);
    assert_eq!(record.raw, Some(text("plain please\n")));
}

#[test]
fn pipe_writes_every_child_and_reports_first_error() {
    struct Failing(&'static str);

    impl Sink for Failing {
        fn uses_pretty(&self) -> bool {
            false
        }
        fn uses_raw(&self) -> bool {
            true
        }
        fn write(&self, _: Option<&Payload>, _: Option<&Payload>, _: &Metadata) -> Result<(), Error> {
            Err(Error::InvalidOptions {
                path: self.0.to_string(),
                reason: "fails".to_string(),
            })
        }
    }

    let first = Arc::new(MemoryOutput::new(false, true));
    let last = Arc::new(MemoryOutput::new(false, true));
    let pipe = Pipe::new(vec![
        first.clone() as SharedSink,
        Arc::new(Failing("a")) as SharedSink,
        Arc::new(Failing("b")) as SharedSink,
        last.clone() as SharedSink,
    ]);

    let result = pipe.write(None, Some(&text("x")), &meta(&LogLevel::INFO));

    assert!(matches!(result, Err(Error::InvalidOptions { ref path, .. }) if path == "a"));
    assert_eq!(first.len(), 1);
    assert_eq!(last.len(), 1);
}

#[test]
fn json_mapper_merges_metadata_and_message() {
    let raw = Arc::new(MemoryOutput::new(false, true));
    let mapper = Mapper::to_json(vec![raw.clone() as SharedSink]);

    let mut m = meta(&LogLevel::INFO);
    m.metadata = Some(json!({"user": "ada"}));
    mapper.write(None, Some(&text("hello")), &m).unwrap();

    let Some(Payload::Text(encoded)) = raw.records()[0].raw.clone() else {
        panic!("expected text");
    };
    let value: Value = serde_json::from_str(&encoded).unwrap();
    assert_eq!(value["message"], "hello");
    assert_eq!(value["logger"], "root");
    assert_eq!(value["log_level"], "INFO");
    assert_eq!(value["log_level_id"], 20);
    assert_eq!(value["metadata"]["user"], "ada");
    assert!(value.get("logged_at").is_none());
}

#[test]
fn object_mapper_emits_structured_payload() {
    let raw = Arc::new(MemoryOutput::new(false, true));
    let mapper = Mapper::to_object(vec![raw.clone() as SharedSink]);

    mapper.write(None, Some(&text("hi")), &meta(&LogLevel::WARN)).unwrap();

    let Some(Payload::Object(value)) = raw.records()[0].raw.clone() else {
        panic!("expected an object");
    };
    assert_eq!(value["message"], "hi");
    assert_eq!(value["log_level"], "WARN");
}

#[test]
fn mapper_skips_empty_and_unused_channels() {
    let raw = Arc::new(MemoryOutput::new(false, true));
    let mapper = Mapper::to_plain_text(vec![raw.clone() as SharedSink]);
    let m = meta(&LogLevel::INFO);

    mapper.write(Some(&text("styled")), Some(&text("")), &m).unwrap();
    let record = &raw.records()[0];
    assert_eq!(record.pretty, None);
    assert_eq!(record.raw, None);
}

#[test]
fn custom_mapper_rewrites_each_channel() {
    let out = Arc::new(MemoryOutput::dual());
    let mapper = Mapper::custom(
        |p, m| Payload::Text(format!("[{}] {p}", m.log_level)),
        vec![out.clone() as SharedSink],
    );

    mapper
        .write(Some(&text("a")), Some(&text("b")), &meta(&LogLevel::DEBUG))
        .unwrap();

    let record = &out.records()[0];
    assert_eq!(record.pretty, Some(text("[DEBUG] a")));
    assert_eq!(record.raw, Some(text("[DEBUG] b")));
}

#[test]
fn metadata_header_frames_the_text() {
    let raw = Arc::new(MemoryOutput::new(false, true));
    let header = Transformer::metadata_header(vec![raw.clone() as SharedSink]);

    header.write(None, Some(&text("body")), &meta(&LogLevel::INFO)).unwrap();

    let out = raw.records()[0].raw.clone().unwrap().as_text().into_owned();
    let rule = "*".repeat(80);
    assert!(out.starts_with(&format!("{rule}\n{{")));
    assert!(out.contains(&format!("{}\nbody\n{rule}\n\n\n", "-".repeat(80))));
    assert!(out.contains("\"log_level\": \"INFO\""));
}

#[test]
fn transformer_follows_mapper_gating() {
    let pretty = Arc::new(MemoryOutput::new(true, false));
    let transformer = Transformer::custom(
        |p, _| Payload::Text(p.as_text().to_uppercase()),
        vec![pretty.clone() as SharedSink],
    );

    transformer
        .write(Some(&text("loud")), Some(&text("dropped")), &meta(&LogLevel::INFO))
        .unwrap();

    let record = &pretty.records()[0];
    assert_eq!(record.pretty, Some(text("LOUD")));
    assert_eq!(record.raw, None);
}

#[test]
fn filter_routes_by_level() {
    let errors = Arc::new(MemoryOutput::new(false, true));
    let everything = Arc::new(MemoryOutput::new(false, true));
    let graph: SharedSink = Arc::new(Pipe::new(vec![
        Arc::new(Filter::new(
            predicate::loglevel(Comparison::Ge, &LogLevel::ERROR),
            vec![errors.clone() as SharedSink],
        )) as SharedSink,
        everything.clone() as SharedSink,
    ]));
    let logger = Logger::builder("root")
        .sink(graph)
        .min_trace(LogLevel::MAX)
        .build()
        .unwrap();

    logger.info("routine");
    logger.warn("suspicious");
    logger.error("broken");

    assert_eq!(everything.len(), 3);
    let errors = errors.records();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].raw, Some(text("broken\n")));
}

#[test]
fn rejecting_filter_reaches_no_descendant() {
    let out = Arc::new(MemoryOutput::dual());
    let filter = Filter::new(
        predicate::meta("logger").is("other"),
        vec![Arc::new(Mapper::to_json(vec![out.clone() as SharedSink])) as SharedSink],
    );

    filter
        .write(Some(&text("a")), Some(&text("b")), &meta(&LogLevel::FATAL))
        .unwrap();

    assert!(out.is_empty());
}

#[test]
fn one_filter_feeds_two_outputs_identically() {
    let left = Arc::new(MemoryOutput::dual());
    let right = Arc::new(MemoryOutput::new(false, true));
    let filter: SharedSink = Arc::new(Filter::new(
        predicate::loglevel(Comparison::Ge, &LogLevel::new("threshold", 30)),
        vec![left.clone() as SharedSink, right.clone() as SharedSink],
    ));
    let logger = Logger::builder("root").sink(filter).build().unwrap();

    logger.fine("f");
    logger.debug("d");
    logger.info("i");
    logger.warn("w");
    logger.error("e");
    logger.fatal("x");

    let levels = |out: &MemoryOutput| -> Vec<String> {
        out.records().into_iter().map(|r| r.meta.log_level).collect()
    };
    assert_eq!(levels(&left), vec!["WARN", "ERROR", "FATAL"]);
    assert_eq!(levels(&right), levels(&left));

    for (l, r) in left.records().iter().zip(right.records().iter()) {
        assert_eq!(l.raw, r.raw);
        assert_eq!(l.meta, r.meta);
    }
}
