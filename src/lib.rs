#![forbid(unsafe_code)]

//! `loggamus` - structured logging through a declarative sink graph.
//!
//! A [`Logger`] turns each call into styled text, raw text and a [`Metadata`]
//! record, optionally annotated with where the call (and, for a [`Failure`],
//! the failure) came from. The result flows into a graph of sinks:
//! - outputs (terminal, file, memory) that declare which text they consume
//! - pipes, filters, mappers and transformers that route and rewrite it
//! - a registry and factory that assemble the graph from JSON or TOML
//!
//! # Example
//!
//! ```
//! use loggamus::{Logger, LogLevel, Mapper, MemoryOutput, SharedSink};
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemoryOutput::new(false, true));
//! let json: SharedSink = Arc::new(Mapper::to_json(vec![memory.clone() as SharedSink]));
//!
//! let logger = Logger::builder("app")
//!     .sink(json)
//!     .min_level(LogLevel::INFO)
//!     .build()
//!     .unwrap();
//!
//! logger.debug("dropped below INFO");
//! logger.info("Application started");
//!
//! assert_eq!(memory.len(), 1);
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `loggamus` binary (`check`, `log`)

pub mod config;
pub mod factory;
pub mod fmt;
pub mod global;
pub mod internal;
pub mod level;
pub mod logger;
pub mod output;
pub mod printer;
pub mod registry;
pub mod sink;
pub mod stack;

mod error;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::Document;
pub use error::Error;
pub use factory::Factory;
pub use fmt::{Color, Modifier, Style, StyleMap};
pub use level::LogLevel;
pub use logger::{Failure, Logger, LoggerBuilder, Message};
pub use output::{Captured, FileOutput, MemoryOutput, TerminalOutput};
pub use printer::{Buffer, Printer};
pub use registry::{Buildable, Registries, Registry};
pub use sink::{CallSite, Filter, Mapper, Metadata, Payload, Pipe, SharedSink, Sink, Transformer};
pub use stack::{BacktraceProvider, StackFrame, StackProvider};
