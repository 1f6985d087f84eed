//! Assembles registries from a [`Document`], bottom up: outputs, then pipes,
//! then loggers, then the default.
//!
//! Assembly stops at the first error. Whatever was registered before the
//! failure stays registered.

use crate::Error;
use crate::config::{Document, DownstreamEntry, LoggerEntry};
use crate::global;
use crate::internal;
use crate::level::LogLevel;
use crate::logger::{Logger, LoggerBuilder};
use crate::registry::{NAMESPACE, Registries};
use crate::sink::SharedSink;
use serde_json::Value;
use std::sync::Arc;

const OUTPUT: &str = "output";
const PIPE: &str = "pipe";

/// Builds sinks and loggers described by a configuration document.
pub struct Factory;

impl Factory {
    /// Assembles every component of `doc` into `registries` and installs the
    /// named default logger, both there and process-wide.
    ///
    /// # Errors
    /// Empty documents, unknown builders or names, malformed entries,
    /// duplicate names and builder failures.
    pub fn assemble(registries: &mut Registries, doc: &Document) -> Result<(), Error> {
        if doc.component_count() == 0 {
            return Err(Error::EmptyDocument);
        }
        internal::debug(
            "FACTORY",
            &format!(
                "Assembling {} outputs, {} pipes, {} loggers",
                doc.outputs.len(),
                doc.pipes.len(),
                doc.loggers.len()
            ),
        );

        for (name, entry) in &doc.outputs {
            Self::build_output(registries, &entry.class, &entry.options, Some(name))?;
        }

        for (name, entry) in &doc.pipes {
            if let Some(kind) = &entry.kind {
                internal::warn("FACTORY", &format!("Top level pipe \"{name}\" declares type \"{kind}\""));
                return Err(Error::TopLevelPipeType(name.clone()));
            }
            Self::build_pipe_entry(registries, entry, Some(name))?;
        }

        for (name, entry) in &doc.loggers {
            Self::build_logger(registries, name, entry, None)?;
        }

        if let Some(name) = &doc.default {
            let logger = registries.set_default(name)?;
            global::set_default(logger);
            internal::info("FACTORY", &format!("Default logger is now \"{name}\""));
        }
        Ok(())
    }

    /// Runs an output builder, registering the result under `name` if given.
    ///
    /// # Errors
    /// Unknown builder path, builder failure or duplicate name.
    pub fn build_output(
        registries: &mut Registries,
        class: &str,
        options: &Value,
        name: Option<&str>,
    ) -> Result<SharedSink, Error> {
        registries.outputs.build(class, options, Vec::new(), name)
    }

    /// Runs a pipe builder over already-built downstreams.
    ///
    /// # Errors
    /// Unknown builder path, builder failure or duplicate name.
    pub fn build_pipe(
        registries: &mut Registries,
        class: &str,
        options: &Value,
        downstreams: Vec<SharedSink>,
        name: Option<&str>,
    ) -> Result<SharedSink, Error> {
        registries.pipes.build(class, options, downstreams, name)
    }

    /// Resolves a downstream entry: a registered name, or an inline output or
    /// pipe built on the spot.
    ///
    /// # Errors
    /// Unknown type, unresolved name, missing downstreams, builder failures.
    pub fn resolve_downstream(
        registries: &mut Registries,
        entry: &DownstreamEntry,
    ) -> Result<SharedSink, Error> {
        match entry.kind.as_deref() {
            Some(OUTPUT) => match (&entry.name, &entry.class) {
                (Some(name), _) => registries.outputs.get_object(name).ok_or_else(|| {
                    Error::Unresolved {
                        category: "Outputs",
                        name: name.clone(),
                    }
                }),
                (None, Some(class)) => Self::build_output(registries, class, &entry.options, None),
                (None, None) => Err(Error::InvalidOptions {
                    path: OUTPUT.to_string(),
                    reason: "an inline output needs a \"class\"".to_string(),
                }),
            },
            Some(PIPE) => match &entry.name {
                Some(name) => registries.pipes.get_object(name).ok_or_else(|| Error::Unresolved {
                    category: "Pipes",
                    name: name.clone(),
                }),
                None => Self::build_pipe_entry(registries, entry, None),
            },
            other => Err(Error::UnknownDownstreamType(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    fn build_pipe_entry(
        registries: &mut Registries,
        entry: &DownstreamEntry,
        name: Option<&str>,
    ) -> Result<SharedSink, Error> {
        let Some(entries) = &entry.downstreams else {
            return Err(Error::MissingDownstreams(
                name.unwrap_or("<inline>").to_string(),
            ));
        };
        let downstreams = entries
            .iter()
            .map(|d| Self::resolve_downstream(registries, d))
            .collect::<Result<Vec<_>, _>>()?;

        let plain = format!("{NAMESPACE}:Pipe");
        let class = entry.class.as_deref().unwrap_or(&plain);
        Self::build_pipe(registries, class, &entry.options, downstreams, name)
    }

    fn level(registries: &Registries, name: &str) -> Result<LogLevel, Error> {
        registries.levels.get_object(name).ok_or_else(|| Error::Unresolved {
            category: "LogLevels",
            name: name.to_string(),
        })
    }

    /// Builds a logger (forked from `parent` when given), registers it under
    /// its full path, then its children, depth first.
    ///
    /// # Errors
    /// Empty names, unresolved levels or outputs, duplicate paths.
    pub fn build_logger(
        registries: &mut Registries,
        name: &str,
        entry: &LoggerEntry,
        parent: Option<&Logger>,
    ) -> Result<Arc<Logger>, Error> {
        if name.is_empty() {
            return Err(Error::EmptyName("logger"));
        }
        let options = &entry.options;

        let mut builder: LoggerBuilder = match parent {
            Some(parent) => parent.child(name),
            None => Logger::builder(name),
        };
        if let Some(level) = &options.minlevel {
            builder = builder.min_level(Self::level(registries, level)?);
        }
        if let Some(level) = &options.mintrace {
            builder = builder.min_trace(Self::level(registries, level)?);
        }
        if let Some(depth) = options.tracedepth {
            builder = builder.trace_depth(depth);
        }
        if let Some(depth) = options.errordepth {
            builder = builder.error_depth(depth);
        }
        if let Some(output) = &options.output {
            builder = builder.sink(Self::resolve_downstream(registries, output)?);
        }
        builder = builder.styles(options.styles.clone());

        let logger = Arc::new(builder.build()?);
        registries
            .loggers
            .put_object(logger.path(), logger.clone())?;
        internal::debug("FACTORY", &format!("Registered logger \"{}\"", logger.path()));

        for (child, child_entry) in &entry.children {
            Self::build_logger(registries, child, child_entry, Some(&logger))?;
        }
        Ok(logger)
    }
}
