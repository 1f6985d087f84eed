//! Builders shipped with the crate, registered under [`NAMESPACE`].
//!
//! | path                                   | registry | options                              |
//! |----------------------------------------|----------|--------------------------------------|
//! | `loggamus:Output.Terminal`             | outputs  | `{colors?: bool, stream?: "stdout" \| "stderr"}` |
//! | `loggamus:Output.File`                 | outputs  | `{path}` or the path as a string     |
//! | `loggamus:Output.Memory`               | outputs  | `{pretty?: bool, raw?: bool}`        |
//! | `loggamus:Pipe`                        | pipes    | none                                 |
//! | `loggamus:Filter`                      | pipes    | a predicate, e.g. `{"loglevel": ..}` |
//! | `loggamus:Mapper.ToPlainText`          | pipes    | none                                 |
//! | `loggamus:Mapper.ToObject`             | pipes    | none                                 |
//! | `loggamus:Mapper.ToJSON`               | pipes    | none                                 |
//! | `loggamus:Transformer.MetadataHeader`  | pipes    | none                                 |

use super::Registries;
use crate::Error;
use crate::output::{FileOutput, MemoryOutput, TerminalOutput};
use crate::sink::predicate::PredicateSpec;
use crate::sink::{Filter, Mapper, Pipe, SharedSink, Transformer};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const NAMESPACE: &str = "loggamus";

fn path(name: &str) -> String {
    format!("{NAMESPACE}:{name}")
}

fn invalid(name: &str, reason: impl ToString) -> Error {
    Error::InvalidOptions {
        path: path(name),
        reason: reason.to_string(),
    }
}

/// Null options read as an empty object, so every field takes its default.
fn options<T: for<'de> Deserialize<'de> + Default>(name: &str, value: &Value) -> Result<T, Error> {
    if value.is_null() {
        return Ok(T::default());
    }
    T::deserialize(value).map_err(|e| invalid(name, e))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StreamName {
    #[default]
    Stdout,
    Stderr,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct TerminalOptions {
    colors: bool,
    stream: StreamName,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            colors: true,
            stream: StreamName::Stdout,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MemoryOptions {
    pretty: bool,
    raw: bool,
}

impl Default for MemoryOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            raw: true,
        }
    }
}

fn file_path(value: &Value) -> Result<String, Error> {
    const NAME: &str = "Output.File";
    match value {
        Value::String(p) => Ok(p.clone()),
        Value::Object(map) => match map.get("path") {
            Some(Value::String(p)) => Ok(p.clone()),
            Some(other) => Err(invalid(NAME, format!("\"path\" must be a string, got {other}"))),
            None => Err(Error::MissingOutputPath),
        },
        Value::Null => Err(Error::MissingOutputPath),
        other => Err(invalid(NAME, format!("expected a path, got {other}"))),
    }
}

fn outputs(registries: &mut Registries) -> Result<(), Error> {
    let outputs = &mut registries.outputs;

    outputs.put_builder(path("Output.Terminal"), |opts: &Value, _| {
        let o: TerminalOptions = options("Output.Terminal", opts)?;
        let out = match o.stream {
            StreamName::Stdout => TerminalOutput::new(),
            StreamName::Stderr => TerminalOutput::stderr(),
        };
        Ok(Arc::new(out.colors(o.colors)) as SharedSink)
    })?;

    outputs.put_builder(path("Output.File"), |opts: &Value, _| {
        Ok(Arc::new(FileOutput::new(file_path(opts)?)?) as SharedSink)
    })?;

    outputs.put_builder(path("Output.Memory"), |opts: &Value, _| {
        let o: MemoryOptions = options("Output.Memory", opts)?;
        Ok(Arc::new(MemoryOutput::new(o.pretty, o.raw)) as SharedSink)
    })?;

    Ok(())
}

fn pipes(registries: &mut Registries) -> Result<(), Error> {
    let pipes = &mut registries.pipes;

    pipes.put_builder(path("Pipe"), |_: &Value, downstreams| {
        Ok(Arc::new(Pipe::new(downstreams)) as SharedSink)
    })?;

    pipes.put_builder(path("Filter"), |opts: &Value, downstreams| {
        if opts.is_null() {
            return Err(invalid("Filter", "a predicate is required"));
        }
        let spec = PredicateSpec::deserialize(opts).map_err(|e| invalid("Filter", e))?;
        Ok(Arc::new(Filter::new(spec.compile()?, downstreams)) as SharedSink)
    })?;

    pipes.put_builder(path("Mapper.ToPlainText"), |_: &Value, downstreams| {
        Ok(Arc::new(Mapper::to_plain_text(downstreams)) as SharedSink)
    })?;

    pipes.put_builder(path("Mapper.ToObject"), |_: &Value, downstreams| {
        Ok(Arc::new(Mapper::to_object(downstreams)) as SharedSink)
    })?;

    pipes.put_builder(path("Mapper.ToJSON"), |_: &Value, downstreams| {
        Ok(Arc::new(Mapper::to_json(downstreams)) as SharedSink)
    })?;

    pipes.put_builder(path("Transformer.MetadataHeader"), |_: &Value, downstreams| {
        Ok(Arc::new(Transformer::metadata_header(downstreams)) as SharedSink)
    })?;

    Ok(())
}

/// Registers every built-in builder.
///
/// # Errors
/// [`Error::DuplicateBuilder`] if any built-in path is already taken.
pub fn register_builtins(registries: &mut Registries) -> Result<(), Error> {
    outputs(registries)?;
    pipes(registries)
}
