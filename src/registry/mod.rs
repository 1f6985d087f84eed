//! Named-object stores and the builder table the factory assembles from.
//!
//! A [`Registry`] maps names to objects and refuses duplicates. A
//! [`Buildable`] registry additionally maps builder paths (`"ns:Type"`) to
//! closures that turn `(options, downstreams)` into a new object; objects it
//! builds under a name remember the path they came from.

mod builtins;

pub use builtins::{NAMESPACE, register_builtins};

use crate::Error;
use crate::level::LogLevel;
use crate::logger::Logger;
use crate::sink::SharedSink;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Builder closure: options from the document, already-built downstreams.
pub type BuildFn<T> = Arc<dyn Fn(&Value, Vec<SharedSink>) -> Result<T, Error> + Send + Sync>;

/// Builder producing sinks, the only kind the pipeline document uses.
pub type Builder = BuildFn<SharedSink>;

struct Entry<T> {
    object: T,
    builder: Option<String>,
}

/// Objects by name, in registration order.
pub struct Registry<T> {
    category: &'static str,
    objects: IndexMap<String, Entry<T>>,
}

/// What a registry holds: every object name with the builder path it was
/// built from (if any), plus the builder paths of a [`Buildable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub objects: IndexMap<String, Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub builders: Option<Vec<String>>,
}

impl<T: Clone> Registry<T> {
    #[must_use]
    pub fn new(category: &'static str) -> Self {
        Self {
            category,
            objects: IndexMap::new(),
        }
    }

    #[must_use]
    pub const fn category(&self) -> &'static str {
        self.category
    }

    /// # Errors
    /// [`Error::DuplicateName`] if `name` is taken; the existing object is
    /// kept.
    pub fn put_object(&mut self, name: impl Into<String>, object: T) -> Result<(), Error> {
        self.save(name.into(), object, None)
    }

    fn save(&mut self, name: String, object: T, builder: Option<String>) -> Result<(), Error> {
        if self.objects.contains_key(&name) {
            return Err(Error::DuplicateName {
                category: self.category,
                name,
            });
        }
        self.objects.insert(name, Entry { object, builder });
        Ok(())
    }

    /// The object registered under `name`, shared rather than copied for
    /// `Arc` objects.
    #[must_use]
    pub fn get_object(&self, name: &str) -> Option<T> {
        self.objects.get(name).map(|e| e.object.clone())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[must_use]
    pub fn manifest(&self) -> Manifest {
        Manifest {
            objects: self
                .objects
                .iter()
                .map(|(name, e)| (name.clone(), e.builder.clone()))
                .collect(),
            builders: None,
        }
    }
}

/// A [`Registry`] with a builder table.
pub struct Buildable<T> {
    registry: Registry<T>,
    builders: IndexMap<String, BuildFn<T>>,
}

impl<T: Clone> Buildable<T> {
    #[must_use]
    pub fn new(category: &'static str) -> Self {
        Self {
            registry: Registry::new(category),
            builders: IndexMap::new(),
        }
    }

    #[must_use]
    pub const fn objects(&self) -> &Registry<T> {
        &self.registry
    }

    /// # Errors
    /// [`Error::DuplicateName`] if `name` is taken.
    pub fn put_object(&mut self, name: impl Into<String>, object: T) -> Result<(), Error> {
        self.registry.put_object(name, object)
    }

    #[must_use]
    pub fn get_object(&self, name: &str) -> Option<T> {
        self.registry.get_object(name)
    }

    /// # Errors
    /// [`Error::DuplicateBuilder`] if `path` already has a builder.
    pub fn put_builder<F>(&mut self, path: impl Into<String>, builder: F) -> Result<(), Error>
    where
        F: Fn(&Value, Vec<SharedSink>) -> Result<T, Error> + Send + Sync + 'static,
    {
        let path = path.into();
        if self.builders.contains_key(&path) {
            return Err(Error::DuplicateBuilder {
                category: self.registry.category,
                path,
            });
        }
        self.builders.insert(path, Arc::new(builder));
        Ok(())
    }

    /// The builder at `path`. A missing builder is `Ok(None)`, or
    /// [`Error::MissingBuilder`] when `fail_if_missing` is set.
    ///
    /// # Errors
    /// See above.
    pub fn get_builder(&self, path: &str, fail_if_missing: bool) -> Result<Option<BuildFn<T>>, Error> {
        match self.builders.get(path) {
            Some(b) => Ok(Some(b.clone())),
            None if fail_if_missing => Err(Error::MissingBuilder {
                category: self.registry.category,
                path: path.to_string(),
            }),
            None => Ok(None),
        }
    }

    /// Runs the builder at `path` and, with a `name`, registers the result
    /// under it.
    ///
    /// # Errors
    /// A missing builder, whatever the builder returns, or a duplicate name.
    pub fn build(
        &mut self,
        path: &str,
        options: &Value,
        downstreams: Vec<SharedSink>,
        name: Option<&str>,
    ) -> Result<T, Error> {
        let builder = self
            .get_builder(path, true)?
            .ok_or_else(|| Error::MissingBuilder {
                category: self.registry.category,
                path: path.to_string(),
            })?;
        let object = builder(options, downstreams)?;
        if let Some(name) = name {
            self.registry
                .save(name.to_string(), object.clone(), Some(path.to_string()))?;
        }
        Ok(object)
    }

    #[must_use]
    pub fn manifest(&self) -> Manifest {
        Manifest {
            builders: Some(self.builders.keys().cloned().collect()),
            ..self.registry.manifest()
        }
    }
}

/// Every registry the factory reads and writes, plus the default logger.
pub struct Registries {
    pub loggers: Registry<Arc<Logger>>,
    pub levels: Registry<LogLevel>,
    pub pipes: Buildable<SharedSink>,
    pub outputs: Buildable<SharedSink>,
    default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistriesManifest {
    pub loggers: Manifest,
    pub levels: Manifest,
    pub pipes: Manifest,
    pub outputs: Manifest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

impl Registries {
    /// Empty registries, except for the built-in levels.
    #[must_use]
    pub fn new() -> Self {
        let mut levels = Registry::new("LogLevels");
        for level in LogLevel::builtins() {
            levels.objects.insert(
                level.name().to_string(),
                Entry {
                    object: level,
                    builder: None,
                },
            );
        }
        Self {
            loggers: Registry::new("Loggers"),
            levels,
            pipes: Buildable::new("Pipes"),
            outputs: Buildable::new("Outputs"),
            default: None,
        }
    }

    /// [`Registries::new`] plus the built-in builders under [`NAMESPACE`].
    ///
    /// # Errors
    /// Never with fresh registries; kept fallible because registration is.
    pub fn with_builtins() -> Result<Self, Error> {
        let mut registries = Self::new();
        register_builtins(&mut registries)?;
        Ok(registries)
    }

    #[must_use]
    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    #[must_use]
    pub fn default_logger(&self) -> Option<Arc<Logger>> {
        self.default
            .as_deref()
            .and_then(|name| self.loggers.get_object(name))
    }

    /// # Errors
    /// [`Error::Unresolved`] if no logger is registered under `name`.
    pub fn set_default(&mut self, name: &str) -> Result<Arc<Logger>, Error> {
        let logger = self.loggers.get_object(name).ok_or_else(|| Error::Unresolved {
            category: "Loggers",
            name: name.to_string(),
        })?;
        self.default = Some(name.to_string());
        Ok(logger)
    }

    #[must_use]
    pub fn manifest(&self) -> RegistriesManifest {
        RegistriesManifest {
            loggers: self.loggers.manifest(),
            levels: self.levels.manifest(),
            pipes: self.pipes.manifest(),
            outputs: self.outputs.manifest(),
            default: self.default.clone(),
        }
    }
}
