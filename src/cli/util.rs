//! Helpers shared by the subcommands.

use crate::Error;
use crate::config::Document;
use crate::factory::Factory;
use crate::level::LogLevel;
use crate::registry::Registries;

/// Loads `path` and assembles it into fresh registries with the built-in
/// builders.
///
/// # Errors
/// Load, parse or assembly failures.
pub fn assemble(path: &str) -> Result<Registries, Error> {
    let doc = Document::load(path)?;
    let mut registries = Registries::with_builtins()?;
    Factory::assemble(&mut registries, &doc)?;
    Ok(registries)
}

/// A registered level by exact name, then a built-in one by any case.
///
/// # Errors
/// [`Error::InvalidLevel`] if neither matches.
pub fn resolve_level(registries: &Registries, name: &str) -> Result<LogLevel, Error> {
    if let Some(level) = registries.levels.get_object(name) {
        return Ok(level);
    }
    name.parse()
        .map_err(|_| Error::InvalidLevel(name.to_string()))
}
