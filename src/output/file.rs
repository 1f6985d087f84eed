//! Append-only file output.

use crate::internal;
use crate::sink::{Metadata, Payload, Sink};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends the raw channel, followed by a newline, to a file. Structured
/// payloads are written as JSON.
#[derive(Debug, Clone)]
pub struct FileOutput {
    path: PathBuf,
}

impl FileOutput {
    /// `~` is expanded to the home directory.
    ///
    /// # Errors
    /// [`crate::Error::MissingOutputPath`] when `path` is empty.
    pub fn new(path: impl AsRef<str>) -> Result<Self, crate::Error> {
        let path = path.as_ref();
        if path.trim().is_empty() {
            return Err(crate::Error::MissingOutputPath);
        }
        let expanded = shellexpand::tilde(path);
        Ok(Self {
            path: PathBuf::from(expanded.as_ref()),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileOutput {
    fn uses_pretty(&self) -> bool {
        false
    }

    fn uses_raw(&self) -> bool {
        true
    }

    fn write(
        &self,
        _pretty: Option<&Payload>,
        raw: Option<&Payload>,
        _meta: &Metadata,
    ) -> Result<(), crate::Error> {
        let Some(raw) = raw else {
            return Ok(());
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
            internal::debug("FILE", &format!("Created directory: {}", parent.display()));
        }

        // Single write per record so concurrent appenders don't interleave lines.
        let mut content = raw.as_text().into_owned();
        content.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}
