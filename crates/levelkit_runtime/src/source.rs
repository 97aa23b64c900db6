//! Where levels come from and where they go.
//!
//! A file binding reads and writes the whole object list. A live binding
//! loads the editor's current objects once and then sends new objects only.

use std::fs;
use std::path::{Path, PathBuf};

use levelkit_foundation::{Error, ErrorContext, Result};

use crate::transcode::{format_level_string, parse_level_string, RawObject};

/// Produces the raw objects of a level.
pub trait LevelSource {
    /// Loads every object.
    ///
    /// # Errors
    ///
    /// Returns an I/O or parse error.
    fn load(&mut self) -> Result<Vec<RawObject>>;
}

/// Consumes the raw objects of a level.
pub trait LevelSink {
    /// Replaces the stored level with `objects`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error.
    fn store(&mut self, objects: &[RawObject]) -> Result<()>;
}

/// A plain-text file of object strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectStringFile {
    path: PathBuf,
}

impl ObjectStringFile {
    /// Binds to a file path. The file is not touched until load or store.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the bound path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn context(&self) -> ErrorContext {
        ErrorContext::new().with_source(self.path.display().to_string())
    }
}

impl LevelSource for ObjectStringFile {
    fn load(&mut self) -> Result<Vec<RawObject>> {
        let text = fs::read_to_string(&self.path)
            .map_err(|e| Error::from(e).with_context(self.context()))?;
        parse_level_string(&text).map_err(|mut e| {
            let context = e
                .context
                .take()
                .unwrap_or_default()
                .with_source(self.path.display().to_string());
            e.with_context(context)
        })
    }
}

impl LevelSink for ObjectStringFile {
    fn store(&mut self, objects: &[RawObject]) -> Result<()> {
        fs::write(&self.path, format_level_string(objects))
            .map_err(|e| Error::from(e).with_context(self.context()))
    }
}

/// A connection to a running level editor.
pub trait LiveChannel: Send {
    /// Fetches the editor's current objects.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor cannot be reached.
    fn load(&mut self) -> Result<Vec<RawObject>>;

    /// Adds objects to the editor's level.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor cannot be reached.
    fn send(&mut self, objects: &[RawObject]) -> Result<()>;
}

/// An in-process stand-in for an editor.
#[derive(Clone, Debug, Default)]
pub struct MemoryLive {
    level: Vec<RawObject>,
    batches: usize,
}

impl MemoryLive {
    /// Creates an editor holding `level`.
    #[must_use]
    pub fn new(level: Vec<RawObject>) -> Self {
        Self { level, batches: 0 }
    }

    /// Returns the editor's objects, including everything sent.
    #[must_use]
    pub fn level(&self) -> &[RawObject] {
        &self.level
    }

    /// Returns how many `send` calls were made.
    #[must_use]
    pub const fn batches(&self) -> usize {
        self.batches
    }
}

impl LiveChannel for MemoryLive {
    fn load(&mut self) -> Result<Vec<RawObject>> {
        Ok(self.level.clone())
    }

    fn send(&mut self, objects: &[RawObject]) -> Result<()> {
        self.level.extend_from_slice(objects);
        self.batches += 1;
        Ok(())
    }
}
