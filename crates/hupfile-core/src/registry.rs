//! Writer registry: owns every writer it created and broadcasts reopen and
//! close across them.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::error::{ReopenFailure, Result};
use crate::ports::HandleOpener;
use crate::sync::lock;
use crate::writer::ReopenableWriter;

/// Append-only collection of [`ReopenableWriter`]s sharing one opener.
///
/// The registry lock serializes `create_writer`, `reopen_all` and `close_all`
/// against each other. Writes on individual writers only take that writer's
/// lock.
///
/// # Example
///
/// ```ignore
/// let registry = Arc::new(WriterRegistry::new(Arc::new(FileOpener::default())));
/// let writer = registry.create_writer("/var/log/app.log")?;
/// writer.write(b"started\n")?;
/// let failures = registry.reopen_all();
/// ```
pub struct WriterRegistry {
    opener: Arc<dyn HandleOpener>,
    writers: Mutex<Vec<Arc<ReopenableWriter>>>,
}

impl WriterRegistry {
    pub fn new(opener: Arc<dyn HandleOpener>) -> Self {
        Self {
            opener,
            writers: Mutex::new(Vec::new()),
        }
    }

    /// Open `path` and register a writer for it.
    ///
    /// Duplicate paths are allowed and produce independent handles. Nothing is
    /// registered if the open fails.
    pub fn create_writer(&self, path: impl Into<PathBuf>) -> Result<Arc<ReopenableWriter>> {
        let mut writers = lock(&self.writers);
        let writer = Arc::new(ReopenableWriter::open(
            path.into(),
            Arc::clone(&self.opener),
        )?);
        writers.push(Arc::clone(&writer));
        Ok(writer)
    }

    /// Reopen every writer in creation order.
    ///
    /// One failure does not stop the others; every failure is returned. A
    /// writer that failed stays closed.
    pub fn reopen_all(&self) -> Vec<ReopenFailure> {
        let writers = lock(&self.writers);
        debug!(count = writers.len(), "Reopening writers");

        writers
            .iter()
            .filter_map(|writer| {
                writer.reopen().err().map(|error| ReopenFailure {
                    path: writer.path().to_path_buf(),
                    error,
                })
            })
            .collect()
    }

    /// Close every writer in creation order, swallowing errors.
    pub fn close_all(&self) {
        let writers = lock(&self.writers);
        for writer in writers.iter() {
            if let Err(e) = writer.close() {
                warn!(path = %writer.path().display(), error = %e, "Failed to close writer");
            }
        }
    }

    /// Snapshot of the registered writers in creation order.
    pub fn writers(&self) -> Vec<Arc<ReopenableWriter>> {
        lock(&self.writers).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.writers).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.writers).is_empty()
    }
}

impl fmt::Debug for WriterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterRegistry")
            .field("writers", &self.len())
            .finish_non_exhaustive()
    }
}
