//! Reopenable writer: one output path, one swappable handle.
//!
//! Every operation takes the writer's own lock, so a write issued during a
//! reopen lands either entirely in the old handle or entirely in the new one.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::error::{FileOp, HupfileError, Result};
use crate::ports::{HandleOpener, OutputHandle};
use crate::sync::lock;

/// A thread-safe writer whose underlying handle can be reopened in place.
///
/// Writers are created by [`WriterRegistry::create_writer`](crate::WriterRegistry::create_writer)
/// and shared as `Arc<ReopenableWriter>`. After [`close`](Self::close) the
/// value stays usable as a handle but every write fails with
/// [`HupfileError::NotOpen`].
pub struct ReopenableWriter {
    path: PathBuf,
    opener: Arc<dyn HandleOpener>,
    handle: Mutex<Option<Box<dyn OutputHandle>>>,
}

impl ReopenableWriter {
    /// Open `path` through `opener` and wrap the handle.
    pub(crate) fn open(path: PathBuf, opener: Arc<dyn HandleOpener>) -> Result<Self> {
        let handle = opener
            .open(&path)
            .map_err(|e| HupfileError::io(FileOp::Open, &path, e))?;
        debug!(path = %path.display(), "Opened writer");

        Ok(Self {
            path,
            opener,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Path this writer (re)opens.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a handle is currently installed.
    pub fn is_open(&self) -> bool {
        lock(&self.handle).is_some()
    }

    /// Append `buf` and return the number of bytes written.
    pub fn write(&self, buf: &[u8]) -> Result<usize> {
        let mut guard = lock(&self.handle);
        let handle = guard
            .as_mut()
            .ok_or_else(|| HupfileError::NotOpen(self.path.clone()))?;

        handle
            .write_all(buf)
            .map_err(|e| HupfileError::io(FileOp::Write, &self.path, e))?;
        Ok(buf.len())
    }

    /// Close the current handle and open a fresh one against the same path.
    ///
    /// A closed writer stays closed. Errors from closing the old handle are
    /// ignored; if the new open fails the writer is left closed.
    pub fn reopen(&self) -> Result<()> {
        let mut guard = lock(&self.handle);
        let Some(old) = guard.take() else {
            return Ok(());
        };

        if let Err(e) = old.close() {
            debug!(path = %self.path.display(), error = %e, "Ignoring close error during reopen");
        }

        let handle = self
            .opener
            .open(&self.path)
            .map_err(|e| HupfileError::io(FileOp::Open, &self.path, e))?;
        *guard = Some(handle);

        debug!(path = %self.path.display(), "Reopened writer");
        Ok(())
    }

    /// Close the handle. Idempotent.
    pub fn close(&self) -> Result<()> {
        let mut guard = lock(&self.handle);
        let Some(handle) = guard.take() else {
            return Ok(());
        };

        debug!(path = %self.path.display(), "Closing writer");
        handle
            .close()
            .map_err(|e| HupfileError::io(FileOp::Close, &self.path, e))
    }

    /// Flush the handle to the underlying medium. No-op when closed.
    pub fn flush(&self) -> Result<()> {
        match lock(&self.handle).as_mut() {
            Some(handle) => handle
                .flush()
                .map_err(|e| HupfileError::io(FileOp::Flush, &self.path, e)),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ReopenableWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReopenableWriter")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl Drop for ReopenableWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(path = %self.path.display(), error = %e, "Failed to close writer on drop");
        }
    }
}

impl io::Write for &ReopenableWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        ReopenableWriter::write(*self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        ReopenableWriter::flush(*self).map_err(io::Error::from)
    }
}

impl io::Write for ReopenableWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::Write::flush(&mut &*self)
    }
}
