//! Output handle port: the swappable resource behind a reopenable writer.

use std::io;
use std::path::Path;

/// An open, append-only output resource.
///
/// Implementations do not need internal locking; the owning writer
/// serializes every call.
pub trait OutputHandle: Send {
    /// Append all of `buf`.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Flush buffered bytes down to the underlying medium.
    fn flush(&mut self) -> io::Result<()>;

    /// Release the resource, reporting any error the release produced.
    fn close(self: Box<Self>) -> io::Result<()>;
}

/// Opens [`OutputHandle`]s for a path.
///
/// Every call must behave like create-if-missing, write-only, append: a
/// fresh handle for whatever currently lives at `path`.
#[cfg_attr(test, mockall::automock)]
pub trait HandleOpener: Send + Sync {
    fn open(&self, path: &Path) -> io::Result<Box<dyn OutputHandle>>;
}
