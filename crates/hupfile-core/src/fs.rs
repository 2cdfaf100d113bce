//! Existence checks for PID markers and output files.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::{FileOp, HupfileError, Result};

/// Check whether `path` names an existing regular (non-directory) entry.
///
/// Not-found and directories are `Ok(false)`. Any other stat failure, such
/// as permission denied on a parent directory, is returned as
/// [`HupfileError::Io`] with [`FileOp::Stat`].
pub fn try_file_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(meta) => Ok(!meta.is_dir()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(HupfileError::io(FileOp::Stat, path, e)),
    }
}

/// Boolean form of [`try_file_exists`].
///
/// Stat failures other than not-found are reported as `false`; callers that
/// must tell "absent" from "unreadable" apart use [`try_file_exists`].
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    try_file_exists(path).unwrap_or_else(|e| {
        debug!(path = %path.display(), error = %e, "stat failed, treating as absent");
        false
    })
}
