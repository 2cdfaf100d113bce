//! Single-instance guard backed by a PID marker file.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use hupfile_core::{
    DEFAULT_FILE_MODE, HupfileError, Result, RotationSettings, lock, try_file_exists,
};
use tracing::{debug, info};

use super::io::{remove_pid, write_pid};

/// Claims one PID marker per guard and removes it on [`release`](Self::release).
///
/// # States
/// - **Unclaimed**: initial state, and the state after a successful release
/// - **Claimed(path)**: after a successful [`claim`](Self::claim)
///
/// The guard is advisory: another process creating the same path between
/// the existence check and the create is not detected.
#[derive(Debug)]
pub struct PidGuard {
    mode: u32,
    claimed: Mutex<Option<PathBuf>>,
}

impl PidGuard {
    pub const fn new() -> Self {
        Self::with_mode(DEFAULT_FILE_MODE)
    }

    pub const fn with_mode(mode: u32) -> Self {
        Self {
            mode,
            claimed: Mutex::new(None),
        }
    }

    pub const fn from_settings(settings: &RotationSettings) -> Self {
        Self::with_mode(settings.pid_file_mode)
    }

    /// Claim `path` for the current process.
    ///
    /// # Errors
    /// - [`HupfileError::AlreadyClaimed`] if this guard already holds a claim,
    ///   whatever `path` is
    /// - [`HupfileError::AlreadyRunning`] if a regular file exists at `path`
    /// - [`HupfileError::Io`] if the existence check or the write fails
    ///
    /// The guard stays unclaimed on every error.
    pub fn claim(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut claimed = lock(&self.claimed);

        if let Some(existing) = claimed.as_ref() {
            return Err(HupfileError::AlreadyClaimed(existing.clone()));
        }

        if try_file_exists(path)? {
            debug!(path = %path.display(), "PID file already present");
            return Err(HupfileError::AlreadyRunning(path.to_path_buf()));
        }

        let pid = std::process::id();
        write_pid(path, pid, self.mode)?;
        info!(path = %path.display(), pid, "Claimed PID file");

        *claimed = Some(path.to_path_buf());
        Ok(())
    }

    /// Delete the claimed marker and return to unclaimed.
    ///
    /// No-op when unclaimed. If the delete fails, including when the marker
    /// was already removed by someone else, the error is returned and the
    /// claim is kept so the call can be retried.
    pub fn release(&self) -> Result<()> {
        let mut claimed = lock(&self.claimed);
        let Some(path) = claimed.as_ref() else {
            return Ok(());
        };

        remove_pid(path)?;
        info!(path = %path.display(), "Released PID file");

        *claimed = None;
        Ok(())
    }

    /// Path currently claimed, if any.
    pub fn claimed(&self) -> Option<PathBuf> {
        lock(&self.claimed).clone()
    }

    pub fn is_claimed(&self) -> bool {
        lock(&self.claimed).is_some()
    }
}

impl Default for PidGuard {
    fn default() -> Self {
        Self::new()
    }
}
