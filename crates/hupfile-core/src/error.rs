//! Error types for PID claims and reopenable writers.
//!
//! All failures are returned values; nothing in this crate terminates the
//! process.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::settings::RotationSignal;

/// Convenience alias used throughout the workspace.
pub type Result<T, E = HupfileError> = std::result::Result<T, E>;

/// The file-system call that failed inside a [`HupfileError::Io`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    Stat,
    Create,
    Open,
    Read,
    Write,
    Flush,
    Close,
    Remove,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stat => "stat",
            Self::Create => "create",
            Self::Open => "open",
            Self::Read => "read",
            Self::Write => "write",
            Self::Flush => "flush",
            Self::Close => "close",
            Self::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the PID guard, writers and the registry.
#[derive(Debug, Error)]
pub enum HupfileError {
    /// A PID marker already exists at the requested path.
    #[error("PID file {0} already exists; another instance appears to be running")]
    AlreadyRunning(PathBuf),

    /// This guard already holds a claim.
    #[error("PID file already claimed by this process at {0}")]
    AlreadyClaimed(PathBuf),

    /// Write attempted on a writer whose handle is closed.
    #[error("writer for {0} is not open")]
    NotOpen(PathBuf),

    /// An underlying file-system call failed.
    #[error("failed to {op} {path}: {source}")]
    Io {
        op: FileOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Subscribing to a rotation signal failed.
    #[error("failed to subscribe to {signal} signal: {source}")]
    Subscribe {
        signal: RotationSignal,
        #[source]
        source: io::Error,
    },
}

impl HupfileError {
    /// Wrap an I/O failure for `path`.
    pub fn io(op: FileOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// The failed operation, if this is an I/O failure.
    pub const fn file_op(&self) -> Option<FileOp> {
        match self {
            Self::Io { op, .. } => Some(*op),
            _ => None,
        }
    }
}

impl From<HupfileError> for io::Error {
    fn from(err: HupfileError) -> Self {
        match err {
            HupfileError::Io { source, .. } | HupfileError::Subscribe { source, .. } => source,
            HupfileError::NotOpen(_) => Self::new(io::ErrorKind::NotConnected, err.to_string()),
            HupfileError::AlreadyRunning(_) | HupfileError::AlreadyClaimed(_) => {
                Self::new(io::ErrorKind::AlreadyExists, err.to_string())
            }
        }
    }
}

/// One writer that failed during a broadcast reopen.
#[derive(Debug, Error)]
#[error("failed to reopen {path}: {error}")]
pub struct ReopenFailure {
    pub path: PathBuf,
    #[source]
    pub error: HupfileError,
}
