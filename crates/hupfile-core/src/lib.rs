//! Core types for reopenable output files.
//!
//! This crate holds everything that does not touch the OS directly:
//!
//! - [`ReopenableWriter`]: a thread-safe writer whose handle can be swapped
//!   for a fresh one at the same path (the logrotate "reopen" pattern)
//! - [`WriterRegistry`]: owns writers, broadcasts reopen/close, and runs a
//!   cancellable watch task fed by a [`RotationSource`]
//! - [`ports`]: the handle, opener and rotation-source traits
//! - [`fs`]: existence checks used by PID guards
//!
//! File-backed openers, PID markers and POSIX signal sources live in
//! `hupfile-runtime`.

#![deny(unused_crate_dependencies)]

pub mod error;
pub mod fs;
pub mod ports;
pub mod registry;
pub mod settings;
mod sync;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod watch;
pub mod writer;

pub use error::{FileOp, HupfileError, ReopenFailure, Result};
pub use fs::{file_exists, try_file_exists};
pub use ports::{
    ChannelSource, HandleOpener, OutputHandle, RotationEvent, RotationSource, RotationTrigger,
    rotation_channel,
};
pub use registry::WriterRegistry;
pub use settings::{
    DEFAULT_FILE_MODE, RotationSettings, RotationSignal, SettingsError, validate_settings,
};
pub use sync::lock;
pub use watch::WatchHandle;
pub use writer::ReopenableWriter;

// Re-exported so callers don't need a direct tokio-util dependency
pub use tokio_util::sync::CancellationToken;

#[cfg(test)]
use tokio_test as _;
