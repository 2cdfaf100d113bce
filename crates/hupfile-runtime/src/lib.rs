//! OS-facing adapters for hupfile.
//!
//! - [`file`]: regular-file opener (create, append, 0664)
//! - [`pidfile`]: single-instance PID marker guard
//! - [`signals`]: POSIX signal source and signal-driven watches
//! - [`global`]: process-wide default registry and PID guard
//! - [`sink`]: `tracing-subscriber` writer adapter
//!
//! # Example
//!
//! ```ignore
//! use hupfile_runtime::{CancellationToken, SignalWatchExt, file_registry};
//!
//! let registry = file_registry();
//! let log = registry.create_writer("/var/log/app.log")?;
//! let token = CancellationToken::new();
//! let watch = registry.watch(&token)?;
//!
//! log.write(b"ready\n")?;
//!
//! watch.shutdown().await;
//! registry.close_all();
//! ```

#![deny(unsafe_code)]

pub mod file;
pub mod global;
pub mod pidfile;
pub mod signals;
pub mod sink;

use std::sync::Arc;

pub use file::{FileHandle, FileOpener};
pub use global::{close, default_registry, new_writer, pid_guard, watch, watch_with_signals};
pub use pidfile::{PidGuard, read_pid};
pub use signals::{SignalSource, SignalWatchExt};
pub use sink::{WriterSink, init_tracing, init_tracing_to};

pub use hupfile_core::{
    CancellationToken, HupfileError, ReopenFailure, ReopenableWriter, Result, RotationSettings,
    RotationSignal, WatchHandle, WriterRegistry,
};

/// Build a registry that opens regular files with the default mode.
pub fn file_registry() -> Arc<WriterRegistry> {
    Arc::new(WriterRegistry::new(Arc::new(FileOpener::default())))
}

/// Build a registry whose opener uses `settings.file_mode`.
pub fn file_registry_from_settings(settings: &RotationSettings) -> Arc<WriterRegistry> {
    Arc::new(WriterRegistry::new(Arc::new(FileOpener::from_settings(
        settings,
    ))))
}
