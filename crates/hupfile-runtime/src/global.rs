//! Process-wide defaults and free-standing entry points.
//!
//! Prefer constructing a [`WriterRegistry`] and a [`PidGuard`] and passing
//! them down; these wrappers exist for hosts that want one shared instance.

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use hupfile_core::{
    CancellationToken, ReopenableWriter, Result, RotationSignal, WatchHandle, WriterRegistry,
};

use crate::file::FileOpener;
use crate::pidfile::PidGuard;
use crate::signals::SignalWatchExt;

/// Global registry, opened with the default 0664 file opener on first use.
static DEFAULT_REGISTRY: LazyLock<Arc<WriterRegistry>> =
    LazyLock::new(|| Arc::new(WriterRegistry::new(Arc::new(FileOpener::default()))));

/// Global PID guard: at most one claim per process.
static PID_GUARD: PidGuard = PidGuard::new();

/// Get the process-wide registry.
pub fn default_registry() -> Arc<WriterRegistry> {
    Arc::clone(&DEFAULT_REGISTRY)
}

/// Get the process-wide PID guard.
pub fn pid_guard() -> &'static PidGuard {
    &PID_GUARD
}

/// Create a writer in the default registry.
pub fn new_writer(path: impl Into<PathBuf>) -> Result<Arc<ReopenableWriter>> {
    DEFAULT_REGISTRY.create_writer(path)
}

/// Reopen the default registry's writers on `SIGHUP`.
pub fn watch(cancel_token: &CancellationToken) -> Result<WatchHandle> {
    DEFAULT_REGISTRY.watch(cancel_token)
}

/// Reopen the default registry's writers on any of `signals`.
pub fn watch_with_signals(
    cancel_token: &CancellationToken,
    signals: &[RotationSignal],
) -> Result<WatchHandle> {
    DEFAULT_REGISTRY.watch_signals(cancel_token, signals)
}

/// Close every writer in the default registry.
pub fn close() {
    DEFAULT_REGISTRY.close_all();
}
