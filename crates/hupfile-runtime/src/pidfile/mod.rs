//! PID marker files for single-instance processes.
//!
//! # Guarantees
//! - One claim per [`PidGuard`]; a second claim fails until released
//! - An existing marker file rejects the claim (another instance is running)
//! - Release deletes the marker; releasing while unclaimed is a no-op

mod guard;
mod io;

pub use guard::PidGuard;
pub use io::{read_pid, remove_pid, write_pid};
