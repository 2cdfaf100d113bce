//! Rotation settings domain types and validation.
//!
//! Pure data: the runtime crate maps [`RotationSignal`] onto OS signals.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Permission bits for output files and PID markers (`rw-rw-r--`).
pub const DEFAULT_FILE_MODE: u32 = 0o664;

/// External signals that may request a reopen.
///
/// Subscribing to a signal replaces its default action for the whole
/// process, so [`Terminate`](Self::Terminate), [`Interrupt`](Self::Interrupt)
/// and [`Quit`](Self::Quit) would no longer stop it. [`validate_settings`]
/// rejects them; pass them to a watcher directly only when something else
/// handles shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationSignal {
    /// `SIGHUP`, the conventional logrotate trigger.
    Hangup,
    /// `SIGUSR1`
    User1,
    /// `SIGUSR2`
    User2,
    /// `SIGALRM`
    Alarm,
    /// `SIGTERM`. Masks the default termination while subscribed.
    Terminate,
    /// `SIGINT`. Masks the default termination while subscribed.
    Interrupt,
    /// `SIGQUIT`. Masks the default termination while subscribed.
    Quit,
}

impl RotationSignal {
    /// Whether the signal's default action terminates the process.
    pub const fn is_terminating(self) -> bool {
        matches!(self, Self::Terminate | Self::Interrupt | Self::Quit)
    }
}

impl fmt::Display for RotationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hangup => "SIGHUP",
            Self::User1 => "SIGUSR1",
            Self::User2 => "SIGUSR2",
            Self::Alarm => "SIGALRM",
            Self::Terminate => "SIGTERM",
            Self::Interrupt => "SIGINT",
            Self::Quit => "SIGQUIT",
        };
        f.write_str(name)
    }
}

/// Settings for openers, PID guards and signal watchers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    /// Mode for files opened by writers.
    pub file_mode: u32,

    /// Mode for PID marker files.
    pub pid_file_mode: u32,

    /// Signals that trigger a broadcast reopen.
    pub signals: Vec<RotationSignal>,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            file_mode: DEFAULT_FILE_MODE,
            pid_file_mode: DEFAULT_FILE_MODE,
            signals: vec![RotationSignal::Hangup],
        }
    }
}

/// Rejected settings values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{field} mode {mode:#o} is not a valid permission mask")]
    InvalidMode { field: &'static str, mode: u32 },

    #[error("at least one rotation signal is required")]
    NoSignals,

    #[error("{0} terminates the process and cannot trigger rotation")]
    TerminatingSignal(RotationSignal),
}

/// Validate settings before they reach an opener or watcher.
pub fn validate_settings(settings: &RotationSettings) -> Result<(), SettingsError> {
    for (field, mode) in [
        ("file", settings.file_mode),
        ("pid file", settings.pid_file_mode),
    ] {
        if mode > 0o7777 {
            return Err(SettingsError::InvalidMode { field, mode });
        }
    }

    if settings.signals.is_empty() {
        return Err(SettingsError::NoSignals);
    }

    if let Some(&signal) = settings.signals.iter().find(|s| s.is_terminating()) {
        return Err(SettingsError::TerminatingSignal(signal));
    }

    Ok(())
}
