//! POSIX signal subscription for rotation watches.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use hupfile_core::{
    CancellationToken, Result, RotationEvent, RotationSettings, RotationSignal, RotationSource,
    WatchHandle, WriterRegistry,
};
use tracing::debug;

#[cfg(unix)]
use hupfile_core::HupfileError;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
#[cfg(unix)]
use tokio_stream::{StreamExt, StreamMap, wrappers::SignalStream};

/// Map a rotation signal onto tokio's signal kind.
#[cfg(unix)]
pub const fn signal_kind(signal: RotationSignal) -> SignalKind {
    match signal {
        RotationSignal::Hangup => SignalKind::hangup(),
        RotationSignal::User1 => SignalKind::user_defined1(),
        RotationSignal::User2 => SignalKind::user_defined2(),
        RotationSignal::Alarm => SignalKind::alarm(),
        RotationSignal::Terminate => SignalKind::terminate(),
        RotationSignal::Interrupt => SignalKind::interrupt(),
        RotationSignal::Quit => SignalKind::quit(),
    }
}

/// [`RotationSource`] fed by a set of OS signals.
///
/// Handlers are registered when the source is built, so a signal raised
/// right after [`SignalSource::new`] returns is not lost. Dropping the source
/// unsubscribes.
pub struct SignalSource {
    #[cfg(unix)]
    streams: StreamMap<RotationSignal, SignalStream>,
}

impl SignalSource {
    /// Subscribe to every signal in `signals` (duplicates are ignored).
    ///
    /// Must be called inside a Tokio runtime.
    #[cfg(unix)]
    pub fn new(signals: &[RotationSignal]) -> Result<Self> {
        let mut streams = StreamMap::new();
        for &sig in signals {
            if streams.contains_key(&sig) {
                continue;
            }
            let stream = signal(signal_kind(sig))
                .map_err(|source| HupfileError::Subscribe { signal: sig, source })?;
            debug!(signal = %sig, "Subscribed to rotation signal");
            streams.insert(sig, SignalStream::new(stream));
        }
        Ok(Self { streams })
    }

    #[cfg(not(unix))]
    pub fn new(signals: &[RotationSignal]) -> Result<Self> {
        match signals.first() {
            Some(&signal) => Err(hupfile_core::HupfileError::Subscribe {
                signal,
                source: std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "POSIX signals are not available on this platform",
                ),
            }),
            None => Ok(Self {}),
        }
    }

    /// Subscribe to `SIGHUP` only.
    pub fn hangup() -> Result<Self> {
        Self::new(&[RotationSignal::Hangup])
    }
}

impl fmt::Debug for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("SignalSource");
        #[cfg(unix)]
        s.field("signals", &self.streams.keys().collect::<Vec<_>>());
        s.finish()
    }
}

#[async_trait]
impl RotationSource for SignalSource {
    async fn recv(&mut self) -> Option<RotationEvent> {
        #[cfg(unix)]
        {
            let (sig, ()) = self.streams.next().await?;
            debug!(signal = %sig, "Rotation signal received");
            Some(RotationEvent::Signal(sig))
        }

        #[cfg(not(unix))]
        {
            None
        }
    }
}

/// Signal-driven watch entry points for a shared registry.
pub trait SignalWatchExt {
    /// Reopen on `SIGHUP` until `cancel_token` fires.
    fn watch(&self, cancel_token: &CancellationToken) -> Result<WatchHandle>;

    /// Reopen on any of `signals` until `cancel_token` fires.
    fn watch_signals(
        &self,
        cancel_token: &CancellationToken,
        signals: &[RotationSignal],
    ) -> Result<WatchHandle>;

    /// Reopen on the signals listed in `settings`.
    fn watch_from_settings(
        &self,
        cancel_token: &CancellationToken,
        settings: &RotationSettings,
    ) -> Result<WatchHandle> {
        self.watch_signals(cancel_token, &settings.signals)
    }
}

impl SignalWatchExt for Arc<WriterRegistry> {
    fn watch(&self, cancel_token: &CancellationToken) -> Result<WatchHandle> {
        self.watch_signals(cancel_token, &[RotationSignal::Hangup])
    }

    fn watch_signals(
        &self,
        cancel_token: &CancellationToken,
        signals: &[RotationSignal],
    ) -> Result<WatchHandle> {
        let source = SignalSource::new(signals)?;
        Ok(self.watch_with(cancel_token, source))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_signals_subscribe_once() {
        let source = SignalSource::new(&[RotationSignal::User1, RotationSignal::User1])
            .expect("subscribe failed");
        assert_eq!(source.streams.len(), 1);
    }

    #[tokio::test]
    async fn empty_signal_set_closes_immediately() {
        let mut source = SignalSource::new(&[]).expect("subscribe failed");
        assert_eq!(source.recv().await, None);
    }

    #[tokio::test]
    async fn debug_lists_subscribed_signals() {
        let source = SignalSource::new(&[RotationSignal::User2]).expect("subscribe failed");
        assert!(format!("{source:?}").contains("User2"));
    }
}
