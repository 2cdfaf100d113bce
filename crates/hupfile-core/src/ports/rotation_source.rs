//! Rotation source port: where reopen requests come from.
//!
//! The runtime crate implements this over POSIX signals; [`ChannelSource`]
//! covers manual triggers and tests.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::settings::RotationSignal;

/// A single request to reopen every writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationEvent {
    /// Delivered by an OS signal.
    Signal(RotationSignal),
    /// Requested in-process through a [`RotationTrigger`].
    Manual,
}

/// Stream of rotation requests consumed by a watch task.
#[async_trait]
pub trait RotationSource: Send {
    /// Wait for the next request.
    ///
    /// Returns `None` once the subscription is torn down; the watch task
    /// then exits. Must be cancel-safe.
    async fn recv(&mut self) -> Option<RotationEvent>;
}

/// Sending half of [`rotation_channel`].
#[derive(Debug, Clone)]
pub struct RotationTrigger {
    tx: mpsc::UnboundedSender<RotationEvent>,
}

impl RotationTrigger {
    /// Request a reopen. Returns `false` if the watcher is gone.
    pub fn trigger(&self) -> bool {
        self.tx.send(RotationEvent::Manual).is_ok()
    }

    /// Forward an event as if it came from `signal`.
    pub fn send_signal(&self, signal: RotationSignal) -> bool {
        self.tx.send(RotationEvent::Signal(signal)).is_ok()
    }
}

/// Receiving half of [`rotation_channel`].
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<RotationEvent>,
}

#[async_trait]
impl RotationSource for ChannelSource {
    async fn recv(&mut self) -> Option<RotationEvent> {
        self.rx.recv().await
    }
}

/// Create an in-process rotation source and its trigger.
///
/// The source ends when every trigger has been dropped.
pub fn rotation_channel() -> (RotationTrigger, ChannelSource) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RotationTrigger { tx }, ChannelSource { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_source_ends_when_triggers_drop() {
        let (trigger, mut source) = rotation_channel();

        assert!(trigger.trigger());
        assert!(trigger.send_signal(RotationSignal::User1));
        drop(trigger);

        assert_eq!(source.recv().await, Some(RotationEvent::Manual));
        assert_eq!(
            source.recv().await,
            Some(RotationEvent::Signal(RotationSignal::User1))
        );
        assert_eq!(source.recv().await, None);
    }
}
