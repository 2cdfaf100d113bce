//! Cancellable background task that reopens a registry on rotation requests.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ports::RotationSource;
use crate::registry::WriterRegistry;

/// Handle to a running watch task.
///
/// Dropping the handle does not stop the task; cancel the token or call
/// [`shutdown`](Self::shutdown).
#[derive(Debug)]
pub struct WatchHandle {
    cancel_token: CancellationToken,
    join_handle: JoinHandle<()>,
}

impl WatchHandle {
    /// Token that stops this watch task.
    pub fn token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    /// Whether the task has exited (cancelled or source closed).
    pub fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }

    /// Cancel the task and wait for it to exit.
    pub async fn shutdown(self) {
        self.cancel_token.cancel();
        self.wait().await;
    }

    /// Wait for the task to exit without cancelling it.
    pub async fn wait(self) {
        if let Err(e) = self.join_handle.await {
            warn!(error = %e, "Rotation watch task panicked");
        }
    }
}

impl WriterRegistry {
    /// Spawn a task that calls [`reopen_all`](Self::reopen_all) for every
    /// event from `source` until `cancel_token` fires or the source closes.
    ///
    /// The task owns a child of `cancel_token`, so cancelling the returned
    /// handle does not cancel the caller's token.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn watch_with<S>(
        self: &Arc<Self>,
        cancel_token: &CancellationToken,
        source: S,
    ) -> WatchHandle
    where
        S: RotationSource + 'static,
    {
        let cancel_token = cancel_token.child_token();
        let task_token = cancel_token.clone();
        let registry = Arc::clone(self);

        let join_handle = tokio::spawn(run_watch(registry, task_token, source));

        WatchHandle {
            cancel_token,
            join_handle,
        }
    }
}

async fn run_watch<S: RotationSource>(
    registry: Arc<WriterRegistry>,
    cancel_token: CancellationToken,
    mut source: S,
) {
    info!("Rotation watch started");

    loop {
        tokio::select! {
            biased;

            () = cancel_token.cancelled() => {
                debug!("Rotation watch cancelled");
                break;
            }
            event = source.recv() => {
                let Some(event) = event else {
                    debug!("Rotation source closed");
                    break;
                };

                info!(?event, "Rotation requested, reopening writers");
                let target = Arc::clone(&registry);
                match tokio::task::spawn_blocking(move || target.reopen_all()).await {
                    Ok(failures) => {
                        for failure in &failures {
                            warn!(
                                path = %failure.path.display(),
                                error = %failure.error,
                                "Failed to reopen writer"
                            );
                        }
                    }
                    Err(e) => warn!(error = %e, "Reopen task failed"),
                }
            }
        }
    }

    info!("Rotation watch stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{RotationEvent, rotation_channel};
    use crate::testing::MemoryOpener;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::{sleep, timeout};

    /// Source that reports each processed event back to the test.
    struct AckSource {
        inner: crate::ports::ChannelSource,
        acks: mpsc::UnboundedSender<()>,
        first: bool,
    }

    #[async_trait]
    impl RotationSource for AckSource {
        async fn recv(&mut self) -> Option<RotationEvent> {
            // Asked for the next event means the previous one was handled.
            if !self.first {
                let _ = self.acks.send(());
            }
            self.first = false;
            self.inner.recv().await
        }
    }

    fn memory_registry() -> (MemoryOpener, Arc<WriterRegistry>) {
        let opener = MemoryOpener::new();
        let registry = Arc::new(WriterRegistry::new(Arc::new(opener.clone())));
        (opener, registry)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn rotation_event_reopens_renamed_file() {
        let (opener, registry) = memory_registry();
        let writer = registry.create_writer("/logs/a.log").expect("create");
        writer.write(b"x").expect("write");

        let (trigger, inner) = rotation_channel();
        let (acks, mut ack_rx) = mpsc::unbounded_channel();
        let source = AckSource {
            inner,
            acks,
            first: true,
        };
        let token = CancellationToken::new();
        let handle = registry.watch_with(&token, source);

        assert!(opener.rename("/logs/a.log", "/logs/a.log.1"));
        assert!(trigger.trigger());
        timeout(Duration::from_secs(5), ack_rx.recv())
            .await
            .expect("watch did not process event");

        writer.write(b"y").expect("write");
        assert_eq!(opener.contents_string("/logs/a.log").as_deref(), Some("y"));
        assert_eq!(opener.contents_string("/logs/a.log.1").as_deref(), Some("x"));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn cancellation_stops_task() {
        let (_opener, registry) = memory_registry();
        let (_trigger, source) = rotation_channel();
        let token = CancellationToken::new();

        let handle = registry.watch_with(&token, source);
        token.cancel();

        timeout(Duration::from_secs(5), handle.wait())
            .await
            .expect("watch did not stop after cancel");
    }

    #[tokio::test]
    async fn shutdown_leaves_parent_token_untouched() {
        let (_opener, registry) = memory_registry();
        let (_trigger, source) = rotation_channel();
        let token = CancellationToken::new();

        let handle = registry.watch_with(&token, source);
        handle.shutdown().await;

        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn closed_source_ends_task() {
        let (_opener, registry) = memory_registry();
        let (trigger, source) = rotation_channel();
        let token = CancellationToken::new();

        let handle = registry.watch_with(&token, source);
        drop(trigger);

        for _ in 0..100 {
            if handle.is_finished() {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
        assert!(handle.is_finished());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn failing_writer_does_not_stop_watch() {
        let (opener, registry) = memory_registry();
        let good = registry.create_writer("/logs/good.log").expect("create");
        let bad = registry.create_writer("/logs/bad.log").expect("create");
        opener.fail_opens("/logs/bad.log");

        let (trigger, inner) = rotation_channel();
        let (acks, mut ack_rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let handle = registry.watch_with(
            &token,
            AckSource {
                inner,
                acks,
                first: true,
            },
        );

        for _ in 0..2 {
            assert!(trigger.trigger());
            timeout(Duration::from_secs(5), ack_rx.recv())
                .await
                .expect("watch did not process event");
        }

        assert!(!handle.is_finished());
        assert!(!bad.is_open());
        good.write(b"ok").expect("good writer still open");
        assert_eq!(opener.open_count(), 4);

        handle.shutdown().await;
    }
}
