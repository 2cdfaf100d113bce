//! `tracing-subscriber` integration: send formatted events into a
//! reopenable writer so log output follows logrotate.

use std::sync::Arc;

use anyhow::anyhow;
use hupfile_core::ReopenableWriter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// [`MakeWriter`] over a shared [`ReopenableWriter`].
#[derive(Debug, Clone)]
pub struct WriterSink {
    writer: Arc<ReopenableWriter>,
}

impl WriterSink {
    pub const fn new(writer: Arc<ReopenableWriter>) -> Self {
        Self { writer }
    }
}

impl<'a> MakeWriter<'a> for WriterSink {
    type Writer = &'a ReopenableWriter;

    fn make_writer(&'a self) -> Self::Writer {
        &self.writer
    }
}

fn env_filter(default_directive: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| anyhow!("invalid log filter {default_directive:?}: {e}"))
}

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to `default_directive`.
pub fn init_tracing(default_directive: &str) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive)?)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

/// Install a `fmt` subscriber that writes into `writer`.
pub fn init_tracing_to(
    writer: Arc<ReopenableWriter>,
    default_directive: &str,
) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive)?)
        .with_ansi(false)
        .with_writer(WriterSink::new(writer))
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
