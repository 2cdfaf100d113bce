//! In-memory implementations of the output ports.
//!
//! Each path maps to an "inode" buffer. Renaming a path moves the inode, so a
//! handle opened before the rename keeps writing to the renamed buffer, just
//! like a real file descriptor after logrotate.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::ports::{HandleOpener, OutputHandle};
use crate::sync::lock;

type Inode = Arc<Mutex<Vec<u8>>>;

#[derive(Debug, Default)]
struct MemoryFs {
    files: HashMap<PathBuf, Inode>,
    failing: HashSet<PathBuf>,
}

#[derive(Debug, Default)]
struct Counters {
    opens: AtomicUsize,
    flushes: AtomicUsize,
    closes: AtomicUsize,
    fail_close: AtomicBool,
}

/// [`HandleOpener`] backed by in-memory buffers.
#[derive(Debug, Clone, Default)]
pub struct MemoryOpener {
    fs: Arc<Mutex<MemoryFs>>,
    counters: Arc<Counters>,
}

impl MemoryOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future open of `path` fail with `PermissionDenied`.
    pub fn fail_opens(&self, path: impl Into<PathBuf>) {
        lock(&self.fs).failing.insert(path.into());
    }

    /// Undo [`fail_opens`](Self::fail_opens).
    pub fn allow_opens(&self, path: impl AsRef<Path>) {
        lock(&self.fs).failing.remove(path.as_ref());
    }

    /// Make handle closes report an error (the handle is still released).
    pub fn fail_closes(&self, fail: bool) {
        self.counters.fail_close.store(fail, Ordering::SeqCst);
    }

    /// Move the buffer at `from` to `to`. Returns `false` if `from` is absent.
    pub fn rename(&self, from: impl AsRef<Path>, to: impl Into<PathBuf>) -> bool {
        let mut fs = lock(&self.fs);
        match fs.files.remove(from.as_ref()) {
            Some(inode) => {
                fs.files.insert(to.into(), inode);
                true
            }
            None => false,
        }
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let fs = lock(&self.fs);
        fs.files.get(path.as_ref()).map(|inode| lock(inode).clone())
    }

    pub fn contents_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.contents(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn open_count(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    pub fn flush_count(&self) -> usize {
        self.counters.flushes.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }
}

impl HandleOpener for MemoryOpener {
    fn open(&self, path: &Path) -> io::Result<Box<dyn OutputHandle>> {
        let mut fs = lock(&self.fs);
        if fs.failing.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("open refused for {}", path.display()),
            ));
        }

        let inode = Arc::clone(fs.files.entry(path.to_path_buf()).or_default());
        self.counters.opens.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MemoryHandle {
            inode,
            counters: Arc::clone(&self.counters),
        }))
    }
}

/// Handle returned by [`MemoryOpener`].
#[derive(Debug)]
pub struct MemoryHandle {
    inode: Inode,
    counters: Arc<Counters>,
}

impl OutputHandle for MemoryHandle {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        lock(&self.inode).extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.counters.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        if self.counters.fail_close.load(Ordering::SeqCst) {
            return Err(io::Error::other("close failed"));
        }
        Ok(())
    }
}
