//! File-backed output handles.
//!
//! Opens with create-if-missing, write-only, append, and the configured
//! permission bits (0664 by default).

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use hupfile_core::{DEFAULT_FILE_MODE, HandleOpener, OutputHandle, RotationSettings};

/// [`HandleOpener`] for regular files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOpener {
    mode: u32,
}

impl FileOpener {
    pub const fn with_mode(mode: u32) -> Self {
        Self { mode }
    }

    pub const fn from_settings(settings: &RotationSettings) -> Self {
        Self::with_mode(settings.file_mode)
    }

    pub const fn mode(&self) -> u32 {
        self.mode
    }
}

impl Default for FileOpener {
    fn default() -> Self {
        Self::with_mode(DEFAULT_FILE_MODE)
    }
}

impl HandleOpener for FileOpener {
    fn open(&self, path: &Path) -> io::Result<Box<dyn OutputHandle>> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        set_mode(&mut options, self.mode);

        let file = options.open(path)?;
        Ok(Box::new(FileHandle { file }))
    }
}

#[cfg(unix)]
pub(crate) fn set_mode(options: &mut OpenOptions, mode: u32) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(mode);
}

#[cfg(not(unix))]
pub(crate) fn set_mode(_options: &mut OpenOptions, _mode: u32) {}

/// An open file behind a [`hupfile_core::ReopenableWriter`].
#[derive(Debug)]
pub struct FileHandle {
    file: File,
}

impl OutputHandle for FileHandle {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.sync_data()
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        // std closes the descriptor on drop and discards the result.
        drop(self.file);
        Ok(())
    }
}
