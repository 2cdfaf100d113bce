//! PID marker I/O.
//!
//! Format: the decimal process id, no trailing newline.
//! ```text
//! <pid>
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use hupfile_core::{FileOp, HupfileError, Result};

use crate::file::set_mode;

/// Create (or truncate) `path` and write `pid` into it.
pub fn write_pid(path: &Path, pid: u32, mode: u32) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    set_mode(&mut options, mode);

    let mut file = options
        .open(path)
        .map_err(|e| HupfileError::io(FileOp::Create, path, e))?;
    write!(file, "{pid}").map_err(|e| HupfileError::io(FileOp::Write, path, e))
}

/// Read the PID stored in a marker file.
pub fn read_pid(path: impl AsRef<Path>) -> Result<u32> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| HupfileError::io(FileOp::Read, path, e))?;

    parse_pid(&content).map_err(|e| HupfileError::io(FileOp::Read, path, e))
}

/// Delete a marker file. A marker that is already gone is an error.
pub fn remove_pid(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| HupfileError::io(FileOp::Remove, path, e))
}

fn parse_pid(content: &str) -> io::Result<u32> {
    content
        .trim()
        .parse::<u32>()
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "missing or invalid PID"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn written_pid_has_no_newline() {
        let dir = tempdir().expect("tempdir failed");
        let path = dir.path().join("app.pid");

        write_pid(&path, 4242, 0o664).expect("write failed");

        assert_eq!(fs::read_to_string(&path).expect("read failed"), "4242");
        assert_eq!(read_pid(&path).expect("parse failed"), 4242);
    }

    #[test]
    fn garbage_is_invalid_data() {
        let dir = tempdir().expect("tempdir failed");
        let path = dir.path().join("bad.pid");
        fs::write(&path, "not a pid").expect("write failed");

        let err = read_pid(&path).expect_err("parse should fail");
        match err {
            HupfileError::Io { op, source, .. } => {
                assert_eq!(op, FileOp::Read);
                assert_eq!(source.kind(), io::ErrorKind::InvalidData);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn remove_missing_marker_is_an_error() {
        let dir = tempdir().expect("tempdir failed");
        let path = dir.path().join("gone.pid");
        write_pid(&path, 1, 0o664).expect("write failed");

        remove_pid(&path).expect("remove failed");
        assert!(!path.exists());

        let err = remove_pid(&path).expect_err("second remove should fail");
        match err {
            HupfileError::Io { op, source, .. } => {
                assert_eq!(op, FileOp::Remove);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
