//! Process-wide default registry and PID guard.
//!
//! Kept in their own test binary since both are shared by every test in it.

use std::fs;

use hupfile_runtime::{HupfileError, close, default_registry, new_writer, pid_guard, read_pid};
use tempfile::tempdir;
use tokio_test::{assert_err, assert_ok};

#[test]
fn default_pid_guard_lifecycle() {
    let dir = tempdir().expect("tempdir failed");
    let pid_path = dir.path().join("app.pid");
    let guard = pid_guard();

    assert_ok!(guard.claim(&pid_path));
    assert_eq!(read_pid(&pid_path).expect("read failed"), std::process::id());
    assert!(matches!(
        guard.claim(dir.path().join("other.pid")),
        Err(HupfileError::AlreadyClaimed(_))
    ));

    assert_ok!(guard.release());
    assert_err!(fs::read(&pid_path));
    assert_ok!(guard.release());
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn default_registry_watch_and_close() {
    use hupfile_runtime::{CancellationToken, RotationSignal, watch_with_signals};
    use nix::sys::signal::{Signal, raise};
    use std::time::Duration;

    let dir = tempdir().expect("tempdir failed");
    let path = dir.path().join("watched.log");
    let rotated = dir.path().join("watched.log.1");

    let before = default_registry().len();
    let writer = new_writer(&path).expect("create failed");
    assert_eq!(default_registry().len(), before + 1);
    writer.write(b"old").expect("write failed");

    let token = CancellationToken::new();
    let watch = watch_with_signals(&token, &[RotationSignal::User2]).expect("watch failed");

    fs::rename(&path, &rotated).expect("rename failed");
    raise(Signal::SIGUSR2).expect("raise failed");

    let mut reopened = false;
    for _ in 0..250 {
        if path.exists() {
            reopened = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(reopened, "default watch never reopened the file");

    writer.write(b"new").expect("write failed");
    assert_eq!(fs::read_to_string(&path).expect("read failed"), "new");
    assert_eq!(fs::read_to_string(&rotated).expect("read failed"), "old");

    watch.shutdown().await;
    close();
    assert!(!writer.is_open());
}
