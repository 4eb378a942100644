use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Exclusive advisory lock held while one document is being written.
///
/// The flock sits on a hidden `.<name>.lock` file next to the document and
/// is released when the guard is dropped.
pub struct FileLock {
    _file: File,
    path: PathBuf,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("timed out waiting for {path}: the document is being saved elsewhere")]
    Timeout { path: PathBuf },
}

/// The lock file guarding `document`
pub fn lock_path_for(document: &Path) -> PathBuf {
    let name = document
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = document.parent().unwrap_or(Path::new("."));
    dir.join(format!(".{}.lock", name))
}

/// How long to sleep between attempts while another process holds the lock
const POLL_INTERVAL: Duration = Duration::from_millis(10);

impl FileLock {
    /// Take the lock guarding `document`, polling until `timeout` elapses.
    pub fn acquire(document: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = lock_path_for(document);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::CreateError {
                path: path.clone(),
                source,
            })?;

        let deadline = Instant::now() + timeout;
        while !flock_exclusive(&file) {
            if Instant::now() >= deadline {
                log::warn!("gave up waiting for {}", path.display());
                return Err(LockError::Timeout { path });
            }
            std::thread::sleep(POLL_INTERVAL);
        }
        Ok(FileLock { _file: file, path })
    }

    /// `acquire` with a five second timeout
    pub fn acquire_default(document: &Path) -> Result<Self, LockError> {
        Self::acquire(document, Duration::from_secs(5))
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Closing the handle releases the flock; only the sibling file is left
        if let Err(e) = fs::remove_file(&self.path) {
            log::debug!("could not remove {}: {}", self.path.display(), e);
        }
    }
}

/// Non-blocking exclusive flock; false while another handle holds it.
#[cfg(unix)]
fn flock_exclusive(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
fn flock_exclusive(_file: &File) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lock_file_sits_next_to_document() {
        assert_eq!(
            lock_path_for(Path::new("/docs/chores.task")),
            PathBuf::from("/docs/.chores.task.lock")
        );
    }

    #[test]
    fn acquire_and_release() {
        let tmp = TempDir::new().unwrap();
        let doc = tmp.path().join("chores.task");

        let lock = FileLock::acquire_default(&doc);
        assert!(lock.is_ok());
        assert!(lock_path_for(&doc).exists());
        drop(lock);
        assert!(!lock_path_for(&doc).exists());

        assert!(FileLock::acquire_default(&doc).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn contention_times_out() {
        let tmp = TempDir::new().unwrap();
        let doc = tmp.path().join("chores.task");

        let _held = FileLock::acquire_default(&doc).unwrap();
        let second = FileLock::acquire(&doc, Duration::from_millis(50));
        assert!(matches!(second, Err(LockError::Timeout { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn waits_for_holder_to_release() {
        let tmp = TempDir::new().unwrap();
        let doc = tmp.path().join("chores.task");

        let held = FileLock::acquire_default(&doc).unwrap();
        let holder = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            drop(held);
        });
        assert!(FileLock::acquire(&doc, Duration::from_secs(2)).is_ok());
        holder.join().unwrap();
    }
}
