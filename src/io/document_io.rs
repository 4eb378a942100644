use std::fs;
use std::path::{Path, PathBuf};

use crate::io::lock::{FileLock, LockError};
use crate::io::recovery::{self, RecoveryEntry};
use crate::model::record::PageRecord;
use crate::parse::{CodecError, decode, encode};

/// Extension of document files
pub const EXTENSION: &str = "task";

/// Error type for reading and writing document files
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    CodecError { path: PathBuf, source: CodecError },
    #[error(transparent)]
    LockError(#[from] LockError),
}

/// `filename` with the `.task` extension appended when absent
pub fn with_extension(filename: &str) -> String {
    let has_ext = Path::new(filename)
        .extension()
        .is_some_and(|e| e == EXTENSION);
    if has_ext {
        filename.to_string()
    } else {
        format!("{}.{}", filename, EXTENSION)
    }
}

/// Read and decode a document. Nothing outside the returned record is built.
pub fn read_document(path: &Path) -> Result<PageRecord, DocumentError> {
    let text = fs::read_to_string(path).map_err(|e| DocumentError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    decode(&text).map_err(|e| DocumentError::CodecError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Encode `record` and write it to `path` under the document's lock.
///
/// When locking or writing fails the encoded text goes to the recovery log in
/// `recovery_dir` before the error is returned.
pub fn write_document(
    path: &Path,
    record: &PageRecord,
    recovery_dir: &Path,
) -> Result<(), DocumentError> {
    let content = encode(record).map_err(|e| DocumentError::CodecError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let written = FileLock::acquire_default(path)
        .map_err(DocumentError::from)
        .and_then(|_lock| {
            recovery::atomic_write(path, content.as_bytes()).map_err(|e| {
                DocumentError::WriteError {
                    path: path.to_path_buf(),
                    source: e,
                }
            })
        });

    if let Err(e) = written {
        recovery::log_recovery(
            recovery_dir,
            RecoveryEntry {
                timestamp: chrono::Utc::now(),
                description: "document write failed".to_string(),
                fields: vec![
                    ("Target".to_string(), path.display().to_string()),
                    ("Error".to_string(), e.to_string()),
                ],
                body: content,
            },
        );
        return Err(e);
    }
    log::info!("saved {}", path.display());
    Ok(())
}
