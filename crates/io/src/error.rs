// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to acquire coordinated lock on {path}: {source}")]
    LockFailed { path: PathBuf, source: std::io::Error },

    #[error("I/O failure on {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("cloud container could not be resolved")]
    ContainerNotFound,

    #[error("bookmark reload failed: {0}")]
    BookmarkReload(String),
}

impl From<&IoError> for fsync_core::EngineError {
    fn from(e: &IoError) -> Self {
        match e {
            IoError::ContainerNotFound => fsync_core::EngineError::ContainerNotFound,
            other => fsync_core::EngineError::Internal(other.to_string()),
        }
    }
}
