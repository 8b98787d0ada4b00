// SPDX-License-Identifier: MIT

//! Coordinated file access (spec.md §4.4, §5): "a cooperative lock
//! arbitrated by the platform file-coordinator so that multiple
//! processes serialize their reads and writes on the same url" (GLOSSARY).
//!
//! There is no platform file-coordination API outside the originating
//! mobile OS, so this crate stands in an advisory `fs2` lock on the url
//! itself: a shared lock for reads, an exclusive lock for writes. Every
//! write this orchestrator performs goes through [`with_write_lock`] so
//! that a second process cooperating via the same convention serializes
//! correctly with it.

use crate::error::IoError;
use std::fs::{File, OpenOptions};
use std::path::Path;

use fs2::FileExt;

/// Acquire a shared (reader) lock on `path` for the duration of `f`.
pub fn with_read_lock<T>(
    path: &Path,
    f: impl FnOnce(&File) -> std::io::Result<T>,
) -> Result<T, IoError> {
    let file = File::open(path).map_err(|source| IoError::Io { path: path.to_path_buf(), source })?;
    file.lock_shared().map_err(|source| IoError::LockFailed { path: path.to_path_buf(), source })?;
    let result = f(&file);
    let _ = file.unlock();
    result.map_err(|source| IoError::Io { path: path.to_path_buf(), source })
}

/// Acquire an exclusive (writer) lock on `path` for the duration of `f`,
/// creating the file if it does not exist.
pub fn with_write_lock<T>(
    path: &Path,
    f: impl FnOnce(&File) -> std::io::Result<T>,
) -> Result<T, IoError> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .open(path)
        .map_err(|source| IoError::Io { path: path.to_path_buf(), source })?;
    file.lock_exclusive()
        .map_err(|source| IoError::LockFailed { path: path.to_path_buf(), source })?;
    let result = f(&file);
    let _ = file.unlock();
    result.map_err(|source| IoError::Io { path: path.to_path_buf(), source })
}

/// Copy bytes from `src` to `dst` under a coordinated read of `src` and
/// coordinated write of `dst`, writing to a sibling temp file and
/// renaming into place so readers never observe a partial file.
pub fn copy_coordinated(src: &Path, dst: &Path) -> Result<(), IoError> {
    let bytes = with_read_lock(src, |mut f| {
        use std::io::Read;
        let mut buf = Vec::new();
        f.read_to_end(&mut buf)?;
        Ok(buf)
    })?;

    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|source| IoError::Io { path: parent.to_path_buf(), source })?;
    }

    let tmp_path = dst.with_extension(tmp_extension(dst));
    std::fs::write(&tmp_path, &bytes)
        .map_err(|source| IoError::Io { path: tmp_path.clone(), source })?;

    with_write_lock(dst, |_| Ok(()))?;
    std::fs::rename(&tmp_path, dst)
        .map_err(|source| IoError::Io { path: dst.to_path_buf(), source })?;

    Ok(())
}

fn tmp_extension(dst: &Path) -> String {
    match dst.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{ext}.tmp"),
        None => "tmp".to_string(),
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
