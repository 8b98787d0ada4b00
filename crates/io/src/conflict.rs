// SPDX-License-Identifier: MIT

//! Conflict resolver (spec.md §4.7): version conflicts and initial-sync
//! collisions. Both preserve the "losing" content under a fresh name
//! rather than discarding it, per the no-data-loss property (spec.md §8.3).

use crate::coordinator;
use crate::error::IoError;
use crate::version_probe::UnresolvedVersion;
use fsync_core::{fresh_name, LocalItem, MetadataItem};
use std::path::{Path, PathBuf};

/// Resolve a cloud version conflict for `current_url` (spec.md §4.7):
/// pick the unresolved version with the greatest modification date as
/// `latest`, copy the current file's bytes to a fresh url (preserving
/// the loser), then replace the current file with `latest`'s bytes.
///
/// `read_bytes` abstracts over where a version's bytes actually live
/// (the current file, or a platform-specific version handle) so this
/// function stays testable without a real cloud container.
///
/// Returns the preserved url and the version that was kept, if any was
/// chosen; the caller is responsible for telling the platform's
/// `VersionProbe` to mark every other version resolved (spec.md §4.7).
pub fn resolve_version_conflict(
    current_url: &Path,
    versions: &[UnresolvedVersion],
    read_bytes: impl Fn(&Path) -> std::io::Result<Vec<u8>>,
) -> Result<(PathBuf, Option<UnresolvedVersion>), IoError> {
    let latest = match versions.iter().max_by_key(|v| v.last_modification_date) {
        Some(latest) => latest,
        None => return Ok((current_url.to_path_buf(), None)),
    };
    let latest = latest.clone();

    let fresh_url = fsync_core::namegen::fresh_url(current_url, None);

    // If an observer already created the fresh url (a race with another
    // process running the same resolution), treat it as already resolved.
    if fresh_url.exists() {
        return Ok((fresh_url, Some(latest)));
    }

    let current_bytes =
        read_bytes(current_url).map_err(|source| IoError::Io { path: current_url.to_path_buf(), source })?;
    std::fs::write(&fresh_url, &current_bytes)
        .map_err(|source| IoError::Io { path: fresh_url.clone(), source })?;

    let latest_bytes = read_bytes(&latest.file_url)
        .map_err(|source| IoError::Io { path: latest.file_url.clone(), source })?;
    coordinator::with_write_lock(current_url, |_| Ok(()))?;
    std::fs::write(current_url, &latest_bytes)
        .map_err(|source| IoError::Io { path: current_url.to_path_buf(), source })?;
    filetime::set_file_mtime(
        current_url,
        filetime::FileTime::from_unix_time((latest.last_modification_date / 1000) as i64, 0),
    )
    .map_err(|source| IoError::Io { path: current_url.to_path_buf(), source })?;

    Ok((fresh_url, Some(latest)))
}

/// Initial-sync collision (spec.md §4.7): copy `item`'s bytes to a
/// device-suffixed fresh name, preserving this device's local history
/// as a distinct file before the cloud items take over the original
/// name via the normal incremental path.
pub fn resolve_initial_collision(item: &LocalItem, device_name: &str) -> Result<PathBuf, IoError> {
    let fresh = fresh_name(
        item.file_name().as_str(),
        Some(device_name),
        |candidate| item.file_url().with_file_name(candidate).exists(),
    );
    let fresh_url = item.file_url().with_file_name(fresh);

    coordinator::copy_coordinated(item.file_url(), &fresh_url)?;
    filetime::set_file_mtime(
        &fresh_url,
        filetime::FileTime::from_unix_time((item.last_modification_date / 1000) as i64, 0),
    )
    .map_err(|source| IoError::Io { path: fresh_url.clone(), source })?;

    Ok(fresh_url)
}

#[cfg(test)]
#[path = "conflict_tests.rs"]
mod tests;
