// SPDX-License-Identifier: MIT

//! Centralized environment variable access for the daemon crate.

use crate::error::LifecycleError;
use std::path::PathBuf;

/// Resolve state directory: `FSYNC_STATE_DIR` > `XDG_STATE_HOME`/fsync >
/// `~/.local/state/fsync`.
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("FSYNC_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(dir) = dirs::state_dir() {
        return Ok(dir.join("fsync"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/fsync"))
}

/// Local directory to mirror (spec.md §6). Required; there is no sane
/// platform-independent default for "the app's document directory".
pub fn local_dir() -> Result<PathBuf, LifecycleError> {
    std::env::var("FSYNC_LOCAL_DIR")
        .map(PathBuf::from)
        .map_err(|_| LifecycleError::MissingEnv("FSYNC_LOCAL_DIR"))
}

/// Cloud replica directory (spec.md §6's "identifier of the cloud
/// container"). Required for the same reason as `local_dir`.
pub fn cloud_dir() -> Result<PathBuf, LifecycleError> {
    std::env::var("FSYNC_CLOUD_DIR")
        .map(PathBuf::from)
        .map_err(|_| LifecycleError::MissingEnv("FSYNC_CLOUD_DIR"))
}

/// Device name used in name generation (spec.md §4.6/§6).
pub fn device_name() -> String {
    std::env::var("FSYNC_DEVICE_NAME").unwrap_or_else(|_| {
        hostname_fallback().unwrap_or_else(|| "unknown-device".to_string())
    })
}

/// File extension this instance synchronizes (spec.md §4.1: "the engine
/// operates on one extension").
pub fn extension() -> String {
    std::env::var("FSYNC_EXTENSION").unwrap_or_else(|_| "kml".to_string())
}

fn hostname_fallback() -> Option<String> {
    std::env::var("HOSTNAME").ok().or_else(|| std::env::var("COMPUTERNAME").ok())
}
