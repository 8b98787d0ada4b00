// SPDX-License-Identifier: MIT

use crate::env;
use crate::error::LifecycleError;
use std::path::PathBuf;

/// Daemon configuration (spec.md §6: "Environment").
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory mirrored on the local side.
    pub local_dir: PathBuf,
    /// Directory standing in for the cloud container.
    pub cloud_dir: PathBuf,
    /// File extension this instance synchronizes.
    pub extension: String,
    /// Name used to tag initial-collision copies.
    pub device_name: String,
    /// Path to the persisted `initial_sync_done` flag.
    pub settings_path: PathBuf,
}

impl Config {
    /// Load configuration from the environment (spec.md §6). Uses a
    /// state directory under `FSYNC_STATE_DIR` (or the platform's XDG
    /// state directory) for the persisted settings file; `local_dir`
    /// and `cloud_dir` have no sane default and must be set explicitly.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = env::state_dir()?;
        Ok(Self {
            local_dir: env::local_dir()?,
            cloud_dir: env::cloud_dir()?,
            extension: env::extension(),
            device_name: env::device_name(),
            settings_path: state_dir.join("settings.json"),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
