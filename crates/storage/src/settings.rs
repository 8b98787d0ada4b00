// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncSettingsError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },

    #[error("failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

/// The one piece of engine state persisted across runs (spec.md §3, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default)]
    pub initial_sync_done: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self { initial_sync_done: false }
    }
}

impl SyncSettings {
    /// Load settings from `path`, defaulting to `initial_sync_done = false`
    /// if the file does not exist yet (first-ever run).
    pub fn load(path: &Path) -> Result<Self, SyncSettingsError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|source| SyncSettingsError::Parse { path: path.to_path_buf(), source }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(SyncSettingsError::Read { path: path.to_path_buf(), source }),
        }
    }

    /// Persist settings to `path`, replacing the previous contents
    /// atomically (write to a sibling `.tmp` file, then rename).
    pub fn save(&self, path: &Path) -> Result<(), SyncSettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| SyncSettingsError::Write { path: path.to_path_buf(), source })?;
        }

        let tmp_path = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(self)
            .map_err(|source| SyncSettingsError::Parse { path: path.to_path_buf(), source })?;

        std::fs::write(&tmp_path, json.as_bytes())
            .map_err(|source| SyncSettingsError::Write { path: tmp_path.clone(), source })?;
        std::fs::rename(&tmp_path, path)
            .map_err(|source| SyncSettingsError::Write { path: path.to_path_buf(), source })?;

        tracing::debug!(path = %path.display(), "persisted sync settings");
        Ok(())
    }

    /// Mark initial sync as done and persist immediately, matching the
    /// `Action::InitialSyncCompleted` contract in spec.md §4.7.
    pub fn mark_initial_sync_done(path: &Path) -> Result<Self, SyncSettingsError> {
        let settings = Self { initial_sync_done: true };
        settings.save(path)?;
        Ok(settings)
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
