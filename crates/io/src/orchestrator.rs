// SPDX-License-Identifier: MIT

//! The I/O orchestrator (spec.md §4.4): executes one [`Action`] at a
//! time per file, preserving modification timestamps and coordinating
//! access with anything else touching the same urls.

use crate::conflict;
use crate::coordinator;
use crate::download::DownloadAgent;
use crate::error::IoError;
use crate::version_probe::VersionProbe;
use fsync_adapters::{BookmarkLoader, BookmarkLoaderError};
use fsync_core::{metadata::TRASH_DIR_NAME, Action, CloudItem, EngineError, LocalItem, MetadataItem};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// What happened when one action was applied, for callers that need to
/// react (persist `initial_sync_done`, surface a fatal error, etc.).
#[derive(Debug)]
pub enum ActionOutcome {
    Applied,
    DownloadRequested,
    VersionConflictResolved { preserved_url: PathBuf },
    InitialCollisionResolved { preserved_url: PathBuf },
    InitialSyncCompleted,
    ErrorReported(EngineError),
}

#[derive(Default)]
struct OrchestratorFlags {
    reload_bookmarks: bool,
    in_progress: bool,
}

/// Executes the actions produced by `EngineState::resolve` against the
/// local directory and the cloud replica directory.
pub struct Orchestrator<D: DownloadAgent, V: VersionProbe, B: BookmarkLoader> {
    local_dir: PathBuf,
    cloud_dir: PathBuf,
    device_name: String,
    download_agent: D,
    version_probe: V,
    bookmark_loader: Arc<B>,
    flags: Mutex<OrchestratorFlags>,
    /// Single-permit semaphore signaling the loader's completion, per
    /// spec.md §4.4's "waiting via a single-permit semaphore".
    reload_gate: Arc<Semaphore>,
}

impl<D: DownloadAgent, V: VersionProbe, B: BookmarkLoader> Orchestrator<D, V, B> {
    pub fn new(
        local_dir: impl Into<PathBuf>,
        cloud_dir: impl Into<PathBuf>,
        device_name: impl Into<String>,
        download_agent: D,
        version_probe: V,
        bookmark_loader: Arc<B>,
    ) -> Self {
        Self {
            local_dir: local_dir.into(),
            cloud_dir: cloud_dir.into(),
            device_name: device_name.into(),
            download_agent,
            version_probe,
            bookmark_loader,
            flags: Mutex::new(OrchestratorFlags::default()),
            reload_gate: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.flags.lock().in_progress
    }

    /// Run one reconcile pass's actions sequentially (spec.md §5:
    /// "actions from one reconcile pass are submitted sequentially to a
    /// background work queue"), then, if any action touched local
    /// content, reload bookmarks and wait for the loader to finish.
    pub async fn execute_batch(
        &self,
        actions: Vec<Action>,
    ) -> Vec<(Action, Result<ActionOutcome, IoError>)> {
        self.flags.lock().in_progress = true;

        let mut results = Vec::with_capacity(actions.len());
        for action in actions {
            let outcome = self.execute_one(action.clone()).await;
            if matches!(
                outcome,
                Ok(ActionOutcome::Applied
                    | ActionOutcome::VersionConflictResolved { .. }
                    | ActionOutcome::InitialCollisionResolved { .. })
            ) {
                self.flags.lock().reload_bookmarks = true;
            }
            if let Err(ref e) = outcome {
                tracing::warn!(?action, error = %e, "action failed; next observation will retry");
            }
            results.push((action, outcome));
        }

        let should_reload = {
            let mut flags = self.flags.lock();
            let should = flags.reload_bookmarks;
            flags.reload_bookmarks = false;
            should
        };

        if should_reload {
            if let Err(e) = self.reload_bookmarks().await {
                tracing::warn!(error = %e, "bookmark reload failed");
            }
        }

        self.flags.lock().in_progress = false;
        results
    }

    async fn reload_bookmarks(&self) -> Result<(), IoError> {
        let _permit = self
            .reload_gate
            .acquire()
            .await
            .map_err(|e| IoError::BookmarkReload(e.to_string()))?;

        self.bookmark_loader
            .load()
            .await
            .map_err(|e: BookmarkLoaderError| IoError::BookmarkReload(e.to_string()))
    }

    async fn execute_one(&self, action: Action) -> Result<ActionOutcome, IoError> {
        match action {
            Action::StartDownload(item) => {
                self.download_agent.start_download(&item).await;
                Ok(ActionOutcome::DownloadRequested)
            }
            Action::CreateLocal(item) | Action::UpdateLocal(item) => {
                self.write_local(&item)?;
                Ok(ActionOutcome::Applied)
            }
            Action::RemoveLocal(item) => {
                remove_if_present(&self.local_url(&item))?;
                Ok(ActionOutcome::Applied)
            }
            Action::CreateCloud(item) | Action::UpdateCloud(item) => self.write_cloud(&item).await,
            Action::RemoveCloud(item) => {
                self.trash_cloud(&item)?;
                Ok(ActionOutcome::Applied)
            }
            Action::ResolveVersionConflict(item) => {
                let versions = self.version_probe.unresolved_versions(&item.file_url).await;
                let (preserved_url, kept) =
                    conflict::resolve_version_conflict(&item.file_url, &versions, std::fs::read)?;
                if let Some(kept) = &kept {
                    self.version_probe.mark_resolved(&item.file_url, kept).await;
                }
                Ok(ActionOutcome::VersionConflictResolved { preserved_url })
            }
            Action::ResolveInitialCollision(item) => {
                let preserved_url = conflict::resolve_initial_collision(&item, &self.device_name)?;
                Ok(ActionOutcome::InitialCollisionResolved { preserved_url })
            }
            Action::InitialSyncCompleted => Ok(ActionOutcome::InitialSyncCompleted),
            Action::ReportError(e) => Ok(ActionOutcome::ErrorReported(e)),
        }
    }

    fn local_url(&self, item: &CloudItem) -> PathBuf {
        self.local_dir.join(item.file_name().as_str())
    }

    fn write_local(&self, item: &CloudItem) -> Result<(), IoError> {
        let target = self.local_url(item);
        coordinator::copy_coordinated(&item.file_url, &target)?;
        set_mtime(&target, item.last_modification_date)
    }

    async fn write_cloud(&self, item: &LocalItem) -> Result<ActionOutcome, IoError> {
        if !self.cloud_dir.exists() {
            return Err(IoError::ContainerNotFound);
        }
        let target = self.cloud_dir.join(item.file_name().as_str());

        let versions = self.version_probe.unresolved_versions(&target).await;
        if !versions.is_empty() {
            let (preserved_url, kept) =
                conflict::resolve_version_conflict(&target, &versions, std::fs::read)?;
            if let Some(kept) = &kept {
                self.version_probe.mark_resolved(&target, kept).await;
            }
            return Ok(ActionOutcome::VersionConflictResolved { preserved_url });
        }

        coordinator::copy_coordinated(&item.file_url, &target)?;
        set_mtime(&target, item.last_modification_date)?;
        Ok(ActionOutcome::Applied)
    }

    /// Move a cloud file into the reserved trash directory, purging any
    /// same-named file already there first (spec.md §4.4).
    fn trash_cloud(&self, item: &LocalItem) -> Result<(), IoError> {
        let target = self.cloud_dir.join(item.file_name().as_str());
        let trash_dir = self.cloud_dir.join(TRASH_DIR_NAME);
        std::fs::create_dir_all(&trash_dir)
            .map_err(|source| IoError::Io { path: trash_dir.clone(), source })?;

        let trashed = trash_dir.join(item.file_name().as_str());
        remove_if_present(&trashed)?;

        if !target.exists() {
            return Ok(());
        }
        std::fs::rename(&target, &trashed)
            .map_err(|source| IoError::Io { path: trashed, source })
    }
}

fn remove_if_present(path: &std::path::Path) -> Result<(), IoError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(IoError::Io { path: path.to_path_buf(), source }),
    }
}

fn set_mtime(path: &std::path::Path, epoch_ms: u64) -> Result<(), IoError> {
    let ft = filetime::FileTime::from_unix_time((epoch_ms / 1000) as i64, 0);
    filetime::set_file_mtime(path, ft).map_err(|source| IoError::Io { path: path.to_path_buf(), source })
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
