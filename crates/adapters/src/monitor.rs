// SPDX-License-Identifier: MIT

//! Directory monitor contracts (spec.md §4.1) plus one real, file-system
//! backed implementation of each side.
//!
//! The local and cloud replicas are both plain directories in this
//! rewrite — there is no real iCloud container to query, so
//! `FsCloudMonitor` polls a second directory on the same host instead of
//! calling a platform API. That keeps the contract identical to what a
//! real cloud-backed implementation would satisfy while staying
//! testable without any platform dependency, matching this crate's
//! fake/real split (see `notify.rs`'s `NotifyAdapter`/`DesktopNotifyAdapter`).

use async_trait::async_trait;
use fsync_core::{CloudInventory, CloudItem, FileName, LocalInventory, LocalItem};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Errors from monitor lifecycle operations.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("monitor already started")]
    AlreadyStarted,

    #[error("failed to read directory {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to install file-system watch: {0}")]
    WatchFailed(String),
}

/// Events a monitor emits to its sink, mirroring the delegate interface
/// of spec.md §4.1. Carried as an enum (rather than four methods) so a
/// single channel can transport both local and cloud emissions.
#[derive(Debug, Clone)]
pub enum DelegateEvent {
    FinishedGatheringLocal(LocalInventory),
    FinishedGatheringCloud(CloudInventory),
    UpdatedLocal(LocalInventory),
    UpdatedCloud(CloudInventory),
    Error(fsync_core::EngineError),
}

/// Sink a monitor reports to. Implemented by the lifecycle controller,
/// which forwards each event into `EngineState::resolve` under its
/// mutex (spec.md §5).
#[async_trait]
pub trait EventSink: Clone + Send + Sync + 'static {
    async fn dispatch(&self, event: DelegateEvent);
}

#[async_trait]
impl EventSink for mpsc::UnboundedSender<DelegateEvent> {
    async fn dispatch(&self, event: DelegateEvent) {
        // The receiving end owns the mutex-guarded state machine; a send
        // failure only happens after shutdown, when there is nothing
        // left to dispatch to.
        let _ = self.send(event);
    }
}

/// Local directory monitor contract (spec.md §4.1).
#[async_trait]
pub trait LocalMonitor: Send + Sync + 'static {
    async fn start(&self) -> Result<(), MonitorError>;
    async fn stop(&self);
    async fn pause(&self);
    async fn resume(&self);
}

/// Cloud replica monitor contract (spec.md §4.1), extended with
/// availability and container resolution.
#[async_trait]
pub trait CloudMonitor: Send + Sync + 'static {
    async fn start(&self) -> Result<(), MonitorError>;
    async fn stop(&self);
    async fn pause(&self);
    async fn resume(&self);
    async fn is_available(&self) -> bool;
    fn is_started(&self) -> bool;
    fn is_paused(&self) -> bool;
    async fn fetch_container_url(&self) -> Result<PathBuf, MonitorError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Stopped,
    Running,
    Paused,
}

/// Snapshot a flat directory of `extension`-suffixed files into a
/// [`LocalInventory`].
fn scan_local(dir: &Path, extension: &str) -> Result<LocalInventory, MonitorError> {
    let mut inv = LocalInventory::new();
    let entries = std::fs::read_dir(dir)
        .map_err(|source| MonitorError::Io { path: dir.to_path_buf(), source })?;

    for entry in entries {
        let entry = entry.map_err(|source| MonitorError::Io { path: dir.to_path_buf(), source })?;
        let path = entry.path();
        if !has_extension(&path, extension) {
            continue;
        }
        let meta = entry
            .metadata()
            .map_err(|source| MonitorError::Io { path: path.clone(), source })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let modified_ms = mtime_ms(&meta);
        inv.insert(
            FileName::new(name.clone()),
            LocalItem {
                file_name: FileName::new(name),
                file_url: path,
                file_size: Some(meta.len()),
                content_type: None,
                creation_date: modified_ms,
                last_modification_date: modified_ms,
            },
        );
    }
    Ok(inv)
}

/// Snapshot a cloud-replica directory, treating files under `.Trash` as
/// trashed and everything else as already downloaded (there is no real
/// partial-download state on a local disk).
fn scan_cloud(dir: &Path, extension: &str) -> Result<CloudInventory, MonitorError> {
    let mut inv = CloudInventory::new();
    scan_cloud_dir(dir, dir, extension, &mut inv)?;
    Ok(inv)
}

fn scan_cloud_dir(
    root: &Path,
    dir: &Path,
    extension: &str,
    inv: &mut CloudInventory,
) -> Result<(), MonitorError> {
    if !dir.exists() {
        return Ok(());
    }
    let entries = std::fs::read_dir(dir)
        .map_err(|source| MonitorError::Io { path: dir.to_path_buf(), source })?;

    for entry in entries {
        let entry = entry.map_err(|source| MonitorError::Io { path: dir.to_path_buf(), source })?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|source| MonitorError::Io { path: path.clone(), source })?;

        if file_type.is_dir() {
            // Trash contents are flat; we don't recurse into nested dirs.
            if path == root.join(fsync_core::metadata::TRASH_DIR_NAME) {
                scan_cloud_dir(root, &path, extension, inv)?;
            }
            continue;
        }

        if !has_extension(&path, extension) {
            continue;
        }

        let meta = entry
            .metadata()
            .map_err(|source| MonitorError::Io { path: path.clone(), source })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let modified_ms = mtime_ms(&meta);
        let is_in_trash = fsync_core::metadata::CloudItem::path_is_in_trash(&path);
        inv.insert(
            FileName::new(name.clone()),
            CloudItem {
                file_name: FileName::new(name),
                file_url: path,
                file_size: Some(meta.len()),
                content_type: None,
                creation_date: modified_ms,
                last_modification_date: modified_ms,
                is_downloaded: true,
                download_fraction: None,
                is_in_trash,
            },
        );
    }
    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}

fn mtime_ms(meta: &std::fs::Metadata) -> u64 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Real, `notify`-backed local directory monitor.
///
/// Coalesces bursts of file-system events over `debounce` (spec.md
/// §4.1 suggests ≈1s) before re-scanning and re-emitting the full
/// inventory, and filters by `extension`.
pub struct FsLocalMonitor<S: EventSink> {
    dir: PathBuf,
    extension: String,
    debounce: Duration,
    sink: S,
    state: Arc<Mutex<RunState>>,
    watcher: Mutex<Option<notify::RecommendedWatcher>>,
}

impl<S: EventSink> FsLocalMonitor<S> {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>, sink: S) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            debounce: Duration::from_secs(1),
            sink,
            state: Arc::new(Mutex::new(RunState::Stopped)),
            watcher: Mutex::new(None),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

#[async_trait]
impl<S: EventSink> LocalMonitor for FsLocalMonitor<S> {
    async fn start(&self) -> Result<(), MonitorError> {
        {
            let mut state = self.state.lock();
            if *state != RunState::Stopped {
                return Err(MonitorError::AlreadyStarted);
            }
            *state = RunState::Running;
        }

        let inv = scan_local(&self.dir, &self.extension)?;
        self.sink.dispatch(DelegateEvent::FinishedGatheringLocal(inv)).await;

        let (raw_tx, mut raw_rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                let _ = raw_tx.send(event);
            }
        })
        .map_err(|e| MonitorError::WatchFailed(e.to_string()))?;

        use notify::Watcher;
        watcher
            .watch(&self.dir, notify::RecursiveMode::NonRecursive)
            .map_err(|e| MonitorError::WatchFailed(e.to_string()))?;
        *self.watcher.lock() = Some(watcher);

        let dir = self.dir.clone();
        let extension = self.extension.clone();
        let debounce = self.debounce;
        let sink = self.sink.clone();
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            loop {
                match raw_rx.recv().await {
                    Some(_first) => {
                        // Drain and coalesce whatever else arrives within the
                        // debounce window before re-scanning.
                        let deadline = tokio::time::sleep(debounce);
                        tokio::pin!(deadline);
                        loop {
                            tokio::select! {
                                more = raw_rx.recv() => {
                                    if more.is_none() {
                                        return;
                                    }
                                }
                                _ = &mut deadline => break,
                            }
                        }

                        if *state.lock() != RunState::Running {
                            continue;
                        }

                        match scan_local(&dir, &extension) {
                            Ok(inv) => sink.dispatch(DelegateEvent::UpdatedLocal(inv)).await,
                            Err(e) => {
                                sink.dispatch(DelegateEvent::Error(
                                    fsync_core::EngineError::Internal(e.to_string()),
                                ))
                                .await
                            }
                        }
                    }
                    None => return,
                }
            }
        });

        Ok(())
    }

    async fn stop(&self) {
        *self.state.lock() = RunState::Stopped;
        *self.watcher.lock() = None;
    }

    async fn pause(&self) {
        let mut state = self.state.lock();
        if *state == RunState::Running {
            *state = RunState::Paused;
        }
    }

    async fn resume(&self) {
        let mut state = self.state.lock();
        if *state == RunState::Paused {
            *state = RunState::Running;
        }
    }
}

/// Real, polling-based cloud replica monitor.
///
/// Stands in for a platform cloud-container API: polls `dir` every
/// `poll_interval` and re-emits the full inventory when it changes.
pub struct FsCloudMonitor<S: EventSink> {
    dir: PathBuf,
    extension: String,
    poll_interval: Duration,
    sink: S,
    state: Arc<Mutex<RunState>>,
}

impl<S: EventSink> FsCloudMonitor<S> {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>, sink: S) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            poll_interval: Duration::from_secs(1),
            sink,
            state: Arc::new(Mutex::new(RunState::Stopped)),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

#[async_trait]
impl<S: EventSink> CloudMonitor for FsCloudMonitor<S> {
    async fn start(&self) -> Result<(), MonitorError> {
        {
            let mut state = self.state.lock();
            if *state != RunState::Stopped {
                return Err(MonitorError::AlreadyStarted);
            }
            *state = RunState::Running;
        }

        std::fs::create_dir_all(&self.dir)
            .map_err(|source| MonitorError::Io { path: self.dir.clone(), source })?;
        let inv = scan_cloud(&self.dir, &self.extension)?;
        self.sink.dispatch(DelegateEvent::FinishedGatheringCloud(inv.clone())).await;

        let dir = self.dir.clone();
        let extension = self.extension.clone();
        let sink = self.sink.clone();
        let state = Arc::clone(&self.state);
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            let mut last: HashMap<FileName, (u64, bool)> = inv
                .iter()
                .map(|(k, v)| (k.clone(), (v.last_modification_date, v.is_in_trash)))
                .collect();

            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if *state.lock() == RunState::Stopped {
                    return;
                }
                if *state.lock() == RunState::Paused {
                    continue;
                }

                match scan_cloud(&dir, &extension) {
                    Ok(inv) => {
                        let current: HashMap<FileName, (u64, bool)> = inv
                            .iter()
                            .map(|(k, v)| (k.clone(), (v.last_modification_date, v.is_in_trash)))
                            .collect();
                        if current != last {
                            last = current;
                            sink.dispatch(DelegateEvent::UpdatedCloud(inv)).await;
                        }
                    }
                    Err(e) => {
                        sink.dispatch(DelegateEvent::Error(fsync_core::EngineError::Internal(
                            e.to_string(),
                        )))
                        .await
                    }
                }
            }
        });

        Ok(())
    }

    async fn stop(&self) {
        *self.state.lock() = RunState::Stopped;
    }

    async fn pause(&self) {
        let mut state = self.state.lock();
        if *state == RunState::Running {
            *state = RunState::Paused;
        }
    }

    async fn resume(&self) {
        let mut state = self.state.lock();
        if *state == RunState::Paused {
            *state = RunState::Running;
        }
    }

    async fn is_available(&self) -> bool {
        self.dir.parent().map(|p| p.exists()).unwrap_or(true)
    }

    fn is_started(&self) -> bool {
        *self.state.lock() != RunState::Stopped
    }

    fn is_paused(&self) -> bool {
        *self.state.lock() == RunState::Paused
    }

    async fn fetch_container_url(&self) -> Result<PathBuf, MonitorError> {
        if !self.is_available().await {
            return Err(MonitorError::Io {
                path: self.dir.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "container unavailable"),
            });
        }
        Ok(self.dir.clone())
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
