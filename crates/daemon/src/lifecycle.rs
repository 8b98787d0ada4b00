// SPDX-License-Identifier: MIT

//! The lifecycle controller (spec.md §5): owns the monitors, the pure
//! engine, and the orchestrator, and wires the three together into a
//! running sync session.

use crate::error::LifecycleError;
use fsync_adapters::{BookmarkLoader, CloudMonitor, DelegateEvent, LocalMonitor};
use fsync_core::{Event as CoreEvent, EngineState};
use fsync_io::{ActionOutcome, DownloadAgent, Orchestrator, VersionProbe};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Stopped,
    Running,
    Paused,
}

/// Owns a running (or pausable) sync session for one extension.
///
/// Generic over the monitor, download-agent, version-probe and
/// bookmark-loader implementations so production code wires in the
/// real, file-system backed ones (see `fsyncd.rs`) while tests wire in
/// fakes.
pub struct Lifecycle<LM: LocalMonitor, CM: CloudMonitor, D: DownloadAgent, V: VersionProbe, B: BookmarkLoader> {
    state: Arc<Mutex<LifecycleState>>,
    local_monitor: Arc<LM>,
    cloud_monitor: Arc<CM>,
    orchestrator: Arc<Orchestrator<D, V, B>>,
    engine: Arc<Mutex<EngineState>>,
    settings_path: PathBuf,
    event_rx: Mutex<Option<mpsc::UnboundedReceiver<DelegateEvent>>>,
    event_loop: Mutex<Option<JoinHandle<()>>>,
    background_token: Mutex<Option<CancellationToken>>,
}

impl<LM, CM, D, V, B> Lifecycle<LM, CM, D, V, B>
where
    LM: LocalMonitor,
    CM: CloudMonitor,
    D: DownloadAgent,
    V: VersionProbe,
    B: BookmarkLoader,
{
    pub fn new(
        local_monitor: Arc<LM>,
        cloud_monitor: Arc<CM>,
        orchestrator: Arc<Orchestrator<D, V, B>>,
        event_rx: mpsc::UnboundedReceiver<DelegateEvent>,
        engine: EngineState,
        settings_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(LifecycleState::Stopped)),
            local_monitor,
            cloud_monitor,
            orchestrator,
            engine: Arc::new(Mutex::new(engine)),
            settings_path: settings_path.into(),
            event_rx: Mutex::new(Some(event_rx)),
            event_loop: Mutex::new(None),
            background_token: Mutex::new(None),
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock()
    }

    /// Start a sync session (spec.md §5): requires the cloud container
    /// to be reachable before either monitor is started.
    pub async fn start(&self) -> Result<(), LifecycleError> {
        if *self.state.lock() != LifecycleState::Stopped {
            return Err(LifecycleError::AlreadyRunning);
        }
        if !self.cloud_monitor.is_available().await {
            return Err(LifecycleError::CloudUnavailable);
        }

        self.cloud_monitor.start().await?;
        self.local_monitor.start().await?;

        let rx = self
            .event_rx
            .lock()
            .take()
            .ok_or(LifecycleError::AlreadyRunning)?;

        let handle = tokio::spawn(run_event_loop(
            rx,
            Arc::clone(&self.engine),
            Arc::clone(&self.orchestrator),
            self.settings_path.clone(),
            Arc::clone(&self.state),
            Arc::clone(&self.local_monitor),
            Arc::clone(&self.cloud_monitor),
        ));
        *self.event_loop.lock() = Some(handle);
        *self.state.lock() = LifecycleState::Running;
        Ok(())
    }

    /// Stop the sync session, resetting the engine's gathered state so
    /// a subsequent `start` performs a fresh initial reconciliation pass.
    pub async fn stop(&self) -> Result<(), LifecycleError> {
        if *self.state.lock() == LifecycleState::Stopped {
            return Err(LifecycleError::NotRunning);
        }

        self.local_monitor.stop().await;
        self.cloud_monitor.stop().await;
        if let Some(handle) = self.event_loop.lock().take() {
            handle.abort();
        }
        self.engine.lock().resolve(CoreEvent::Reset);
        *self.state.lock() = LifecycleState::Stopped;
        Ok(())
    }

    pub async fn pause(&self) -> Result<(), LifecycleError> {
        if *self.state.lock() != LifecycleState::Running {
            return Err(LifecycleError::NotRunning);
        }
        self.local_monitor.pause().await;
        self.cloud_monitor.pause().await;
        *self.state.lock() = LifecycleState::Paused;
        Ok(())
    }

    pub async fn resume(&self) -> Result<(), LifecycleError> {
        if *self.state.lock() != LifecycleState::Paused {
            return Err(LifecycleError::NotRunning);
        }
        self.local_monitor.resume().await;
        self.cloud_monitor.resume().await;
        *self.state.lock() = LifecycleState::Running;
        Ok(())
    }

    /// Enter an app-background state (spec.md §5's background-extension
    /// window): if an orchestrator batch is mid-flight, keep monitoring
    /// for up to `extension_budget` before pausing; otherwise pause
    /// immediately.
    pub async fn enter_background(&self, extension_budget: Duration) -> Result<(), LifecycleError> {
        if !self.orchestrator.is_in_progress() {
            return self.pause().await;
        }

        let token = CancellationToken::new();
        *self.background_token.lock() = Some(token.clone());

        let local_monitor = Arc::clone(&self.local_monitor);
        let cloud_monitor = Arc::clone(&self.cloud_monitor);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(extension_budget) => {
                    if *state.lock() == LifecycleState::Running {
                        local_monitor.pause().await;
                        cloud_monitor.pause().await;
                        *state.lock() = LifecycleState::Paused;
                    }
                }
                _ = token.cancelled() => {}
            }
        });
        Ok(())
    }

    /// Cancel a pending background extension, e.g. because the app
    /// returned to the foreground before the budget elapsed.
    pub fn cancel_background_extension(&self) {
        if let Some(token) = self.background_token.lock().take() {
            token.cancel();
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_event_loop<LM, CM, D, V, B>(
    mut rx: mpsc::UnboundedReceiver<DelegateEvent>,
    engine: Arc<Mutex<EngineState>>,
    orchestrator: Arc<Orchestrator<D, V, B>>,
    settings_path: PathBuf,
    state: Arc<Mutex<LifecycleState>>,
    local_monitor: Arc<LM>,
    cloud_monitor: Arc<CM>,
) where
    LM: LocalMonitor,
    CM: CloudMonitor,
    D: DownloadAgent,
    V: VersionProbe,
    B: BookmarkLoader,
{
    while let Some(delegate_event) = rx.recv().await {
        let event = to_core_event(delegate_event);
        let actions = engine.lock().resolve(event);
        let results = orchestrator.execute_batch(actions).await;

        for (action, result) in results {
            match result {
                Ok(ActionOutcome::InitialSyncCompleted) => {
                    if let Err(e) =
                        fsync_storage::SyncSettings::mark_initial_sync_done(&settings_path)
                    {
                        tracing::warn!(error = %e, "failed to persist initial_sync_done");
                    }
                }
                Ok(ActionOutcome::ErrorReported(e)) if e.is_fatal() => {
                    tracing::error!(error = %e, "fatal engine error; stopping sync session");
                    local_monitor.stop().await;
                    cloud_monitor.stop().await;
                    *state.lock() = LifecycleState::Stopped;
                    return;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(?action, error = %e, "orchestrator action failed");
                }
            }
        }
    }
}

fn to_core_event(event: DelegateEvent) -> CoreEvent {
    match event {
        DelegateEvent::FinishedGatheringLocal(inv) => CoreEvent::FinishedGatheringLocal(inv),
        DelegateEvent::FinishedGatheringCloud(inv) => CoreEvent::FinishedGatheringCloud(inv),
        DelegateEvent::UpdatedLocal(inv) => CoreEvent::UpdatedLocal(inv),
        DelegateEvent::UpdatedCloud(inv) => CoreEvent::UpdatedCloud(inv),
        DelegateEvent::Error(e) => CoreEvent::Error(e),
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
