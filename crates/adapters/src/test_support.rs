// SPDX-License-Identifier: MIT

//! Fakes for this crate's consumed interfaces, shared with downstream
//! crates' tests via the `test-support` feature.

use crate::bookmarks::{BookmarkLoader, BookmarkLoaderError};
use crate::monitor::{CloudMonitor, DelegateEvent, EventSink, LocalMonitor, MonitorError};
use crate::settings::SettingsSource;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Records every event dispatched to it; used to assert on what a
/// monitor emitted without driving a real state machine.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<DelegateEvent>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<DelegateEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn dispatch(&self, event: DelegateEvent) {
        self.events.lock().push(event);
    }
}

#[derive(Default)]
struct FakeBookmarkLoaderState {
    load_count: usize,
    fail: bool,
}

/// In-memory bookmark loader for tests: records call count and can be
/// toggled to fail.
#[derive(Clone, Default)]
pub struct FakeBookmarkLoader {
    inner: Arc<Mutex<FakeBookmarkLoaderState>>,
}

impl FakeBookmarkLoader {
    pub fn failing(self) -> Self {
        self.inner.lock().fail = true;
        self
    }

    pub fn load_count(&self) -> usize {
        self.inner.lock().load_count
    }
}

#[async_trait]
impl BookmarkLoader for FakeBookmarkLoader {
    async fn load(&self) -> Result<(), BookmarkLoaderError> {
        let mut state = self.inner.lock();
        state.load_count += 1;
        if state.fail {
            return Err(BookmarkLoaderError::LoadFailed("forced failure".to_string()));
        }
        Ok(())
    }
}

/// In-memory settings source for tests, backed by a `watch` channel so
/// tests can assert on change notification without a real settings UI.
#[derive(Clone)]
pub struct FakeSettingsSource {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl FakeSettingsSource {
    pub fn new(initial: bool) -> Self {
        let (tx, rx) = watch::channel(initial);
        Self { tx: Arc::new(tx), rx }
    }

    pub fn set_sync_enabled(&self, enabled: bool) {
        let _ = self.tx.send(enabled);
    }
}

impl SettingsSource for FakeSettingsSource {
    fn sync_enabled(&self) -> bool {
        *self.rx.borrow()
    }

    fn watch_sync_enabled(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FakeRunState {
    Stopped,
    Running,
    Paused,
}

#[derive(Default)]
struct FakeMonitorState {
    run: Option<FakeRunState>,
    start_calls: usize,
    stop_calls: usize,
    pause_calls: usize,
    resume_calls: usize,
    fail_start: bool,
    available: bool,
}

/// In-memory local monitor for lifecycle tests: no real file-system
/// watching, just records start/stop/pause/resume calls.
#[derive(Clone, Default)]
pub struct FakeLocalMonitor {
    inner: Arc<Mutex<FakeMonitorState>>,
}

impl FakeLocalMonitor {
    pub fn failing_to_start(self) -> Self {
        self.inner.lock().fail_start = true;
        self
    }

    pub fn start_calls(&self) -> usize {
        self.inner.lock().start_calls
    }

    pub fn stop_calls(&self) -> usize {
        self.inner.lock().stop_calls
    }

    pub fn is_paused(&self) -> bool {
        self.inner.lock().run == Some(FakeRunState::Paused)
    }
}

#[async_trait]
impl LocalMonitor for FakeLocalMonitor {
    async fn start(&self) -> Result<(), MonitorError> {
        let mut state = self.inner.lock();
        if state.fail_start {
            return Err(MonitorError::WatchFailed("forced failure".to_string()));
        }
        state.start_calls += 1;
        state.run = Some(FakeRunState::Running);
        Ok(())
    }

    async fn stop(&self) {
        let mut state = self.inner.lock();
        state.stop_calls += 1;
        state.run = Some(FakeRunState::Stopped);
    }

    async fn pause(&self) {
        let mut state = self.inner.lock();
        state.pause_calls += 1;
        state.run = Some(FakeRunState::Paused);
    }

    async fn resume(&self) {
        let mut state = self.inner.lock();
        state.resume_calls += 1;
        state.run = Some(FakeRunState::Running);
    }
}

/// In-memory cloud monitor for lifecycle tests, with a configurable
/// availability flag standing in for the real `is_available` network
/// check.
#[derive(Clone)]
pub struct FakeCloudMonitor {
    inner: Arc<Mutex<FakeMonitorState>>,
}

impl Default for FakeCloudMonitor {
    fn default() -> Self {
        let mut state = FakeMonitorState::default();
        state.available = true;
        Self { inner: Arc::new(Mutex::new(state)) }
    }
}

impl FakeCloudMonitor {
    pub fn unavailable(self) -> Self {
        self.inner.lock().available = false;
        self
    }

    pub fn start_calls(&self) -> usize {
        self.inner.lock().start_calls
    }

    pub fn stop_calls(&self) -> usize {
        self.inner.lock().stop_calls
    }

    pub fn is_paused(&self) -> bool {
        self.inner.lock().run == Some(FakeRunState::Paused)
    }
}

#[async_trait]
impl CloudMonitor for FakeCloudMonitor {
    async fn start(&self) -> Result<(), MonitorError> {
        let mut state = self.inner.lock();
        state.start_calls += 1;
        state.run = Some(FakeRunState::Running);
        Ok(())
    }

    async fn stop(&self) {
        let mut state = self.inner.lock();
        state.stop_calls += 1;
        state.run = Some(FakeRunState::Stopped);
    }

    async fn pause(&self) {
        let mut state = self.inner.lock();
        state.pause_calls += 1;
        state.run = Some(FakeRunState::Paused);
    }

    async fn resume(&self) {
        let mut state = self.inner.lock();
        state.resume_calls += 1;
        state.run = Some(FakeRunState::Running);
    }

    async fn is_available(&self) -> bool {
        self.inner.lock().available
    }

    fn is_started(&self) -> bool {
        self.inner.lock().run.map(|r| r != FakeRunState::Stopped).unwrap_or(false)
    }

    fn is_paused(&self) -> bool {
        self.inner.lock().run == Some(FakeRunState::Paused)
    }

    async fn fetch_container_url(&self) -> Result<PathBuf, MonitorError> {
        if !self.inner.lock().available {
            return Err(MonitorError::WatchFailed("container unavailable".to_string()));
        }
        Ok(PathBuf::from("/fake/cloud"))
    }
}
