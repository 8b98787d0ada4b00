use super::*;
use fsync_adapters::test_support::{FakeBookmarkLoader, FakeCloudMonitor, FakeLocalMonitor};
use fsync_core::{EngineError, EngineState};
use fsync_io::test_support::{FakeDownloadAgent, FakeVersionProbe};
use fsync_io::Orchestrator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

type TestLifecycle =
    Lifecycle<FakeLocalMonitor, FakeCloudMonitor, FakeDownloadAgent, FakeVersionProbe, FakeBookmarkLoader>;

fn make_lifecycle(
    cloud_monitor: FakeCloudMonitor,
    settings_path: std::path::PathBuf,
) -> (TestLifecycle, mpsc::UnboundedSender<fsync_adapters::DelegateEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let orchestrator = Orchestrator::new(
        "/tmp/fsync-lifecycle-local",
        "/tmp/fsync-lifecycle-cloud",
        "test-device",
        FakeDownloadAgent::default(),
        FakeVersionProbe::default(),
        Arc::new(FakeBookmarkLoader::default()),
    );
    let lifecycle = Lifecycle::new(
        Arc::new(FakeLocalMonitor::default()),
        Arc::new(cloud_monitor),
        Arc::new(orchestrator),
        rx,
        EngineState::new("test-device", false),
        settings_path,
    );
    (lifecycle, tx)
}

#[tokio::test]
async fn start_fails_when_cloud_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let (lifecycle, _tx) =
        make_lifecycle(FakeCloudMonitor::default().unavailable(), dir.path().join("settings.json"));

    let result = lifecycle.start().await;
    assert!(matches!(result, Err(LifecycleError::CloudUnavailable)));
    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn start_then_stop_round_trips_state() {
    let dir = tempfile::tempdir().unwrap();
    let (lifecycle, _tx) =
        make_lifecycle(FakeCloudMonitor::default(), dir.path().join("settings.json"));

    lifecycle.start().await.unwrap();
    assert_eq!(lifecycle.state(), LifecycleState::Running);

    lifecycle.stop().await.unwrap();
    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn starting_twice_reports_already_running() {
    let dir = tempfile::tempdir().unwrap();
    let (lifecycle, _tx) =
        make_lifecycle(FakeCloudMonitor::default(), dir.path().join("settings.json"));

    lifecycle.start().await.unwrap();
    let result = lifecycle.start().await;
    assert!(matches!(result, Err(LifecycleError::AlreadyRunning)));
}

#[tokio::test]
async fn pause_and_resume_toggle_state() {
    let dir = tempfile::tempdir().unwrap();
    let (lifecycle, _tx) =
        make_lifecycle(FakeCloudMonitor::default(), dir.path().join("settings.json"));

    lifecycle.start().await.unwrap();
    lifecycle.pause().await.unwrap();
    assert_eq!(lifecycle.state(), LifecycleState::Paused);

    lifecycle.resume().await.unwrap();
    assert_eq!(lifecycle.state(), LifecycleState::Running);
}

#[tokio::test]
async fn initial_sync_completed_persists_settings_flag() {
    let dir = tempfile::tempdir().unwrap();
    let settings_path = dir.path().join("settings.json");
    let (lifecycle, tx) = make_lifecycle(FakeCloudMonitor::default(), settings_path.clone());

    lifecycle.start().await.unwrap();

    tx.send(fsync_adapters::DelegateEvent::FinishedGatheringLocal(Default::default())).unwrap();
    tx.send(fsync_adapters::DelegateEvent::FinishedGatheringCloud(Default::default())).unwrap();

    // Give the spawned event loop a chance to process both events.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let settings = fsync_storage::SyncSettings::load(&settings_path).unwrap();
    assert!(settings.initial_sync_done);
}

#[tokio::test]
async fn fatal_error_event_stops_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let (lifecycle, tx) =
        make_lifecycle(FakeCloudMonitor::default(), dir.path().join("settings.json"));

    lifecycle.start().await.unwrap();
    tx.send(fsync_adapters::DelegateEvent::Error(EngineError::CloudUnavailable)).unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn entering_background_without_in_flight_work_pauses_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let (lifecycle, _tx) =
        make_lifecycle(FakeCloudMonitor::default(), dir.path().join("settings.json"));

    lifecycle.start().await.unwrap();
    lifecycle.enter_background(Duration::from_secs(30)).await.unwrap();
    assert_eq!(lifecycle.state(), LifecycleState::Paused);
}
