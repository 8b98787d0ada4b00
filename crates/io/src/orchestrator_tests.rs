use super::*;
use crate::test_support::{FakeDownloadAgent, FakeVersionProbe};
use fsync_adapters::test_support::FakeBookmarkLoader;
use fsync_core::FileName;
use tempfile::tempdir;

fn cloud_item(dir: &std::path::Path, name: &str, mod_ms: u64) -> CloudItem {
    CloudItem {
        file_name: FileName::new(name),
        file_url: dir.join(name),
        file_size: None,
        content_type: None,
        creation_date: mod_ms,
        last_modification_date: mod_ms,
        is_downloaded: true,
        download_fraction: None,
        is_in_trash: false,
    }
}

fn local_item(dir: &std::path::Path, name: &str, mod_ms: u64) -> LocalItem {
    LocalItem {
        file_name: FileName::new(name),
        file_url: dir.join(name),
        file_size: None,
        content_type: None,
        creation_date: mod_ms,
        last_modification_date: mod_ms,
    }
}

fn orchestrator(
    local_dir: &std::path::Path,
    cloud_dir: &std::path::Path,
) -> Orchestrator<FakeDownloadAgent, FakeVersionProbe, FakeBookmarkLoader> {
    Orchestrator::new(
        local_dir,
        cloud_dir,
        "test-device",
        FakeDownloadAgent::default(),
        FakeVersionProbe::default(),
        Arc::new(FakeBookmarkLoader::default()),
    )
}

#[tokio::test]
async fn create_local_copies_bytes_and_sets_mtime() {
    let local = tempdir().unwrap();
    let cloud = tempdir().unwrap();
    std::fs::write(cloud.path().join("a.kml"), b"cloud bytes").unwrap();

    let orch = orchestrator(local.path(), cloud.path());
    let item = cloud_item(cloud.path(), "a.kml", 5_000);
    let results = orch.execute_batch(vec![Action::CreateLocal(item)]).await;

    assert_eq!(results.len(), 1);
    assert!(matches!(results[0].1, Ok(ActionOutcome::Applied)));
    assert_eq!(std::fs::read(local.path().join("a.kml")).unwrap(), b"cloud bytes");
}

#[tokio::test]
async fn remove_local_is_idempotent_when_file_is_already_absent() {
    let local = tempdir().unwrap();
    let cloud = tempdir().unwrap();
    let orch = orchestrator(local.path(), cloud.path());
    let item = cloud_item(cloud.path(), "missing.kml", 0);

    let results = orch.execute_batch(vec![Action::RemoveLocal(item)]).await;
    assert!(matches!(results[0].1, Ok(ActionOutcome::Applied)));
}

#[tokio::test]
async fn create_cloud_fails_with_container_not_found_when_cloud_dir_is_missing() {
    let local = tempdir().unwrap();
    let missing_cloud = local.path().join("does-not-exist");
    std::fs::write(local.path().join("a.kml"), b"local bytes").unwrap();

    let orch = orchestrator(local.path(), &missing_cloud);
    let item = local_item(local.path(), "a.kml", 1);
    let results = orch.execute_batch(vec![Action::CreateCloud(item)]).await;

    assert!(matches!(results[0].1, Err(IoError::ContainerNotFound)));
}

#[tokio::test]
async fn remove_cloud_moves_file_into_trash_and_purges_existing_collision() {
    let local = tempdir().unwrap();
    let cloud = tempdir().unwrap();
    std::fs::write(cloud.path().join("a.kml"), b"to be trashed").unwrap();
    std::fs::create_dir_all(cloud.path().join(".Trash")).unwrap();
    std::fs::write(cloud.path().join(".Trash/a.kml"), b"stale trash entry").unwrap();

    let orch = orchestrator(local.path(), cloud.path());
    let item = local_item(cloud.path(), "a.kml", 1);
    let results = orch.execute_batch(vec![Action::RemoveCloud(item)]).await;

    assert!(matches!(results[0].1, Ok(ActionOutcome::Applied)));
    assert!(!cloud.path().join("a.kml").exists());
    assert_eq!(std::fs::read(cloud.path().join(".Trash/a.kml")).unwrap(), b"to be trashed");
}

#[tokio::test]
async fn start_download_records_request_and_does_not_touch_local_directory() {
    let local = tempdir().unwrap();
    let cloud = tempdir().unwrap();
    let agent = FakeDownloadAgent::default();
    let orch = Orchestrator::new(
        local.path(),
        cloud.path(),
        "test-device",
        agent.clone(),
        FakeVersionProbe::default(),
        Arc::new(FakeBookmarkLoader::default()),
    );

    let item = cloud_item(cloud.path(), "d.kml", 1);
    orch.execute_batch(vec![Action::StartDownload(item)]).await;

    assert_eq!(agent.requested(), vec!["d.kml".to_string()]);
    assert!(!local.path().join("d.kml").exists());
}

#[tokio::test]
async fn version_conflict_detected_before_cloud_write_preserves_loser() {
    let local = tempdir().unwrap();
    let cloud = tempdir().unwrap();
    std::fs::write(local.path().join("a.kml"), b"local pending write").unwrap();
    std::fs::write(cloud.path().join("a.kml"), b"cloud current").unwrap();

    let probe = FakeVersionProbe::default();
    probe.set_conflict(
        cloud.path().join("a.kml"),
        vec![
            UnresolvedVersion { file_url: cloud.path().join("a.kml"), last_modification_date: 10 },
            UnresolvedVersion {
                file_url: cloud.path().join("other_version.kml"),
                last_modification_date: 20,
            },
        ],
    );
    std::fs::write(cloud.path().join("other_version.kml"), b"other device's edit").unwrap();

    let orch = Orchestrator::new(
        local.path(),
        cloud.path(),
        "test-device",
        FakeDownloadAgent::default(),
        probe,
        Arc::new(FakeBookmarkLoader::default()),
    );

    let item = local_item(local.path(), "a.kml", 5);
    let results = orch.execute_batch(vec![Action::UpdateCloud(item)]).await;

    assert!(matches!(results[0].1, Ok(ActionOutcome::VersionConflictResolved { .. })));
    assert_eq!(std::fs::read(cloud.path().join("a.kml")).unwrap(), b"other device's edit");
}

#[tokio::test]
async fn batch_reloads_bookmarks_exactly_once_after_content_changing_actions() {
    let local = tempdir().unwrap();
    let cloud = tempdir().unwrap();
    std::fs::write(cloud.path().join("a.kml"), b"one").unwrap();
    std::fs::write(cloud.path().join("b.kml"), b"two").unwrap();

    let loader = FakeBookmarkLoader::default();
    let orch = Orchestrator::new(
        local.path(),
        cloud.path(),
        "test-device",
        FakeDownloadAgent::default(),
        FakeVersionProbe::default(),
        Arc::new(loader.clone()),
    );

    let actions = vec![
        Action::CreateLocal(cloud_item(cloud.path(), "a.kml", 1)),
        Action::CreateLocal(cloud_item(cloud.path(), "b.kml", 2)),
    ];
    orch.execute_batch(actions).await;

    assert_eq!(loader.load_count(), 1);
}

#[tokio::test]
async fn batch_does_not_reload_bookmarks_when_nothing_touched_content() {
    let local = tempdir().unwrap();
    let cloud = tempdir().unwrap();
    let loader = FakeBookmarkLoader::default();
    let orch = Orchestrator::new(
        local.path(),
        cloud.path(),
        "test-device",
        FakeDownloadAgent::default(),
        FakeVersionProbe::default(),
        Arc::new(loader.clone()),
    );

    orch.execute_batch(vec![Action::InitialSyncCompleted]).await;
    assert_eq!(loader.load_count(), 0);
}

#[tokio::test]
async fn resolve_initial_collision_action_reports_preserved_url() {
    let local = tempdir().unwrap();
    let cloud = tempdir().unwrap();
    std::fs::write(local.path().join("x.kml"), b"device history").unwrap();

    let orch = orchestrator(local.path(), cloud.path());
    let item = local_item(local.path(), "x.kml", 50);
    let results = orch.execute_batch(vec![Action::ResolveInitialCollision(item)]).await;

    match &results[0].1 {
        Ok(ActionOutcome::InitialCollisionResolved { preserved_url }) => {
            assert!(preserved_url.to_string_lossy().contains("test-device"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}
