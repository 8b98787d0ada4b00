// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Workspace-level integration tests (spec.md §8): each scenario runs the
//! full engine → orchestrator pipeline against real files in a temporary
//! directory pair, not just the in-memory `EngineState` unit tests.

use fsync_core::{CloudItem, Event, FileName, Inventory, LocalItem};
use fsync_io::test_support::{FakeDownloadAgent, FakeVersionProbe};
use fsync_io::{ActionOutcome, Orchestrator};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    local_dir: std::path::PathBuf,
    cloud_dir: std::path::PathBuf,
    orchestrator: Orchestrator<FakeDownloadAgent, FakeVersionProbe, fsync_adapters::test_support::FakeBookmarkLoader>,
    engine: fsync_core::EngineState,
}

impl Harness {
    fn new(device_name: &str, initial_sync_done: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let local_dir = dir.path().join("local");
        let cloud_dir = dir.path().join("cloud");
        std::fs::create_dir_all(&local_dir).unwrap();
        std::fs::create_dir_all(&cloud_dir).unwrap();

        let orchestrator = Orchestrator::new(
            local_dir.clone(),
            cloud_dir.clone(),
            device_name,
            FakeDownloadAgent::default(),
            FakeVersionProbe::default(),
            Arc::new(fsync_adapters::test_support::FakeBookmarkLoader::default()),
        );

        Self {
            _dir: dir,
            local_dir,
            cloud_dir,
            orchestrator,
            engine: fsync_core::EngineState::new(device_name, initial_sync_done),
        }
    }

    fn write_local(&self, name: &str, content: &[u8], mod_ms: u64) -> LocalItem {
        let path = self.local_dir.join(name);
        std::fs::write(&path, content).unwrap();
        set_mtime(&path, mod_ms);
        LocalItem {
            file_name: FileName::new(name),
            file_url: path,
            file_size: Some(content.len() as u64),
            content_type: Some("application/vnd.google-earth.kml+xml".into()),
            creation_date: mod_ms,
            last_modification_date: mod_ms,
        }
    }

    fn write_cloud(&self, name: &str, content: &[u8], mod_ms: u64, downloaded: bool, trashed: bool) -> CloudItem {
        let path = if trashed {
            let trash_dir = self.cloud_dir.join(fsync_core::metadata::TRASH_DIR_NAME);
            std::fs::create_dir_all(&trash_dir).unwrap();
            trash_dir.join(name)
        } else {
            self.cloud_dir.join(name)
        };
        std::fs::write(&path, content).unwrap();
        set_mtime(&path, mod_ms);
        CloudItem {
            file_name: FileName::new(name),
            file_url: path,
            file_size: Some(content.len() as u64),
            content_type: Some("application/vnd.google-earth.kml+xml".into()),
            creation_date: mod_ms,
            last_modification_date: mod_ms,
            is_downloaded: downloaded,
            download_fraction: if downloaded { None } else { Some(0.0) },
            is_in_trash: trashed,
        }
    }

    async fn resolve_and_execute(&mut self, event: Event) -> Vec<(fsync_core::Action, Result<ActionOutcome, fsync_io::IoError>)> {
        let actions = self.engine.resolve(event);
        self.orchestrator.execute_batch(actions).await
    }
}

fn set_mtime(path: &Path, epoch_ms: u64) {
    let ft = filetime::FileTime::from_unix_time((epoch_ms / 1000) as i64, 0);
    filetime::set_file_mtime(path, ft).unwrap();
}

#[tokio::test]
async fn s1_empty_empty_produces_no_filesystem_effects() {
    let mut h = Harness::new("device", true);
    let results = h.resolve_and_execute(Event::FinishedGatheringLocal(Inventory::new())).await;
    assert!(results.is_empty());
    let results = h.resolve_and_execute(Event::FinishedGatheringCloud(Inventory::new())).await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn s2_cloud_only_materializes_a_local_copy() {
    let mut h = Harness::new("device", true);
    let mut cloud_inv = Inventory::new();
    let a = h.write_cloud("a.kml", b"cloud contents", 100, true, false);
    cloud_inv.insert(FileName::new("a.kml"), a);

    h.resolve_and_execute(Event::FinishedGatheringLocal(Inventory::new())).await;
    let results = h.resolve_and_execute(Event::FinishedGatheringCloud(cloud_inv)).await;

    assert!(matches!(results.as_slice(), [(fsync_core::Action::CreateLocal(_), Ok(ActionOutcome::Applied))]));
    assert_eq!(std::fs::read(h.local_dir.join("a.kml")).unwrap(), b"cloud contents");
}

#[tokio::test]
async fn s3_conflicting_edit_prefers_the_newer_cloud_write() {
    let mut h = Harness::new("device", true);
    h.write_local("b.kml", b"old", 10);
    h.write_cloud("b.kml", b"old", 10, true, false);

    let mut local_inv = Inventory::new();
    local_inv.insert(FileName::new("b.kml"), h.write_local("b.kml", b"old", 10));
    let mut cloud_inv = Inventory::new();
    cloud_inv.insert(FileName::new("b.kml"), h.write_cloud("b.kml", b"old", 10, true, false));
    h.resolve_and_execute(Event::FinishedGatheringLocal(local_inv)).await;
    h.resolve_and_execute(Event::FinishedGatheringCloud(cloud_inv)).await;

    let mut updated_cloud = Inventory::new();
    updated_cloud.insert(FileName::new("b.kml"), h.write_cloud("b.kml", b"new from cloud", 20, true, false));
    let results = h.resolve_and_execute(Event::UpdatedCloud(updated_cloud)).await;
    assert!(matches!(results.as_slice(), [(fsync_core::Action::UpdateLocal(_), Ok(ActionOutcome::Applied))]));
    assert_eq!(std::fs::read(h.local_dir.join("b.kml")).unwrap(), b"new from cloud");

    let mut stale_local = Inventory::new();
    stale_local.insert(FileName::new("b.kml"), h.write_local("b.kml", b"stale local edit", 15));
    let results = h.resolve_and_execute(Event::UpdatedLocal(stale_local)).await;
    assert!(results.is_empty(), "cloud's mod=20 is newer than local's mod=15; no action expected");
}

#[tokio::test]
async fn s4_trashed_cloud_item_removes_the_local_copy() {
    let mut h = Harness::new("device", true);
    let mut local_inv = Inventory::new();
    local_inv.insert(FileName::new("c.kml"), h.write_local("c.kml", b"content", 10));
    let mut cloud_inv = Inventory::new();
    cloud_inv.insert(FileName::new("c.kml"), h.write_cloud("c.kml", b"content", 10, true, false));
    h.resolve_and_execute(Event::FinishedGatheringLocal(local_inv)).await;
    h.resolve_and_execute(Event::FinishedGatheringCloud(cloud_inv)).await;

    assert!(h.local_dir.join("c.kml").exists());

    let mut trashed = Inventory::new();
    trashed.insert(FileName::new("c.kml"), h.write_cloud("c.kml", b"content", 10, true, true));
    let results = h.resolve_and_execute(Event::UpdatedCloud(trashed)).await;
    assert!(matches!(results.as_slice(), [(fsync_core::Action::RemoveLocal(_), Ok(ActionOutcome::Applied))]));
    assert!(!h.local_dir.join("c.kml").exists());
}

#[tokio::test]
async fn s5_not_downloaded_item_is_requested_then_materialized() {
    let mut h = Harness::new("device", true);
    h.resolve_and_execute(Event::FinishedGatheringLocal(Inventory::new())).await;

    let mut pending = Inventory::new();
    pending.insert(FileName::new("d.kml"), h.write_cloud("d.kml", b"not yet downloaded", 5, false, false));
    let results = h.resolve_and_execute(Event::FinishedGatheringCloud(pending)).await;
    assert!(matches!(results.as_slice(), [(fsync_core::Action::StartDownload(_), Ok(ActionOutcome::DownloadRequested))]));
    assert!(!h.local_dir.join("d.kml").exists());

    let mut downloaded = Inventory::new();
    downloaded.insert(FileName::new("d.kml"), h.write_cloud("d.kml", b"now downloaded", 5, true, false));
    let results = h.resolve_and_execute(Event::UpdatedCloud(downloaded)).await;
    assert!(matches!(results.as_slice(), [(fsync_core::Action::CreateLocal(_), Ok(ActionOutcome::Applied))]));
    assert_eq!(std::fs::read(h.local_dir.join("d.kml")).unwrap(), b"now downloaded");
}

#[tokio::test]
async fn s6_first_run_collision_preserves_both_histories() {
    let mut h = Harness::new("my-phone", false);

    let mut local_inv = Inventory::new();
    local_inv.insert(FileName::new("x.kml"), h.write_local("x.kml", b"local history", 50));
    h.resolve_and_execute(Event::FinishedGatheringLocal(local_inv)).await;

    let mut cloud_inv = Inventory::new();
    cloud_inv.insert(FileName::new("x.kml"), h.write_cloud("x.kml", b"cloud history", 70, true, false));
    let results = h.resolve_and_execute(Event::FinishedGatheringCloud(cloud_inv)).await;

    assert!(h.engine.initial_sync_done());
    let outcomes: Vec<_> = results.iter().map(|(_, r)| r).collect();
    assert!(outcomes.iter().any(|r| matches!(r, Ok(ActionOutcome::InitialCollisionResolved { .. }))));
    assert!(outcomes.iter().any(|r| matches!(r, Ok(ActionOutcome::Applied))));
    assert!(outcomes.iter().any(|r| matches!(r, Ok(ActionOutcome::InitialSyncCompleted))));

    // The cloud version now occupies the original name...
    assert_eq!(std::fs::read(h.local_dir.join("x.kml")).unwrap(), b"cloud history");
    // ...and the local device's prior history survives under a fresh,
    // device-tagged name (spec.md §4.7: `_<device>_<n>`, device tag then
    // bump-suffix).
    assert_eq!(std::fs::read(h.local_dir.join("x_my-phone_1.kml")).unwrap(), b"local history");
}
