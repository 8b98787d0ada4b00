// SPDX-License-Identifier: MIT

//! Fakes for this crate's pluggable collaborators, shared with
//! downstream crates' tests via the `test-support` feature.

use crate::download::DownloadAgent;
use crate::version_probe::{UnresolvedVersion, VersionProbe};
use async_trait::async_trait;
use fsync_core::CloudItem;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Records every download request, for assertions.
#[derive(Clone, Default)]
pub struct FakeDownloadAgent {
    requested: Arc<Mutex<Vec<String>>>,
}

impl FakeDownloadAgent {
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().clone()
    }
}

#[async_trait]
impl DownloadAgent for FakeDownloadAgent {
    async fn start_download(&self, item: &CloudItem) {
        self.requested.lock().push(item.file_name.as_str().to_string());
    }
}

/// Reports a fixed, configurable set of unresolved versions per path.
#[derive(Clone, Default)]
pub struct FakeVersionProbe {
    versions: Arc<Mutex<std::collections::HashMap<PathBuf, Vec<UnresolvedVersion>>>>,
}

impl FakeVersionProbe {
    pub fn set_conflict(&self, path: impl Into<PathBuf>, versions: Vec<UnresolvedVersion>) {
        self.versions.lock().insert(path.into(), versions);
    }
}

#[async_trait]
impl VersionProbe for FakeVersionProbe {
    async fn unresolved_versions(&self, path: &Path) -> Vec<UnresolvedVersion> {
        self.versions.lock().get(path).cloned().unwrap_or_default()
    }
}
