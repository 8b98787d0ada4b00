// SPDX-License-Identifier: MIT

//! Version conflicts (spec.md §4.7) are "detected by the orchestrator
//! at write time": before writing a cloud file the orchestrator asks
//! whether the platform currently reports multiple unresolved versions
//! for it. There is no such platform API outside the originating cloud
//! container, so it is modeled as a pluggable probe the orchestrator
//! consults immediately before `CreateCloud`/`UpdateCloud`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// One version CloudKit-style storage reports as unresolved for a url.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedVersion {
    pub file_url: PathBuf,
    pub last_modification_date: u64,
}

#[async_trait]
pub trait VersionProbe: Send + Sync + 'static {
    /// Unresolved versions currently reported for `path`, if any. An
    /// empty vec means there is no conflict.
    async fn unresolved_versions(&self, path: &Path) -> Vec<UnresolvedVersion>;

    /// Tell the platform every unresolved version for `path` other than
    /// `kept` has been folded into the preserved copy and may be
    /// discarded (spec.md §4.7: "mark all other versions resolved").
    /// Probes backed by a platform without that notion can leave this as
    /// a no-op.
    async fn mark_resolved(&self, path: &Path, kept: &UnresolvedVersion) {
        let _ = (path, kept);
    }
}

/// Default probe: the file system this crate writes to never reports
/// multiple unresolved versions on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVersionProbe;

#[async_trait]
impl VersionProbe for NoVersionProbe {
    async fn unresolved_versions(&self, _path: &Path) -> Vec<UnresolvedVersion> {
        Vec::new()
    }
}
