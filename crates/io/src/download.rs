// SPDX-License-Identifier: MIT

//! `StartDownload` is "ask the platform to materialize the cloud item's
//! bytes locally; non-blocking; further progress is observed via the
//! next cloud update" (spec.md §4.4). There is no real download API
//! outside the originating platform, so it is modeled as a pluggable
//! collaborator the orchestrator fires and forgets.

use async_trait::async_trait;
use fsync_core::CloudItem;

/// Requests that the cloud side materialize an item's bytes locally.
#[async_trait]
pub trait DownloadAgent: Send + Sync + 'static {
    async fn start_download(&self, item: &CloudItem);
}

/// Default agent: logs the request. A real platform integration would
/// kick off a native download API call here.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDownloadAgent;

#[async_trait]
impl DownloadAgent for LoggingDownloadAgent {
    async fn start_download(&self, item: &CloudItem) {
        tracing::info!(file = %item.file_name, "requested download of cloud item");
    }
}
