// SPDX-License-Identifier: MIT

//! The bookmark loader interface (spec.md §6), consumed but not
//! implemented by this repository: it is the mobile app's in-memory
//! model, out of scope per spec.md §1.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookmarkLoaderError {
    #[error("bookmark load failed: {0}")]
    LoadFailed(String),
}

/// Re-reads the local directory's files into the app's in-memory model.
///
/// The orchestrator calls `load` after a batch that set `reload_bookmarks`
/// and waits on `on_load_finished` (via a single-permit semaphore, spec.md
/// §4.4) before declaring the batch complete.
#[async_trait]
pub trait BookmarkLoader: Send + Sync + 'static {
    async fn load(&self) -> Result<(), BookmarkLoaderError>;
}

/// Default loader for a standalone run of this engine: there is no
/// in-memory bookmark model to reload outside the originating app, so
/// this just logs that a reload was requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingBookmarkLoader;

#[async_trait]
impl BookmarkLoader for LoggingBookmarkLoader {
    async fn load(&self) -> Result<(), BookmarkLoaderError> {
        tracing::info!("bookmark reload requested");
        Ok(())
    }
}

#[cfg(test)]
#[path = "bookmarks_tests.rs"]
mod tests;
