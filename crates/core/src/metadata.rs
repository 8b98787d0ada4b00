// SPDX-License-Identifier: MIT

//! Value types describing one file on either side of the sync.

use crate::inventory::FileName;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the reserved cloud-replica subdirectory that holds tombstones.
///
/// A cloud item whose `file_url` contains this path component is
/// considered trashed (spec.md §3: "`is_in_trash`, derived from path
/// containing the reserved trash directory name").
pub const TRASH_DIR_NAME: &str = ".Trash";

/// Common metadata shared by local and cloud items.
///
/// Letting orchestrator code be generic over `impl MetadataItem` avoids
/// duplicating the "copy bytes, then set mtime" logic between the
/// create/update-local and create/update-cloud code paths.
pub trait MetadataItem {
    fn file_name(&self) -> &FileName;
    fn file_url(&self) -> &std::path::Path;
    fn file_size(&self) -> Option<u64>;
    fn content_type(&self) -> Option<&str>;
    fn creation_date(&self) -> u64;
    fn last_modification_date(&self) -> u64;
}

/// Immutable snapshot of a local file at observation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalItem {
    pub file_name: FileName,
    pub file_url: PathBuf,
    pub file_size: Option<u64>,
    pub content_type: Option<String>,
    pub creation_date: u64,
    pub last_modification_date: u64,
}

impl MetadataItem for LocalItem {
    fn file_name(&self) -> &FileName {
        &self.file_name
    }
    fn file_url(&self) -> &std::path::Path {
        &self.file_url
    }
    fn file_size(&self) -> Option<u64> {
        self.file_size
    }
    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
    fn creation_date(&self) -> u64 {
        self.creation_date
    }
    fn last_modification_date(&self) -> u64 {
        self.last_modification_date
    }
}

/// Snapshot of a cloud-replica file, plus download/trash state that only
/// makes sense on the cloud side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudItem {
    pub file_name: FileName,
    pub file_url: PathBuf,
    pub file_size: Option<u64>,
    pub content_type: Option<String>,
    pub creation_date: u64,
    pub last_modification_date: u64,
    pub is_downloaded: bool,
    pub download_fraction: Option<f32>,
    pub is_in_trash: bool,
}

impl CloudItem {
    /// Derive `is_in_trash` from a url, per spec.md §3.
    pub fn path_is_in_trash(url: &std::path::Path) -> bool {
        url.components().any(|c| c.as_os_str() == TRASH_DIR_NAME)
    }
}

impl MetadataItem for CloudItem {
    fn file_name(&self) -> &FileName {
        &self.file_name
    }
    fn file_url(&self) -> &std::path::Path {
        &self.file_url
    }
    fn file_size(&self) -> Option<u64> {
        self.file_size
    }
    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
    fn creation_date(&self) -> u64 {
        self.creation_date
    }
    fn last_modification_date(&self) -> u64 {
        self.last_modification_date
    }
}
