// SPDX-License-Identifier: MIT

//! Test builders shared by this crate's tests and by downstream crates'
//! tests (enabled via the `test-support` feature), grounded on the
//! `*_tests`/`test_support` split used throughout the teacher codebase.

use crate::inventory::FileName;
use crate::metadata::{CloudItem, LocalItem};
use std::path::PathBuf;

#[derive(Clone)]
pub struct LocalItemBuilder {
    item: LocalItem,
}

impl LocalItemBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            item: LocalItem {
                file_url: PathBuf::from(format!("/local/{name}")),
                file_name: FileName::new(name),
                file_size: Some(0),
                content_type: Some("application/vnd.google-earth.kml+xml".to_string()),
                creation_date: 0,
                last_modification_date: 0,
            },
        }
    }

    pub fn modified_at(mut self, ms: u64) -> Self {
        self.item.last_modification_date = ms;
        self
    }

    pub fn url(mut self, url: impl Into<PathBuf>) -> Self {
        self.item.file_url = url.into();
        self
    }

    pub fn build(self) -> LocalItem {
        self.item
    }
}

#[derive(Clone)]
pub struct CloudItemBuilder {
    item: CloudItem,
}

impl CloudItemBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            item: CloudItem {
                file_url: PathBuf::from(format!("/cloud/{name}")),
                file_name: FileName::new(name),
                file_size: Some(0),
                content_type: Some("application/vnd.google-earth.kml+xml".to_string()),
                creation_date: 0,
                last_modification_date: 0,
                is_downloaded: true,
                download_fraction: None,
                is_in_trash: false,
            },
        }
    }

    pub fn modified_at(mut self, ms: u64) -> Self {
        self.item.last_modification_date = ms;
        self
    }

    pub fn not_downloaded(mut self) -> Self {
        self.item.is_downloaded = false;
        self.item.download_fraction = Some(0.0);
        self
    }

    pub fn trashed(mut self) -> Self {
        self.item.is_in_trash = true;
        let name = self.item.file_name.as_str().to_string();
        self.item.file_url = PathBuf::from(format!(
            "/cloud/{}/{name}",
            crate::metadata::TRASH_DIR_NAME
        ));
        self
    }

    pub fn build(self) -> CloudItem {
        self.item
    }
}
