// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fsync-adapters: the "out of scope, interfaces only" collaborators
//! named by spec.md §1 — directory monitors, the bookmark loader, and
//! the settings source — plus one real, file-system-backed
//! implementation of each monitor contract.
//!
//! Nothing in this crate decides sync policy; it only observes the
//! world and forwards events, or executes the platform-facing half of
//! an action. Policy lives in `fsync-core` and `fsync-io`.

pub mod bookmarks;
pub mod monitor;
pub mod settings;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use bookmarks::{BookmarkLoader, BookmarkLoaderError, LoggingBookmarkLoader};
pub use monitor::{
    CloudMonitor, DelegateEvent, EventSink, FsCloudMonitor, FsLocalMonitor, LocalMonitor,
    MonitorError,
};
pub use settings::{SettingsError, SettingsSource};
