// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fsync-storage: persistence for the one piece of state spec.md §6
//! requires to survive a process restart — the `initial_sync_done`
//! flag.
//!
//! Spec.md §6 describes this as a single boolean in platform user
//! defaults; there is no such store outside the originating mobile OS,
//! so this crate persists it as a small JSON file instead, written with
//! the same write-to-temp-then-rename discipline the rest of this
//! workspace uses for crash-safe writes.

mod settings;

pub use settings::{SyncSettings, SyncSettingsError};
