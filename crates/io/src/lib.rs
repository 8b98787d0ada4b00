// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fsync-io: the I/O orchestrator (spec.md §4.4) that executes
//! [`Action`](fsync_core::Action)s produced by the reconciliation state
//! machine — coordinated reads/writes, timestamp preservation, trash
//! handling, and the version/initial-collision conflict resolver.

pub mod conflict;
pub mod coordinator;
pub mod download;
pub mod error;
pub mod orchestrator;
pub mod version_probe;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use download::{DownloadAgent, LoggingDownloadAgent};
pub use error::IoError;
pub use orchestrator::{ActionOutcome, Orchestrator};
pub use version_probe::{NoVersionProbe, UnresolvedVersion, VersionProbe};
