// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fsync-daemon: wires the pure engine (`fsync-core`), the monitors and
//! loaders (`fsync-adapters`), the I/O orchestrator (`fsync-io`), and
//! persisted settings (`fsync-storage`) into a running sync session
//! (spec.md §5).

pub mod config;
pub mod env;
pub mod error;
pub mod lifecycle;

pub use config::Config;
pub use error::LifecycleError;
pub use lifecycle::{Lifecycle, LifecycleState};

use fsync_adapters::{DelegateEvent, FsCloudMonitor, FsLocalMonitor, LoggingBookmarkLoader};
use fsync_io::{LoggingDownloadAgent, NoVersionProbe};
use tokio::sync::mpsc;

/// Concrete lifecycle wiring for a standalone run of this engine (see
/// `src/bin/fsyncd.rs`), mirroring the real monitor/agent/probe/loader
/// types this crate ships.
pub type DaemonLifecycle = Lifecycle<
    FsLocalMonitor<mpsc::UnboundedSender<DelegateEvent>>,
    FsCloudMonitor<mpsc::UnboundedSender<DelegateEvent>>,
    LoggingDownloadAgent,
    NoVersionProbe,
    LoggingBookmarkLoader,
>;
