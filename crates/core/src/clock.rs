// SPDX-License-Identifier: MIT

//! Clock abstraction for testable time handling.
//!
//! Grounded on the same split the rest of the engine uses for every other
//! external dependency: a real implementation plus a fake one that tests
//! can drive deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of "now", expressed as milliseconds since the Unix epoch.
///
/// Modification-date comparisons throughout the reconciliation state
/// machine and the orchestrator's conflict resolver go through this trait
/// so that tie-breaks and "pick the latest version" logic are
/// deterministic in tests.
pub trait Clock: Clone + Send + Sync {
    fn epoch_ms(&self) -> u64;
}

/// Real wall-clock time.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Fake clock for testing with controllable time.
#[derive(Clone)]
pub struct FakeClock {
    epoch_ms: Arc<AtomicU64>,
}

impl FakeClock {
    pub fn new(start_epoch_ms: u64) -> Self {
        Self { epoch_ms: Arc::new(AtomicU64::new(start_epoch_ms)) }
    }

    pub fn advance_ms(&self, delta: u64) {
        self.epoch_ms.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn set_epoch_ms(&self, value: u64) {
        self.epoch_ms.store(value, Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(1_000_000)
    }
}

impl Clock for FakeClock {
    fn epoch_ms(&self) -> u64 {
        self.epoch_ms.load(Ordering::SeqCst)
    }
}
