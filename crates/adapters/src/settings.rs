// SPDX-License-Identifier: MIT

//! The settings interface (spec.md §6), consumed but not implemented by
//! this repository: user-facing settings toggles are out of scope
//! (spec.md §1). The `sync_enabled_changed` signal becomes a
//! `tokio::sync::watch` channel, the idiomatic stand-in for a single
//! observed value with change notification.

use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings source unavailable: {0}")]
    Unavailable(String),
}

/// Source of the user's sync-enabled toggle.
pub trait SettingsSource: Send + Sync + 'static {
    fn sync_enabled(&self) -> bool;

    /// A receiver that observes every change to `sync_enabled`. Cloning a
    /// `SettingsSource` implementation should be cheap; each caller
    /// subscribes independently.
    fn watch_sync_enabled(&self) -> watch::Receiver<bool>;
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
