// SPDX-License-Identifier: MIT

//! Events fed into [`crate::state::EngineState::resolve`].
//!
//! Monitors (outside this crate) observe the local directory and the cloud
//! replica and translate what they see into these events. The engine
//! consumes only full inventories — monitors own deduplication and
//! batching (spec.md §4.1).

use crate::error::EngineError;
use crate::inventory::{CloudInventory, LocalInventory};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The local monitor's initial full scan completed.
    FinishedGatheringLocal(LocalInventory),
    /// The cloud monitor's initial full scan completed.
    FinishedGatheringCloud(CloudInventory),
    /// The local monitor observed a change; carries the complete current
    /// inventory, not a delta.
    UpdatedLocal(LocalInventory),
    /// The cloud monitor observed a change; carries the complete current
    /// inventory, not a delta.
    UpdatedCloud(CloudInventory),
    /// A monitor (or the orchestrator) reported an error.
    Error(EngineError),
    /// Clear all inventories and gathered flags.
    Reset,
}
