// SPDX-License-Identifier: MIT

//! Actions: the outputs of the reconciliation state machine, consumed by
//! the I/O orchestrator in a separate crate.

use crate::error::EngineError;
use crate::metadata::{CloudItem, LocalItem};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Materialize a cloud item locally for the first time.
    CreateLocal(CloudItem),
    /// Overwrite an existing local file's contents from a newer cloud item.
    UpdateLocal(CloudItem),
    /// Remove a local file because the cloud side deleted (trashed) it.
    RemoveLocal(CloudItem),
    /// Ask the platform to materialize a not-yet-downloaded cloud item.
    StartDownload(CloudItem),
    /// Upload a local item to the cloud for the first time.
    CreateCloud(LocalItem),
    /// Overwrite an existing cloud file's contents from a newer local item.
    UpdateCloud(LocalItem),
    /// Move a cloud file into the cloud replica's trash directory.
    RemoveCloud(LocalItem),
    /// The cloud side reports multiple unresolved versions for this item.
    ResolveVersionConflict(CloudItem),
    /// First-run collision: both sides had independent histories.
    ResolveInitialCollision(LocalItem),
    /// Initial both-sides-gathered reconciliation completed; persist the
    /// `initial_sync_done` flag.
    InitialSyncCompleted,
    /// Surface an error to the central error handler.
    ReportError(EngineError),
}
