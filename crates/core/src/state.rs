// SPDX-License-Identifier: MIT

//! The pure reconciliation state machine (spec.md §4.2).
//!
//! `EngineState::resolve` is invoked once per [`Event`], never re-entered,
//! and performs no I/O. It is the entire "brain" of the sync engine: given
//! what the monitors last reported, it decides what the orchestrator must
//! do to converge the two sides.

use crate::action::Action;
use crate::event::Event;
use crate::inventory::{CloudInventory, LocalInventory};
use crate::metadata::{CloudItem, LocalItem};

/// Coarse-grained projection of `EngineState` for logging/observability.
///
/// Never branched on inside `resolve` — behavior is governed solely by the
/// `*_gathered` flags and the incoming event, per spec.md §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    GatheringLocal,
    GatheringCloud,
    Gathering,
    Running,
}

/// The state machine's memory, owned by the lifecycle controller for the
/// lifetime of a sync session.
#[derive(Debug, Clone)]
pub struct EngineState {
    last_local: LocalInventory,
    last_cloud: CloudInventory,
    local_gathered: bool,
    cloud_gathered: bool,
    /// Persisted across runs (spec.md §6) — loaded by the caller from
    /// `fsync-storage` and written back out whenever an
    /// `Action::InitialSyncCompleted` is observed.
    initial_sync_done: bool,
    /// Used by initial-collision name generation (spec.md §4.6/§4.7).
    device_name: String,
}

impl EngineState {
    pub fn new(device_name: impl Into<String>, initial_sync_done: bool) -> Self {
        Self {
            last_local: LocalInventory::new(),
            last_cloud: CloudInventory::new(),
            local_gathered: false,
            cloud_gathered: false,
            initial_sync_done,
            device_name: device_name.into(),
        }
    }

    pub fn initial_sync_done(&self) -> bool {
        self.initial_sync_done
    }

    pub fn last_local(&self) -> &LocalInventory {
        &self.last_local
    }

    pub fn last_cloud(&self) -> &CloudInventory {
        &self.last_cloud
    }

    pub fn phase(&self) -> EnginePhase {
        match (self.local_gathered, self.cloud_gathered) {
            (false, false) => EnginePhase::Idle,
            (true, false) => EnginePhase::GatheringCloud,
            (false, true) => EnginePhase::GatheringLocal,
            (true, true) if self.last_local.is_empty() && self.last_cloud.is_empty() => {
                EnginePhase::Gathering
            }
            (true, true) => EnginePhase::Running,
        }
    }

    /// Fold one event into state, returning the actions the orchestrator
    /// must perform. Pure and deterministic for a fixed starting state.
    pub fn resolve(&mut self, event: Event) -> Vec<Action> {
        match event {
            Event::FinishedGatheringLocal(inv) => {
                self.last_local = inv;
                self.local_gathered = true;
                self.maybe_initial_reconcile()
            }
            Event::FinishedGatheringCloud(inv) => {
                self.last_cloud = inv;
                self.cloud_gathered = true;
                self.maybe_initial_reconcile()
            }
            Event::UpdatedLocal(inv) => {
                let actions = incremental_local_to_cloud(&inv, &self.last_local, &self.last_cloud);
                self.last_local = inv;
                actions
            }
            Event::UpdatedCloud(inv) => {
                let actions = incremental_cloud_to_local(&inv, &self.last_local);
                self.last_cloud = inv;
                actions
            }
            Event::Error(e) => vec![Action::ReportError(e)],
            Event::Reset => {
                self.last_local = LocalInventory::new();
                self.last_cloud = CloudInventory::new();
                self.local_gathered = false;
                self.cloud_gathered = false;
                vec![]
            }
        }
    }

    fn maybe_initial_reconcile(&mut self) -> Vec<Action> {
        if !(self.local_gathered && self.cloud_gathered) {
            return vec![];
        }

        match (self.last_local.is_empty(), self.last_cloud.is_empty()) {
            (true, true) => vec![],
            (true, false) => self
                .last_cloud
                .iter()
                .filter(|(_, item)| !item.is_in_trash)
                .map(|(_, item)| create_or_download(item))
                .collect(),
            (false, true) => self
                .last_local
                .iter()
                .map(|(_, item)| Action::CreateCloud(item.clone()))
                .collect(),
            (false, false) => {
                if self.initial_sync_done {
                    let mut actions =
                        incremental_cloud_to_local(&self.last_cloud, &self.last_local);
                    actions.extend(incremental_local_to_cloud(
                        &self.last_local,
                        &self.last_local,
                        &self.last_cloud,
                    ));
                    actions
                } else {
                    self.initial_sync_done = true;
                    initial_collision_reconcile(&self.last_local, &self.last_cloud, &self.device_name)
                }
            }
        }
    }
}

fn create_or_download(item: &CloudItem) -> Action {
    if item.is_downloaded {
        Action::CreateLocal(item.clone())
    } else {
        Action::StartDownload(item.clone())
    }
}

/// Incremental cloud→local reconciliation (spec.md §4.2).
///
/// `cloud` is the newly observed cloud inventory; `local` is the last
/// known local inventory. Creates/updates are emitted before removes, per
/// the ordering guarantee in spec.md §5.
fn incremental_cloud_to_local(cloud: &CloudInventory, local: &LocalInventory) -> Vec<Action> {
    let mut creates_and_updates = Vec::new();
    let mut removes = Vec::new();

    for (_, item) in cloud.items_missing_from(local) {
        if item.is_in_trash {
            continue;
        }
        creates_and_updates.push(create_or_download(item));
    }

    for (_, cloud_item, local_item) in cloud.pairs_shared_with(local) {
        if cloud_item.is_in_trash {
            removes.push(Action::RemoveLocal(cloud_item.clone()));
            continue;
        }

        if cloud_item.last_modification_date > local_item.last_modification_date {
            if cloud_item.is_downloaded {
                creates_and_updates.push(Action::UpdateLocal(cloud_item.clone()));
            } else {
                creates_and_updates.push(Action::StartDownload(cloud_item.clone()));
            }
        }
    }

    creates_and_updates.extend(removes);
    creates_and_updates
}

/// Incremental local→cloud reconciliation (spec.md §4.2).
///
/// `new_local` is the newly observed local inventory; `old_local` is the
/// previous one (used to detect local deletions); `cloud` is the last
/// known cloud inventory.
fn incremental_local_to_cloud(
    new_local: &LocalInventory,
    old_local: &LocalInventory,
    cloud: &CloudInventory,
) -> Vec<Action> {
    let mut creates_and_updates = Vec::new();
    let mut removes = Vec::new();

    for (_, item) in new_local.items_missing_from(cloud) {
        creates_and_updates.push(Action::CreateCloud(item.clone()));
    }

    for (_, local_item, cloud_item) in new_local.pairs_shared_with(cloud) {
        if cloud_item.is_in_trash {
            continue;
        }

        if local_item.last_modification_date > cloud_item.last_modification_date {
            creates_and_updates.push(Action::UpdateCloud(local_item.clone()));
        }
    }

    for (_, item) in old_local.items_missing_from(new_local) {
        removes.push(Action::RemoveCloud(item.clone()));
    }

    creates_and_updates.extend(removes);
    creates_and_updates
}

/// First-run collision protection (spec.md §4.7): preserve every local
/// item under a device-tagged name before letting the normal cloud→local
/// incremental path rebuild the local mirror from the cloud's history.
fn initial_collision_reconcile(
    local: &LocalInventory,
    cloud: &CloudInventory,
    device_name: &str,
) -> Vec<Action> {
    let mut actions: Vec<Action> = local
        .iter()
        .map(|(_, item)| Action::ResolveInitialCollision(item.clone()))
        .collect();

    actions.extend(incremental_cloud_to_local(cloud, local));
    actions.push(Action::InitialSyncCompleted);
    actions
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
