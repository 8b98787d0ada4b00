// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fsync-core: the pure metadata model and reconciliation state machine
//! for the bidirectional local/cloud directory sync engine.
//!
//! Nothing in this crate performs I/O. `EngineState::resolve` is the one
//! entry point: it folds an [`Event`] into state and returns the list of
//! [`Action`]s the orchestrator (a separate crate) must perform.

pub mod action;
pub mod clock;
pub mod error;
pub mod event;
pub mod inventory;
pub mod metadata;
pub mod namegen;
pub mod state;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use action::Action;
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::EngineError;
pub use event::Event;
pub use inventory::{CloudInventory, FileName, Inventory, LocalInventory};
pub use metadata::{CloudItem, LocalItem, MetadataItem};
pub use namegen::fresh_name;
pub use state::{EnginePhase, EngineState};
