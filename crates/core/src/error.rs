// SPDX-License-Identifier: MIT

//! Error kinds surfaced by the engine (spec.md §7).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("no network connection")]
    NoNetwork,

    #[error("cloud storage quota exceeded")]
    OutOfSpace,

    #[error("cloud is unavailable")]
    CloudUnavailable,

    #[error("cloud container could not be resolved")]
    ContainerNotFound,

    #[error("file is not yet available locally: {0}")]
    FileUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Fatal kinds stop the sync session; the user (or the next monitor
    /// availability change) must retry. Non-fatal kinds are logged and the
    /// engine continues — the next observation re-derives any outstanding
    /// work.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::NoNetwork
                | EngineError::OutOfSpace
                | EngineError::CloudUnavailable
                | EngineError::ContainerNotFound
        )
    }
}
