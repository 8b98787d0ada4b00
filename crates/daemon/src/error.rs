// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not resolve a state directory")]
    NoStateDir,

    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("cloud is unavailable")]
    CloudUnavailable,

    #[error("already running")]
    AlreadyRunning,

    #[error("not running")]
    NotRunning,

    #[error(transparent)]
    Monitor(#[from] fsync_adapters::MonitorError),

    #[error(transparent)]
    Settings(#[from] fsync_storage::SyncSettingsError),
}
