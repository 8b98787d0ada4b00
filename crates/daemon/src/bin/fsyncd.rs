// SPDX-License-Identifier: MIT

//! fsyncd: standalone sync session for one local/cloud directory pair
//! (spec.md §6's "Environment"). Not the originating mobile app — a
//! stand-in host process exercising the same engine, monitors, and
//! orchestrator over plain directories.

use fsync_adapters::{FsCloudMonitor, FsLocalMonitor, LoggingBookmarkLoader};
use fsync_core::EngineState;
use fsync_daemon::{Config, DaemonLifecycle, Lifecycle};
use fsync_io::{LoggingDownloadAgent, NoVersionProbe, Orchestrator};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    let config = Config::load()?;
    info!(
        local_dir = %config.local_dir.display(),
        cloud_dir = %config.cloud_dir.display(),
        extension = %config.extension,
        "loaded configuration"
    );

    let settings = fsync_storage::SyncSettings::load(config.settings_path.as_path())?;

    let (tx, rx) = mpsc::unbounded_channel();
    let local_monitor =
        Arc::new(FsLocalMonitor::new(config.local_dir.clone(), config.extension.clone(), tx.clone()));
    let cloud_monitor =
        Arc::new(FsCloudMonitor::new(config.cloud_dir.clone(), config.extension.clone(), tx));

    let orchestrator = Arc::new(Orchestrator::new(
        config.local_dir.clone(),
        config.cloud_dir.clone(),
        config.device_name.clone(),
        LoggingDownloadAgent,
        NoVersionProbe,
        Arc::new(LoggingBookmarkLoader),
    ));

    let engine = EngineState::new(config.device_name.clone(), settings.initial_sync_done);

    let lifecycle: DaemonLifecycle =
        Lifecycle::new(local_monitor, cloud_monitor, orchestrator, rx, engine, config.settings_path.clone());

    lifecycle.start().await?;
    info!("sync session started");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }

    info!("shutting down");
    lifecycle.stop().await?;
    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
}
