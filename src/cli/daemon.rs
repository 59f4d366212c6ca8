//! Daemon entry point: runtime setup and status sink selection.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actor::Coordinator;
use crate::config::DaemonConfig;
use crate::status::{ConsoleSink, JsonSink, StatusSink};

/// Run the watch → build → restart loop until Ctrl+C.
pub fn run_daemon(config: DaemonConfig, json: bool) -> Result<()> {
    let status: Arc<dyn StatusSink> = if json {
        Arc::new(JsonSink)
    } else {
        Arc::new(ConsoleSink)
    };

    if let Some(path) = &config.config_path {
        crate::debug!("config"; "loaded {}", path.display());
    }

    let (shutdown_tx, shutdown_rx) = crossbeam::channel::bounded(1);
    crate::core::register_shutdown(shutdown_tx);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(
        Coordinator::new(Arc::new(config), status)
            .with_shutdown_signal(shutdown_rx)
            .run(),
    )
}
