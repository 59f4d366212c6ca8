//! Actor Coordinator - Wires up the Dev Loop
//!
//! The Coordinator is a thin orchestrator that:
//! - Enumerates the WatchSet and subscribes it (before any build)
//! - Creates the single-slot trigger channel and the shared gate
//! - Queues the startup cycle
//! - Runs the actors until shutdown

mod runtime;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::{EventFilter, FsActor, TriggerGate};
use super::lifecycle::{LifecycleActor, LifecycleConfig};
use super::messages::{LifecycleMsg, TriggerCause};
use crate::config::DaemonConfig;
use crate::status::StatusSink;
use crate::utils::walk::collect_watch_dirs;

/// One pending trigger at most; the gate keeps it from ever filling up.
const TRIGGER_SLOTS: usize = 1;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    config: Arc<DaemonConfig>,
    status: Arc<dyn StatusSink>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn new(config: Arc<DaemonConfig>, status: Arc<dyn StatusSink>) -> Self {
        Self {
            config,
            status,
            shutdown_rx: None,
        }
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    ///
    /// Errors only during startup (watcher creation, root subscription).
    pub async fn run(mut self) -> Result<()> {
        let root = self.config.get_root();
        let gate = Arc::new(TriggerGate::new(self.config.watch.quiet_period()));
        let (lifecycle_tx, lifecycle_rx) = mpsc::channel::<LifecycleMsg>(TRIGGER_SLOTS);

        let watch_set = collect_watch_dirs(root);
        crate::debug!("watch"; "{} directories under {}", watch_set.len(), root.display());

        let fs_actor = FsActor::new(
            root,
            &watch_set,
            EventFilter::new(self.config.extensions()),
            Arc::clone(&gate),
            lifecycle_tx.clone(),
            Arc::clone(&self.status),
        )
        .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;

        let lifecycle_actor = LifecycleActor::new(
            lifecycle_rx,
            Arc::clone(&gate),
            Arc::clone(&self.status),
            LifecycleConfig::from_config(&self.config)?,
        );

        if self.config.watch.initial_build && gate.force_acquire(Instant::now()) {
            lifecycle_tx
                .send(LifecycleMsg::Trigger(TriggerCause::Startup))
                .await
                .map_err(|_| anyhow::anyhow!("lifecycle channel closed"))?;
        }

        crate::debug!("actor"; "start");
        let shutdown_rx = self.shutdown_rx.take();
        runtime::run_actors(fs_actor, lifecycle_actor, lifecycle_tx, shutdown_rx).await?;

        crate::debug!("actor"; "stopped");
        Ok(())
    }
}
