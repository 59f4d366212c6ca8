//! Lifecycle Actor - Build and Restart
//!
//! Receives accepted triggers one at a time and runs the cycle:
//!
//! ```text
//! Idle ──Trigger──► Building ──fail──► Idle   (old child untouched)
//!                      │
//!                      └─ok──► Restarting: stop old → start new ──► Idle
//! ```
//!
//! The actor exclusively owns the current child. Messages are handled
//! sequentially, so at most one cycle runs at a time.

mod build;
mod cycle;
mod process;


use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::fs::TriggerGate;
use super::messages::LifecycleMsg;
use crate::config::{ConfigError, DaemonConfig};
use crate::status::StatusSink;
use crate::utils::exec::CommandLine;

use process::ChildProcess;

/// What the actor runs, and where
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    pub root: PathBuf,
    pub build: CommandLine,
    pub run: CommandLine,
    /// Grace period between SIGTERM and a forced kill
    pub kill_timeout: Duration,
}

impl LifecycleConfig {
    pub fn from_config(config: &DaemonConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            root: config.get_root().to_path_buf(),
            build: config.build.command.clone(),
            run: config.run_command()?,
            kill_timeout: config.run.kill_timeout(),
        })
    }
}

pub struct LifecycleActor {
    rx: mpsc::Receiver<LifecycleMsg>,
    gate: Arc<TriggerGate>,
    status: Arc<dyn StatusSink>,
    config: LifecycleConfig,
    /// `None` before the first successful start, or after a failed one
    current: Option<ChildProcess>,
    /// Replaces the result of the next termination
    #[cfg(test)]
    kill_failure: Option<process::KillError>,
}

impl LifecycleActor {
    pub fn new(
        rx: mpsc::Receiver<LifecycleMsg>,
        gate: Arc<TriggerGate>,
        status: Arc<dyn StatusSink>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            rx,
            gate,
            status,
            config,
            current: None,
            #[cfg(test)]
            kill_failure: None,
        }
    }

    /// Run the actor until `Shutdown` or until every sender is gone.
    ///
    /// The current child is always stopped before returning.
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                LifecycleMsg::Trigger(cause) => {
                    let outcome = self.on_trigger(&cause).await;
                    crate::debug!("build"; "cycle done: {:?}", outcome);
                    self.gate.release();
                }
                LifecycleMsg::Shutdown => break,
            }
        }

        self.on_shutdown().await;
    }
}
