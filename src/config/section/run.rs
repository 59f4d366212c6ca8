//! `[run]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [run]
//! command = "./server --port 8080"   # Default: <root>/<output>
//! output = "server"                  # Artifact name, default: root directory name
//! kill_timeout_ms = 5000             # Grace period after SIGTERM before SIGKILL
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::utils::exec::CommandLine;

/// Long-running child settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Explicit run command. When absent, the built artifact is executed.
    pub command: Option<CommandLine>,

    /// Artifact file name used to derive the default run command.
    pub output: Option<String>,

    /// Milliseconds to wait for a terminated child before force-killing it.
    pub kill_timeout_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            command: None,
            output: None,
            kill_timeout_ms: 5000,
        }
    }
}

impl RunConfig {
    pub fn kill_timeout(&self) -> Duration {
        Duration::from_millis(self.kill_timeout_ms)
    }
}
