//! `[watch]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! extensions = ["go"]         # Source extensions that trigger a rebuild
//! quiet_period_ms = 1000      # Minimum time between two accepted triggers
//! initial_build = true        # Build and start once before the first change
//! ```

use std::time::Duration;

use serde::Deserialize;

/// Change-detection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Relevant file extensions, with or without the leading dot.
    pub extensions: Vec<String>,

    /// Debounce window measured from the last accepted trigger.
    pub quiet_period_ms: u64,

    /// Run one cycle at startup.
    pub initial_build: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["go".to_string()],
            quiet_period_ms: 1000,
            initial_build: true,
        }
    }
}

impl WatchConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    /// Extensions without leading dots, blanks removed.
    pub fn normalized_extensions(&self) -> Vec<String> {
        let mut exts: Vec<String> = self
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        exts.sort();
        exts.dedup();
        exts
    }
}
