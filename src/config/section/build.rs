//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! command = "go build"        # Executed in the watched root, all streams inherited
//! ```

use serde::Deserialize;

use crate::utils::exec::CommandLine;

/// Build step settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Command producing the artifact. Split on whitespace.
    pub command: CommandLine,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: CommandLine::new("go", vec!["build".to_string()]),
        }
    }
}
