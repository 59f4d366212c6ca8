//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Config file name looked up in the watched root.
pub const DEFAULT_CONFIG_NAME: &str = "hotrun.toml";

/// Resolve the config file location.
///
/// Returns the candidate path and whether the user named it explicitly.
/// Relative names are resolved against the watched root, not the cwd.
///
/// # Example
/// ```text
/// hotrun ./api                 → ./api/hotrun.toml   (implicit, optional)
/// hotrun ./api -C dev.toml     → ./api/dev.toml      (explicit, required)
/// hotrun ./api -C /etc/x.toml  → /etc/x.toml         (explicit, required)
/// ```
pub fn resolve_config_path(root: &Path, requested: Option<&Path>) -> (PathBuf, bool) {
    match requested {
        Some(path) if path.is_absolute() => (path.to_path_buf(), true),
        Some(path) => (root.join(path), true),
        None => (root.join(DEFAULT_CONFIG_NAME), false),
    }
}

/// Default artifact name: the root directory's own name.
pub fn default_output_name(root: &Path) -> Option<String> {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

// ============================================================================
// tests
// ============================================================================
