//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("watch root `{0}` does not exist")]
    RootMissing(PathBuf),

    #[error("watch root `{0}` is not a directory")]
    NotADirectory(PathBuf),

    #[error("no source extensions configured")]
    NoExtensions,

    #[error("cannot derive a run command from `{0}`; pass --run-cmd or --output")]
    NoRunTarget(PathBuf),
}
