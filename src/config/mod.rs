//! Daemon configuration management for `hotrun.toml` and CLI flags.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [build], [run], [watch]
//! ├── types/         # ConfigError
//! ├── util.rs        # config file lookup, artifact naming
//! └── mod.rs         # DaemonConfig (this file)
//! ```
//!
//! Precedence: built-in defaults < config file < command-line flags.

pub mod section;
pub mod types;
mod util;

use util::{default_output_name, resolve_config_path};

pub use section::{BuildConfig, RunConfig, WatchConfig};
pub use types::ConfigError;

use crate::{cli::Cli, log, utils::exec::CommandLine, utils::path::expand_path};
use anyhow::Result;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing hotrun.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DaemonConfig {
    /// Watched root directory, absolute (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Config file that was loaded, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Build step
    #[serde(default)]
    pub build: BuildConfig,

    /// Supervised program
    #[serde(default)]
    pub run: RunConfig,

    /// Change detection
    #[serde(default)]
    pub watch: WatchConfig,
}

impl DaemonConfig {
    /// Load configuration from CLI arguments.
    ///
    /// The root is taken from the positional argument (default: cwd), the
    /// config file is looked up inside it, then CLI flags are applied on top.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = Self::resolve_root(cli.dir.as_deref())?;
        let (config_path, explicit) = resolve_config_path(&root, cli.config.as_deref());

        let mut config = if config_path.is_file() {
            let mut config = Self::from_path(&config_path)?;
            config.config_path = Some(config_path);
            config
        } else if explicit {
            let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found");
            return Err(ConfigError::Io(config_path, err).into());
        } else {
            Self::default()
        };

        config.set_root(&root);
        config.apply_cli(cli);
        config.validate()?;

        Ok(config)
    }

    /// Expand `~` and make the root absolute. Existence is checked in `validate`.
    fn resolve_root(dir: Option<&Path>) -> Result<PathBuf, ConfigError> {
        let raw = match dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().map_err(|e| ConfigError::Io(PathBuf::from("."), e))?,
        };
        Ok(expand_path(&raw))
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} (ignored):", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    /// Command that starts the supervised program.
    ///
    /// Falls back to `<root>/<output>`, where `output` defaults to the root
    /// directory's name (what `go build` produces there).
    pub fn run_command(&self) -> Result<CommandLine, ConfigError> {
        if let Some(command) = &self.run.command {
            return Ok(command.clone());
        }
        let output = self
            .run
            .output
            .clone()
            .or_else(|| default_output_name(&self.root))
            .ok_or_else(|| ConfigError::NoRunTarget(self.root.clone()))?;
        Ok(CommandLine::from_program(&self.root.join(output)))
    }

    /// Source extensions without leading dots.
    pub fn extensions(&self) -> Vec<String> {
        self.watch.normalized_extensions()
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-line overrides.
    fn apply_cli(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        Self::update_option(&mut self.build.command, cli.build_cmd.as_ref());
        if let Some(command) = &cli.run_cmd {
            self.run.command = Some(command.clone());
        }
        if let Some(output) = &cli.output {
            self.run.output = Some(output.clone());
        }
        Self::update_option(&mut self.run.kill_timeout_ms, cli.kill_timeout.as_ref());
        Self::update_option(&mut self.watch.quiet_period_ms, cli.quiet_period.as_ref());

        if !cli.extensions.is_empty() {
            self.watch.extensions = cli.extensions.clone();
        }
        if cli.skip_initial {
            self.watch.initial_build = false;
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration. Every error here aborts startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root.exists() {
            return Err(ConfigError::RootMissing(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ConfigError::NotADirectory(self.root.clone()));
        }
        if self.extensions().is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        self.run_command()?;

        if !self.build.command.is_resolvable(&self.root) {
            log!(
                "warning";
                "build program `{}` not found on PATH",
                self.build.command.program()
            );
        }

        Ok(())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config text. Panics if there are unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> DaemonConfig {
    let (parsed, ignored) = DaemonConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
