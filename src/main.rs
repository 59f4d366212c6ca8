//! hotrun - rebuild and restart a program whenever its sources change.

mod actor;
mod cli;
mod config;
mod core;
mod logger;
mod status;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::DaemonConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = DaemonConfig::load(&cli)?;
    cli::daemon::run_daemon(config, cli.json)
}
