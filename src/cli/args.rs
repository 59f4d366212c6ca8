//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

use crate::utils::exec::CommandLine;

/// Rebuild and restart a program whenever its sources change
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source directory to watch (default: current directory)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Build command, run in the watched directory (default: `go build`)
    #[arg(short, long = "build-cmd", value_name = "CMD")]
    pub build_cmd: Option<CommandLine>,

    /// Run command (default: `<dir>/<output>`)
    #[arg(short, long = "run-cmd", value_name = "CMD")]
    pub run_cmd: Option<CommandLine>,

    /// Name of the built binary inside the watched directory
    /// (default: the directory name)
    #[arg(short, long, value_name = "NAME")]
    pub output: Option<String>,

    /// Source extensions that trigger a rebuild, comma separated (default: go)
    #[arg(short, long = "ext", value_name = "EXT", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Minimum time between two rebuilds, in milliseconds (default: 1000)
    #[arg(short, long = "quiet-period", value_name = "MS")]
    pub quiet_period: Option<u64>,

    /// Grace period before a stopped program is force-killed, in milliseconds (default: 5000)
    #[arg(long = "kill-timeout", value_name = "MS")]
    pub kill_timeout: Option<u64>,

    /// Do not build and start the program until the first change
    #[arg(long)]
    pub skip_initial: bool,

    /// Config file path, relative to the watched directory (default: hotrun.toml)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Emit status events as JSON lines instead of colored text
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}
