//! Structured status events and their display.
//!
//! The watch loop and the lifecycle actor never print directly; they report
//! [`Status`] values to a [`StatusSink`]. The console sink renders them with
//! the logger, the JSON sink emits one NDJSON object per event.

use std::path::PathBuf;

use serde::Serialize;

use crate::{debug, log, logger};

/// Observable daemon events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Status {
    Watching { root: PathBuf, directories: usize },
    Changed { path: PathBuf },
    /// `trigger` is the changed file, absent for the startup build.
    BuildStarted {
        #[serde(skip_serializing_if = "Option::is_none")]
        trigger: Option<PathBuf>,
    },
    BuildSucceeded,
    BuildFailed { error: String },
    /// Previous child had already exited when termination was attempted.
    ProcessStopped { pid: Option<u32> },
    /// Previous child was terminated by us.
    ProcessKilled { pid: Option<u32> },
    KillFailed { error: String },
    ProcessStarted { pid: Option<u32>, command: String },
    ProcessStartFailed { error: String },
    WatchError { error: String },
    Shutdown,
}

impl Status {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Receiver of status events. Must be cheap and non-blocking.
pub trait StatusSink: Send + Sync {
    fn report(&self, status: Status);
}

impl<F> StatusSink for F
where
    F: Fn(Status) + Send + Sync,
{
    fn report(&self, status: Status) {
        self(status)
    }
}

/// Human-readable terminal output.
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn report(&self, status: Status) {
        match status {
            Status::Watching { root, directories } => {
                log!("watch"; "watching {} ({} directories)", root.display(), directories);
            }
            Status::Changed { path } => log!("watch"; "{} changed", path.display()),
            Status::BuildStarted { trigger: None } => log!("build"; "building..."),
            Status::BuildStarted {
                trigger: Some(path),
            } => log!("build"; "building ({} changed)...", path.display()),
            Status::BuildSucceeded => logger::status_success("build succeeded"),
            Status::BuildFailed { error } => logger::status_error("build failed", &error),
            Status::ProcessStopped { pid } => {
                debug!("run"; "previous process {} had already exited", fmt_pid(pid));
            }
            Status::ProcessKilled { pid } => log!("run"; "stopped process {}", fmt_pid(pid)),
            Status::KillFailed { error } => logger::status_warning(&format!("kill failed: {error}")),
            Status::ProcessStarted { pid, command } => {
                log!("run"; "started `{}` (pid {})", command, fmt_pid(pid));
            }
            Status::ProcessStartFailed { error } => logger::status_error("start failed", &error),
            Status::WatchError { error } => log!("error"; "watch: {}", error),
            Status::Shutdown => log!("watch"; "shutting down..."),
        }
    }
}

/// NDJSON on stdout, one object per event.
pub struct JsonSink;

impl StatusSink for JsonSink {
    fn report(&self, status: Status) {
        println!("{}", status.to_json());
    }
}

fn fmt_pid(pid: Option<u32>) -> String {
    pid.map_or_else(|| "?".to_string(), |p| p.to_string())
}
