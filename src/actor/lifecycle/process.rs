//! The supervised child process and its termination.
//!
//! On unix the child leads its own process group, and every signal goes to
//! the whole group so processes it started go down with it. Termination
//! sends SIGTERM, waits up to a grace period, then force-kills.
//! "No such process" is classified by errno, never by message text.

use std::path::Path;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::process::Child;

use crate::utils::exec::{Cmd, CommandLine};

#[derive(Debug, Error)]
pub enum KillError {
    #[error("failed to signal process {pid}: {source}")]
    Signal {
        pid: u32,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to kill process: {0}")]
    Kill(#[source] std::io::Error),
    #[error("failed to wait for process: {0}")]
    Wait(#[source] std::io::Error),
}

/// How a child ended when we asked it to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    /// It was already gone (exited on its own, or not found)
    AlreadyExited,
    /// Exited within the grace period after SIGTERM
    Terminated,
    /// Needed a forced kill
    Killed,
}

/// Result of asking the OS to deliver the termination request
#[derive(Debug, PartialEq, Eq)]
enum Delivery {
    Sent,
    Gone,
}

/// The currently running program instance
#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
    pid: Option<u32>,
    command: String,
    started_at: Instant,
}

impl ChildProcess {
    /// Start `command` in `cwd` without waiting for it.
    ///
    /// stdin is closed, stdout/stderr and the environment are inherited.
    pub fn spawn(command: &CommandLine, cwd: &Path) -> std::io::Result<Self> {
        let child = Cmd::from_line(command)
            .cwd(cwd)
            .null_stdin(true)
            .own_group(true)
            .spawn()?;

        Ok(Self {
            pid: child.id(),
            child,
            command: command.to_string(),
            started_at: Instant::now(),
        })
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Stop the process and everything it started, and reap it.
    pub async fn terminate(mut self, grace: Duration) -> Result<KillOutcome, KillError> {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                crate::debug!("run"; "`{}` had exited: {}", self.command, status);
                // The leader is gone but its group may not be.
                self.sweep_group();
                return Ok(KillOutcome::AlreadyExited);
            }
            Ok(None) => {}
            Err(e) => return Err(KillError::Wait(e)),
        }

        if send_terminate(&mut self.child)? == Delivery::Gone {
            // Reap, whatever state it is in.
            let _ = self.child.wait().await;
            return Ok(KillOutcome::AlreadyExited);
        }

        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(Ok(_)) => {
                self.sweep_group();
                Ok(KillOutcome::Terminated)
            }
            Ok(Err(e)) => Err(KillError::Wait(e)),
            Err(_) => {
                crate::debug!("run"; "pid {:?} ignored termination for {:?}, killing", self.pid, grace);
                self.force_kill().await
            }
        }
    }

    async fn force_kill(&mut self) -> Result<KillOutcome, KillError> {
        let outcome = match self.child.kill().await {
            Ok(()) => Ok(KillOutcome::Killed),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => {
                Ok(KillOutcome::AlreadyExited)
            }
            Err(e) => Err(KillError::Kill(e)),
        };
        self.sweep_group();
        outcome
    }

    /// SIGKILL whatever is left of the process group.
    #[cfg(unix)]
    fn sweep_group(&self) {
        use nix::sys::signal::Signal;

        if let Some(pid) = self.pid
            && let Err(e) = signal_group(pid, Signal::SIGKILL)
        {
            crate::debug!("run"; "{}", e);
        }
    }

    #[cfg(not(unix))]
    fn sweep_group(&self) {}
}

#[cfg(unix)]
fn send_terminate(child: &mut Child) -> Result<Delivery, KillError> {
    use nix::sys::signal::Signal;

    // No id: already reaped by tokio.
    let Some(pid) = child.id() else {
        return Ok(Delivery::Gone);
    };
    signal_group(pid, Signal::SIGTERM)
}

/// Signal the process group led by `pid`.
#[cfg(unix)]
fn signal_group(pid: u32, signal: nix::sys::signal::Signal) -> Result<Delivery, KillError> {
    use nix::sys::signal::killpg;
    use nix::unistd::Pid;

    match killpg(Pid::from_raw(pid as i32), signal) {
        Ok(()) => Ok(Delivery::Sent),
        Err(errno) => classify_signal_error(pid, errno),
    }
}

/// ESRCH means the group is gone: a benign race, not a failure.
#[cfg(unix)]
fn classify_signal_error(pid: u32, errno: nix::errno::Errno) -> Result<Delivery, KillError> {
    match errno {
        nix::errno::Errno::ESRCH => Ok(Delivery::Gone),
        errno => Err(KillError::Signal {
            pid,
            source: errno.into(),
        }),
    }
}

#[cfg(not(unix))]
fn send_terminate(child: &mut Child) -> Result<Delivery, KillError> {
    match child.start_kill() {
        Ok(()) => Ok(Delivery::Sent),
        Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(Delivery::Gone),
        Err(e) => Err(KillError::Kill(e)),
    }
}
