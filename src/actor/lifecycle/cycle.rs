use super::LifecycleActor;
use super::build::run_build;
use super::process::{ChildProcess, KillOutcome};
use crate::actor::messages::TriggerCause;
use crate::status::Status;

/// Where a cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CycleOutcome {
    BuildFailed,
    /// Build succeeded but shutdown was requested meanwhile
    Aborted,
    StartFailed,
    Started,
}

impl LifecycleActor {
    /// Building → Restarting → Idle.
    pub(super) async fn on_trigger(&mut self, cause: &TriggerCause) -> CycleOutcome {
        let trigger = cause.changed_path().map(|path| {
            path.strip_prefix(&self.config.root)
                .unwrap_or(path)
                .to_path_buf()
        });
        self.status.report(Status::BuildStarted { trigger });

        if let Err(e) = run_build(&self.config.build, &self.config.root).await {
            self.status.report(Status::BuildFailed {
                error: e.to_string(),
            });
            return CycleOutcome::BuildFailed;
        }
        self.status.report(Status::BuildSucceeded);

        if crate::core::is_shutdown() {
            return CycleOutcome::Aborted;
        }

        self.stop_current().await;
        self.start_new()
    }

    /// Stop the current child, if any. Never fails the cycle.
    async fn stop_current(&mut self) {
        let Some(child) = self.current.take() else {
            return;
        };

        let pid = child.pid();
        crate::debug!("run"; "stopping pid {:?} after {:?}", pid, child.uptime());

        let result = child.terminate(self.config.kill_timeout).await;
        #[cfg(test)]
        let result = match self.kill_failure.take() {
            Some(e) => Err(e),
            None => result,
        };

        match result {
            Ok(KillOutcome::AlreadyExited) => self.status.report(Status::ProcessStopped { pid }),
            Ok(KillOutcome::Terminated | KillOutcome::Killed) => {
                self.status.report(Status::ProcessKilled { pid })
            }
            // The old instance may linger; the new one still starts.
            Err(e) => self.status.report(Status::KillFailed {
                error: e.to_string(),
            }),
        }
    }

    fn start_new(&mut self) -> CycleOutcome {
        match ChildProcess::spawn(&self.config.run, &self.config.root) {
            Ok(child) => {
                self.status.report(Status::ProcessStarted {
                    pid: child.pid(),
                    command: child.command().to_string(),
                });
                self.current = Some(child);
                CycleOutcome::Started
            }
            Err(e) => {
                self.status.report(Status::ProcessStartFailed {
                    error: format!("`{}`: {}", self.config.run, e),
                });
                CycleOutcome::StartFailed
            }
        }
    }

    pub(super) async fn on_shutdown(&mut self) {
        self.stop_current().await;
        self.status.report(Status::Shutdown);
    }

    #[cfg(test)]
    pub(super) fn current_pid(&self) -> Option<u32> {
        self.current.as_ref().and_then(ChildProcess::pid)
    }
}
