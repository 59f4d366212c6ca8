use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc::{self, error::TrySendError};

use super::debouncer::{GateDecision, TriggerGate};
use super::filter::{EventFilter, Rejection};
use super::types::ChangeEvent;
use crate::actor::messages::{LifecycleMsg, TriggerCause};
use crate::status::{Status, StatusSink};

/// What happened to one change event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Routed {
    /// Failed the operation or extension gate
    Ignored(Rejection),
    /// Relevant, but the trigger gate refused it
    Dropped(GateDecision),
    /// A cycle was handed to the lifecycle actor
    Triggered,
    /// Lifecycle actor is gone
    Closed,
}

/// Filter → gate → trigger, for one change at a time.
pub(super) struct ChangeRouter {
    root: PathBuf,
    filter: EventFilter,
    gate: Arc<TriggerGate>,
    lifecycle_tx: mpsc::Sender<LifecycleMsg>,
    status: Arc<dyn StatusSink>,
}

impl ChangeRouter {
    pub(super) fn new(
        root: &Path,
        filter: EventFilter,
        gate: Arc<TriggerGate>,
        lifecycle_tx: mpsc::Sender<LifecycleMsg>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            filter,
            gate,
            lifecycle_tx,
            status,
        }
    }

    pub(super) fn route(&self, event: ChangeEvent, now: Instant) -> Routed {
        if let Err(reason) = self.filter.check(&event) {
            crate::debug!("watch"; "ignore {} {} ({:?})", event.kind.label(), event.path.display(), reason);
            return Routed::Ignored(reason);
        }

        let decision = self.gate.try_acquire(now);
        if decision != GateDecision::Accepted {
            crate::debug!("watch"; "drop {}: {:?}", event.path.display(), decision);
            return Routed::Dropped(decision);
        }

        let path = self.display_path(&event.path);
        let msg = LifecycleMsg::Trigger(TriggerCause::Change(event.path));
        match self.lifecycle_tx.try_send(msg) {
            Ok(()) => {
                self.status.report(Status::Changed { path });
                Routed::Triggered
            }
            // Slot still holds an unconsumed trigger: give the gate back.
            Err(TrySendError::Full(_)) => {
                self.gate.release();
                Routed::Dropped(GateDecision::InFlight)
            }
            Err(TrySendError::Closed(_)) => {
                self.gate.release();
                Routed::Closed
            }
        }
    }

    fn display_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
