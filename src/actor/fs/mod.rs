//! FileSystem Actor
//!
//! Watches the WatchSet and hands accepted changes to the LifecycleActor.
//! Subscriptions are made before the first build ("watcher first"), so edits
//! made while the initial build runs are still seen.
//!
//! Architecture:
//! ```text
//! notify → bridge thread ─┬─ changes ─→ Filter (op, ext) → TriggerGate → LifecycleMsg
//!                         └─ errors ──→ Status::WatchError
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use super::messages::LifecycleMsg;
use crate::status::{Status, StatusSink};
use crate::utils::walk::WatchSet;

// Rate limit and single-flight guard.
mod debouncer;
// Operation and extension gates.
mod filter;
// Filter → gate → trigger for one change.
mod router;
// Shared fs event types.
mod types;
// Per-directory subscription.
mod watch_roots;

#[cfg(test)]
mod tests;

pub use debouncer::TriggerGate;
pub use filter::EventFilter;

use types::ChangeEvent;

use router::{ChangeRouter, Routed};
use watch_roots::WatchRoots;

const CHANGE_BUFFER: usize = 256;
const ERROR_BUFFER: usize = 16;

/// FileSystem Actor - watches for source changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    router: ChangeRouter,
    status: Arc<dyn StatusSink>,
}

impl FsActor {
    /// Create the watcher and subscribe every WatchSet directory.
    ///
    /// Fails if the watcher cannot be created or the root cannot be watched.
    pub fn new(
        root: &Path,
        watch_set: &WatchSet,
        filter: EventFilter,
        gate: Arc<TriggerGate>,
        lifecycle_tx: mpsc::Sender<LifecycleMsg>,
        status: Arc<dyn StatusSink>,
    ) -> notify::Result<Self> {
        // Create sync channel for notify (it doesn't support async)
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut watch_roots = WatchRoots::new(root, watch_set);
        for error in watch_roots.attach_all(&mut watcher)? {
            status.report(Status::WatchError { error });
        }

        status.report(Status::Watching {
            root: root.to_path_buf(),
            directories: watch_roots.attached_count(),
        });

        Ok(Self {
            notify_rx,
            watcher,
            router: ChangeRouter::new(root, filter, gate, lifecycle_tx, Arc::clone(&status)),
            status,
        })
    }

    /// Run the actor event loop until the lifecycle actor goes away.
    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let router = self.router;
        let status = self.status;
        // Dropping the watcher ends the bridge thread.
        let _watcher = self.watcher;

        let (change_tx, mut change_rx) = mpsc::channel::<notify::Event>(CHANGE_BUFFER);
        let (error_tx, mut error_rx) = mpsc::channel::<notify::Error>(ERROR_BUFFER);

        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                let delivered = match result {
                    Ok(event) => change_tx.blocking_send(event).is_ok(),
                    Err(error) => error_tx.blocking_send(error).is_ok(),
                };
                if !delivered {
                    break; // Receiver dropped
                }
            }
        });

        loop {
            tokio::select! {
                Some(event) = change_rx.recv() => {
                    if dispatch(&router, &event) == Dispatch::Closed {
                        break;
                    }
                }
                Some(error) = error_rx.recv() => {
                    status.report(Status::WatchError { error: error.to_string() });
                }
                else => break,
            }
        }

        crate::debug!("watch"; "event loop stopped");
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Dispatch {
    Continue,
    Closed,
}

/// Route every path of one notify event.
fn dispatch(router: &ChangeRouter, event: &notify::Event) -> Dispatch {
    crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

    let now = Instant::now();
    for change in ChangeEvent::from_notify(event) {
        if router.route(change, now) == Routed::Closed {
            return Dispatch::Closed;
        }
    }
    Dispatch::Continue
}
