use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::fs::FsActor;
use crate::actor::lifecycle::LifecycleActor;
use crate::actor::messages::LifecycleMsg;

const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Run both actors until a shutdown signal (or the watcher stops).
///
/// On the way out the lifecycle actor always gets `Shutdown` and is awaited,
/// so the supervised program is stopped before we return. A build in
/// progress finishes first.
pub(super) async fn run_actors(
    fs: FsActor,
    lifecycle: LifecycleActor,
    lifecycle_tx: mpsc::Sender<LifecycleMsg>,
    shutdown_rx: Option<Receiver<()>>,
) -> Result<()> {
    let lifecycle_handle = tokio::spawn(lifecycle.run());
    let mut fs_handle = tokio::spawn(fs.run());

    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            if fs_handle.is_finished() {
                crate::log!("watch"; "watcher stopped unexpectedly");
                break;
            }
            tokio::time::sleep(SHUTDOWN_POLL).await;
        }
    } else {
        let _ = (&mut fs_handle).await;
    }

    fs_handle.abort();

    crate::debug!("actor"; "sending shutdown to lifecycle");
    let _ = lifecycle_tx.send(LifecycleMsg::Shutdown).await;
    drop(lifecycle_tx);

    if let Err(e) = lifecycle_handle.await {
        crate::log!("error"; "lifecycle actor failed: {}", e);
    }

    Ok(())
}
