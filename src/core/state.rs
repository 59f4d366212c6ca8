//! Process-wide shutdown state.
//!
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)
//!
//! The Ctrl+C handler runs on its own thread. The first signal flips the flag
//! and notifies the coordinator; a second one while shutdown is still in
//! progress exits immediately.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Shutdown signal sender for the actor system
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// Exit code for a forced exit on repeated interrupt (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on whether the coordinator has registered:
/// - Before `register_shutdown()`: nothing to stop yet, exit immediately
/// - After `register_shutdown()`: notify the coordinator, which stops the
///   supervised program before returning
/// - Second Ctrl+C: exit immediately without waiting
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if SHUTDOWN.swap(true, Ordering::SeqCst) {
            crate::log!("watch"; "interrupted again, exiting");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }

        match SHUTDOWN_TX.get() {
            Some(tx) => {
                let _ = tx.send(());
            }
            None => std::process::exit(0),
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the coordinator's shutdown channel.
///
/// Only the first registration takes effect.
pub fn register_shutdown(shutdown_tx: crossbeam::channel::Sender<()>) {
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

// =============================================================================
// Tests
// =============================================================================
