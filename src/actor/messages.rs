//! Actor Message Definitions
//!
//! ```text
//! FsActor --Trigger--> LifecycleActor
//! Coordinator --Shutdown--> LifecycleActor
//! ```

use std::path::{Path, PathBuf};

// =============================================================================
// LifecycleActor Messages
// =============================================================================

/// What started a build-and-restart cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerCause {
    /// First cycle, before any file change
    Startup,
    /// A source file was written or created
    Change(PathBuf),
}

impl TriggerCause {
    /// The file whose change started the cycle, if any
    pub fn changed_path(&self) -> Option<&Path> {
        match self {
            Self::Startup => None,
            Self::Change(path) => Some(path),
        }
    }
}

/// Messages to Lifecycle Actor
#[derive(Debug)]
pub enum LifecycleMsg {
    /// Run one build → stop previous → start new cycle.
    ///
    /// Only sent after the trigger gate accepted it; the gate stays
    /// "in flight" until the actor releases it.
    Trigger(TriggerCause),
    /// Stop the current child and exit
    Shutdown,
}
