//! Actor System for the Dev Loop
//!
//! Message-passing concurrency for watch mode:
//!
//! ```text
//! FsActor ──Trigger──► LifecycleActor
//! (watch, filter,       (build, stop old,
//!  debounce)             start new)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File system watcher, event filter and trigger gate
//! - `lifecycle` - Build command and child process supervision
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod lifecycle;
pub mod messages;

pub use coordinator::Coordinator;
