//! Utility modules for the dev-loop daemon.

pub mod exec;
pub mod path;
pub mod walk;
