use std::path::Path;

use super::types::{ChangeEvent, ChangeKind};

/// Why a change was not considered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Remove / Rename: nothing new to compile
    Operation,
    /// Not a source file for the build toolchain
    Extension,
}

/// Operation and extension gates, applied in that order.
///
/// Pure: no timing, no I/O.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Normalized extensions (no leading dot)
    extensions: Vec<String>,
}

impl EventFilter {
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    pub fn check(&self, event: &ChangeEvent) -> Result<(), Rejection> {
        if !matches!(event.kind, ChangeKind::Write | ChangeKind::Create) {
            return Err(Rejection::Operation);
        }
        if !self.is_source(&event.path) {
            return Err(Rejection::Extension);
        }
        Ok(())
    }

    /// Extension match is exact and case-sensitive (`main.GO` is not Go).
    fn is_source(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|want| want == ext))
    }
}
