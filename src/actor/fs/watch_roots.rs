use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

use crate::utils::walk::{WatchSet, sorted};

/// Subscription bookkeeping for the WatchSet.
///
/// Each directory is subscribed individually and non-recursively. The set is
/// fixed at startup: directories created later are not picked up.
pub(super) struct WatchRoots {
    root: PathBuf,
    desired: Vec<PathBuf>,
    attached: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new(root: &Path, set: &WatchSet) -> Self {
        Self {
            root: root.to_path_buf(),
            desired: sorted(set),
            attached: FxHashSet::default(),
        }
    }

    /// Subscribe every directory.
    ///
    /// Failing on the root is fatal. Any other directory that cannot be
    /// subscribed (permissions, deleted since the walk) is skipped and its
    /// error returned for reporting.
    pub(super) fn attach_all(
        &mut self,
        watcher: &mut RecommendedWatcher,
    ) -> notify::Result<Vec<String>> {
        watcher.watch(&self.root, RecursiveMode::NonRecursive)?;
        self.attached.insert(self.root.clone());

        let mut skipped = Vec::new();
        for path in &self.desired {
            if self.attached.contains(path) {
                continue;
            }
            match watcher.watch(path, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    self.attached.insert(path.clone());
                }
                Err(e) => skipped.push(format!("{}: {}", path.display(), e)),
            }
        }

        crate::debug!("watch"; "attached {} of {} directories", self.attached.len(), self.desired.len());
        Ok(skipped)
    }

    pub(super) fn attached_count(&self) -> usize {
        self.attached.len()
    }
}
