//! Directory enumeration for watch subscriptions.
//!
//! Produces the set of directories below a root, skipping hidden
//! directories (leading `.`) together with their whole subtree.
//! Unreadable branches are dropped silently; the walk never aborts.

use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};
use rustc_hash::FxHashSet;

/// Directories subscribed for change notifications. Fixed for a run.
pub type WatchSet = FxHashSet<PathBuf>;

/// Collect `root` and every non-hidden directory reachable from it.
///
/// Membership is deterministic; iteration order of the returned set is not.
pub fn collect_watch_dirs(root: &Path) -> WatchSet {
    let mut dirs = WatchSet::default();
    dirs.insert(root.to_path_buf());

    let walker = WalkDir::new(root)
        .skip_hidden(true)
        .follow_links(false)
        .parallelism(Parallelism::Serial);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                crate::debug!("watch"; "skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_dir() {
            dirs.insert(entry.path());
        }
    }

    dirs
}

/// Sorted copy of a watch set, for stable display.
pub fn sorted(dirs: &WatchSet) -> Vec<PathBuf> {
    let mut list: Vec<_> = dirs.iter().cloned().collect();
    list.sort();
    list
}
