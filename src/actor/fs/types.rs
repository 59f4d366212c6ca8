use std::path::PathBuf;

use notify::EventKind;
use notify::event::{ModifyKind, RenameMode};

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Write,
    Create,
    Remove,
    Rename,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Create => "create",
            Self::Remove => "remove",
            Self::Rename => "rename",
        }
    }
}

/// One path-level change reported by the OS layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Flatten a notify event into per-path changes.
    ///
    /// Mapping:
    /// - data / unspecified modification → `Write`
    /// - creation, or a file renamed *into* place → `Create`
    /// - removal → `Remove`
    /// - a file renamed away → `Rename`
    /// - metadata-only and access events are dropped (mtime/chmod noise)
    pub fn from_notify(event: &notify::Event) -> Vec<Self> {
        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Create,
            EventKind::Remove(_) => ChangeKind::Remove,
            EventKind::Modify(ModifyKind::Metadata(_)) => return Vec::new(),
            EventKind::Modify(ModifyKind::Name(mode)) => return Self::from_rename(mode, event),
            EventKind::Modify(_) => ChangeKind::Write,
            EventKind::Access(_) | EventKind::Any | EventKind::Other => return Vec::new(),
        };

        event
            .paths
            .iter()
            .map(|path| Self::new(path.clone(), kind))
            .collect()
    }

    /// Editors that save atomically rename a temp file over the source, so
    /// the destination side of a rename counts as a creation.
    fn from_rename(mode: RenameMode, event: &notify::Event) -> Vec<Self> {
        match mode {
            RenameMode::To => event
                .paths
                .iter()
                .map(|path| Self::new(path.clone(), ChangeKind::Create))
                .collect(),
            // paths = [from, to]
            RenameMode::Both => event
                .paths
                .iter()
                .enumerate()
                .map(|(i, path)| {
                    let kind = if i == 0 {
                        ChangeKind::Rename
                    } else {
                        ChangeKind::Create
                    };
                    Self::new(path.clone(), kind)
                })
                .collect(),
            RenameMode::From | RenameMode::Any | RenameMode::Other => event
                .paths
                .iter()
                .map(|path| Self::new(path.clone(), ChangeKind::Rename))
                .collect(),
        }
    }
}
