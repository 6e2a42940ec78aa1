//! Backup-tree exclusion and path normalization
//!
//! The backup root must never observe itself: no event under it is
//! processed and no path under it is ever fed to the engine as a source.
//! Containment is checked component-wise with [`Path::starts_with`], not by
//! string prefix, so `backupdir-2` is not mistaken for a child of
//! `backupdir` and trailing separators don't matter.

use crate::{EventKind, WatchEvent};
use std::path::{Path, PathBuf};

/// Decides which absolute paths become watch events
#[derive(Debug, Clone)]
pub struct EventFilter {
    watch_root: PathBuf,
    backup_root: PathBuf,
}

impl EventFilter {
    /// Both roots must be absolute and canonical; the watch source hands us
    /// paths rooted at the canonical watch root.
    pub fn new(watch_root: PathBuf, backup_root: PathBuf) -> Self {
        Self {
            watch_root,
            backup_root,
        }
    }

    pub fn watch_root(&self) -> &Path {
        &self.watch_root
    }

    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// True if `path` falls inside the backup tree
    pub fn is_in_backup_tree(&self, path: &Path) -> bool {
        path.starts_with(&self.backup_root)
    }

    /// Normalize an absolute path into a watch-root-relative one.
    ///
    /// Returns `None` for paths inside the backup tree or outside the watch
    /// root entirely.
    pub fn relative(&self, path: &Path) -> Option<PathBuf> {
        if self.is_in_backup_tree(path) {
            return None;
        }
        path.strip_prefix(&self.watch_root)
            .ok()
            .map(Path::to_path_buf)
    }

    /// Normalize a raw notification into a watch event, if it qualifies
    pub fn event(&self, path: &Path, kind: EventKind) -> Option<WatchEvent> {
        self.relative(path).map(|path| WatchEvent { path, kind })
    }
}
