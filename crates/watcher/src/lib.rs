//! File system watching for Keepsake
//!
//! This crate provides:
//! - The notify-backed watch source (recursive, create/modify only)
//! - Backup-tree exclusion via path containment
//! - The initial full-tree scan that seeds first versions
//! - Per-path debouncing so a burst of writes becomes one backup

pub mod debounce;
pub mod filter;
pub mod scan;
pub mod source;

use std::path::PathBuf;

pub use debounce::Debouncer;
pub use filter::EventFilter;
pub use scan::seed_existing;
pub use source::{SourceItem, WatchError, WatchSource};

/// File system event, normalized to a path relative to the watch root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// Changed file, relative to the watch root
    pub path: PathBuf,
    /// Type of change
    pub kind: EventKind,
}

/// Type of file system event that triggers a backup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// File created
    Create,
    /// File modified
    Modify,
}

impl EventKind {
    /// Tag used in log lines, matching the tool's visible output format
    pub fn tag(self) -> &'static str {
        match self {
            EventKind::Create => "created",
            EventKind::Modify => "modified",
        }
    }
}
