//! Per-path debouncing of change events
//!
//! Editors and build tools write a file many times in quick succession; one
//! backup per settle period is enough. Each relative path owns at most one
//! pending timer. A new event for the path aborts the old timer and starts a
//! fresh one, so the backup fires once the burst has been quiet for the
//! settle duration, timed from the last event.
//!
//! Cancellation is best-effort: a timer that has already passed its sleep
//! when aborted may still complete its backup. The worst case is one extra
//! version of a file that really did change, which retention trims like any
//! other.

use dashmap::DashMap;
use keepsake_core::BackupEngine;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

/// Schedules one deferred backup per changed path
pub struct Debouncer {
    engine: Arc<BackupEngine>,
    settle: Duration,
    /// The sole shared mutable state: relative path -> pending timer
    pending: Arc<DashMap<PathBuf, JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(engine: Arc<BackupEngine>, settle: Duration) -> Self {
        Self {
            engine,
            settle,
            pending: Arc::new(DashMap::new()),
        }
    }

    /// (Re)schedule the backup for `path`, replacing any pending timer.
    ///
    /// Never blocks beyond the map insert and the task spawn; the copy work
    /// happens on the timer's own task after the settle duration.
    pub fn on_event(&self, path: PathBuf) {
        let engine = Arc::clone(&self.engine);
        let pending = Arc::clone(&self.pending);
        let settle = self.settle;
        let key = path.clone();

        let timer = tokio::spawn(async move {
            tokio::time::sleep(settle).await;
            // Retire the map entry before the copy so a new event during the
            // copy schedules a fresh backup instead of being swallowed
            pending.remove(&key);
            if let Err(err) = engine.backup(&key) {
                warn!("backup of {} failed: {:#}", key.display(), err);
            }
        });

        if let Some(previous) = self.pending.insert(path, timer) {
            // No-op if the old timer already fired or is mid-fire
            previous.abort();
        }
    }

    /// Number of paths with a backup currently scheduled
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
