//! Notify-backed watch source
//!
//! Wraps a recursive [`notify::RecommendedWatcher`] and turns its raw
//! notifications into normalized [`WatchEvent`]s on a channel. The notify
//! callback runs on the backend's own thread; it only filters and sends,
//! never blocks.

use crate::{EventFilter, EventKind, WatchEvent};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;

/// Watch source failures that surface at the top level
#[derive(Debug, Error)]
pub enum WatchError {
    /// The underlying backend reported a fatal condition
    /// (e.g. the watched root disappeared)
    #[error("watch backend error: {0}")]
    Backend(#[from] notify::Error),

    /// The event stream ended; the watcher is gone
    #[error("watch event stream closed")]
    StreamClosed,
}

/// Items delivered to the watch loop
pub type SourceItem = Result<WatchEvent, WatchError>;

/// Owns the OS watcher; dropping it stops observation
pub struct WatchSource {
    _watcher: RecommendedWatcher,
}

impl WatchSource {
    /// Start recursive observation of the filter's watch root.
    ///
    /// Returns the source handle and the receiving end of the normalized
    /// event stream. Events for directories, for paths under the backup
    /// tree, and for kinds other than create/modify never reach the
    /// channel.
    pub fn start(filter: EventFilter) -> Result<(Self, mpsc::UnboundedReceiver<SourceItem>), WatchError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let root = filter.watch_root().to_path_buf();

        let mut watcher = RecommendedWatcher::new(
            move |result: notify::Result<notify::Event>| match result {
                Ok(event) => {
                    let Some(kind) = map_kind(&event.kind) else {
                        return;
                    };
                    for path in &event.paths {
                        // Only regular files are backed up; a path that
                        // vanished before this check falls through and the
                        // engine logs the failed copy
                        if path.is_dir() {
                            continue;
                        }
                        if let Some(event) = filter.event(path, kind) {
                            // Send failure means the loop is gone; nothing
                            // left to notify
                            let _ = tx.send(Ok(event));
                        }
                    }
                }
                Err(err) => {
                    let _ = tx.send(Err(WatchError::Backend(err)));
                }
            },
            notify::Config::default(),
        )?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((Self { _watcher: watcher }, rx))
    }
}

/// Map a raw notify kind onto the two kinds that trigger backups
fn map_kind(kind: &notify::EventKind) -> Option<EventKind> {
    match kind {
        notify::EventKind::Create(_) => Some(EventKind::Create),
        notify::EventKind::Modify(_) => Some(EventKind::Modify),
        _ => None,
    }
}
