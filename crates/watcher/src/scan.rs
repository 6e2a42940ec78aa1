//! Initial full-tree scan
//!
//! At startup every existing regular file gets one version captured
//! immediately, straight through the engine with no settle period. The scan
//! is synchronous and runs to completion before live event delivery begins.

use crate::EventFilter;
use keepsake_core::BackupEngine;
use tracing::warn;
use walkdir::WalkDir;

/// Seed a first version for every file under the watch root.
///
/// Symbolic links are not followed and the backup tree is pruned from the
/// walk. Per-file failures are logged and skipped; the scan always finishes.
/// Returns the number of files seeded.
pub fn seed_existing(engine: &BackupEngine, filter: &EventFilter) -> usize {
    let mut seeded = 0;

    let walk = WalkDir::new(filter.watch_root())
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !filter.is_in_backup_tree(entry.path()));

    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("initial scan: unreadable entry: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(relative) = filter.relative(entry.path()) else {
            continue;
        };

        match engine.backup(&relative) {
            Ok(_) => seeded += 1,
            Err(err) => warn!(
                "initial scan: backup of {} failed: {:#}",
                relative.display(),
                err
            ),
        }
    }

    seeded
}
