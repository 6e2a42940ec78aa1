//! Watch a directory tree and back up every change

use anyhow::{Context, Result};
use keepsake_core::{BackupEngine, ResolvedConfig};
use keepsake_watcher::{scan, Debouncer, EventFilter, WatchError, WatchSource};
use owo_colors::OwoColorize;
use std::fs;
use std::sync::Arc;
use tracing::{error, info};

pub async fn run(config: ResolvedConfig) -> Result<()> {
    // 1. The backup tree must exist before anything can land in it
    fs::create_dir_all(&config.backup_root).with_context(|| {
        format!(
            "failed to create backup root {}",
            config.backup_root.display()
        )
    })?;

    let engine = Arc::new(BackupEngine::new(
        config.watch_root.clone(),
        config.backup_root.clone(),
        config.max_versions,
    ));
    let filter = EventFilter::new(config.watch_root.clone(), config.backup_root.clone());

    // 2. Seed a first version for everything that already exists; this
    //    completes before live delivery starts
    let seeded = scan::seed_existing(&engine, &filter);
    info!("initial scan complete: {} files seeded", seeded);

    // 3. Live observation
    let (_source, mut events) = WatchSource::start(filter)?;
    let debouncer = Debouncer::new(engine, config.settle);

    println!(
        "{} {}",
        "Watching".bold(),
        config.watch_root.display()
    );
    println!(
        "{} {}",
        "Backups:".dimmed(),
        config.backup_root.display()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, stopping watch");
                break;
            }
            item = events.recv() => match item {
                Some(Ok(event)) => {
                    info!("({}) {}", event.kind.tag(), config.watch_root.join(&event.path).display());
                    debouncer.on_event(event.path);
                }
                Some(Err(err)) => {
                    error!("watch source failed: {:#}", err);
                    return Err(err.into());
                }
                None => {
                    error!("watch source stopped delivering events");
                    return Err(WatchError::StreamClosed.into());
                }
            }
        }
    }

    // Pending timers either finish on the runtime or are abandoned with it;
    // a partial copy at shutdown is an accepted crash-consistency limit
    Ok(())
}
