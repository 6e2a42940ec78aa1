//! Delete the entire backup tree

use anyhow::Result;
use keepsake_core::{clear_backups, ResolvedConfig};
use owo_colors::OwoColorize;

/// Clear mode: remove the backup root and exit without starting any watch
pub fn run(config: ResolvedConfig) -> Result<()> {
    if clear_backups(&config.backup_root)? {
        println!(
            "{} {}",
            "Removed backup tree".green(),
            config.backup_root.display()
        );
    } else {
        println!(
            "{} {}",
            "No backup tree at".dimmed(),
            config.backup_root.display()
        );
    }
    Ok(())
}
