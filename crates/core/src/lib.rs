//! Backup engine for Keepsake
//!
//! This crate provides:
//! - Artifact naming (fixed-width timestamp tokens, lexical == chronological)
//! - The backup engine (mirrored copy + per-file version retention)
//! - Runtime configuration (keepsake.toml + defaults)

pub mod artifact;
pub mod config;
pub mod engine;

// Re-exports
pub use config::{Config, ResolvedConfig, BACKUP_DIR_NAME};
pub use engine::{clear_backups, BackupEngine};

/// Result type for engine operations
pub type Result<T> = anyhow::Result<T>;
