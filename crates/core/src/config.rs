//! Runtime configuration
//!
//! Values come from an optional `keepsake.toml` with per-field defaults;
//! the CLI overlays its flags on top before resolving. Resolution turns the
//! raw values into absolute roots and appends the fixed backup
//! subdirectory name.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the subdirectory appended to the backup base path.
///
/// Deliberately loud so the backup tree never collides with user files.
pub const BACKUP_DIR_NAME: &str = "__keepsake__";

/// Default config file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "keepsake.toml";

/// Raw configuration values, as read from file or flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory tree to watch (default: current directory)
    #[serde(default = "default_root")]
    pub watch_root: PathBuf,

    /// Directory that receives the backup tree; `__keepsake__` is appended
    /// (default: current directory)
    #[serde(default = "default_root")]
    pub backup_root: PathBuf,

    /// Maximum retained versions per file; 0 = unlimited (default: 0)
    #[serde(default)]
    pub max_versions: usize,

    /// Settle duration in milliseconds before a changed file is backed up
    /// (default: 1000)
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_root: default_root(),
            backup_root: default_root(),
            max_versions: 0,
            settle_ms: default_settle_ms(),
        }
    }
}

impl Config {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Parse a config file, falling back to defaults when it doesn't exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Turn raw values into absolute, validated paths.
    ///
    /// The watch root must exist. The backup base must exist too (it
    /// defaults to the current directory); the `__keepsake__` subdirectory
    /// under it is created later, on demand.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let watch_root = fs::canonicalize(&self.watch_root).with_context(|| {
            format!("watch path {} does not exist", self.watch_root.display())
        })?;
        let backup_base = fs::canonicalize(&self.backup_root).with_context(|| {
            format!("backup path {} does not exist", self.backup_root.display())
        })?;

        Ok(ResolvedConfig {
            watch_root,
            backup_root: backup_base.join(BACKUP_DIR_NAME),
            max_versions: self.max_versions,
            settle: Duration::from_millis(self.settle_ms),
        })
    }
}

/// Absolute, validated configuration a run operates on
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub watch_root: PathBuf,
    pub backup_root: PathBuf,
    pub max_versions: usize,
    pub settle: Duration,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_settle_ms() -> u64 {
    1000
}
