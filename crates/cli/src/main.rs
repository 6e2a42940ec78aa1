//! Keepsake CLI - keepsake command

use anyhow::Result;
use clap::Parser;
use keepsake_core::config::{Config, CONFIG_FILE_NAME};
use std::path::PathBuf;

mod cmd;

/// Keepsake - timestamped copies of every file change
#[derive(Parser)]
#[command(name = "keepsake")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to watch (default: current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Backup directory path; a __keepsake__ subdir is created inside it
    /// (default: current directory)
    #[arg(short, long)]
    backup: Option<PathBuf>,

    /// Max file versions to retain, oldest deleted first (0 = unlimited)
    #[arg(short, long)]
    versions: Option<usize>,

    /// Settle duration in milliseconds before a changed file is backed up
    #[arg(short, long)]
    settle: Option<u64>,

    /// Delete the entire backup tree and exit
    #[arg(short, long)]
    clear: bool,

    /// Config file (default: keepsake.toml in the current directory,
    /// if present)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// File values first, flags on top
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(&PathBuf::from(CONFIG_FILE_NAME))?,
        };

        if let Some(path) = self.path {
            config.watch_root = path;
        }
        if let Some(backup) = self.backup {
            config.backup_root = backup;
        }
        if let Some(versions) = self.versions {
            config.max_versions = versions;
        }
        if let Some(settle) = self.settle {
            config.settle_ms = settle;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let clear = cli.clear;
    let resolved = cli.into_config()?.resolve()?;

    if clear {
        cmd::clear::run(resolved)
    } else {
        cmd::watch::run(resolved).await
    }
}
