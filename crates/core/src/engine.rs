//! The backup engine
//!
//! Given a path relative to the watch root, mirrors its parent directory
//! under the backup root, copies the file's current bytes to a
//! timestamp-named artifact, and enforces the per-file version cap.
//!
//! The engine is synchronous and stateless between calls; the only state it
//! reads is the destination directory's current contents during retention.

use crate::artifact;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

/// Copies changed files into the backup tree and trims old versions.
pub struct BackupEngine {
    /// Root of the tree under observation (absolute)
    watch_root: PathBuf,
    /// Root of the backup tree (absolute, never watched)
    backup_root: PathBuf,
    /// Maximum retained versions per file; 0 means unlimited
    max_versions: usize,
}

impl BackupEngine {
    pub fn new(watch_root: PathBuf, backup_root: PathBuf, max_versions: usize) -> Self {
        Self {
            watch_root,
            backup_root,
            max_versions,
        }
    }

    pub fn watch_root(&self) -> &Path {
        &self.watch_root
    }

    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// Back up one file, identified by its path relative to the watch root.
    ///
    /// Reads the source's bytes at invocation time; a file that vanished
    /// between event and invocation surfaces as an error for the caller to
    /// log. Returns the path of the artifact that was written.
    pub fn backup(&self, relative: &Path) -> Result<PathBuf> {
        let filename = relative
            .file_name()
            .with_context(|| format!("path has no filename: {}", relative.display()))?
            .to_str()
            .with_context(|| format!("non-UTF-8 filename: {}", relative.display()))?
            .to_owned();
        let parent = relative.parent().unwrap_or_else(|| Path::new(""));

        let backup_parent = self.backup_root.join(parent);
        // Idempotent; concurrent creation of the same directory is not an error
        fs::create_dir_all(&backup_parent).with_context(|| {
            format!(
                "failed to create backup directory {}",
                backup_parent.display()
            )
        })?;

        let token = artifact::timestamp_token(SystemTime::now());
        let artifact_path = backup_parent.join(artifact::artifact_name(&token, &filename));
        let source = self.watch_root.join(relative);

        info!("(backup) {}", source.display());
        fs::copy(&source, &artifact_path).with_context(|| {
            format!(
                "failed to copy {} to {}",
                source.display(),
                artifact_path.display()
            )
        })?;

        if self.max_versions > 0 {
            self.enforce_retention(&backup_parent, &filename);
        }

        Ok(artifact_path)
    }

    /// Delete the oldest versions of `filename` in `dir` beyond the cap.
    ///
    /// Failures here never undo the backup that just completed: every
    /// problem is logged and the remaining deletions are still attempted.
    fn enforce_retention(&self, dir: &Path, filename: &str) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("failed to list {} for retention: {}", dir.display(), err);
                return;
            }
        };

        let mut versions: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| artifact::original_name(name) == Some(filename))
            .collect();

        if versions.len() <= self.max_versions {
            return;
        }

        // Fixed-width tokens: lexically smallest == oldest
        versions.sort_unstable();
        let excess = versions.len() - self.max_versions;

        for name in &versions[..excess] {
            let path = dir.join(name);
            info!("(remove version) {}", path.display());
            if let Err(err) = fs::remove_file(&path) {
                warn!("failed to remove old version {}: {}", path.display(), err);
            }
        }
    }
}

/// Recursively delete the entire backup tree.
///
/// Used by the clear mode; an absent backup root is already clear.
pub fn clear_backups(backup_root: &Path) -> Result<bool> {
    if !backup_root.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(backup_root)
        .with_context(|| format!("failed to remove backup root {}", backup_root.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    fn engine(temp: &TempDir, max_versions: usize) -> BackupEngine {
        let watch_root = temp.path().join("src");
        let backup_root = temp.path().join("backup");
        fs::create_dir_all(&watch_root).unwrap();
        BackupEngine::new(watch_root, backup_root, max_versions)
    }

    /// Artifact forged with an old token, as if written long ago
    fn forge_version(dir: &Path, ms: u64, filename: &str) -> PathBuf {
        let token = artifact::timestamp_token(UNIX_EPOCH + Duration::from_millis(ms));
        let path = dir.join(artifact::artifact_name(&token, filename));
        fs::create_dir_all(dir).unwrap();
        fs::write(&path, b"old").unwrap();
        path
    }

    #[test]
    fn test_backup_copies_bytes_into_mirrored_tree() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp, 0);

        let rel = Path::new("docs/notes.txt");
        fs::create_dir_all(engine.watch_root().join("docs")).unwrap();
        fs::write(engine.watch_root().join(rel), b"hello").unwrap();

        let artifact_path = engine.backup(rel).unwrap();

        assert_eq!(artifact_path.parent().unwrap(), engine.backup_root().join("docs"));
        assert_eq!(fs::read(&artifact_path).unwrap(), b"hello");

        let name = artifact_path.file_name().unwrap().to_str().unwrap();
        assert_eq!(artifact::original_name(name), Some("notes.txt"));
    }

    #[test]
    fn test_backup_of_top_level_file() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp, 0);

        fs::write(engine.watch_root().join("a.txt"), b"x").unwrap();
        let artifact_path = engine.backup(Path::new("a.txt")).unwrap();
        assert_eq!(artifact_path.parent().unwrap(), engine.backup_root());
    }

    #[test]
    fn test_vanished_source_is_an_error() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp, 0);

        let err = engine.backup(Path::new("ghost.txt")).unwrap_err();
        assert!(err.to_string().contains("failed to copy"));
    }

    #[test]
    fn test_retention_keeps_most_recent_versions() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp, 2);

        forge_version(engine.backup_root(), 1, "notes.txt");
        forge_version(engine.backup_root(), 2, "notes.txt");
        forge_version(engine.backup_root(), 3, "notes.txt");

        fs::write(engine.watch_root().join("notes.txt"), b"new").unwrap();
        let newest = engine.backup(Path::new("notes.txt")).unwrap();

        let mut remaining: Vec<String> = fs::read_dir(engine.backup_root())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        remaining.sort_unstable();

        // 4 versions existed after the copy; the 2 oldest are gone
        assert_eq!(remaining.len(), 2);
        assert!(remaining[0].starts_with(&artifact::timestamp_token(
            UNIX_EPOCH + Duration::from_millis(3)
        )));
        assert_eq!(
            remaining[1],
            newest.file_name().unwrap().to_str().unwrap()
        );
    }

    #[test]
    fn test_retention_matches_filenames_exactly() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp, 1);

        // Same directory, different logical files: none of these count
        // toward notes.txt's version chain
        forge_version(engine.backup_root(), 1, "notes.txt.bak");
        forge_version(engine.backup_root(), 2, "other.txt");
        fs::write(engine.backup_root().join("stray.txt"), b"not an artifact").unwrap();

        fs::write(engine.watch_root().join("notes.txt"), b"v1").unwrap();
        engine.backup(Path::new("notes.txt")).unwrap();

        let names: Vec<String> = fs::read_dir(engine.backup_root())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();

        // Nothing was deleted: one notes.txt version is within the cap and
        // the unrelated entries are not its versions
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_unlimited_when_max_versions_is_zero() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp, 0);

        for ms in 1..=5 {
            forge_version(engine.backup_root(), ms, "notes.txt");
        }
        fs::write(engine.watch_root().join("notes.txt"), b"v").unwrap();
        engine.backup(Path::new("notes.txt")).unwrap();

        assert_eq!(fs::read_dir(engine.backup_root()).unwrap().count(), 6);
    }

    #[test]
    fn test_clear_backups() {
        let temp = TempDir::new().unwrap();
        let backup_root = temp.path().join("backup");

        assert!(!clear_backups(&backup_root).unwrap());

        forge_version(&backup_root.join("docs"), 1, "notes.txt");
        assert!(clear_backups(&backup_root).unwrap());
        assert!(!backup_root.exists());
    }
}
