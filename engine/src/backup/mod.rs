//! Backup and theme snapshot store.
//!
//! Every file is copied here before it is rewritten. Copies live in one
//! directory next to `backup_metadata.json`, which records each copy's
//! origin, size and SHA-256 hash, plus the history of theme snapshots that
//! group the backups of one apply.
//!
//! The store is an explicit object: callers open it, pass it to the
//! orchestrator and every mutation is persisted immediately.

mod types;

pub use types::{
    BackupEntry, BackupMetadata, BackupStats, CleanupPolicy, Integrity, ThemeSnapshot,
};

use crate::apps::AppId;
use crate::common::errors::ThemeError;
use crate::palette::ColorPalette;
use crate::utils::fs::{atomic_write, file_sha256, sha256_hex};
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

pub const METADATA_FILE: &str = "backup_metadata.json";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Backup '{0}' does not exist")]
    UnknownBackup(String),
    #[error("Snapshot '{0}' does not exist")]
    UnknownSnapshot(String),
    #[error("Source file {} does not exist", .0.display())]
    SourceMissing(PathBuf),
    #[error("Backup copy {} is missing", .0.display())]
    CopyMissing(PathBuf),
    #[error("Restored content of {} does not match backup '{id}'", path.display())]
    VerificationFailed { id: String, path: PathBuf },
    #[error("Restored {restored} of {total} backups of snapshot '{id}'")]
    PartialRestore {
        id: String,
        restored: usize,
        total: usize,
    },
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Backup metadata is invalid: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl BackupError {
    fn io(path: &Path, source: io::Error) -> Self {
        BackupError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<BackupError> for ThemeError {
    fn from(error: BackupError) -> Self {
        ThemeError::Backup(error.to_string())
    }
}

/// Persistent backup store rooted at one directory.
#[derive(Debug)]
pub struct BackupStore {
    dir: PathBuf,
    metadata: BackupMetadata,
}

impl BackupStore {
    /// `~/.config/matyou/backups` for the given home directory.
    pub fn default_dir(home: &Path) -> PathBuf {
        home.join(".config/matyou/backups")
    }

    /// Open (and create if needed) the store in `dir`.
    ///
    /// Unreadable metadata is moved aside to `backup_metadata.json.corrupt`
    /// and the store starts empty.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, BackupError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| BackupError::io(&dir, e))?;

        let path = dir.join(METADATA_FILE);
        let metadata = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(metadata) => metadata,
                Err(e) => {
                    log::error!("Backup metadata {} is unreadable: {e}", path.display());
                    let aside = dir.join(format!("{METADATA_FILE}.corrupt"));
                    fs::rename(&path, &aside).map_err(|e| BackupError::io(&path, e))?;
                    BackupMetadata::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BackupMetadata::default(),
            Err(e) => return Err(BackupError::io(&path, e)),
        };

        log::debug!(
            "Opened backup store {} ({} backups, {} snapshots)",
            dir.display(),
            metadata.backups.len(),
            metadata.theme_history.len()
        );
        Ok(Self { dir, metadata })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn metadata(&self) -> &BackupMetadata {
        &self.metadata
    }

    fn save(&self) -> Result<(), BackupError> {
        let path = self.dir.join(METADATA_FILE);
        let json = serde_json::to_vec_pretty(&self.metadata)?;
        atomic_write(&path, &json).map_err(|e| BackupError::io(&path, e))
    }

    /// Copy `path` into the store.
    pub fn create_backup(
        &mut self,
        path: &Path,
        app: AppId,
        reason: &str,
    ) -> Result<BackupEntry, BackupError> {
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BackupError::SourceMissing(path.to_path_buf()));
            }
            Err(e) => return Err(BackupError::io(path, e)),
        };

        let timestamp = Utc::now();
        let short = Uuid::new_v4().simple().to_string();
        let backup_id = format!(
            "{app}_{}_{}",
            timestamp.format(TIMESTAMP_FORMAT),
            &short[..8]
        );
        let backup_path = self
            .dir
            .join(format!("{backup_id}.{}", app.spec().backup_suffix));

        fs::write(&backup_path, &content).map_err(|e| BackupError::io(&backup_path, e))?;

        let entry = BackupEntry {
            backup_id: backup_id.clone(),
            app,
            timestamp,
            original_path: path.to_path_buf(),
            backup_path,
            file_hash: sha256_hex(&content),
            file_size: content.len() as u64,
            reason: reason.to_string(),
        };
        self.metadata.backups.insert(backup_id.clone(), entry.clone());
        self.save()?;

        log::info!("Backed up {} as {backup_id}", path.display());
        Ok(entry)
    }

    /// Copy a backup back over its original file.
    ///
    /// With `backup_current`, the file's present content is backed up first
    /// (reason `pre_restore`). The restored file's hash must match the one
    /// recorded at backup time.
    pub fn restore_backup(
        &mut self,
        backup_id: &str,
        backup_current: bool,
    ) -> Result<PathBuf, BackupError> {
        let entry = self
            .metadata
            .backups
            .get(backup_id)
            .cloned()
            .ok_or_else(|| BackupError::UnknownBackup(backup_id.to_string()))?;

        if !entry.backup_path.is_file() {
            return Err(BackupError::CopyMissing(entry.backup_path));
        }

        if backup_current && entry.original_path.exists() {
            self.create_backup(&entry.original_path, entry.app, "pre_restore")?;
        }

        let content =
            fs::read(&entry.backup_path).map_err(|e| BackupError::io(&entry.backup_path, e))?;
        atomic_write(&entry.original_path, &content)
            .map_err(|e| BackupError::io(&entry.original_path, e))?;

        let restored = file_sha256(&entry.original_path)
            .map_err(|e| BackupError::io(&entry.original_path, e))?;
        if restored != entry.file_hash {
            return Err(BackupError::VerificationFailed {
                id: entry.backup_id,
                path: entry.original_path,
            });
        }

        log::info!(
            "Restored {} from {}",
            entry.original_path.display(),
            entry.backup_id
        );
        Ok(entry.original_path)
    }

    pub fn get(&self, backup_id: &str) -> Option<&BackupEntry> {
        self.metadata.backups.get(backup_id)
    }

    /// Backups, newest first, optionally for one app.
    pub fn list_backups(&self, app: Option<AppId>) -> Vec<&BackupEntry> {
        let mut entries: Vec<&BackupEntry> = self
            .metadata
            .backups
            .values()
            .filter(|entry| app.is_none_or(|app| entry.app == app))
            .collect();
        entries.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.backup_id.cmp(&a.backup_id))
        });
        entries
    }

    /// Apply `policy` per app. Returns how many backups were removed.
    pub fn cleanup(&mut self, policy: CleanupPolicy) -> Result<usize, BackupError> {
        self.cleanup_at(policy, Utc::now())
    }

    pub fn cleanup_at(
        &mut self,
        policy: CleanupPolicy,
        now: DateTime<Utc>,
    ) -> Result<usize, BackupError> {
        let cutoff = now - Duration::days(policy.keep_days);

        let mut per_app: BTreeMap<AppId, Vec<&BackupEntry>> = BTreeMap::new();
        for entry in self.metadata.backups.values() {
            per_app.entry(entry.app).or_default().push(entry);
        }

        let doomed: Vec<String> = per_app
            .into_values()
            .flat_map(|mut entries| {
                entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                entries
                    .into_iter()
                    .enumerate()
                    .filter(|(index, entry)| *index >= policy.keep_count || entry.timestamp < cutoff)
                    .map(|(_, entry)| entry.backup_id.clone())
                    .collect::<Vec<_>>()
            })
            .collect();

        for backup_id in &doomed {
            if let Some(entry) = self.metadata.backups.remove(backup_id) {
                match fs::remove_file(&entry.backup_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => log::warn!("Could not delete {}: {e}", entry.backup_path.display()),
                }
            }
        }

        if !doomed.is_empty() {
            self.save()?;
        }
        log::info!("Cleaned up {} old backup(s)", doomed.len());
        Ok(doomed.len())
    }

    /// Compare a backup copy with its recorded size and hash.
    pub fn verify(&self, backup_id: &str) -> Result<Integrity, BackupError> {
        let entry = self
            .get(backup_id)
            .ok_or_else(|| BackupError::UnknownBackup(backup_id.to_string()))?;

        let content = match fs::read(&entry.backup_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Integrity::Missing),
            Err(e) => return Err(BackupError::io(&entry.backup_path, e)),
        };

        let actual_size = content.len() as u64;
        if actual_size != entry.file_size {
            return Ok(Integrity::SizeMismatch {
                expected: entry.file_size,
                actual: actual_size,
            });
        }

        let actual_hash = sha256_hex(&content);
        if actual_hash != entry.file_hash {
            return Ok(Integrity::HashMismatch {
                expected: entry.file_hash.clone(),
                actual: actual_hash,
            });
        }
        Ok(Integrity::Intact)
    }

    pub fn stats(&self) -> BackupStats {
        let total_size_bytes: u64 = self.metadata.backups.values().map(|e| e.file_size).sum();
        let apps: BTreeSet<AppId> = self.metadata.backups.values().map(|e| e.app).collect();
        BackupStats {
            total_backups: self.metadata.backups.len(),
            total_size_bytes,
            total_size_mb: (total_size_bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0,
            apps_with_backups: apps.len(),
            backup_directory: self.dir.clone(),
            theme_snapshots: self.metadata.theme_history.len(),
        }
    }

    /// Record the backups of one apply as a theme snapshot and make it current.
    pub fn create_theme_snapshot(
        &mut self,
        theme_name: &str,
        palette: &ColorPalette,
        backup_ids: Vec<String>,
        applied: BTreeMap<AppId, Vec<PathBuf>>,
    ) -> Result<ThemeSnapshot, BackupError> {
        let timestamp = Utc::now();
        let base = format!("theme_{theme_name}_{}", timestamp.format(TIMESTAMP_FORMAT));
        let mut snapshot_id = base.clone();
        let mut n = 1;
        while self.snapshot(&snapshot_id).is_some() {
            n += 1;
            snapshot_id = format!("{base}_{n}");
        }

        let snapshot = ThemeSnapshot {
            snapshot_id,
            theme_name: theme_name.to_string(),
            timestamp,
            palette: palette.clone(),
            backup_ids,
            applied,
        };
        self.metadata.theme_history.push(snapshot.clone());
        self.metadata.current_theme = Some(snapshot.clone());
        self.save()?;

        log::info!("Created theme snapshot {}", snapshot.snapshot_id);
        Ok(snapshot)
    }

    pub fn snapshot(&self, snapshot_id: &str) -> Option<&ThemeSnapshot> {
        self.metadata
            .theme_history
            .iter()
            .find(|snapshot| snapshot.snapshot_id == snapshot_id)
    }

    /// Snapshots, newest first.
    pub fn list_snapshots(&self) -> Vec<&ThemeSnapshot> {
        let mut snapshots: Vec<&ThemeSnapshot> = self.metadata.theme_history.iter().collect();
        snapshots.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        snapshots
    }

    pub fn current_theme(&self) -> Option<&ThemeSnapshot> {
        self.metadata.current_theme.as_ref()
    }

    /// Roll every file of a snapshot back to its pre-apply content.
    ///
    /// The theme that was current before the snapshot becomes current again.
    /// Every backup is attempted; a partial rollback is reported as an error.
    pub fn restore_snapshot(&mut self, snapshot_id: &str) -> Result<usize, BackupError> {
        let position = self
            .metadata
            .theme_history
            .iter()
            .position(|snapshot| snapshot.snapshot_id == snapshot_id)
            .ok_or_else(|| BackupError::UnknownSnapshot(snapshot_id.to_string()))?;
        let backup_ids = self.metadata.theme_history[position].backup_ids.clone();

        let mut restored = 0;
        for backup_id in &backup_ids {
            match self.restore_backup(backup_id, true) {
                Ok(_) => restored += 1,
                Err(e) => log::error!("Snapshot {snapshot_id}: {e}"),
            }
        }

        if restored != backup_ids.len() {
            return Err(BackupError::PartialRestore {
                id: snapshot_id.to_string(),
                restored,
                total: backup_ids.len(),
            });
        }

        self.metadata.current_theme = position
            .checked_sub(1)
            .map(|previous| self.metadata.theme_history[previous].clone());
        self.save()?;
        Ok(restored)
    }
}
