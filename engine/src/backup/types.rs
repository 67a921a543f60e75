use crate::apps::AppId;
use crate::palette::ColorPalette;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One backed-up copy of a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupEntry {
    pub backup_id: String,
    pub app: AppId,
    pub timestamp: DateTime<Utc>,
    pub original_path: PathBuf,
    pub backup_path: PathBuf,
    /// SHA-256 of the content at backup time.
    pub file_hash: String,
    pub file_size: u64,
    pub reason: String,
}

/// Backups taken by one apply, restorable together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSnapshot {
    pub snapshot_id: String,
    pub theme_name: String,
    pub timestamp: DateTime<Utc>,
    pub palette: ColorPalette,
    pub backup_ids: Vec<String>,
    #[serde(default)]
    pub applied: BTreeMap<AppId, Vec<PathBuf>>,
}

/// Contents of `backup_metadata.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupMetadata {
    pub backups: BTreeMap<String, BackupEntry>,
    pub current_theme: Option<ThemeSnapshot>,
    pub theme_history: Vec<ThemeSnapshot>,
}

/// Retention rules applied per application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupPolicy {
    /// At most this many of the newest backups are kept per app.
    pub keep_count: usize,
    /// Backups older than this are removed.
    pub keep_days: i64,
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        Self {
            keep_count: 10,
            keep_days: 30,
        }
    }
}

/// Result of checking a backup copy against its recorded size and hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Integrity {
    Intact,
    Missing,
    SizeMismatch { expected: u64, actual: u64 },
    HashMismatch { expected: String, actual: String },
}

impl Integrity {
    pub fn is_intact(&self) -> bool {
        matches!(self, Integrity::Intact)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupStats {
    pub total_backups: usize,
    pub total_size_bytes: u64,
    pub total_size_mb: f64,
    pub apps_with_backups: usize,
    pub backup_directory: PathBuf,
    pub theme_snapshots: usize,
}
