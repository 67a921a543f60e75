use crate::apps::AppId;
use crate::classifier::FileRole;
use crate::palette::{ColorPalette, PaletteReport};
use crate::reload::ReloadOutcome;
use crate::rewriter::SettingChange;
use serde::Serialize;
use std::path::PathBuf;

/// What happened to one target file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum FileStatus {
    /// New content was written after a backup.
    Written,
    /// Preview only; the file was not touched.
    Previewed,
    /// The file already carried the palette.
    Unchanged,
    /// The file could not be considered, e.g. not writable.
    Skipped(String),
    Failed(String),
}

impl FileStatus {
    /// Whether the file counts towards a themed app.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            FileStatus::Written | FileStatus::Previewed | FileStatus::Unchanged
        )
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            FileStatus::Skipped(reason) | FileStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub role: FileRole,
    pub status: FileStatus,
    pub changes: Vec<SettingChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_id: Option<String>,
    /// Set when block structure was not recognized and a flat rewrite was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

impl FileOutcome {
    pub(super) fn new(path: PathBuf, role: FileRole, status: FileStatus) -> Self {
        Self {
            path,
            role,
            status,
            changes: Vec::new(),
            backup_id: None,
            degraded: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedApp {
    pub app: AppId,
    /// Files whose content changed (or would change, in preview).
    pub files_modified: usize,
    pub modular: bool,
    pub instances: Vec<String>,
    pub files: Vec<FileOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reload: Option<ReloadOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedApp {
    pub app: AppId,
    pub reason: String,
    pub files: Vec<FileOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedApp {
    pub app: AppId,
    pub reason: String,
}

/// Result of one apply or preview run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyReport {
    pub success: bool,
    pub preview: bool,
    pub theme_name: Option<String>,
    pub palette: ColorPalette,
    pub validation: PaletteReport,
    pub applied: Vec<AppliedApp>,
    pub failed: Vec<FailedApp>,
    pub skipped: Vec<SkippedApp>,
    pub snapshot_id: Option<String>,
    /// Run-level failure that stopped processing before any app.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApplyReport {
    pub(super) fn new(
        palette: &ColorPalette,
        validation: PaletteReport,
        preview: bool,
        theme_name: Option<String>,
    ) -> Self {
        Self {
            success: false,
            preview,
            theme_name,
            palette: palette.clone(),
            validation,
            applied: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
            snapshot_id: None,
            error: None,
        }
    }

    pub fn applied_app(&self, app: AppId) -> Option<&AppliedApp> {
        self.applied.iter().find(|applied| applied.app == app)
    }

    pub fn failed_app(&self, app: AppId) -> Option<&FailedApp> {
        self.failed.iter().find(|failed| failed.app == app)
    }

    pub fn skipped_app(&self, app: AppId) -> Option<&SkippedApp> {
        self.skipped.iter().find(|skipped| skipped.app == app)
    }
}
