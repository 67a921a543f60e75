use super::Context;
use crate::error::{AppError, AppResult};
use engine::apps::AppId;
use engine::backup::{BackupEntry, BackupStats, CleanupPolicy, Integrity, ThemeSnapshot};
use serde::Serialize;
use std::path::PathBuf;

pub fn list_snapshots(ctx: &Context) -> AppResult<Vec<ThemeSnapshot>> {
    let store = ctx.open_store()?;
    Ok(store.list_snapshots().into_iter().cloned().collect())
}

pub fn current_snapshot(ctx: &Context) -> AppResult<Option<ThemeSnapshot>> {
    let store = ctx.open_store()?;
    Ok(store.current_theme().cloned())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotRestore {
    pub snapshot_id: String,
    pub restored: usize,
    /// Theme current after the rollback.
    pub current: Option<String>,
}

pub fn restore_snapshot(ctx: &Context, snapshot_id: &str) -> AppResult<SnapshotRestore> {
    let mut store = ctx.open_store()?;
    let restored = store.restore_snapshot(snapshot_id)?;
    Ok(SnapshotRestore {
        snapshot_id: snapshot_id.to_string(),
        restored,
        current: store
            .current_theme()
            .map(|snapshot| snapshot.snapshot_id.clone()),
    })
}

pub fn list_backups(ctx: &Context, app: Option<AppId>) -> AppResult<Vec<BackupEntry>> {
    let store = ctx.open_store()?;
    Ok(store.list_backups(app).into_iter().cloned().collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupRestore {
    pub backup_id: String,
    pub restored_to: PathBuf,
}

pub fn restore_backup(
    ctx: &Context,
    backup_id: &str,
    backup_current: bool,
) -> AppResult<BackupRestore> {
    let mut store = ctx.open_store()?;
    let restored_to = store.restore_backup(backup_id, backup_current)?;
    Ok(BackupRestore {
        backup_id: backup_id.to_string(),
        restored_to,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyResult {
    pub backup_id: String,
    pub integrity: Integrity,
}

/// Check one backup, or every backup when `backup_id` is `None`.
pub fn verify_backups(ctx: &Context, backup_id: Option<&str>) -> AppResult<Vec<VerifyResult>> {
    let store = ctx.open_store()?;
    let ids: Vec<String> = match backup_id {
        Some(id) => vec![id.to_string()],
        None => store
            .list_backups(None)
            .into_iter()
            .map(|entry| entry.backup_id.clone())
            .collect(),
    };

    ids.into_iter()
        .map(|id| -> AppResult<VerifyResult> {
            let integrity = store.verify(&id)?;
            Ok(VerifyResult {
                backup_id: id,
                integrity,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupResult {
    pub removed: usize,
    pub keep_count: usize,
    pub keep_days: i64,
}

/// Apply retention; command-line values override `[backup]` settings.
pub fn cleanup_backups(
    ctx: &Context,
    keep_count: Option<usize>,
    keep_days: Option<i64>,
) -> AppResult<CleanupResult> {
    let configured = ctx.config().backup().cleanup_policy();
    let policy = CleanupPolicy {
        keep_count: keep_count.unwrap_or(configured.keep_count),
        keep_days: keep_days.unwrap_or(configured.keep_days),
    };
    if policy.keep_count == 0 {
        return Err(AppError::Input("--keep-count must be at least 1".into()));
    }
    if policy.keep_days < 0 {
        return Err(AppError::Input("--keep-days cannot be negative".into()));
    }

    let mut store = ctx.open_store()?;
    let removed = store.cleanup(policy)?;
    Ok(CleanupResult {
        removed,
        keep_count: policy.keep_count,
        keep_days: policy.keep_days,
    })
}

pub fn backup_stats(ctx: &Context) -> AppResult<BackupStats> {
    let store = ctx.open_store()?;
    Ok(store.stats())
}
