//! Human-readable and JSON rendering of command results.

use crate::commands::apply::DetectResult;
use crate::commands::store::{BackupRestore, CleanupResult, SnapshotRestore, VerifyResult};
use engine::backup::{BackupEntry, BackupStats, Integrity, ThemeSnapshot};
use engine::orchestrator::{ApplyReport, FileStatus};
use engine::palette::PaletteReport;
use engine::reload::ReloadOutcome;
use engine::rewriter::ChangeKind;
use serde::Serialize;
use std::io::{self, Write};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

fn reload_label(outcome: &ReloadOutcome) -> String {
    match outcome {
        ReloadOutcome::Reloaded => "reloaded".to_string(),
        ReloadOutcome::NotRunning => "not running".to_string(),
        ReloadOutcome::NotNeeded => "no reload needed".to_string(),
        ReloadOutcome::Skipped => "reload skipped".to_string(),
        ReloadOutcome::Failed(reason) => format!("reload failed: {reason}"),
    }
}

pub fn write_apply_report(
    out: &mut dyn Write,
    report: &ApplyReport,
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, report);
    }

    for warning in report.validation.warning_messages() {
        writeln!(out, "warning: {warning}")?;
    }
    if let Some(error) = &report.error {
        writeln!(out, "error: {error}")?;
        for message in report.validation.error_messages() {
            writeln!(out, "  - {message}")?;
        }
        return Ok(());
    }

    let verb = if report.preview { "would change" } else { "changed" };
    for applied in &report.applied {
        let reload = applied
            .reload
            .as_ref()
            .map(|outcome| format!(", {}", reload_label(outcome)))
            .unwrap_or_default();
        writeln!(
            out,
            "✓ {}: {} file(s) {verb}{reload}",
            applied.app, applied.files_modified
        )?;
        for file in &applied.files {
            match &file.status {
                FileStatus::Written | FileStatus::Previewed => {
                    writeln!(out, "    {}", file.path.display())?;
                    if report.preview {
                        for change in &file.changes {
                            let action = match change.kind {
                                ChangeKind::Replaced => "set",
                                ChangeKind::Inserted => "add",
                            };
                            writeln!(
                                out,
                                "      {action} [{}] {} = {}",
                                change.scope, change.key, change.new
                            )?;
                        }
                    }
                }
                FileStatus::Unchanged => {}
                status => {
                    if let Some(reason) = status.reason() {
                        writeln!(out, "    {} ({reason})", file.path.display())?;
                    }
                }
            }
            if let Some(degraded) = &file.degraded {
                writeln!(out, "      note: {degraded}")?;
            }
        }
    }
    for failed in &report.failed {
        writeln!(out, "✗ {}: {}", failed.app, failed.reason)?;
    }
    for skipped in &report.skipped {
        writeln!(out, "- {}: {}", skipped.app, skipped.reason)?;
    }
    if let Some(snapshot_id) = &report.snapshot_id {
        writeln!(out, "Snapshot: {snapshot_id}")?;
    }
    if report.preview {
        writeln!(out, "Preview only; no files were modified.")?;
    }
    Ok(())
}

pub fn write_detections(
    out: &mut dyn Write,
    results: &[DetectResult],
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, results);
    }

    for result in results {
        match result {
            DetectResult::Found(detection) => {
                let summary = &detection.summary;
                writeln!(
                    out,
                    "{}: {} file(s), {} writable, {} with colors{}{}",
                    detection.app,
                    summary.total_files,
                    summary.writable_files,
                    summary.files_with_colors,
                    if summary.modular { ", modular" } else { "" },
                    if detection.has_rewriter { "" } else { ", no rewriter" },
                )?;
                if !summary.instances.is_empty() {
                    writeln!(out, "    instances: {}", summary.instances.join(", "))?;
                }
                for target in detection.classification.targets() {
                    writeln!(out, "    target: {}", target.display())?;
                }
            }
            DetectResult::NotFound { app, reason } => writeln!(out, "{app}: {reason}")?,
        }
    }
    Ok(())
}

pub fn write_palette_report(
    out: &mut dyn Write,
    report: &PaletteReport,
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, report);
    }

    for message in report.error_messages() {
        writeln!(out, "error: {message}")?;
    }
    for message in report.warning_messages() {
        writeln!(out, "warning: {message}")?;
    }
    if report.is_valid() {
        writeln!(out, "Palette is valid")?;
    }
    Ok(())
}

fn write_snapshot_line(out: &mut dyn Write, snapshot: &ThemeSnapshot) -> io::Result<()> {
    let apps: Vec<String> = snapshot.applied.keys().map(|app| app.to_string()).collect();
    writeln!(
        out,
        "{}  {}  {} backup(s)  {}",
        snapshot.snapshot_id,
        snapshot.timestamp.with_timezone(&chrono::Local).format(TIME_FORMAT),
        snapshot.backup_ids.len(),
        apps.join(",")
    )
}

pub fn write_snapshots(
    out: &mut dyn Write,
    snapshots: &[ThemeSnapshot],
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, snapshots);
    }
    if snapshots.is_empty() {
        return writeln!(out, "No theme snapshots");
    }
    for snapshot in snapshots {
        write_snapshot_line(out, snapshot)?;
    }
    Ok(())
}

pub fn write_current_snapshot(
    out: &mut dyn Write,
    snapshot: Option<&ThemeSnapshot>,
    format: OutputFormat,
) -> io::Result<()> {
    match (format, snapshot) {
        (OutputFormat::Json, snapshot) => write_json(out, &snapshot),
        (OutputFormat::Text, Some(snapshot)) => write_snapshot_line(out, snapshot),
        (OutputFormat::Text, None) => writeln!(out, "No theme applied"),
    }
}

pub fn write_snapshot_restore(
    out: &mut dyn Write,
    restore: &SnapshotRestore,
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, restore);
    }
    writeln!(
        out,
        "Restored {} file(s) from {}",
        restore.restored, restore.snapshot_id
    )?;
    match &restore.current {
        Some(current) => writeln!(out, "Current theme: {current}"),
        None => writeln!(out, "No theme is current"),
    }
}

pub fn write_backups(
    out: &mut dyn Write,
    backups: &[BackupEntry],
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, backups);
    }
    if backups.is_empty() {
        return writeln!(out, "No backups");
    }
    for entry in backups {
        writeln!(
            out,
            "{}  {}  {}  {}",
            entry.backup_id,
            entry.timestamp.with_timezone(&chrono::Local).format(TIME_FORMAT),
            entry.original_path.display(),
            entry.reason
        )?;
    }
    Ok(())
}

pub fn write_backup_restore(
    out: &mut dyn Write,
    restore: &BackupRestore,
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, restore);
    }
    writeln!(
        out,
        "Restored {} to {}",
        restore.backup_id,
        restore.restored_to.display()
    )
}

pub fn write_verify_results(
    out: &mut dyn Write,
    results: &[VerifyResult],
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, results);
    }
    if results.is_empty() {
        return writeln!(out, "No backups");
    }
    for result in results {
        let status = match &result.integrity {
            Integrity::Intact => "ok".to_string(),
            Integrity::Missing => "missing".to_string(),
            Integrity::SizeMismatch { expected, actual } => {
                format!("size mismatch (expected {expected}, found {actual})")
            }
            Integrity::HashMismatch { .. } => "hash mismatch".to_string(),
        };
        writeln!(out, "{}: {status}", result.backup_id)?;
    }
    Ok(())
}

pub fn write_cleanup(
    out: &mut dyn Write,
    cleanup: &CleanupResult,
    format: OutputFormat,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, cleanup);
    }
    writeln!(
        out,
        "Removed {} backup(s) (keeping {} per app, {} days)",
        cleanup.removed, cleanup.keep_count, cleanup.keep_days
    )
}

pub fn write_stats(out: &mut dyn Write, stats: &BackupStats, format: OutputFormat) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, stats);
    }
    writeln!(out, "Backups:           {}", stats.total_backups)?;
    writeln!(out, "Total size:        {} MB", stats.total_size_mb)?;
    writeln!(out, "Apps with backups: {}", stats.apps_with_backups)?;
    writeln!(out, "Theme snapshots:   {}", stats.theme_snapshots)?;
    writeln!(out, "Directory:         {}", stats.backup_directory.display())
}
