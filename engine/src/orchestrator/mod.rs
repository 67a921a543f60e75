//! Sequencing of one theme change.
//!
//! [`ThemeApplicator::apply_theme`] validates the palette, then for every
//! requested application runs Detect → Classify → Backup → Rewrite (or
//! Preview) → Reload and folds every outcome into an [`ApplyReport`].
//! Applications are processed one after another; a failure in one of them
//! never stops the others.

mod report;

pub use report::{AppliedApp, ApplyReport, FailedApp, FileOutcome, FileStatus, SkippedApp};

use crate::apps::AppId;
use crate::backup::BackupStore;
use crate::classifier::{Classification, Classifier, Fallback};
use crate::common::errors::ThemeError;
use crate::generator::{Generated, PatchGenerator, UnavailableGenerator};
use crate::locator::{ConfigFile, ConfigSet, ConfigSummary, LocateError, Locator};
use crate::palette::{ColorPalette, PaletteValidator, ValidationMode};
use crate::reload::{CommandReloader, ReloadOutcome, Reloader};
use crate::rewriter::{ThemeRewriter, rewriter_for};
use crate::utils::fs::atomic_write;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Theme name used for snapshots when the caller gives none.
pub const DEFAULT_THEME_NAME: &str = "custom";

/// Parameters of one run.
#[derive(Debug, Clone, Default)]
pub struct ApplyRequest {
    /// Apps to theme; `None` means every supported app.
    pub apps: Option<Vec<AppId>>,
    pub preview: bool,
    pub theme_name: Option<String>,
    pub validation: ValidationMode,
}

impl ApplyRequest {
    pub fn preview() -> Self {
        Self {
            preview: true,
            ..Self::default()
        }
    }

    pub fn for_apps(mut self, apps: Vec<AppId>) -> Self {
        self.apps = Some(apps);
        self
    }

    pub fn named(mut self, theme_name: impl Into<String>) -> Self {
        self.theme_name = Some(theme_name.into());
        self
    }

    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }
}

/// What `detect` found for one app.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub app: AppId,
    pub has_rewriter: bool,
    pub summary: ConfigSummary,
    pub classification: Classification,
    pub files: Vec<PathBuf>,
}

impl Detection {
    /// Locate and classify `app`; needs no backup store.
    pub fn probe(locator: &Locator, classifier: Classifier, app: AppId) -> Result<Self, LocateError> {
        let mut set = locator.locate(app)?;
        let classification = classifier.classify_in_place(&mut set);
        Ok(Detection {
            app,
            has_rewriter: rewriter_for(app).is_some(),
            summary: set.summary(),
            files: set.files.iter().map(|file| file.path.clone()).collect(),
            classification,
        })
    }
}

/// Per-app result before it is sorted into the report.
enum AppResult {
    Applied(AppliedApp),
    Failed(FailedApp),
}

/// Runs theme changes against the configuration under one home directory.
pub struct ThemeApplicator<'s> {
    locator: Locator,
    classifier: Classifier,
    store: &'s mut BackupStore,
    reloader: Box<dyn Reloader>,
    generator: Box<dyn PatchGenerator>,
}

impl<'s> ThemeApplicator<'s> {
    pub fn new(locator: Locator, store: &'s mut BackupStore) -> Self {
        Self {
            locator,
            classifier: Classifier::default(),
            store,
            reloader: Box::new(CommandReloader::default()),
            generator: Box::new(UnavailableGenerator),
        }
    }

    pub fn with_reloader(mut self, reloader: impl Reloader + 'static) -> Self {
        self.reloader = Box::new(reloader);
        self
    }

    pub fn with_generator(mut self, generator: impl PatchGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn store(&self) -> &BackupStore {
        self.store
    }

    /// Locate and classify one app without touching anything.
    pub fn detect(&self, app: AppId) -> Result<Detection, LocateError> {
        Detection::probe(&self.locator, self.classifier, app)
    }

    pub fn apply_theme(&mut self, palette: &ColorPalette, request: &ApplyRequest) -> ApplyReport {
        let validation = PaletteValidator::new(request.validation).validate(palette);
        for warning in validation.warning_messages() {
            log::warn!("{warning}");
        }

        let mut report = ApplyReport::new(
            palette,
            validation.clone(),
            request.preview,
            request.theme_name.clone(),
        );

        if !validation.is_valid() {
            let error = ThemeError::ValidationFailure {
                errors: validation.error_messages(),
            };
            log::error!("{error}");
            report.error = Some(error.to_string());
            return report;
        }

        let apps = request
            .apps
            .clone()
            .unwrap_or_else(|| AppId::ALL.to_vec());
        let theme_name = request
            .theme_name
            .clone()
            .unwrap_or_else(|| DEFAULT_THEME_NAME.to_string());
        let mode = if request.preview { "Previewing" } else { "Applying" };
        log::info!("{mode} theme '{theme_name}' for {} app(s)", apps.len());

        let mut backup_ids = Vec::new();
        for app in apps {
            let mut set = match self.locator.locate(app) {
                Ok(set) => set,
                Err(e) => {
                    let reason = ThemeError::from(e).reason();
                    log::info!("Skipping {app}: {reason}");
                    report.skipped.push(SkippedApp { app, reason });
                    continue;
                }
            };

            match self.apply_app(&mut set, palette, request.preview, &theme_name, &mut backup_ids) {
                AppResult::Applied(applied) => {
                    log::info!("Themed {app} ({} file(s) modified)", applied.files_modified);
                    report.applied.push(applied);
                }
                AppResult::Failed(failed) => {
                    log::error!("Failed to theme {app}: {}", failed.reason);
                    report.failed.push(failed);
                }
            }
        }

        report.success = !report.applied.is_empty();

        if !request.preview {
            self.reload_all(&mut report.applied);

            if !backup_ids.is_empty() {
                let written = written_files(&report.applied);
                match self
                    .store
                    .create_theme_snapshot(&theme_name, palette, backup_ids, written)
                {
                    Ok(snapshot) => report.snapshot_id = Some(snapshot.snapshot_id),
                    Err(e) => log::error!("Could not record theme snapshot: {e}"),
                }
            }
        }

        report
    }

    fn apply_app(
        &mut self,
        set: &mut ConfigSet,
        palette: &ColorPalette,
        preview: bool,
        theme_name: &str,
        backup_ids: &mut Vec<String>,
    ) -> AppResult {
        let app = set.app;
        let classification = self.classifier.classify_in_place(set);
        let rewriter = rewriter_for(app);

        let mut outcomes = Vec::new();
        for path in classification.targets() {
            let outcome = self.process(
                set,
                path,
                &classification,
                rewriter.as_deref(),
                palette,
                preview,
                theme_name,
                backup_ids,
            );
            outcomes.push(outcome);
        }

        let retry_main = !outcomes.iter().any(|o| o.status.is_success())
            && classification.fallback != Some(Fallback::AllMain)
            && !classification.main.is_empty();
        if retry_main {
            log::info!("No color-bearing file of {app} could be themed, trying main files");
            for path in &classification.main {
                let outcome = self.process(
                    set,
                    path,
                    &classification,
                    rewriter.as_deref(),
                    palette,
                    preview,
                    theme_name,
                    backup_ids,
                );
                outcomes.push(outcome);
            }
        }

        if outcomes.iter().any(|o| o.status.is_success()) {
            let summary = set.summary();
            AppResult::Applied(AppliedApp {
                app,
                files_modified: outcomes
                    .iter()
                    .filter(|o| matches!(o.status, FileStatus::Written | FileStatus::Previewed))
                    .count(),
                modular: summary.modular,
                instances: summary.instances,
                files: outcomes,
                reload: None,
            })
        } else {
            let reason = outcomes
                .iter()
                .find_map(|o| o.status.reason())
                .unwrap_or("No themeable configuration file")
                .to_string();
            AppResult::Failed(FailedApp {
                app,
                reason,
                files: outcomes,
            })
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn process(
        &mut self,
        set: &ConfigSet,
        path: &Path,
        classification: &Classification,
        rewriter: Option<&dyn ThemeRewriter>,
        palette: &ColorPalette,
        preview: bool,
        theme_name: &str,
        backup_ids: &mut Vec<String>,
    ) -> FileOutcome {
        let role = classification.role_of(path);
        let Some(file) = set.file(path) else {
            return FileOutcome::new(
                path.to_path_buf(),
                role,
                FileStatus::Failed("File was not loaded".to_string()),
            );
        };

        if !file.writable {
            let error = ThemeError::PermissionDenied {
                path: path.to_path_buf(),
            };
            log::warn!("{error}");
            return FileOutcome::new(path.to_path_buf(), role, FileStatus::Skipped(error.to_string()));
        }

        let mut outcome = FileOutcome::new(path.to_path_buf(), role, FileStatus::Unchanged);
        let new_text = match rewriter {
            Some(rewriter) => {
                let rewritten = rewriter.rewrite(&file.text, palette);
                if let Some(reason) = &rewritten.degraded {
                    let error = ThemeError::ParseDegraded {
                        path: path.to_path_buf(),
                        reason: reason.clone(),
                    };
                    log::warn!("{error}");
                }
                outcome.degraded = rewritten.degraded.clone();
                if !rewritten.is_changed() {
                    log::debug!("{} already carries the palette", path.display());
                    return outcome;
                }
                outcome.changes = rewritten.changes;
                rewritten.text
            }
            None => match self.generator.generate_patch(
                set.app,
                set.app.spec().format,
                palette,
                &file.text,
            ) {
                Generated::Patch(patch) if patch == file.text => return outcome,
                Generated::Patch(patch) => patch,
                Generated::Unavailable(reason) => {
                    outcome.status = FileStatus::Failed(reason);
                    return outcome;
                }
            },
        };

        if preview {
            log_preview(file, &outcome);
            outcome.status = FileStatus::Previewed;
            return outcome;
        }

        outcome.status = match self.write(set.app, file, &new_text, theme_name) {
            Ok(backup_id) => {
                if let Some(id) = &backup_id {
                    backup_ids.push(id.clone());
                }
                outcome.backup_id = backup_id;
                FileStatus::Written
            }
            Err(e) => {
                log::error!("{e}");
                FileStatus::Failed(e.reason())
            }
        };
        outcome
    }

    /// Back up `file` if it exists, then replace it. Returns the backup id.
    fn write(
        &mut self,
        app: AppId,
        file: &ConfigFile,
        text: &str,
        theme_name: &str,
    ) -> Result<Option<String>, ThemeError> {
        let backup_id = if file.exists {
            let entry = self
                .store
                .create_backup(&file.path, app, &format!("theme_{theme_name}"))?;
            Some(entry.backup_id)
        } else {
            None
        };

        atomic_write(&file.path, text.as_bytes()).map_err(|e| ThemeError::io(&file.path, e))?;
        log::info!("Wrote {}", file.path.display());
        Ok(backup_id)
    }

    fn reload_all(&self, applied: &mut [AppliedApp]) {
        for app in applied {
            let outcome = if app.files_modified == 0 {
                ReloadOutcome::NotNeeded
            } else {
                self.reloader.reload(app.app, app.app.spec().reload)
            };
            app.reload = Some(outcome);
        }
    }
}

fn log_preview(file: &ConfigFile, outcome: &FileOutcome) {
    if outcome.changes.is_empty() {
        log::info!("[preview] {} would be regenerated", file.path.display());
    }
    for change in &outcome.changes {
        log::info!(
            "[preview] {} {} {}: {} -> {}",
            file.path.display(),
            change.scope,
            change.key,
            change.old.as_deref().unwrap_or("<new>"),
            change.new
        );
    }
}

fn written_files(applied: &[AppliedApp]) -> BTreeMap<AppId, Vec<PathBuf>> {
    applied
        .iter()
        .map(|app| {
            let paths = app
                .files
                .iter()
                .filter(|file| file.status == FileStatus::Written)
                .map(|file| file.path.clone())
                .collect::<Vec<_>>();
            (app.app, paths)
        })
        .filter(|(_, paths)| !paths.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FileRole;
    use crate::reload::{NoopReloader, ReloadKind};
    use crate::utils::fs::file_sha256;
    use claims::{assert_none, assert_some};
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    struct Env {
        home: TempDir,
        store: BackupStore,
    }

    impl Env {
        fn new() -> Self {
            let home = TempDir::new().unwrap();
            let store = BackupStore::open(home.path().join("backups")).unwrap();
            Self { home, store }
        }

        fn write(&self, rel: &str, text: &str) -> PathBuf {
            let path = self.home.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, text).unwrap();
            fs::canonicalize(path).unwrap()
        }

        fn applicator(&mut self) -> ThemeApplicator<'_> {
            ThemeApplicator::new(Locator::new(self.home.path()), &mut self.store)
                .with_reloader(NoopReloader)
        }
    }

    fn palette() -> ColorPalette {
        ColorPalette::new()
            .with("primary", "#6750A4")
            .with("surface", "#F7F2FA")
            .with("on_surface", "#1D1B20")
    }

    fn lenient(apps: Vec<AppId>) -> ApplyRequest {
        ApplyRequest::default()
            .for_apps(apps)
            .with_validation(ValidationMode::Lenient)
    }

    #[derive(Clone, Default)]
    struct Recording(Rc<RefCell<Vec<AppId>>>);

    impl Reloader for Recording {
        fn reload(&self, app: AppId, _kind: ReloadKind) -> ReloadOutcome {
            self.0.borrow_mut().push(app);
            ReloadOutcome::Reloaded
        }
    }

    struct Canned(&'static str);

    impl PatchGenerator for Canned {
        fn generate_patch(
            &self,
            _app: AppId,
            _format: crate::apps::ConfigFormat,
            _palette: &ColorPalette,
            _current: &str,
        ) -> Generated {
            Generated::Patch(self.0.to_string())
        }
    }

    #[test]
    fn test_invalid_palette_halts_before_any_app() {
        let mut env = Env::new();
        let path = env.write(".config/kitty/kitty.conf", "background #000000\n");
        let before = file_sha256(&path).unwrap();

        let report = env
            .applicator()
            .apply_theme(&palette(), &ApplyRequest::default().for_apps(vec![AppId::Kitty]));

        assert!(!report.success);
        assert!(!report.validation.is_valid());
        assert!(report.applied.is_empty() && report.skipped.is_empty());
        assert_some!(report.error);
        assert_eq!(file_sha256(&path).unwrap(), before);
    }

    #[test]
    fn test_missing_app_is_skipped() {
        let mut env = Env::new();
        let report = env.applicator().apply_theme(&palette(), &lenient(vec![AppId::Dunst]));
        assert!(!report.success);
        let skipped = assert_some!(report.skipped_app(AppId::Dunst));
        assert_eq!(skipped.reason, "Configuration not found");
    }

    #[test]
    fn test_apply_writes_backs_up_and_snapshots() {
        let mut env = Env::new();
        let path = env.write(".config/kitty/kitty.conf", "background #000000\n");
        let before = file_sha256(&path).unwrap();

        let report = env
            .applicator()
            .apply_theme(&palette(), &lenient(vec![AppId::Kitty]).named("ocean"));

        assert!(report.success);
        let applied = assert_some!(report.applied_app(AppId::Kitty));
        assert_eq!(applied.files_modified, 1);
        assert_eq!(applied.reload, Some(ReloadOutcome::Skipped));
        assert!(fs::read_to_string(&path).unwrap().contains("background #F7F2FA"));

        let backup_id = assert_some!(applied.files[0].backup_id.clone());
        let entry = assert_some!(env.store.get(&backup_id));
        assert_eq!(entry.file_hash, before);

        let snapshot_id = assert_some!(report.snapshot_id);
        assert!(snapshot_id.starts_with("theme_ocean_"));
        let current = assert_some!(env.store.current_theme());
        assert_eq!(current.backup_ids, vec![backup_id]);
        assert_eq!(current.applied.get(&AppId::Kitty), Some(&vec![path]));
    }

    #[test]
    fn test_preview_touches_nothing() {
        let mut env = Env::new();
        let path = env.write(".config/kitty/kitty.conf", "background #000000\n");
        let before = file_sha256(&path).unwrap();

        let mut request = lenient(vec![AppId::Kitty]);
        request.preview = true;
        let report = env.applicator().apply_theme(&palette(), &request);

        assert!(report.success && report.preview);
        let applied = assert_some!(report.applied_app(AppId::Kitty));
        assert_eq!(applied.files[0].status, FileStatus::Previewed);
        assert!(applied.files[0].changes.iter().any(|c| c.key == "background"));
        assert_none!(applied.reload.clone());
        assert_none!(report.snapshot_id);
        assert_eq!(file_sha256(&path).unwrap(), before);
        assert!(env.store.list_backups(None).is_empty());
    }

    #[test]
    fn test_file_ending_in_accented_comment_is_themed() {
        let mut env = Env::new();
        let path = env.write(
            ".config/kitty/kitty.conf",
            "font_family Fira Code\n# thème foncé\n",
        );

        let report = env.applicator().apply_theme(&palette(), &lenient(vec![AppId::Kitty]));

        assert!(report.success);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("font_family Fira Code\n# thème foncé\nbackground #F7F2FA\n"));
        assert!(text.contains("cursor #6750A4\n"));
    }

    #[test]
    fn test_second_apply_is_unchanged_and_not_reloaded() {
        let mut env = Env::new();
        env.write(".config/kitty/kitty.conf", "background #000000\n");
        let recording = Recording::default();

        let first = env
            .applicator()
            .with_reloader(recording.clone())
            .apply_theme(&palette(), &lenient(vec![AppId::Kitty]));
        let second = env
            .applicator()
            .with_reloader(recording.clone())
            .apply_theme(&palette(), &lenient(vec![AppId::Kitty]));

        assert!(first.success && second.success);
        let applied = assert_some!(second.applied_app(AppId::Kitty));
        assert_eq!(applied.files_modified, 0);
        assert_eq!(applied.files[0].status, FileStatus::Unchanged);
        assert_eq!(applied.reload, Some(ReloadOutcome::NotNeeded));
        assert_none!(second.snapshot_id);
        assert_eq!(*recording.0.borrow(), vec![AppId::Kitty]);
    }

    #[test]
    fn test_only_color_bearing_include_is_rewritten() {
        let mut env = Env::new();
        let main = env.write(".config/kitty/kitty.conf", "font_size 11\ninclude theme.conf\n");
        let theme = env.write(".config/kitty/theme.conf", "background #000000\n");

        let report = env.applicator().apply_theme(&palette(), &lenient(vec![AppId::Kitty]));

        let applied = assert_some!(report.applied_app(AppId::Kitty));
        assert!(applied.modular);
        assert_eq!(applied.files.len(), 1);
        assert_eq!(applied.files[0].path, theme);
        assert_eq!(applied.files[0].role, FileRole::ColorBearing);
        assert_eq!(
            fs::read_to_string(&main).unwrap(),
            "font_size 11\ninclude theme.conf\n"
        );
    }

    #[test]
    fn test_gtk_file_is_generated_without_backup() {
        let mut env = Env::new();
        let report = env.applicator().apply_theme(&palette(), &lenient(vec![AppId::Gtk]));

        let applied = assert_some!(report.applied_app(AppId::Gtk));
        assert!(applied.files.iter().all(|f| f.backup_id.is_none()));
        let css = fs::read_to_string(env.home.path().join(".config/gtk-4.0/gtk.css")).unwrap();
        assert!(css.contains("@define-color accent_color #6750A4;"));
        assert_none!(report.snapshot_id);
    }

    #[test]
    fn test_fish_without_generator_fails() {
        let mut env = Env::new();
        env.write(".config/fish/config.fish", "set -g fish_greeting\n");

        let report = env.applicator().apply_theme(&palette(), &lenient(vec![AppId::Fish]));

        assert!(!report.success);
        let failed = assert_some!(report.failed_app(AppId::Fish));
        assert!(failed.reason.contains("disabled"));
    }

    #[test]
    fn test_fish_with_generator_is_backed_up_and_replaced() {
        let mut env = Env::new();
        let path = env.write(".config/fish/config.fish", "set -g fish_greeting\n");

        let report = env
            .applicator()
            .with_generator(Canned("set -g fish_color_command 6750A4\n"))
            .apply_theme(&palette(), &lenient(vec![AppId::Fish]));

        let applied = assert_some!(report.applied_app(AppId::Fish));
        assert_eq!(applied.files_modified, 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "set -g fish_color_command 6750A4\n"
        );
        assert_some!(applied.files[0].backup_id.clone());
    }

    #[test]
    fn test_detect_reports_summary() {
        let mut env = Env::new();
        env.write(".config/kitty/kitty.conf", "include theme.conf\n");
        env.write(".config/kitty/theme.conf", "background #000000\n");

        let applicator = env.applicator();
        let detection = applicator.detect(AppId::Kitty).unwrap();
        assert!(detection.has_rewriter);
        assert_eq!(detection.summary.total_files, 2);
        assert!(detection.summary.modular);
        assert_eq!(detection.classification.color.len(), 1);
        assert!(applicator.detect(AppId::Rofi).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_file_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let mut env = Env::new();
        let path = env.write(".config/kitty/kitty.conf", "background #000000\n");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();
        if is_root() {
            return;
        }

        let report = env.applicator().apply_theme(&palette(), &lenient(vec![AppId::Kitty]));
        let failed = assert_some!(report.failed_app(AppId::Kitty));
        assert!(failed.reason.starts_with("Permission denied"));
        assert!(matches!(failed.files[0].status, FileStatus::Skipped(_)));
    }

    #[cfg(unix)]
    fn is_root() -> bool {
        fs::OpenOptions::new()
            .append(true)
            .open(Path::new("/etc/passwd"))
            .is_ok()
    }
}
