use super::limits::{MAX_KEEP_COUNT, MAX_KEEP_DAYS, MIN_KEEP_COUNT, MIN_KEEP_DAYS};
use super::validation::ConfigValidationError;
use engine::backup::{BackupStore, CleanupPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// `[backup]` section
#[derive(Debug, Deserialize, Default, Clone)]
pub struct BackupConfig {
    directory: Option<PathBuf>,
    keep_count: Option<usize>,
    keep_days: Option<i64>,
}

impl BackupConfig {
    /// Configured directory, else `~/.config/matyou/backups` under `home`.
    pub fn directory(&self, home: &Path) -> PathBuf {
        match &self.directory {
            Some(dir) => match dir.strip_prefix("~") {
                Ok(rest) => home.join(rest),
                Err(_) => dir.clone(),
            },
            None => BackupStore::default_dir(home),
        }
    }

    pub fn keep_count(&self) -> usize {
        self.keep_count
            .unwrap_or_else(|| CleanupPolicy::default().keep_count)
    }

    pub fn keep_days(&self) -> i64 {
        self.keep_days
            .unwrap_or_else(|| CleanupPolicy::default().keep_days)
    }

    pub fn cleanup_policy(&self) -> CleanupPolicy {
        CleanupPolicy {
            keep_count: self.keep_count(),
            keep_days: self.keep_days(),
        }
    }

    pub(super) fn validate(&self, errors: &mut Vec<ConfigValidationError>) {
        let keep_count = self.keep_count();
        if !(MIN_KEEP_COUNT..=MAX_KEEP_COUNT).contains(&keep_count) {
            errors.push(ConfigValidationError::KeepCount {
                configured: keep_count,
                min_limit: MIN_KEEP_COUNT,
                max_limit: MAX_KEEP_COUNT,
            });
        }

        let keep_days = self.keep_days();
        if !(MIN_KEEP_DAYS..=MAX_KEEP_DAYS).contains(&keep_days) {
            errors.push(ConfigValidationError::KeepDays {
                configured: keep_days,
                min_limit: MIN_KEEP_DAYS,
                max_limit: MAX_KEEP_DAYS,
            });
        }
    }
}
