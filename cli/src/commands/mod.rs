//! Command implementations.
//!
//! Every command returns plain data; [`crate::output`] renders it as text
//! or JSON. Nothing in here prints.

pub mod apply;
pub mod store;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use engine::backup::BackupStore;
use engine::generator::OllamaGenerator;
use engine::locator::Locator;
use engine::orchestrator::ThemeApplicator;
use engine::reload::{CommandReloader, NoopReloader};
use std::path::{Path, PathBuf};

/// What every command needs: the loaded configuration and the home
/// directory whose dotfiles are themed.
#[derive(Debug, Clone)]
pub struct Context {
    config: AppConfig,
    home: PathBuf,
}

impl Context {
    pub fn new(config: AppConfig, home: impl Into<PathBuf>) -> Self {
        Self {
            config,
            home: home.into(),
        }
    }

    /// Use the current user's home directory.
    pub fn from_env(config: AppConfig) -> AppResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("Home directory could not be determined".into()))?;
        Ok(Self::new(config, home))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn locator(&self) -> Locator {
        Locator::new(&self.home)
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.config.backup().directory(&self.home)
    }

    pub fn open_store(&self) -> AppResult<BackupStore> {
        Ok(BackupStore::open(self.backup_dir())?)
    }

    /// Applicator wired to the configured reload and generation settings.
    pub fn applicator<'s>(&self, store: &'s mut BackupStore) -> ThemeApplicator<'s> {
        let applicator = ThemeApplicator::new(self.locator(), store);

        let reload = self.config.reload();
        let applicator = if reload.enabled() {
            applicator.with_reloader(CommandReloader::new(reload.timeout()))
        } else {
            applicator.with_reloader(NoopReloader)
        };

        let generator = self.config.generator();
        if generator.enabled() {
            applicator.with_generator(OllamaGenerator::new(generator.models(), generator.timeout()))
        } else {
            applicator
        }
    }
}
