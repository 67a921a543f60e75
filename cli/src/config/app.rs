use super::{
    LoggingConfig,
    apply::ApplyConfig,
    backup::BackupConfig,
    external::{GeneratorConfig, ReloadConfig},
    validation::ConfigValidationError,
};
use crate::logger::parse_level;
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    backup: BackupConfig,
    #[serde(default)]
    reload: ReloadConfig,
    #[serde(default)]
    generator: GeneratorConfig,
    #[serde(default)]
    apply: ApplyConfig,
}

impl AppConfig {
    /// Validate the configuration against defined limits
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        if parse_level(self.logging.level()).is_none() {
            errors.push(ConfigValidationError::LogLevel {
                configured: self.logging.level().to_string(),
            });
        }

        self.backup.validate(&mut errors);
        self.reload.validate(&mut errors);
        self.generator.validate(&mut errors);
        self.apply.validate(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub fn backup(&self) -> &BackupConfig {
        &self.backup
    }

    pub fn reload(&self) -> &ReloadConfig {
        &self.reload
    }

    pub fn generator(&self) -> &GeneratorConfig {
        &self.generator
    }

    pub fn apply(&self) -> &ApplyConfig {
        &self.apply
    }
}
