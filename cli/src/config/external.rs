use super::limits::{MAX_GENERATOR_TIMEOUT_SECS, MAX_RELOAD_TIMEOUT_SECS, MIN_COMMAND_TIMEOUT_SECS};
use super::validation::ConfigValidationError;
use engine::generator::{DEFAULT_GENERATION_TIMEOUT, DEFAULT_MODELS};
use engine::reload::DEFAULT_RELOAD_TIMEOUT;
use serde::Deserialize;
use std::time::Duration;

/// `[reload]` section
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ReloadConfig {
    enabled: Option<bool>,
    timeout_secs: Option<u64>,
}

impl ReloadConfig {
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
            .unwrap_or(DEFAULT_RELOAD_TIMEOUT.as_secs())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs())
    }

    pub(super) fn validate(&self, errors: &mut Vec<ConfigValidationError>) {
        let timeout = self.timeout_secs();
        if !(MIN_COMMAND_TIMEOUT_SECS..=MAX_RELOAD_TIMEOUT_SECS).contains(&timeout) {
            errors.push(ConfigValidationError::ReloadTimeout {
                configured: timeout,
                min_limit: MIN_COMMAND_TIMEOUT_SECS,
                max_limit: MAX_RELOAD_TIMEOUT_SECS,
            });
        }
    }
}

/// `[generator]` section, for apps without a native rewriter
#[derive(Debug, Deserialize, Default, Clone)]
pub struct GeneratorConfig {
    enabled: Option<bool>,
    models: Option<Vec<String>>,
    timeout_secs: Option<u64>,
}

impl GeneratorConfig {
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    pub fn models(&self) -> Vec<String> {
        match &self.models {
            Some(models) if !models.is_empty() => models.clone(),
            _ => DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
            .unwrap_or(DEFAULT_GENERATION_TIMEOUT.as_secs())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs())
    }

    pub(super) fn validate(&self, errors: &mut Vec<ConfigValidationError>) {
        let timeout = self.timeout_secs();
        if !(MIN_COMMAND_TIMEOUT_SECS..=MAX_GENERATOR_TIMEOUT_SECS).contains(&timeout) {
            errors.push(ConfigValidationError::GeneratorTimeout {
                configured: timeout,
                min_limit: MIN_COMMAND_TIMEOUT_SECS,
                max_limit: MAX_GENERATOR_TIMEOUT_SECS,
            });
        }
    }
}
