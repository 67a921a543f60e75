use super::app::AppConfig;

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid backup.keep_count: {configured} (min: {min_limit}, max: {max_limit})")]
    KeepCount {
        configured: usize,
        min_limit: usize,
        max_limit: usize,
    },
    #[error("Invalid backup.keep_days: {configured} (min: {min_limit}, max: {max_limit})")]
    KeepDays {
        configured: i64,
        min_limit: i64,
        max_limit: i64,
    },
    #[error("Invalid reload.timeout_secs: {configured} (min: {min_limit}, max: {max_limit})")]
    ReloadTimeout {
        configured: u64,
        min_limit: u64,
        max_limit: u64,
    },
    #[error("Invalid generator.timeout_secs: {configured} (min: {min_limit}, max: {max_limit})")]
    GeneratorTimeout {
        configured: u64,
        min_limit: u64,
        max_limit: u64,
    },
    #[error("Invalid entry in apply.apps: {name}")]
    UnknownApp { name: String, reason: String },
    #[error("Invalid apply.theme_name: {name}")]
    ThemeName { name: String, reason: String },
    #[error("Invalid logging.level: {configured}")]
    LogLevel { configured: String },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::KeepCount {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Backup keep count out of range!\n\n\
                    Your configured value: {configured}\n\
                    Valid range: {min_limit} - {max_limit}\n\n\
                    Please update keep_count in the [backup] section of config.toml."
                )
            }
            ConfigValidationError::KeepDays {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Backup retention out of range!\n\n\
                    Your configured value: {configured} days\n\
                    Valid range: {min_limit} - {max_limit} days\n\n\
                    Please update keep_days in the [backup] section of config.toml."
                )
            }
            ConfigValidationError::ReloadTimeout {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Reload timeout out of range!\n\n\
                    Your configured value: {configured} seconds\n\
                    Valid range: {min_limit} - {max_limit} seconds\n\n\
                    Please update timeout_secs in the [reload] section of config.toml."
                )
            }
            ConfigValidationError::GeneratorTimeout {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Generator timeout out of range!\n\n\
                    Your configured value: {configured} seconds\n\
                    Valid range: {min_limit} - {max_limit} seconds\n\n\
                    Please update timeout_secs in the [generator] section of config.toml."
                )
            }
            ConfigValidationError::UnknownApp { reason, .. } => {
                format!("{reason}\n\nPlease update apps in the [apply] section of config.toml.")
            }
            ConfigValidationError::ThemeName { reason, .. } => {
                format!("{reason}\n\nPlease update theme_name in the [apply] section of config.toml.")
            }
            ConfigValidationError::LogLevel { configured } => {
                format!(
                    "Unknown log level '{configured}'!\n\n\
                    Valid levels: trace, debug, info, warn, error\n\n\
                    Please update level in the [logging] section of config.toml."
                )
            }
        }
    }
}

/// Configuration loading result
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
}
