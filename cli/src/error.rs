use engine::backup::BackupError;
use engine::common::ThemeError;
use engine::locator::LocateError;
use std::fmt::Display;

/// Application-wide error types for the `matyou` command line.
///
/// Engine failures inside an apply never reach this type: they are folded
/// into the [`engine::orchestrator::ApplyReport`]. `AppError` covers what
/// stops a command before or after that, such as unreadable configuration,
/// a rejected palette or a failed restore.
///
/// # Error Categories
///
/// ## Input Errors
/// - [`Config`] - configuration loading and validation
/// - [`Palette`] - palette files that cannot be read or do not validate
/// - [`Input`] - rejected command-line arguments
///
/// ## Operation Errors
/// - [`Theme`] - engine failures outside an apply run
/// - [`Backup`] - backup store and snapshot failures
/// - [`Io`] - file system failures
///
/// # Examples
///
/// ```no_run
/// use matyou::error::{AppError, AppResult};
///
/// fn require_palette(path: Option<&str>) -> AppResult<&str> {
///     path.ok_or_else(|| AppError::Input("Either --palette or --default is required".into()))
/// }
/// ```
///
/// [`Config`]: AppError::Config
/// [`Palette`]: AppError::Palette
/// [`Input`]: AppError::Input
/// [`Theme`]: AppError::Theme
/// [`Backup`]: AppError::Backup
/// [`Io`]: AppError::Io
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration loading and validation errors.
    ///
    /// Raised when `config.toml` or the `MATYOU__*` environment cannot be
    /// parsed or holds values outside the configured limits. The message
    /// already carries the user-facing explanation.
    Config(String),

    /// Palette input errors.
    ///
    /// The palette file is missing, is not JSON, or fails validation in the
    /// selected mode.
    Palette(String),

    /// Engine failures outside an apply run, e.g. detection of a missing app.
    Theme(String),

    /// Backup store failures.
    ///
    /// Covers unreadable metadata, unknown backup or snapshot ids, failed
    /// integrity checks and partial snapshot restores.
    ///
    /// # Recovery
    /// - `matyou backups verify` lists damaged copies
    /// - Every restore takes a fresh backup of the current file first
    Backup(String),

    /// File system and I/O operation failures.
    Io(String),

    /// Rejected command-line input.
    Input(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration Error: {msg}"),
            AppError::Palette(msg) => write!(f, "Palette Error: {msg}"),
            AppError::Theme(msg) => write!(f, "Theme Error: {msg}"),
            AppError::Backup(msg) => write!(f, "Backup Error: {msg}"),
            AppError::Io(msg) => write!(f, "IO Error: {msg}"),
            AppError::Input(msg) => write!(f, "Input Error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ThemeError> for AppError {
    fn from(err: ThemeError) -> Self {
        match err {
            ThemeError::Backup(msg) => AppError::Backup(msg),
            io @ ThemeError::Io { .. } => AppError::Io(io.to_string()),
            other => AppError::Theme(other.to_string()),
        }
    }
}

impl From<BackupError> for AppError {
    fn from(err: BackupError) -> Self {
        AppError::Backup(err.to_string())
    }
}

impl From<LocateError> for AppError {
    fn from(err: LocateError) -> Self {
        AppError::Theme(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use engine::apps::AppId;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            AppError::Config("bad".into()).to_string(),
            "Configuration Error: bad"
        );
        assert_eq!(AppError::Input("x".into()).to_string(), "Input Error: x");
    }

    #[test]
    fn test_engine_errors_convert() {
        let err: AppError = LocateError::NotFound { app: AppId::Kitty }.into();
        assert_eq!(err, AppError::Theme("Configuration not found for kitty".into()));

        let err: AppError = BackupError::UnknownBackup("kitty_1".into()).into();
        assert!(matches!(err, AppError::Backup(msg) if msg.contains("kitty_1")));
    }
}
