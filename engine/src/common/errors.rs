use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Error taxonomy for a theme application run.
///
/// Every failure the engine can observe while detecting, backing up,
/// rewriting or reloading an application is classified into one of these
/// variants. None of them is fatal to a whole run: the orchestrator folds
/// them into per-file or per-application outcomes of the final report.
///
/// # Error Categories
///
/// ## Discovery
/// - [`NotFound`] - No configuration located for an application (a skip)
/// - [`PermissionDenied`] - A located file cannot be written (file skipped)
///
/// ## Rewriting
/// - [`ParseDegraded`] - Scope boundaries could not be recognized
///
/// ## Collaborators
/// - [`ExternalToolFailure`] - Reload or generation command failed or timed out
///
/// ## Input
/// - [`ValidationFailure`] - Palette rejected before any file is touched
///
/// # Examples
///
/// ```no_run
/// use engine::common::errors::ThemeError;
///
/// fn describe(error: &ThemeError) -> &'static str {
///     match error {
///         ThemeError::NotFound { .. } => "skipped",
///         ThemeError::PermissionDenied { .. } => "file skipped",
///         ThemeError::ValidationFailure { .. } => "run halted",
///         _ => "failed",
///     }
/// }
/// ```
///
/// [`NotFound`]: ThemeError::NotFound
/// [`PermissionDenied`]: ThemeError::PermissionDenied
/// [`ParseDegraded`]: ThemeError::ParseDegraded
/// [`ExternalToolFailure`]: ThemeError::ExternalToolFailure
/// [`ValidationFailure`]: ThemeError::ValidationFailure
#[derive(Debug, Error)]
pub enum ThemeError {
    /// No configuration file was located for the application.
    ///
    /// # Fields
    /// - `app`: Application identifier
    ///
    /// # Recovery
    /// - Reported as a skip, never as a failure
    #[error("Configuration not found for {app}")]
    NotFound { app: String },

    /// A configuration file exists but the current user cannot write it.
    ///
    /// # Fields
    /// - `path`: The file that was skipped
    ///
    /// # Recovery
    /// - Fix file ownership or permissions and re-run
    #[error("Permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// Block boundaries could not be matched, a flat rewrite was used.
    ///
    /// # Fields
    /// - `path`: The affected file, when known
    /// - `reason`: What the scanner tripped over
    #[error("Scope-aware rewrite not possible for {}: {reason}", path.display())]
    ParseDegraded { path: PathBuf, reason: String },

    /// A reload or generation command failed, exited non-zero or timed out.
    ///
    /// # Fields
    /// - `tool`: Command line that was run
    /// - `reason`: Exit status, timeout or spawn failure description
    ///
    /// # Recovery
    /// - Logged and recorded in the report, the run continues
    #[error("External tool `{tool}` failed: {reason}")]
    ExternalToolFailure { tool: String, reason: String },

    /// The palette is missing required roles or carries malformed colors.
    ///
    /// # Fields
    /// - `errors`: Every validation error that was found
    ///
    /// # Recovery
    /// - Fix the palette; no file has been modified
    #[error("Palette validation failed: {}", errors.join("; "))]
    ValidationFailure { errors: Vec<String> },

    /// File system failure while reading or writing a configuration file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backup store failure; a file is never written without its backup.
    #[error("Backup failed: {0}")]
    Backup(String),
}

impl ThemeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ThemeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short reason string used in report entries.
    pub fn reason(&self) -> String {
        match self {
            ThemeError::NotFound { .. } => "Configuration not found".to_string(),
            other => other.to_string(),
        }
    }
}

/// Failures of external commands run with a deadline.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Command `{0}` timed out after {1:?}")]
    Timeout(String, Duration),
    #[error("Command `{0}` failed with status {1}")]
    CommandFailed(String, std::process::ExitStatus),
    #[error("Command output was not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

impl From<ProcessError> for ThemeError {
    fn from(error: ProcessError) -> Self {
        let tool = match &error {
            ProcessError::Timeout(cmd, _) | ProcessError::CommandFailed(cmd, _) => cmd.clone(),
            ProcessError::Io(_) | ProcessError::InvalidUtf8(_) => "<spawn>".to_string(),
        };
        ThemeError::ExternalToolFailure {
            tool,
            reason: error.to_string(),
        }
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error result
    fn context(self, msg: &str) -> Result<T, String>;

    /// Add lazy context to an error result
    fn with_context<F>(self, f: F) -> Result<T, String>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> Result<T, String> {
        self.map_err(|e| format!("{msg}: {e}"))
    }

    fn with_context<F>(self, f: F) -> Result<T, String>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| format!("{}: {e}", f()))
    }
}
