use crate::config::limits::MAX_THEME_NAME_LENGTH;
use crate::error::AppError;
use crate::validation::Validator;
use engine::apps::AppId;
use std::path::Path;

/// Validation errors for palette and apply arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputValidationError {
    InvalidPalettePath { path: String, reason: String },
    InvalidFileExtension { path: String, expected: String },
    InvalidThemeName { name: String, reason: String },
    UnknownApp { name: String },
}

impl InputValidationError {
    pub fn user_message(&self) -> String {
        match self {
            InputValidationError::InvalidPalettePath { path, reason } => {
                format!(
                    "Invalid palette path: '{path}'\n\n\
                    Reason: {reason}\n\n\
                    Please ensure the path exists and is readable."
                )
            }
            InputValidationError::InvalidFileExtension { path, expected } => {
                format!(
                    "Invalid file extension for: '{path}'\n\n\
                    Expected: '{expected}' files\n\n\
                    Palettes are JSON objects mapping role names to #RRGGBB colors."
                )
            }
            InputValidationError::InvalidThemeName { name, reason } => {
                format!(
                    "Invalid theme name: '{name}'\n\n\
                    Reason: {reason}\n\n\
                    Please use letters, digits, hyphens and underscores only."
                )
            }
            InputValidationError::UnknownApp { name } => {
                let supported: Vec<&str> = AppId::ALL.iter().map(|app| app.as_str()).collect();
                format!(
                    "Unknown application: '{name}'\n\n\
                    Supported applications: {}",
                    supported.join(", ")
                )
            }
        }
    }
}

impl From<InputValidationError> for AppError {
    fn from(error: InputValidationError) -> Self {
        AppError::Input(error.user_message())
    }
}

/// Palette files must exist and carry a `.json` extension
pub struct PalettePathValidator;

impl Validator<Path> for PalettePathValidator {
    type Error = InputValidationError;

    fn validate(&self, input: &Path) -> Result<(), Self::Error> {
        let shown = input.display().to_string();
        let is_json = input
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            return Err(InputValidationError::InvalidFileExtension {
                path: shown,
                expected: ".json".to_string(),
            });
        }

        if !input.is_file() {
            return Err(InputValidationError::InvalidPalettePath {
                path: shown,
                reason: "File does not exist".to_string(),
            });
        }

        Ok(())
    }
}

/// Theme names end up in snapshot ids, so they stay filename-safe
pub struct ThemeNameValidator;

impl Validator<str> for ThemeNameValidator {
    type Error = InputValidationError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        if input.is_empty() {
            return Err(InputValidationError::InvalidThemeName {
                name: input.to_string(),
                reason: "Name cannot be empty".to_string(),
            });
        }

        if input.len() > MAX_THEME_NAME_LENGTH {
            return Err(InputValidationError::InvalidThemeName {
                name: input.to_string(),
                reason: format!("Name too long (max {MAX_THEME_NAME_LENGTH} characters)"),
            });
        }

        if !input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(InputValidationError::InvalidThemeName {
                name: input.to_string(),
                reason: "Name contains invalid characters (only letters, digits, hyphens and underscores allowed)".to_string(),
            });
        }

        Ok(())
    }
}

pub struct AppNameValidator;

impl Validator<str> for AppNameValidator {
    type Error = InputValidationError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        input
            .parse::<AppId>()
            .map(|_| ())
            .map_err(|_| InputValidationError::UnknownApp {
                name: input.to_string(),
            })
    }
}
