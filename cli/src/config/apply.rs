use super::validation::ConfigValidationError;
use crate::palette::validation::{AppNameValidator, ThemeNameValidator};
use crate::validation::Validator;
use engine::apps::AppId;
use engine::palette::ValidationMode;
use serde::Deserialize;

/// `[apply]` section, defaults for `apply` and `preview`
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ApplyConfig {
    apps: Option<Vec<String>>,
    strict_palette: Option<bool>,
    theme_name: Option<String>,
}

impl ApplyConfig {
    /// Configured app subset; `None` means every supported app.
    ///
    /// Unknown names are dropped here; [`ApplyConfig::validate`] reports them.
    pub fn apps(&self) -> Option<Vec<AppId>> {
        self.apps.as_ref().map(|names| {
            names
                .iter()
                .filter_map(|name| name.parse::<AppId>().ok())
                .collect()
        })
    }

    pub fn strict_palette(&self) -> bool {
        self.strict_palette.unwrap_or(true)
    }

    pub fn validation_mode(&self) -> ValidationMode {
        if self.strict_palette() {
            ValidationMode::Strict
        } else {
            ValidationMode::Lenient
        }
    }

    pub fn theme_name(&self) -> Option<&str> {
        self.theme_name.as_deref()
    }

    pub(super) fn validate(&self, errors: &mut Vec<ConfigValidationError>) {
        for name in self.apps.iter().flatten() {
            if let Err(e) = AppNameValidator.validate(name.as_str()) {
                errors.push(ConfigValidationError::UnknownApp {
                    name: name.clone(),
                    reason: e.user_message(),
                });
            }
        }

        if let Some(name) = self.theme_name()
            && let Err(e) = ThemeNameValidator.validate(name)
        {
            errors.push(ConfigValidationError::ThemeName {
                name: name.to_string(),
                reason: e.user_message(),
            });
        }
    }
}
