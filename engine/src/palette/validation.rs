use super::color::{Rgb, contrast_ratio};
use super::{ColorPalette, REQUIRED_ROLES, is_known_role};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HEX6: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid regex"));

/// Minimum contrast between `on_surface` and `surface` before a warning is raised.
pub const MIN_TEXT_CONTRAST: f64 = 4.5;

/// How strictly missing required roles are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Missing required roles reject the palette.
    #[default]
    Strict,
    /// Missing required roles are reported as warnings.
    Lenient,
}

/// Problems found in a palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaletteIssue {
    MissingRole { role: String },
    MalformedHex { role: String, value: String },
    UnknownRole { role: String },
    IdenticalForeground { role: String, background: String },
    LowContrast { role: String, background: String, ratio: String },
}

impl PaletteIssue {
    pub fn user_message(&self) -> String {
        match self {
            PaletteIssue::MissingRole { role } => format!("Missing required color: {role}"),
            PaletteIssue::MalformedHex { role, value } => {
                format!("Invalid color format for {role}: '{value}' (expected #RRGGBB)")
            }
            PaletteIssue::UnknownRole { role } => format!("Unknown palette role: {role}"),
            PaletteIssue::IdenticalForeground { role, background } => {
                format!("{role} is identical to {background}, text will be invisible")
            }
            PaletteIssue::LowContrast {
                role,
                background,
                ratio,
            } => format!("Low contrast between {role} and {background}: {ratio}:1"),
        }
    }
}

/// Outcome of validating a palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteReport {
    pub errors: Vec<PaletteIssue>,
    pub warnings: Vec<PaletteIssue>,
}

impl PaletteReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(PaletteIssue::user_message).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(PaletteIssue::user_message).collect()
    }
}

/// Checks palettes before the orchestrator touches any file.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaletteValidator {
    mode: ValidationMode,
}

impl PaletteValidator {
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    pub fn validate(&self, palette: &ColorPalette) -> PaletteReport {
        let mut report = PaletteReport::default();

        for role in REQUIRED_ROLES {
            if !palette.contains(role) {
                let issue = PaletteIssue::MissingRole {
                    role: role.to_string(),
                };
                match self.mode {
                    ValidationMode::Strict => report.errors.push(issue),
                    ValidationMode::Lenient => report.warnings.push(issue),
                }
            }
        }

        for (role, value) in palette.iter() {
            if !HEX6.is_match(value) {
                report.errors.push(PaletteIssue::MalformedHex {
                    role: role.to_string(),
                    value: value.to_string(),
                });
            }
            if !is_known_role(role) {
                report.warnings.push(PaletteIssue::UnknownRole {
                    role: role.to_string(),
                });
            }
        }

        for (fg, bg) in [("on_surface", "surface"), ("on_background", "background")] {
            if let Some(issue) = Self::legibility(palette, fg, bg) {
                report.warnings.push(issue);
            }
        }

        report
    }

    fn legibility(palette: &ColorPalette, fg: &str, bg: &str) -> Option<PaletteIssue> {
        let (fg_hex, bg_hex) = (palette.get(fg)?, palette.get(bg)?);

        if fg_hex.eq_ignore_ascii_case(bg_hex) {
            return Some(PaletteIssue::IdenticalForeground {
                role: fg.to_string(),
                background: bg.to_string(),
            });
        }

        let ratio = contrast_ratio(Rgb::parse(fg_hex).ok()?, Rgb::parse(bg_hex).ok()?);
        (ratio < MIN_TEXT_CONTRAST).then(|| PaletteIssue::LowContrast {
            role: fg.to_string(),
            background: bg.to_string(),
            ratio: format!("{ratio:.2}"),
        })
    }
}
