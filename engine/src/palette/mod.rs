//! Semantic color palettes.
//!
//! A [`ColorPalette`] maps Material You role names (`primary`, `on_surface`,
//! `neutral_60`, ...) to `#RRGGBB` strings. Palettes are produced outside
//! this crate and treated as immutable input for a whole apply run.

pub mod color;
pub mod validation;

pub use color::{ColorError, Rgb, hex_to_css_rgba, hex_to_rgba_packed};
pub use validation::{PaletteReport, PaletteValidator, ValidationMode};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Roles every palette needs for minimal operation.
pub const REQUIRED_ROLES: &[&str] = &[
    "primary",
    "secondary",
    "surface",
    "on_surface",
    "background",
    "on_background",
];

/// Base roles outside the tonal ramps.
pub const BASE_ROLES: &[&str] = &[
    "primary",
    "secondary",
    "tertiary",
    "accent",
    "background",
    "surface",
    "surface_variant",
    "on_primary",
    "on_secondary",
    "on_background",
    "on_surface",
    "on_surface_variant",
    "outline",
];

/// Status roles.
pub const STATUS_ROLES: &[&str] = &[
    "error",
    "on_error",
    "error_container",
    "on_error_container",
    "warning",
    "warning_container",
    "success",
    "success_container",
];

const TONE_STEPS: &[u8] = &[10, 20, 30, 40, 50, 60, 70, 80, 90, 95, 99];
const TONAL_FAMILIES: &[&str] = &["primary", "secondary", "neutral"];

/// Whether `role` belongs to the known role vocabulary.
pub fn is_known_role(role: &str) -> bool {
    if BASE_ROLES.contains(&role) || STATUS_ROLES.contains(&role) {
        return true;
    }
    role.rsplit_once('_').is_some_and(|(family, tone)| {
        TONAL_FAMILIES.contains(&family)
            && tone
                .parse::<u8>()
                .is_ok_and(|step| TONE_STEPS.contains(&step))
    })
}

/// Mapping from semantic role to hex color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorPalette {
    roles: BTreeMap<String, String>,
}

impl ColorPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: &str, hex: &str) -> Self {
        self.insert(role, hex);
        self
    }

    pub fn insert(&mut self, role: &str, hex: &str) {
        self.roles.insert(role.to_string(), hex.to_string());
    }

    pub fn get(&self, role: &str) -> Option<&str> {
        self.roles.get(role).map(String::as_str)
    }

    /// First role of `preferences` that is present in the palette.
    pub fn first_of(&self, preferences: &[&str]) -> Option<(&str, &str)> {
        preferences
            .iter()
            .find_map(|role| self.roles.get_key_value(*role))
            .map(|(role, hex)| (role.as_str(), hex.as_str()))
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.roles.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Baseline Material You light palette.
    pub fn material_default() -> Self {
        const DEFAULTS: &[(&str, &str)] = &[
            ("primary", "#6750A4"),
            ("secondary", "#625B71"),
            ("background", "#FFFBFE"),
            ("surface", "#F7F2FA"),
            ("surface_variant", "#E7E0EC"),
            ("accent", "#7C4DFF"),
            ("on_primary", "#FFFFFF"),
            ("on_secondary", "#FFFFFF"),
            ("on_background", "#1C1B1F"),
            ("on_surface", "#1C1B1F"),
            ("primary_10", "#21005D"),
            ("primary_20", "#381E72"),
            ("primary_30", "#4F378B"),
            ("primary_40", "#6750A4"),
            ("primary_50", "#7F67BE"),
            ("primary_60", "#9A82DB"),
            ("primary_70", "#B69DF8"),
            ("primary_80", "#D0BCFF"),
            ("primary_90", "#EADDFF"),
            ("primary_95", "#F6EDFF"),
            ("primary_99", "#FFFBFE"),
            ("secondary_10", "#1D192B"),
            ("secondary_20", "#332D41"),
            ("secondary_30", "#4A4458"),
            ("secondary_40", "#625B71"),
            ("secondary_50", "#7A7289"),
            ("secondary_60", "#958DA5"),
            ("secondary_70", "#B0A7C0"),
            ("secondary_80", "#CCC2DC"),
            ("secondary_90", "#E8DEF8"),
            ("neutral_10", "#1C1B1F"),
            ("neutral_20", "#313033"),
            ("neutral_30", "#48464C"),
            ("neutral_40", "#605D64"),
            ("neutral_50", "#79767D"),
            ("neutral_60", "#938F96"),
            ("neutral_70", "#AEA9B1"),
            ("neutral_80", "#CAC4D0"),
            ("neutral_90", "#E6E0E9"),
            ("neutral_95", "#F4EFF4"),
            ("neutral_99", "#FFFBFE"),
            ("error", "#BA1A1A"),
            ("error_container", "#FFDAD6"),
            ("on_error", "#FFFFFF"),
            ("on_error_container", "#410002"),
            ("warning", "#F57C00"),
            ("warning_container", "#FFECB3"),
            ("success", "#4CAF50"),
            ("success_container", "#C8E6C9"),
        ];

        DEFAULTS
            .iter()
            .fold(Self::new(), |palette, (role, hex)| palette.with(role, hex))
    }
}

impl FromIterator<(String, String)> for ColorPalette {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            roles: iter.into_iter().collect(),
        }
    }
}
