//! Registry of supported applications.
//!
//! Every application the engine can theme is declared once here with its
//! fixed on-disk conventions: where its configuration lives, which format it
//! uses, how it includes other files, how backups of it are named and how it
//! is told to reload. Nothing in this table is user-configurable.

use crate::reload::ReloadKind;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a supported application.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AppId {
    Hyprland,
    Kitty,
    Waybar,
    Rofi,
    Dunst,
    Gtk,
    Fish,
}

impl AppId {
    pub const ALL: [AppId; 7] = [
        AppId::Hyprland,
        AppId::Kitty,
        AppId::Waybar,
        AppId::Rofi,
        AppId::Dunst,
        AppId::Gtk,
        AppId::Fish,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppId::Hyprland => "hyprland",
            AppId::Kitty => "kitty",
            AppId::Waybar => "waybar",
            AppId::Rofi => "rofi",
            AppId::Dunst => "dunst",
            AppId::Gtk => "gtk",
            AppId::Fish => "fish",
        }
    }

    pub fn spec(self) -> &'static AppSpec {
        match self {
            AppId::Hyprland => &HYPRLAND,
            AppId::Kitty => &KITTY,
            AppId::Waybar => &WAYBAR,
            AppId::Rofi => &ROFI,
            AppId::Dunst => &DUNST,
            AppId::Gtk => &GTK,
            AppId::Fish => &FISH,
        }
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown application '{0}' (supported: hyprland, kitty, waybar, rofi, dunst, gtk, fish)")]
pub struct UnknownApp(pub String);

impl FromStr for AppId {
    type Err = UnknownApp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppId::ALL
            .into_iter()
            .find(|app| app.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownApp(s.to_string()))
    }
}

/// Declared configuration format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Hyprland,
    Kitty,
    Css,
    Rasi,
    Ini,
    Fish,
}

impl ConfigFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigFormat::Hyprland => "hyprland",
            ConfigFormat::Kitty => "kitty",
            ConfigFormat::Css => "css",
            ConfigFormat::Rasi => "rasi",
            ConfigFormat::Ini => "ini",
            ConfigFormat::Fish => "fish",
        }
    }
}

/// How an application's files are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// Check each candidate path and follow includes.
    Standard,
    /// Every directory under `root` holding one of `markers` is a separate instance.
    MultiInstance {
        root: &'static str,
        markers: &'static [&'static str],
        style_files: &'static [&'static str],
        module_dir: &'static str,
    },
    /// Target files are written even if they do not exist yet.
    Generated,
}

/// Fixed conventions of one application.
#[derive(Debug, Clone, Copy)]
pub struct AppSpec {
    pub id: AppId,
    /// Home-relative files or directories.
    pub candidates: &'static [&'static str],
    pub format: ConfigFormat,
    pub extensions: &'static [&'static str],
    /// Regexes with one capture group holding the referenced path.
    pub include_patterns: &'static [&'static str],
    pub backup_suffix: &'static str,
    pub canonical_names: &'static [&'static str],
    pub theme_keywords: &'static [&'static str],
    pub discovery: Discovery,
    pub reload: ReloadKind,
}

/// Filename fragments that mark a file as holding theme settings.
pub const THEME_FILENAME_VOCABULARY: &[&str] = &[
    "theme",
    "color",
    "colour",
    "style",
    "decoration",
    "appearance",
    "visual",
    "material",
    "palette",
];

static HYPRLAND: AppSpec = AppSpec {
    id: AppId::Hyprland,
    candidates: &[".config/hypr/hyprland.conf"],
    format: ConfigFormat::Hyprland,
    extensions: &["conf"],
    include_patterns: &[r"(?m)^[ \t]*source[ \t]*=[ \t]*([^\s#]+)"],
    backup_suffix: "hyprland.conf.matyou.bak",
    canonical_names: &["hyprland.conf", "hyprland.config"],
    theme_keywords: &[
        "decoration",
        "col.",
        "rgba",
        "rgb",
        "border",
        "shadow",
        "blur",
        "opacity",
        "rounding",
        "animation",
    ],
    discovery: Discovery::Standard,
    reload: ReloadKind::CliReload {
        program: "hyprctl",
        args: &["reload"],
    },
};

static KITTY: AppSpec = AppSpec {
    id: AppId::Kitty,
    candidates: &[".config/kitty/kitty.conf"],
    format: ConfigFormat::Kitty,
    extensions: &["conf"],
    include_patterns: &[r"(?m)^[ \t]*include[ \t]+([^\s#]+)"],
    backup_suffix: "kitty.conf.matyou.bak",
    canonical_names: &["kitty.conf"],
    theme_keywords: &[
        "foreground",
        "background",
        "cursor",
        "selection_",
        "url_color",
        "border_color",
        "tab_bg",
        "tab_fg",
    ],
    discovery: Discovery::Standard,
    reload: ReloadKind::Signal {
        signal: "SIGUSR1",
        process: "kitty",
    },
};

static WAYBAR: AppSpec = AppSpec {
    id: AppId::Waybar,
    candidates: &[".config/waybar"],
    format: ConfigFormat::Css,
    extensions: &["css"],
    include_patterns: &[r#"@import\s+(?:url\()?["']([^"']+)["']"#],
    backup_suffix: "waybar.css.matyou.bak",
    canonical_names: &["style.css"],
    theme_keywords: &[
        "@define-color",
        "background-color",
        "border-color",
        "window#waybar",
        "color:",
    ],
    discovery: Discovery::MultiInstance {
        root: ".config/waybar",
        markers: &["config", "config.json", "config.jsonc", "style.css"],
        style_files: &["style.css", "styles.css", "main.css"],
        module_dir: "modules",
    },
    reload: ReloadKind::Signal {
        signal: "SIGUSR2",
        process: "waybar",
    },
};

static ROFI: AppSpec = AppSpec {
    id: AppId::Rofi,
    candidates: &[".config/rofi/config.rasi", ".config/rofi/theme.rasi"],
    format: ConfigFormat::Rasi,
    extensions: &["rasi"],
    include_patterns: &[r#"@import\s*["']([^"']+)["']"#],
    backup_suffix: "rofi.rasi.matyou.bak",
    canonical_names: &["config.rasi"],
    theme_keywords: &[
        "background",
        "foreground",
        "border-color",
        "selected-",
        "@theme",
    ],
    discovery: Discovery::Standard,
    reload: ReloadKind::None,
};

static DUNST: AppSpec = AppSpec {
    id: AppId::Dunst,
    candidates: &[".config/dunst/dunstrc", ".config/dunst/dunstrc.d"],
    format: ConfigFormat::Ini,
    extensions: &["conf", "ini"],
    include_patterns: &[],
    backup_suffix: "dunstrc.matyou.bak",
    canonical_names: &["dunstrc"],
    theme_keywords: &[
        "[urgency_",
        "frame_color",
        "background",
        "foreground",
        "highlight",
    ],
    discovery: Discovery::Standard,
    reload: ReloadKind::CliReload {
        program: "dunstctl",
        args: &["reload"],
    },
};

static GTK: AppSpec = AppSpec {
    id: AppId::Gtk,
    candidates: &[".config/gtk-4.0/gtk.css", ".config/gtk-3.0/gtk.css"],
    format: ConfigFormat::Css,
    extensions: &["css"],
    include_patterns: &[r#"@import\s+(?:url\()?["']([^"']+)["']"#],
    backup_suffix: "gtk.css.matyou.bak",
    canonical_names: &["gtk.css"],
    theme_keywords: &["@define-color", "background-color", "color:"],
    discovery: Discovery::Generated,
    reload: ReloadKind::None,
};

static FISH: AppSpec = AppSpec {
    id: AppId::Fish,
    candidates: &[".config/fish/config.fish", ".config/fish/conf.d"],
    format: ConfigFormat::Fish,
    extensions: &["fish"],
    include_patterns: &[r"(?m)^[ \t]*source[ \t]+([^\s#;]+)"],
    backup_suffix: "config.fish.matyou.bak",
    canonical_names: &["config.fish"],
    theme_keywords: &["fish_color_", "fish_pager_color_", "set_color"],
    discovery: Discovery::Standard,
    reload: ReloadKind::None,
};

static INCLUDE_REGEXES: Lazy<BTreeMap<AppId, Vec<Regex>>> = Lazy::new(|| {
    AppId::ALL
        .into_iter()
        .map(|app| {
            let compiled = app
                .spec()
                .include_patterns
                .iter()
                .filter_map(|pattern| match Regex::new(pattern) {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        log::error!("Invalid include pattern for {app}: {e}");
                        None
                    }
                })
                .collect();
            (app, compiled)
        })
        .collect()
});

impl AppSpec {
    /// Compiled include patterns, empty for apps without include syntax.
    pub fn include_regexes(&self) -> &'static [Regex] {
        INCLUDE_REGEXES
            .get(&self.id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Raw include references found in `text`, in order of appearance.
    pub fn include_references<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut found: Vec<(usize, &str)> = self
            .include_regexes()
            .iter()
            .flat_map(|regex| regex.captures_iter(text))
            .filter_map(|caps| caps.get(1))
            .map(|m| (m.start(), m.as_str()))
            .collect();
        found.sort_by_key(|(start, _)| *start);
        found.into_iter().map(|(_, reference)| reference).collect()
    }

    pub fn has_include_directive(&self, text: &str) -> bool {
        self.include_regexes().iter().any(|regex| regex.is_match(text))
    }

    pub fn matches_extension(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(&ext))
    }
}
