use super::ThemeRewriter;
use super::scope::Syntax;
use super::table::{ColorSetting, DefaultSetting, RewriteOutcome, Scope, Table, ValueStyle};
use crate::apps::AppId;
use crate::palette::ColorPalette;

const GENERAL: Scope = Scope::Block(&["general"]);
const DECORATION: Scope = Scope::Block(&["decoration"]);
const BLUR: Scope = Scope::Block(&["decoration", "blur"]);

const COLORS: &[ColorSetting] = &[
    ColorSetting::new(
        GENERAL,
        "col.active_border",
        &["primary", "accent"],
        ValueStyle::PackedRgba(0.8),
    ),
    ColorSetting::new(
        GENERAL,
        "col.inactive_border",
        &["neutral_60", "outline", "secondary"],
        ValueStyle::PackedRgba(0.6),
    ),
    ColorSetting::new(
        GENERAL,
        "col.group_border",
        &["secondary"],
        ValueStyle::PackedRgba(0.7),
    )
    .replace_only(),
    ColorSetting::new(
        GENERAL,
        "col.group_border_active",
        &["accent", "primary"],
        ValueStyle::PackedRgba(0.9),
    )
    .replace_only(),
    ColorSetting::new(
        DECORATION,
        "col.shadow",
        &["neutral_90", "neutral_10"],
        ValueStyle::PackedRgba(0.3),
    ),
];

const DEFAULTS: &[DefaultSetting] = &[
    DefaultSetting::new(DECORATION, "rounding", "12"),
    DefaultSetting::new(BLUR, "enabled", "true"),
    DefaultSetting::new(BLUR, "size", "8"),
    DefaultSetting::new(BLUR, "passes", "3"),
    DefaultSetting::new(BLUR, "noise", "0.02"),
    DefaultSetting::new(BLUR, "contrast", "1.1"),
    DefaultSetting::new(BLUR, "brightness", "1.0"),
    DefaultSetting::new(DECORATION, "drop_shadow", "true"),
    DefaultSetting::new(DECORATION, "shadow_range", "8"),
    DefaultSetting::new(DECORATION, "shadow_render_power", "2"),
    DefaultSetting::new(DECORATION, "shadow_offset", "2 2"),
    DefaultSetting::new(DECORATION, "active_opacity", "1.0"),
    DefaultSetting::new(DECORATION, "inactive_opacity", "0.95"),
    DefaultSetting::new(DECORATION, "fullscreen_opacity", "1.0"),
];

const TABLE: Table = Table {
    syntax: Syntax::HYPRLAND,
    colors: COLORS,
    defaults: DEFAULTS,
};

/// Border and shadow colors as packed `rgba(rrggbbaa)`, plus decoration defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct HyprlandRewriter;

impl ThemeRewriter for HyprlandRewriter {
    fn app(&self) -> AppId {
        AppId::Hyprland
    }

    fn rewrite(&self, text: &str, palette: &ColorPalette) -> RewriteOutcome {
        TABLE.rewrite(text, palette)
    }
}
