use super::ThemeRewriter;
use super::scope::{Separator, Syntax};
use super::table::{ColorSetting, RewriteOutcome, Scope, Table, ValueStyle};
use crate::apps::AppId;
use crate::palette::ColorPalette;

const fn define_color(key: &'static str, roles: &'static [&'static str]) -> ColorSetting {
    ColorSetting::new(Scope::Root, key, roles, ValueStyle::Hex).separated_by(Separator::Whitespace)
}

// libadwaita named colors
const COLORS: &[ColorSetting] = &[
    define_color("@define-color accent_color", &["primary"]),
    define_color("@define-color accent_bg_color", &["primary"]),
    define_color("@define-color accent_fg_color", &["on_primary"]),
    define_color("@define-color window_bg_color", &["background", "surface"]),
    define_color("@define-color window_fg_color", &["on_background", "on_surface"]),
    define_color("@define-color view_bg_color", &["surface", "background"]),
    define_color("@define-color view_fg_color", &["on_surface", "on_background"]),
    define_color("@define-color headerbar_bg_color", &["surface_variant", "surface"]),
    define_color("@define-color headerbar_fg_color", &["on_surface_variant", "on_surface"]),
    define_color("@define-color card_bg_color", &["surface_variant", "surface"]),
    define_color("@define-color popover_bg_color", &["surface"]),
    define_color("@define-color destructive_color", &["error"]),
    define_color("@define-color error_color", &["error"]),
    define_color("@define-color warning_color", &["warning"]),
    define_color("@define-color success_color", &["success"]),
];

const TABLE: Table = Table {
    syntax: Syntax::CSS,
    colors: COLORS,
    defaults: &[],
};

/// Named colors for GTK 3/4; the target file is created when missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GtkRewriter;

impl ThemeRewriter for GtkRewriter {
    fn app(&self) -> AppId {
        AppId::Gtk
    }

    fn rewrite(&self, text: &str, palette: &ColorPalette) -> RewriteOutcome {
        TABLE.rewrite(text, palette)
    }
}
