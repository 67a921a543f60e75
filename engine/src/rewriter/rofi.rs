use super::ThemeRewriter;
use super::scope::Syntax;
use super::table::{ColorSetting, DefaultSetting, RewriteOutcome, Scope, Table, ValueStyle};
use crate::apps::AppId;
use crate::palette::ColorPalette;

const ALL: Scope = Scope::Block(&["*"]);
const WINDOW: Scope = Scope::Block(&["window"]);

const fn hex(key: &'static str, roles: &'static [&'static str]) -> ColorSetting {
    ColorSetting::new(ALL, key, roles, ValueStyle::Hex)
}

const COLORS: &[ColorSetting] = &[
    hex("background", &["surface"]),
    hex("foreground", &["on_surface"]),
    hex("selected-normal-background", &["primary"]),
    hex("selected-normal-foreground", &["on_primary"]),
    hex("alternate-normal-background", &["surface_variant", "surface"]),
    hex("alternate-normal-foreground", &["on_surface"]),
    hex("urgent-background", &["error"]),
    hex("urgent-foreground", &["on_error"]),
    hex("active-background", &["accent", "primary"]),
    hex("active-foreground", &["on_primary"]),
    hex("border-color", &["primary_60", "primary"]),
    hex("separatorcolor", &["neutral_80", "outline"]),
];

const DEFAULTS: &[DefaultSetting] = &[DefaultSetting::new(WINDOW, "border-radius", "12px")];

const TABLE: Table = Table {
    syntax: Syntax::RASI,
    colors: COLORS,
    defaults: DEFAULTS,
};

/// Theme variables in the `* { }` block.
#[derive(Debug, Clone, Copy, Default)]
pub struct RofiRewriter;

impl ThemeRewriter for RofiRewriter {
    fn app(&self) -> AppId {
        AppId::Rofi
    }

    fn rewrite(&self, text: &str, palette: &ColorPalette) -> RewriteOutcome {
        TABLE.rewrite(text, palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_the_star_block_is_themed() {
        let text = "\
configuration {
    modi: \"drun,run\";
    font: \"JetBrains Mono 12\";
}

* {
    background: #000000; // old
    foreground: #ffffff;
}

element selected {
    background-color: @selected-normal-background;
}
";
        let palette = ColorPalette::new()
            .with("surface", "#F7F2FA")
            .with("primary", "#6750A4");
        let out = RofiRewriter.rewrite(text, &palette).text;
        assert!(out.contains("    background: #F7F2FA; // old\n"));
        assert!(out.contains("    foreground: #ffffff;\n"));
        assert!(out.contains("    selected-normal-background: #6750A4;\n"));
        assert!(out.contains("    border-color: #6750A4;\n"));
        assert!(out.contains("    modi: \"drun,run\";\n"));
        assert!(out.contains("element selected {\n    background-color: @selected-normal-background;\n}"));
        assert!(!out.contains("border-radius"));
    }

    #[test]
    fn test_import_line_before_star_block() {
        let text = "@import \"colors.rasi\"\n* {\n    background: #000000;\n}\n";
        let palette = ColorPalette::new().with("surface", "#F7F2FA");
        let out = RofiRewriter.rewrite(text, &palette).text;
        assert_eq!(
            out,
            "@import \"colors.rasi\"\n* {\n    background: #F7F2FA;\n}\n"
        );
    }

    #[test]
    fn test_trailing_theme_line_stays_idempotent() {
        let text = "configuration {\n    modi: \"drun\";\n}\n@theme \"gruvbox\"\n";
        let palette = ColorPalette::material_default();
        let once = RofiRewriter.rewrite(text, &palette);
        assert_eq!(once.text.matches("* {").count(), 1);
        assert!(once.text.starts_with(text));

        let twice = RofiRewriter.rewrite(&once.text, &palette);
        assert_eq!(twice.text, once.text);
        assert!(!twice.is_changed());
    }

    #[test]
    fn test_window_radius_default() {
        let text = "window {\n    width: 40%;\n}\n";
        let out = RofiRewriter.rewrite(text, &ColorPalette::new()).text;
        assert_eq!(out, "window {\n    width: 40%;\n    border-radius: 12px;\n}\n");

        let kept = RofiRewriter.rewrite("window { border-radius: 0; }\n", &ColorPalette::new());
        assert!(!kept.is_changed());
    }
}
