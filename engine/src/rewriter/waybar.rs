use super::ThemeRewriter;
use super::scope::{Separator, Syntax};
use super::table::{ColorSetting, RewriteOutcome, Scope, Table, ValueStyle};
use crate::apps::AppId;
use crate::palette::ColorPalette;

const WINDOW: Scope = Scope::Block(&["window#waybar"]);
const FOCUSED: Scope = Scope::Block(&["#workspaces button.focused"]);
const ACTIVE: Scope = Scope::Block(&["#workspaces button.active"]);
const URGENT: Scope = Scope::Block(&["#workspaces button.urgent"]);

const fn variable(key: &'static str, roles: &'static [&'static str]) -> ColorSetting {
    ColorSetting::new(Scope::Anywhere, key, roles, ValueStyle::Hex).replace_only()
}

const fn define_color(key: &'static str, roles: &'static [&'static str]) -> ColorSetting {
    ColorSetting::new(Scope::Root, key, roles, ValueStyle::Hex)
        .separated_by(Separator::Whitespace)
        .replace_only()
}

const COLORS: &[ColorSetting] = &[
    variable("--primary", &["primary"]),
    variable("--secondary", &["secondary"]),
    variable("--background", &["surface"]),
    variable("--text", &["on_surface"]),
    variable("--accent", &["accent", "primary"]),
    variable("--workspace-active", &["primary"]),
    variable("--workspace-inactive", &["neutral_60", "outline"]),
    variable("--urgent", &["error"]),
    variable("--warning", &["warning"]),
    define_color("@define-color background", &["surface"]),
    define_color("@define-color foreground", &["on_surface"]),
    define_color("@define-color primary", &["primary"]),
    define_color("@define-color secondary", &["secondary"]),
    define_color("@define-color accent", &["accent", "primary"]),
    define_color("@define-color urgent", &["error"]),
    define_color("@define-color warning", &["warning"]),
    ColorSetting::new(WINDOW, "background-color", &["surface"], ValueStyle::CssRgba(0.9))
        .in_existing_scope(),
    ColorSetting::new(WINDOW, "background", &["surface"], ValueStyle::CssRgba(0.9)).replace_only(),
    ColorSetting::new(WINDOW, "color", &["on_surface"], ValueStyle::Hex).in_existing_scope(),
    ColorSetting::new(FOCUSED, "background-color", &["primary"], ValueStyle::Hex).replace_only(),
    ColorSetting::new(FOCUSED, "background", &["primary"], ValueStyle::Hex).replace_only(),
    ColorSetting::new(ACTIVE, "background-color", &["primary"], ValueStyle::Hex).replace_only(),
    ColorSetting::new(ACTIVE, "background", &["primary"], ValueStyle::Hex).replace_only(),
    ColorSetting::new(URGENT, "background-color", &["error"], ValueStyle::Hex).replace_only(),
    ColorSetting::new(URGENT, "background", &["error"], ValueStyle::Hex).replace_only(),
];

const TABLE: Table = Table {
    syntax: Syntax::CSS,
    colors: COLORS,
    defaults: &[],
};

/// Waybar styles: existing variables and the bar's own selectors.
///
/// Waybar setups are spread over module files, so nothing is created that
/// is not already there except properties of an existing `window#waybar`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaybarRewriter;

impl ThemeRewriter for WaybarRewriter {
    fn app(&self) -> AppId {
        AppId::Waybar
    }

    fn rewrite(&self, text: &str, palette: &ColorPalette) -> RewriteOutcome {
        TABLE.rewrite(text, palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> ColorPalette {
        ColorPalette::new()
            .with("primary", "#6750A4")
            .with("surface", "#F7F2FA")
            .with("on_surface", "#1C1B1F")
            .with("error", "#B3261E")
    }

    #[test]
    fn test_window_background_uses_translucent_rgba() {
        let text = "window#waybar {\n    background-color: rgba(43, 48, 59, 0.5);\n    border-bottom: 3px solid #ffffff;\n}\n";
        let out = WaybarRewriter.rewrite(text, &palette()).text;
        assert_eq!(
            out,
            "window#waybar {\n    background-color: rgba(247, 242, 250, 0.9);\n    border-bottom: 3px solid #ffffff;\n    color: #1C1B1F;\n}\n"
        );
    }

    #[test]
    fn test_variables_are_replaced_wherever_they_are() {
        let text = "\
@define-color primary #ff0000;
@define-color unrelated #123456;
:root {
    --primary: #ff0000;
    --text: white;
}
";
        let out = WaybarRewriter.rewrite(text, &palette()).text;
        assert!(out.contains("@define-color primary #6750A4;"));
        assert!(out.contains("@define-color unrelated #123456;"));
        assert!(out.contains("    --primary: #6750A4;"));
        assert!(out.contains("    --text: #1C1B1F;"));
        assert!(!out.contains("--background"));
    }

    #[test]
    fn test_module_files_gain_nothing_new() {
        let text = "#clock {\n    padding: 0 10px;\n    color: #ffffff;\n}\n";
        let outcome = WaybarRewriter.rewrite(text, &palette());
        assert_eq!(outcome.text, text);
        assert!(!outcome.is_changed());
    }

    #[test]
    fn test_workspace_buttons() {
        let text = "#workspaces button.focused {\n    background: #64727D;\n}\n#workspaces button.urgent {\n    background-color: #eb4d4b;\n}\n";
        let out = WaybarRewriter.rewrite(text, &palette()).text;
        assert!(out.contains("button.focused {\n    background: #6750A4;\n}"));
        assert!(out.contains("button.urgent {\n    background-color: #B3261E;\n}"));
    }
}
