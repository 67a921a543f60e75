use super::ThemeRewriter;
use super::scope::Syntax;
use super::table::{ColorSetting, RewriteOutcome, Scope, Table, ValueStyle};
use crate::apps::AppId;
use crate::palette::ColorPalette;

const COLORS: &[ColorSetting] = &[
    ColorSetting::new(Scope::Root, "background", &["background", "surface"], ValueStyle::Hex),
    ColorSetting::new(
        Scope::Root,
        "foreground",
        &["on_background", "on_surface"],
        ValueStyle::Hex,
    ),
    ColorSetting::new(Scope::Root, "cursor", &["primary"], ValueStyle::Hex),
    ColorSetting::new(
        Scope::Root,
        "selection_background",
        &["primary_80", "primary"],
        ValueStyle::Hex,
    ),
    ColorSetting::new(Scope::Root, "url_color", &["accent", "primary"], ValueStyle::Hex),
];

const TABLE: Table = Table {
    syntax: Syntax::KITTY,
    colors: COLORS,
    defaults: &[],
};

#[derive(Debug, Clone, Copy, Default)]
pub struct KittyRewriter;

impl ThemeRewriter for KittyRewriter {
    fn app(&self) -> AppId {
        AppId::Kitty
    }

    fn rewrite(&self, text: &str, palette: &ColorPalette) -> RewriteOutcome {
        TABLE.rewrite(text, palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_stands_in_for_missing_background() {
        let palette = ColorPalette::new()
            .with("primary", "#6750A4")
            .with("surface", "#F7F2FA")
            .with("on_surface", "#1C1B1F");
        let out = KittyRewriter.rewrite("background #000000\n", &palette).text;
        assert_eq!(
            out,
            "background #F7F2FA\nforeground #1C1B1F\ncursor #6750A4\nselection_background #6750A4\nurl_color #6750A4\n"
        );
    }

    #[test]
    fn test_comments_and_other_settings_are_untouched() {
        let text = "# background #ffffff\nfont_family JetBrains Mono\nbackground   #000000\nbackground_opacity 0.9\n";
        let palette = ColorPalette::new().with("background", "#FFFBFE");
        let outcome = KittyRewriter.rewrite(text, &palette);
        assert_eq!(
            outcome.text,
            "# background #ffffff\nfont_family JetBrains Mono\nbackground   #FFFBFE\nbackground_opacity 0.9\n"
        );
        assert_eq!(outcome.changes.len(), 1);
    }
}
