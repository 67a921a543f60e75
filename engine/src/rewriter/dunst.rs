use super::ThemeRewriter;
use super::scope::Syntax;
use super::table::{ColorSetting, DefaultSetting, RewriteOutcome, Scope, Table, ValueStyle};
use crate::apps::AppId;
use crate::palette::ColorPalette;

const GLOBAL: Scope = Scope::Section("global");
const LOW: Scope = Scope::Section("urgency_low");
const NORMAL: Scope = Scope::Section("urgency_normal");
const CRITICAL: Scope = Scope::Section("urgency_critical");

const fn quoted(scope: Scope, key: &'static str, roles: &'static [&'static str]) -> ColorSetting {
    ColorSetting::new(scope, key, roles, ValueStyle::QuotedHex)
}

const COLORS: &[ColorSetting] = &[
    quoted(GLOBAL, "background", &["surface"]),
    quoted(GLOBAL, "foreground", &["on_surface"]),
    quoted(GLOBAL, "frame_color", &["primary_60", "primary"]),
    quoted(LOW, "background", &["surface"]),
    quoted(LOW, "foreground", &["on_surface"]),
    quoted(LOW, "frame_color", &["neutral_60", "secondary"]),
    quoted(NORMAL, "background", &["surface"]),
    quoted(NORMAL, "foreground", &["on_surface"]),
    quoted(NORMAL, "frame_color", &["primary"]),
    quoted(CRITICAL, "background", &["error_container", "error"]),
    quoted(CRITICAL, "foreground", &["on_error_container", "on_error"]),
    quoted(CRITICAL, "frame_color", &["error"]),
];

const DEFAULTS: &[DefaultSetting] = &[
    DefaultSetting::new(GLOBAL, "corner_radius", "12"),
    DefaultSetting::new(GLOBAL, "frame_width", "2"),
    DefaultSetting::new(GLOBAL, "gap_size", "8"),
    DefaultSetting::new(GLOBAL, "offset", "8x8"),
    DefaultSetting::new(GLOBAL, "transparency", "10"),
    DefaultSetting::new(GLOBAL, "font", "JetBrains Mono 11"),
];

const TABLE: Table = Table {
    syntax: Syntax::INI,
    colors: COLORS,
    defaults: DEFAULTS,
};

/// Colors per urgency section, always written quoted as dunst expects.
#[derive(Debug, Clone, Copy, Default)]
pub struct DunstRewriter;

impl ThemeRewriter for DunstRewriter {
    fn app(&self) -> AppId {
        AppId::Dunst
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
            .with("surface", "#F7F2FA")
            .with("on_surface", "#1C1B1F")
            .with("primary", "#6750A4")
            .with("error", "#B3261E")
    }

    #[test]
    fn test_section_scoped_replacement() {
        let text = "\
[urgency_low]
    background = \"#222222\"
    timeout = 10

[urgency_normal]
    background = \"#222222\"
    timeout = 10
";
        let out = DunstRewriter.rewrite(text, &palette()).text;
        let low = &out[..out.find("[urgency_normal]").unwrap()];
        let normal = &out[out.find("[urgency_normal]").unwrap()..];
        assert!(low.contains("background = \"#F7F2FA\""));
        assert!(normal.contains("background = \"#F7F2FA\""));
        assert!(normal.contains("frame_color = \"#6750A4\""));
        assert!(!low.contains("#6750A4"));
        assert!(out.contains("[urgency_critical]\n"));
    }

    #[test]
    fn test_unquoted_values_are_quoted() {
        let out = DunstRewriter
            .rewrite("[global]\n    frame_color = #aaaaaa\n", &palette())
            .text;
        assert!(out.contains("    frame_color = \"#6750A4\"\n"));
    }

    #[test]
    fn test_global_defaults_fill_gaps_only() {
        let text = "[global]\n    font = Monospace 8\n    offset = 10x50\n";
        let out = DunstRewriter.rewrite(text, &ColorPalette::new()).text;
        assert!(out.contains("font = Monospace 8"));
        assert!(!out.contains("JetBrains"));
        assert!(out.contains("offset = 10x50"));
        assert!(out.contains("    corner_radius = 12\n"));
        assert!(out.contains("    gap_size = 8\n"));
    }

    #[test]
    fn test_defaults_do_not_create_global() {
        let text = "[urgency_low]\n    timeout = 10\n";
        let out = DunstRewriter.rewrite(text, &ColorPalette::new()).text;
        assert_eq!(out, text);
    }
}
