use engine::palette::ColorPalette;
use engine::rewriter::{ChangeKind, DunstRewriter, HyprlandRewriter, RofiRewriter, ThemeRewriter};

fn palette() -> ColorPalette {
    ColorPalette::new()
        .with("primary", "#6750A4")
        .with("surface", "#F7F2FA")
        .with("on_surface", "#1D1B20")
}

#[test]
fn test_only_the_targeted_section_changes() {
    let text = "\
[global]
    font = Monospace 8

[urgency_normal]
    background = \"#000000\"

[my_rule]
    background = \"#000000\"
";
    let outcome = DunstRewriter.rewrite(text, &palette());

    let rule = outcome.text.split("[my_rule]").nth(1).unwrap();
    let rule = rule.split("\n[").next().unwrap();
    assert_eq!(rule.trim_end(), "\n    background = \"#000000\"");
    assert!(
        outcome
            .text
            .contains("[urgency_normal]\n    background = \"#F7F2FA\"\n")
    );
    assert!(outcome.changes.iter().all(|c| c.scope != "[my_rule]"));
}

#[test]
fn test_nested_block_is_addressed_by_path() {
    let text = "\
decoration {
    blur {
        size = 3
    }
}
misc {
    blur {
        size = 3
    }
}
";
    let outcome = HyprlandRewriter.rewrite(text, &palette());
    let (decoration, misc) = outcome.text.split_once("misc {").unwrap();

    assert!(decoration.contains("        size = 3\n"));
    assert!(decoration.contains("        passes = 3\n"));
    assert!(misc.starts_with("\n    blur {\n        size = 3\n    }\n}\n"));
    assert!(
        outcome
            .changes
            .iter()
            .any(|c| c.key == "passes" && c.kind == ChangeKind::Inserted)
    );
}

#[test]
fn test_unbalanced_braces_degrade_to_flat_rewrite() {
    let text = "general {\n    col.active_border = rgba(000000ff)\n";
    let outcome = HyprlandRewriter.rewrite(text, &palette());

    assert!(outcome.degraded.is_some());
    assert!(outcome.text.contains("col.active_border = rgba(6750a4cc)"));
    assert!(!outcome.text.contains("rounding"));
}

#[test]
fn test_rofi_star_block_keeps_other_properties() {
    let text = "* {\n    font: \"JetBrains Mono 11\";\n    background: #000000;\n}\n";
    let outcome = RofiRewriter.rewrite(text, &palette());

    assert!(outcome.text.contains("    font: \"JetBrains Mono 11\";\n"));
    assert!(!outcome.text.contains("#000000"));
    assert_eq!(RofiRewriter.rewrite(&outcome.text, &palette()).text, outcome.text);
}
