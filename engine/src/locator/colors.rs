//! Color literal extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static COLOR_LITERALS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"#[0-9a-fA-F]{3,8}\b",
        r"rgba?\s*\([^)]*\)",
        r"hsla?\s*\([^)]*\)",
        r"var\(--[^)]+\)",
        r"\b0x[0-9a-fA-F]{8}\b",
    ]
    .iter()
    .filter_map(|pattern| match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::error!("Invalid color literal pattern {pattern}: {e}");
            None
        }
    })
    .collect()
});

/// Distinct color literals in `text`: hex, `rgb()`/`rgba()`, `hsl()`/`hsla()`,
/// `var(--...)` and `0xAARRGGBB`.
pub fn color_literals(text: &str) -> BTreeSet<String> {
    COLOR_LITERALS
        .iter()
        .flat_map(|regex| regex.find_iter(text))
        .map(|m| m.as_str().to_string())
        .collect()
}
