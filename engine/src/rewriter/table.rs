//! Static setting tables and the find-or-insert loop that applies them.

use super::scope::{Document, ScanError, Separator, Span, Syntax, preserve_quotes};
use crate::palette::{ColorError, ColorPalette, hex_to_css_rgba, hex_to_rgba_packed};
use serde::Serialize;

/// Where a setting lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Top level of the file.
    Root,
    /// Block addressed by header path from the top level.
    Block(&'static [&'static str]),
    /// INI section.
    Section(&'static str),
    /// Any depth; only meaningful for replace-only settings.
    Anywhere,
}

impl Scope {
    fn describe(self) -> String {
        match self {
            Scope::Root => "<root>".to_string(),
            Scope::Block(path) => path.join(" > "),
            Scope::Section(name) => format!("[{name}]"),
            Scope::Anywhere => "<any>".to_string(),
        }
    }
}

/// How a palette hex is written into the file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueStyle {
    /// `#RRGGBB` as given.
    Hex,
    /// `"#RRGGBB"`.
    QuotedHex,
    /// `rgba(rrggbbaa)`.
    PackedRgba(f32),
    /// `rgba(r, g, b, a)`.
    CssRgba(f32),
}

impl ValueStyle {
    pub fn format(self, hex: &str) -> Result<String, ColorError> {
        match self {
            ValueStyle::Hex => Ok(hex.to_string()),
            ValueStyle::QuotedHex => Ok(format!("\"{hex}\"")),
            ValueStyle::PackedRgba(alpha) => Ok(format!("rgba({})", hex_to_rgba_packed(hex, alpha)?)),
            ValueStyle::CssRgba(alpha) => hex_to_css_rgba(hex, alpha),
        }
    }
}

/// What to do when a setting is not present in its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    /// Insert, creating the block or section when needed.
    Insert,
    /// Insert only when the block or section already exists.
    InsertInExisting,
    /// Replace-only.
    Skip,
}

/// One color-receiving setting.
#[derive(Debug, Clone, Copy)]
pub struct ColorSetting {
    pub scope: Scope,
    pub key: &'static str,
    /// Palette roles in order of preference.
    pub roles: &'static [&'static str],
    pub style: ValueStyle,
    pub missing: Missing,
    /// Overrides the format's separator, e.g. `@define-color name value`.
    pub separator: Option<Separator>,
}

impl ColorSetting {
    pub const fn new(
        scope: Scope,
        key: &'static str,
        roles: &'static [&'static str],
        style: ValueStyle,
    ) -> Self {
        Self {
            scope,
            key,
            roles,
            style,
            missing: Missing::Insert,
            separator: None,
        }
    }

    pub const fn replace_only(mut self) -> Self {
        self.missing = Missing::Skip;
        self
    }

    pub const fn in_existing_scope(mut self) -> Self {
        self.missing = Missing::InsertInExisting;
        self
    }

    pub const fn separated_by(mut self, separator: Separator) -> Self {
        self.separator = Some(separator);
        self
    }
}

/// A look-and-feel value merged only when the key is entirely absent.
///
/// Defaults never create their top-level block or section; nested blocks
/// below an existing one are created as needed.
#[derive(Debug, Clone, Copy)]
pub struct DefaultSetting {
    pub scope: Scope,
    pub key: &'static str,
    pub value: &'static str,
}

impl DefaultSetting {
    pub const fn new(scope: Scope, key: &'static str, value: &'static str) -> Self {
        Self { scope, key, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Replaced,
    Inserted,
}

/// One edit made by a rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingChange {
    pub scope: String,
    pub key: String,
    pub old: Option<String>,
    pub new: String,
    pub role: Option<String>,
    pub kind: ChangeKind,
}

/// Result of rewriting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub text: String,
    pub changes: Vec<SettingChange>,
    /// Why a flat whole-file rewrite was used, if it was.
    pub degraded: Option<String>,
}

impl RewriteOutcome {
    pub fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            changes: Vec::new(),
            degraded: None,
        }
    }

    pub fn is_changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Indentation of top-level statements, used for empty sections.
fn fallback_indent(doc: &Document<'_>) -> String {
    doc.content_indent(doc.root()).unwrap_or_default().to_string()
}

enum Resolution {
    Found(Span),
    MissingBlock { parent: Span, name: &'static str, index: usize },
    MissingSection(&'static str),
    /// A plain assignment shares the name of a block that would be created.
    Shadowed,
}

/// Setting tables for one configuration format.
#[derive(Debug, Clone, Copy)]
pub struct Table {
    pub syntax: Syntax,
    pub colors: &'static [ColorSetting],
    pub defaults: &'static [DefaultSetting],
}

impl Table {
    pub fn rewrite(&self, text: &str, palette: &ColorPalette) -> RewriteOutcome {
        let degraded = Document::parse(text, self.syntax)
            .err()
            .map(|e: ScanError| e.to_string());
        if let Some(reason) = &degraded {
            log::warn!("Falling back to flat rewrite: {reason}");
        }

        let flat = degraded.is_some();
        let mut current = text.to_string();
        let mut changes = Vec::new();

        for setting in self.colors {
            let Some((role, hex)) = palette.first_of(setting.roles) else {
                log::debug!("No palette role for {}, leaving it untouched", setting.key);
                continue;
            };
            let value = match setting.style.format(hex) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("Cannot format {role} ({hex}) for {}: {e}", setting.key);
                    continue;
                }
            };
            current = self.apply_color(current, setting, role, &value, flat, &mut changes);
        }

        if !flat {
            for default in self.defaults {
                current = self.apply_default(current, default, &mut changes);
            }
        }

        RewriteOutcome {
            text: current,
            changes,
            degraded,
        }
    }

    /// Root-level name of a block setting in formats with categories.
    fn category_key(&self, scope: Scope, key: &str) -> Option<String> {
        let separator = self.syntax.category?;
        match scope {
            Scope::Block(path) => Some(format!("{}{separator}{key}", path.join(separator))),
            _ => None,
        }
    }

    fn document<'t>(&self, text: &'t str, flat: bool) -> Document<'t> {
        if flat {
            return Document::flat(text, self.syntax);
        }
        Document::parse(text, self.syntax).unwrap_or_else(|_| Document::flat(text, self.syntax))
    }

    fn resolve(&self, doc: &Document<'_>, scope: Scope, flat: bool) -> Resolution {
        if flat {
            return Resolution::Found(doc.root());
        }
        match scope {
            Scope::Root | Scope::Anywhere => Resolution::Found(doc.root()),
            Scope::Section(name) => match doc.section(name) {
                Some(span) => Resolution::Found(span),
                None => Resolution::MissingSection(name),
            },
            Scope::Block(path) => {
                let mut current = doc.root();
                for (index, name) in path.iter().copied().enumerate() {
                    match doc.find_block(current, name) {
                        Some(block) => current = block.body(),
                        None if doc.has_key(current, name, self.syntax.separator) => {
                            return Resolution::Shadowed;
                        }
                        None => {
                            return Resolution::MissingBlock {
                                parent: current,
                                name,
                                index,
                            };
                        }
                    }
                }
                Resolution::Found(current)
            }
        }
    }

    /// Create missing blocks or sections of `scope` until it resolves.
    ///
    /// Path elements before `create_from` are never created. Returns the
    /// original text as `Err` when the scope cannot be made available.
    fn ensure_scope(
        &self,
        mut text: String,
        scope: Scope,
        flat: bool,
        create_from: usize,
    ) -> Result<String, String> {
        let attempts = match scope {
            Scope::Block(path) => path.len() + 1,
            _ => 2,
        };

        for _ in 0..attempts {
            let created = {
                let doc = self.document(&text, flat);
                match self.resolve(&doc, scope, flat) {
                    Resolution::Found(_) => None,
                    Resolution::Shadowed => {
                        log::debug!(
                            "{} is set as a plain value, not creating a block",
                            scope.describe()
                        );
                        Some(None)
                    }
                    Resolution::MissingSection(name) if create_from == 0 => {
                        Some(Some(doc.append_section(name)))
                    }
                    Resolution::MissingSection(_) => Some(None),
                    Resolution::MissingBlock {
                        parent,
                        name,
                        index,
                    } if index >= create_from => Some(Some(doc.insert_block_named(parent, name))),
                    Resolution::MissingBlock { .. } => Some(None),
                }
            };

            match created {
                None => return Ok(text),
                Some(None) => return Err(text),
                Some(Some(next)) => text = next,
            }
        }

        log::warn!("Could not create scope {}", scope.describe());
        Err(text)
    }

    fn apply_color(
        &self,
        text: String,
        setting: &ColorSetting,
        role: &str,
        value: &str,
        flat: bool,
        changes: &mut Vec<SettingChange>,
    ) -> String {
        let separator = setting.separator.unwrap_or(self.syntax.separator);
        let anywhere = setting.scope == Scope::Anywhere;

        // Replace first; only a missing setting may create its scope.
        let replaced = {
            let doc = self.document(&text, flat);
            let mut found = match self.resolve(&doc, setting.scope, flat) {
                Resolution::Found(span) => doc.assignments(span, setting.key, separator, anywhere),
                _ => Vec::new(),
            };
            if let Some(key) = self.category_key(setting.scope, setting.key) {
                found.extend(doc.assignments(doc.root(), &key, separator, false));
                found.sort_by_key(|a| a.start);
            }
            let current = found
                .iter()
                .all(|a| preserve_quotes(doc.value_text(a), value) == doc.value_text(a));
            match found.first() {
                None => None,
                Some(_) if current => Some(None),
                Some(first) => Some(Some((
                    doc.replace_values(&found, value),
                    doc.value_text(first).to_string(),
                ))),
            }
        };

        match replaced {
            Some(None) => return text,
            Some(Some((next, old))) => {
                changes.push(SettingChange {
                    scope: setting.scope.describe(),
                    key: setting.key.to_string(),
                    old: Some(old),
                    new: value.to_string(),
                    role: Some(role.to_string()),
                    kind: ChangeKind::Replaced,
                });
                return next;
            }
            None => {}
        }

        if setting.missing == Missing::Skip || anywhere {
            return text;
        }

        let create_from = match setting.missing {
            Missing::InsertInExisting => usize::MAX,
            _ => 0,
        };
        let text = match self.ensure_scope(text, setting.scope, flat, create_from) {
            Ok(text) => text,
            Err(text) => return text,
        };

        let doc = self.document(&text, flat);
        let Resolution::Found(span) = self.resolve(&doc, setting.scope, flat) else {
            return text.clone();
        };
        let statement = self.syntax.statement(setting.key, separator, value);
        let next = doc.insert(span, |_| statement.clone(), &fallback_indent(&doc));
        changes.push(SettingChange {
            scope: setting.scope.describe(),
            key: setting.key.to_string(),
            old: None,
            new: value.to_string(),
            role: Some(role.to_string()),
            kind: ChangeKind::Inserted,
        });
        next
    }

    fn apply_default(
        &self,
        text: String,
        default: &DefaultSetting,
        changes: &mut Vec<SettingChange>,
    ) -> String {
        if let Some(key) = self.category_key(default.scope, default.key) {
            let doc = self.document(&text, false);
            if doc.has_key(doc.root(), &key, self.syntax.separator) {
                return text;
            }
        }

        let text = match self.ensure_scope(text, default.scope, false, 1) {
            Ok(text) => text,
            Err(text) => return text,
        };

        let doc = self.document(&text, false);
        let Resolution::Found(span) = self.resolve(&doc, default.scope, false) else {
            return text.clone();
        };
        if doc.has_key(span, default.key, self.syntax.separator) {
            return text.clone();
        }

        let statement = self
            .syntax
            .statement(default.key, self.syntax.separator, default.value);
        let next = doc.insert(span, |_| statement.clone(), &fallback_indent(&doc));
        changes.push(SettingChange {
            scope: default.scope.describe(),
            key: default.key.to_string(),
            old: None,
            new: default.value.to_string(),
            role: None,
            kind: ChangeKind::Inserted,
        });
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLORS: &[ColorSetting] = &[
        ColorSetting::new(
            Scope::Block(&["decoration"]),
            "col.active_border",
            &["primary"],
            ValueStyle::PackedRgba(0.8),
        ),
        ColorSetting::new(
            Scope::Block(&["decoration"]),
            "col.shadow",
            &["missing_role"],
            ValueStyle::PackedRgba(0.3),
        ),
    ];

    const DEFAULTS: &[DefaultSetting] = &[
        DefaultSetting::new(Scope::Block(&["decoration"]), "rounding", "12"),
        DefaultSetting::new(Scope::Block(&["decoration", "blur"]), "enabled", "true"),
        DefaultSetting::new(Scope::Block(&["misc"]), "vfr", "true"),
    ];

    const TABLE: Table = Table {
        syntax: Syntax::HYPRLAND,
        colors: COLORS,
        defaults: DEFAULTS,
    };

    fn palette() -> ColorPalette {
        ColorPalette::new().with("primary", "#6750A4")
    }

    #[test]
    fn test_replaces_inside_block_and_merges_defaults() {
        let text = "decoration {\n    rounding = 4\n    col.active_border = rgba(ffffffff) # old\n}\n";
        let outcome = TABLE.rewrite(text, &palette());
        assert_eq!(
            outcome.text,
            "decoration {\n    rounding = 4\n    col.active_border = rgba(6750a4cc) # old\n    blur {\n        enabled = true\n    }\n}\n"
        );
        assert_eq!(outcome.degraded, None);
        assert_eq!(outcome.changes[0].old.as_deref(), Some("rgba(ffffffff)"));
        assert_eq!(outcome.changes[0].kind, ChangeKind::Replaced);
    }

    #[test]
    fn test_creates_missing_block_but_not_default_only_blocks() {
        let outcome = TABLE.rewrite("general {\n    gaps_in = 5\n}\n", &palette());
        assert!(outcome.text.starts_with("general {\n    gaps_in = 5\n}\n\ndecoration {\n"));
        assert!(outcome.text.contains("    col.active_border = rgba(6750a4cc)\n"));
        assert!(outcome.text.contains("    rounding = 12\n"));
        assert!(!outcome.text.contains("misc"));
    }

    #[test]
    fn test_plain_value_blocks_nested_default() {
        let text = "decoration {\n    blur = false\n}\n";
        let outcome = TABLE.rewrite(text, &palette());
        assert!(!outcome.text.contains("blur {"));
        assert!(outcome.text.contains("blur = false"));
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let once = TABLE.rewrite("decoration {\n}\n", &palette());
        let twice = TABLE.rewrite(&once.text, &palette());
        assert_eq!(once.text, twice.text);
        assert!(!twice.is_changed());
    }

    #[test]
    fn test_unbalanced_braces_degrade_to_flat() {
        let text = "decoration {\n    col.active_border = rgba(ffffffff)\n";
        let outcome = TABLE.rewrite(text, &palette());
        assert!(outcome.degraded.is_some());
        assert!(outcome.text.contains("col.active_border = rgba(6750a4cc)"));
        assert!(!outcome.text.contains("rounding"));
    }

    #[test]
    fn test_missing_roles_leave_settings_untouched() {
        let outcome = TABLE.rewrite("decoration {\n    col.shadow = rgba(00000000)\n}\n", &ColorPalette::new());
        assert!(outcome.text.contains("col.shadow = rgba(00000000)"));
    }

    #[test]
    fn test_category_form_counts_as_the_block_setting() {
        let text = "decoration:col.active_border = rgba(ffffffff)\ndecoration:rounding = 4\n";
        let outcome = TABLE.rewrite(text, &palette());
        assert_eq!(
            outcome.text,
            "decoration:col.active_border = rgba(6750a4cc)\ndecoration:rounding = 4\n"
        );
        assert_eq!(outcome.changes.len(), 1);
        assert_eq!(outcome.changes[0].kind, ChangeKind::Replaced);

        let twice = TABLE.rewrite(&outcome.text, &palette());
        assert!(!twice.is_changed());
    }

    #[test]
    fn test_value_styles() {
        assert_eq!(ValueStyle::Hex.format("#6750A4").unwrap(), "#6750A4");
        assert_eq!(ValueStyle::QuotedHex.format("#6750A4").unwrap(), "\"#6750A4\"");
        assert_eq!(ValueStyle::PackedRgba(0.8).format("#6750A4").unwrap(), "rgba(6750a4cc)");
        assert_eq!(
            ValueStyle::CssRgba(0.9).format("#6750A4").unwrap(),
            "rgba(103, 80, 164, 0.9)"
        );
        assert!(ValueStyle::CssRgba(0.9).format("6750A4").is_err());
    }
}
