//! Sorting located files into main, color-bearing and other files.

use crate::apps::{AppSpec, THEME_FILENAME_VOCABULARY};
use crate::locator::{ConfigFile, ConfigSet};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRole {
    Main,
    ColorBearing,
    Other,
}

/// Which fallback produced the target list, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// No color-bearing file; main files with color literals took their place.
    MainWithColors,
    /// Nothing carried colors; every main file is a target.
    AllMain,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub main: Vec<PathBuf>,
    pub color: Vec<PathBuf>,
    pub other: Vec<PathBuf>,
    pub fallback: Option<Fallback>,
}

impl Classification {
    /// Files a theme is applied to.
    pub fn targets(&self) -> &[PathBuf] {
        match self.fallback {
            Some(Fallback::AllMain) => &self.main,
            _ => &self.color,
        }
    }

    pub fn role_of(&self, path: &Path) -> FileRole {
        if self.color.iter().any(|p| p == path) {
            FileRole::ColorBearing
        } else if self.main.iter().any(|p| p == path) {
            FileRole::Main
        } else {
            FileRole::Other
        }
    }
}

/// Classification strategy.
///
/// Only the heuristic exists today; stricter per-format parsers can be
/// added as variants without touching the locator or the rewriters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Classifier {
    #[default]
    Heuristic,
}

impl Classifier {
    pub fn classify(&self, set: &ConfigSet) -> Classification {
        match self {
            Classifier::Heuristic => heuristic(set),
        }
    }

    /// Classify `set` and remember the result on it.
    pub fn classify_in_place(&self, set: &mut ConfigSet) -> Classification {
        let classification = self.classify(set);
        set.classification = Some(classification.clone());
        classification
    }
}

fn is_main(spec: &AppSpec, file: &ConfigFile) -> bool {
    let name = file.file_name();
    spec.canonical_names.contains(&name.as_str()) || spec.has_include_directive(&file.text)
}

fn is_color_bearing(spec: &AppSpec, file: &ConfigFile) -> bool {
    if !file.colors.is_empty() {
        return true;
    }
    let text = file.text.to_lowercase();
    if spec.theme_keywords.iter().any(|keyword| text.contains(keyword)) {
        return true;
    }
    let name = file.file_name().to_lowercase();
    THEME_FILENAME_VOCABULARY.iter().any(|word| name.contains(word))
}

fn heuristic(set: &ConfigSet) -> Classification {
    let spec = set.app.spec();
    let mut classification = Classification::default();

    for file in &set.files {
        if is_main(spec, file) {
            classification.main.push(file.path.clone());
        } else if is_color_bearing(spec, file) {
            classification.color.push(file.path.clone());
        } else {
            classification.other.push(file.path.clone());
        }
    }

    if classification.color.is_empty() {
        let promoted: Vec<PathBuf> = set
            .files
            .iter()
            .filter(|file| classification.main.contains(&file.path) && !file.colors.is_empty())
            .map(|file| file.path.clone())
            .collect();

        if promoted.is_empty() {
            if !classification.main.is_empty() {
                classification.fallback = Some(Fallback::AllMain);
            }
        } else {
            classification.main.retain(|path| !promoted.contains(path));
            classification.color = promoted;
            classification.fallback = Some(Fallback::MainWithColors);
        }
    }

    log::debug!(
        "{}: {} main, {} color-bearing, {} other (fallback {:?})",
        set.app,
        classification.main.len(),
        classification.color.len(),
        classification.other.len(),
        classification.fallback
    );
    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::AppId;
    use crate::locator::color_literals;
    use std::collections::BTreeMap;

    fn file(path: &str, text: &str) -> ConfigFile {
        ConfigFile {
            path: PathBuf::from(path),
            text: text.to_string(),
            exists: true,
            writable: true,
            colors: color_literals(text),
            includes: Vec::new(),
            instance: None,
        }
    }

    fn set(app: AppId, files: Vec<ConfigFile>) -> ConfigSet {
        ConfigSet {
            app,
            files,
            graph: BTreeMap::new(),
            classification: None,
        }
    }

    #[test]
    fn test_decoration_block_is_color_bearing() {
        let set = set(
            AppId::Hyprland,
            vec![
                file("/h/hyprland.conf", "source = ~/.config/hypr/look.conf\n"),
                file("/h/look.conf", "decoration { col.active_border = rgba(66, 66, 66, 0.5) }"),
                file("/h/binds.conf", "bind = SUPER, Q, exec, kitty\n"),
            ],
        );
        let classification = Classifier::Heuristic.classify(&set);
        assert_eq!(classification.main, vec![PathBuf::from("/h/hyprland.conf")]);
        assert_eq!(classification.color, vec![PathBuf::from("/h/look.conf")]);
        assert_eq!(classification.other, vec![PathBuf::from("/h/binds.conf")]);
        assert_eq!(classification.fallback, None);
        assert_eq!(classification.targets(), &[PathBuf::from("/h/look.conf")]);
    }

    #[test]
    fn test_main_takes_precedence() {
        let set = set(
            AppId::Kitty,
            vec![
                file("/k/kitty.conf", "background #000000\n"),
                file("/k/theme.conf", "foreground #ffffff\n"),
            ],
        );
        let classification = Classifier::Heuristic.classify(&set);
        assert_eq!(classification.main, vec![PathBuf::from("/k/kitty.conf")]);
        assert_eq!(classification.color, vec![PathBuf::from("/k/theme.conf")]);
    }

    #[test]
    fn test_main_with_colors_is_promoted() {
        let mut set = set(AppId::Kitty, vec![file("/k/kitty.conf", "background #000000\n")]);
        let classification = Classifier::Heuristic.classify_in_place(&mut set);
        assert_eq!(classification.fallback, Some(Fallback::MainWithColors));
        assert_eq!(classification.targets(), &[PathBuf::from("/k/kitty.conf")]);
        assert!(classification.main.is_empty());
        assert_eq!(set.classification, Some(classification));
    }

    #[test]
    fn test_plain_main_files_are_the_last_resort() {
        let set = set(AppId::Kitty, vec![file("/k/kitty.conf", "font_size 11\n")]);
        let classification = Classifier::Heuristic.classify(&set);
        assert_eq!(classification.fallback, Some(Fallback::AllMain));
        assert_eq!(classification.targets(), &[PathBuf::from("/k/kitty.conf")]);
    }

    #[test]
    fn test_plain_file_is_other() {
        let set = set(AppId::Kitty, vec![file("/k/fonts.conf", "font_size 11\n")]);
        let classification = Classifier::Heuristic.classify(&set);
        assert_eq!(classification.other, vec![PathBuf::from("/k/fonts.conf")]);
        assert!(classification.targets().is_empty());
        assert_eq!(classification.fallback, None);
    }

    #[test]
    fn test_theme_vocabulary_in_file_name() {
        let set = set(AppId::Kitty, vec![file("/k/Material-Theme.conf", "font_size 11\n")]);
        let classification = Classifier::Heuristic.classify(&set);
        assert_eq!(classification.color, vec![PathBuf::from("/k/Material-Theme.conf")]);
        assert_eq!(
            classification.role_of(Path::new("/k/Material-Theme.conf")),
            FileRole::ColorBearing
        );
    }
}
