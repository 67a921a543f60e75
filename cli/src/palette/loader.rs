use super::validation::PalettePathValidator;
use crate::error::{AppError, AppResult};
use crate::validation::Validator;
use engine::palette::ColorPalette;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the palette for a command comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteSource {
    File(PathBuf),
    /// The built-in Material You baseline.
    Default,
}

pub fn load_palette(source: &PaletteSource) -> AppResult<ColorPalette> {
    match source {
        PaletteSource::File(path) => load_palette_file(path),
        PaletteSource::Default => Ok(ColorPalette::material_default()),
    }
}

/// Read a JSON object of role names to hex colors.
///
/// Only the shape is checked here; hex syntax and required roles are the
/// engine's palette validation.
pub fn load_palette_file(path: &Path) -> AppResult<ColorPalette> {
    PalettePathValidator.validate(path)?;

    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Io(format!("Failed to read {}: {e}", path.display())))?;
    let palette: ColorPalette = serde_json::from_str(&text).map_err(|e| {
        AppError::Palette(format!(
            "{} is not a JSON object of role names to color strings: {e}",
            path.display()
        ))
    })?;

    if palette.is_empty() {
        return Err(AppError::Palette(format!(
            "{} contains no colors",
            path.display()
        )));
    }

    log::debug!("Loaded {} colors from {}", palette.len(), path.display());
    Ok(palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_ok};

    #[test]
    fn test_load_palette_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("violet.json");
        fs::write(&path, r##"{"primary": "#6750A4", "surface": "#FEF7FF"}"##).unwrap();

        let palette = assert_ok!(load_palette(&PaletteSource::File(path)));
        assert_eq!(palette.get("primary"), Some("#6750A4"));
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn test_rejects_non_object_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("list.json");
        fs::write(&list, r##"["#6750A4"]"##).unwrap();
        assert!(matches!(load_palette_file(&list), Err(AppError::Palette(_))));

        let empty = dir.path().join("empty.json");
        fs::write(&empty, "{}").unwrap();
        assert_err!(load_palette_file(&empty));
    }

    #[test]
    fn test_default_source() {
        let palette = assert_ok!(load_palette(&PaletteSource::Default));
        assert_eq!(palette, ColorPalette::material_default());
    }
}
