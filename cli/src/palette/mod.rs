//! Palette input for the command line.

pub mod loader;
pub mod validation;

pub use loader::{PaletteSource, load_palette, load_palette_file};
pub use validation::{
    AppNameValidator, InputValidationError, PalettePathValidator, ThemeNameValidator,
};
