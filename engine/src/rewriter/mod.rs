//! Per-application rewriters.
//!
//! Every application with a native format gets one [`ThemeRewriter`]
//! implementation owning its static setting tables. A rewrite is pure: it
//! maps file text and a palette to new text and never touches the disk.
//! Applying the same palette twice yields the same text as applying it once.
//!
//! | App | Rewriter | Format |
//! |---|---|---|
//! | hyprland | [`HyprlandRewriter`] | C-like blocks |
//! | kitty | [`KittyRewriter`] | `key value` lines |
//! | dunst | [`DunstRewriter`] | INI sections |
//! | rofi | [`RofiRewriter`] | RASI |
//! | waybar | [`WaybarRewriter`] | CSS |
//! | gtk | [`GtkRewriter`] | CSS `@define-color` |

pub mod dunst;
pub mod gtk;
pub mod hyprland;
pub mod kitty;
pub mod rofi;
pub mod scope;
pub mod table;
pub mod waybar;

pub use dunst::DunstRewriter;
pub use gtk::GtkRewriter;
pub use hyprland::HyprlandRewriter;
pub use kitty::KittyRewriter;
pub use rofi::RofiRewriter;
pub use table::{ChangeKind, RewriteOutcome, SettingChange};
pub use waybar::WaybarRewriter;

use crate::apps::AppId;
use crate::palette::ColorPalette;

/// Capability shared by all application rewriters.
pub trait ThemeRewriter {
    fn app(&self) -> AppId;

    /// Rewrite `text` so every mapped setting carries its palette color.
    fn rewrite(&self, text: &str, palette: &ColorPalette) -> RewriteOutcome;
}

/// Rewriter for `app`, or `None` when the app has no native rewriter.
pub fn rewriter_for(app: AppId) -> Option<Box<dyn ThemeRewriter>> {
    match app {
        AppId::Hyprland => Some(Box::new(HyprlandRewriter)),
        AppId::Kitty => Some(Box::new(KittyRewriter)),
        AppId::Waybar => Some(Box::new(WaybarRewriter)),
        AppId::Rofi => Some(Box::new(RofiRewriter)),
        AppId::Dunst => Some(Box::new(DunstRewriter)),
        AppId::Gtk => Some(Box::new(GtkRewriter)),
        AppId::Fish => None,
    }
}
