//! Environment overrides live in their own test binary so the variables
//! never leak into other configuration tests.

use engine::apps::AppId;
use matyou::config::{ConfigLoadResult, load_config};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[backup]\nkeep_count = 5\nkeep_days = 7\n").unwrap();

    // SAFETY: this is the only test in this binary.
    unsafe {
        std::env::set_var("MATYOU__BACKUP__KEEP_COUNT", "3");
        std::env::set_var("MATYOU__APPLY__APPS", "waybar,rofi");
    }

    let config = match load_config(Some(path.as_path())) {
        ConfigLoadResult::Success(config) => config,
        ConfigLoadResult::LoadError(msg) | ConfigLoadResult::DeserializeError(msg) => {
            panic!("Expected configuration to load: {msg}")
        }
    };

    assert_eq!(config.backup().keep_count(), 3);
    assert_eq!(config.backup().keep_days(), 7);
    assert_eq!(config.apply().apps(), Some(vec![AppId::Waybar, AppId::Rofi]));
}
