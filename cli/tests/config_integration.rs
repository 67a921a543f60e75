use claims::assert_some_eq;
use engine::apps::AppId;
use engine::palette::ValidationMode;
use matyou::config::{AppConfig, ConfigLoadResult, load_config};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_config(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, text).unwrap();
    path
}

fn loaded(result: ConfigLoadResult) -> AppConfig {
    match result {
        ConfigLoadResult::Success(config) => *config,
        ConfigLoadResult::LoadError(msg) | ConfigLoadResult::DeserializeError(msg) => {
            panic!("Expected configuration to load: {msg}")
        }
    }
}

#[test]
fn test_full_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[logging]
level = "debug"
file = "/tmp/matyou.log"

[backup]
directory = "~/theme-backups"
keep_count = 5
keep_days = 7

[reload]
enabled = false
timeout_secs = 3

[generator]
enabled = true
models = ["codellama"]

[apply]
apps = ["kitty", "dunst"]
strict_palette = false
theme_name = "violet"
"#,
    );

    let config = loaded(load_config(Some(path.as_path())));

    assert_eq!(config.logging().level(), "debug");
    assert_some_eq!(config.logging().file(), "/tmp/matyou.log");
    assert_eq!(
        config.backup().directory(Path::new("/home/me")),
        PathBuf::from("/home/me/theme-backups")
    );
    assert_eq!(config.backup().keep_count(), 5);
    assert_eq!(config.backup().keep_days(), 7);
    assert!(!config.reload().enabled());
    assert_eq!(config.reload().timeout_secs(), 3);
    assert!(config.generator().enabled());
    assert_eq!(config.generator().models(), vec!["codellama".to_string()]);
    assert_eq!(config.generator().timeout_secs(), 45);
    assert_eq!(config.apply().apps(), Some(vec![AppId::Kitty, AppId::Dunst]));
    assert_eq!(config.apply().validation_mode(), ValidationMode::Lenient);
    assert_some_eq!(config.apply().theme_name(), "violet");
}

#[test]
fn test_empty_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "");

    let config = loaded(load_config(Some(path.as_path())));

    assert_eq!(config.logging().level(), "info");
    assert_eq!(
        config.backup().directory(Path::new("/home/me")),
        PathBuf::from("/home/me/.config/matyou/backups")
    );
    assert_eq!(config.backup().keep_count(), 10);
    assert_eq!(config.backup().keep_days(), 30);
    assert!(config.reload().enabled());
    assert_eq!(config.reload().timeout_secs(), 10);
    assert!(!config.generator().enabled());
    assert!(config.generator().models().contains(&"codegemma".to_string()));
    assert_eq!(config.apply().apps(), None);
    assert_eq!(config.apply().validation_mode(), ValidationMode::Strict);
}

#[test]
fn test_out_of_range_values_are_reported_together() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        "[backup]\nkeep_count = 0\n\n[reload]\ntimeout_secs = 500\n",
    );

    match load_config(Some(path.as_path())) {
        ConfigLoadResult::DeserializeError(msg) => {
            assert!(msg.contains("Backup keep count out of range"));
            assert!(msg.contains("Reload timeout out of range"));
        }
        _ => panic!("Expected validation failure"),
    }
}

#[test]
fn test_unknown_app_and_bad_theme_name() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        "[apply]\napps = [\"kitty\", \"alacritty\"]\ntheme_name = \"my theme\"\n",
    );

    match load_config(Some(path.as_path())) {
        ConfigLoadResult::DeserializeError(msg) => {
            assert!(msg.contains("'alacritty'"));
            assert!(msg.contains("Invalid theme name"));
        }
        _ => panic!("Expected validation failure"),
    }
}

#[test]
fn test_unknown_log_level() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "[logging]\nlevel = \"loud\"\n");

    assert!(matches!(
        load_config(Some(path.as_path())),
        ConfigLoadResult::DeserializeError(msg) if msg.contains("Unknown log level 'loud'")
    ));
}

#[test]
fn test_wrong_type_is_a_deserialize_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "[backup]\nkeep_count = \"many\"\n");

    assert!(matches!(
        load_config(Some(path.as_path())),
        ConfigLoadResult::DeserializeError(msg) if msg.starts_with("Failed to deserialize config")
    ));
}

#[test]
fn test_explicit_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    assert!(matches!(
        load_config(Some(missing.as_path())),
        ConfigLoadResult::LoadError(_)
    ));
}
