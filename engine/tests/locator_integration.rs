use claims::{assert_ok, assert_some};
use engine::apps::AppId;
use engine::classifier::{Classifier, Fallback};
use engine::locator::{LocateError, Locator};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(home: &Path, rel: &str, text: &str) -> PathBuf {
    let path = home.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, text).unwrap();
    fs::canonicalize(path).unwrap()
}

#[test]
fn test_include_closure_visits_each_file_once() {
    let home = TempDir::new().unwrap();
    let a = write(
        home.path(),
        ".config/hypr/hyprland.conf",
        "source = ~/.config/hypr/b.conf\n",
    );
    let b = write(
        home.path(),
        ".config/hypr/b.conf",
        "source = ./c.conf\nsource = ~/.config/hypr/c.conf\n",
    );
    let c = write(home.path(), ".config/hypr/c.conf", "general {\n}\n");

    let set = assert_ok!(Locator::new(home.path()).locate(AppId::Hyprland));

    let mut paths: Vec<&PathBuf> = set.files.iter().map(|f| &f.path).collect();
    paths.sort();
    let mut expected = vec![&a, &b, &c];
    expected.sort();
    assert_eq!(paths, expected);

    assert_eq!(set.graph.len(), 2);
    assert_eq!(set.graph.get(&a), Some(&vec![b.clone()]));
    assert_eq!(set.graph.get(&b), Some(&vec![c.clone()]));
    assert!(set.is_modular());
}

#[test]
fn test_every_file_is_loaded_with_permissions() {
    let home = TempDir::new().unwrap();
    write(home.path(), ".config/kitty/kitty.conf", "include colors.conf\n");
    write(home.path(), ".config/kitty/colors.conf", "background #1e1e2e\n");

    let set = Locator::new(home.path()).locate(AppId::Kitty).unwrap();
    assert!(set.files.iter().all(|f| f.exists && f.writable));

    let colors = set
        .files
        .iter()
        .find(|f| f.file_name() == "colors.conf")
        .unwrap();
    assert!(colors.colors.contains("#1e1e2e"));

    let summary = set.summary();
    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.files_with_colors, 1);
}

#[test]
fn test_nothing_located_is_not_found() {
    let home = TempDir::new().unwrap();
    for app in [AppId::Hyprland, AppId::Kitty, AppId::Waybar, AppId::Rofi, AppId::Dunst] {
        assert_eq!(
            Locator::new(home.path()).locate(app).unwrap_err(),
            LocateError::NotFound { app }
        );
    }
}

#[test]
fn test_waybar_instances_are_labelled() {
    let home = TempDir::new().unwrap();
    write(home.path(), ".config/waybar/config.jsonc", "{}");
    write(
        home.path(),
        ".config/waybar/style.css",
        "@import \"colors.css\";\nwindow#waybar { color: @fg; }\n",
    );
    write(
        home.path(),
        ".config/waybar/colors.css",
        "@define-color fg #ffffff;\n",
    );
    write(home.path(), ".config/waybar/laptop/top/config", "{}");
    write(
        home.path(),
        ".config/waybar/laptop/top/style.css",
        "window#waybar { background: #000000; }\n",
    );

    let set = Locator::new(home.path()).locate(AppId::Waybar).unwrap();
    let summary = set.summary();
    assert_eq!(summary.instances, vec!["laptop-top".to_string(), "main".to_string()]);
    assert_eq!(summary.total_files, 3);

    let nested = set
        .files
        .iter()
        .find(|f| f.path.ends_with("laptop/top/style.css"))
        .unwrap();
    assert_eq!(nested.instance.as_deref(), Some("laptop-top"));
}

#[test]
fn test_rofi_import_without_extension() {
    let home = TempDir::new().unwrap();
    let config = write(
        home.path(),
        ".config/rofi/config.rasi",
        "configuration { modi: \"drun\"; }\n@import \"colors\"\n",
    );
    let colors = write(
        home.path(),
        ".config/rofi/colors.rasi",
        "* { background: #1e1e2e; }\n",
    );

    let set = Locator::new(home.path()).locate(AppId::Rofi).unwrap();
    assert_eq!(set.graph.get(&config), Some(&vec![colors.clone()]));

    let classification = Classifier::Heuristic.classify(&set);
    assert_eq!(classification.main, vec![config]);
    assert_eq!(classification.color, vec![colors]);
    assert_eq!(classification.fallback, None);
}

#[test]
fn test_gtk_targets_are_generated() {
    let home = TempDir::new().unwrap();
    let set = assert_ok!(Locator::new(home.path()).locate(AppId::Gtk));

    assert!(set.files.iter().all(|f| !f.exists && f.writable && f.text.is_empty()));
    let classification = Classifier::Heuristic.classify(&set);
    assert_eq!(classification.fallback, Some(Fallback::AllMain));
    assert_eq!(classification.targets().len(), set.files.len());
    assert_some!(set.files.iter().find(|f| f.path.ends_with(".config/gtk-4.0/gtk.css")));
}
