//! Multi-instance discovery for apps that keep several configuration roots
//! side by side (one directory per bar, for example).

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Instance directories are searched this deep below the root.
const MAX_INSTANCE_DEPTH: usize = 3;

/// Every directory under `root` (including `root`) that holds one of `markers`.
pub(super) fn instance_dirs(root: &Path, markers: &[&str]) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }

    let mut dirs: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(MAX_INSTANCE_DEPTH)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .filter(|dir| markers.iter().any(|marker| dir.join(marker).is_file()))
        .collect();
    dirs.sort();
    dirs
}

/// Style files of one instance: the well-known names first, then any other
/// top-level `*.css`, then `*.css` in the module directory.
pub(super) fn style_files(dir: &Path, names: &[&str], module_dir: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = names
        .iter()
        .map(|name| dir.join(name))
        .filter(|path| path.is_file())
        .collect();

    for extra in css_in(dir).into_iter().chain(css_in(&dir.join(module_dir))) {
        if !files.contains(&extra) {
            files.push(extra);
        }
    }
    files
}

fn css_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut found: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "css"))
        .collect();
    found.sort();
    found
}

/// Label of an instance directory.
///
/// `main` for the root itself, the relative path joined with `-` below it,
/// and the directory name for anything outside the root.
pub fn instance_name(root: &Path, dir: &Path) -> String {
    match dir.strip_prefix(root) {
        Ok(relative) if relative.as_os_str().is_empty() => "main".to_string(),
        Ok(relative) => relative
            .components()
            .map(|part| part.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("-"),
        Err(_) => dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "test".to_string()),
    }
}
