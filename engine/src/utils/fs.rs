//! File system helpers shared by the locator, the backup store and the orchestrator.

use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Write `contents` to a sibling temp file, then rename it over `path`.
///
/// Missing parent directories are created.
pub fn atomic_write(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "matyou".to_string());
    let temp_path = path.with_file_name(format!(".{file_name}.matyou.tmp"));

    fs::write(&temp_path, contents)?;
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(&temp_path, metadata.permissions())?;
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

pub fn file_sha256(path: &Path) -> io::Result<String> {
    Ok(sha256_hex(&fs::read(path)?))
}

/// Whether the current user could write `path`.
///
/// Existing files are probed by opening them for append, which never
/// modifies content. For files that do not exist yet the nearest existing
/// ancestor directory must be writable.
pub fn is_writable(path: &Path) -> bool {
    if path.exists() {
        return OpenOptions::new().append(true).open(path).is_ok();
    }

    path.ancestors()
        .skip(1)
        .find(|ancestor| ancestor.exists())
        .and_then(|ancestor| fs::metadata(ancestor).ok())
        .is_some_and(|metadata| metadata.is_dir() && !metadata.permissions().readonly())
}

/// Resolve an include reference the way shells do.
///
/// `~` expands to `home`, absolute paths are kept and anything else is
/// relative to `base_dir` (the directory of the including file).
pub fn resolve_reference(reference: &str, home: &Path, base_dir: &Path) -> PathBuf {
    let reference = reference.trim_matches(|c| c == '"' || c == '\'');

    if reference == "~" {
        return home.to_path_buf();
    }
    if let Some(rest) = reference.strip_prefix("~/") {
        return home.join(rest);
    }
    let path = Path::new(reference);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
