//! Config file discovery.
//!
//! [`Locator::locate`] finds every file belonging to an application: its
//! candidate paths from the registry, every file reached from them through
//! include directives, and for multi-instance apps every instance directory.
//! Each physical file is loaded once, keyed on its canonical path, and the
//! include relationships are kept as a dependency graph.

pub mod colors;
mod discovery;

pub use colors::color_literals;
pub use discovery::instance_name;

use crate::apps::{AppId, AppSpec, Discovery};
use crate::classifier::Classification;
use crate::common::errors::ThemeError;
use crate::utils::fs::{is_writable, resolve_reference};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("Configuration not found for {app}")]
    NotFound { app: AppId },
    #[error("Home directory could not be determined")]
    NoHome,
}

impl From<LocateError> for ThemeError {
    fn from(error: LocateError) -> Self {
        match error {
            LocateError::NotFound { app } => ThemeError::NotFound {
                app: app.to_string(),
            },
            LocateError::NoHome => ThemeError::NotFound {
                app: "<home>".to_string(),
            },
        }
    }
}

/// One discovered configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub text: String,
    /// `false` for generated targets that will be created on first write.
    pub exists: bool,
    pub writable: bool,
    pub colors: BTreeSet<String>,
    /// Resolved paths of the files this one includes.
    pub includes: Vec<PathBuf>,
    /// Instance label for multi-instance apps.
    pub instance: Option<String>,
}

impl ConfigFile {
    fn loaded(path: PathBuf, text: String, includes: Vec<PathBuf>, instance: Option<String>) -> Self {
        Self {
            writable: is_writable(&path),
            colors: color_literals(&text),
            path,
            text,
            exists: true,
            includes,
            instance,
        }
    }

    fn generated(path: PathBuf) -> Self {
        Self {
            writable: is_writable(&path),
            path,
            text: String::new(),
            exists: false,
            colors: BTreeSet::new(),
            includes: Vec::new(),
            instance: None,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Everything located for one application.
#[derive(Debug, Clone)]
pub struct ConfigSet {
    pub app: AppId,
    pub files: Vec<ConfigFile>,
    /// Includer to included files, without duplicates.
    pub graph: BTreeMap<PathBuf, Vec<PathBuf>>,
    /// Set once the set has been classified.
    pub classification: Option<Classification>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSummary {
    pub app: AppId,
    pub total_files: usize,
    pub writable_files: usize,
    pub files_with_colors: usize,
    pub instances: Vec<String>,
    pub modular: bool,
}

impl ConfigSet {
    pub fn file(&self, path: &Path) -> Option<&ConfigFile> {
        self.files.iter().find(|file| file.path == path)
    }

    /// Whether the configuration spans several files joined by includes.
    pub fn is_modular(&self) -> bool {
        !self.graph.is_empty()
    }

    pub fn summary(&self) -> ConfigSummary {
        let instances: BTreeSet<String> = self
            .files
            .iter()
            .filter_map(|file| file.instance.clone())
            .collect();
        ConfigSummary {
            app: self.app,
            total_files: self.files.len(),
            writable_files: self.files.iter().filter(|f| f.writable).count(),
            files_with_colors: self.files.iter().filter(|f| !f.colors.is_empty()).count(),
            instances: instances.into_iter().collect(),
            modular: self.is_modular(),
        }
    }
}

/// Mutable state of one `locate` call.
#[derive(Default)]
struct Walk {
    visited: HashSet<PathBuf>,
    files: Vec<ConfigFile>,
    graph: BTreeMap<PathBuf, Vec<PathBuf>>,
}

impl Walk {
    fn link(&mut self, from: &Path, to: PathBuf) {
        let edges = self.graph.entry(from.to_path_buf()).or_default();
        if !edges.contains(&to) {
            edges.push(to);
        }
    }
}

/// Finds configuration files relative to a home directory.
#[derive(Debug, Clone)]
pub struct Locator {
    home: PathBuf,
}

impl Locator {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Locator rooted at the current user's home directory.
    pub fn from_env() -> Result<Self, LocateError> {
        dirs::home_dir().map(Self::new).ok_or(LocateError::NoHome)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn locate(&self, app: AppId) -> Result<ConfigSet, LocateError> {
        let spec = app.spec();
        let mut walk = Walk::default();

        match spec.discovery {
            Discovery::Standard => self.locate_standard(spec, &mut walk),
            Discovery::MultiInstance {
                root,
                markers,
                style_files,
                module_dir,
            } => {
                let root = self.home.join(root);
                for dir in discovery::instance_dirs(&root, markers) {
                    let label = instance_name(&root, &dir);
                    log::debug!("Found {app} instance '{label}' at {}", dir.display());
                    for path in discovery::style_files(&dir, style_files, module_dir) {
                        self.visit(spec, &path, Some(&label), &mut walk);
                    }
                }
            }
            Discovery::Generated => {
                for candidate in spec.candidates {
                    let path = self.home.join(candidate);
                    if path.is_file() {
                        self.visit(spec, &path, None, &mut walk);
                    } else if !path.exists() {
                        log::debug!("{} will be generated", path.display());
                        walk.files.push(ConfigFile::generated(path));
                    }
                }
            }
        }

        if walk.files.is_empty() {
            log::info!("No configuration found for {app}");
            return Err(LocateError::NotFound { app });
        }

        log::info!(
            "Located {} file(s) for {app} ({} include edge(s))",
            walk.files.len(),
            walk.graph.values().map(Vec::len).sum::<usize>()
        );

        Ok(ConfigSet {
            app,
            files: walk.files,
            graph: walk.graph,
            classification: None,
        })
    }

    fn locate_standard(&self, spec: &AppSpec, walk: &mut Walk) {
        for candidate in spec.candidates {
            let path = self.home.join(candidate);
            if path.is_dir() {
                let mut found: Vec<PathBuf> = WalkDir::new(&path)
                    .into_iter()
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.file_type().is_file())
                    .map(|entry| entry.into_path())
                    .filter(|file| accepts(spec, file))
                    .collect();
                found.sort();
                for file in found {
                    self.visit(spec, &file, None, walk);
                }
            } else if path.is_file() {
                self.visit(spec, &path, None, walk);
            }
        }
    }

    /// Load `path` and everything it includes. Returns its canonical path.
    fn visit(
        &self,
        spec: &AppSpec,
        path: &Path,
        instance: Option<&str>,
        walk: &mut Walk,
    ) -> Option<PathBuf> {
        let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if !walk.visited.insert(canonical.clone()) {
            return Some(canonical);
        }

        let text = match fs::read_to_string(&canonical) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Cannot read {}: {e}", canonical.display());
                return None;
            }
        };

        let base_dir = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.home.clone());
        let references = self.resolve_includes(spec, &text, &base_dir);

        walk.files.push(ConfigFile::loaded(
            canonical.clone(),
            text,
            Vec::new(),
            instance.map(str::to_string),
        ));
        let index = walk.files.len() - 1;

        for reference in references {
            if let Some(child) = self.visit(spec, &reference, instance, walk) {
                if child == canonical {
                    continue;
                }
                if !walk.files[index].includes.contains(&child) {
                    walk.files[index].includes.push(child.clone());
                }
                walk.link(&canonical, child);
            }
        }

        Some(canonical)
    }

    fn resolve_includes(&self, spec: &AppSpec, text: &str, base_dir: &Path) -> Vec<PathBuf> {
        let mut resolved = Vec::new();

        for reference in spec.include_references(text) {
            let target = resolve_reference(reference, &self.home, base_dir);
            let pattern = target.to_string_lossy();

            if pattern.contains(['*', '?', '[']) {
                match glob::glob(&pattern) {
                    Ok(paths) => {
                        let mut matches: Vec<PathBuf> = paths
                            .filter_map(Result::ok)
                            .filter(|path| path.is_file())
                            .collect();
                        matches.sort();
                        if matches.is_empty() {
                            log::warn!("Include pattern {pattern} matched no files");
                        }
                        resolved.extend(matches);
                    }
                    Err(e) => log::warn!("Invalid include pattern {pattern}: {e}"),
                }
                continue;
            }

            if target.is_file() {
                resolved.push(target);
                continue;
            }

            let with_extension = target.with_extension("rasi");
            if spec.id == AppId::Rofi && target.extension().is_none() && with_extension.is_file() {
                resolved.push(with_extension);
                continue;
            }

            log::warn!(
                "{} includes missing file {}",
                spec.id,
                target.display()
            );
        }

        resolved
    }
}

/// Whether a file found by directory scan belongs to `spec`.
fn accepts(spec: &AppSpec, path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    if name.starts_with('.') || name.ends_with(".bak") {
        return false;
    }
    spec.matches_extension(path) || spec.canonical_names.iter().any(|c| name == *c)
}
