//! Template storage: a directory on disk or the templates compiled into the
//! binary.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Templates shipped with nbforge, keyed by path relative to the root.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("default.j2", include_str!("builtin/default.j2")),
    ("minimal.j2", include_str!("builtin/minimal.j2")),
    (
        "custom-academic/index.html.j2",
        include_str!("builtin/custom-academic/index.html.j2"),
    ),
    (
        "custom-academic/cell.html.j2",
        include_str!("builtin/custom-academic/cell.html.j2"),
    ),
];

/// Where templates are looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRoot {
    /// A template directory on disk.
    Directory(PathBuf),

    /// The built-in templates.
    Builtin,
}

/// A top-level entry of a template root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RootEntry {
    pub name: String,
    pub is_dir: bool,
}

impl TemplateRoot {
    /// Whether `rel` names a template file.
    pub(crate) fn is_file(&self, rel: &str) -> bool {
        match self {
            TemplateRoot::Directory(dir) => dir.join(rel).is_file(),
            TemplateRoot::Builtin => BUILTIN_TEMPLATES.iter().any(|(path, _)| *path == rel),
        }
    }

    /// Read the template at `rel`, `None` if it does not exist.
    pub(crate) fn read(&self, rel: &str) -> io::Result<Option<String>> {
        match self {
            TemplateRoot::Directory(dir) => match fs::read_to_string(dir.join(rel)) {
                Ok(source) => Ok(Some(source)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e),
            },
            TemplateRoot::Builtin => Ok(BUILTIN_TEMPLATES
                .iter()
                .find(|(path, _)| *path == rel)
                .map(|(_, source)| source.to_string())),
        }
    }

    /// Top-level files and directories, hidden entries excluded.
    ///
    /// A directory root that does not exist has no entries.
    pub(crate) fn entries(&self) -> Vec<RootEntry> {
        match self {
            TemplateRoot::Directory(dir) => read_dir_entries(dir),
            TemplateRoot::Builtin => {
                let mut entries: Vec<RootEntry> = BUILTIN_TEMPLATES
                    .iter()
                    .map(|(path, _)| match path.split_once('/') {
                        Some((dir, _)) => RootEntry {
                            name: dir.to_string(),
                            is_dir: true,
                        },
                        None => RootEntry {
                            name: path.to_string(),
                            is_dir: false,
                        },
                    })
                    .collect();
                entries.dedup();
                entries
            }
        }
    }
}

fn read_dir_entries(dir: &Path) -> Vec<RootEntry> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) => {
            tracing::debug!("Cannot list templates in {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    read_dir
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            if name.starts_with('.') {
                return None;
            }
            Some(RootEntry {
                is_dir: entry.path().is_dir(),
                name,
            })
        })
        .collect()
}

impl fmt::Display for TemplateRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateRoot::Directory(dir) => write!(f, "{}", dir.display()),
            TemplateRoot::Builtin => write!(f, "built-in templates"),
        }
    }
}

/// Loads templates by name for the template engine.
///
/// Names are tried relative to the template's own directory first (so a
/// nested template can include its siblings by bare name), then relative to
/// the root.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    root: TemplateRoot,
    base: Option<String>,
}

impl TemplateLoader {
    pub(crate) fn new(root: TemplateRoot, base: Option<String>) -> Self {
        Self { root, base }
    }

    /// Load the template called `name`, `Ok(None)` if it does not exist.
    pub fn load(&self, name: &str) -> Result<Option<String>, minijinja::Error> {
        if !is_safe_path(name) {
            return Ok(None);
        }

        let sibling = self.base.as_ref().map(|base| format!("{}/{}", base, name));
        for candidate in sibling.iter().map(String::as_str).chain([name]) {
            let source = self.root.read(candidate).map_err(|e| {
                minijinja::Error::new(
                    minijinja::ErrorKind::InvalidOperation,
                    format!("could not read template {} from {}", candidate, self.root),
                )
                .with_source(e)
            })?;
            if source.is_some() {
                tracing::debug!("Loaded template {} from {}", candidate, self.root);
                return Ok(source);
            }
        }

        Ok(None)
    }
}

/// Relative, forward-slash path that stays inside the root.
pub(crate) fn is_safe_path(rel: &str) -> bool {
    !rel.is_empty()
        && !rel.starts_with('/')
        && !rel.contains('\\')
        && rel.split('/').all(|part| !part.is_empty() && part != "." && part != "..")
}
