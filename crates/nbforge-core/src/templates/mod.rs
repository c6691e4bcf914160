//! Template discovery and resolution.
//!
//! Templates can be authored two ways under a template root:
//!
//! ```text
//! templates/
//! ├── default.j2              # flat: <name>.j2
//! ├── report/
//! │   └── index.html.j2       # nested: <name>/index.html.j2
//! └── custom-academic/
//!     ├── index.html.j2       # nested with prefix: custom-<name>/index.html.j2
//!     └── cell.html.j2        # partial, included by bare name
//! ```
//!
//! Listing shows `custom-academic` as `academic`. Resolution accepts both
//! spellings and never strips the prefix itself.

mod root;

use std::collections::BTreeSet;

pub use root::{TemplateLoader, TemplateRoot};

use crate::error::{ExportError, ExportResult};
use root::is_safe_path;

/// Extension of template files.
pub const TEMPLATE_EXTENSION: &str = "j2";

/// Entry-point file of a nested template directory.
pub const ENTRY_POINT: &str = "index.html.j2";

/// Directory prefix hidden from listed template names.
pub const CUSTOM_PREFIX: &str = "custom-";

/// Template used when the requested one does not exist.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Physical shape of a resolved template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateKind {
    /// A single `<name>.j2` file.
    Flat,

    /// A directory holding an `index.html.j2` entry point.
    Nested { dir: String },
}

/// A template located under a root, ready to be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    /// Name the template was found under.
    pub name: String,

    pub kind: TemplateKind,

    /// Entry file, relative to the template root.
    pub entry: String,

    /// Whether this is the default template standing in for a missing one.
    pub fallback: bool,
}

/// Finds templates under a [`TemplateRoot`].
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    root: TemplateRoot,
    default_template: String,
}

impl TemplateResolver {
    /// Create a resolver over `root`, falling back to [`DEFAULT_TEMPLATE`].
    pub fn new(root: TemplateRoot) -> Self {
        Self {
            root,
            default_template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    /// Create a resolver over the built-in templates.
    pub fn builtin() -> Self {
        Self::new(TemplateRoot::Builtin)
    }

    /// Use a different fallback template.
    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default_template = normalize_name(&name.into()).to_string();
        self
    }

    pub fn root(&self) -> &TemplateRoot {
        &self.root
    }

    pub fn default_template(&self) -> &str {
        &self.default_template
    }

    /// Names of all available templates, sorted and de-duplicated.
    ///
    /// Nested directories are listed without their `custom-` prefix.
    pub fn list(&self) -> Vec<String> {
        let mut names = BTreeSet::new();

        for entry in self.root.entries() {
            if entry.is_dir {
                if self.root.is_file(&format!("{}/{}", entry.name, ENTRY_POINT)) {
                    names.insert(display_name(&entry.name).to_string());
                }
            } else if let Some(stem) = entry
                .name
                .strip_suffix(TEMPLATE_EXTENSION)
                .and_then(|s| s.strip_suffix('.'))
            {
                names.insert(stem.to_string());
            }
        }

        names.retain(|name| !name.is_empty());
        names.into_iter().collect()
    }

    /// Locate `name` without any fallback.
    ///
    /// Tries `<name>.j2`, then `<name>/index.html.j2`, then
    /// `custom-<name>/index.html.j2`. A trailing `.j2` on `name` is ignored.
    pub fn discover(&self, name: &str) -> Option<ResolvedTemplate> {
        let name = normalize_name(name);
        if !is_safe_path(name) || name.contains('/') {
            return None;
        }

        let flat = format!("{}.{}", name, TEMPLATE_EXTENSION);
        if self.root.is_file(&flat) {
            return Some(ResolvedTemplate {
                name: name.to_string(),
                kind: TemplateKind::Flat,
                entry: flat,
                fallback: false,
            });
        }

        for dir in [name.to_string(), format!("{}{}", CUSTOM_PREFIX, name)] {
            let entry = format!("{}/{}", dir, ENTRY_POINT);
            if self.root.is_file(&entry) {
                return Some(ResolvedTemplate {
                    name: name.to_string(),
                    kind: TemplateKind::Nested { dir },
                    entry,
                    fallback: false,
                });
            }
        }

        None
    }

    /// Resolve `name`, substituting the default template if it is missing.
    ///
    /// # Errors
    /// [`ExportError::TemplateNotFound`] when neither `name` nor the default
    /// template exists.
    pub fn resolve(&self, name: &str) -> ExportResult<ResolvedTemplate> {
        if let Some(template) = self.discover(name) {
            tracing::debug!("Resolved template {} to {}", name, template.entry);
            return Ok(template);
        }

        let not_found = || ExportError::TemplateNotFound {
            name: name.to_string(),
            root: self.root.to_string(),
        };

        if normalize_name(name) == self.default_template {
            return Err(not_found());
        }

        let template = self.discover(&self.default_template).ok_or_else(not_found)?;
        tracing::warn!(
            "Template '{}' not found in {}, using '{}'",
            name,
            self.root,
            template.name
        );

        Ok(ResolvedTemplate {
            fallback: true,
            ..template
        })
    }

    /// A loader for `template` and the files it includes.
    pub fn loader_for(&self, template: &ResolvedTemplate) -> TemplateLoader {
        let base = match &template.kind {
            TemplateKind::Flat => None,
            TemplateKind::Nested { dir } => Some(dir.clone()),
        };
        TemplateLoader::new(self.root.clone(), base)
    }
}

/// Strip a trailing `.j2` from a requested template name.
pub fn normalize_name(name: &str) -> &str {
    name.strip_suffix(".j2").unwrap_or(name)
}

/// Name shown to users for a nested template directory.
fn display_name(dir: &str) -> &str {
    dir.strip_prefix(CUSTOM_PREFIX).unwrap_or(dir)
}
