//! Error types for nbforge-core.

use std::path::PathBuf;

use nbforge_notebook::NotebookError;
use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Errors that abort an export.
///
/// Degraded rendering (no highlighter, unknown language, malformed outputs)
/// is never reported here.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The input notebook could not be read or parsed.
    #[error("failed to load notebook: {0}")]
    NotebookParse(#[from] NotebookError),

    /// Neither the requested template nor the default template exists.
    #[error("template not found: {name} (searched {root})")]
    TemplateNotFound { name: String, root: String },

    /// The template engine failed while loading or rendering.
    #[error("failed to render template {template}: {source}")]
    TemplateRender {
        template: String,
        #[source]
        source: minijinja::Error,
    },

    /// The output directory or file could not be written.
    #[error("failed to write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The batch configuration file is unreadable or malformed.
    #[error("invalid batch configuration {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl ExportError {
    /// A short recovery suggestion for the user, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ExportError::NotebookParse(NotebookError::UnsupportedFormat { .. }) => {
                Some("upgrade the notebook with `jupyter nbconvert --to notebook --nbformat 4`")
            }
            ExportError::NotebookParse(_) => {
                Some("check that the input is a valid .ipynb file")
            }
            ExportError::TemplateNotFound { .. } => {
                Some("run with --list-templates to see available templates, or add a default.j2")
            }
            ExportError::TemplateRender { .. } => {
                Some("run with --verbose for the template line that failed")
            }
            ExportError::OutputWrite { .. } => None,
            ExportError::Config { .. } => {
                Some("a batch file needs an `exports` list of {input, output} records")
            }
        }
    }

    /// The error message followed by its hint.
    pub fn with_hint(&self) -> String {
        match self.hint() {
            Some(hint) => format!("{}\n  hint: {}", self, hint),
            None => self.to_string(),
        }
    }
}
