//! Error types for notebook loading.

use std::path::PathBuf;

/// Result type for notebook operations.
pub type NotebookResult<T> = Result<T, NotebookError>;

/// Errors that can occur while loading a notebook.
#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    /// Failed to read the notebook file.
    #[error("Failed to read notebook {path}: {message}")]
    ReadError { path: PathBuf, message: String },

    /// The document is not valid notebook JSON.
    #[error("Invalid notebook JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The document uses a notebook format older than v4.
    #[error("Unsupported nbformat {major}.{minor} (nbformat 4 or later is required)")]
    UnsupportedFormat { major: u32, minor: u32 },
}
