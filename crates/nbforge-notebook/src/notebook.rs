//! Jupyter notebook (.ipynb) data model.
//!
//! Mirrors the nbformat v4 JSON layout closely enough that a notebook can be
//! loaded, handed to a template as plain data, and read back by filters.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{NotebookError, NotebookResult};
use crate::text;

/// Free-form metadata mapping (notebook or cell level).
pub type Metadata = serde_json::Map<String, Value>;

/// MIME type to payload mapping of a rich output, in notebook order.
pub type MimeBundle = serde_json::Map<String, Value>;

/// Oldest nbformat major version the loader accepts.
pub const MIN_NBFORMAT: u32 = 4;

/// A Jupyter notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Notebook metadata (kernelspec, language_info, ...)
    #[serde(default)]
    pub metadata: Metadata,

    /// Format version
    pub nbformat: u32,

    /// Minor format version
    #[serde(default)]
    pub nbformat_minor: u32,

    /// Notebook cells
    #[serde(default)]
    pub cells: Vec<Cell>,
}

/// A notebook cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    /// Executable code with its recorded outputs.
    Code(CodeCell),

    /// Markdown prose.
    Markdown(TextCell),

    /// Raw content passed through untouched.
    Raw(TextCell),
}

/// Cell type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    Code,
    Markdown,
    Raw,
}

/// A code cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "text::multiline")]
    pub source: String,

    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default)]
    pub execution_count: Option<u32>,

    #[serde(default, deserialize_with = "lenient_outputs")]
    pub outputs: Vec<Output>,
}

/// A markdown or raw cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "text::multiline")]
    pub source: String,

    #[serde(default)]
    pub metadata: Metadata,

    /// Inline attachments, kept as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Value>,
}

/// Cell output.
///
/// Outputs whose `output_type` is unrecognised, or whose fields do not match
/// their declared type, load as [`Output::Unknown`] instead of failing the
/// whole notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    /// Standard output/error
    Stream {
        #[serde(default = "default_stream_name")]
        name: String,
        #[serde(deserialize_with = "text::multiline")]
        text: String,
    },

    /// Result of the last expression of a cell
    ExecuteResult {
        #[serde(default)]
        execution_count: Option<u32>,
        #[serde(default)]
        data: MimeBundle,
        #[serde(default)]
        metadata: Metadata,
    },

    /// Display data
    DisplayData {
        #[serde(default)]
        data: MimeBundle,
        #[serde(default)]
        metadata: Metadata,
    },

    /// Error output
    Error {
        #[serde(default)]
        ename: String,
        #[serde(default)]
        evalue: String,
        #[serde(default)]
        traceback: Vec<String>,
    },

    /// Anything else
    #[serde(other)]
    Unknown,
}

fn default_stream_name() -> String {
    "stdout".to_string()
}

fn lenient_outputs<'de, D>(deserializer: D) -> Result<Vec<Output>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(Output::from_json).collect())
}

impl Notebook {
    /// Create a new empty nbformat 4.5 notebook.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::new(),
            nbformat: 4,
            nbformat_minor: 5,
            cells: Vec::new(),
        }
    }

    /// Read a notebook from a file.
    pub fn from_path(path: impl AsRef<Path>) -> NotebookResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| NotebookError::ReadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let notebook = Self::from_json_str(&content)?;

        tracing::debug!(
            "Loaded {} (nbformat {}.{}, {} cells)",
            path.display(),
            notebook.nbformat,
            notebook.nbformat_minor,
            notebook.cells.len()
        );

        Ok(notebook)
    }

    /// Parse a notebook from its JSON text.
    pub fn from_json_str(json: &str) -> NotebookResult<Self> {
        let notebook: Self = serde_json::from_str(json)?;
        if notebook.nbformat < MIN_NBFORMAT {
            return Err(NotebookError::UnsupportedFormat {
                major: notebook.nbformat,
                minor: notebook.nbformat_minor,
            });
        }
        Ok(notebook)
    }

    /// Kernel language, from `language_info.name` or `kernelspec.language`.
    pub fn language(&self) -> Option<&str> {
        let from = |section: &str, key: &str| {
            self.metadata
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(Value::as_str)
        };
        from("language_info", "name").or_else(|| from("kernelspec", "language"))
    }
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new()
    }
}

impl Cell {
    /// Create a markdown cell.
    pub fn markdown(source: impl Into<String>) -> Self {
        Cell::Markdown(TextCell {
            source: source.into(),
            ..Default::default()
        })
    }

    /// Create a code cell with the given outputs.
    pub fn code(source: impl Into<String>, outputs: Vec<Output>) -> Self {
        Cell::Code(CodeCell {
            source: source.into(),
            outputs,
            ..Default::default()
        })
    }

    /// Create a raw cell.
    pub fn raw(source: impl Into<String>) -> Self {
        Cell::Raw(TextCell {
            source: source.into(),
            ..Default::default()
        })
    }

    /// Set an explicit cell id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = Some(id.into());
        match &mut self {
            Cell::Code(cell) => cell.id = id,
            Cell::Markdown(cell) | Cell::Raw(cell) => cell.id = id,
        }
        self
    }

    pub fn cell_type(&self) -> CellType {
        match self {
            Cell::Code(_) => CellType::Code,
            Cell::Markdown(_) => CellType::Markdown,
            Cell::Raw(_) => CellType::Raw,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Cell::Code(cell) => cell.id.as_deref(),
            Cell::Markdown(cell) | Cell::Raw(cell) => cell.id.as_deref(),
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Cell::Code(cell) => &cell.source,
            Cell::Markdown(cell) | Cell::Raw(cell) => &cell.source,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            Cell::Code(cell) => &cell.metadata,
            Cell::Markdown(cell) | Cell::Raw(cell) => &cell.metadata,
        }
    }

    /// Outputs of a code cell; empty for other cell types.
    pub fn outputs(&self) -> &[Output] {
        match self {
            Cell::Code(cell) => &cell.outputs,
            Cell::Markdown(_) | Cell::Raw(_) => &[],
        }
    }
}

impl Output {
    /// Build an output from arbitrary JSON, degrading to [`Output::Unknown`].
    pub fn from_json(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or(Output::Unknown)
    }

    /// Create a stream output.
    pub fn stream(name: impl Into<String>, text: impl Into<String>) -> Self {
        Output::Stream {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Create an execute_result output from a MIME bundle.
    pub fn execute_result(data: MimeBundle) -> Self {
        Output::ExecuteResult {
            execution_count: None,
            data,
            metadata: Metadata::new(),
        }
    }

    /// Create a display_data output from a MIME bundle.
    pub fn display_data(data: MimeBundle) -> Self {
        Output::DisplayData {
            data,
            metadata: Metadata::new(),
        }
    }

    /// The `output_type` discriminant as written in the notebook.
    pub fn output_type(&self) -> &'static str {
        match self {
            Output::Stream { .. } => "stream",
            Output::ExecuteResult { .. } => "execute_result",
            Output::DisplayData { .. } => "display_data",
            Output::Error { .. } => "error",
            Output::Unknown => "unknown",
        }
    }
}
