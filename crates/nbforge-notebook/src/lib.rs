//! Notebook model for nbforge.
//!
//! Loads Jupyter `.ipynb` documents (nbformat 4) into typed cells and outputs.
//!
//! # Architecture
//!
//! ```text
//! notebook.ipynb ─────► Notebook::from_path ─────► Notebook { metadata, cells }
//!                                                        │
//!                                                        ▼
//!                                           Cell::{Code, Markdown, Raw}
//!                                                        │
//!                                                        ▼
//!                                  Output::{Stream, ExecuteResult, DisplayData, Error, Unknown}
//! ```

mod error;
mod notebook;
mod text;

pub use error::{NotebookError, NotebookResult};
pub use notebook::{
    Cell, CellType, CodeCell, MIN_NBFORMAT, Metadata, MimeBundle, Notebook, Output, TextCell,
};
pub use text::payload_text;
