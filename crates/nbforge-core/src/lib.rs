//! Template-driven HTML export for Jupyter notebooks.
//!
//! This crate provides:
//! - Output, code, and markdown rendering exposed to templates as filters
//! - Template discovery over flat (`<name>.j2`) and nested
//!   (`<name>/index.html.j2`) layouts, plus the built-in templates
//! - Single and batch export of notebooks to HTML files
//!
//! # Example
//!
//! ```no_run
//! use nbforge_core::{Exporter, ExtraContext};
//!
//! let exporter = Exporter::builtin();
//! exporter.export("analysis.ipynb", "site/analysis.html", "default", &ExtraContext::new())?;
//! # Ok::<(), nbforge_core::ExportError>(())
//! ```
//!
//! # Trust
//!
//! `text/html` outputs stored in a notebook are embedded into the page
//! without escaping. Exporting an untrusted notebook can inject script into
//! the result.

pub mod error;
pub mod export;
pub mod render;
pub mod templates;

pub use error::{ExportError, ExportResult};
pub use export::{
    BatchConfig, BatchReport, ExportRecord, ExportSummary, Exporter, ExporterConfig, ExtraContext,
    RecordOutcome, RenderContext, Rendered,
};
pub use templates::{
    DEFAULT_TEMPLATE, ResolvedTemplate, TemplateKind, TemplateResolver, TemplateRoot,
};

pub use nbforge_notebook::{Cell, Notebook, Output};
