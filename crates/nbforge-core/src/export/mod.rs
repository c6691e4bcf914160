//! Notebook export.
//!
//! Loads a notebook, renders it through a template and writes the HTML.
//!
//! ```text
//! notebook.ipynb ──► Notebook ──► RenderContext ─┐
//!                                                 ├──► Environment + filters ──► output.html
//! template name ──► TemplateResolver ──► entry ──┘
//! ```
//!
//! Each export builds its own template environment, so independent exports
//! share nothing mutable.

mod batch;
mod context;

pub use batch::{BatchConfig, BatchReport, ExportRecord, RecordOutcome};
pub use context::{ExtraContext, RenderContext};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use minijinja::{AutoEscape, Environment};
use nbforge_notebook::Notebook;

use crate::error::{ExportError, ExportResult};
use crate::render::register_filters;
use crate::templates::{DEFAULT_TEMPLATE, ResolvedTemplate, TemplateResolver, TemplateRoot};

/// Exporter settings.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Where templates are looked up.
    pub template_root: TemplateRoot,

    /// Template used when the requested one is missing.
    pub default_template: String,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            template_root: TemplateRoot::Builtin,
            default_template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl ExporterConfig {
    /// Settings for an optional template directory, built-ins otherwise.
    pub fn with_template_dir(template_dir: Option<PathBuf>) -> Self {
        Self {
            template_root: template_dir.map_or(TemplateRoot::Builtin, TemplateRoot::Directory),
            ..Default::default()
        }
    }
}

/// A rendered notebook, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub html: String,
    pub template: ResolvedTemplate,
}

/// What a completed export did.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub output: PathBuf,

    /// Template actually used.
    pub template: String,

    /// Whether the default template replaced a missing one.
    pub fallback: bool,

    pub cells: usize,
    pub bytes: usize,
}

/// Renders notebooks to HTML files.
#[derive(Debug, Clone)]
pub struct Exporter {
    resolver: TemplateResolver,
}

impl Exporter {
    pub fn new(config: ExporterConfig) -> Self {
        Self {
            resolver: TemplateResolver::new(config.template_root)
                .with_default(config.default_template),
        }
    }

    /// An exporter over the built-in templates.
    pub fn builtin() -> Self {
        Self::new(ExporterConfig::default())
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    /// Names of the available templates.
    pub fn available_templates(&self) -> Vec<String> {
        self.resolver.list()
    }

    /// Export one notebook file to an HTML file.
    ///
    /// The output's parent directories are created and an existing file is
    /// overwritten.
    ///
    /// # Errors
    /// Fails if the notebook cannot be loaded, no template resolves, the
    /// template fails to render, or the output cannot be written.
    pub fn export(
        &self,
        notebook_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        template: &str,
        extra: &ExtraContext,
    ) -> ExportResult<ExportSummary> {
        let start = Instant::now();
        let notebook_path = notebook_path.as_ref();
        let output_path = output_path.as_ref();

        let notebook = Notebook::from_path(notebook_path)?;
        let rendered = self.render(&notebook, template, extra)?;
        write_output(output_path, &rendered.html)?;

        tracing::info!(
            "Exported {} → {} ({} cells, template '{}', {:.1}ms)",
            notebook_path.display(),
            output_path.display(),
            notebook.cells.len(),
            rendered.template.name,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(ExportSummary {
            output: output_path.to_path_buf(),
            template: rendered.template.name,
            fallback: rendered.template.fallback,
            cells: notebook.cells.len(),
            bytes: rendered.html.len(),
        })
    }

    /// Render an in-memory notebook with the named template.
    pub fn render(
        &self,
        notebook: &Notebook,
        template: &str,
        extra: &ExtraContext,
    ) -> ExportResult<Rendered> {
        let context = RenderContext::new(notebook, extra);
        let resolved = self.resolver.resolve(template)?;
        let env = self.environment(&resolved);

        let render_error = |source| ExportError::TemplateRender {
            template: resolved.entry.clone(),
            source,
        };
        let html = env
            .get_template(&resolved.entry)
            .and_then(|tmpl| tmpl.render(context.to_value()))
            .map_err(render_error)?;

        Ok(Rendered {
            html,
            template: resolved,
        })
    }

    /// Run every record of a batch, in order.
    ///
    /// A failing record is logged and does not stop the remaining ones.
    pub fn export_batch(&self, config: &BatchConfig) -> BatchReport {
        let mut report = BatchReport::default();

        for record in &config.exports {
            let result = self.export(&record.input, &record.output, &record.template, &record.context);
            if let Err(e) = &result {
                tracing::warn!("Export of {} failed: {}", record.input.display(), e);
            }
            report.outcomes.push(RecordOutcome {
                record: record.clone(),
                result,
            });
        }

        report
    }

    /// A fresh template environment for `template`, filters attached.
    fn environment(&self, template: &ResolvedTemplate) -> Environment<'static> {
        let mut env = Environment::new();
        // Filters decide what is markup; plain variables render verbatim.
        env.set_auto_escape_callback(|_| AutoEscape::None);

        let loader = self.resolver.loader_for(template);
        env.set_loader(move |name| loader.load(name));

        register_filters(&mut env);
        env
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Write `html` to `path`, creating parent directories.
fn write_output(path: &Path, html: &str) -> ExportResult<()> {
    let write_error = |source| ExportError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, html).map_err(write_error)
}
