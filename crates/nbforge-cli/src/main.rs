//! nbforge CLI - Export Jupyter notebooks to HTML through templates.

mod colors;
mod export;
mod templates;

use std::path::PathBuf;

use clap::Parser;
use nbforge_core::{DEFAULT_TEMPLATE, ExportError, Exporter, ExporterConfig};

#[derive(Parser)]
#[command(name = "nbforge")]
#[command(about = "Export Jupyter notebooks to HTML using Jinja templates")]
#[command(version)]
struct Cli {
    /// Path to the input .ipynb file
    input: Option<PathBuf>,

    /// Path where the exported HTML is written
    output: Option<PathBuf>,

    /// Template to use for export
    #[arg(short, long, default_value = DEFAULT_TEMPLATE)]
    template: String,

    /// Directory containing custom templates (built-in templates otherwise)
    #[arg(long, env = "NBFORGE_TEMPLATE_DIR")]
    template_dir: Option<PathBuf>,

    /// YAML configuration file for batch export
    #[arg(short, long, conflicts_with_all = ["input", "output"])]
    config: Option<PathBuf>,

    /// Extra template variable (KEY=VALUE, VALUE parsed as JSON when possible)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = export::parse_var)]
    vars: Vec<(String, serde_json::Value)>,

    /// List available templates and exit
    #[arg(long)]
    list_templates: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Helper to format export errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(export_err) = err.downcast_ref::<ExportError>() {
            anyhow::anyhow!("{}", export_err.with_hint())
        } else {
            err
        }
    };

    if let Some(dir) = &cli.template_dir {
        if !dir.is_dir() {
            anyhow::bail!("Template directory not found: {}", dir.display());
        }
    }
    let exporter = Exporter::new(ExporterConfig::with_template_dir(cli.template_dir.clone()));

    if cli.list_templates {
        templates::list(&exporter);
        return Ok(());
    }

    if let Some(config) = &cli.config {
        return export::execute_batch(&exporter, config).map_err(format_error);
    }

    let (Some(input), Some(output)) = (&cli.input, &cli.output) else {
        anyhow::bail!(
            "INPUT and OUTPUT are required unless using --list-templates or --config"
        );
    };

    export::execute(&exporter, input, output, &cli.template, cli.vars).map_err(format_error)
}
