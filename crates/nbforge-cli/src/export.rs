//! Export commands for the nbforge CLI.

use std::path::Path;
use std::time::Instant;

use nbforge_core::{BatchConfig, Exporter, ExtraContext};

use crate::colors;

/// Export a single notebook.
pub fn execute(
    exporter: &Exporter,
    input: &Path,
    output: &Path,
    template: &str,
    vars: Vec<(String, serde_json::Value)>,
) -> anyhow::Result<()> {
    let extra: ExtraContext = vars.into_iter().collect();
    let start = Instant::now();
    let summary = exporter.export(input, output, template, &extra)?;

    if summary.fallback {
        println!(
            "{}⚠ Template '{}' not found, used '{}'{}",
            colors::YELLOW,
            template,
            summary.template,
            colors::RESET
        );
    }
    println!(
        "{}Exported{} {} to {}{}{} {}({} cells, {:.1}ms){}",
        colors::GREEN,
        colors::RESET,
        input.display(),
        colors::CYAN,
        output.display(),
        colors::RESET,
        colors::DIM,
        summary.cells,
        start.elapsed().as_secs_f64() * 1000.0,
        colors::RESET
    );

    Ok(())
}

/// Export every notebook listed in a batch configuration file.
pub fn execute_batch(exporter: &Exporter, config_path: &Path) -> anyhow::Result<()> {
    let config = BatchConfig::from_path(config_path)?;
    let start = Instant::now();

    println!(
        "\n{}nbforge batch{} - {}{}{}",
        colors::BOLD,
        colors::RESET,
        colors::CYAN,
        config_path.display(),
        colors::RESET
    );
    println!("{}", "─".repeat(50));

    let report = exporter.export_batch(&config);

    for outcome in &report.outcomes {
        let record = &outcome.record;
        match &outcome.result {
            Ok(summary) => println!(
                "  {} → {} {}✓{} ({})",
                record.input.display(),
                record.output.display(),
                colors::GREEN,
                colors::RESET,
                summary.template
            ),
            Err(e) => println!(
                "  {} → {} {}✗{} {}",
                record.input.display(),
                record.output.display(),
                colors::RED,
                colors::RESET,
                e
            ),
        }
    }

    let failed = report.failed().count();
    println!("{}", "─".repeat(50));
    println!(
        "Exported {}/{} notebooks using config: {} ({:.2}s)",
        report.outcomes.len() - failed,
        report.outcomes.len(),
        config_path.display(),
        start.elapsed().as_secs_f64()
    );

    if failed > 0 {
        anyhow::bail!("{} of {} exports failed", failed, report.outcomes.len());
    }
    Ok(())
}

/// Parse a `KEY=VALUE` template variable.
///
/// The value is read as JSON when it parses (`3`, `true`, `["a"]`) and kept
/// as a string otherwise.
pub fn parse_var(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty variable name in '{}'", raw));
    }

    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
