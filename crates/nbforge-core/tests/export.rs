//! Integration tests for notebook export.
//!
//! Tests the full pipeline: .ipynb → template → .html on disk.

use std::fs;
use std::path::{Path, PathBuf};

use nbforge_core::{
    BatchConfig, ExportError, ExportRecord, Exporter, ExporterConfig, ExtraContext, TemplateRoot,
};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a temporary directory for test artifacts.
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// A notebook with one markdown cell and one code cell printing `1`.
fn title_notebook() -> String {
    json!({
        "cells": [
            {"cell_type": "markdown", "metadata": {}, "source": "# Title"},
            {
                "cell_type": "code",
                "execution_count": 1,
                "metadata": {},
                "source": "x = 1",
                "outputs": [{"output_type": "stream", "name": "stdout", "text": "1\n"}]
            }
        ],
        "metadata": {"language_info": {"name": "python"}},
        "nbformat": 4,
        "nbformat_minor": 5
    })
    .to_string()
}

/// A notebook exercising every output kind.
fn rich_notebook() -> String {
    json!({
        "cells": [
            {
                "cell_type": "code",
                "id": "rich-1",
                "execution_count": 3,
                "metadata": {},
                "source": ["df = load()\n", "df"],
                "outputs": [
                    {"output_type": "stream", "name": "stderr", "text": ["warn: a < b & c\n"]},
                    {
                        "output_type": "execute_result",
                        "execution_count": 3,
                        "metadata": {},
                        "data": {
                            "text/plain": ["   a\n", "0  1"],
                            "text/html": ["<table class=\"df\">", "<tr><td>1</td></tr>", "</table>"]
                        }
                    },
                    {
                        "output_type": "display_data",
                        "metadata": {},
                        "data": {"image/png": "iVBORw0KGgoAAAANSUhEUg=="}
                    },
                    {
                        "output_type": "error",
                        "ename": "KeyError",
                        "evalue": "'b'",
                        "traceback": ["Traceback <most recent>", "KeyError: 'b'"]
                    },
                    {"output_type": "mystery"}
                ]
            },
            {"cell_type": "raw", "metadata": {}, "source": "<raw & untouched>"}
        ],
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 5
    })
    .to_string()
}

fn write(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

fn dir_exporter(root: &Path) -> Exporter {
    Exporter::new(ExporterConfig::with_template_dir(Some(root.to_path_buf())))
}

// =============================================================================
// Single Export
// =============================================================================

#[test]
fn test_export_default_template() {
    let temp = temp_dir();
    let input = write(&temp.path().join("title.ipynb"), &title_notebook());
    let output = temp.path().join("out").join("title.html");

    let summary = Exporter::builtin()
        .export(&input, &output, "default", &ExtraContext::new())
        .unwrap();

    assert_eq!(summary.template, "default");
    assert!(!summary.fallback);
    assert_eq!(summary.cells, 2);

    let html = fs::read_to_string(&output).unwrap();
    assert_eq!(summary.bytes, html.len());
    #[cfg(feature = "markdown")]
    assert!(html.contains("<h1>Title</h1>"));
    #[cfg(not(feature = "markdown"))]
    assert!(html.contains("# Title"));
    assert!(html.contains("<pre class=\"stream-output\">1\n</pre>"));
}

#[test]
fn test_export_uses_kernelspec_language() {
    let temp = temp_dir();
    let notebook = json!({
        "cells": [
            {"cell_type": "code", "execution_count": 1, "metadata": {}, "source": "x <- c(1, 2)", "outputs": []}
        ],
        "metadata": {"kernelspec": {"display_name": "R", "language": "R", "name": "ir"}},
        "nbformat": 4,
        "nbformat_minor": 5
    });
    let input = write(&temp.path().join("r.ipynb"), &notebook.to_string());
    let output = temp.path().join("r.html");

    Exporter::builtin()
        .export(&input, &output, "default", &ExtraContext::new())
        .unwrap();
    let html = fs::read_to_string(&output).unwrap();

    assert!(!html.contains("python"));
    #[cfg(feature = "highlight")]
    assert!(html.contains("source r"));
    #[cfg(not(feature = "highlight"))]
    assert!(html.contains("<pre><code class=\"language-R\">x &lt;- c(1, 2)</code></pre>"));
}

#[test]
fn test_export_all_output_kinds() {
    let temp = temp_dir();
    let input = write(&temp.path().join("rich.ipynb"), &rich_notebook());
    let output = temp.path().join("rich.html");

    Exporter::builtin()
        .export(&input, &output, "default", &ExtraContext::new())
        .unwrap();
    let html = fs::read_to_string(&output).unwrap();

    assert!(html.contains("id=\"rich-1\""));
    assert!(html.contains("<pre class=\"stream-output\">warn: a &lt; b &amp; c\n</pre>"));
    assert!(html.contains(
        "<div class=\"output-html\"><table class=\"df\"><tr><td>1</td></tr></table></div>"
    ));
    assert!(html.contains(
        "<img src=\"data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==\" class=\"output-image\" />"
    ));
    assert!(html.contains(
        "<pre class=\"error-output\">Traceback &lt;most recent&gt;\nKeyError: &#x27;b&#x27;</pre>"
    ));
    assert!(html.contains("<div class=\"unknown-output\">Unknown output type</div>"));
    assert!(html.contains("<pre class=\"raw\">&lt;raw &amp; untouched&gt;</pre>"));
}

#[test]
fn test_export_with_custom_template_dir() {
    let temp = temp_dir();
    let templates = temp.path().join("templates");
    write(
        &templates.join("custom-report/index.html.j2"),
        "<h1>{{ title }}</h1>{% for cell in cells %}{% include \"cell.j2\" %}{% endfor %}",
    );
    write(
        &templates.join("custom-report/cell.j2"),
        "<div id=\"{{ cell | cell_id }}\">{{ cell.source | escape_html }}</div>",
    );
    let input = write(&temp.path().join("nb.ipynb"), &title_notebook());
    let output = temp.path().join("report.html");

    let mut extra = ExtraContext::new();
    extra.insert("title".into(), json!("Quarterly"));

    dir_exporter(&templates)
        .export(&input, &output, "report", &extra)
        .unwrap();

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.starts_with("<h1>Quarterly</h1>"));
    assert!(html.contains(">x = 1</div>"));
    assert!(html.contains("<div id=\"cell-"));
}

#[test]
fn test_export_falls_back_to_default() {
    let temp = temp_dir();
    let templates = temp.path().join("templates");
    write(&templates.join("default.j2"), "cells={{ cells | length }}");
    let input = write(&temp.path().join("nb.ipynb"), &title_notebook());
    let output = temp.path().join("ghost.html");

    let summary = dir_exporter(&templates)
        .export(&input, &output, "ghost", &ExtraContext::new())
        .unwrap();

    assert!(summary.fallback);
    assert_eq!(fs::read_to_string(&output).unwrap(), "cells=2");
}

#[test]
fn test_export_overwrites_existing_output() {
    let temp = temp_dir();
    let templates = temp.path().join("templates");
    write(&templates.join("default.j2"), "fresh");
    let input = write(&temp.path().join("nb.ipynb"), &title_notebook());
    let output = write(&temp.path().join("out.html"), "stale content that is longer");

    dir_exporter(&templates)
        .export(&input, &output, "default", &ExtraContext::new())
        .unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "fresh");
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_malformed_notebook() {
    let temp = temp_dir();
    let input = write(&temp.path().join("bad.ipynb"), "{\"cells\": [");
    let output = temp.path().join("bad.html");

    let err = Exporter::builtin()
        .export(&input, &output, "default", &ExtraContext::new())
        .unwrap_err();

    assert!(matches!(err, ExportError::NotebookParse(_)));
    assert!(!output.exists());
}

#[test]
fn test_missing_notebook() {
    let temp = temp_dir();
    let output = temp.path().join("missing.html");

    let err = Exporter::builtin()
        .export(temp.path().join("missing.ipynb"), &output, "default", &ExtraContext::new())
        .unwrap_err();

    assert!(matches!(err, ExportError::NotebookParse(_)));
    assert!(err.to_string().contains("missing.ipynb"));
    assert!(err.hint().is_some());
    assert!(!output.exists());
}

#[test]
fn test_missing_template_without_default() {
    let temp = temp_dir();
    let templates = temp.path().join("templates");
    write(&templates.join("minimal.j2"), "");
    let input = write(&temp.path().join("nb.ipynb"), &title_notebook());

    let err = dir_exporter(&templates)
        .export(&input, temp.path().join("x.html"), "ghost", &ExtraContext::new())
        .unwrap_err();
    assert!(matches!(err, ExportError::TemplateNotFound { .. }));
}

#[test]
fn test_template_syntax_error() {
    let temp = temp_dir();
    let templates = temp.path().join("templates");
    write(&templates.join("default.j2"), "{% for cell in cells %}unclosed");
    let input = write(&temp.path().join("nb.ipynb"), &title_notebook());
    let output = temp.path().join("x.html");

    let err = dir_exporter(&templates)
        .export(&input, &output, "default", &ExtraContext::new())
        .unwrap_err();

    match err {
        ExportError::TemplateRender { template, .. } => assert_eq!(template, "default.j2"),
        other => panic!("expected TemplateRender, got {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn test_output_write_failure() {
    let temp = temp_dir();
    let input = write(&temp.path().join("nb.ipynb"), &title_notebook());
    // A file where a directory is needed.
    let blocker = write(&temp.path().join("blocker"), "");

    let err = Exporter::builtin()
        .export(&input, blocker.join("out.html"), "default", &ExtraContext::new())
        .unwrap_err();
    assert!(matches!(err, ExportError::OutputWrite { .. }));
}

// =============================================================================
// Batch Export
// =============================================================================

#[test]
fn test_batch_writes_each_output() {
    let temp = temp_dir();
    let a = write(&temp.path().join("a.ipynb"), &title_notebook());
    let b = write(&temp.path().join("b.ipynb"), &rich_notebook());

    let config = BatchConfig {
        exports: vec![
            ExportRecord {
                input: a,
                output: temp.path().join("site/a.html"),
                template: "default".to_string(),
                context: ExtraContext::new(),
            },
            ExportRecord {
                input: b,
                output: temp.path().join("site/b.html"),
                template: "minimal".to_string(),
                context: ExtraContext::new(),
            },
        ],
    };

    let report = Exporter::builtin().export_batch(&config);

    assert!(report.is_success());
    assert_eq!(report.succeeded().count(), 2);
    assert!(temp.path().join("site/a.html").is_file());
    assert!(temp.path().join("site/b.html").is_file());
}

#[test]
fn test_batch_continues_after_failure() {
    let temp = temp_dir();
    write(&temp.path().join("broken.ipynb"), "not a notebook");
    write(&temp.path().join("good.ipynb"), &title_notebook());

    let yaml = format!(
        "exports:\n  - input: {dir}/broken.ipynb\n    output: {dir}/broken.html\n  - input: {dir}/good.ipynb\n    output: {dir}/good.html\n    context:\n      title: Good\n",
        dir = temp.path().display()
    );
    let config_path = write(&temp.path().join("batch.yaml"), &yaml);
    let config = BatchConfig::from_path(&config_path).unwrap();

    let report = Exporter::builtin().export_batch(&config);

    assert!(!report.is_success());
    assert_eq!(report.outcomes.len(), 2);
    assert!(matches!(
        report.outcomes[0].result,
        Err(ExportError::NotebookParse(_))
    ));
    assert!(report.outcomes[1].result.is_ok());
    assert_eq!(report.failed().count(), 1);

    assert!(!temp.path().join("broken.html").exists());
    let html = fs::read_to_string(temp.path().join("good.html")).unwrap();
    assert!(html.contains("<title>Good</title>"));
}

#[test]
fn test_builtin_root_reported_in_errors() {
    let exporter = Exporter::new(ExporterConfig {
        template_root: TemplateRoot::Builtin,
        default_template: "nonexistent".to_string(),
    });

    let err = exporter.resolver().resolve("ghost").unwrap_err();
    assert!(err.to_string().contains("built-in templates"));
}
