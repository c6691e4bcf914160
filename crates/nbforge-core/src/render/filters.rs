//! Template filters.
//!
//! Every template engine built for an export gets the same fixed set of
//! filters, so templates can call the renderers by name:
//!
//! | Filter          | Input        | Output |
//! |-----------------|--------------|--------|
//! | `markdown`      | text         | HTML from markdown |
//! | `escape_html`   | text         | HTML-escaped text |
//! | `render_output` | cell output  | HTML fragment for the output |
//! | `format_code`   | code, [lang] | highlighted code block |
//! | `cell_id`       | cell         | stable cell identifier |
//!
//! Markup-producing filters return safe strings, so they are not escaped
//! again even when a template turns auto-escaping on.

use minijinja::{Environment, Error, Value};
use nbforge_notebook::{Output, payload_text};

use super::escape::escape_html;
use super::highlight::format_code;
use super::identity::derive_id;
use super::markdown::markdown_to_html;
use super::output::render_output;

/// Names of all registered filters.
pub const FILTER_NAMES: [&str; 5] = [
    "markdown",
    "escape_html",
    "render_output",
    "format_code",
    "cell_id",
];

/// Register the notebook filters on a template environment.
///
/// Registering twice replaces the same entries.
pub fn register_filters(env: &mut Environment<'_>) {
    env.add_filter("markdown", markdown_filter);
    env.add_filter("escape_html", escape_html_filter);
    env.add_filter("render_output", render_output_filter);
    env.add_filter("format_code", format_code_filter);
    env.add_filter("cell_id", cell_id_filter);
}

fn markdown_filter(text: &str) -> Value {
    Value::from_safe_string(markdown_to_html(text))
}

fn escape_html_filter(text: &str) -> Value {
    Value::from_safe_string(escape_html(text))
}

fn format_code_filter(code: &str, language: Option<&str>) -> Value {
    Value::from_safe_string(format_code(code, language))
}

fn render_output_filter(output: Value) -> Value {
    let output = serde_json::to_value(&output)
        .map(Output::from_json)
        .unwrap_or(Output::Unknown);
    Value::from_safe_string(render_output(&output))
}

fn cell_id_filter(cell: Value) -> Result<String, Error> {
    let id = cell.get_attr("id")?;
    if !id.is_undefined() && !id.is_none() {
        return Ok(id.to_string());
    }

    let source = serde_json::to_value(cell.get_attr("source")?)
        .ok()
        .and_then(|source| payload_text(&source))
        .unwrap_or_default();
    Ok(derive_id(&source))
}
