//! Cell output rendering.
//!
//! Turns one [`Output`] record into an HTML fragment. Rendering never fails:
//! outputs that cannot be shown become a placeholder fragment.
//!
//! # Trust boundary
//!
//! `text/html` payloads are embedded verbatim, without escaping, so rich
//! output (tables, widgets, plots) renders as it did in Jupyter. A notebook
//! can therefore inject arbitrary markup and script into the exported page.
//! Only export notebooks from sources you trust.

use nbforge_notebook::{MimeBundle, Output, payload_text};

use super::escape::escape_html;

pub const MIME_HTML: &str = "text/html";
pub const MIME_PLAIN: &str = "text/plain";
const IMAGE_PREFIX: &str = "image/";

/// Placeholder emitted for outputs with no renderable form.
pub const UNKNOWN_OUTPUT: &str = r#"<div class="unknown-output">Unknown output type</div>"#;

/// Render a single cell output to HTML.
pub fn render_output(output: &Output) -> String {
    match output {
        Output::Stream { text, .. } => {
            format!(r#"<pre class="stream-output">{}</pre>"#, escape_html(text))
        }
        Output::ExecuteResult { data, .. } | Output::DisplayData { data, .. } => {
            render_mime_bundle(data).unwrap_or_else(|| UNKNOWN_OUTPUT.to_string())
        }
        Output::Error { traceback, .. } => {
            format!(
                r#"<pre class="error-output">{}</pre>"#,
                escape_html(&traceback.join("\n"))
            )
        }
        Output::Unknown => UNKNOWN_OUTPUT.to_string(),
    }
}

/// Pick the richest representation of a MIME bundle.
///
/// Priority: HTML, then plain text, then the first `image/*` entry in
/// bundle order.
fn render_mime_bundle(data: &MimeBundle) -> Option<String> {
    if let Some(html) = data.get(MIME_HTML).and_then(payload_text) {
        return Some(format!(r#"<div class="output-html">{}</div>"#, html));
    }

    if let Some(text) = data.get(MIME_PLAIN).and_then(payload_text) {
        return Some(format!(r#"<pre class="output-text">{}</pre>"#, escape_html(&text)));
    }

    data.iter()
        .filter(|(mime, _)| mime.starts_with(IMAGE_PREFIX))
        .find_map(|(mime, payload)| {
            // Base64 payloads may be split into lines by some writers.
            let encoded = payload_text(payload)?.replace('\n', "");
            Some(format!(
                r#"<img src="data:{};base64,{}" class="output-image" />"#,
                mime, encoded
            ))
        })
}
