//! Source code formatting.
//!
//! With the `highlight` feature, code is tokenised by syntect and emitted as
//! class-annotated spans inside `<div class="highlight">`, so any
//! Pygments-style stylesheet applies. Without the feature, or for a language
//! syntect does not know, the code is escaped into a plain
//! `<pre><code class="language-…">` block.

#[cfg(feature = "highlight")]
use std::sync::LazyLock;

#[cfg(feature = "highlight")]
use syntect::parsing::SyntaxSet;

use super::escape::escape_html;

/// Language assumed when a template does not name one.
pub const DEFAULT_LANGUAGE: &str = "python";

#[cfg(feature = "highlight")]
static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// How code blocks are turned into markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeHighlighter {
    /// Token-level highlighting with syntect.
    #[cfg(feature = "highlight")]
    Syntect,

    /// Escaped text tagged with its language.
    Plain,
}

impl CodeHighlighter {
    /// The best highlighter this build supports.
    #[cfg(feature = "highlight")]
    pub fn detect() -> Self {
        CodeHighlighter::Syntect
    }

    /// The best highlighter this build supports.
    #[cfg(not(feature = "highlight"))]
    pub fn detect() -> Self {
        CodeHighlighter::Plain
    }

    /// Format `code` written in `language`. Never fails.
    pub fn format(self, code: &str, language: &str) -> String {
        match self {
            #[cfg(feature = "highlight")]
            CodeHighlighter::Syntect => {
                highlight_classed(code, language).unwrap_or_else(|| plain_code(code, language))
            }
            CodeHighlighter::Plain => plain_code(code, language),
        }
    }
}

/// Format code with the best available highlighter.
pub fn format_code(code: &str, language: Option<&str>) -> String {
    CodeHighlighter::detect().format(code, language.unwrap_or(DEFAULT_LANGUAGE))
}

fn plain_code(code: &str, language: &str) -> String {
    format!(
        r#"<pre><code class="language-{}">{}</code></pre>"#,
        escape_html(language),
        escape_html(code)
    )
}

#[cfg(feature = "highlight")]
fn highlight_classed(code: &str, language: &str) -> Option<String> {
    use syntect::html::{ClassStyle, ClassedHTMLGenerator};
    use syntect::util::LinesWithEndings;

    let syntax = SYNTAX_SET.find_syntax_by_token(language)?;
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);

    for line in LinesWithEndings::from(code) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            tracing::debug!("Highlighting {} failed, using plain code: {}", language, e);
            return None;
        }
    }

    Some(format!(
        "<div class=\"highlight\"><pre>{}</pre></div>\n",
        generator.finalize()
    ))
}
