//! Markdown to HTML conversion.

use super::escape::escape_html;
#[cfg(feature = "markdown")]
use super::highlight::CodeHighlighter;

/// How markdown cell sources are turned into markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkdownConverter {
    /// CommonMark with tables, footnotes, strikethrough and task lists.
    /// Fenced code blocks that name a language go through the code highlighter.
    #[cfg(feature = "markdown")]
    CommonMark,

    /// Escaped text with `<br>` line breaks.
    Plain,
}

impl MarkdownConverter {
    /// The best converter this build supports.
    #[cfg(feature = "markdown")]
    pub fn detect() -> Self {
        MarkdownConverter::CommonMark
    }

    /// The best converter this build supports.
    #[cfg(not(feature = "markdown"))]
    pub fn detect() -> Self {
        MarkdownConverter::Plain
    }

    /// Convert `text` to HTML. Never fails.
    pub fn convert(self, text: &str) -> String {
        match self {
            #[cfg(feature = "markdown")]
            MarkdownConverter::CommonMark => commonmark(text, CodeHighlighter::detect()),
            MarkdownConverter::Plain => escape_html(text).replace('\n', "<br>\n"),
        }
    }
}

/// Convert markdown with the best available converter.
pub fn markdown_to_html(text: &str) -> String {
    MarkdownConverter::detect().convert(text)
}

#[cfg(feature = "markdown")]
fn commonmark(text: &str, highlighter: CodeHighlighter) -> String {
    use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let mut events = Vec::new();
    // (language, code) of the fenced block being collected
    let mut fence: Option<(String, String)> = None;

    for event in Parser::new_ext(text, options) {
        if let Some((language, code)) = fence.as_mut() {
            match event {
                Event::Text(chunk) => code.push_str(&chunk),
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted = highlighter.format(code, language);
                    events.push(Event::Html(highlighted.into()));
                    fence = None;
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref info)))
                if fence_language(info).is_some() =>
            {
                let language = fence_language(info).unwrap_or_default().to_string();
                fence = Some((language, String::new()));
            }
            other => events.push(other),
        }
    }

    let mut output = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut output, events.into_iter());
    output
}

/// Language named in a fence info string (` ```python title="x" `).
#[cfg(feature = "markdown")]
fn fence_language(info: &str) -> Option<&str> {
    info.split_whitespace().next().filter(|lang| !lang.is_empty())
}
