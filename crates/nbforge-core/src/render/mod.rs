//! Cell and output rendering.
//!
//! The pieces templates reach through filters:
//! - [`output`] renders one cell output to HTML
//! - [`highlight`] formats source code
//! - [`markdown`] converts markdown cells
//! - [`identity`] derives stable cell identifiers
//! - [`filters`] binds all of the above into a template environment

pub mod escape;
pub mod filters;
pub mod highlight;
pub mod identity;
pub mod markdown;
pub mod output;

pub use escape::escape_html;
pub use filters::{FILTER_NAMES, register_filters};
pub use highlight::{CodeHighlighter, DEFAULT_LANGUAGE, format_code};
pub use identity::{cell_id, derive_id};
pub use markdown::{MarkdownConverter, markdown_to_html};
pub use output::render_output;
