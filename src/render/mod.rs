//! Rendering module for converting sections to various output formats.

mod json;
mod markdown;
mod options;
mod result;
mod table;
mod text;

pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::{RenderOptions, SectionSelection, DEFAULT_SNIPPET_LEN};
pub use result::ExtractionStats;
pub use table::{parse_table, render_table};
pub use text::{snippet, to_text};
