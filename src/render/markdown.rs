//! Markdown rendering for extracted sections.

use crate::model::{Fragment, Metadata, Section};

use super::RenderOptions;

/// Convert sections to Markdown.
pub fn to_markdown(sections: &[Section], metadata: &Metadata, options: &RenderOptions) -> String {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(sections, metadata)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render sections to Markdown.
    pub fn render(&self, sections: &[Section], metadata: &Metadata) -> String {
        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&metadata.to_yaml_frontmatter());
        }

        for section in sections {
            if self.options.section_selection.includes(section.order_index) {
                self.render_section(&mut output, section);
            }
        }

        output.trim().to_string()
    }

    fn render_section(&self, output: &mut String, section: &Section) {
        if !section.is_preamble() || self.options.show_preamble_title {
            let level = section.level.max(1).min(self.options.max_heading_level.max(1));
            output.push_str(&"#".repeat(level as usize));
            output.push(' ');
            output.push_str(&escape_markdown(&section.title));
            output.push_str("\n\n");
        }

        for fragment in &section.content {
            match fragment {
                Fragment::Text { text } => {
                    if text.trim().is_empty() {
                        continue;
                    }
                    output.push_str(&escape_markdown(text));
                }
                // Table text is already in pipe-table form.
                Fragment::Table { text, .. } => output.push_str(text),
            }
            output.push_str("\n\n");
        }
    }
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
