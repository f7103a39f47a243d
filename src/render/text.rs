//! Plain text rendering and previews.

use crate::model::Section;

use super::RenderOptions;

/// Convert selected sections to plain text, one block per section.
pub fn to_text(sections: &[Section], options: &RenderOptions) -> String {
    sections
        .iter()
        .filter(|s| options.section_selection.includes(s.order_index))
        .map(|s| {
            if s.is_preamble() && !options.show_preamble_title {
                s.text()
            } else {
                format!("{}\n\n{}", s.title, s.text())
            }
        })
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Shorten text to at most `max_chars` characters, appending an ellipsis
/// when truncated. Line breaks are flattened to spaces.
pub fn snippet(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if max_chars == 0 || flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.push('…');
    cut
}
