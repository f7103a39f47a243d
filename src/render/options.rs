//! Rendering options and configuration.

use std::ops::RangeInclusive;

/// Default preview length for section snippets, in characters.
pub const DEFAULT_SNIPPET_LEN: usize = 180;

/// Options for rendering extracted sections.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Maximum heading level (1-6)
    pub max_heading_level: u8,

    /// Include YAML frontmatter with metadata
    pub include_frontmatter: bool,

    /// Emit a heading line for the preamble section
    pub show_preamble_title: bool,

    /// Section selection
    pub section_selection: SectionSelection,

    /// Snippet length for previews (0 = no truncation)
    pub snippet_len: usize,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable the preamble heading line.
    pub fn with_preamble_title(mut self, show: bool) -> Self {
        self.show_preamble_title = show;
        self
    }

    /// Set section selection.
    pub fn with_sections(mut self, selection: SectionSelection) -> Self {
        self.section_selection = selection;
        self
    }

    /// Set the snippet length.
    pub fn with_snippet_len(mut self, len: usize) -> Self {
        self.snippet_len = len;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_heading_level: 6,
            include_frontmatter: false,
            show_preamble_title: false,
            section_selection: SectionSelection::All,
            snippet_len: DEFAULT_SNIPPET_LEN,
        }
    }
}

/// Section selection by `order_index`.
#[derive(Debug, Clone, Default)]
pub enum SectionSelection {
    /// Render all sections
    #[default]
    All,
    /// Render a range of sections (inclusive, 0-based)
    Range(RangeInclusive<usize>),
    /// Render several ranges of sections (inclusive, 0-based)
    Ranges(Vec<RangeInclusive<usize>>),
}

impl SectionSelection {
    /// Check if a section index should be included.
    pub fn includes(&self, index: usize) -> bool {
        match self {
            SectionSelection::All => true,
            SectionSelection::Range(range) => range.contains(&index),
            SectionSelection::Ranges(ranges) => ranges.iter().any(|r| r.contains(&index)),
        }
    }

    /// Parse a selection string (e.g., "0-3", "0,2,5-7").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(SectionSelection::All);
        }

        let mut ranges = Vec::new();
        for part in s.split(',') {
            ranges.push(parse_range(part)?);
        }

        if ranges.len() == 1 {
            return Ok(SectionSelection::Range(ranges.remove(0)));
        }
        ranges.sort_unstable_by_key(|r| *r.start());
        Ok(SectionSelection::Ranges(ranges))
    }
}

/// Parse `N` or `START-END` into an inclusive range.
fn parse_range(part: &str) -> Result<RangeInclusive<usize>, String> {
    let part = part.trim();
    let Some((start, end)) = part.split_once('-') else {
        let index: usize = part
            .parse()
            .map_err(|_| format!("Invalid section index '{}'", part))?;
        return Ok(index..=index);
    };

    let start: usize = start
        .trim()
        .parse()
        .map_err(|_| format!("Invalid start index in '{}'", part))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|_| format!("Invalid end index in '{}'", part))?;
    if end < start {
        return Err(format!("Range '{}' ends before it starts", part));
    }
    Ok(start..=end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_frontmatter(true)
            .with_max_heading(9)
            .with_snippet_len(40);

        assert!(options.include_frontmatter);
        assert_eq!(options.max_heading_level, 6);
        assert_eq!(options.snippet_len, 40);
    }

    #[test]
    fn test_section_selection_includes() {
        let all = SectionSelection::All;
        assert!(all.includes(0));
        assert!(all.includes(100));

        let range = SectionSelection::Range(2..=4);
        assert!(!range.includes(1));
        assert!(range.includes(2));
        assert!(range.includes(4));
        assert!(!range.includes(5));
    }

    #[test]
    fn test_section_selection_parse() {
        assert!(matches!(
            SectionSelection::parse("all").unwrap(),
            SectionSelection::All
        ));
        assert!(matches!(
            SectionSelection::parse("0-3").unwrap(),
            SectionSelection::Range(_)
        ));

        let mixed = SectionSelection::parse("5,0,2-3,3").unwrap();
        let included: Vec<usize> = (0..8).filter(|i| mixed.includes(*i)).collect();
        assert_eq!(included, vec![0, 2, 3, 5]);

        assert!(SectionSelection::parse("a-b").is_err());
    }

    #[test]
    fn test_section_selection_rejects_reversed_range() {
        assert!(SectionSelection::parse("5-2").is_err());
        assert!(SectionSelection::parse("0,5-2").is_err());
        assert!(SectionSelection::parse("3-3").is_ok());
    }

    #[test]
    fn test_section_selection_huge_range_is_not_expanded() {
        let selection = SectionSelection::parse("0,0-4000000000").unwrap();
        match &selection {
            SectionSelection::Ranges(ranges) => assert_eq!(ranges.len(), 2),
            other => panic!("Expected Ranges variant, got {:?}", other),
        }
        assert!(selection.includes(3_999_999_999));
        assert!(!selection.includes(4_000_000_001));
    }
}
