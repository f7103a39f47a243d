//! Parsing options and configuration.

use std::collections::HashMap;

/// Options for reading DOCX documents.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Error handling mode for optional package parts
    pub error_mode: ErrorMode,

    /// Extra paragraph style names treated as headings, with their level
    pub heading_styles: HashMap<String, u8>,

    /// Emit paragraphs with no text instead of skipping them
    pub keep_empty_paragraphs: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail on unreadable styles or document properties.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Treat paragraphs with the given style name as headings of `level`.
    ///
    /// Names are compared case-insensitively. The level is clamped to 1..=9.
    pub fn with_heading_style(mut self, name: impl Into<String>, level: u8) -> Self {
        self.heading_styles
            .insert(name.into().to_lowercase(), level.clamp(1, 9));
        self
    }

    /// Keep or skip empty paragraphs.
    pub fn with_empty_paragraphs(mut self, keep: bool) -> Self {
        self.keep_empty_paragraphs = keep;
        self
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    Strict,
    /// Skip unreadable optional parts and continue
    #[default]
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .strict()
            .with_heading_style("Chapitre", 1)
            .with_heading_style("Deep", 42)
            .with_empty_paragraphs(true);

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.heading_styles.get("chapitre"), Some(&1));
        assert_eq!(options.heading_styles.get("deep"), Some(&9));
        assert!(options.keep_empty_paragraphs);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(options.heading_styles.is_empty());
        assert!(!options.keep_empty_paragraphs);
    }
}
