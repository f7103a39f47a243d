//! Extraction statistics.

use serde::{Deserialize, Serialize};

/// Statistics collected during section extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Number of blocks read
    pub block_count: u32,

    /// Number of sections produced
    pub section_count: u32,

    /// Number of heading blocks
    pub heading_count: u32,

    /// Number of paragraph blocks
    pub paragraph_count: u32,

    /// Number of table blocks
    pub table_count: u32,

    /// Number of tables whose rows had to be padded
    pub ragged_table_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment heading count.
    pub fn add_heading(&mut self) {
        self.block_count += 1;
        self.heading_count += 1;
    }

    /// Increment paragraph count.
    pub fn add_paragraph(&mut self) {
        self.block_count += 1;
        self.paragraph_count += 1;
    }

    /// Increment table count.
    pub fn add_table(&mut self, ragged: bool) {
        self.block_count += 1;
        self.table_count += 1;
        if ragged {
            self.ragged_table_count += 1;
        }
    }

    /// Increment section count.
    pub fn add_section(&mut self) {
        self.section_count += 1;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.block_count += other.block_count;
        self.section_count += other.section_count;
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.table_count += other.table_count;
        self.ragged_table_count += other.ragged_table_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}
