//! Section extraction from a block stream.
//!
//! The extractor walks blocks in reading order and groups them into
//! [`Section`]s, one per heading. Content that appears before the first
//! heading is collected into a `<preamble>` placeholder, which is kept only
//! when it received content.
//!
//! Every paragraph and table block ends up in exactly one section, and
//! extraction never fails: ragged tables are padded rather than rejected.
//!
//! # Example
//!
//! ```
//! use docmap::extract::extract;
//! use docmap::model::Block;
//!
//! let sections = extract(&[
//!     Block::heading(1, "Intro"),
//!     Block::paragraph("Hello"),
//!     Block::heading(1, "Pricing"),
//!     Block::table([["A", "B"], ["1", "2"]]),
//! ]);
//!
//! assert_eq!(sections.len(), 2);
//! assert_eq!(sections[0].title, "Intro");
//! assert_eq!(sections[0].text(), "Hello");
//! assert_eq!(sections[1].order_index, 1);
//! ```

use log::debug;

use crate::model::{Block, Fragment, Section};
use crate::render::ExtractionStats;

/// Extract sections from a block stream.
pub fn extract(blocks: &[Block]) -> Vec<Section> {
    let mut extractor = SectionExtractor::new();
    extractor.push_all(blocks);
    extractor.finish()
}

/// Extract sections and collect statistics.
pub fn extract_with_stats(blocks: &[Block]) -> (Vec<Section>, ExtractionStats) {
    let mut extractor = SectionExtractor::new();
    extractor.push_all(blocks);
    extractor.finish_with_stats()
}

/// Incremental section extractor.
///
/// Blocks are fed one at a time with [`push`](Self::push); the section list
/// is produced by [`finish`](Self::finish).
#[derive(Debug)]
pub struct SectionExtractor {
    sections: Vec<Section>,
    current: Section,
    in_preamble: bool,
    stats: ExtractionStats,
}

impl SectionExtractor {
    /// Create an extractor whose current section is the preamble placeholder.
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            current: Section::preamble(),
            in_preamble: true,
            stats: ExtractionStats::new(),
        }
    }

    /// Feed one block.
    pub fn push(&mut self, block: &Block) {
        match block {
            Block::Heading { level, text } => {
                self.stats.add_heading();
                self.close_current();
                self.current = Section::new(text.clone(), *level);
                self.in_preamble = false;
            }
            Block::Paragraph { text } => {
                self.stats.add_paragraph();
                self.stats.count_text(text);
                self.current.content.push(Fragment::text(text.clone()));
            }
            Block::Table(table) => {
                let ragged = !table.is_rectangular();
                if ragged {
                    debug!(
                        "padding ragged table ({} rows) in section {:?}",
                        table.row_count(),
                        self.current.title
                    );
                }
                self.stats.add_table(ragged);
                for row in &table.rows {
                    for cell in row {
                        self.stats.count_text(cell);
                    }
                }
                // Tables belong to the most recently opened section.
                self.current.content.push(Fragment::table(table));
            }
        }
    }

    /// Feed a sequence of blocks.
    pub fn push_all<'a>(&mut self, blocks: impl IntoIterator<Item = &'a Block>) {
        for block in blocks {
            self.push(block);
        }
    }

    /// Close the last section and return all sections in document order.
    pub fn finish(self) -> Vec<Section> {
        self.finish_with_stats().0
    }

    /// Like [`finish`](Self::finish), also returning the collected statistics.
    pub fn finish_with_stats(mut self) -> (Vec<Section>, ExtractionStats) {
        self.close_current();
        debug!(
            "extracted {} sections from {} blocks",
            self.sections.len(),
            self.stats.block_count
        );
        (self.sections, self.stats)
    }

    /// Move the current section to the output unless it is an empty preamble.
    fn close_current(&mut self) {
        let mut closed = std::mem::replace(&mut self.current, Section::preamble());
        if self.in_preamble && closed.is_empty() {
            return;
        }
        closed.order_index = self.sections.len();
        self.stats.add_section();
        self.sections.push(closed);
    }
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PREAMBLE_TITLE;

    #[test]
    fn test_empty_stream() {
        assert!(extract(&[]).is_empty());
    }

    #[test]
    fn test_preamble_kept_only_with_content() {
        let sections = extract(&[Block::heading(1, "A")]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "A");

        let sections = extract(&[Block::paragraph("before"), Block::heading(1, "A")]);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, PREAMBLE_TITLE);
        assert_eq!(sections[0].level, 0);
        assert_eq!(sections[0].text(), "before");
    }

    #[test]
    fn test_empty_headings_retained() {
        let sections = extract(&[
            Block::heading(1, "One"),
            Block::heading(2, "Two"),
            Block::paragraph("body"),
        ]);
        assert_eq!(sections.len(), 2);
        assert!(sections[0].is_empty());
        assert_eq!(sections[1].text(), "body");
    }

    #[test]
    fn test_table_after_consecutive_headings() {
        let sections = extract(&[
            Block::heading(1, "Chapter"),
            Block::heading(2, "Figures"),
            Block::table([["k", "v"]]),
        ]);
        assert!(sections[0].is_empty());
        assert_eq!(sections[1].table_count(), 1);
    }

    #[test]
    fn test_table_without_heading_goes_to_preamble() {
        let sections = extract(&[Block::table([["x"]]), Block::heading(1, "Next")]);
        assert!(sections[0].is_preamble());
        assert_eq!(sections[0].table_count(), 1);
        assert!(sections[1].is_empty());
    }

    #[test]
    fn test_paragraph_fragments_not_merged() {
        let sections = extract(&[
            Block::heading(1, "Intro"),
            Block::paragraph("one"),
            Block::paragraph("two"),
        ]);
        assert_eq!(sections[0].content.len(), 2);
        assert_eq!(sections[0].text(), "one\n\ntwo");
    }

    #[test]
    fn test_ragged_table_is_padded() {
        let (sections, stats) = extract_with_stats(&[Block::table(vec![
            vec!["a", "b"],
            vec!["c"],
        ])]);
        match &sections[0].content[0] {
            Fragment::Table { table, .. } => assert_eq!(table.rows[1], vec!["c", ""]),
            other => panic!("unexpected fragment: {:?}", other),
        }
        assert_eq!(stats.ragged_table_count, 1);
    }

    #[test]
    fn test_stats() {
        let (_, stats) = extract_with_stats(&[
            Block::paragraph("cover"),
            Block::heading(1, "Intro"),
            Block::paragraph("Hello world"),
            Block::table([["A", "B"]]),
        ]);
        assert_eq!(stats.block_count, 4);
        assert_eq!(stats.section_count, 2);
        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.paragraph_count, 2);
        assert_eq!(stats.table_count, 1);
        assert_eq!(stats.word_count, 5);
    }
}
