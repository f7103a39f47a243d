//! Section types produced by the extractor.

use super::Table;
use serde::{Deserialize, Serialize};

/// Title of the synthetic section that holds content before the first heading.
pub const PREAMBLE_TITLE: &str = "<preamble>";

/// Separator placed between fragments when a section is joined into text.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// One piece of section content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fragment {
    /// A paragraph of text
    Text {
        /// Paragraph text
        text: String,
    },

    /// A table together with its rendered text
    Table {
        /// Normalized table
        table: Table,
        /// Stable textual rendering of `table`
        text: String,
    },
}

impl Fragment {
    /// Create a text fragment.
    pub fn text(text: impl Into<String>) -> Self {
        Fragment::Text { text: text.into() }
    }

    /// Create a table fragment; ragged rows are padded before rendering.
    pub fn table(table: &Table) -> Self {
        let table = table.normalized();
        let text = crate::render::render_table(&table);
        Fragment::Table { table, text }
    }

    /// Get the text of this fragment (rendered form for tables).
    pub fn as_text(&self) -> &str {
        match self {
            Fragment::Text { text } | Fragment::Table { text, .. } => text,
        }
    }

    /// Check if this fragment is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Fragment::Table { .. })
    }
}

/// A contiguous content region introduced by a heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text, or [`PREAMBLE_TITLE`]
    pub title: String,

    /// Heading depth (0 for the preamble)
    pub level: u8,

    /// Content fragments in document order
    pub content: Vec<Fragment>,

    /// Position among all extracted sections (0-based)
    pub order_index: usize,
}

impl Section {
    /// Create a new empty section.
    pub fn new(title: impl Into<String>, level: u8) -> Self {
        Self {
            title: title.into(),
            level,
            content: Vec::new(),
            order_index: 0,
        }
    }

    /// Create the preamble placeholder.
    pub fn preamble() -> Self {
        Self::new(PREAMBLE_TITLE, 0)
    }

    /// Check if this is the preamble placeholder.
    pub fn is_preamble(&self) -> bool {
        self.level == 0 && self.title == PREAMBLE_TITLE
    }

    /// Check if the section has no content fragments.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of table fragments.
    pub fn table_count(&self) -> usize {
        self.content.iter().filter(|f| f.is_table()).count()
    }

    /// Join the content into a single text.
    ///
    /// Fragments are separated by [`PARAGRAPH_SEPARATOR`]; blank fragments
    /// are skipped and table text is kept intact.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(Fragment::as_text)
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join(PARAGRAPH_SEPARATOR)
    }
}
