//! Table types.

use serde::{Deserialize, Serialize};

/// A table linearized into rows of cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Rows of cell text, in document order
    pub rows: Vec<Vec<String>>,

    /// Number of leading header rows (0 = no header)
    pub header_rows: usize,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from rows of cell text, with the first row as header.
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|r| r.into_iter().map(Into::into).collect())
            .collect();
        let header_rows = usize::from(!rows.is_empty());
        Self { rows, header_rows }
    }

    /// Set the number of header rows and return self.
    pub fn with_header_rows(mut self, header_rows: usize) -> Self {
        self.header_rows = header_rows.min(self.rows.len());
        self
    }

    /// Add a row to the table.
    pub fn add_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check if all rows have the same number of cells.
    pub fn is_rectangular(&self) -> bool {
        let width = self.column_count();
        self.rows.iter().all(|r| r.len() == width)
    }

    /// Return a copy with short rows padded with empty cells.
    ///
    /// Every row gets at least one cell so that each row stays
    /// addressable in the rendered form.
    pub fn normalized(&self) -> Table {
        let width = self.column_count().max(1);
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.resize(width, String::new());
                row
            })
            .collect();
        Table {
            rows,
            header_rows: self.header_rows.min(self.rows.len()),
        }
    }

    /// Get header rows.
    pub fn header(&self) -> &[Vec<String>] {
        &self.rows[..self.header_rows.min(self.rows.len())]
    }

    /// Get body rows (non-header).
    pub fn body(&self) -> &[Vec<String>] {
        &self.rows[self.header_rows.min(self.rows.len())..]
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
