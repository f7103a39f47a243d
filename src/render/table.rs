//! Stable textual table format.
//!
//! Tables are rendered as pipe tables, one line per row, with a
//! `| --- |` separator after the header rows. Cell text is escaped so the
//! rendering can be parsed back into the exact same rows and cells:
//!
//! | Character            | Escape |
//! |----------------------|--------|
//! | `\`                  | `\\`   |
//! | `|`                  | `\|`   |
//! | newline              | `\n`   |
//! | carriage return      | `\r`   |
//! | leading `-` in cell  | `\-`   |

use crate::model::Table;

const SEPARATOR_CELL: &str = "---";

/// Render a table to its stable text form.
///
/// Identical tables always produce identical text. Rows are rendered as
/// given; callers wanting a rectangular grid should pass
/// [`Table::normalized`].
pub fn render_table(table: &Table) -> String {
    let mut output = String::new();
    let header_rows = table.header_rows.min(table.rows.len());

    for (i, row) in table.rows.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push('|');
        for cell in row {
            output.push(' ');
            output.push_str(&escape_cell(cell));
            output.push_str(" |");
        }

        if header_rows > 0 && i + 1 == header_rows {
            output.push('\n');
            output.push('|');
            for _ in 0..row.len().max(1) {
                output.push(' ');
                output.push_str(SEPARATOR_CELL);
                output.push_str(" |");
            }
        }
    }

    output
}

/// Parse text produced by [`render_table`] back into a table.
///
/// Returns `None` if the text is not a rendered table.
pub fn parse_table(text: &str) -> Option<Table> {
    let mut table = Table::new();
    if text.is_empty() {
        return Some(table);
    }

    for line in text.split('\n') {
        let cells = split_row(line)?;
        let is_separator = !cells.is_empty() && cells.iter().all(|c| c == SEPARATOR_CELL);
        if is_separator && table.header_rows == 0 {
            table.header_rows = table.rows.len();
            continue;
        }
        let row = cells
            .iter()
            .map(|c| unescape_cell(c))
            .collect::<Option<Vec<_>>>()?;
        table.rows.push(row);
    }

    Some(table)
}

fn escape_cell(cell: &str) -> String {
    let mut result = String::with_capacity(cell.len());
    for (i, c) in cell.chars().enumerate() {
        match c {
            '\\' => result.push_str("\\\\"),
            '|' => result.push_str("\\|"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '-' if i == 0 => result.push_str("\\-"),
            _ => result.push(c),
        }
    }
    result
}

fn unescape_cell(cell: &str) -> Option<String> {
    let mut result = String::with_capacity(cell.len());
    let mut chars = cell.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => result.push('\\'),
            '|' => result.push('|'),
            'n' => result.push('\n'),
            'r' => result.push('\r'),
            '-' => result.push('-'),
            _ => return None,
        }
    }
    Some(result)
}

/// Split a row line into raw (still escaped) cell strings.
fn split_row(line: &str) -> Option<Vec<String>> {
    let inner = line.strip_prefix('|')?;

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                current.push(chars.next()?);
            }
            '|' => cells.push(trim_padding(&std::mem::take(&mut current))?),
            _ => current.push(c),
        }
    }

    // Everything after the final pipe must be empty.
    if !current.is_empty() {
        return None;
    }
    Some(cells)
}

fn trim_padding(raw: &str) -> Option<String> {
    let raw = raw.strip_prefix(' ')?;
    let raw = raw.strip_suffix(' ')?;
    Some(raw.to_string())
}
