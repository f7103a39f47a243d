//! DOCX document reader using zip and roxmltree.

use std::io::{Cursor, Read};
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use zip::ZipArchive;

use crate::detect::{CORE_PART, DOCUMENT_PART, STYLES_PART};
use crate::error::{Error, Result};
use crate::model::{Block, Document, Metadata, Table};

use super::options::{ErrorMode, ParseOptions};
use super::styles::{outline_to_level, StyleSheet};
use super::xml::{is_wml, read_part, wml, wml_attr, WML_NS};

/// DOCX document parser.
///
/// The package is unpacked when the parser is created; [`parse`](Self::parse)
/// turns the main document part into a [`Document`] of headings, paragraphs
/// and tables in reading order.
pub struct DocxParser {
    document_xml: String,
    styles_xml: Option<String>,
    core_xml: Option<String>,
    options: ParseOptions,
}

impl DocxParser {
    /// Open a DOCX file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a DOCX file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse a DOCX from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a DOCX from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        if !data.starts_with(b"PK\x03\x04") {
            return Err(Error::UnknownFormat);
        }
        let mut zip = ZipArchive::new(Cursor::new(data))?;
        let document_xml = read_part(&mut zip, DOCUMENT_PART)?.ok_or(Error::UnknownFormat)?;

        let styles_xml = optional_part(&mut zip, STYLES_PART, &options)?;
        let core_xml = optional_part(&mut zip, CORE_PART, &options)?;

        Ok(Self {
            document_xml,
            styles_xml,
            core_xml,
            options,
        })
    }

    /// Parse a DOCX from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a DOCX from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Check if the package has a styles part.
    pub fn has_styles(&self) -> bool {
        self.styles_xml.is_some()
    }

    /// Parse the document.
    pub fn parse(&self) -> Result<Document> {
        let styles = self.load_styles()?;
        let metadata = self.load_metadata()?;

        let xml = roxmltree::Document::parse(&self.document_xml)?;
        let body = wml(xml.root_element(), "body")
            .ok_or_else(|| Error::InvalidDocx("missing w:body".to_string()))?;

        let mut walker = BodyWalker {
            styles: &styles,
            options: &self.options,
            blocks: Vec::new(),
        };
        for node in collect_block_nodes(body) {
            walker.visit(node);
        }

        debug!(
            "read {} blocks ({} paragraph styles)",
            walker.blocks.len(),
            styles.len()
        );

        Ok(Document {
            metadata,
            blocks: walker.blocks,
        })
    }

    fn load_styles(&self) -> Result<StyleSheet> {
        let Some(xml) = self.styles_xml.as_deref() else {
            return Ok(StyleSheet::default());
        };
        match StyleSheet::parse(xml) {
            Ok(sheet) => Ok(sheet),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                warn!("ignoring unreadable {}: {}", STYLES_PART, e);
                Ok(StyleSheet::default())
            }
            Err(e) => Err(e),
        }
    }

    fn load_metadata(&self) -> Result<Metadata> {
        let Some(xml) = self.core_xml.as_deref() else {
            return Ok(Metadata::default());
        };
        match parse_core_properties(xml) {
            Ok(metadata) => Ok(metadata),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                warn!("ignoring unreadable {}: {}", CORE_PART, e);
                Ok(Metadata::default())
            }
            Err(e) => Err(e),
        }
    }
}

fn optional_part(
    zip: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
    options: &ParseOptions,
) -> Result<Option<String>> {
    match read_part(zip, name) {
        Ok(part) => Ok(part),
        Err(e) if options.error_mode == ErrorMode::Lenient => {
            warn!("skipping {}: {}", name, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Flatten content controls and custom XML wrappers into their children.
fn collect_block_nodes<'a>(parent: roxmltree::Node<'a, 'a>) -> Vec<roxmltree::Node<'a, 'a>> {
    let mut nodes = Vec::new();
    for child in parent.children().filter(|n| n.is_element()) {
        if is_wml(child, "sdt") {
            if let Some(content) = wml(child, "sdtContent") {
                nodes.extend(collect_block_nodes(content));
            }
        } else if is_wml(child, "customXml") {
            nodes.extend(collect_block_nodes(child));
        } else {
            nodes.push(child);
        }
    }
    nodes
}

struct BodyWalker<'s> {
    styles: &'s StyleSheet,
    options: &'s ParseOptions,
    blocks: Vec<Block>,
}

impl BodyWalker<'_> {
    fn visit(&mut self, node: roxmltree::Node) {
        if is_wml(node, "p") {
            self.visit_paragraph(node);
        } else if is_wml(node, "tbl") {
            let table = read_table(node);
            if table.is_empty() {
                debug!("skipping table without rows");
            } else {
                self.blocks.push(Block::Table(table));
            }
        }
    }

    fn visit_paragraph(&mut self, node: roxmltree::Node) {
        let text = paragraph_text(node);
        let level = self.heading_level(node);

        if text.is_empty() {
            if level.is_none() && self.options.keep_empty_paragraphs {
                self.blocks.push(Block::paragraph(""));
            }
            return;
        }

        self.blocks.push(match level {
            Some(level) => Block::heading(level, text),
            None => Block::paragraph(text),
        });
    }

    fn heading_level(&self, node: roxmltree::Node) -> Option<u8> {
        let ppr = wml(node, "pPr")?;
        if let Some(level) = wml_attr(ppr, "pStyle")
            .and_then(|id| self.styles.heading_level(id, self.options))
        {
            return Some(level);
        }
        wml_attr(ppr, "outlineLvl")
            .and_then(|v| v.parse().ok())
            .and_then(outline_to_level)
    }
}

/// Visible text of a paragraph, trimmed.
fn paragraph_text(node: roxmltree::Node) -> String {
    let mut out = String::new();
    push_run_text(node, &mut out);
    out.trim().to_string()
}

fn push_run_text(node: roxmltree::Node, out: &mut String) {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().namespace() != Some(WML_NS) {
            // Drawings and other foreign markup may still wrap WML runs.
            push_run_text(child, out);
            continue;
        }
        match child.tag_name().name() {
            "t" => out.push_str(child.text().unwrap_or("")),
            "tab" => out.push('\t'),
            "br" | "cr" => out.push('\n'),
            // Properties hold tab stop definitions, not content. Text box
            // content sits outside the body flow and is left out.
            "pPr" | "rPr" | "txbxContent" | "del" => {}
            _ => push_run_text(child, out),
        }
    }
}

/// Widest table Word will author; bounds `gridSpan` padding when the
/// table carries no usable `w:tblGrid`.
const MAX_TABLE_COLUMNS: usize = 63;

/// Column budget for a table: its declared grid width, or the Word limit.
fn grid_width(tbl: roxmltree::Node) -> usize {
    let declared = wml(tbl, "tblGrid")
        .map(|grid| grid.children().filter(|n| is_wml(*n, "gridCol")).count())
        .unwrap_or(0);
    if declared == 0 {
        MAX_TABLE_COLUMNS
    } else {
        declared.min(MAX_TABLE_COLUMNS)
    }
}

fn read_table(tbl: roxmltree::Node) -> Table {
    let mut rows = Vec::new();
    let mut header_rows = 0;
    let mut in_header = true;
    let width = grid_width(tbl);

    for tr in collect_block_nodes(tbl).into_iter().filter(|n| is_wml(*n, "tr")) {
        let is_header = wml(tr, "trPr").and_then(|p| wml(p, "tblHeader")).is_some_and(|h| {
            h.attribute((WML_NS, "val"))
                .map_or(true, |v| v != "0" && v != "false")
        });
        if in_header && is_header {
            header_rows += 1;
        } else {
            in_header = false;
        }

        let mut cells = Vec::new();
        for tc in collect_block_nodes(tr).into_iter().filter(|n| is_wml(*n, "tc")) {
            cells.push(cell_text(tc));
            let span: usize = wml(tc, "tcPr")
                .and_then(|p| wml_attr(p, "gridSpan"))
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            // Spans only pad up to the grid width; real cells are never cut.
            let padding = span
                .saturating_sub(1)
                .min(width.saturating_sub(cells.len()));
            cells.extend(std::iter::repeat(String::new()).take(padding));
        }
        rows.push(cells);
    }

    Table::from_rows(rows).with_header_rows(header_rows.max(1))
}

/// Cell text: its paragraphs joined by newline. Nested tables contribute
/// their cells as further lines.
fn cell_text(tc: roxmltree::Node) -> String {
    let mut lines = Vec::new();
    for node in collect_block_nodes(tc) {
        if is_wml(node, "p") {
            let text = paragraph_text(node);
            if !text.is_empty() {
                lines.push(text);
            }
        } else if is_wml(node, "tbl") {
            let nested = read_table(node);
            lines.extend(
                nested
                    .rows
                    .into_iter()
                    .flatten()
                    .filter(|c| !c.is_empty()),
            );
        }
    }
    lines.join("\n")
}

fn parse_core_properties(xml: &str) -> Result<Metadata> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut metadata = Metadata::default();

    for node in doc.root_element().children().filter(|n| n.is_element()) {
        let value = node.text().map(str::trim).filter(|v| !v.is_empty());
        let Some(value) = value else {
            continue;
        };
        match node.tag_name().name() {
            "title" => metadata.title = Some(value.to_string()),
            "creator" => metadata.author = Some(value.to_string()),
            "subject" => metadata.subject = Some(value.to_string()),
            "keywords" => metadata.keywords = Some(value.to_string()),
            "lastModifiedBy" => metadata.last_modified_by = Some(value.to_string()),
            "created" => metadata.created = parse_w3cdtf(value),
            "modified" => metadata.modified = parse_w3cdtf(value),
            _ => {}
        }
    }

    Ok(metadata)
}

fn parse_w3cdtf(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}
