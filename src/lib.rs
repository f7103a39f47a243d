//! # docmap
//!
//! Map the sections of a Word document onto the fields of a target schema,
//! translate them, and export an interchange payload.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docmap::{extract_sections, FieldMapper, Payload, Schema, TitleHints};
//!
//! fn main() -> docmap::Result<()> {
//!     let sections = extract_sections("report.docx")?;
//!     let schema = Schema::load("schema.yaml")?;
//!     let hints = TitleHints::load("mapping.yaml", &schema)?;
//!
//!     let mut mapper = FieldMapper::with_hints(schema, sections, &hints);
//!     mapper.set("intro_fr", Some(0))?;
//!
//!     let payload = Payload::from_mapper(&mapper);
//!     println!("{}", payload.to_json(docmap::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Reading**: DOCX headings, paragraphs and tables in reading order
//! - **Extraction**: one section per heading, tables kept as text
//! - **Mapping**: schema fields to sections, seeded from title hints
//! - **Translation**: pluggable backends, failures fall back per field
//! - **Export**: ordered JSON or CSV payload

pub mod detect;
pub mod error;
pub mod export;
pub mod extract;
pub mod mapping;
pub mod model;
pub mod parser;
pub mod render;
pub mod schema;
pub mod translate;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx, DocxFormat};
pub use error::{Error, Result};
pub use export::{ExportRecord, Payload};
pub use extract::{extract, SectionExtractor};
pub use mapping::{Correspondence, FieldMapper, ResolvedField, TitleHints};
pub use model::{Block, Document, Fragment, Metadata, Section, Table};
pub use parser::{DocxParser, ErrorMode, ParseOptions};
pub use render::{ExtractionStats, JsonFormat, RenderOptions, SectionSelection};
pub use schema::{Field, Schema};
pub use translate::{
    OpenAiConfig, OpenAiTranslator, PlaceholderTranslator, TranslateOptions, Translator,
};

use std::io::Read;
use std::path::Path;

/// Parse a DOCX file into a block stream.
///
/// # Example
///
/// ```no_run
/// use docmap::parse_file;
///
/// let doc = parse_file("report.docx").unwrap();
/// println!("Blocks: {}", doc.block_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    DocxParser::open(path)?.parse()
}

/// Parse a DOCX file with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    DocxParser::open_with_options(path, options)?.parse()
}

/// Parse a DOCX from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    DocxParser::from_bytes(data)?.parse()
}

/// Parse a DOCX from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    DocxParser::from_bytes_with_options(data, options)?.parse()
}

/// Parse a DOCX from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    DocxParser::from_reader(reader)?.parse()
}

/// Read a DOCX file and extract its sections.
///
/// # Example
///
/// ```no_run
/// use docmap::extract_sections;
///
/// for section in extract_sections("report.docx").unwrap() {
///     println!("{} {}", section.order_index, section.title);
/// }
/// ```
pub fn extract_sections<P: AsRef<Path>>(path: P) -> Result<Vec<Section>> {
    let doc = parse_file(path)?;
    Ok(extract(&doc.blocks))
}

/// Convert a DOCX file to Markdown.
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(Docmap::new().parse(path)?.to_markdown())
}

/// Builder for reading documents and preparing them for mapping.
///
/// # Example
///
/// ```no_run
/// use docmap::Docmap;
///
/// let result = Docmap::new()
///     .strict()
///     .with_frontmatter()
///     .parse("report.docx")?;
/// println!("{} sections", result.sections.len());
/// println!("{}", result.to_markdown());
/// # Ok::<(), docmap::Error>(())
/// ```
pub struct Docmap {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Docmap {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Fail on unreadable styles or document properties.
    pub fn strict(mut self) -> Self {
        self.parse_options = self.parse_options.strict();
        self
    }

    /// Treat a custom paragraph style as a heading.
    pub fn with_heading_style(mut self, name: impl Into<String>, level: u8) -> Self {
        self.parse_options = self.parse_options.with_heading_style(name, level);
        self
    }

    /// Enable frontmatter in Markdown output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Set render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Read a DOCX file and extract its sections.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<DocmapResult> {
        let parser = DocxParser::open_with_options(path, self.parse_options)?;
        Ok(DocmapResult::new(parser.parse()?, self.render_options))
    }

    /// Read a DOCX from bytes and extract its sections.
    pub fn parse_bytes(self, data: &[u8]) -> Result<DocmapResult> {
        let parser = DocxParser::from_bytes_with_options(data, self.parse_options)?;
        Ok(DocmapResult::new(parser.parse()?, self.render_options))
    }
}

impl Default for Docmap {
    fn default() -> Self {
        Self::new()
    }
}

/// A read document with its extracted sections.
pub struct DocmapResult {
    /// The parsed document
    pub document: Document,
    /// Sections in document order
    pub sections: Vec<Section>,
    /// Extraction statistics
    pub stats: ExtractionStats,
    render_options: RenderOptions,
}

impl DocmapResult {
    fn new(document: Document, render_options: RenderOptions) -> Self {
        let (sections, stats) = extract::extract_with_stats(&document.blocks);
        Self {
            document,
            sections,
            stats,
            render_options,
        }
    }

    /// Convert to Markdown.
    pub fn to_markdown(&self) -> String {
        render::to_markdown(&self.sections, &self.document.metadata, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.sections, &self.render_options)
    }

    /// Serialize the sections to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.sections, format)
    }

    /// One-line preview of a section, cut at the configured snippet length.
    pub fn preview(&self, section: &Section) -> String {
        render::snippet(&section.text(), self.render_options.snippet_len)
    }

    /// Create a field mapper over these sections.
    pub fn mapper(&self, schema: Schema) -> FieldMapper {
        FieldMapper::new(schema, self.sections.clone())
    }

    /// Create a field mapper seeded from title hints.
    pub fn mapper_with_hints(&self, schema: Schema, hints: &TitleHints) -> FieldMapper {
        FieldMapper::with_hints(schema, self.sections.clone(), hints)
    }
}
