//! DOCX format detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// DOCX package information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxFormat {
    /// Number of parts in the package
    pub part_count: usize,
    /// Whether `word/styles.xml` is present
    pub has_styles: bool,
    /// Whether `docProps/core.xml` is present
    pub has_core_properties: bool,
}

impl std::fmt::Display for DocxFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DOCX ({} parts)", self.part_count)
    }
}

/// ZIP local file header magic.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Main document part.
pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
pub(crate) const STYLES_PART: &str = "word/styles.xml";
pub(crate) const CORE_PART: &str = "docProps/core.xml";

/// Detect a DOCX package from a file path.
///
/// # Example
/// ```no_run
/// use docmap::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("report.docx").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocxFormat> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut header = [0u8; 4];
    if reader.read_exact(&mut header).is_err() || !has_zip_magic(&header) {
        return Err(Error::UnknownFormat);
    }
    reader.rewind()?;
    inspect_archive(reader)
}

/// Detect a DOCX package from bytes.
///
/// # Returns
/// * `Ok(DocxFormat)` if the data is a ZIP archive holding `word/document.xml`
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocxFormat> {
    if !has_zip_magic(data) {
        return Err(Error::UnknownFormat);
    }
    inspect_archive(Cursor::new(data))
}

fn inspect_archive<R: Read + Seek>(reader: R) -> Result<DocxFormat> {
    let archive = zip::ZipArchive::new(reader).map_err(|_| Error::UnknownFormat)?;
    let has = |name: &str| archive.file_names().any(|n| n == name);
    if !has(DOCUMENT_PART) {
        return Err(Error::UnknownFormat);
    }
    Ok(DocxFormat {
        part_count: archive.len(),
        has_styles: has(STYLES_PART),
        has_core_properties: has(CORE_PART),
    })
}

fn has_zip_magic(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC)
}

/// Check if a file is a DOCX package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes are a DOCX package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn archive(parts: &[&str]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for part in parts {
            writer.start_file(*part, SimpleFileOptions::default()).unwrap();
            writer.write_all(b"<x/>").unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_detect_docx() {
        let data = archive(&[DOCUMENT_PART, STYLES_PART]);
        let format = detect_format_from_bytes(&data).unwrap();
        assert_eq!(format.part_count, 2);
        assert!(format.has_styles);
        assert!(!format.has_core_properties);
    }

    #[test]
    fn test_zip_without_document_part() {
        let data = archive(&["content.xml"]);
        assert!(matches!(
            detect_format_from_bytes(&data),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(!is_docx_bytes(b"%PDF-1.7"));
        assert!(!is_docx_bytes(b"PK"));
        assert!(!is_docx_bytes(b"PK\x03\x04garbage"));
    }
}
