//! Error types for docmap library.

use std::io;
use thiserror::Error;

/// Result type alias for docmap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading, mapping and exporting documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as a Word document.
    #[error("Unknown file format: not a valid DOCX")]
    UnknownFormat,

    /// The archive is a ZIP file but not a usable DOCX package.
    #[error("Invalid DOCX package: {0}")]
    InvalidDocx(String),

    /// Error parsing an XML part of the package.
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// Error reading the ZIP container.
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// The field schema definition is invalid.
    #[error("Invalid schema: {0}")]
    Schema(String),

    /// A YAML document (schema or mapping file) could not be read or written.
    #[error("YAML error: {0}")]
    Yaml(String),

    /// A mapping edit points at a section that does not exist.
    #[error("Section {index} does not exist (document has {len} sections)")]
    InvalidReference {
        /// Requested section index
        index: usize,
        /// Number of sections available
        len: usize,
    },

    /// A field key is not part of the schema.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// The translation backend failed or is not configured.
    #[error("Translation unavailable: {0}")]
    TranslationUnavailable(String),

    /// Error during rendering (Markdown, JSON, CSV).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::InvalidArchive(_) => Error::UnknownFormat,
            _ => Error::Zip(err.to_string()),
        }
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::TranslationUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(err.to_string(), "Unknown file format: not a valid DOCX");

        let err = Error::InvalidReference { index: 10, len: 5 };
        assert_eq!(
            err.to_string(),
            "Section 10 does not exist (document has 5 sections)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<Vec<String>>("{ not: [a list").unwrap_err();
        let err: Error = yaml_err.into();
        assert!(matches!(err, Error::Yaml(_)));
    }
}
