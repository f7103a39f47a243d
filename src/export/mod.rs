//! Interchange payload.
//!
//! One [`ExportRecord`] per schema field, in schema order. The JSON form is
//!
//! ```json
//! {"fields": [{"key": "intro_fr", "fr": "...", "nl_key": "intro_nl", "nl": "..."}]}
//! ```

use csv::{Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mapping::{FieldMapper, ResolvedField};
use crate::render::{to_json, JsonFormat};

/// CSV header row.
pub const CSV_HEADER: [&str; 4] = ["key", "fr", "nl_key", "nl"];

/// One exported field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Field key
    #[serde(rename = "key")]
    pub source_key: String,

    /// Source-language text
    #[serde(rename = "fr")]
    pub source_text: String,

    /// Target-system key
    #[serde(rename = "nl_key")]
    pub target_key: Option<String>,

    /// Translated text (empty when not translated)
    #[serde(rename = "nl")]
    pub target_text: String,
}

impl From<&ResolvedField> for ExportRecord {
    fn from(r: &ResolvedField) -> Self {
        Self {
            source_key: r.field.source_key.clone(),
            source_text: r.text.clone(),
            target_key: r.field.target_key.clone(),
            target_text: r.translated.clone().unwrap_or_default(),
        }
    }
}

/// Ordered export payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Records in schema order
    pub fields: Vec<ExportRecord>,
}

impl Payload {
    /// Build from resolved fields.
    pub fn from_resolved(resolved: &[ResolvedField]) -> Self {
        Self {
            fields: resolved.iter().map(ExportRecord::from).collect(),
        }
    }

    /// Build from a mapper's current state.
    pub fn from_mapper(mapper: &FieldMapper) -> Self {
        Self::from_resolved(&mapper.resolve_all())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if there are no records.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        to_json(self, format)
    }

    /// Serialize to CSV with a `key,fr,nl_key,nl` header and CRLF line
    /// endings. Fields are quoted only when they need it.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::CRLF)
            .from_writer(Vec::new());

        writer.write_record(CSV_HEADER).map_err(csv_error)?;
        for record in &self.fields {
            writer.serialize(record).map_err(csv_error)?;
        }

        let bytes = writer.into_inner().map_err(csv_error)?;
        String::from_utf8(bytes).map_err(csv_error)
    }
}

fn csv_error(err: impl std::fmt::Display) -> Error {
    Error::Render(format!("CSV serialization error: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use crate::model::Block;
    use crate::schema::{Field, Schema};

    fn payload() -> Payload {
        let sections = extract(&[
            Block::heading(1, "Intro"),
            Block::paragraph("Bonjour, \"monde\""),
            Block::paragraph("suite"),
        ]);
        let schema = Schema::new(vec![
            Field::new("intro_fr").with_target_key("intro_nl"),
            Field::new("notes_fr"),
        ])
        .unwrap();
        let mut m = FieldMapper::new(schema, sections);
        m.set("intro_fr", Some(0)).unwrap();
        m.set_translation("intro_fr", Some("Hallo".to_string()))
            .unwrap();
        Payload::from_mapper(&m)
    }

    #[test]
    fn test_every_field_in_order() {
        let p = payload();
        assert_eq!(p.len(), 2);
        assert_eq!(p.fields[0].source_key, "intro_fr");
        assert_eq!(p.fields[1].source_key, "notes_fr");
        assert_eq!(p.fields[1].source_text, "");
        assert_eq!(p.fields[1].target_text, "");
    }

    #[test]
    fn test_json_keys() {
        let json = payload().to_json(JsonFormat::Compact).unwrap();
        assert!(json.starts_with(r#"{"fields":[{"key":"intro_fr","fr":"#));
        assert!(json.contains(r#""nl_key":"intro_nl","nl":"Hallo""#));
        assert!(json.contains(r#""nl_key":null"#));

        let back: Payload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload());
    }

    #[test]
    fn test_csv_quoting() {
        let csv = payload().to_csv().unwrap();
        let mut lines = csv.split("\r\n");
        assert_eq!(lines.next(), Some("key,fr,nl_key,nl"));
        assert!(csv.contains("\"Bonjour, \"\"monde\"\"\n\nsuite\""));
        assert!(csv.ends_with("notes_fr,,,\r\n"));
    }

    #[test]
    fn test_csv_reads_back() {
        let csv = payload().to_csv().unwrap();
        let mut reader = csv::ReaderBuilder::new().from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADER);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Bonjour, \"monde\"\n\nsuite");
        assert_eq!(&rows[0][3], "Hallo");
        assert_eq!(&rows[1][0], "notes_fr");
    }

    #[test]
    fn test_csv_header_without_records() {
        assert_eq!(Payload::default().to_csv().unwrap(), "key,fr,nl_key,nl\r\n");
    }
}
