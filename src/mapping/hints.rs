//! Title hints and mapping files.
//!
//! A mapping file records, per field, the title of the section it should be
//! mapped to:
//!
//! ```yaml
//! mapping:
//!   Introduction: Intro
//!   pricing_fr: Tarifs
//!   notes_fr: null
//! ```
//!
//! Keys are matched against field labels first, then field keys.

use std::collections::HashMap;
use std::path::Path;

use log::warn;
use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use super::FieldMapper;
use crate::error::Result;
use crate::schema::Schema;

/// Value written by interactive editors for "no selection".
pub const EMPTY_CHOICE: &str = "-- (vide) --";

/// Normalize a title for comparison: NFC, collapsed whitespace, lowercase.
pub fn normalize_title(title: &str) -> String {
    let composed: String = title.nfc().collect();
    composed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Deserialize, Default)]
struct MappingFile {
    #[serde(default)]
    mapping: HashMap<String, Option<String>>,
}

/// Expected section title per field key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleHints {
    hints: HashMap<String, String>,
}

impl TitleHints {
    /// Create empty hints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected title for a field key.
    pub fn insert(&mut self, source_key: impl Into<String>, title: impl Into<String>) {
        self.hints.insert(source_key.into(), title.into());
    }

    /// Get the expected title for a field key.
    pub fn get(&self, source_key: &str) -> Option<&str> {
        self.hints.get(source_key).map(String::as_str)
    }

    /// Number of hints.
    pub fn len(&self) -> usize {
        self.hints.len()
    }

    /// Check if there are no hints.
    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    /// Parse hints from mapping-file YAML, resolving keys against `schema`.
    ///
    /// Entries that name no schema field are logged and ignored, as are
    /// null values and [`EMPTY_CHOICE`].
    pub fn from_mapping_yaml(yaml: &str, schema: &Schema) -> Result<Self> {
        let mut hints = Self::new();
        if yaml.trim().is_empty() {
            return Ok(hints);
        }
        let file: Option<MappingFile> = serde_yaml::from_str(yaml)?;
        let entries = file.unwrap_or_default().mapping;

        for field in schema {
            let title = entries
                .get(&field.label)
                .or_else(|| entries.get(&field.source_key));
            if let Some(Some(title)) = title {
                if !title.trim().is_empty() && title != EMPTY_CHOICE {
                    hints.insert(field.source_key.clone(), title.clone());
                }
            }
        }

        for name in entries.keys() {
            let known = schema
                .iter()
                .any(|f| f.label == *name || f.source_key == *name);
            if !known {
                warn!("mapping entry {:?} matches no schema field", name);
            }
        }
        Ok(hints)
    }

    /// Load hints from a mapping file.
    pub fn load<P: AsRef<Path>>(path: P, schema: &Schema) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_mapping_yaml(&text, schema)
    }

    /// Build hints from a mapper's current correspondence, using section
    /// titles.
    pub fn from_mapper(mapper: &FieldMapper) -> Self {
        let mut hints = Self::new();
        for field in mapper.schema() {
            let title = mapper
                .correspondence()
                .section_of(&field.source_key)
                .and_then(|i| mapper.sections().get(i))
                .map(|s| s.title.clone());
            if let Some(title) = title {
                hints.insert(field.source_key.clone(), title);
            }
        }
        hints
    }

    /// Serialize as a mapping file keyed by field label, in schema order.
    /// Fields without a hint are written as null.
    pub fn to_mapping_yaml(&self, schema: &Schema) -> Result<String> {
        use serde_yaml::{Mapping, Value};

        let mut mapping = Mapping::new();
        for field in schema {
            let value = match self.get(&field.source_key) {
                Some(title) => Value::String(title.to_string()),
                None => Value::Null,
            };
            mapping.insert(Value::String(field.label.clone()), value);
        }

        let mut root = Mapping::new();
        root.insert(Value::String("mapping".to_string()), Value::Mapping(mapping));
        Ok(serde_yaml::to_string(&Value::Mapping(root))?)
    }
}
