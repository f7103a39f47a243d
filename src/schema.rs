//! Target field schema.
//!
//! A schema is an ordered list of [`Field`]s loaded from YAML:
//!
//! ```yaml
//! fields:
//!   - key: intro_fr
//!     label: Introduction
//!     nl_key: intro_nl
//!   - key: pricing_fr
//! ```
//!
//! `source_key` / `target_key` are accepted as aliases for `key` / `nl_key`.
//! A missing label defaults to the key.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One entry of the target schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Stable identifier, unique within the schema
    pub source_key: String,

    /// Identifier in the destination system
    pub target_key: Option<String>,

    /// Human-readable label
    pub label: String,
}

impl Field {
    /// Create a field whose label is its key.
    pub fn new(source_key: impl Into<String>) -> Self {
        let source_key = source_key.into();
        Self {
            label: source_key.clone(),
            source_key,
            target_key: None,
        }
    }

    /// Set the target key and return self.
    pub fn with_target_key(mut self, target_key: impl Into<String>) -> Self {
        self.target_key = Some(target_key.into());
        self
    }

    /// Set the label and return self.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

#[derive(Deserialize)]
struct RawField {
    #[serde(alias = "source_key")]
    key: String,
    #[serde(default, alias = "target_key")]
    nl_key: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawSchema {
    #[serde(default)]
    fields: Vec<RawField>,
}

/// Ordered, validated list of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Create a schema, rejecting blank or duplicate keys.
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if field.source_key.trim().is_empty() {
                return Err(Error::Schema("field with empty key".to_string()));
            }
            if !seen.insert(field.source_key.as_str()) {
                return Err(Error::Schema(format!(
                    "duplicate field key: {}",
                    field.source_key
                )));
            }
        }
        Ok(Self { fields })
    }

    /// Parse a schema from YAML text. An empty document yields an empty schema.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: Option<RawSchema> = serde_yaml::from_str(yaml)?;
        let fields = raw
            .unwrap_or_default()
            .fields
            .into_iter()
            .map(|f| Field {
                label: f.label.unwrap_or_else(|| f.key.clone()),
                source_key: f.key,
                target_key: f.nl_key,
            })
            .collect();
        Self::new(fields)
    }

    /// Load a schema from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Serialize the schema back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        #[derive(Serialize)]
        struct OutField<'a> {
            key: &'a str,
            label: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            nl_key: Option<&'a str>,
        }
        #[derive(Serialize)]
        struct OutSchema<'a> {
            fields: Vec<OutField<'a>>,
        }

        let out = OutSchema {
            fields: self
                .fields
                .iter()
                .map(|f| OutField {
                    key: &f.source_key,
                    label: &f.label,
                    nl_key: f.target_key.as_deref(),
                })
                .collect(),
        };
        Ok(serde_yaml::to_string(&out)?)
    }

    /// Get a field by key.
    pub fn get(&self, source_key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.source_key == source_key)
    }

    /// Check if the schema has a field with this key.
    pub fn contains(&self, source_key: &str) -> bool {
        self.get(source_key).is_some()
    }

    /// Iterate over fields in schema order.
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Get all fields in schema order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
