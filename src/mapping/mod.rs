//! Field mapping between schema fields and extracted sections.
//!
//! A [`FieldMapper`] owns the schema, the immutable section list and the
//! editable [`Correspondence`]. The correspondence is seeded once from
//! [`TitleHints`] and afterwards changed only through [`FieldMapper::set`]
//! and [`FieldMapper::apply`], both of which validate the edit before
//! touching any state.
//!
//! # Example
//!
//! ```
//! use docmap::extract::extract;
//! use docmap::mapping::{FieldMapper, TitleHints};
//! use docmap::model::Block;
//! use docmap::schema::{Field, Schema};
//!
//! let sections = extract(&[Block::heading(1, "Intro"), Block::paragraph("Hello")]);
//! let schema = Schema::new(vec![Field::new("intro_fr")]).unwrap();
//!
//! let mut hints = TitleHints::new();
//! hints.insert("intro_fr", "intro");
//!
//! let mapper = FieldMapper::with_hints(schema, sections, &hints);
//! assert_eq!(mapper.resolve("intro_fr").unwrap(), "Hello");
//! ```

mod hints;

pub use hints::{normalize_title, TitleHints, EMPTY_CHOICE};

use std::collections::{BTreeMap, HashMap};

use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Section;
use crate::schema::{Field, Schema};

/// Mapping from field key to a section `order_index`, or unmapped.
///
/// The key set is fixed at construction to the schema's keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Correspondence {
    entries: BTreeMap<String, Option<usize>>,
}

impl Correspondence {
    /// Create a correspondence with every schema field unmapped.
    pub fn unmapped(schema: &Schema) -> Self {
        Self {
            entries: schema
                .iter()
                .map(|f| (f.source_key.clone(), None))
                .collect(),
        }
    }

    /// Get the entry for a key: `None` if the key is unknown,
    /// `Some(None)` if the field is unmapped.
    pub fn get(&self, source_key: &str) -> Option<Option<usize>> {
        self.entries.get(source_key).copied()
    }

    /// Get the referenced section index, if any.
    pub fn section_of(&self, source_key: &str) -> Option<usize> {
        self.get(source_key).flatten()
    }

    /// Overwrite an existing entry without index validation.
    ///
    /// Returns `false` (and changes nothing) if the key is unknown.
    /// Indices are checked when the correspondence is handed to
    /// [`FieldMapper::apply`].
    pub fn assign(&mut self, source_key: &str, index: Option<usize>) -> bool {
        match self.entries.get_mut(source_key) {
            Some(entry) => {
                *entry = index;
                true
            }
            None => false,
        }
    }

    /// Check if the key is present.
    pub fn contains_key(&self, source_key: &str) -> bool {
        self.entries.contains_key(source_key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of mapped entries.
    pub fn mapped_count(&self) -> usize {
        self.entries.values().filter(|v| v.is_some()).count()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<usize>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// A field joined with its current content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedField {
    /// The schema field
    pub field: Field,

    /// Referenced section index, if mapped
    pub section: Option<usize>,

    /// Source-language text (empty when unmapped)
    pub text: String,

    /// Translated text, once available
    pub translated: Option<String>,
}

/// Holds schema, sections and the editable correspondence.
#[derive(Debug, Clone)]
pub struct FieldMapper {
    schema: Schema,
    sections: Vec<Section>,
    correspondence: Correspondence,
    text_overrides: HashMap<String, String>,
    translations: HashMap<String, String>,
}

impl FieldMapper {
    /// Create a mapper with every field unmapped.
    pub fn new(schema: Schema, sections: Vec<Section>) -> Self {
        let correspondence = Correspondence::unmapped(&schema);
        Self {
            schema,
            sections,
            correspondence,
            text_overrides: HashMap::new(),
            translations: HashMap::new(),
        }
    }

    /// Create a mapper seeded from title hints.
    pub fn with_hints(schema: Schema, sections: Vec<Section>, hints: &TitleHints) -> Self {
        let mut mapper = Self::new(schema, sections);
        mapper.correspondence = mapper.suggest_correspondence(hints);
        mapper
    }

    /// Get the schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Get the sections.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Get the current correspondence.
    pub fn correspondence(&self) -> &Correspondence {
        &self.correspondence
    }

    /// Suggest a correspondence by exact (normalized) title match.
    ///
    /// Each field maps to the first section whose title matches its hint;
    /// fields without a hint or a match are unmapped. This does not change
    /// the mapper's state.
    pub fn suggest_correspondence(&self, hints: &TitleHints) -> Correspondence {
        let titles: Vec<String> = self
            .sections
            .iter()
            .map(|s| normalize_title(&s.title))
            .collect();

        let mut suggestion = Correspondence::unmapped(&self.schema);
        for field in &self.schema {
            let Some(hint) = hints.get(&field.source_key) else {
                continue;
            };
            let wanted = normalize_title(hint);
            let found = titles.iter().position(|t| *t == wanted);
            if found.is_none() {
                debug!("no section titled {:?} for field {}", hint, field.source_key);
            }
            suggestion.assign(&field.source_key, found);
        }
        suggestion
    }

    /// Replace the whole correspondence.
    ///
    /// Keys missing from `correspondence` become unmapped. Fails with
    /// [`Error::UnknownField`] or [`Error::InvalidReference`] without
    /// changing any state.
    pub fn apply(&mut self, correspondence: Correspondence) -> Result<()> {
        let mut next = Correspondence::unmapped(&self.schema);
        for (key, index) in correspondence.iter() {
            if !next.contains_key(key) {
                return Err(Error::UnknownField(key.to_string()));
            }
            self.check_index(index)?;
            next.assign(key, index);
        }

        for field in &self.schema {
            let key = field.source_key.as_str();
            if next.get(key) != self.correspondence.get(key) {
                self.translations.remove(key);
            }
        }
        self.correspondence = next;
        Ok(())
    }

    /// Map one field to a section, or unmap it with `None`.
    pub fn set(&mut self, source_key: &str, index: Option<usize>) -> Result<()> {
        let current = self.get(source_key)?;
        self.check_index(index)?;
        if current != index {
            self.translations.remove(source_key);
        }
        self.correspondence.assign(source_key, index);
        Ok(())
    }

    /// Get the section index a field is mapped to.
    pub fn get(&self, source_key: &str) -> Result<Option<usize>> {
        self.correspondence
            .get(source_key)
            .ok_or_else(|| Error::UnknownField(source_key.to_string()))
    }

    /// Replace a field's source text with user-edited text, or clear the
    /// override with `None`.
    pub fn set_text(&mut self, source_key: &str, text: Option<String>) -> Result<()> {
        self.get(source_key)?;
        self.translations.remove(source_key);
        match text {
            Some(text) => self.text_overrides.insert(source_key.to_string(), text),
            None => self.text_overrides.remove(source_key),
        };
        Ok(())
    }

    /// Store translated text for a field, or clear it with `None`.
    pub fn set_translation(&mut self, source_key: &str, text: Option<String>) -> Result<()> {
        self.get(source_key)?;
        match text {
            Some(text) => self.translations.insert(source_key.to_string(), text),
            None => self.translations.remove(source_key),
        };
        Ok(())
    }

    /// Get stored translated text for a field.
    pub fn translation(&self, source_key: &str) -> Option<&str> {
        self.translations.get(source_key).map(String::as_str)
    }

    /// Joined content of the section a field is mapped to, or empty text
    /// if unmapped.
    pub fn resolve(&self, source_key: &str) -> Result<String> {
        Ok(self
            .get(source_key)?
            .and_then(|i| self.sections.get(i))
            .map(Section::text)
            .unwrap_or_default())
    }

    /// Text that will be exported for a field: the user override if set,
    /// otherwise [`resolve`](Self::resolve).
    pub fn resolved_text(&self, source_key: &str) -> Result<String> {
        match self.text_overrides.get(source_key) {
            Some(text) => {
                self.get(source_key)?;
                Ok(text.clone())
            }
            None => self.resolve(source_key),
        }
    }

    /// Resolve every field in schema order.
    pub fn resolve_all(&self) -> Vec<ResolvedField> {
        self.schema
            .iter()
            .map(|field| {
                let key = field.source_key.as_str();
                ResolvedField {
                    field: field.clone(),
                    section: self.correspondence.section_of(key),
                    text: self.resolved_text(key).unwrap_or_default(),
                    translated: self.translations.get(key).cloned(),
                }
            })
            .collect()
    }

    fn check_index(&self, index: Option<usize>) -> Result<()> {
        match index {
            Some(i) if i >= self.sections.len() => Err(Error::InvalidReference {
                index: i,
                len: self.sections.len(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use crate::model::Block;

    fn mapper() -> FieldMapper {
        let sections = extract(&[
            Block::heading(1, "Intro"),
            Block::paragraph("Hello"),
            Block::heading(1, "Pricing"),
            Block::table([["A", "B"], ["1", "2"]]),
        ]);
        let schema = Schema::new(vec![
            Field::new("intro_fr").with_target_key("intro_nl"),
            Field::new("pricing_fr"),
            Field::new("risks_fr"),
        ])
        .unwrap();
        FieldMapper::new(schema, sections)
    }

    #[test]
    fn test_new_mapper_all_unmapped() {
        let m = mapper();
        assert_eq!(m.correspondence().len(), 3);
        assert_eq!(m.correspondence().mapped_count(), 0);
        assert_eq!(m.resolve("intro_fr").unwrap(), "");
    }

    #[test]
    fn test_suggest_is_pure() {
        let m = mapper();
        let mut hints = TitleHints::new();
        hints.insert("intro_fr", "  INTRO ");
        hints.insert("risks_fr", "Risks");

        let suggestion = m.suggest_correspondence(&hints);
        assert_eq!(suggestion.get("intro_fr"), Some(Some(0)));
        assert_eq!(suggestion.get("risks_fr"), Some(None));
        assert_eq!(m.correspondence().mapped_count(), 0);
    }

    #[test]
    fn test_set_and_unset() {
        let mut m = mapper();
        m.set("pricing_fr", Some(1)).unwrap();
        assert!(m.resolve("pricing_fr").unwrap().starts_with("| A | B |"));

        m.set("pricing_fr", None).unwrap();
        assert_eq!(m.get("pricing_fr").unwrap(), None);
        assert_eq!(m.resolve("pricing_fr").unwrap(), "");
    }

    #[test]
    fn test_set_invalid_reference_keeps_state() {
        let mut m = mapper();
        m.set("intro_fr", Some(0)).unwrap();

        let err = m.set("intro_fr", Some(2)).unwrap_err();
        assert!(matches!(err, Error::InvalidReference { index: 2, len: 2 }));
        assert_eq!(m.get("intro_fr").unwrap(), Some(0));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut m = mapper();
        assert!(matches!(
            m.set("bogus", Some(0)),
            Err(Error::UnknownField(_))
        ));
        assert!(!m.correspondence().contains_key("bogus"));
        assert!(m.resolve("bogus").is_err());
    }

    #[test]
    fn test_many_fields_one_section() {
        let mut m = mapper();
        m.set("intro_fr", Some(0)).unwrap();
        m.set("risks_fr", Some(0)).unwrap();
        assert_eq!(m.resolve("risks_fr").unwrap(), m.resolve("intro_fr").unwrap());
    }

    #[test]
    fn test_apply_validates_everything_first() {
        let mut m = mapper();
        m.set("intro_fr", Some(0)).unwrap();

        let mut next = m.correspondence().clone();
        next.assign("intro_fr", Some(1));
        next.assign("pricing_fr", Some(9));
        assert!(m.apply(next).is_err());
        assert_eq!(m.get("intro_fr").unwrap(), Some(0));

        let mut next = m.correspondence().clone();
        next.assign("pricing_fr", Some(1));
        m.apply(next).unwrap();
        assert_eq!(m.get("pricing_fr").unwrap(), Some(1));
    }

    #[test]
    fn test_apply_rejects_foreign_keys() {
        let mut m = mapper();
        let other = Schema::new(vec![Field::new("elsewhere")]).unwrap();
        let foreign = Correspondence::unmapped(&other);
        assert!(matches!(m.apply(foreign), Err(Error::UnknownField(_))));
    }

    #[test]
    fn test_text_override() {
        let mut m = mapper();
        m.set("intro_fr", Some(0)).unwrap();
        m.set_text("intro_fr", Some("Bonjour".to_string())).unwrap();

        assert_eq!(m.resolve("intro_fr").unwrap(), "Hello");
        assert_eq!(m.resolved_text("intro_fr").unwrap(), "Bonjour");
        assert_eq!(m.resolve_all()[0].text, "Bonjour");

        m.set_text("intro_fr", None).unwrap();
        assert_eq!(m.resolve_all()[0].text, "Hello");
    }

    #[test]
    fn test_translation_invalidated_on_remap() {
        let mut m = mapper();
        m.set("intro_fr", Some(0)).unwrap();
        m.set_translation("intro_fr", Some("Hallo".to_string())).unwrap();
        assert_eq!(m.translation("intro_fr"), Some("Hallo"));

        // Same value: translation survives.
        m.set("intro_fr", Some(0)).unwrap();
        assert_eq!(m.translation("intro_fr"), Some("Hallo"));

        m.set("intro_fr", Some(1)).unwrap();
        assert_eq!(m.translation("intro_fr"), None);
    }

    #[test]
    fn test_resolve_all_schema_order_and_idempotent() {
        let mut m = mapper();
        m.set("pricing_fr", Some(1)).unwrap();

        let first = m.resolve_all();
        let keys: Vec<_> = first.iter().map(|r| r.field.source_key.as_str()).collect();
        assert_eq!(keys, vec!["intro_fr", "pricing_fr", "risks_fr"]);
        assert_eq!(first[2].text, "");
        assert_eq!(first, m.resolve_all());
    }
}
