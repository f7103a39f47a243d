//! Integration tests for field mapping.

use docmap::extract::extract;
use docmap::mapping::{Correspondence, FieldMapper, TitleHints};
use docmap::model::{Block, Section};
use docmap::schema::{Field, Schema};
use docmap::Error;

fn sample_sections() -> Vec<Section> {
    extract(&[
        Block::heading(1, "Intro"),
        Block::paragraph("Hello"),
        Block::heading(1, "Pricing"),
        Block::table([["A", "B"], ["1", "2"]]),
    ])
}

#[test]
fn test_reference_example() {
    let schema = Schema::new(vec![Field::new("intro_fr")]).unwrap();
    let mut hints = TitleHints::new();
    hints.insert("intro_fr", "Intro");

    let mut mapper = FieldMapper::new(schema, sample_sections());
    let suggestion = mapper.suggest_correspondence(&hints);
    assert_eq!(suggestion.get("intro_fr"), Some(Some(0)));

    mapper.apply(suggestion).unwrap();
    assert_eq!(mapper.resolve("intro_fr").unwrap(), "Hello");
}

#[test]
fn test_unmatched_hint_is_unmapped_but_present() {
    let schema = Schema::new(vec![Field::new("intro_fr"), Field::new("risks_fr")]).unwrap();
    let mut hints = TitleHints::new();
    hints.insert("intro_fr", "Intro");
    hints.insert("risks_fr", "Risques");

    let mapper = FieldMapper::with_hints(schema, sample_sections(), &hints);
    assert_eq!(mapper.get("risks_fr").unwrap(), None);

    let resolved = mapper.resolve_all();
    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[1].field.source_key, "risks_fr");
    assert_eq!(resolved[1].section, None);
    assert_eq!(resolved[1].text, "");
}

#[test]
fn test_set_then_unset() {
    let schema = Schema::new(vec![Field::new("pricing_fr")]).unwrap();
    let mut mapper = FieldMapper::new(schema, sample_sections());

    mapper.set("pricing_fr", Some(1)).unwrap();
    assert!(!mapper.resolve("pricing_fr").unwrap().is_empty());

    mapper.set("pricing_fr", None).unwrap();
    assert_eq!(mapper.get("pricing_fr").unwrap(), None);
    assert_eq!(mapper.resolve("pricing_fr").unwrap(), "");
}

#[test]
fn test_out_of_range_set_leaves_state() {
    let schema = Schema::new(vec![Field::new("intro_fr"), Field::new("pricing_fr")]).unwrap();
    let mut mapper = FieldMapper::new(schema, sample_sections());
    mapper.set("intro_fr", Some(0)).unwrap();
    let before = mapper.correspondence().clone();

    for index in [2, 3, usize::MAX] {
        let err = mapper.set("intro_fr", Some(index)).unwrap_err();
        assert!(matches!(err, Error::InvalidReference { len: 2, .. }));
        assert_eq!(*mapper.correspondence(), before);
    }
}

#[test]
fn test_resolve_all_idempotent() {
    let schema = Schema::new(vec![
        Field::new("intro_fr"),
        Field::new("pricing_fr"),
        Field::new("notes_fr"),
    ])
    .unwrap();
    let mut mapper = FieldMapper::new(schema, sample_sections());
    mapper.set("intro_fr", Some(0)).unwrap();
    mapper.set("pricing_fr", Some(1)).unwrap();

    let first = mapper.resolve_all();
    let second = mapper.resolve_all();
    assert_eq!(first, second);
}

#[test]
fn test_correspondence_keys_match_schema() {
    let schema = Schema::new(vec![Field::new("a"), Field::new("b")]).unwrap();
    let mut correspondence = Correspondence::unmapped(&schema);
    assert!(!correspondence.assign("c", Some(0)));
    assert_eq!(correspondence.len(), 2);

    let mut mapper = FieldMapper::new(schema, sample_sections());
    correspondence.assign("b", Some(1));
    mapper.apply(correspondence).unwrap();

    let keys: Vec<_> = mapper.correspondence().iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(mapper.get("b").unwrap(), Some(1));
}

#[test]
fn test_mapping_file_seeding() {
    let schema = Schema::from_yaml_str(
        "fields:\n  - key: intro_fr\n    label: Introduction\n  - key: pricing_fr\n",
    )
    .unwrap();
    let hints = TitleHints::from_mapping_yaml(
        "mapping:\n  Introduction: \"  intro \"\n  pricing_fr: \"-- (vide) --\"\n",
        &schema,
    )
    .unwrap();

    let mapper = FieldMapper::with_hints(schema, sample_sections(), &hints);
    assert_eq!(mapper.get("intro_fr").unwrap(), Some(0));
    assert_eq!(mapper.get("pricing_fr").unwrap(), None);
}

#[test]
fn test_sections_untouched_by_mapping() {
    let sections = sample_sections();
    let schema = Schema::new(vec![Field::new("intro_fr")]).unwrap();
    let mut mapper = FieldMapper::new(schema, sections.clone());

    mapper.set("intro_fr", Some(1)).unwrap();
    mapper
        .set_text("intro_fr", Some("edited".to_string()))
        .unwrap();
    assert_eq!(mapper.sections(), sections.as_slice());
}
