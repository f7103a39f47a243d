//! Paragraph style table and heading classification.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::xml::{wml, wml_attr, WML_NS};
use super::ParseOptions;
use crate::error::Result;

/// Maximum `w:basedOn` chain followed when classifying a style.
const MAX_STYLE_DEPTH: usize = 16;

/// Word reserves outline level 9 for body text.
const BODY_TEXT_OUTLINE: u8 = 9;

fn heading_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(heading|titre|kop|überschrift)\s*([1-9])$").unwrap())
}

#[derive(Debug, Clone, Default)]
struct StyleDef {
    name: Option<String>,
    based_on: Option<String>,
    outline_level: Option<u8>,
}

/// Paragraph styles from `word/styles.xml`, keyed by style id.
#[derive(Debug, Clone, Default)]
pub(crate) struct StyleSheet {
    styles: HashMap<String, StyleDef>,
}

impl StyleSheet {
    /// Parse the styles part.
    pub(crate) fn parse(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml)?;
        let mut styles = HashMap::new();

        for node in doc.root_element().children() {
            if node.tag_name().name() != "style" || node.tag_name().namespace() != Some(WML_NS) {
                continue;
            }
            if node.attribute((WML_NS, "type")).is_some_and(|t| t != "paragraph") {
                continue;
            }
            let Some(id) = node.attribute((WML_NS, "styleId")) else {
                continue;
            };
            let def = StyleDef {
                name: wml_attr(node, "name").map(str::to_string),
                based_on: wml_attr(node, "basedOn").map(str::to_string),
                outline_level: wml(node, "pPr")
                    .and_then(|ppr| wml_attr(ppr, "outlineLvl"))
                    .and_then(|v| v.parse().ok()),
            };
            styles.insert(id.to_string(), def);
        }

        Ok(Self { styles })
    }

    /// Number of paragraph styles.
    pub(crate) fn len(&self) -> usize {
        self.styles.len()
    }

    /// Heading level for a paragraph style id, following `w:basedOn`.
    pub(crate) fn heading_level(&self, style_id: &str, options: &ParseOptions) -> Option<u8> {
        let mut current = Some(style_id);
        for _ in 0..MAX_STYLE_DEPTH {
            let id = current?;
            let def = self.styles.get(id);
            let name = def.and_then(|d| d.name.as_deref()).unwrap_or(id);

            if let Some(level) = classify_name(name, options) {
                return Some(level);
            }
            if let Some(level) = def.and_then(|d| d.outline_level).and_then(outline_to_level) {
                return Some(level);
            }
            current = def.and_then(|d| d.based_on.as_deref());
        }
        None
    }
}

/// Heading level from a style name, if it names a heading style.
pub(crate) fn classify_name(name: &str, options: &ParseOptions) -> Option<u8> {
    let trimmed = name.trim();
    let lower = trimmed.to_lowercase();
    if let Some(level) = options.heading_styles.get(&lower) {
        return Some(*level);
    }
    match lower.as_str() {
        "title" | "titre" => return Some(1),
        "subtitle" | "sous-titre" => return Some(2),
        _ => {}
    }
    heading_name_regex()
        .captures(trimmed)
        .and_then(|c| c.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

/// Heading level from a zero-based `w:outlineLvl` value.
pub(crate) fn outline_to_level(value: u8) -> Option<u8> {
    (value < BODY_TEXT_OUTLINE).then_some(value + 1)
}
