//! Field translation.
//!
//! Translation goes through the [`Translator`] trait. Failures are never
//! propagated out of this module: a field whose translation fails gets the
//! [`PlaceholderTranslator`] output and a warning in the log, and the other
//! fields are unaffected.

mod openai;

pub use openai::{OpenAiConfig, OpenAiTranslator, DEFAULT_ENDPOINT, DEFAULT_MODEL};

use log::{debug, warn};
use rayon::prelude::*;

use crate::error::Result;
use crate::mapping::FieldMapper;

/// A text translation backend.
pub trait Translator: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Translate `text` from `source_lang` to `target_lang`.
    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;
}

/// Deterministic offline translator that tags text with the target language.
///
/// ```
/// use docmap::translate::{PlaceholderTranslator, Translator};
///
/// let t = PlaceholderTranslator;
/// assert_eq!(t.translate("Bonjour", "fr", "nl").unwrap(), "[NL] Bonjour");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderTranslator;

impl PlaceholderTranslator {
    /// Placeholder text without going through the trait.
    pub fn tag(text: &str, target_lang: &str) -> String {
        format!("[{}] {}", target_lang.to_uppercase(), text)
    }
}

impl Translator for PlaceholderTranslator {
    fn name(&self) -> &str {
        "placeholder"
    }

    fn translate(&self, text: &str, _source_lang: &str, target_lang: &str) -> Result<String> {
        Ok(Self::tag(text, target_lang))
    }
}

/// Options for field translation.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// Source language code
    pub source_lang: String,

    /// Target language code
    pub target_lang: String,

    /// Translate fields concurrently
    pub parallel: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            source_lang: "fr".to_string(),
            target_lang: "nl".to_string(),
            parallel: true,
        }
    }
}

impl TranslateOptions {
    /// Create default options (French to Dutch, parallel).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source language.
    pub fn with_source_lang(mut self, lang: impl Into<String>) -> Self {
        self.source_lang = lang.into();
        self
    }

    /// Set the target language.
    pub fn with_target_lang(mut self, lang: impl Into<String>) -> Self {
        self.target_lang = lang.into();
        self
    }

    /// Translate fields one at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Translate one text, recovering from backend failure.
///
/// Blank text yields an empty string without calling the backend.
pub fn translate_text(
    translator: &dyn Translator,
    text: &str,
    options: &TranslateOptions,
) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    match translator.translate(text, &options.source_lang, &options.target_lang) {
        Ok(translated) => translated,
        Err(e) => {
            warn!(
                "{} translation failed, using placeholder: {}",
                translator.name(),
                e
            );
            PlaceholderTranslator::tag(text, &options.target_lang)
        }
    }
}

/// Translate every resolved field and store the results in the mapper.
///
/// Returns the number of translations stored in the mapper.
pub fn translate_fields(
    mapper: &mut FieldMapper,
    translator: &dyn Translator,
    options: &TranslateOptions,
) -> usize {
    translate_fields_with_progress(mapper, translator, options, |_| {})
}

/// Like [`translate_fields`], calling `on_done` with each field key as it
/// completes. With `parallel` set the callback runs on worker threads.
pub fn translate_fields_with_progress<F>(
    mapper: &mut FieldMapper,
    translator: &dyn Translator,
    options: &TranslateOptions,
    on_done: F,
) -> usize
where
    F: Fn(&str) + Send + Sync,
{
    let resolved = mapper.resolve_all();
    debug!(
        "translating {} fields with {} ({} -> {})",
        resolved.len(),
        translator.name(),
        options.source_lang,
        options.target_lang
    );

    let work = |r: &crate::mapping::ResolvedField| {
        let translated = translate_text(translator, &r.text, options);
        on_done(&r.field.source_key);
        (r.field.source_key.clone(), translated)
    };

    let results: Vec<(String, String)> = if options.parallel {
        resolved.par_iter().map(work).collect()
    } else {
        resolved.iter().map(work).collect()
    };

    let mut stored = 0;
    for (key, translated) in results {
        match mapper.set_translation(&key, Some(translated)) {
            Ok(()) => stored += 1,
            Err(e) => warn!("Dropping translation for '{}': {}", key, e),
        }
    }
    stored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::extract::extract;
    use crate::model::Block;
    use crate::schema::{Field, Schema};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Failing;

    impl Translator for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn translate(&self, _: &str, _: &str, _: &str) -> Result<String> {
            Err(Error::TranslationUnavailable("offline".to_string()))
        }
    }

    /// Fails on text containing "boom", uppercases everything else.
    struct Picky {
        calls: AtomicUsize,
    }

    impl Translator for Picky {
        fn name(&self) -> &str {
            "picky"
        }

        fn translate(&self, text: &str, _: &str, _: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text.contains("boom") {
                Err(Error::TranslationUnavailable("boom".to_string()))
            } else {
                Ok(text.to_uppercase())
            }
        }
    }

    fn mapper() -> FieldMapper {
        let sections = extract(&[
            Block::heading(1, "Intro"),
            Block::paragraph("hello"),
            Block::heading(1, "Risks"),
            Block::paragraph("boom"),
        ]);
        let schema = Schema::new(vec![
            Field::new("intro_fr"),
            Field::new("risks_fr"),
            Field::new("empty_fr"),
        ])
        .unwrap();
        let mut m = FieldMapper::new(schema, sections);
        m.set("intro_fr", Some(0)).unwrap();
        m.set("risks_fr", Some(1)).unwrap();
        m
    }

    #[test]
    fn test_placeholder() {
        let opts = TranslateOptions::new();
        assert_eq!(
            translate_text(&PlaceholderTranslator, "Texte", &opts),
            "[NL] Texte"
        );
    }

    #[test]
    fn test_blank_text_skips_backend() {
        let picky = Picky {
            calls: AtomicUsize::new(0),
        };
        assert_eq!(translate_text(&picky, "  \n", &TranslateOptions::new()), "");
        assert_eq!(picky.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failure_falls_back() {
        let opts = TranslateOptions::new().with_target_lang("de");
        assert_eq!(translate_text(&Failing, "Hallo", &opts), "[DE] Hallo");
    }

    #[test]
    fn test_translate_fields_isolates_failures() {
        for opts in [TranslateOptions::new(), TranslateOptions::new().sequential()] {
            let mut m = mapper();
            let picky = Picky {
                calls: AtomicUsize::new(0),
            };
            let done = AtomicUsize::new(0);
            let count = translate_fields_with_progress(&mut m, &picky, &opts, |_| {
                done.fetch_add(1, Ordering::SeqCst);
            });

            assert_eq!(count, 3);
            assert_eq!(done.load(Ordering::SeqCst), 3);
            assert_eq!(picky.calls.load(Ordering::SeqCst), 2);
            assert_eq!(m.translation("intro_fr"), Some("HELLO"));
            assert_eq!(m.translation("risks_fr"), Some("[NL] boom"));
            assert_eq!(m.translation("empty_fr"), Some(""));
        }
    }

    #[test]
    fn test_count_matches_stored_translations() {
        let mut m = mapper();
        let count = translate_fields(&mut m, &PlaceholderTranslator, &TranslateOptions::new());
        let stored = m
            .schema()
            .iter()
            .filter(|f| m.translation(&f.source_key).is_some())
            .count();
        assert_eq!(count, stored);
        assert_eq!(stored, m.schema().len());
    }
}
