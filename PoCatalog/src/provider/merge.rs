//! Per-language aggregation of parsed catalogs

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use super::{Language, Provider};
use crate::formats::po::Catalog;

/// Folds parsed catalogs into one aggregate per language code.
///
/// `merge` takes `&self` and serializes each read-merge-write step behind a
/// mutex, so a merger can be shared between threads. Later merges overwrite
/// earlier ones key by key.
#[derive(Debug, Default)]
pub struct CatalogMerger {
    languages: Mutex<BTreeMap<String, Catalog>>,
}

impl CatalogMerger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `catalog` into the aggregate for `code`, creating it on first
    /// sight of the code.
    pub fn merge(&self, code: impl Into<String>, catalog: Catalog) {
        let code = code.into();
        let mut languages = self
            .languages
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match languages.get_mut(&code) {
            Some(existing) => existing.merge(catalog),
            None => {
                languages.insert(code, catalog);
            }
        }
    }

    /// Number of distinct language codes seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.languages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finish aggregation.
    #[must_use]
    pub fn into_provider(self, default_language: impl Into<String>) -> Provider {
        let languages = self
            .languages
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_iter()
            .map(|(code, catalog)| {
                let language = Language::new(code.clone(), catalog);
                (code, language)
            })
            .collect();
        Provider::from_parts(languages, default_language.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::po::parse_str;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_last_write_wins() {
        let merger = CatalogMerger::new();
        merger.merge("en", parse_str("msgid \"a\"\nmsgstr \"1\"\n\nmsgid \"b\"\nmsgstr \"2\"\n", false).unwrap());
        merger.merge("en", parse_str("msgid \"a\"\nmsgstr \"3\"\n", false).unwrap());

        let provider = merger.into_provider("en");
        let en = provider.l("en").unwrap();
        assert_eq!(en.get("a"), Some("3"));
        assert_eq!(en.get("b"), Some("2"));
    }

    #[test]
    fn test_context_and_metadata_union() {
        let merger = CatalogMerger::new();
        merger.merge(
            "de",
            parse_str(
                "msgid \"\"\nmsgstr \"Language-Name: Deutsch\\n\"\n\nmsgctxt \"menu\"\nmsgid \"Open\"\nmsgstr \"Offnen\"\n",
                false,
            )
            .unwrap(),
        );
        merger.merge(
            "de",
            parse_str(
                "msgid \"\"\nmsgstr \"Language-Name: German\\nPlural-Forms: x\\n\"\n\nmsgctxt \"menu\"\nmsgid \"Close\"\nmsgstr \"Schliessen\"\n",
                false,
            )
            .unwrap(),
        );

        let provider = merger.into_provider("de");
        let de = provider.l("de").unwrap();
        assert_eq!(de.meta("Language-Name"), "German");
        assert_eq!(de.meta("Plural-Forms"), "x");
        assert_eq!(de.catalog().get_in_context("menu", "Open"), Some("Offnen"));
        assert_eq!(de.catalog().get_in_context("menu", "Close"), Some("Schliessen"));
    }

    #[test]
    fn test_languages_are_kept_apart() {
        let merger = CatalogMerger::new();
        merger.merge("en", parse_str("msgid \"a\"\nmsgstr \"A\"\n", false).unwrap());
        merger.merge("fr", parse_str("msgid \"a\"\nmsgstr \"Ah\"\n", false).unwrap());
        assert_eq!(merger.len(), 2);

        let provider = merger.into_provider("en");
        assert_eq!(provider.l("fr").unwrap().get("a"), Some("Ah"));
        assert_eq!(provider.l("en").unwrap().get("a"), Some("A"));
    }

    #[test]
    fn test_concurrent_merges() {
        let merger = Arc::new(CatalogMerger::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let merger = Arc::clone(&merger);
                thread::spawn(move || {
                    let text = format!("msgid \"k{i}\"\nmsgstr \"v{i}\"\n");
                    merger.merge("en", parse_str(&text, false).unwrap());
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let merger = Arc::try_unwrap(merger).unwrap();
        let provider = merger.into_provider("en");
        assert_eq!(provider.l("en").unwrap().catalog().entries.len(), 8);
    }
}
