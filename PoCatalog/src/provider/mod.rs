//! Translation lookup across languages
//!
//! A [`Provider`] holds one merged [`Catalog`] per language code and hands
//! out [`Language`] views for lookups. Requests for a language that was not
//! loaded fall back to the provider's default language, and lookups of an
//! untranslated id fall back to the id itself.
//!
//! # Example
//!
//! ```
//! use pocatalog::fs::MemFs;
//! use pocatalog::Provider;
//!
//! let fs = MemFs::new();
//! fs.add_file("i18n/de/app.po", "msgid \"Hello, %s!\"\nmsgstr \"Hallo, %s!\"\n");
//! fs.add_file("i18n/en/app.po", "msgid \"Bye\"\nmsgstr \"Goodbye\"\n");
//!
//! let provider = Provider::load_all_with_fs("i18n", "en", &fs)?;
//! let de = provider.l("de").unwrap();
//! assert_eq!(de.t("Hello, %s!", &["Bob".into()]), "Hallo, Bob!");
//!
//! // Unknown language: the default one is used.
//! assert_eq!(provider.l("xx").unwrap().code(), "en");
//! assert_eq!(provider.tl("xx", "Hello, %s!", &["Bob".into()]), "Hello, Bob!");
//! # Ok::<(), pocatalog::Error>(())
//! ```

pub mod format;
mod loader;
mod merge;
mod resolve;

use std::collections::{BTreeMap, btree_map};
use std::path::Path;

use crate::config::LoadOptions;
use crate::error::Result;
use crate::formats::po::{Catalog, LANGUAGE_NAME};
use crate::fs::{FileSystem, OsFs};

pub use format::{FormatArg, format};
pub use merge::CatalogMerger;
pub use resolve::{is_valid_language_tag, resolve_language_code, resolve_language_code_with};

/// The stored translation, else the id itself.
fn template_for<'a>(translation: Option<&'a str>, id: &'a str) -> &'a str {
    translation.unwrap_or(id)
}

/// The merged catalog of one language.
#[derive(Debug, Clone, PartialEq)]
pub struct Language {
    code: String,
    catalog: Catalog,
}

impl Language {
    #[must_use]
    pub fn new(code: impl Into<String>, catalog: Catalog) -> Self {
        Self {
            code: code.into(),
            catalog,
        }
    }

    /// The language code this catalog was filed under.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The `Language-Name` header, or `""`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.catalog.metadata.get(LANGUAGE_NAME)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Raw translation of `id`, without formatting or fallback.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.catalog.get(id)
    }

    /// Translate `id` and substitute `args` into the result.
    ///
    /// When `id` has no entry, `id` itself is used as the template. A stored
    /// empty translation is used as is.
    #[must_use]
    pub fn t(&self, id: &str, args: &[FormatArg]) -> String {
        format(template_for(self.catalog.get(id), id), args)
    }

    /// Lookups restricted to the context `name`.
    #[must_use]
    pub fn ctx<'a>(&'a self, name: &'a str) -> ContextScope<'a> {
        ContextScope {
            name,
            entries: self.catalog.context.get(name),
        }
    }

    /// A header value, or `""`.
    #[must_use]
    pub fn meta(&self, key: &str) -> &str {
        self.catalog.metadata.get(key)
    }
}

/// A [`Language`] bound to one `msgctxt`.
#[derive(Debug, Clone, Copy)]
pub struct ContextScope<'a> {
    name: &'a str,
    entries: Option<&'a BTreeMap<String, String>>,
}

impl<'a> ContextScope<'a> {
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Whether the language has any entries under this context.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.entries.is_some()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&'a str> {
        self.entries
            .and_then(|entries| entries.get(id))
            .map(String::as_str)
    }

    /// Same as [`Language::t`], scoped to this context.
    #[must_use]
    pub fn t(&self, id: &str, args: &[FormatArg]) -> String {
        format(template_for(self.get(id), id), args)
    }
}

/// All loaded languages plus the fallback choice.
///
/// Read-only once built, so it can be shared between threads as is.
#[derive(Debug, Clone, Default)]
pub struct Provider {
    languages: BTreeMap<String, Language>,
    default_language: String,
}

impl Provider {
    fn from_parts(languages: BTreeMap<String, Language>, default_language: String) -> Self {
        Self {
            languages,
            default_language,
        }
    }

    /// Load every `.po`, `.pot` and `.txt` file below `root` from disk.
    ///
    /// # Errors
    /// Returns an error if the tree cannot be walked or a file cannot be
    /// read. Files that fail to parse are skipped.
    pub fn load_all(root: impl AsRef<Path>, default_language: impl Into<String>) -> Result<Self> {
        Self::load_all_with_fs(root, default_language, &OsFs)
    }

    /// [`load_all`](Provider::load_all) over any [`FileSystem`].
    ///
    /// # Errors
    /// Same as [`load_all`](Provider::load_all).
    pub fn load_all_with_fs(
        root: impl AsRef<Path>,
        default_language: impl Into<String>,
        fs: &dyn FileSystem,
    ) -> Result<Self> {
        let options = LoadOptions::default().with_default_language(default_language);
        Self::load_with_options(root, fs, &options)
    }

    /// Load a tree as described by `options`.
    ///
    /// # Errors
    /// Same as [`load_all`](Provider::load_all).
    pub fn load_with_options(
        root: impl AsRef<Path>,
        fs: &dyn FileSystem,
        options: &LoadOptions,
    ) -> Result<Self> {
        loader::load(root.as_ref(), fs, options)
    }

    /// Start an empty aggregation, for catalogs parsed by the caller.
    #[must_use]
    pub fn builder() -> CatalogMerger {
        CatalogMerger::new()
    }

    /// Build a provider from `(language code, catalog)` pairs, merged in
    /// iteration order.
    #[must_use]
    pub fn from_catalogs<I, S>(catalogs: I, default_language: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (S, Catalog)>,
        S: Into<String>,
    {
        let merger = CatalogMerger::new();
        for (code, catalog) in catalogs {
            merger.merge(code, catalog);
        }
        merger.into_provider(default_language)
    }

    /// The language `code`, else the default language, else `None`.
    #[must_use]
    pub fn l(&self, code: &str) -> Option<&Language> {
        self.languages
            .get(code)
            .or_else(|| self.languages.get(&self.default_language))
    }

    /// Translate through [`l`](Provider::l) in one call.
    ///
    /// With no language available at all, `id` is formatted as is.
    #[must_use]
    pub fn tl(&self, code: &str, id: &str, args: &[FormatArg]) -> String {
        match self.l(code) {
            Some(language) => language.t(id, args),
            None => format(id, args),
        }
    }

    /// Loaded language codes, sorted.
    #[must_use]
    pub fn languages(&self) -> Vec<&str> {
        self.languages.keys().map(String::as_str).collect()
    }

    /// Loaded languages, sorted by code.
    #[must_use]
    pub fn iter(&self) -> btree_map::Values<'_, String, Language> {
        self.languages.values()
    }

    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Whether `code` was loaded (no fallback).
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.languages.contains_key(code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl<'a> IntoIterator for &'a Provider {
    type Item = &'a Language;
    type IntoIter = btree_map::Values<'a, String, Language>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
