//! gettext `.po` / `.pot` catalog format
//!
//! Text format for translation catalogs: `msgctxt`/`msgid`/`msgstr`
//! directives with quoted payloads, `#` comments and an optional header
//! block stored under the empty message id.

mod reader;
mod unquote;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use reader::{
    PoReader, ReaderState, parse_bytes, parse_reader, parse_str, read_po, unmarshal,
};
pub use unquote::{DecodeError, is_quoted, unquote};

/// Header field holding the catalog's language code.
pub const LANGUAGE_CODE: &str = "Language-Code";

/// Header field holding the catalog's human-readable language name.
pub const LANGUAGE_NAME: &str = "Language-Name";

/// File extensions picked up when loading a directory tree.
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["po", "pot", "txt"];

/// Header fields of a catalog (`Field-Name: value` lines).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    fields: BTreeMap<String, String>,
}

impl Metadata {
    /// Create empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw header block.
    ///
    /// Each line with a colon contributes one field: the text before the
    /// first colon is the name, the trimmed remainder is the value.
    #[must_use]
    pub fn from_header(raw: &str) -> Self {
        let mut meta = Self::new();
        for line in raw.split('\n') {
            if let Some((name, value)) = line.split_once(':') {
                meta.set(name.trim(), value.trim());
            }
        }
        meta
    }

    /// Get a field value, or `""` if the field is absent.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map_or("", String::as_str)
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Remove a field, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.fields.remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Iterate over `(name, value)` pairs in name order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy every field of `other` over this one (last write wins).
    pub fn merge(&mut self, other: Metadata) {
        self.fields.extend(other.fields);
    }
}

/// A parsed translation catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Header fields.
    #[serde(default)]
    pub metadata: Metadata,
    /// Message id to translation, without context.
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
    /// Context name to (message id to translation).
    #[serde(default)]
    pub context: BTreeMap<String, BTreeMap<String, String>>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a translation without context.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Look up a translation inside a context.
    #[must_use]
    pub fn get_in_context(&self, context: &str, id: &str) -> Option<&str> {
        self.context
            .get(context)
            .and_then(|scope| scope.get(id))
            .map(String::as_str)
    }

    /// The `Language-Code` header, or `""`.
    #[must_use]
    pub fn language_code(&self) -> &str {
        self.metadata.get(LANGUAGE_CODE)
    }

    /// Total number of translations, context-scoped ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len() + self.context.values().map(BTreeMap::len).sum::<usize>()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fold `other` into this catalog.
    ///
    /// Entries, context buckets (at both levels) and metadata are unioned;
    /// on a key collision the value from `other` wins.
    pub fn merge(&mut self, other: Catalog) {
        self.entries.extend(other.entries);
        for (name, scope) in other.context {
            self.context.entry(name).or_default().extend(scope);
        }
        self.metadata.merge(other.metadata);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_from_header() {
        let meta = Metadata::from_header(
            "Content-Type: text/plain; charset=utf-8\nLanguage-Code: en\nLanguage-Name: English\nno colon here\n",
        );
        assert_eq!(meta.len(), 3);
        assert_eq!(meta.get("Language-Code"), "en");
        assert_eq!(meta.get("Content-Type"), "text/plain; charset=utf-8");
        assert_eq!(meta.get("Missing"), "");
    }

    #[test]
    fn test_metadata_value_keeps_later_colons() {
        let meta = Metadata::from_header("POT-Creation-Date: 2024-01-01 12:00+0000");
        assert_eq!(meta.get("POT-Creation-Date"), "2024-01-01 12:00+0000");
    }

    #[test]
    fn test_metadata_remove() {
        let mut meta = Metadata::from_header("Language-Code: en");
        assert_eq!(meta.remove("Language-Code").as_deref(), Some("en"));
        assert_eq!(meta.get("Language-Code"), "");
        assert!(meta.is_empty());
    }

    #[test]
    fn test_catalog_merge_last_write_wins() {
        let mut base = Catalog::new();
        base.entries.insert("a".into(), "1".into());
        base.entries.insert("b".into(), "2".into());
        base.context
            .entry("menu".into())
            .or_default()
            .insert("File".into(), "Fichier".into());
        base.metadata.set("Language-Code", "fr");

        let mut later = Catalog::new();
        later.entries.insert("b".into(), "two".into());
        later.context
            .entry("menu".into())
            .or_default()
            .insert("Edit".into(), "Editer".into());
        later.context
            .entry("button".into())
            .or_default()
            .insert("File".into(), "Dossier".into());
        later.metadata.set("Language-Name", "Francais");

        base.merge(later);

        assert_eq!(base.get("a"), Some("1"));
        assert_eq!(base.get("b"), Some("two"));
        assert_eq!(base.get_in_context("menu", "File"), Some("Fichier"));
        assert_eq!(base.get_in_context("menu", "Edit"), Some("Editer"));
        assert_eq!(base.get_in_context("button", "File"), Some("Dossier"));
        assert_eq!(base.language_code(), "fr");
        assert_eq!(base.metadata.get("Language-Name"), "Francais");
        assert_eq!(base.len(), 5);
    }
}
