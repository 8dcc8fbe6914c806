//! Catalog loading options
//!
//! Options can be built in code or read from a TOML file. The keys may sit
//! at the top level of a dedicated file:
//!
//! ```toml
//! default_language = "de"
//! strict = true
//! ```
//!
//! or under a `[load]` table of a larger application config, in which case
//! every other table is ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::formats::po::DEFAULT_EXTENSIONS;

fn default_language() -> String {
    "en".to_string()
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()
}

fn default_true() -> bool {
    true
}

/// How a translation tree is loaded.
///
/// # Example
///
/// ```
/// use pocatalog::config::LoadOptions;
///
/// let options = LoadOptions::new()
///     .with_default_language("fr")
///     .with_strict(true)
///     .with_extensions(["po"]);
/// assert!(options.accepts("locales/fr/app.po"));
/// assert!(!options.accepts("locales/fr/app.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadOptions {
    /// Language used when a requested one is not loaded
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Fail files on malformed lines and repeated message ids instead of
    /// skipping and overwriting
    #[serde(default)]
    pub strict: bool,

    /// File extensions (without the dot) that are parsed. Matched exactly.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Read and parse files on the rayon thread pool
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            strict: false,
            extensions: default_extensions(),
            parallel: true,
        }
    }
}

impl LoadOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback language.
    #[must_use]
    pub fn with_default_language(mut self, code: impl Into<String>) -> Self {
        self.default_language = code.into();
        self
    }

    /// Enable or disable strict parsing.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replace the accepted file extensions.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable parallel parsing.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether `path` has one of the accepted extensions.
    #[must_use]
    pub fn accepts(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|accepted| accepted == ext))
    }

    /// Parse options from TOML text.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the text is not valid TOML, has unknown
    /// keys, or lists an empty or dotted extension.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(text)?;
        let options: Self = match table.remove("load") {
            Some(section) => section.try_into()?,
            None => toml::Value::Table(table).try_into()?,
        };
        options.validate()?;
        Ok(options)
    }

    /// Read options from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not hold valid
    /// options.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded options from {}", path.display());
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(Error::Config(format!(
                "invalid extension '{bad}': expected a bare extension such as \"po\""
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LoadOptions::default();
        assert_eq!(options.default_language, "en");
        assert!(!options.strict);
        assert_eq!(options.extensions, vec!["po", "pot", "txt"]);
        assert!(options.parallel);
    }

    #[test]
    fn test_accepts_exact_extension() {
        let options = LoadOptions::default();
        assert!(options.accepts("a/b.po"));
        assert!(options.accepts("a/b.pot"));
        assert!(options.accepts("notes.txt"));
        assert!(!options.accepts("a/b.PO"));
        assert!(!options.accepts("a/b.mo"));
        assert!(!options.accepts("a/po"));
    }

    #[test]
    fn test_top_level_keys() {
        let options = LoadOptions::from_toml_str("default_language = \"de\"\nstrict = true\n").unwrap();
        assert_eq!(options.default_language, "de");
        assert!(options.strict);
        assert!(options.parallel);
        assert_eq!(options.extensions.len(), 3);
    }

    #[test]
    fn test_load_table() {
        let text = r#"
[app]
name = "demo"

[load]
extensions = ["po"]
parallel = false
"#;
        let options = LoadOptions::from_toml_str(text).unwrap();
        assert_eq!(options.extensions, vec!["po"]);
        assert!(!options.parallel);
        assert_eq!(options.default_language, "en");
    }

    #[test]
    fn test_rejects_unknown_key() {
        let result = LoadOptions::from_toml_str("stirct = true\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_dotted_extension() {
        let result = LoadOptions::from_toml_str("extensions = [\".po\"]\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_options_roundtrip() {
        let options = LoadOptions::new()
            .with_default_language("pt-BR")
            .with_strict(true)
            .with_extensions(["po", "pot"])
            .with_parallel(false);

        let toml_str = toml::to_string_pretty(&options).unwrap();
        let parsed = LoadOptions::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, options);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pocatalog.toml");
        std::fs::write(&path, "[load]\ndefault_language = \"ja\"\n").unwrap();
        assert_eq!(LoadOptions::from_file(&path).unwrap().default_language, "ja");
        assert!(matches!(
            LoadOptions::from_file(dir.path().join("missing.toml")),
            Err(Error::Io(_))
        ));
    }
}
