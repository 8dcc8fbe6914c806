#![allow(non_snake_case)]
//! # PoCatalog
//!
//! Reading gettext PO/POT translation files and serving lookups from them.
//!
//! ## Overview
//!
//! - **Parsing** - [`formats::po::PoReader`] is an incremental line parser
//!   for `msgctxt`/`msgid`/`msgstr` entries, multi-line strings, comments
//!   and the header block. It runs strict or lenient.
//! - **Loading** - [`Provider::load_all`] walks a directory tree, works out
//!   the language of every file and merges files of the same language.
//! - **Lookups** - [`Language::t`] translates and substitutes printf-style
//!   arguments, falling back to the message id when untranslated.
//!
//! ## Quick Start
//!
//! ### Parsing a single file
//!
//! ```
//! use pocatalog::formats::po::parse_str;
//!
//! let catalog = parse_str("msgid \"Save\"\nmsgstr \"Speichern\"\n", true)?;
//! assert_eq!(catalog.get("Save"), Some("Speichern"));
//! # Ok::<(), pocatalog::Error>(())
//! ```
//!
//! ### Loading a translation tree
//!
//! ```no_run
//! use pocatalog::Provider;
//!
//! // locales/de/app.po, locales/fr/app.po, ...
//! let provider = Provider::load_all("locales", "en")?;
//! if let Some(de) = provider.l("de") {
//!     println!("{}", de.t("Hello, %s!", &["Bob".into()]));
//! }
//! # Ok::<(), pocatalog::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use pocatalog::prelude::*;
//!
//! let provider = Provider::from_catalogs([("en", Catalog::new())], "en");
//! assert_eq!(provider.tl("en", "%d files", &[FormatArg::Int(3)]), "3 files");
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `pocatalog` command-line binary

pub mod config;
pub mod error;
pub mod formats;
pub mod fs;
pub mod provider;

// Re-exports for convenience
pub use error::{Error, Result};
pub use provider::{Language, Provider};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::LoadOptions;
    pub use crate::error::{Error, Result};
    pub use crate::formats::po::{
        Catalog, Metadata, PoReader, ReaderState, parse_bytes, parse_reader, parse_str, read_po,
    };
    pub use crate::fs::{FileSystem, MemFs, OsFs};
    pub use crate::provider::{
        CatalogMerger, ContextScope, FormatArg, Language, Provider, is_valid_language_tag,
        resolve_language_code,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
