//! Building a [`Provider`] from a directory tree
//!
//! Files are collected in walk order, read and parsed (in parallel when
//! enabled), then merged one by one in that same order.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use super::merge::CatalogMerger;
use super::resolve::resolve_language_code;
use super::Provider;
use crate::config::LoadOptions;
use crate::error::Result;
use crate::formats::po::{parse_bytes, Catalog};
use crate::fs::{FileSystem, WalkControl};

/// Load every accepted file below `root`.
///
/// # Errors
/// Returns an error if the tree cannot be walked or a file cannot be read.
/// Files that fail to parse are skipped.
pub fn load(root: &Path, fs: &dyn FileSystem, options: &LoadOptions) -> Result<Provider> {
    tracing::info!(
        "Loading translations from {} ({} file system)",
        root.display(),
        fs.name()
    );

    let files = collect_files(root, fs, options)?;
    tracing::debug!("Found {} translation files", files.len());

    let failed = AtomicUsize::new(0);
    let parse = |path: &PathBuf| -> Result<Option<Catalog>> {
        let data = fs.read(path)?;
        match parse_bytes(&data, options.strict) {
            Ok(catalog) => Ok(Some(catalog)),
            Err(e) => {
                failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Skipping {}: {}", path.display(), e);
                Ok(None)
            }
        }
    };
    let parsed: Vec<Option<Catalog>> = if options.parallel {
        files.par_iter().map(parse).collect::<Result<_>>()?
    } else {
        files.iter().map(parse).collect::<Result<_>>()?
    };

    let merger = CatalogMerger::new();
    let mut unresolved = 0usize;
    for (path, catalog) in files.iter().zip(parsed) {
        let Some(catalog) = catalog else {
            continue;
        };
        let code = resolve_language_code(path, &catalog);
        if code.is_empty() {
            unresolved += 1;
            tracing::debug!("No language code for {}, skipping", path.display());
            continue;
        }
        tracing::debug!("Merging {} into '{}'", path.display(), code);
        merger.merge(code, catalog);
    }

    tracing::info!(
        "Loaded {} languages from {} files ({} failed to parse, {} without language)",
        merger.len(),
        files.len(),
        failed.load(Ordering::Relaxed),
        unresolved
    );

    Ok(merger.into_provider(options.default_language.clone()))
}

/// Accepted files below `root`, in walk order.
fn collect_files(root: &Path, fs: &dyn FileSystem, options: &LoadOptions) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    fs.walk(root, &mut |path, info| {
        let info = info?;
        if info.is_file() {
            if options.accepts(path) {
                files.push(path.to_path_buf());
            } else {
                tracing::debug!("Ignoring {}", path.display());
            }
        }
        Ok(WalkControl::Continue)
    })?;
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemFs;
    use crate::Error;

    fn sample_fs() -> MemFs {
        let fs = MemFs::new();
        fs.add_file(
            "i18n/en/a.po",
            "msgid \"\"\nmsgstr \"Language-Name: English\\n\"\n\nmsgid \"hi\"\nmsgstr \"Hi\"\n",
        );
        fs.add_file("i18n/en/b.po", "msgid \"hi\"\nmsgstr \"Hello\"\n");
        fs.add_file("i18n/de/app.pot", "msgid \"hi\"\nmsgstr \"Hallo\"\n");
        fs.add_file("i18n/de/readme.md", "msgid \"hi\"\nmsgstr \"nope\"\n");
        fs.add_file("i18n/shared.d/x.po", "msgid \"hi\"\nmsgstr \"?\"\n");
        fs.add_file(
            "i18n/shared.d/fr.txt",
            "msgid \"\"\nmsgstr \"Language-Code: fr\\n\"\n\nmsgid \"hi\"\nmsgstr \"Salut\"\n",
        );
        fs
    }

    #[test]
    fn test_collect_files_in_walk_order() {
        let fs = sample_fs();
        let files = collect_files(Path::new("i18n"), &fs, &LoadOptions::default()).unwrap();
        let expected: Vec<PathBuf> = [
            "i18n/de/app.pot",
            "i18n/en/a.po",
            "i18n/en/b.po",
            "i18n/shared.d/fr.txt",
            "i18n/shared.d/x.po",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        assert_eq!(files, expected);
    }

    #[test]
    fn test_load_groups_by_language() {
        let fs = sample_fs();
        for parallel in [true, false] {
            let options = LoadOptions::default().with_parallel(parallel);
            let provider = load(Path::new("i18n"), &fs, &options).unwrap();
            assert_eq!(provider.languages(), vec!["de", "en", "fr"]);
            assert_eq!(provider.l("en").unwrap().get("hi"), Some("Hello"));
            assert_eq!(provider.l("en").unwrap().name(), "English");
            assert_eq!(provider.l("de").unwrap().get("hi"), Some("Hallo"));
            assert_eq!(provider.l("fr").unwrap().get("hi"), Some("Salut"));
        }
    }

    #[test]
    fn test_parse_failures_are_skipped() {
        let fs = MemFs::new();
        fs.add_file("l/en/good.po", "msgid \"a\"\nmsgstr \"A\"\n");
        fs.add_file("l/en/bad.po", "msgid \"b\"\nbogus\nmsgstr \"B\"\n");

        let provider = load(Path::new("l"), &fs, &LoadOptions::default().with_strict(true)).unwrap();
        let en = provider.l("en").unwrap();
        assert_eq!(en.get("a"), Some("A"));
        assert_eq!(en.get("b"), None);

        let provider = load(Path::new("l"), &fs, &LoadOptions::default()).unwrap();
        assert_eq!(provider.l("en").unwrap().get("b"), Some("B"));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let fs = MemFs::new();
        let result = load(Path::new("nowhere"), &fs, &LoadOptions::default());
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
