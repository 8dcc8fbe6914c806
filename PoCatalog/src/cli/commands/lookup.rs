//! CLI commands that load a whole translation tree

use std::path::Path;

use crate::config::LoadOptions;
use crate::fs::OsFs;
use crate::provider::{FormatArg, Provider};

fn load(root: &Path, config: Option<&Path>, default: Option<&str>) -> anyhow::Result<Provider> {
    let mut options = match config {
        Some(path) => LoadOptions::from_file(path)?,
        None => LoadOptions::default(),
    };
    if let Some(code) = default {
        options.default_language = code.to_string();
    }
    Ok(Provider::load_with_options(root, &OsFs, &options)?)
}

/// Turn a command-line value into a format argument.
///
/// Integers, floats and `true`/`false` are detected; anything else is a string.
fn parse_arg(raw: &str) -> FormatArg {
    if let Ok(n) = raw.parse::<i64>() {
        FormatArg::Int(n)
    } else if let Ok(n) = raw.parse::<u64>() {
        FormatArg::Uint(n)
    } else if let Ok(x) = raw.parse::<f64>() {
        FormatArg::Float(x)
    } else if let Ok(b) = raw.parse::<bool>() {
        FormatArg::Bool(b)
    } else {
        FormatArg::Str(raw.to_string())
    }
}

/// List loaded languages with their entry counts.
///
/// # Errors
/// Returns an error if the config or the tree cannot be read.
pub fn langs(root: &Path, config: Option<&Path>) -> anyhow::Result<()> {
    let provider = load(root, config, None)?;
    if provider.is_empty() {
        println!("No languages found under {}", root.display());
        return Ok(());
    }

    println!("{} languages (default: {}):", provider.len(), provider.default_language());
    for language in &provider {
        let catalog = language.catalog();
        let name = match language.name() {
            "" => String::new(),
            name => format!(" ({name})"),
        };
        println!(
            "  {}{}: {} entries, {} contexts",
            language.code(),
            name,
            catalog.entries.len(),
            catalog.context.len()
        );
    }
    Ok(())
}

/// Print the formatted translation of `id`.
///
/// # Errors
/// Returns an error if the config or the tree cannot be read.
pub fn translate(
    root: &Path,
    lang: &str,
    default: Option<&str>,
    context: Option<&str>,
    config: Option<&Path>,
    id: &str,
    args: &[String],
) -> anyhow::Result<()> {
    let provider = load(root, config, default)?;
    let args: Vec<FormatArg> = args.iter().map(|raw| parse_arg(raw)).collect();

    let Some(language) = provider.l(lang) else {
        tracing::warn!(
            "Neither '{}' nor default '{}' is loaded",
            lang,
            provider.default_language()
        );
        println!("{}", provider.tl(lang, id, &args));
        return Ok(());
    };
    if language.code() != lang {
        tracing::info!("'{}' not loaded, using '{}'", lang, language.code());
    }

    let text = match context {
        Some(name) => language.ctx(name).t(id, &args),
        None => language.t(id, &args),
    };
    println!("{text}");
    Ok(())
}

/// Print one header field.
///
/// # Errors
/// Returns an error if the tree cannot be read or the language is missing.
pub fn meta(root: &Path, lang: &str, key: &str) -> anyhow::Result<()> {
    let provider = load(root, None, None)?;
    let Some(language) = provider.l(lang) else {
        anyhow::bail!("no catalog for '{lang}' under {}", root.display());
    };
    println!("{}", language.meta(key));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arg() {
        assert_eq!(parse_arg("42"), FormatArg::Int(42));
        assert_eq!(parse_arg("-7"), FormatArg::Int(-7));
        assert_eq!(parse_arg("18446744073709551615"), FormatArg::Uint(u64::MAX));
        assert_eq!(parse_arg("2.5"), FormatArg::Float(2.5));
        assert_eq!(parse_arg("true"), FormatArg::Bool(true));
        assert_eq!(parse_arg("Bob"), FormatArg::Str("Bob".to_string()));
    }

    #[test]
    fn test_meta_unknown_language() {
        let dir = tempfile::tempdir().unwrap();
        assert!(meta(dir.path(), "de", "Language-Name").is_err());
    }

    #[test]
    fn test_load_with_default_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("fr")).unwrap();
        std::fs::write(dir.path().join("fr/app.po"), "msgid \"a\"\nmsgstr \"b\"\n").unwrap();
        let provider = load(dir.path(), None, Some("fr")).unwrap();
        assert_eq!(provider.default_language(), "fr");
        assert_eq!(provider.l("xx").unwrap().code(), "fr");
    }
}
