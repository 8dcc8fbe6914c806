//! Language-code resolution for parsed files

use std::path::{Component, Path};

use unic_langid::LanguageIdentifier;

use crate::formats::po::{Catalog, LANGUAGE_CODE};

/// Check whether `tag` is a well-formed language identifier (`en`, `pt-BR`,
/// `zh_Hant_TW`, ...).
///
/// Matching is case-insensitive (`EN`, `De-AT`). The language subtag must
/// be two or three letters and variant subtags are not accepted, so the
/// gettext directory `LC_MESSAGES` (language `lc`, variant `messages`) and
/// long words such as `messages` are not taken for a language.
#[must_use]
pub fn is_valid_language_tag(tag: &str) -> bool {
    let language = tag.split(['-', '_']).next().unwrap_or_default();
    if !(2..=3).contains(&language.len())
        || !language.bytes().all(|b| b.is_ascii_alphabetic())
        || !tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return false;
    }
    tag.parse::<LanguageIdentifier>()
        .is_ok_and(|id| id.variants().next().is_none())
}

/// Work out which language a parsed file belongs to.
///
/// The `Language-Code` header wins. Otherwise the directories containing
/// the file are tried from the innermost outwards, and the first name that
/// is a valid language tag is used. Returns `""` when nothing matches.
#[must_use]
pub fn resolve_language_code(path: &Path, catalog: &Catalog) -> String {
    resolve_language_code_with(path, catalog, is_valid_language_tag)
}

/// [`resolve_language_code`] with a custom tag validator.
#[must_use]
pub fn resolve_language_code_with<F>(path: &Path, catalog: &Catalog, is_valid: F) -> String
where
    F: Fn(&str) -> bool,
{
    let code = catalog.metadata.get(LANGUAGE_CODE);
    if !code.is_empty() {
        return code.to_string();
    }

    let Some(parent) = path.parent() else {
        return String::new();
    };
    parent
        .components()
        .rev()
        .filter_map(|component| match component {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .find(|segment| is_valid(segment))
        .map(str::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_code(code: &str) -> Catalog {
        let mut catalog = Catalog::new();
        catalog.metadata.set(LANGUAGE_CODE, code);
        catalog
    }

    #[test]
    fn test_valid_tags() {
        assert!(is_valid_language_tag("en"));
        assert!(is_valid_language_tag("pt-BR"));
        assert!(is_valid_language_tag("en_US"));
        assert!(is_valid_language_tag("zh-Hant-TW"));
        assert!(!is_valid_language_tag(""));
        assert!(!is_valid_language_tag("i18n"));
        assert!(!is_valid_language_tag("translations"));
        assert!(!is_valid_language_tag("app.po"));
        assert!(!is_valid_language_tag("e"));
        assert!(!is_valid_language_tag("LC_MESSAGES"));
        assert!(!is_valid_language_tag("messages"));
        assert!(!is_valid_language_tag("lc_messages"));
        assert!(!is_valid_language_tag("en-"));
    }

    #[test]
    fn test_tags_match_case_insensitively() {
        assert!(is_valid_language_tag("EN"));
        assert!(is_valid_language_tag("De-AT"));
        assert!(is_valid_language_tag("PT_br"));
        assert!(!is_valid_language_tag("LC_Messages"));

        let code = resolve_language_code(Path::new("locale/De-AT/LC_MESSAGES/app.po"), &Catalog::new());
        assert_eq!(code, "De-AT");
    }

    #[test]
    fn test_header_wins_over_path() {
        let code = resolve_language_code(Path::new("i18n/de/app.po"), &with_code("fr"));
        assert_eq!(code, "fr");
    }

    #[test]
    fn test_innermost_directory_first() {
        let code = resolve_language_code(Path::new("i18n/de/pt-BR/app.po"), &Catalog::new());
        assert_eq!(code, "pt-BR");
    }

    #[test]
    fn test_walks_up_past_invalid_segments() {
        let code = resolve_language_code(Path::new("locale/de/LC_MESSAGES/app.po"), &Catalog::new());
        assert_eq!(code, "de");
    }

    #[test]
    fn test_file_name_is_not_a_candidate() {
        let code = resolve_language_code(Path::new("i18n/en.po"), &Catalog::new());
        assert_eq!(code, "");
        assert_eq!(resolve_language_code(Path::new("en"), &Catalog::new()), "");
    }

    #[test]
    fn test_custom_validator() {
        let code = resolve_language_code_with(
            Path::new("i18n/klingon/app.po"),
            &Catalog::new(),
            |s| s == "klingon",
        );
        assert_eq!(code, "klingon");
    }
}
