use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use eyre::{Result, WrapErr, bail};
use serde::{Deserialize, Serialize};

/// Key → localized value for one language.
pub type Dictionary = BTreeMap<String, String>;

/// Translations bundled with the binary.
pub const BUNDLED_TRANSLATIONS: &str = include_str!("../assets/translations.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default = "default_language_code")]
    default: String,
    languages: BTreeMap<String, Dictionary>,
}

fn default_language_code() -> String {
    "en".to_string()
}

/// Static, read-only mapping of language code → dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationStore {
    default_language: String,
    dictionaries: BTreeMap<String, Dictionary>,
}

impl LocalizationStore {
    pub fn new(
        default_language: impl Into<String>,
        dictionaries: BTreeMap<String, Dictionary>,
    ) -> Result<Self> {
        let default_language = default_language.into();
        if !dictionaries.contains_key(&default_language) {
            bail!("no dictionary for default language `{default_language}`");
        }
        Ok(Self {
            default_language,
            dictionaries,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: StoreFile =
            serde_json::from_str(json).wrap_err("failed to parse translations")?;
        Self::new(file.default, file.languages)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read translations from {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_TRANSLATIONS)
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn contains_language(&self, code: &str) -> bool {
        self.dictionaries.contains_key(code)
    }

    /// Dictionary for `code`, or the default dictionary when `code` is unknown.
    /// The returned code is the one actually resolved.
    pub fn resolve(&self, code: &str) -> (&str, &Dictionary) {
        match self.dictionaries.get_key_value(code) {
            Some((resolved, dictionary)) => (resolved.as_str(), dictionary),
            None => (
                self.default_language.as_str(),
                &self.dictionaries[&self.default_language],
            ),
        }
    }

    pub fn get(&self, code: &str, key: &str) -> Option<&str> {
        self.resolve(code).1.get(key).map(String::as_str)
    }

    /// Keys present for the default language but absent for `code`.
    pub fn missing_keys(&self, code: &str) -> Vec<&str> {
        let Some(dictionary) = self.dictionaries.get(code) else {
            return Vec::new();
        };
        self.dictionaries[&self.default_language]
            .keys()
            .filter(|key| !dictionary.contains_key(*key))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "default": "en",
        "languages": {
            "en": { "toc-label": "Table of Contents", "cover-title": "Lessons & Carols" },
            "ko": { "toc-label": "목차" }
        }
    }"#;

    #[test]
    fn test_from_json() {
        let store = LocalizationStore::from_json(SAMPLE).unwrap();
        assert_eq!(store.default_language(), "en");
        assert!(store.contains_language("ko"));
        assert_eq!(store.get("ko", "toc-label"), Some("목차"));
    }

    #[test]
    fn test_missing_default_dictionary_rejected() {
        let json = r#"{ "default": "fr", "languages": { "en": {} } }"#;
        assert!(LocalizationStore::from_json(json).is_err());
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        let store = LocalizationStore::from_json(SAMPLE).unwrap();
        let (code, dictionary) = store.resolve("de");
        assert_eq!(code, "en");
        assert_eq!(dictionary.get("cover-title").map(String::as_str), Some("Lessons & Carols"));
    }

    #[test]
    fn test_partial_language_does_not_fall_back_per_key() {
        let store = LocalizationStore::from_json(SAMPLE).unwrap();
        assert_eq!(store.get("ko", "cover-title"), None);
        assert_eq!(store.missing_keys("ko"), vec!["cover-title"]);
        assert!(store.missing_keys("xx").is_empty());
    }

    #[test]
    fn test_bundled_translations_cover_every_language() {
        let store = LocalizationStore::bundled().unwrap();
        assert!(store.contains_language("en"));
        assert!(store.contains_language("ko"));
        assert!(store.missing_keys("ko").is_empty());
    }
}
