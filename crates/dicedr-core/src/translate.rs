//! Translation collaborator.
//!
//! Methods and the engine only ever see opaque keys; resolving them to
//! display text is the host's concern.

use std::collections::HashMap;

/// Language used when a key is missing from the active dictionary.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Resolves a localization key to display text.
///
/// Implementations never fail: an unresolved key is returned unchanged.
pub trait Translate: Send + Sync {
    /// Returns the localized text for `key`.
    fn translate(&self, key: &str) -> String;
}

/// Dictionary-backed translator with fallback to English, then to the key.
#[derive(Debug, Clone, Default)]
pub struct DictionaryTranslator {
    language: String,
    dictionaries: HashMap<String, HashMap<String, String>>,
}

impl DictionaryTranslator {
    /// Creates a translator with no dictionaries loaded.
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            dictionaries: HashMap::new(),
        }
    }

    /// Adds (or replaces) the dictionary for `language`.
    #[must_use]
    pub fn with_dictionary(
        mut self,
        language: impl Into<String>,
        entries: HashMap<String, String>,
    ) -> Self {
        self.dictionaries.insert(language.into(), entries);
        self
    }

    /// Parses a flat JSON object and adds it as the dictionary for `language`.
    /// Malformed JSON yields an empty dictionary.
    #[must_use]
    pub fn with_json_dictionary(self, language: impl Into<String>, json: &str) -> Self {
        let language = language.into();
        let entries = serde_json::from_str::<HashMap<String, String>>(json).unwrap_or_else(|e| {
            tracing::warn!(%language, error = %e, "ignoring malformed dictionary");
            HashMap::new()
        });
        self.with_dictionary(language, entries)
    }

    /// The active language code.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Switches the active language. Unknown languages fall back per key.
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    fn lookup(&self, language: &str, key: &str) -> Option<&String> {
        self.dictionaries
            .get(language)
            .and_then(|entries| entries.get(key))
            .filter(|text| !text.is_empty())
    }
}

impl Translate for DictionaryTranslator {
    fn translate(&self, key: &str) -> String {
        self.lookup(&self.language, key)
            .or_else(|| self.lookup(FALLBACK_LANGUAGE, key))
            .cloned()
            .unwrap_or_else(|| key.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator(language: &str) -> DictionaryTranslator {
        DictionaryTranslator::new(language)
            .with_json_dictionary("en", r#"{"coin.labelA": "Heads", "only.en": "English"}"#)
            .with_json_dictionary("tr", r#"{"coin.labelA": "Yazı"}"#)
    }

    #[test]
    fn test_translate_uses_active_language() {
        assert_eq!(translator("tr").translate("coin.labelA"), "Yazı");
    }

    #[test]
    fn test_translate_falls_back_to_english() {
        assert_eq!(translator("tr").translate("only.en"), "English");
    }

    #[test]
    fn test_translate_falls_back_to_key() {
        assert_eq!(translator("en").translate("missing.key"), "missing.key");
    }

    #[test]
    fn test_malformed_dictionary_is_ignored() {
        let t = DictionaryTranslator::new("en").with_json_dictionary("en", "{not json");
        assert_eq!(t.translate("coin.labelA"), "coin.labelA");
    }

    #[test]
    fn test_set_language_switches_lookups() {
        let mut t = translator("en");
        t.set_language("tr");
        assert_eq!(t.language(), "tr");
        assert_eq!(t.translate("coin.labelA"), "Yazı");
    }
}
