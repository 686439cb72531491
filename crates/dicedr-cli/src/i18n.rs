//! Embedded dictionaries.

use dicedr_core::translate::DictionaryTranslator;

use crate::config::Language;

const EN: &str = include_str!("../i18n/en.json");
const TR: &str = include_str!("../i18n/tr.json");

/// A translator with every shipped dictionary loaded and `language` active.
#[must_use]
pub fn translator(language: Language) -> DictionaryTranslator {
    DictionaryTranslator::new(language.code())
        .with_json_dictionary(Language::En.code(), EN)
        .with_json_dictionary(Language::Tr.code(), TR)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use dicedr_core::translate::Translate;

    use super::*;

    #[test]
    fn test_dictionaries_share_the_same_keys() {
        let en: HashMap<String, String> = serde_json::from_str(EN).unwrap();
        let tr: HashMap<String, String> = serde_json::from_str(TR).unwrap();

        let mut en_keys: Vec<_> = en.keys().collect();
        let mut tr_keys: Vec<_> = tr.keys().collect();
        en_keys.sort();
        tr_keys.sort();
        assert_eq!(en_keys, tr_keys);
    }

    #[test]
    fn test_every_method_key_is_translated() {
        let translate = translator(Language::Tr);

        for method in dicedr_methods::default_methods() {
            assert_ne!(translate.translate(method.title_key()), method.title_key());
            assert_ne!(translate.translate(method.subtitle_key()), method.subtitle_key());
        }
        assert_eq!(translate.translate("coin.labelA"), "Yazı");
    }
}
