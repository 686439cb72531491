//! Host configuration read from the environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::AppError;

/// Display languages shipped with the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Language {
    /// English.
    En,
    /// Turkish.
    Tr,
}

impl Language {
    /// The language code used for storage and dictionary lookup.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Tr => "tr",
        }
    }

    /// Guesses the language from a POSIX locale such as `tr_TR.UTF-8`.
    #[must_use]
    pub fn from_locale(locale: &str) -> Self {
        if locale.to_ascii_lowercase().starts_with("tr") {
            Self::Tr
        } else {
            Self::En
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "tr" => Ok(Self::Tr),
            other => Err(AppError::Config(format!("unsupported language \"{other}\""))),
        }
    }
}

/// Runtime configuration for the CLI host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the saved state, history and language.
    pub data_dir: PathBuf,
    /// Language forced through `DICEDR_LANG`.
    pub language: Option<Language>,
    /// The system locale from `LANG`, used when nothing else picks a language.
    pub locale: Option<String>,
    /// Whether the terminal visual waits for animation durations.
    pub animate: bool,
}

impl Config {
    /// Default data directory, relative to the working directory.
    pub const DEFAULT_DATA_DIR: &'static str = ".dicedr";

    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an unsupported value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an unsupported value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let data_dir = lookup("DICEDR_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_DATA_DIR.to_owned());
        let language = lookup("DICEDR_LANG")
            .filter(|lang| !lang.trim().is_empty())
            .map(|lang| lang.parse::<Language>())
            .transpose()?;
        let animate = match lookup("DICEDR_ANIMATE").as_deref().map(str::trim) {
            None | Some("" | "0" | "false") => false,
            Some("1" | "true") => true,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "DICEDR_ANIMATE must be true/false or 1/0, got \"{other}\""
                )));
            }
        };

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            language,
            locale: lookup("LANG"),
            animate,
        })
    }

    /// Picks the display language: the forced one, then the saved one, then
    /// the system locale. Unsupported saved values are ignored.
    #[must_use]
    pub fn resolve_language(&self, saved: Option<&str>) -> Language {
        self.language
            .or_else(|| saved.and_then(|code| code.parse().ok()))
            .unwrap_or_else(|| Language::from_locale(self.locale.as_deref().unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = config(&[]).unwrap();

        assert_eq!(config.data_dir, PathBuf::from(".dicedr"));
        assert_eq!(config.language, None);
        assert!(!config.animate);
    }

    #[test]
    fn test_reads_every_variable() {
        let config = config(&[
            ("DICEDR_DATA_DIR", "/tmp/picker"),
            ("DICEDR_LANG", "TR"),
            ("DICEDR_ANIMATE", "1"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/picker"));
        assert_eq!(config.language, Some(Language::Tr));
        assert!(config.animate);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        assert!(matches!(config(&[("DICEDR_LANG", "de")]), Err(AppError::Config(_))));
        assert!(matches!(
            config(&[("DICEDR_ANIMATE", "sometimes")]),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_language_precedence() {
        let forced = config(&[("DICEDR_LANG", "en"), ("LANG", "tr_TR.UTF-8")]).unwrap();
        let from_locale = config(&[("LANG", "tr_TR.UTF-8")]).unwrap();
        let nothing = config(&[]).unwrap();

        assert_eq!(forced.resolve_language(Some("tr")), Language::En);
        assert_eq!(from_locale.resolve_language(Some("en")), Language::En);
        assert_eq!(from_locale.resolve_language(Some("xx")), Language::Tr);
        assert_eq!(from_locale.resolve_language(None), Language::Tr);
        assert_eq!(nothing.resolve_language(None), Language::En);
    }
}
