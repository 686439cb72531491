//! Helpers shared by the list-based methods (wheel, random list, slot).

use std::collections::HashSet;
use std::str::FromStr;

use dicedr_core::limits::{MAX_ITEMS, MIN_ITEMS};
use dicedr_core::state::MethodState;
use dicedr_core::translate::Translate;
use dicedr_core::validation::ValidationResult;
use thiserror::Error;

/// Splits multi-line text into trimmed, non-empty options.
#[must_use]
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Removes duplicates, keeping the first occurrence of each option.
#[must_use]
pub fn unique(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.as_str()))
        .cloned()
        .collect()
}

/// Trims options, drops blanks and caps the list at the editor limit.
#[must_use]
pub fn normalize<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.as_ref().trim())
        .filter(|item| !item.is_empty())
        .take(MAX_ITEMS)
        .map(str::to_owned)
        .collect()
}

/// Options that are not blank after trimming.
fn usable_count(items: &[String]) -> usize {
    items.iter().filter(|item| !item.trim().is_empty()).count()
}

/// Validation shared by every list-based method: at least two options that
/// are not blank after trimming.
#[must_use]
pub fn validate_options(state: &MethodState, translate: &dyn Translate) -> ValidationResult {
    match state.inputs_as::<Vec<String>>() {
        Ok(items) if usable_count(&items) >= MIN_ITEMS => ValidationResult::success(),
        Ok(_) => ValidationResult::failure(translate.translate("inputs.empty")),
        Err(_) => ValidationResult::failure(translate.translate("inputs.invalid")),
    }
}

/// Ready-made option lists offered by the list editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleSet {
    /// Things to eat.
    Food,
    /// Film genres.
    Movie,
    /// Things to do.
    Activity,
    /// Household chores.
    Chores,
}

impl ExampleSet {
    /// The options in this set.
    #[must_use]
    pub fn items(self) -> Vec<String> {
        let items: &[&str] = match self {
            Self::Food => &["Pizza", "Sushi", "Burgers", "Salad", "Tacos"],
            Self::Movie => &["Comedy", "Drama", "Action", "Sci-fi", "Animation"],
            Self::Activity => &["Walk", "Game night", "Cafe", "Beach", "Museum"],
            Self::Chores => &["Dishes", "Vacuum", "Laundry", "Trash", "Plants"],
        };
        items.iter().map(|&item| item.to_owned()).collect()
    }
}

/// The requested example set does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown example set: {0}")]
pub struct UnknownExampleSet(pub String);

impl FromStr for ExampleSet {
    type Err = UnknownExampleSet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food" => Ok(Self::Food),
            "movie" => Ok(Self::Movie),
            "activity" => Ok(Self::Activity),
            "chores" => Ok(Self::Chores),
            other => Err(UnknownExampleSet(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use dicedr_test_support::EchoTranslator;
    use serde_json::json;

    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn test_parse_lines_trims_and_drops_blank_lines() {
        assert_eq!(parse_lines("  a  \n\n b\n   \nc"), strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_unique_keeps_first_occurrence_order() {
        let items = strings(&["b", "a", "b", "c", "a"]);
        assert_eq!(unique(&items), strings(&["b", "a", "c"]));
    }

    #[test]
    fn test_normalize_caps_at_editor_limit() {
        let items: Vec<String> = (0..150).map(|i| format!("option {i}")).collect();

        let normalized = normalize(&items);

        assert_eq!(normalized.len(), MAX_ITEMS);
        assert_eq!(normalized[0], "option 0");
    }

    #[test]
    fn test_validate_options_requires_two_items() {
        let t = EchoTranslator;

        for items in [json!([]), json!(["only"])] {
            let state = MethodState::new(items, json!({}));
            let result = validate_options(&state, &t);
            assert!(!result.is_ok());
            assert_eq!(result.message(), "inputs.empty");
        }

        let state = MethodState::new(json!(["a", "b"]), json!({}));
        assert!(validate_options(&state, &t).is_ok());
    }

    #[test]
    fn test_validate_options_ignores_blank_options() {
        let t = EchoTranslator;

        for items in [json!(["", ""]), json!(["  ", "a", "\t"])] {
            let state = MethodState::new(items, json!({}));
            let result = validate_options(&state, &t);
            assert!(!result.is_ok());
            assert_eq!(result.message(), "inputs.empty");
        }

        let state = MethodState::new(json!(["a", " ", "b"]), json!({}));
        assert!(validate_options(&state, &t).is_ok());
    }

    #[test]
    fn test_validate_options_rejects_wrong_shape() {
        let state = MethodState::new(json!({"min": 1}), json!({}));

        let result = validate_options(&state, &EchoTranslator);

        assert_eq!(result.message(), "inputs.invalid");
    }

    #[test]
    fn test_example_sets_parse_by_name() {
        assert_eq!("chores".parse::<ExampleSet>(), Ok(ExampleSet::Chores));
        assert_eq!(ExampleSet::Food.items().len(), 5);
        assert!("snacks".parse::<ExampleSet>().is_err());
    }
}
