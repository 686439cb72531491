//! Per-method persisted state.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MethodError;

/// Configuration and options for one method.
///
/// Opaque to the engine apart from two reserved keys: `inputs` (the option
/// set, whose shape each method defines) and `settings`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodState(Map<String, Value>);

impl MethodState {
    /// Reserved key holding the raw option set.
    pub const INPUTS: &'static str = "inputs";
    /// Reserved key holding method-specific configuration.
    pub const SETTINGS: &'static str = "settings";

    /// Builds a state from already-encoded inputs and settings.
    #[must_use]
    pub fn new(inputs: Value, settings: Value) -> Self {
        let mut map = Map::new();
        map.insert(Self::INPUTS.to_owned(), inputs);
        map.insert(Self::SETTINGS.to_owned(), settings);
        Self(map)
    }

    /// Builds a state from typed inputs and settings.
    ///
    /// # Panics
    ///
    /// Panics if either part fails to serialize, which cannot happen for the
    /// plain data structs methods use.
    #[must_use]
    pub fn from_parts<I: Serialize, S: Serialize>(inputs: &I, settings: &S) -> Self {
        // Serialization of derived Serialize types to Value is infallible.
        Self::new(
            serde_json::to_value(inputs).expect("method inputs serialize to JSON"),
            serde_json::to_value(settings).expect("method settings serialize to JSON"),
        )
    }

    /// The raw `inputs` value, if present.
    #[must_use]
    pub fn inputs(&self) -> Option<&Value> {
        self.0.get(Self::INPUTS)
    }

    /// The raw `settings` value, if present.
    #[must_use]
    pub fn settings(&self) -> Option<&Value> {
        self.0.get(Self::SETTINGS)
    }

    /// Decodes `inputs` into the method's typed view.
    ///
    /// # Errors
    ///
    /// Returns `MethodError::MalformedState` if `inputs` is missing or has the
    /// wrong shape.
    pub fn inputs_as<T: DeserializeOwned>(&self) -> Result<T, MethodError> {
        let raw = self
            .inputs()
            .ok_or_else(|| MethodError::MalformedState("missing inputs".to_owned()))?;
        T::deserialize(raw).map_err(|e| MethodError::MalformedState(format!("inputs: {e}")))
    }

    /// Decodes `settings` into the method's typed view. A missing `settings`
    /// entry decodes as the default.
    ///
    /// # Errors
    ///
    /// Returns `MethodError::MalformedState` if `settings` has the wrong shape.
    pub fn settings_as<T: DeserializeOwned + Default>(&self) -> Result<T, MethodError> {
        match self.settings() {
            None | Some(Value::Null) => Ok(T::default()),
            Some(raw) => {
                T::deserialize(raw)
                    .map_err(|e| MethodError::MalformedState(format!("settings: {e}")))
            }
        }
    }

    /// Returns a copy with `inputs` replaced.
    #[must_use]
    pub fn with_inputs(&self, inputs: Value) -> Self {
        let mut next = self.clone();
        next.0.insert(Self::INPUTS.to_owned(), inputs);
        next
    }

    /// Shallow merge: every top-level key of `patch` replaces the same key here.
    pub fn merge(&mut self, patch: MethodState) {
        for (key, value) in patch.0 {
            self.0.insert(key, value);
        }
    }

    /// Borrow the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for MethodState {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Settings {
        #[serde(default)]
        no_repeat: bool,
    }

    #[test]
    fn test_merge_replaces_top_level_keys_only() {
        let mut state = MethodState::new(json!(["a", "b"]), json!({"count": 2, "noRepeat": true}));
        let patch = MethodState::from(
            json!({"settings": {"count": 3}})
                .as_object()
                .cloned()
                .unwrap(),
        );

        state.merge(patch);

        assert_eq!(state.inputs(), Some(&json!(["a", "b"])));
        assert_eq!(state.settings(), Some(&json!({"count": 3})));
    }

    #[test]
    fn test_inputs_as_reports_wrong_shape() {
        let state = MethodState::new(json!({"a": "x"}), json!({}));

        let result = state.inputs_as::<Vec<String>>();

        assert!(matches!(result, Err(MethodError::MalformedState(_))));
    }

    #[test]
    fn test_settings_as_defaults_when_missing() {
        let state = MethodState::from(Map::new());

        let settings: Settings = state.settings_as().unwrap();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let state = MethodState::new(json!(["x"]), json!({}));

        let value = serde_json::to_value(&state).unwrap();

        assert_eq!(value, json!({"inputs": ["x"], "settings": {}}));
    }
}
