//! Best-effort persistence of application state, history and language.
//!
//! Nothing here ever fails the caller: unreadable or malformed data falls
//! back to defaults and write failures are logged.

use std::sync::Arc;

use dicedr_core::storage::{HISTORY_KEY, KeyValueStorage, LANGUAGE_KEY, STATE_KEY};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, warn};

use crate::domain::app_state::AppState;
use crate::domain::history::History;

/// Persistence boundary over an injected key-value storage.
#[derive(Clone)]
pub struct StateStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl StateStore {
    /// Wraps `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Loads the saved state shallow-merged onto `default`. Missing or
    /// malformed data yields `default`.
    #[must_use]
    pub fn load(&self, default: &AppState) -> AppState {
        let Some(raw) = self.read(STATE_KEY) else {
            return default.clone();
        };
        shallow_merge(default, &raw).unwrap_or_else(|e| {
            warn!(error = %e, "discarding malformed saved state");
            default.clone()
        })
    }

    /// Saves `state`.
    pub fn save(&self, state: &AppState) {
        self.write(STATE_KEY, state);
    }

    /// Loads the saved history. Missing or malformed data yields an empty
    /// history; a single malformed entry discards the whole history.
    #[must_use]
    pub fn load_history(&self) -> History {
        let Some(raw) = self.read(HISTORY_KEY) else {
            return History::new();
        };
        match serde_json::from_str::<History>(&raw) {
            Ok(mut history) if history.entries().iter().all(|e| e.is_well_formed()) => {
                history.enforce_cap();
                history
            }
            Ok(_) => {
                warn!("discarding history with malformed entries");
                History::new()
            }
            Err(e) => {
                warn!(error = %e, "discarding malformed saved history");
                History::new()
            }
        }
    }

    /// Saves `history`.
    pub fn save_history(&self, history: &History) {
        self.write(HISTORY_KEY, history);
    }

    /// The saved display language, if any.
    #[must_use]
    pub fn load_language(&self) -> Option<String> {
        self.read(LANGUAGE_KEY).filter(|lang| !lang.trim().is_empty())
    }

    /// Saves the display language.
    pub fn save_language(&self, language: &str) {
        if let Err(e) = self.storage.set_item(LANGUAGE_KEY, language) {
            error!(error = %e, "failed to save language");
        }
    }

    /// Removes saved state and history. The language is kept.
    pub fn clear(&self) {
        for key in [STATE_KEY, HISTORY_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                error!(key, error = %e, "failed to remove saved data");
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(raw) => raw.filter(|raw| !raw.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "failed to read saved data");
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                error!(key, error = %e, "failed to serialize data for saving");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(key, &raw) {
            error!(key, error = %e, "failed to save data");
        }
    }
}

/// Overlays the top-level fields of `raw` onto `default`. Fields unknown to
/// `default` are dropped; nested values replace wholesale.
fn shallow_merge<T: Serialize + DeserializeOwned>(
    default: &T,
    raw: &str,
) -> Result<T, serde_json::Error> {
    let mut merged = serde_json::to_value(default)?;
    let saved: Value = serde_json::from_str(raw)?;
    if let (Value::Object(base), Value::Object(saved)) = (&mut merged, saved) {
        for (key, value) in saved {
            if base.contains_key(&key) {
                base.insert(key, value);
            }
        }
    }
    serde_json::from_value(merged)
}

#[cfg(test)]
mod tests {
    use dicedr_core::state::MethodState;
    use dicedr_core::storage::MemoryStorage;
    use dicedr_test_support::{FailingStorage, FixedClock};
    use serde_json::json;

    use super::*;
    use crate::domain::history::HistoryEntry;

    fn memory() -> (Arc<MemoryStorage>, StateStore) {
        let storage = Arc::new(MemoryStorage::new());
        (storage.clone(), StateStore::new(storage))
    }

    fn visited_state() -> AppState {
        let mut state = AppState::new("dice");
        state.method_states.insert(
            "dice".to_owned(),
            MethodState::new(json!({"preset": "d20", "min": 1, "max": 20}), json!({})),
        );
        state.method_states.insert(
            "wheel".to_owned(),
            MethodState::new(json!(["a", "b"]), json!({"noRepeat": true})),
        );
        state
    }

    #[test]
    fn test_save_then_load_returns_saved_state() {
        let (_, store) = memory();
        let state = visited_state();

        store.save(&state);

        assert_eq!(store.load(&AppState::new("wheel")), state);
    }

    #[test]
    fn test_load_without_saved_state_returns_default() {
        let (_, store) = memory();
        let default = AppState::new("wheel");

        assert_eq!(store.load(&default), default);
    }

    #[test]
    fn test_load_merges_partial_saved_state_onto_default() {
        let (storage, store) = memory();
        storage
            .set_item(STATE_KEY, r#"{"methodId": "coin", "language": "tr"}"#)
            .unwrap();
        let default = visited_state();

        let loaded = store.load(&default);

        assert_eq!(loaded.method_id, "coin");
        assert_eq!(loaded.method_states, default.method_states);
    }

    #[test]
    fn test_malformed_state_falls_back_to_default() {
        let (storage, store) = memory();
        let default = AppState::new("wheel");

        for raw in ["{oops", "[1, 2]", r#"{"methodId": 42}"#, "null"] {
            storage.set_item(STATE_KEY, raw).unwrap();
            assert_eq!(store.load(&default), default, "raw {raw:?}");
        }
    }

    #[test]
    fn test_history_round_trips() {
        let (_, store) = memory();
        let mut history = History::new();
        history.record(HistoryEntry::new("4", "dice", "Dice", "tok", FixedClock::standard().0));

        store.save_history(&history);

        assert_eq!(store.load_history(), history);
    }

    #[test]
    fn test_malformed_history_falls_back_to_empty() {
        let (storage, store) = memory();

        storage.set_item(HISTORY_KEY, "not json").unwrap();
        assert!(store.load_history().is_empty());

        storage
            .set_item(
                HISTORY_KEY,
                r#"[{"value": "", "methodId": "dice", "methodLabel": "Dice", "shareState": "t", "timestamp": 0}]"#,
            )
            .unwrap();
        assert!(store.load_history().is_empty());
    }

    #[test]
    fn test_oversized_saved_history_is_capped() {
        let (storage, store) = memory();
        let entries: Vec<Value> = (0..30)
            .map(|i| {
                json!({"value": i.to_string(), "methodId": "dice", "methodLabel": "Dice",
                       "shareState": "t", "timestamp": 0})
            })
            .collect();
        storage
            .set_item(HISTORY_KEY, &serde_json::to_string(&entries).unwrap())
            .unwrap();

        assert_eq!(store.load_history().len(), 20);
    }

    #[test]
    fn test_failing_storage_never_propagates() {
        let store = StateStore::new(Arc::new(FailingStorage));
        let default = AppState::new("wheel");

        store.save(&visited_state());
        store.save_history(&History::new());
        store.save_language("tr");
        store.clear();

        assert_eq!(store.load(&default), default);
        assert!(store.load_history().is_empty());
        assert_eq!(store.load_language(), None);
    }

    #[test]
    fn test_language_round_trips_and_survives_clear() {
        let (_, store) = memory();

        store.save_language("tr");
        store.save(&visited_state());
        store.clear();

        assert_eq!(store.load_language().as_deref(), Some("tr"));
        assert_eq!(store.load(&AppState::new("wheel")), AppState::new("wheel"));
    }
}
