//! Application state: the active method and every visited method's state.

use std::collections::BTreeMap;

use dicedr_core::state::MethodState;
use serde::{Deserialize, Serialize};

/// Persisted application state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// The currently active method.
    pub method_id: String,
    /// State per method id, one entry per ever-visited method.
    pub method_states: BTreeMap<String, MethodState>,
}

impl AppState {
    /// Fresh state with `method_id` active and no method states yet.
    #[must_use]
    pub fn new(method_id: impl Into<String>) -> Self {
        Self {
            method_id: method_id.into(),
            method_states: BTreeMap::new(),
        }
    }

    /// The stored state for `method_id`, if any.
    #[must_use]
    pub fn method_state(&self, method_id: &str) -> Option<&MethodState> {
        self.method_states.get(method_id)
    }
}
