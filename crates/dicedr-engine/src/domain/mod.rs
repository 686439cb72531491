//! Persisted value types.

pub mod app_state;
pub mod history;
