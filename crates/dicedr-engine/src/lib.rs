//! Dicedr engine: registry, persistence and run orchestration.
//!
//! The [`application::run_controller::RunController`] is the single authority
//! for executing a method and turning its outcome into persisted state,
//! a share token and a history entry.

pub mod application;
pub mod domain;
pub mod error;
