//! Services that register, persist, encode and run methods.

pub mod registry;
pub mod run_controller;
pub mod share_codec;
pub mod state_store;
