//! Dicedr Core: shared abstractions.
//!
//! This crate defines the method contract every randomization method
//! implements, together with the collaborators the engine depends on
//! (randomness, time, key-value storage, translation). It contains no host
//! code.

pub mod clock;
pub mod completion;
pub mod error;
pub mod limits;
pub mod method;
pub mod rng;
pub mod state;
pub mod storage;
pub mod translate;
pub mod validation;
pub mod visual;
