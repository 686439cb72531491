//! Shared test fakes and utilities for the dicedr decision picker.

mod clock;
mod method;
mod rng;
mod storage;
mod translate;
mod visual;

pub use clock::FixedClock;
pub use method::InstrumentedMethod;
pub use rng::{MockRandom, SequenceRandom};
pub use storage::FailingStorage;
pub use translate::EchoTranslator;
pub use visual::RecordingVisual;
