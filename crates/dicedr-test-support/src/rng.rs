//! Test RNGs: deterministic `RandomSource` implementations for tests.

use dicedr_core::rng::RandomSource;

/// Always returns `min` from ranges and `0.0` from `uniform`. Suitable for
/// tests that do not depend on specific random values.
#[derive(Debug, Default)]
pub struct MockRandom;

impl RandomSource for MockRandom {
    fn next_i64_inclusive(&mut self, min: i64, _max: i64) -> i64 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// Returns values from predetermined sequences. Integer draws and float draws
/// are scripted separately.
///
/// # Panics
///
/// Panics when a draw is requested from an exhausted sequence, so a test that
/// consumes more randomness than it scripted fails loudly.
#[derive(Debug, Default)]
pub struct SequenceRandom {
    ints: Vec<i64>,
    floats: Vec<f64>,
    int_index: usize,
    float_index: usize,
}

impl SequenceRandom {
    /// Scripts the integer draws.
    #[must_use]
    pub fn new(ints: Vec<i64>) -> Self {
        Self {
            ints,
            ..Self::default()
        }
    }

    /// Scripts the float draws.
    #[must_use]
    pub fn with_floats(mut self, floats: Vec<f64>) -> Self {
        self.floats = floats;
        self
    }

    /// Number of integer draws consumed so far.
    #[must_use]
    pub fn int_draws(&self) -> usize {
        self.int_index
    }
}

impl RandomSource for SequenceRandom {
    fn next_i64_inclusive(&mut self, _min: i64, _max: i64) -> i64 {
        let val = self.ints[self.int_index];
        self.int_index += 1;
        val
    }

    fn next_f64(&mut self) -> f64 {
        let val = self.floats[self.float_index];
        self.float_index += 1;
        val
    }
}
