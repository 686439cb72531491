//! Random source abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests, a scripted implementation
//! is injected so that every outcome is reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::RandomError;

/// Abstraction over the platform's uniform random generator.
///
/// Implementors supply the two raw primitives; callers use the checked
/// [`uniform`](RandomSource::uniform) and [`int_range`](RandomSource::int_range).
pub trait RandomSource: Send {
    /// Generate an `i64` in `[min, max]` inclusive. Only called with `min <= max`.
    fn next_i64_inclusive(&mut self, min: i64, max: i64) -> i64;

    /// Generate an `f64` in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;

    /// Returns a value uniformly distributed in `[0.0, 1.0)`.
    fn uniform(&mut self) -> f64 {
        self.next_f64()
    }

    /// Returns an integer uniformly distributed over `max - min + 1` values.
    ///
    /// # Errors
    ///
    /// Returns `RandomError::InvalidArgument` if `min > max`.
    fn int_range(&mut self, min: i64, max: i64) -> Result<i64, RandomError> {
        if min > max {
            return Err(RandomError::InvalidArgument(format!(
                "int_range requires min <= max, got {min} > {max}"
            )));
        }
        Ok(self.next_i64_inclusive(min, max))
    }
}

/// Production random source backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct StdRandomSource {
    rng: StdRng,
}

impl StdRandomSource {
    /// Creates a source seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a reproducible source from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for StdRandomSource {
    fn next_i64_inclusive(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }

    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Picks a uniformly random index into a sequence of `len` elements.
///
/// # Errors
///
/// Returns `RandomError::InvalidArgument` if `len` is zero or the source
/// returns a value outside `[0, len - 1]`.
pub fn random_index(rng: &mut dyn RandomSource, len: usize) -> Result<usize, RandomError> {
    if len == 0 {
        return Err(RandomError::InvalidArgument(
            "cannot pick an index from an empty sequence".to_owned(),
        ));
    }
    let last = i64::try_from(len - 1)
        .map_err(|_| RandomError::InvalidArgument(format!("sequence too long: {len}")))?;
    let picked = rng.int_range(0, last)?;
    if !(0..=last).contains(&picked) {
        return Err(RandomError::InvalidArgument(format!(
            "random source returned {picked}, outside [0, {last}]"
        )));
    }
    usize::try_from(picked).map_err(|_| RandomError::InvalidArgument(format!("bad index {picked}")))
}

/// Draws `count` elements, each independently uniform over `items`.
///
/// # Errors
///
/// Returns `RandomError::InvalidArgument` if `items` is empty and `count > 0`.
pub fn sample_with_replacement<T: Clone>(
    rng: &mut dyn RandomSource,
    items: &[T],
    count: usize,
) -> Result<Vec<T>, RandomError> {
    (0..count)
        .map(|_| random_index(rng, items.len()).map(|index| items[index].clone()))
        .collect()
}

/// Returns a uniformly random permutation of `items` (Fisher–Yates).
///
/// The argument is never mutated.
///
/// # Errors
///
/// Propagates errors from the random source.
pub fn shuffled<T: Clone>(rng: &mut dyn RandomSource, items: &[T]) -> Result<Vec<T>, RandomError> {
    let mut copy = items.to_vec();
    for i in (1..copy.len()).rev() {
        let j = random_index(rng, i + 1)?;
        copy.swap(i, j);
    }
    Ok(copy)
}

/// Draws `min(count, items.len())` distinct positions of `items`.
///
/// # Errors
///
/// Propagates errors from the random source.
pub fn sample_without_replacement<T: Clone>(
    rng: &mut dyn RandomSource,
    items: &[T],
    count: usize,
) -> Result<Vec<T>, RandomError> {
    let mut picks = shuffled(rng, items)?;
    picks.truncate(count);
    Ok(picks)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_int_range_rejects_inverted_bounds() {
        let mut rng = StdRandomSource::seeded(7);

        let result = rng.int_range(6, 1);

        assert!(matches!(result, Err(RandomError::InvalidArgument(_))));
    }

    #[test]
    fn test_int_range_stays_within_inclusive_bounds() {
        let mut rng = StdRandomSource::seeded(11);
        let mut seen = HashSet::new();

        for _ in 0..600 {
            let value = rng.int_range(1, 6).unwrap();
            assert!((1..=6).contains(&value));
            seen.insert(value);
        }

        assert_eq!(seen.len(), 6, "every face should appear in 600 rolls");
    }

    #[test]
    fn test_int_range_with_equal_bounds_returns_that_value() {
        let mut rng = StdRandomSource::seeded(3);
        assert_eq!(rng.int_range(-4, -4).unwrap(), -4);
    }

    #[test]
    fn test_uniform_is_in_unit_interval() {
        let mut rng = StdRandomSource::seeded(5);
        for _ in 0..1000 {
            let value = rng.uniform();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_sample_with_replacement_from_empty_input_fails() {
        let mut rng = StdRandomSource::seeded(1);
        let empty: Vec<String> = Vec::new();

        let result = sample_with_replacement(&mut rng, &empty, 2);

        assert!(result.is_err());
    }

    #[test]
    fn test_sample_with_replacement_of_zero_from_empty_input_is_empty() {
        let mut rng = StdRandomSource::seeded(1);
        let empty: Vec<String> = Vec::new();

        let result = sample_with_replacement(&mut rng, &empty, 0).unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn test_sample_with_replacement_returns_requested_length() {
        let mut rng = StdRandomSource::seeded(9);
        let items = ["a", "b"];

        let picks = sample_with_replacement(&mut rng, &items, 7).unwrap();

        assert_eq!(picks.len(), 7);
        assert!(picks.iter().all(|p| items.contains(p)));
    }

    #[test]
    fn test_sample_without_replacement_returns_distinct_members() {
        let mut rng = StdRandomSource::seeded(42);
        let items: Vec<String> = (0..10).map(|i| format!("item-{i}")).collect();

        for k in 0..=items.len() {
            let picks = sample_without_replacement(&mut rng, &items, k).unwrap();
            let distinct: HashSet<&String> = picks.iter().collect();
            assert_eq!(picks.len(), k);
            assert_eq!(distinct.len(), k);
            assert!(picks.iter().all(|p| items.contains(p)));
        }
    }

    #[test]
    fn test_sample_without_replacement_caps_at_input_length() {
        let mut rng = StdRandomSource::seeded(2);
        let items = vec![1, 2, 3];

        let picks = sample_without_replacement(&mut rng, &items, 10).unwrap();

        assert_eq!(picks.len(), 3);
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_random_index_of_empty_sequence_fails() {
        let mut rng = StdRandomSource::seeded(2);
        assert!(random_index(&mut rng, 0).is_err());
    }

    struct OutOfRange;

    impl RandomSource for OutOfRange {
        fn next_i64_inclusive(&mut self, _min: i64, max: i64) -> i64 {
            max.saturating_add(1)
        }

        fn next_f64(&mut self) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_random_index_rejects_out_of_range_draw() {
        let result = random_index(&mut OutOfRange, 3);

        assert!(matches!(result, Err(RandomError::InvalidArgument(_))));
    }
}
