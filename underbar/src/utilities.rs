//! Utility functions and the explicit state some of them need.

use crate::error::Result;
use crate::function::Function;
use crate::value::Value;
use rand::rngs::StdRng;
use rand::{Rng as RandRng, SeedableRng};

/// `identity(value)` → value
pub fn identity(value: Value) -> Value {
    value
}

/// `times(n, function)` → List
///
/// Call `function(i)` for `i` in `0..n`, collecting the results.
pub fn times(n: usize, function: &Function) -> Result<Value> {
    let mut results = im::Vector::new();
    for i in 0..n {
        results.push_back(function.call(&[Value::from(i)])?);
    }
    Ok(Value::List(results))
}

// ============================================================================
// Random numbers
// ============================================================================

/// Source of uniform random integers.
pub trait RandomSource {
    /// Random integer in `[min, max]`, inclusive at both ends.
    /// Returns `min` when `min > max`.
    fn random(&mut self, min: i64, max: i64) -> i64;
}

/// `rand`-backed [`RandomSource`].
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        StdRandom {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        StdRandom {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for StdRandom {
    fn random(&mut self, min: i64, max: i64) -> i64 {
        if min > max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// `random(min, max?)` → Integer
///
/// With one bound, draws from `[0, min]`.
pub fn random(rng: &mut dyn RandomSource, min: i64, max: Option<i64>) -> i64 {
    match max {
        Some(max) => rng.random(min, max),
        None => rng.random(0, min),
    }
}

// ============================================================================
// Unique ids
// ============================================================================

/// Counter handing out ids unique for its own lifetime.
#[derive(Debug, Clone)]
pub struct UniqueIds {
    start: u64,
    last: u64,
}

impl UniqueIds {
    /// The first id issued will be `start + 1`.
    pub fn new(start: u64) -> Self {
        UniqueIds { start, last: start }
    }

    /// `unique_id(prefix?)` → Integer | String
    pub fn next(&mut self, prefix: Option<&str>) -> Value {
        self.last += 1;
        match prefix {
            Some(prefix) => Value::from(format!("{}{}", prefix, self.last)),
            None => Value::Integer(self.last as i64),
        }
    }

    /// Start over from the configured starting point.
    pub fn reset(&mut self) {
        self.last = self.start;
    }
}

impl Default for UniqueIds {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_random_is_deterministic() {
        let mut a = StdRandom::seeded(42);
        let mut b = StdRandom::seeded(42);
        let xs: Vec<i64> = (0..10).map(|_| a.random(0, 100)).collect();
        let ys: Vec<i64> = (0..10).map(|_| b.random(0, 100)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn random_stays_in_inclusive_bounds() {
        let mut rng = StdRandom::seeded(7);
        for _ in 0..200 {
            let n = random(&mut rng, 3, Some(5));
            assert!((3..=5).contains(&n), "{} out of range", n);
        }
        for _ in 0..200 {
            let n = random(&mut rng, 4, None);
            assert!((0..=4).contains(&n));
        }
    }

    #[test]
    fn inverted_bounds_return_min() {
        let mut rng = StdRandom::seeded(1);
        assert_eq!(rng.random(9, 2), 9);
    }

    #[test]
    fn unique_ids_count_and_reset() {
        let mut ids = UniqueIds::default();
        assert_eq!(ids.next(None), Value::Integer(1));
        assert_eq!(ids.next(Some("item_")), Value::from("item_2"));
        ids.reset();
        assert_eq!(ids.next(None), Value::Integer(1));
    }

    #[test]
    fn times_collects_results() {
        let double = Function::new(|args| Ok(Value::Integer(args[0].as_integer().unwrap_or(0) * 2)));
        assert_eq!(times(3, &double).unwrap(), Value::list([0, 2, 4]));
    }
}
