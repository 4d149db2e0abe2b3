//! Input fixtures shared by the collection benchmarks.

use underbar::{Function, RandomSource, Record, StdRandom, Value};

/// `[0, 1, ..., n - 1]`
pub fn integers(n: usize) -> Value {
    Value::list((0..n as i64).map(Value::Integer))
}

/// Seed for every generated fixture, so runs compare like with like.
pub const SEED: u64 = 0x5EED;

/// `n` pseudo-random integers in `[0, 1000)`, same sequence every run.
pub fn scrambled(n: usize) -> Value {
    let mut rng = StdRandom::seeded(SEED);
    Value::list((0..n).map(|_| Value::Integer(rng.random(0, 999))))
}

/// `n` records shaped `{id, group, score}`.
pub fn people(n: usize) -> Value {
    Value::list((0..n as i64).map(|i| {
        Value::Record(
            Record::new()
                .with("id", i)
                .with("group", i % 7)
                .with("score", (i * 37) % 101),
        )
    }))
}

pub fn double() -> Function {
    Function::named("double", |args| {
        Ok(Value::Integer(args.first().and_then(Value::as_integer).unwrap_or(0) * 2))
    })
}

pub fn modulo(divisor: i64) -> Function {
    Function::named("modulo", move |args| {
        Ok(Value::Integer(args.first().and_then(Value::as_integer).unwrap_or(0) % divisor))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrambled_is_repeatable_and_bounded() {
        let first = scrambled(500);
        assert_eq!(first, scrambled(500));

        let items = first.as_list().cloned().unwrap_or_default();
        assert_eq!(items.len(), 500);
        assert!(items
            .iter()
            .all(|v| v.as_integer().is_some_and(|n| (0..1000).contains(&n))));
    }
}
