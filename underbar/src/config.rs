//! Toolkit configuration and the stateful helpers it builds.

use crate::builtins;
use crate::error::Result;
use crate::utilities::{self, RandomSource, StdRandom, UniqueIds};
use crate::value::Value;
use tracing::warn;

const SEED_VAR: &str = "UNDERBAR_SEED";
const ID_START_VAR: &str = "UNDERBAR_ID_START";

/// Settings for a [`Toolkit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Fixed seed for random numbers and shuffling; entropy when unset.
    pub seed: Option<u64>,
    /// Unique ids start counting after this value.
    pub id_start: u64,
}

impl Config {
    /// Read `UNDERBAR_SEED` and `UNDERBAR_ID_START`.
    ///
    /// Unset variables keep their defaults; unparseable ones are ignored
    /// with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(seed) = parse_var(&lookup, SEED_VAR) {
            config.seed = Some(seed);
        }
        if let Some(start) = parse_var(&lookup, ID_START_VAR) {
            config.id_start = start;
        }
        config
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(variable = name, value = %raw, %err, "ignoring unparseable setting");
            None
        }
    }
}

/// Owner of the state that random numbers and unique ids need.
pub struct Toolkit {
    rng: Box<dyn RandomSource>,
    ids: UniqueIds,
}

impl Toolkit {
    pub fn new(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRandom::seeded(seed),
            None => StdRandom::from_entropy(),
        };
        Toolkit {
            rng: Box::new(rng),
            ids: UniqueIds::new(config.id_start),
        }
    }

    /// Use a caller-supplied random source instead of `rand`.
    pub fn with_random_source(config: Config, rng: Box<dyn RandomSource>) -> Self {
        Toolkit {
            rng,
            ids: UniqueIds::new(config.id_start),
        }
    }

    pub fn random(&mut self, min: i64, max: Option<i64>) -> i64 {
        utilities::random(self.rng.as_mut(), min, max)
    }

    pub fn shuffle(&mut self, collection: &Value) -> Result<Value> {
        builtins::shuffle(collection, self.rng.as_mut())
    }

    pub fn unique_id(&mut self, prefix: Option<&str>) -> Value {
        self.ids.next(prefix)
    }

    pub fn reset_ids(&mut self) {
        self.ids.reset();
    }
}

impl Default for Toolkit {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
