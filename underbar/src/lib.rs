pub mod error;
pub mod value;
pub mod collections;
pub mod operations;
pub mod function;
pub mod break_handling;
pub mod iteration;
pub mod builtins;
pub mod arrays;
pub mod objects;
pub mod combinators;
pub mod utilities;
pub mod config;

pub use break_handling::{proceed, stop, Stop, Visit};
pub use collections::{classify, pairs, to_record, Dict, Key, Record, Shape};
pub use config::{Config, Toolkit};
pub use error::{Error, Result};
pub use function::{Function, Iteratee};
pub use iteration::{each, each_ref};
pub use utilities::{RandomSource, StdRandom, UniqueIds};
pub use value::Value;
