//! Key/value helpers that work on any collection's record view.

use crate::break_handling::proceed;
use crate::collections::{field, size, to_record, Dict, Key};
use crate::error::Result;
use crate::function::Function;
use crate::iteration::each_ref;
use crate::operations::loose_eq;
use crate::value::Value;

/// `keys(collection)` → List
pub fn keys(collection: &Value) -> Result<Value> {
    let mut keys = im::Vector::new();
    each_ref(collection, |_, key| {
        keys.push_back(key.to_value());
        Ok(proceed())
    })?;
    Ok(Value::List(keys))
}

/// `values(collection)` → List
pub fn values(collection: &Value) -> Result<Value> {
    let mut values = im::Vector::new();
    each_ref(collection, |value, _| {
        values.push_back(value.clone());
        Ok(proceed())
    })?;
    Ok(Value::List(values))
}

/// `pairs(collection)` → List
///
/// - pairs({one: 1, two: 2}) → [["one", 1], ["two", 2]]
pub fn pairs(collection: &Value) -> Result<Value> {
    let mut pairs = im::Vector::new();
    each_ref(collection, |value, key| {
        pairs.push_back(Value::list([key.to_value(), value.clone()]));
        Ok(proceed())
    })?;
    Ok(Value::List(pairs))
}

/// `invert(collection)` → Dictionary
///
/// Values become keys and keys become values. When values repeat, the last
/// key wins. Values that cannot be keys are `InvalidInput`.
pub fn invert(collection: &Value) -> Result<Value> {
    let mut inverted = Dict::new();
    each_ref(collection, |value, key| {
        inverted.insert(Key::from_value(value)?, key.to_value());
        Ok(proceed())
    })?;
    Ok(Value::Dict(inverted))
}

// Records stay records; every other shape comes back as a dictionary.
fn rebuild(like: &Value, entries: Dict) -> Value {
    match like {
        Value::Record(_) => Value::Record(
            entries
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        ),
        _ => Value::Dict(entries),
    }
}

/// `pick(collection, keys)` → Record | Dictionary
///
/// Only the listed keys, in the order given. Missing keys are skipped.
pub fn pick(collection: &Value, keys: &[Key]) -> Value {
    let view = to_record(collection);
    let picked = keys
        .iter()
        .filter_map(|key| view.get(key).map(|value| (key.clone(), value.clone())))
        .collect();
    rebuild(collection, picked)
}

/// `omit(collection, keys)` → Record | Dictionary
pub fn omit(collection: &Value, keys: &[Key]) -> Value {
    let kept = to_record(collection)
        .iter()
        .filter(|(key, _)| !keys.contains(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    rebuild(collection, kept)
}

/// `defaults(collection, sources)` → Record | Dictionary
///
/// Fill in keys that `collection` lacks from each source in turn; keys
/// already present (even when nil) are left alone.
pub fn defaults(collection: &Value, sources: &[Value]) -> Value {
    let mut filled = to_record(collection).into_owned();
    for source in sources {
        for (key, value) in to_record(source).iter() {
            if !filled.contains_key(key) {
                filled.insert(key.clone(), value.clone());
            }
        }
    }
    rebuild(collection, filled)
}

/// `has(collection, key)` → Boolean
pub fn has(collection: &Value, key: &Key) -> bool {
    field(collection, key).is_some()
}

/// `tap(value, interceptor)` → value
///
/// Call `interceptor(value)` for its side effects, then hand `value` back.
pub fn tap(value: Value, interceptor: &Function) -> Result<Value> {
    interceptor.call(std::slice::from_ref(&value))?;
    Ok(value)
}

/// `is_empty(value)` → Boolean
///
/// Collections are empty when they hold no pairs; other values when falsy.
pub fn is_empty(value: &Value) -> bool {
    if value.is_collection() {
        return size(value) == 0;
    }
    !value.is_truthy()
}

/// `is_equal(a, b, strict)` → Boolean
///
/// Strict compares kind and content; loose also equates integers with equal
/// decimals, all the way down nested collections.
pub fn is_equal(a: &Value, b: &Value, strict: bool) -> bool {
    if strict {
        a == b
    } else {
        loose_eq(a, b)
    }
}

/// `result(collection, key)` → Value
///
/// The field's value, or the result of calling it with no arguments when it
/// holds a function. Missing fields give nil.
pub fn result(collection: &Value, key: &Key) -> Result<Value> {
    match field(collection, key) {
        Some(Value::Function(function)) => function.call(&[]),
        Some(value) => Ok(value.clone()),
        None => Ok(Value::Nil),
    }
}
