use crate::error::{Error, Result};
use crate::value::Value;
use std::cmp::Ordering;

/// Get a human-readable type name for a Value (for error messages)
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Nil => "Nil",
        Value::Boolean(_) => "Boolean",
        Value::Integer(_) => "Integer",
        Value::Decimal(_) => "Decimal",
        Value::String(_) => "String",
        Value::List(_) => "List",
        Value::Dict(_) => "Dictionary",
        Value::Record(_) => "Record",
        Value::Function(_) => "Function",
    }
}

/// Require a Sequential value, naming the operation in the error.
pub fn expect_list<'a>(op: &str, value: &'a Value) -> Result<&'a im::Vector<Value>> {
    value.as_list().ok_or_else(|| {
        Error::invalid_input(format!("{op} expects a List, got {}", type_name(value)))
    })
}

/// Compare two values for ordering.
/// Returns Some(Ordering) for comparable values, None for incomparable.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Some(x.cmp(y)),
        (Value::Decimal(_), _) | (_, Value::Decimal(_)) if a.is_number() && b.is_number() => {
            let (x, y) = (a.as_number()?, b.as_number()?);
            x.partial_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Boolean(x), Value::Boolean(y)) => Some(x.cmp(y)),
        (Value::Nil, Value::Nil) => Some(Ordering::Equal),
        (Value::List(x), Value::List(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                match compare_values(l, r)? {
                    Ordering::Equal => continue,
                    other => return Some(other),
                }
            }
            Some(x.len().cmp(&y.len()))
        }
        _ => None,
    }
}

/// Total ordering used by every natural sort and by min/max.
///
/// Comparable values use [`compare_values`] (NaN sorts via `total_cmp`);
/// values of different kinds order by kind:
/// Nil < Boolean < Number < String < List < Dictionary < Record < Function.
pub fn natural_order(a: &Value, b: &Value) -> Ordering {
    if let Some(order) = compare_values(a, b) {
        return order;
    }
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        return x.total_cmp(&y);
    }
    if let (Value::List(x), Value::List(y)) = (a, b) {
        for (l, r) in x.iter().zip(y.iter()) {
            match natural_order(l, r) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        return x.len().cmp(&y.len());
    }
    kind_rank(a).cmp(&kind_rank(b))
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Nil => 0,
        Value::Boolean(_) => 1,
        Value::Integer(_) | Value::Decimal(_) => 2,
        Value::String(_) => 3,
        Value::List(_) => 4,
        Value::Dict(_) => 5,
        Value::Record(_) => 6,
        Value::Function(_) => 7,
    }
}

/// Loose equality: numbers compare across integer/decimal, collections
/// compare element-wise loosely; everything else falls back to strict `==`.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(l, r)| loose_eq(l, r))
        }
        (Value::Dict(x), Value::Dict(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| loose_eq(v, w)))
        }
        (Value::Record(x), Value::Record(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| loose_eq(v, w)))
        }
        _ if a.is_number() && b.is_number() => a.as_number() == b.as_number(),
        _ => a == b,
    }
}
