//! Functions over Sequential collections only.
//!
//! Passing anything but a list is `InvalidInput`. Results shaped like a
//! filter (`compact`, `uniq`, `difference`, `without`) keep the source
//! indexes and come back as a dictionary; results built by merging
//! (`union`, `intersection`, `flatten`, `zip`, `range`) are dense lists.

use crate::builtins::filter_pairs;
use crate::collections::Record;
use crate::error::{Error, Result};
use crate::operations::expect_list;
use crate::value::Value;
use std::collections::HashSet;

fn slice(list: &im::Vector<Value>, from: usize, to: usize) -> Value {
    let to = to.min(list.len());
    let from = from.min(to);
    Value::List(list.clone().slice(from..to))
}

/// `first(list, n?)` → Value | List
///
/// - first([5, 4, 3]) → 5
/// - first([5, 4, 3], 2) → [5, 4]
/// - first([]) → nil
pub fn first(list: &Value, n: Option<usize>) -> Result<Value> {
    let list = expect_list("first", list)?;
    Ok(match n {
        Some(n) => slice(list, 0, n),
        None => list.front().cloned().unwrap_or(Value::Nil),
    })
}

/// `initial(list, n?)` → List
///
/// Everything but the last `n` (default 1) elements.
pub fn initial(list: &Value, n: Option<usize>) -> Result<Value> {
    let list = expect_list("initial", list)?;
    let drop = n.unwrap_or(1);
    Ok(slice(list, 0, list.len().saturating_sub(drop)))
}

/// `last(list, n?)` → Value | List
///
/// - last([5, 4, 3]) → 3
/// - last([5, 4, 3], 2) → [4, 3]
pub fn last(list: &Value, n: Option<usize>) -> Result<Value> {
    let list = expect_list("last", list)?;
    Ok(match n {
        Some(n) => slice(list, list.len().saturating_sub(n), list.len()),
        None => list.back().cloned().unwrap_or(Value::Nil),
    })
}

/// `rest(list, n?)` → List
///
/// Everything but the first `n` (default 1) elements.
pub fn rest(list: &Value, n: Option<usize>) -> Result<Value> {
    let list = expect_list("rest", list)?;
    Ok(slice(list, n.unwrap_or(1), list.len()))
}

/// `compact(list)` → Dictionary
///
/// Drop falsy values, keeping the indexes of the survivors.
pub fn compact(list: &Value) -> Result<Value> {
    expect_list("compact", list)?;
    filter_pairs(list, |value, _| Ok(value.is_truthy()))
}

/// `flatten(list, shallow)` → List
///
/// Splice nested lists into one list, fully or just one level deep.
pub fn flatten(list: &Value, shallow: bool) -> Result<Value> {
    let list = expect_list("flatten", list)?;
    let mut output = im::Vector::new();
    flatten_into(list, shallow, &mut output);
    Ok(Value::List(output))
}

fn flatten_into(input: &im::Vector<Value>, shallow: bool, output: &mut im::Vector<Value>) {
    for value in input.iter() {
        match value {
            Value::List(nested) if shallow => output.append(nested.clone()),
            Value::List(nested) => flatten_into(nested, shallow, output),
            other => output.push_back(other.clone()),
        }
    }
}

/// `without(list, values)` → Dictionary
///
/// - without([1, 2, 1, 0, 3, 1, 4], [0, 1]) → #{1: 2, 4: 3, 6: 4}
pub fn without(list: &Value, values: &[Value]) -> Result<Value> {
    expect_list("without", list)?;
    let excluded: HashSet<&Value> = values.iter().collect();
    filter_pairs(list, |value, _| Ok(!excluded.contains(value)))
}

/// `uniq(list)` → Dictionary
///
/// First occurrence of every distinct value, at its original index.
pub fn uniq(list: &Value) -> Result<Value> {
    expect_list("uniq", list)?;
    let mut seen = HashSet::new();
    filter_pairs(list, |value, _| Ok(seen.insert(value.clone())))
}

/// `union(lists)` → List
///
/// Distinct values across all lists, in first-seen order.
pub fn union(lists: &[Value]) -> Result<Value> {
    let mut seen = HashSet::new();
    let mut output = im::Vector::new();
    for list in lists {
        for value in expect_list("union", list)?.iter() {
            if seen.insert(value.clone()) {
                output.push_back(value.clone());
            }
        }
    }
    Ok(Value::List(output))
}

/// `intersection(lists)` → List
///
/// Distinct values of the first list present in every other list.
pub fn intersection(lists: &[Value]) -> Result<Value> {
    let Some((head, others)) = lists.split_first() else {
        return Ok(Value::List(im::Vector::new()));
    };
    let others: Vec<HashSet<&Value>> = others
        .iter()
        .map(|other| Ok(expect_list("intersection", other)?.iter().collect()))
        .collect::<Result<_>>()?;

    let mut seen = HashSet::new();
    let mut output = im::Vector::new();
    for value in expect_list("intersection", head)?.iter() {
        if others.iter().all(|set| set.contains(value)) && seen.insert(value.clone()) {
            output.push_back(value.clone());
        }
    }
    Ok(Value::List(output))
}

/// `difference(list, others)` → Dictionary
///
/// Values of `list` found in none of `others`, at their original indexes.
pub fn difference(list: &Value, others: &[Value]) -> Result<Value> {
    expect_list("difference", list)?;
    let mut excluded = HashSet::new();
    for other in others {
        excluded.extend(expect_list("difference", other)?.iter());
    }
    filter_pairs(list, |value, _| Ok(!excluded.contains(value)))
}

/// `zip(lists)` → List
///
/// - zip([["moe", "larry"], [30, 40]]) → [["moe", 30], ["larry", 40]]
///
/// Shorter lists pad with nil.
pub fn zip(lists: &[Value]) -> Result<Value> {
    let lists: Vec<&im::Vector<Value>> = lists
        .iter()
        .map(|list| expect_list("zip", list))
        .collect::<Result<_>>()?;
    let length = lists.iter().map(|list| list.len()).max().unwrap_or(0);

    let zipped = (0..length)
        .map(|i| {
            Value::List(
                lists
                    .iter()
                    .map(|list| list.get(i).cloned().unwrap_or(Value::Nil))
                    .collect(),
            )
        })
        .collect();
    Ok(Value::List(zipped))
}

/// `object(list, values?)` → Record
///
/// Either a list of `[name, value]` pairs, or a list of names plus a
/// parallel list of values (missing values read as nil).
pub fn object(list: &Value, values: Option<&Value>) -> Result<Value> {
    let list = expect_list("object", list)?;
    let mut record = Record::new();

    match values {
        Some(values) => {
            let values = expect_list("object", values)?;
            for (i, name) in list.iter().enumerate() {
                record.set(name.to_string(), values.get(i).cloned().unwrap_or(Value::Nil));
            }
        }
        None => {
            for pair in list.iter() {
                let pair = expect_list("object", pair)?;
                let name = pair.front().ok_or_else(|| {
                    Error::invalid_input("object expects [name, value] pairs, got an empty list")
                })?;
                record.set(name.to_string(), pair.get(1).cloned().unwrap_or(Value::Nil));
            }
        }
    }
    Ok(Value::Record(record))
}

/// `index_of(list, item)` → Option<Integer>
pub fn index_of(list: &Value, item: &Value) -> Result<Option<usize>> {
    Ok(expect_list("index_of", list)?.index_of(item))
}

/// `last_index_of(list, item, from?)` → Option<Integer>
///
/// Search backwards; with `from`, only indexes below `from` are considered.
pub fn last_index_of(list: &Value, item: &Value, from: Option<usize>) -> Result<Option<usize>> {
    let list = expect_list("last_index_of", list)?;
    let end = from.unwrap_or(list.len()).min(list.len());
    Ok((0..end).rev().find(|&i| &list[i] == item))
}

/// `range(start, stop?, step)` → List
///
/// - range(5, None, 1) → [0, 1, 2, 3, 4]
/// - range(0, Some(30), 5) → [0, 5, 10, 15, 20, 25]
/// - range(0, Some(-5), -1) → [0, -1, -2, -3, -4]
pub fn range(start: i64, stop: Option<i64>, step: i64) -> Result<Value> {
    if step == 0 {
        return Err(Error::invalid_input("range step cannot be zero"));
    }
    let (start, stop) = match stop {
        Some(stop) => (start, stop),
        None => (0, start),
    };

    let mut output = im::Vector::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        output.push_back(Value::Integer(current));
        current = match current.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(Value::List(output))
}
