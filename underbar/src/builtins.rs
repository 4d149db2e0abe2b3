//! Aggregation algorithms over any collection shape.
//!
//! Every function here is built on the iteration engine ([`each_ref`]); none
//! of them walks a collection on its own. Callbacks receive `(value, key)`
//! and any error they return is passed straight back to the caller.

use crate::break_handling::{proceed, stop};
use crate::collections::{field, to_record, Dict, Key};
use crate::error::{Error, Result};
use crate::function::{Function, Iteratee};
use crate::iteration::each_ref;
use crate::operations::{expect_list, natural_order};
use crate::utilities::RandomSource;
use crate::value::Value;
use std::cmp::Ordering;

fn call(func: &Function, value: &Value, key: &Key) -> Result<Value> {
    func.call(&[value.clone(), key.to_value()])
}

// ============================================================================
// Transformation Functions
// ============================================================================

/// `map(collection, mapper)` → List | Dictionary
///
/// Apply `mapper(value, key)` to every pair. Never short-circuits.
///
/// - List: map([1, 2, 3], x * 3) → [3, 6, 9]
/// - Dictionary/Record: keys carry over, map({one: 1, two: 2}, x * 3) → #{one: 3, two: 6}
pub fn map(collection: &Value, mapper: &Function) -> Result<Value> {
    if let Value::List(_) = collection {
        let mut mapped = im::Vector::new();
        each_ref(collection, |value, key| {
            mapped.push_back(call(mapper, value, key)?);
            Ok(proceed())
        })?;
        return Ok(Value::List(mapped));
    }

    let mut mapped = Dict::new();
    each_ref(collection, |value, key| {
        mapped.insert(key.clone(), call(mapper, value, key)?);
        Ok(proceed())
    })?;
    Ok(Value::Dict(mapped))
}

/// `filter(collection, predicate)` → Dictionary
///
/// Keep pairs whose predicate result is truthy. Source keys are kept, so a
/// filtered list is sparse:
///
/// - filter([1, 2, 3, 4], is_even) → #{1: 2, 3: 4}
pub fn filter(collection: &Value, predicate: &Function) -> Result<Value> {
    filter_pairs(collection, |value, key| Ok(call(predicate, value, key)?.is_truthy()))
}

/// `reject(collection, predicate)` → Dictionary
///
/// `filter` with the predicate inverted.
pub fn reject(collection: &Value, predicate: &Function) -> Result<Value> {
    filter_pairs(collection, |value, key| Ok(!call(predicate, value, key)?.is_truthy()))
}

pub(crate) fn filter_pairs<P>(collection: &Value, mut keep: P) -> Result<Value>
where
    P: FnMut(&Value, &Key) -> Result<bool>,
{
    let mut kept = Dict::new();
    each_ref(collection, |value, key| {
        if keep(value, key)? {
            kept.insert(key.clone(), value.clone());
        }
        Ok(proceed())
    })?;
    Ok(Value::Dict(kept))
}

/// `invoke(collection, function, extra...)` → List | Dictionary
///
/// `map` calling `function(value, extra...)` for every value.
pub fn invoke(collection: &Value, function: &Function, extra: &[Value]) -> Result<Value> {
    let extra = extra.to_vec();
    let function = function.clone();
    let mapper = Function::named("invoke", move |args| {
        let mut call_args = Vec::with_capacity(extra.len() + 1);
        call_args.push(args.first().cloned().unwrap_or(Value::Nil));
        call_args.extend(extra.iter().cloned());
        function.call(&call_args)
    });
    map(collection, &mapper)
}

/// `pluck(collection, name)` → List | Dictionary
///
/// Fetch one field from every element; missing fields read as nil.
pub fn pluck(collection: &Value, name: impl Into<Key>) -> Result<Value> {
    let name = name.into();
    let project = Function::named("pluck", move |args| {
        Ok(args
            .first()
            .and_then(|value| field(value, &name))
            .cloned()
            .unwrap_or(Value::Nil))
    });
    map(collection, &project)
}

/// `to_array(collection)` → Value
///
/// Lists and dictionaries as-is, records as a dictionary of their fields,
/// anything else as an empty dictionary.
pub fn to_array(value: &Value) -> Value {
    match value {
        Value::List(_) | Value::Dict(_) => value.clone(),
        _ => Value::Dict(to_record(value).into_owned()),
    }
}

// ============================================================================
// Reduction Functions
// ============================================================================

/// `reduce(collection, reducer, memo?)` → Value
///
/// Left fold calling `reducer(memo, value, key)`. Without a seed the first
/// value becomes the seed and folding starts at the second pair. Nil folds
/// as an empty collection.
///
/// - reduce([1, 2, 3], +) → 6
/// - reduce([1, 2, 3], *, 4) → 24
/// - reduce([], +) → EmptyReduction
pub fn reduce(collection: &Value, reducer: &Function, memo: Option<Value>) -> Result<Value> {
    if collection.is_nil() {
        return memo.ok_or(Error::EmptyReduction);
    }

    let mut acc = memo;
    each_ref(collection, |value, key| {
        acc = Some(match acc.take() {
            Some(memo) => reducer.call(&[memo, value.clone(), key.to_value()])?,
            None => value.clone(),
        });
        Ok(proceed())
    })?;
    acc.ok_or(Error::EmptyReduction)
}

/// `reduce_right(collection, reducer, memo?)` → Value
///
/// Materializes the collection, reverses it, then delegates to [`reduce`].
/// A reversed list is re-indexed; dictionaries and records keep their keys.
/// Values with no pairs of their own fold as empty.
pub fn reduce_right(collection: &Value, reducer: &Function, memo: Option<Value>) -> Result<Value> {
    let reversed = match collection {
        Value::List(list) => Value::List(list.iter().rev().cloned().collect()),
        other => Value::Dict(
            to_record(other)
                .iter()
                .rev()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
    };
    reduce(&reversed, reducer, memo)
}

// ============================================================================
// Search Functions
// ============================================================================

/// `find(collection, predicate)` → Option<Value>
///
/// First value passing the predicate, or `None`. Stops at the first match.
pub fn find(collection: &Value, predicate: &Function) -> Result<Option<Value>> {
    find_pair(collection, |value, key| Ok(call(predicate, value, key)?.is_truthy()))
}

fn find_pair<P>(collection: &Value, mut test: P) -> Result<Option<Value>>
where
    P: FnMut(&Value, &Key) -> Result<bool>,
{
    let mut found = None;
    some_pair(collection, |value, key| {
        if test(value, key)? {
            found = Some(value.clone());
            return Ok(true);
        }
        Ok(false)
    })?;
    Ok(found)
}

/// `every(collection, predicate?)` → Boolean
///
/// Stops at the first failure. Without a predicate, tests truthiness.
///
/// - every([]) → true
pub fn every(collection: &Value, predicate: Option<&Function>) -> Result<bool> {
    let mut result = true;
    each_ref(collection, |value, key| {
        if !truth_test(predicate, value, key)? {
            result = false;
            return Ok(stop());
        }
        Ok(proceed())
    })?;
    Ok(result)
}

/// `some(collection, predicate?)` → Boolean
///
/// Stops at the first success. Without a predicate, tests truthiness.
///
/// - some([]) → false
pub fn some(collection: &Value, predicate: Option<&Function>) -> Result<bool> {
    some_pair(collection, |value, key| truth_test(predicate, value, key))
}

fn some_pair<P>(collection: &Value, mut test: P) -> Result<bool>
where
    P: FnMut(&Value, &Key) -> Result<bool>,
{
    let mut result = false;
    each_ref(collection, |value, key| {
        if test(value, key)? {
            result = true;
            return Ok(stop());
        }
        Ok(proceed())
    })?;
    Ok(result)
}

fn truth_test(predicate: Option<&Function>, value: &Value, key: &Key) -> Result<bool> {
    match predicate {
        Some(predicate) => Ok(call(predicate, value, key)?.is_truthy()),
        None => Ok(value.is_truthy()),
    }
}

/// `contains(collection, target)` → Boolean
///
/// Strict equality, stopping at the first hit.
pub fn contains(collection: &Value, target: &Value) -> Result<bool> {
    some_pair(collection, |value, _| Ok(value == target))
}

/// `where_(collection, attrs)` → Dictionary
///
/// Keep elements whose fields strictly equal every attr. A field holding nil
/// never matches. Empty attrs match nothing.
pub fn where_(collection: &Value, attrs: &Value) -> Result<Value> {
    let attrs = to_record(attrs);
    if attrs.is_empty() {
        return Ok(Value::Dict(Dict::new()));
    }
    filter_pairs(collection, |value, _| Ok(matches_attrs(value, &attrs)))
}

/// `find_where(collection, attrs)` → Option<Value>
///
/// First element matching every attr. Empty attrs match nothing.
pub fn find_where(collection: &Value, attrs: &Value) -> Result<Option<Value>> {
    let attrs = to_record(attrs);
    if attrs.is_empty() {
        return Ok(None);
    }
    find_pair(collection, |value, _| Ok(matches_attrs(value, &attrs)))
}

fn matches_attrs(value: &Value, attrs: &Dict) -> bool {
    attrs.iter().all(|(name, expected)| {
        field(value, name).is_some_and(|actual| !actual.is_nil() && actual == expected)
    })
}

// ============================================================================
// Aggregation Functions
// ============================================================================

/// `max(collection, projection?)` → Value
///
/// Largest element, or the element with the largest `projection(value, key)`.
/// The first element wins ties. Empty collections give -INF.
///
/// - max([1, 3, 2]) → 3
/// - max([]) → -INF
pub fn max(collection: &Value, projection: Option<&Function>) -> Result<Value> {
    extreme(collection, projection, Ordering::Greater, f64::NEG_INFINITY)
}

/// `min(collection, projection?)` → Value
///
/// Smallest element, or the element with the smallest `projection(value, key)`.
/// The first element wins ties. Empty collections give INF.
pub fn min(collection: &Value, projection: Option<&Function>) -> Result<Value> {
    extreme(collection, projection, Ordering::Less, f64::INFINITY)
}

fn extreme(
    collection: &Value,
    projection: Option<&Function>,
    wanted: Ordering,
    empty: f64,
) -> Result<Value> {
    // (criterion, element)
    let mut best: Option<(Value, Value)> = None;
    each_ref(collection, |value, key| {
        let computed = match projection {
            Some(projection) => call(projection, value, key)?,
            None => value.clone(),
        };
        let replace = match &best {
            None => true,
            Some((current, _)) => natural_order(&computed, current) == wanted,
        };
        if replace {
            best = Some((computed, value.clone()));
        }
        Ok(proceed())
    })?;
    Ok(best.map_or(Value::Decimal(empty), |(_, value)| value))
}

/// `group_by(collection, criterion?)` → Dictionary
///
/// Group values into lists keyed by criterion. Groups appear in first-seen
/// order; each list keeps visitation order. Without a criterion, values
/// group by themselves.
///
/// - group_by(["one", "two", "three"], length) → #{3: ["one", "two"], 5: ["three"]}
pub fn group_by(collection: &Value, criterion: Option<&Iteratee>) -> Result<Value> {
    group(collection, criterion, |groups, key, value| {
        if let Value::List(members) = groups.get_or_insert_with(key, || Value::List(im::Vector::new())) {
            members.push_back(value.clone());
        }
    })
}

/// `count_by(collection, criterion?)` → Dictionary
///
/// Like [`group_by`] but keeps a running count per group.
pub fn count_by(collection: &Value, criterion: Option<&Iteratee>) -> Result<Value> {
    group(collection, criterion, |groups, key, _| {
        if let Value::Integer(count) = groups.get_or_insert_with(key, || Value::Integer(0)) {
            *count += 1;
        }
    })
}

fn group<A>(collection: &Value, criterion: Option<&Iteratee>, mut action: A) -> Result<Value>
where
    A: FnMut(&mut Dict, Key, &Value),
{
    let mut groups = Dict::new();
    each_ref(collection, |value, key| {
        let computed = match criterion {
            Some(criterion) => criterion.apply(value, key)?,
            None => value.clone(),
        };
        action(&mut groups, Key::from_value(&computed)?, value);
        Ok(proceed())
    })?;
    Ok(Value::Dict(groups))
}

// ============================================================================
// Sorting
// ============================================================================

/// Transient sort-by wrapper; gives every element a unique position for tie-breaks.
struct SortEnvelope {
    value: Value,
    index: usize,
    criterion: Value,
}

/// `sort_by(collection, criterion?)` → List
///
/// A list with no criterion is sorted naturally. Everything else is sorted by
/// projected criterion ascending, with ties (equal criteria) broken by
/// original visitation order.
///
/// - sort_by([2, 5, 3, 1, 4]) → [1, 2, 3, 4, 5]
/// - sort_by([2, 5, 3, 1, 4], -x) → [5, 4, 3, 2, 1]
pub fn sort_by(collection: &Value, criterion: Option<&Iteratee>) -> Result<Value> {
    if let (Value::List(list), None) = (collection, criterion) {
        let mut items: Vec<Value> = list.iter().cloned().collect();
        items.sort_by(natural_order);
        return Ok(Value::List(items.into_iter().collect()));
    }

    let mut envelopes: Vec<SortEnvelope> = Vec::new();
    each_ref(collection, |value, key| {
        let criterion = match criterion {
            Some(criterion) => criterion.apply(value, key)?,
            None => value.clone(),
        };
        envelopes.push(SortEnvelope {
            value: value.clone(),
            index: envelopes.len(),
            criterion,
        });
        Ok(proceed())
    })?;

    envelopes.sort_by(|left, right| {
        natural_order(&left.criterion, &right.criterion).then(left.index.cmp(&right.index))
    });
    Ok(Value::List(envelopes.into_iter().map(|e| e.value).collect()))
}

/// `sort_with(list, comparator)` → List
///
/// Stable merge sort driven by `comparator(left, right)`, which returns a
/// number (sign gives the order) or a boolean (`true` puts `left` after
/// `right`). Comparator errors abort the sort and are returned as-is.
pub fn sort_with(list: &Value, comparator: &Function) -> Result<Value> {
    let items: Vec<Value> = expect_list("sort_with", list)?.iter().cloned().collect();
    let sorted = merge_sort(items, &mut |left, right| {
        let result = comparator.call(&[left.clone(), right.clone()])?;
        Ok(match result {
            Value::Boolean(true) => Ordering::Greater,
            Value::Boolean(false) => Ordering::Less,
            Value::Integer(i) => i.cmp(&0),
            Value::Decimal(d) => d.partial_cmp(&0.0).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        })
    })?;
    Ok(Value::List(sorted.into_iter().collect()))
}

type Comparator<'a> = dyn FnMut(&Value, &Value) -> Result<Ordering> + 'a;

fn merge_sort(mut items: Vec<Value>, compare: &mut Comparator<'_>) -> Result<Vec<Value>> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare)?;
    let right = merge_sort(right, compare)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        if compare(l, r)? == Ordering::Greater {
            merged.extend(right.next());
        } else {
            merged.extend(left.next());
        }
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}

/// `sorted_index(list, value, criterion?)` → Integer
///
/// Binary search for the lowest index at which `value` could be inserted
/// while keeping `list` sorted (equal elements insert before existing ones).
/// The criterion, if any, projects both the sought value and the elements.
///
/// - sorted_index([10, 20, 30, 40, 50], 35) → 3
pub fn sorted_index(list: &Value, value: &Value, criterion: Option<&Iteratee>) -> Result<usize> {
    let list = expect_list("sorted_index", list)?;
    let project = |v: &Value| match criterion {
        Some(criterion) => criterion.apply_value(v),
        None => Ok(v.clone()),
    };

    let target = project(value)?;
    let (mut low, mut high) = (0, list.len());
    while low < high {
        let mid = low + (high - low) / 2;
        if natural_order(&project(&list[mid])?, &target) == Ordering::Less {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    Ok(low)
}

// ============================================================================
// Randomness
// ============================================================================

/// `shuffle(collection)` → List
///
/// Inside-out Fisher-Yates over any collection shape.
pub fn shuffle(collection: &Value, rng: &mut dyn RandomSource) -> Result<Value> {
    let mut shuffled: Vec<Value> = Vec::new();
    each_ref(collection, |value, _| {
        let index = shuffled.len();
        let slot = usize::try_from(rng.random(0, index as i64))
            .unwrap_or(0)
            .min(index);
        if slot == index {
            shuffled.push(value.clone());
        } else {
            let displaced = std::mem::replace(&mut shuffled[slot], value.clone());
            shuffled.push(displaced);
        }
        Ok(proceed())
    })?;
    Ok(Value::List(shuffled.into_iter().collect()))
}
