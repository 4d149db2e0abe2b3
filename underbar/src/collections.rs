//! Collection shapes and the normalizer.
//!
//! Any [`Value`] classifies into a [`Shape`]. The three enumerable shapes
//! expose a uniform `(Key, &Value)` view through [`pairs`], and any value can
//! be materialized as a key/value mapping with [`to_record`].

use crate::error::{Error, Result};
use crate::operations::type_name;
use crate::value::Value;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

// ============================================================================
// Keys
// ============================================================================

/// Position of a value inside a collection: a dense index for lists, an
/// arbitrary index or label for dictionaries, a field label for records.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Index(i64),
    Label(Rc<str>),
}

impl Key {
    pub fn label(name: &str) -> Self {
        Key::Label(name.into())
    }

    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            Key::Label(name) => Some(name),
            Key::Index(_) => None,
        }
    }

    /// The key as a value, for handing to caller-supplied functions.
    pub fn to_value(&self) -> Value {
        match self {
            Key::Index(i) => Value::Integer(*i),
            Key::Label(name) => Value::String(name.clone()),
        }
    }

    /// Coerce a computed value into a key.
    ///
    /// - Integer: `Index`
    /// - Boolean: `Index(0)` / `Index(1)`
    /// - Decimal: truncated `Index`
    /// - String: `Label`
    /// - Nil: empty `Label`
    ///
    /// Collections and functions cannot be keys.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(Key::Index(*i)),
            Value::Boolean(b) => Ok(Key::Index(i64::from(*b))),
            Value::Decimal(d) if d.is_finite() => Ok(Key::Index(d.trunc() as i64)),
            Value::String(s) => Ok(Key::Label(s.clone())),
            Value::Nil => Ok(Key::Label("".into())),
            other => Err(Error::invalid_input(format!(
                "{} cannot be used as a key",
                type_name(other)
            ))),
        }
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Index(i)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i as i64)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Label(name.into())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Label(name.into())
    }
}

impl From<Rc<str>> for Key {
    fn from(name: Rc<str>) -> Self {
        Key::Label(name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Label(name) => write!(f, "{}", name),
        }
    }
}

// ============================================================================
// Dict (LabelledIterable)
// ============================================================================

/// Insertion-ordered key/value container.
///
/// Overwriting an existing key keeps its original position; removal shifts
/// later entries down so the remaining order is unchanged.
#[derive(Clone, Debug, Default)]
pub struct Dict {
    entries: IndexMap<Key, Value>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<Key>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Get the value for `key`, inserting `default()` first if absent.
    pub fn get_or_insert_with(&mut self, key: Key, default: impl FnOnce() -> Value) -> &mut Value {
        self.entries.entry(key).or_insert_with(default)
    }

    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, Value> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, Key, Value> {
        self.entries.values()
    }
}

// Order-sensitive: two dicts are equal only when they hold the same pairs in
// the same order.
impl PartialEq for Dict {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((k1, v1), (k2, v2))| k1 == k2 && v1 == v2)
    }
}

impl Eq for Dict {}

impl Hash for Dict {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (key, value) in self.iter() {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: Into<Key>> FromIterator<(K, Value)> for Dict {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Dict {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dict {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Record (plain named fields)
// ============================================================================

/// A flat set of named fields in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Record {
    fields: IndexMap<Rc<str>, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<Rc<str>>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    /// Builder-style `set`.
    pub fn with(mut self, name: impl Into<Rc<str>>, value: impl Into<Value>) -> Self {
        self.set(name, value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Rc<str>, Value> {
        self.fields.iter()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((k1, v1), (k2, v2))| k1 == k2 && v1 == v2)
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (name, value) in self.iter() {
            name.hash(state);
            value.hash(state);
        }
    }
}

impl<N: Into<Rc<str>>> FromIterator<(N, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (N, Value)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }
}

// ============================================================================
// Normalizer
// ============================================================================

/// Which collection variant a value classifies as.
///
/// `Scalar` covers everything with no pairs of its own (numbers, strings,
/// nil, functions). It behaves as an empty record for [`to_record`] and is
/// rejected by the iteration engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Sequential,
    LabelledIterable,
    Record,
    Scalar,
}

/// Classify a value. Never fails.
pub fn classify(value: &Value) -> Shape {
    match value {
        Value::List(_) => Shape::Sequential,
        Value::Dict(_) => Shape::LabelledIterable,
        Value::Record(_) => Shape::Record,
        _ => Shape::Scalar,
    }
}

/// Borrowed `(Key, &Value)` view over one of the three enumerable shapes.
pub enum Pairs<'a> {
    Sequential(std::iter::Enumerate<im::vector::Iter<'a, Value>>),
    LabelledIterable(indexmap::map::Iter<'a, Key, Value>),
    Record(indexmap::map::Iter<'a, Rc<str>, Value>),
}

impl<'a> Iterator for Pairs<'a> {
    type Item = (Key, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Pairs::Sequential(iter) => iter.next().map(|(i, v)| (Key::Index(i as i64), v)),
            Pairs::LabelledIterable(iter) => iter.next().map(|(k, v)| (k.clone(), v)),
            Pairs::Record(iter) => iter.next().map(|(k, v)| (Key::Label(k.clone()), v)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Pairs::Sequential(iter) => iter.size_hint(),
            Pairs::LabelledIterable(iter) => iter.size_hint(),
            Pairs::Record(iter) => iter.size_hint(),
        }
    }
}

impl DoubleEndedIterator for Pairs<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match self {
            Pairs::Sequential(iter) => iter.next_back().map(|(i, v)| (Key::Index(i as i64), v)),
            Pairs::LabelledIterable(iter) => iter.next_back().map(|(k, v)| (k.clone(), v)),
            Pairs::Record(iter) => iter.next_back().map(|(k, v)| (Key::Label(k.clone()), v)),
        }
    }
}

impl ExactSizeIterator for Pairs<'_> {}

/// Ordered pairs of an enumerable value.
///
/// Fails with `InvalidInput` for scalars.
pub fn pairs(value: &Value) -> Result<Pairs<'_>> {
    match value {
        Value::List(list) => Ok(Pairs::Sequential(list.iter().enumerate())),
        Value::Dict(dict) => Ok(Pairs::LabelledIterable(dict.iter())),
        Value::Record(record) => Ok(Pairs::Record(record.iter())),
        other => Err(Error::invalid_input(format!(
            "each requires a List, Dictionary, or Record, got {}",
            type_name(other)
        ))),
    }
}

/// Key/value view of any value.
///
/// - Dict: the same dict, borrowed
/// - List: snapshot keyed by index
/// - Record: snapshot keyed by field name
/// - anything else: an empty mapping
pub fn to_record(value: &Value) -> Cow<'_, Dict> {
    match value {
        Value::Dict(dict) => Cow::Borrowed(dict),
        Value::List(list) => Cow::Owned(
            list.iter()
                .enumerate()
                .map(|(i, v)| (Key::Index(i as i64), v.clone()))
                .collect(),
        ),
        Value::Record(record) => Cow::Owned(
            record
                .iter()
                .map(|(name, v)| (Key::Label(name.clone()), v.clone()))
                .collect(),
        ),
        _ => Cow::Owned(Dict::new()),
    }
}

/// `to_record(value)[key]` without materializing the snapshot.
pub fn field<'a>(value: &'a Value, key: &Key) -> Option<&'a Value> {
    match (value, key) {
        (Value::List(list), Key::Index(i)) => usize::try_from(*i).ok().and_then(|i| list.get(i)),
        (Value::Dict(dict), key) => dict.get(key),
        (Value::Record(record), Key::Label(name)) => record.get(name),
        _ => None,
    }
}

/// Number of pairs; scalars count as empty.
pub fn size(value: &Value) -> usize {
    match value {
        Value::List(list) => list.len(),
        Value::Dict(dict) => dict.len(),
        Value::Record(record) => record.len(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Value {
        Value::Record(Record::new().with("name", "moe").with("age", 40))
    }

    #[test]
    fn classify_each_shape() {
        assert_eq!(classify(&Value::list([1, 2])), Shape::Sequential);
        assert_eq!(classify(&Value::Dict(Dict::new())), Shape::LabelledIterable);
        assert_eq!(classify(&sample_record()), Shape::Record);
        assert_eq!(classify(&Value::from("abc")), Shape::Scalar);
        assert_eq!(classify(&Value::Nil), Shape::Scalar);
    }

    #[test]
    fn pairs_of_list_are_dense_indexes() {
        let list = Value::list(["a", "b"]);
        let collected: Vec<(Key, Value)> = pairs(&list).unwrap().map(|(k, v)| (k, v.clone())).collect();
        assert_eq!(
            collected,
            vec![(Key::Index(0), Value::from("a")), (Key::Index(1), Value::from("b"))]
        );
    }

    #[test]
    fn pairs_of_record_follow_field_order() {
        let record = sample_record();
        let keys: Vec<Key> = pairs(&record).unwrap().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![Key::label("name"), Key::label("age")]);
    }

    #[test]
    fn pairs_of_scalar_is_invalid_input() {
        let err = pairs(&Value::Integer(5)).err().unwrap();
        assert_eq!(err.kind(), "InvalidInput");
    }

    #[test]
    fn to_record_borrows_dicts() {
        let dict: Dict = vec![("a", Value::Integer(1))].into_iter().collect();
        let value = Value::Dict(dict);
        assert!(matches!(to_record(&value), Cow::Borrowed(_)));
    }

    #[test]
    fn to_record_of_scalar_is_empty() {
        assert!(to_record(&Value::from("hello")).is_empty());
        assert!(to_record(&Value::Integer(42)).is_empty());
    }

    #[test]
    fn to_record_of_record_snapshots_fields() {
        let snapshot = to_record(&sample_record()).into_owned();
        assert_eq!(snapshot.get(&Key::label("age")), Some(&Value::Integer(40)));
    }

    #[test]
    fn dict_overwrite_keeps_position() {
        let mut dict = Dict::new();
        dict.insert("a", Value::Integer(1));
        dict.insert("b", Value::Integer(2));
        dict.insert("a", Value::Integer(3));
        let keys: Vec<&Key> = dict.keys().collect();
        assert_eq!(keys, vec![&Key::label("a"), &Key::label("b")]);
        assert_eq!(dict.get(&Key::label("a")), Some(&Value::Integer(3)));
    }

    #[test]
    fn key_from_value_coercions() {
        assert_eq!(Key::from_value(&Value::Integer(3)).unwrap(), Key::Index(3));
        assert_eq!(Key::from_value(&Value::Boolean(true)).unwrap(), Key::Index(1));
        assert_eq!(Key::from_value(&Value::Decimal(2.9)).unwrap(), Key::Index(2));
        assert_eq!(Key::from_value(&Value::Nil).unwrap(), Key::label(""));
        assert!(Key::from_value(&Value::list([1])).is_err());
    }

    #[test]
    fn field_lookup_across_shapes() {
        assert_eq!(field(&sample_record(), &Key::label("name")), Some(&Value::from("moe")));
        assert_eq!(field(&Value::list([10, 20]), &Key::Index(1)), Some(&Value::Integer(20)));
        assert_eq!(field(&Value::list([10, 20]), &Key::Index(-1)), None);
        assert_eq!(field(&Value::Integer(1), &Key::label("x")), None);
    }
}
