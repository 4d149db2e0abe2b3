use crate::collections::{Dict, Record};
use crate::function::Function;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A dynamically shaped value flowing through the toolkit.
///
/// Collections come in three shapes:
///   `List`   = Sequential (dense zero-based indexes, `im::Vector` storage)
///   `Dict`   = LabelledIterable (arbitrary keys, insertion ordered)
///   `Record` = plain named fields (insertion ordered)
///
/// Every other variant is a scalar and owns no pairs. Cloning is cheap for
/// lists (structural sharing) and strings (reference counted).
#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    String(Rc<str>),
    List(im::Vector<Value>),
    Dict(Dict),
    Record(Record),
    Function(Function),
}

// Strict equality: same variant and same content. Decimals compare by bit
// pattern so that `Eq` and `Hash` stay consistent; functions by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Nil => {}
            Value::Boolean(b) => b.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Decimal(d) => d.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::List(list) => {
                list.len().hash(state);
                for elem in list.iter() {
                    elem.hash(state);
                }
            }
            Value::Dict(dict) => dict.hash(state),
            Value::Record(record) => record.hash(state),
            Value::Function(func) => func.hash(state),
        }
    }
}

impl Value {
    // ===== Constructors =====

    pub fn nil() -> Self {
        Value::Nil
    }

    pub fn from_bool(b: bool) -> Self {
        Value::Boolean(b)
    }

    pub fn from_integer(i: i64) -> Self {
        Value::Integer(i)
    }

    pub fn from_decimal(d: f64) -> Self {
        Value::Decimal(d)
    }

    pub fn from_string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn from_list(list: im::Vector<Value>) -> Self {
        Value::List(list)
    }

    pub fn from_dict(dict: Dict) -> Self {
        Value::Dict(dict)
    }

    pub fn from_record(record: Record) -> Self {
        Value::Record(record)
    }

    pub fn from_function(func: Function) -> Self {
        Value::Function(func)
    }

    /// Build a list from anything yielding values.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    // ===== Accessors =====

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Integers and decimals both read as `f64`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&im::Vector<Value>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut im::Vector<Value>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Decimal(_))
    }

    /// True for the three enumerable shapes.
    pub fn is_collection(&self) -> bool {
        matches!(self, Value::List(_) | Value::Dict(_) | Value::Record(_))
    }

    // ===== Truthiness =====

    /// Falsy: `false`, `nil`, `0`, `0.0`, `""`, empty list, empty dict.
    /// Records and functions are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Boolean(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Decimal(d) => *d != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(list) => !list.is_empty(),
            Value::Dict(dict) => !dict.is_empty(),
            Value::Record(_) | Value::Function(_) => true,
        }
    }
}

// ===== Conversions =====

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<im::Vector<Value>> for Value {
    fn from(list: im::Vector<Value>) -> Self {
        Value::List(list)
    }
}

impl From<Vec<Value>> for Value {
    fn from(list: Vec<Value>) -> Self {
        Value::List(list.into_iter().collect())
    }
}

impl From<Dict> for Value {
    fn from(dict: Dict) -> Self {
        Value::Dict(dict)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

// ===== Formatting =====

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_value(self, false, f)
    }
}

fn format_value(value: &Value, quote_strings: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::Nil => write!(f, "nil"),
        Value::Boolean(b) => write!(f, "{}", b),
        Value::Integer(i) => write!(f, "{}", i),
        Value::Decimal(d) => write!(f, "{}", format_decimal(*d)),
        Value::String(s) if quote_strings => write!(f, "{:?}", s),
        Value::String(s) => write!(f, "{}", s),
        Value::List(list) => {
            write!(f, "[")?;
            for (i, elem) in list.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                format_value(elem, true, f)?;
            }
            write!(f, "]")
        }
        Value::Dict(dict) => {
            write!(f, "#{{")?;
            for (i, (key, elem)) in dict.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: ", key)?;
                format_value(elem, true, f)?;
            }
            write!(f, "}}")
        }
        Value::Record(record) => {
            write!(f, "{{")?;
            for (i, (name, elem)) in record.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: ", name)?;
                format_value(elem, true, f)?;
            }
            write!(f, "}}")
        }
        Value::Function(func) => write!(f, "<function {}>", func.name()),
    }
}

fn format_decimal(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
