//! The single callable type accepted and produced by the toolkit.

use crate::collections::{field, Key};
use crate::error::Result;
use crate::value::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

type Body = dyn Fn(&[Value]) -> Result<Value>;

/// A reference-counted callable taking positional arguments.
///
/// Clones share the same body (and therefore any state a combinator attached
/// to it). Equality and hashing are by identity.
#[derive(Clone)]
pub struct Function {
    name: Rc<str>,
    body: Rc<Body>,
}

impl Function {
    pub fn new(body: impl Fn(&[Value]) -> Result<Value> + 'static) -> Self {
        Self::named("<anonymous>", body)
    }

    pub fn named(name: impl Into<Rc<str>>, body: impl Fn(&[Value]) -> Result<Value> + 'static) -> Self {
        Function {
            name: name.into(),
            body: Rc::new(body),
        }
    }

    /// `identity(value)` → value
    pub fn identity() -> Self {
        Self::named("identity", |args| Ok(arg(args, 0)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.body)(args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.body), Rc::as_ptr(&other.body))
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.body) as *const () as usize
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name)
    }
}

impl Hash for Function {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

/// Positional argument `index`, or nil when the caller passed fewer.
pub fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Nil)
}

/// How an element is projected to a criterion: either a function called
/// with `(value, key)`, or a field name looked up in the element's record
/// view (missing fields project to nil).
#[derive(Clone, Debug)]
pub enum Iteratee {
    Function(Function),
    Field(Key),
}

impl Iteratee {
    pub fn apply(&self, value: &Value, key: &Key) -> Result<Value> {
        match self {
            Iteratee::Function(func) => func.call(&[value.clone(), key.to_value()]),
            Iteratee::Field(name) => Ok(field(value, name).cloned().unwrap_or(Value::Nil)),
        }
    }

    /// Projection of a lone value with no key (binary search lookups).
    pub fn apply_value(&self, value: &Value) -> Result<Value> {
        match self {
            Iteratee::Function(func) => func.call(std::slice::from_ref(value)),
            Iteratee::Field(name) => Ok(field(value, name).cloned().unwrap_or(Value::Nil)),
        }
    }
}

impl From<Function> for Iteratee {
    fn from(func: Function) -> Self {
        Iteratee::Function(func)
    }
}

impl From<&Function> for Iteratee {
    fn from(func: &Function) -> Self {
        Iteratee::Function(func.clone())
    }
}

impl From<&str> for Iteratee {
    fn from(name: &str) -> Self {
        Iteratee::Field(Key::label(name))
    }
}

impl From<Key> for Iteratee {
    fn from(key: Key) -> Self {
        Iteratee::Field(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::Record;

    #[test]
    fn clones_share_identity() {
        let f = Function::new(|_| Ok(Value::Nil));
        let g = f.clone();
        let h = Function::new(|_| Ok(Value::Nil));
        assert!(f.ptr_eq(&g));
        assert!(!f.ptr_eq(&h));
    }

    #[test]
    fn missing_arguments_read_as_nil() {
        let second = Function::new(|args| Ok(arg(args, 1)));
        assert_eq!(second.call(&[Value::Integer(1)]).unwrap(), Value::Nil);
    }

    #[test]
    fn field_iteratee_projects_record_fields() {
        let moe = Value::Record(Record::new().with("age", 40));
        let by_age = Iteratee::from("age");
        assert_eq!(by_age.apply(&moe, &Key::Index(0)).unwrap(), Value::Integer(40));
        let missing = Iteratee::from("height");
        assert_eq!(missing.apply_value(&moe).unwrap(), Value::Nil);
    }
}
