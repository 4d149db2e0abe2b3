//! Function combinators.
//!
//! Each combinator takes a [`Function`] and returns a new one. Any state the
//! new function needs (a memo table, a fired flag, a countdown) lives inside
//! it and is shared only by its clones. None of it is thread-safe; the
//! returned functions are meant for a single sequential caller.

use crate::function::{arg, Function};
use crate::value::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tracing::debug;

/// `partial(function, bound...)` → Function
///
/// `g(rest...) = function(bound..., rest...)`
pub fn partial(function: &Function, bound: Vec<Value>) -> Function {
    let function = function.clone();
    Function::named(format!("partial({})", function.name()), move |rest| {
        let mut args = Vec::with_capacity(bound.len() + rest.len());
        args.extend(bound.iter().cloned());
        args.extend(rest.iter().cloned());
        function.call(&args)
    })
}

/// `memoize(function, hasher?)` → Function
///
/// Caches results under `hasher(args...)`; the default hasher is the first
/// argument. Argument lists that hash alike share one cached result, even
/// when `function` would answer them differently.
///
/// The cache is not borrowed while `function` runs, so recursive memoized
/// functions (calling themselves through a captured handle) work.
pub fn memoize(function: &Function, hasher: Option<&Function>) -> Function {
    let function = function.clone();
    let hasher = hasher.cloned();
    let memo: RefCell<HashMap<Value, Value>> = RefCell::new(HashMap::new());

    Function::named(format!("memoize({})", function.name()), move |args| {
        let key = match &hasher {
            Some(hasher) => hasher.call(args)?,
            None => arg(args, 0),
        };
        if let Some(cached) = memo.borrow().get(&key) {
            debug!(%key, "memoize hit");
            return Ok(cached.clone());
        }
        debug!(%key, "memoize miss");
        let result = function.call(args)?;
        Ok(memo.borrow_mut().entry(key).or_insert(result).clone())
    })
}

/// `once(function)` → Function
///
/// The first call runs `function` and caches its result; every later call
/// returns that result without running `function` again, whatever its
/// arguments. If the first call fails, the error is returned and later calls
/// yield nil.
pub fn once(function: &Function) -> Function {
    let function = function.clone();
    let fired = Cell::new(false);
    let memo: RefCell<Value> = RefCell::new(Value::Nil);

    Function::named(format!("once({})", function.name()), move |args| {
        if !fired.replace(true) {
            let result = function.call(args)?;
            *memo.borrow_mut() = result;
        }
        Ok(memo.borrow().clone())
    })
}

/// `wrap(function, wrapper)` → Function
///
/// `g(args...) = wrapper(function, args...)`; the wrapper decides whether,
/// when and how to call `function`.
pub fn wrap(function: &Function, wrapper: &Function) -> Function {
    let function = function.clone();
    let wrapper = wrapper.clone();
    Function::named(format!("wrap({})", function.name()), move |args| {
        let mut call_args = Vec::with_capacity(args.len() + 1);
        call_args.push(Value::Function(function.clone()));
        call_args.extend(args.iter().cloned());
        wrapper.call(&call_args)
    })
}

/// `compose(f1, f2, ..., fn)` → Function
///
/// `g(args...) = f1(f2(...fn(args...)))`. The rightmost function receives
/// the original arguments; the others receive one value each. Composing
/// nothing yields the first argument.
pub fn compose(functions: &[Function]) -> Function {
    let functions: Vec<Function> = functions.iter().rev().cloned().collect();
    Function::named("compose", move |args| {
        let mut iter = functions.iter();
        let Some(innermost) = iter.next() else {
            return Ok(arg(args, 0));
        };
        let mut result = innermost.call(args)?;
        for function in iter {
            result = function.call(&[result])?;
        }
        Ok(result)
    })
}

/// `after(times, function)` → Function
///
/// The first `times - 1` calls return nil without running `function`; the
/// `times`-th call and every later one run it with their own arguments.
pub fn after(times: usize, function: &Function) -> Function {
    let function = function.clone();
    let remaining = Cell::new(times);

    Function::named(format!("after({})", function.name()), move |args| {
        let left = remaining.get().saturating_sub(1);
        remaining.set(left);
        if left == 0 {
            debug!(function = function.name(), "after countdown released");
            return function.call(args);
        }
        Ok(Value::Nil)
    })
}

#[cfg(test)]
mod tests;
