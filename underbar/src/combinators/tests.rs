use super::*;
use crate::error::{Error, Result};
use std::rc::Rc;

fn counting(calls: &Rc<Cell<usize>>, body: impl Fn(&[Value]) -> Result<Value> + 'static) -> Function {
    let calls = calls.clone();
    Function::new(move |args| {
        calls.set(calls.get() + 1);
        body(args)
    })
}

fn int(args: &[Value], index: usize) -> i64 {
    arg(args, index).as_integer().unwrap_or(0)
}

// ===== partial =====

#[test]
fn partial_prepends_bound_arguments() {
    let subtract = Function::new(|args| Ok(Value::Integer(int(args, 0) - int(args, 1))));
    let from_ten = partial(&subtract, vec![Value::Integer(10)]);
    assert_eq!(from_ten.call(&[Value::Integer(3)]).unwrap(), Value::Integer(7));
}

#[test]
fn partial_with_everything_bound_ignores_nothing() {
    let concat = Function::new(|args| {
        Ok(Value::from(args.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("")))
    });
    let abc = partial(&concat, vec![Value::from("a"), Value::from("b")]);
    assert_eq!(abc.call(&[Value::from("c")]).unwrap(), Value::from("abc"));
}

// ===== memoize =====

#[test]
fn memoize_caches_by_first_argument() {
    let calls = Rc::new(Cell::new(0));
    let square = counting(&calls, |args| Ok(Value::Integer(int(args, 0) * int(args, 0))));
    let fast = memoize(&square, None);

    assert_eq!(fast.call(&[Value::Integer(4)]).unwrap(), Value::Integer(16));
    assert_eq!(fast.call(&[Value::Integer(4)]).unwrap(), Value::Integer(16));
    assert_eq!(fast.call(&[Value::Integer(5)]).unwrap(), Value::Integer(25));
    assert_eq!(calls.get(), 2);
}

#[test]
fn memoize_hasher_collisions_return_first_result() {
    let add = Function::new(|args| Ok(Value::Integer(int(args, 0) + int(args, 1))));
    // Coarser than add's domain: only the first argument counts.
    let first_only = Function::new(|args| Ok(arg(args, 0)));
    let cached = memoize(&add, Some(&first_only));

    assert_eq!(cached.call(&[Value::Integer(1), Value::Integer(1)]).unwrap(), Value::Integer(2));
    assert_eq!(cached.call(&[Value::Integer(1), Value::Integer(100)]).unwrap(), Value::Integer(2));
    assert_eq!(add.call(&[Value::Integer(1), Value::Integer(100)]).unwrap(), Value::Integer(101));
}

#[test]
fn memoize_supports_recursion() {
    let slot: Rc<RefCell<Option<Function>>> = Rc::new(RefCell::new(None));
    let inner = slot.clone();
    let fib = Function::new(move |args| {
        let n = int(args, 0);
        if n < 2 {
            return Ok(Value::Integer(n));
        }
        let this = inner.borrow().clone().ok_or_else(|| Error::callback("unbound"))?;
        let a = this.call(&[Value::Integer(n - 1)])?.as_integer().unwrap_or(0);
        let b = this.call(&[Value::Integer(n - 2)])?.as_integer().unwrap_or(0);
        Ok(Value::Integer(a + b))
    });
    let fast_fib = memoize(&fib, None);
    *slot.borrow_mut() = Some(fast_fib.clone());

    assert_eq!(fast_fib.call(&[Value::Integer(50)]).unwrap(), Value::Integer(12_586_269_025));
}

#[test]
fn memoize_state_is_per_returned_function() {
    let calls = Rc::new(Cell::new(0));
    let f = counting(&calls, |_| Ok(Value::Nil));
    let a = memoize(&f, None);
    let b = memoize(&f, None);
    a.call(&[Value::Integer(1)]).unwrap();
    b.call(&[Value::Integer(1)]).unwrap();
    assert_eq!(calls.get(), 2);
}

#[test]
fn memoize_does_not_cache_errors() {
    let calls = Rc::new(Cell::new(0));
    let failing = counting(&calls, |_| Err(Error::callback("nope")));
    let cached = memoize(&failing, None);
    assert!(cached.call(&[Value::Integer(1)]).is_err());
    assert!(cached.call(&[Value::Integer(1)]).is_err());
    assert_eq!(calls.get(), 2);
}

// ===== once =====

#[test]
fn once_invokes_exactly_once() {
    let calls = Rc::new(Cell::new(0));
    let init = counting(&calls, |args| Ok(arg(args, 0)));
    let init_once = once(&init);

    assert_eq!(init_once.call(&[Value::from("first")]).unwrap(), Value::from("first"));
    assert_eq!(init_once.call(&[Value::from("second")]).unwrap(), Value::from("first"));
    assert_eq!(init_once.call(&[]).unwrap(), Value::from("first"));
    assert_eq!(calls.get(), 1);
}

#[test]
fn once_first_failure_is_final() {
    let calls = Rc::new(Cell::new(0));
    let failing = counting(&calls, |_| Err(Error::callback("boom")));
    let guarded = once(&failing);
    assert_eq!(guarded.call(&[]).unwrap_err(), Error::callback("boom"));
    assert_eq!(guarded.call(&[]).unwrap(), Value::Nil);
    assert_eq!(calls.get(), 1);
}

// ===== wrap =====

#[test]
fn wrap_hands_function_and_arguments_to_wrapper() {
    let greet = Function::new(|args| Ok(Value::from(format!("hi: {}", arg(args, 0)))));
    let wrapper = Function::new(|args| {
        let inner = arg(args, 0);
        let inner = inner.as_function().ok_or_else(|| Error::callback("expected function"))?;
        let result = inner.call(&args[1..])?;
        Ok(Value::from(format!("before, {}, after", result)))
    });
    let wrapped = wrap(&greet, &wrapper);
    assert_eq!(
        wrapped.call(&[Value::from("moe")]).unwrap(),
        Value::from("before, hi: moe, after")
    );
}

#[test]
fn wrap_may_skip_the_function() {
    let calls = Rc::new(Cell::new(0));
    let f = counting(&calls, |_| Ok(Value::Nil));
    let gate = Function::new(|_| Ok(Value::from("blocked")));
    assert_eq!(wrap(&f, &gate).call(&[]).unwrap(), Value::from("blocked"));
    assert_eq!(calls.get(), 0);
}

// ===== compose =====

#[test]
fn compose_applies_right_to_left() {
    let greet = Function::new(|args| Ok(Value::from(format!("hi: {}", arg(args, 0)))));
    let exclaim = Function::new(|args| Ok(Value::from(format!("{}!", arg(args, 0)))));
    let welcome = compose(&[greet, exclaim]);
    assert_eq!(welcome.call(&[Value::from("moe")]).unwrap(), Value::from("hi: moe!"));
}

#[test]
fn compose_rightmost_receives_all_arguments() {
    let add = Function::new(|args| Ok(Value::Integer(int(args, 0) + int(args, 1))));
    let double = Function::new(|args| Ok(Value::Integer(int(args, 0) * 2)));
    let f = compose(&[double, add]);
    assert_eq!(f.call(&[Value::Integer(2), Value::Integer(3)]).unwrap(), Value::Integer(10));
}

#[test]
fn compose_of_nothing_is_identity() {
    assert_eq!(compose(&[]).call(&[Value::Integer(7)]).unwrap(), Value::Integer(7));
}

// ===== after =====

#[test]
fn after_fires_from_the_nth_call_with_own_arguments() {
    let seen: Rc<RefCell<Vec<Value>>> = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    let record = Function::new(move |args| {
        log.borrow_mut().push(arg(args, 0));
        Ok(Value::from("done"))
    });
    let gated = after(3, &record);

    assert_eq!(gated.call(&[Value::Integer(1)]).unwrap(), Value::Nil);
    assert_eq!(gated.call(&[Value::Integer(2)]).unwrap(), Value::Nil);
    assert_eq!(gated.call(&[Value::Integer(3)]).unwrap(), Value::from("done"));
    assert_eq!(gated.call(&[Value::Integer(4)]).unwrap(), Value::from("done"));
    assert_eq!(*seen.borrow(), vec![Value::Integer(3), Value::Integer(4)]);
}

#[test]
fn after_zero_or_one_fires_immediately() {
    let f = Function::new(|_| Ok(Value::Boolean(true)));
    assert_eq!(after(0, &f).call(&[]).unwrap(), Value::Boolean(true));
    assert_eq!(after(1, &f).call(&[]).unwrap(), Value::Boolean(true));
}
