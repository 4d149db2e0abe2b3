//! Early-exit signalling for iteration contexts.
//!
//! A visitor halts traversal by returning [`stop()`]. The [`Stop`] marker has
//! a private field, so ordinary data can never be mistaken for it.
//!
//! Uses thread-local storage to remember which collections are currently
//! being driven by `each`, so that a visitor cannot start a second traversal
//! of the collection it was handed.

use crate::error::{Error, Result};
use crate::value::Value;
use std::cell::RefCell;
use std::ops::ControlFlow;
use tracing::warn;

/// Marker that halts iteration. Only obtainable through [`stop()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop {
    _private: (),
}

/// What a visitor returns: keep going, or halt.
pub type Visit = ControlFlow<Stop>;

/// Halt the current traversal.
pub fn stop() -> Visit {
    ControlFlow::Break(Stop { _private: () })
}

/// Continue with the next pair.
pub fn proceed() -> Visit {
    ControlFlow::Continue(())
}

thread_local! {
    /// Addresses of collections with an `each` in progress
    static ACTIVE_ITERATIONS: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

fn handle_of(collection: &Value) -> usize {
    collection as *const Value as usize
}

fn is_active(handle: usize) -> bool {
    ACTIVE_ITERATIONS.with(|active| active.borrow().contains(&handle))
}

/// Fail if `collection` is mid-iteration.
pub(crate) fn ensure_idle(collection: &Value) -> Result<()> {
    if is_active(handle_of(collection)) {
        warn!("refused reentrant iteration over a collection already being iterated");
        return Err(Error::invalid_input(
            "collection is already being iterated; reentrant iteration is not allowed",
        ));
    }
    Ok(())
}

/// Marks a collection as mid-iteration until dropped.
pub(crate) struct IterationGuard {
    handle: usize,
}

impl IterationGuard {
    pub(crate) fn enter(collection: &Value) -> Result<Self> {
        ensure_idle(collection)?;
        let handle = handle_of(collection);
        ACTIVE_ITERATIONS.with(|active| active.borrow_mut().push(handle));
        Ok(IterationGuard { handle })
    }
}

impl Drop for IterationGuard {
    fn drop(&mut self) {
        ACTIVE_ITERATIONS.with(|active| {
            let mut active = active.borrow_mut();
            if let Some(pos) = active.iter().rposition(|h| *h == self.handle) {
                active.remove(pos);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_a_break() {
        assert!(stop().is_break());
        assert!(proceed().is_continue());
    }

    #[test]
    fn guard_marks_and_releases() {
        let value = Value::list([1, 2, 3]);
        {
            let _guard = IterationGuard::enter(&value).unwrap();
            assert!(ensure_idle(&value).is_err());
            assert!(IterationGuard::enter(&value).is_err());
        }
        assert!(ensure_idle(&value).is_ok());
    }

    #[test]
    fn guards_are_per_collection() {
        let a = Value::list([1]);
        let b = Value::list([1]);
        let _guard = IterationGuard::enter(&a).unwrap();
        assert!(ensure_idle(&b).is_ok());
    }
}
