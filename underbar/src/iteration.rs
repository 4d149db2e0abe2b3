//! The iteration engine every aggregation is built on.

use crate::break_handling::{ensure_idle, IterationGuard, Visit};
use crate::collections::{classify, pairs, Key};
use crate::error::Result;
use crate::value::Value;
use tracing::trace;

/// `each(collection, visitor)`
///
/// Drive every `(value, key)` pair of `collection` to `visitor` in natural
/// order. The visitor also receives the live collection and may rewrite it;
/// the pair sequence is captured before the first visit, so such edits never
/// change which pairs are still to come.
///
/// Returning [`stop()`](crate::stop) from the visitor halts traversal at once.
/// Halting is not reported: a stopped pass and a full pass both return `Ok`.
///
/// Fails with `InvalidInput` for scalars, or when `collection` is already
/// being driven by an outer `each`.
pub fn each<F>(collection: &mut Value, mut visitor: F) -> Result<()>
where
    F: FnMut(&Value, &Key, &mut Value) -> Result<Visit>,
{
    let _guard = IterationGuard::enter(collection)?;
    // Lists snapshot in O(1) thanks to structural sharing.
    let snapshot = collection.clone();
    trace!(shape = ?classify(&snapshot), "each");
    drive(&snapshot, |value, key| visitor(value, key, collection))
}

/// Read-only counterpart of [`each`], used by the derived algorithms.
///
/// Same ordering and stop semantics. Refuses a collection that an enclosing
/// `each` is currently mutating.
pub fn each_ref<F>(collection: &Value, visitor: F) -> Result<()>
where
    F: FnMut(&Value, &Key) -> Result<Visit>,
{
    ensure_idle(collection)?;
    drive(collection, visitor)
}

// The one traversal loop: natural pair order, halting on the first stop.
fn drive<F>(source: &Value, mut visit: F) -> Result<()>
where
    F: FnMut(&Value, &Key) -> Result<Visit>,
{
    for (key, value) in pairs(source)? {
        if visit(value, &key)?.is_break() {
            trace!(%key, "traversal stopped early");
            break;
        }
    }
    Ok(())
}
