//! Hit/miss bookkeeping for tests.

use std::cell::Cell;

use crate::Outcome;

thread_local! {
    /// The outcome of this thread's most recent memoized call.
    static LAST: Cell<Option<Outcome>> = const { Cell::new(None) };
}

/// The outcome of the last memoized call made on this thread, if any.
pub fn last_outcome() -> Option<Outcome> {
    LAST.with(Cell::get)
}

/// Whether the last memoized call on this thread was a cache hit.
pub fn last_was_hit() -> bool {
    last_outcome() == Some(Outcome::Hit)
}

pub(crate) fn register(outcome: Outcome) {
    LAST.with(|cell| cell.set(Some(outcome)));
}
