use std::fmt::{self, Display, Formatter};

/// Whether a lookup was answered from the cache.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Outcome {
    /// The value was already cached and the function did not run.
    Hit,
    /// The function ran to produce the value.
    Miss,
}

impl Outcome {
    /// The outcome's name as it appears in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Record the outcome of a lookup.
#[inline]
pub(crate) fn record(outcome: Outcome, entries: usize) {
    tracing::trace!(outcome = outcome.as_str(), entries, "memoized call");

    #[cfg(feature = "testing")]
    crate::testing::register(outcome);
}

/// Record a computation whose error was handed back instead of cached.
#[inline]
pub(crate) fn record_failure() {
    tracing::debug!("memoized call failed, result not cached");

    #[cfg(feature = "testing")]
    crate::testing::register(Outcome::Miss);
}
