//! Memoizing wrappers for pure functions.
//!
//! A memoized function remembers the result for every argument it has seen
//! and answers repeated calls from its cache instead of running again.
//!
//! - [`memoize`] and [`try_memoize`] wrap a function in a single-threaded
//!   [`Memo`]. The fallible flavour never caches errors.
//! - [`memoize_recursive`] lets a function recurse through its own cache.
//! - [`memoize_sync`] and [`try_memoize_sync`] produce a [`SyncMemo`] that
//!   can be shared between threads and computes each key at most once.
//! - The [`macro@memoize`] attribute memoizes a free function with a cache
//!   private to that function.
//!
//! Caches only grow. Every wrapper keeps each computed result until the
//! wrapper itself is dropped.
//!
//! The wrapped function must be pure: the cache assumes that the same
//! argument always produces the same result.
//!
//! # The `#[memoize]` attribute
//! Free functions with plain, hashable arguments can be memoized:
//!
//! ```
//! use memoizer::memoize;
//!
//! #[memoize]
//! fn fib(n: u64) -> u64 {
//!     if n <= 2 { 1 } else { fib(n - 1) + fib(n - 2) }
//! }
//!
//! #[memoize]
//! fn parse(text: &str) -> Result<u32, std::num::ParseIntError> {
//!     text.parse()
//! }
//!
//! assert_eq!(fib(80), 23416728348467685);
//! assert_eq!(parse("7"), Ok(7));
//! assert!(parse("seven").is_err());
//! ```
//!
//! Methods are rejected:
//!
//! ```compile_fail
//! use memoizer::memoize;
//!
//! struct Counter(u32);
//!
//! impl Counter {
//!     #[memoize]
//!     fn get(&self) -> u32 {
//!         self.0
//!     }
//! }
//! ```
//!
//! So are generic functions:
//!
//! ```compile_fail
//! use memoizer::memoize;
//!
//! #[memoize]
//! fn first<T: Clone + std::hash::Hash + Send + Sync + 'static>(value: T) -> T {
//!     value
//! }
//! ```
//!
//! `impl Trait` arguments:
//!
//! ```compile_fail
//! use memoizer::memoize;
//!
//! #[memoize]
//! fn length(text: impl AsRef<str> + std::hash::Hash) -> usize {
//!     text.as_ref().len()
//! }
//! ```
//!
//! And async functions:
//!
//! ```compile_fail
//! use memoizer::memoize;
//!
//! #[memoize]
//! async fn answer() -> u32 {
//!     42
//! }
//! ```

mod cache;
mod memo;
mod outcome;
mod recursive;
mod sync;

#[cfg(feature = "testing")]
pub mod testing;

pub use crate::memo::{Memo, memoize, try_memoize};
pub use crate::outcome::Outcome;
pub use crate::recursive::{Recurse, Recursive, memoize_recursive};
pub use crate::sync::{SyncMemo, memoize_sync, try_memoize_sync};

#[cfg(feature = "macros")]
pub use memoizer_macros::memoize;

/// These are implementation details. Do not rely on them!
#[doc(hidden)]
pub mod internal {
    pub use crate::cache::{Cache, Fallible, hash, memoized, memoized_result};
}
