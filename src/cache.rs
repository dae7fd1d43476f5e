use std::hash::Hash;
use std::sync::LazyLock;

use siphasher::sip128::{Hasher128, SipHasher13};

use crate::sync::SlotMap;

/// The cache of a single function annotated with `#[memoize]`.
///
/// Lives in a `static` inside the function, so every function item has its
/// own. Keys are 128-bit hashes of the argument tuple.
pub struct Cache<Out>(LazyLock<SlotMap<u128, Out>>);

impl<Out> Cache<Out> {
    /// Create an empty cache.
    pub const fn new() -> Self {
        Self(LazyLock::new(SlotMap::new))
    }
}

impl<Out> Default for Cache<Out> {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a `Result` return type into the part that is cached.
pub trait Fallible {
    /// The success type, which is cached.
    type Ok;
    /// The error type, which is passed through.
    type Err;

    /// Convert into a plain result.
    fn into_result(self) -> Result<Self::Ok, Self::Err>;
}

impl<T, E> Fallible for Result<T, E> {
    type Ok = T;
    type Err = E;

    #[inline]
    fn into_result(self) -> Result<T, E> {
        self
    }
}

/// Produce a 128-bit hash of a function's arguments.
#[inline]
pub fn hash<T: Hash + ?Sized>(value: &T) -> u128 {
    let mut state = SipHasher13::new();
    value.hash(&mut state);
    state.finish128().as_u128()
}

/// Executes a function, trying to use a cached result for it.
pub fn memoized<Out, F>(cache: &Cache<Out>, key: u128, func: F) -> Out
where
    Out: Clone,
    F: FnOnce() -> Out,
{
    cache.0.get_or_init(key, |_| func())
}

/// Executes a fallible function, trying to use a cached result for it.
///
/// Only `Ok` values end up in the cache.
pub fn memoized_result<R, F>(cache: &Cache<R::Ok>, key: u128, func: F) -> Result<R::Ok, R::Err>
where
    R: Fallible,
    R::Ok: Clone,
    F: FnOnce() -> R,
{
    cache.0.get_or_try_init(key, |_| func().into_result())
}
