use std::fmt::{self, Debug, Formatter};
use std::hash::Hash;

use crate::Memo;

/// Memoize a function that recurses through its own cache.
///
/// The wrapped function receives a [`Recurse`] handle as its first argument.
/// Recursive calls made through the handle are answered from, and recorded
/// in, the same cache as the outer call.
///
/// ```
/// use memoizer::Recurse;
///
/// let fib = memoizer::memoize_recursive(|fib: &dyn Recurse<u64, u64>, n: u64| {
///     if n <= 2 { 1 } else { fib.recurse(n - 1) + fib.recurse(n - 2) }
/// });
///
/// assert_eq!(fib.call(90), 2880067194370816120);
/// assert_eq!(fib.len(), 90);
/// ```
pub fn memoize_recursive<K, V, F>(func: F) -> Recursive<K, V, F>
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: Fn(&dyn Recurse<K, V>, K) -> V,
{
    Recursive { memo: Memo::new(func) }
}

/// A handle for making memoized recursive calls.
pub trait Recurse<K, V> {
    /// Compute the value for `key`, going through the cache.
    fn recurse(&self, key: K) -> V;
}

/// A memoized function whose recursive calls share its cache.
///
/// Created with [`memoize_recursive`].
pub struct Recursive<K, V, F> {
    memo: Memo<K, V, F>,
}

impl<K, V, F> Recursive<K, V, F> {
    /// The number of cached results.
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}

impl<K, V, F> Recursive<K, V, F>
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: Fn(&dyn Recurse<K, V>, K) -> V,
{
    /// Call the memoized function.
    pub fn call(&self, key: K) -> V {
        let handle: &dyn Recurse<K, V> = self;
        self.memo.get_or_compute(key, |key| (self.memo.func())(handle, key))
    }

    /// Whether a result for `key` is cached.
    pub fn contains(&self, key: &K) -> bool {
        self.memo.contains(key)
    }

    /// The cached result for `key`, without computing it.
    pub fn cached(&self, key: &K) -> Option<V> {
        self.memo.cached(key)
    }
}

impl<K, V, F> Recurse<K, V> for Recursive<K, V, F>
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: Fn(&dyn Recurse<K, V>, K) -> V,
{
    fn recurse(&self, key: K) -> V {
        self.call(key)
    }
}

impl<K, V, F> Debug for Recursive<K, V, F> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Recursive").field("entries", &self.len()).finish_non_exhaustive()
    }
}
