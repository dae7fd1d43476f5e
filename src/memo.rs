use std::cell::RefCell;
use std::fmt::{self, Debug, Formatter};
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::outcome::{self, Outcome};

/// Wrap a pure function so that its results are cached by argument.
///
/// The returned [`Memo`] calls `func` at most once per distinct argument and
/// hands out clones of the stored result afterwards.
///
/// ```
/// let square = memoizer::memoize(|x: u64| x * x);
/// assert_eq!(square.call(12), 144);
/// assert_eq!(square.call(12), 144); // Served from the cache.
/// ```
pub fn memoize<K, V, F>(func: F) -> Memo<K, V, F>
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: Fn(K) -> V,
{
    Memo::new(func)
}

/// Wrap a fallible pure function so that its successful results are cached.
///
/// Errors are passed through to the caller and never stored, so the next
/// call with the same argument runs `func` again.
///
/// ```
/// let parse = memoizer::try_memoize(|s: String| s.parse::<i32>());
/// assert_eq!(parse.try_call("42".into()), Ok(42));
/// assert!(parse.try_call("x".into()).is_err());
/// assert!(!parse.contains(&"x".to_string()));
/// ```
pub fn try_memoize<K, V, E, F>(func: F) -> Memo<K, V, F>
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: Fn(K) -> Result<V, E>,
{
    Memo::new(func)
}

/// A memoized function.
///
/// Owns the wrapped function and a private cache from arguments to results.
/// Entries are only ever added: once a key has a value, that value is
/// returned for the lifetime of the `Memo`.
///
/// A `Memo` is meant for a single thread. Use [`SyncMemo`](crate::SyncMemo)
/// to share a cache between threads.
pub struct Memo<K, V, F> {
    /// The wrapped function.
    func: F,
    /// Maps from arguments to previously computed results.
    cache: RefCell<FxHashMap<K, V>>,
}

impl<K, V, F> Memo<K, V, F> {
    /// Wrap a function with an empty cache.
    pub fn new(func: F) -> Self {
        Self { func, cache: RefCell::new(FxHashMap::default()) }
    }

    /// Wrap a function with a cache that has room for `capacity` entries
    /// before reallocating.
    pub fn with_capacity(func: F, capacity: usize) -> Self {
        Self {
            func,
            cache: RefCell::new(FxHashMap::with_capacity_and_hasher(
                capacity,
                Default::default(),
            )),
        }
    }

    /// The number of cached results.
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    /// The wrapped function.
    pub(crate) fn func(&self) -> &F {
        &self.func
    }
}

impl<K, V, F> Memo<K, V, F>
where
    K: Hash + Eq,
{
    /// Whether a result for `key` is cached.
    pub fn contains(&self, key: &K) -> bool {
        self.cache.borrow().contains_key(key)
    }

    /// The cached result for `key`, without computing it.
    pub fn cached(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.cache.borrow().get(key).cloned()
    }
}

impl<K, V, F> Memo<K, V, F>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Call the memoized function.
    ///
    /// Returns the cached result for `key` if there is one. Otherwise, runs
    /// the wrapped function, caches its result and returns it.
    pub fn call(&self, key: K) -> V
    where
        F: Fn(K) -> V,
    {
        self.get_or_compute(key, &self.func)
    }

    /// Call the memoized fallible function.
    ///
    /// Like [`call`](Self::call), but an `Err` from the wrapped function is
    /// returned as is and leaves `key` uncached.
    pub fn try_call<E>(&self, key: K) -> Result<V, E>
    where
        F: Fn(K) -> Result<V, E>,
    {
        self.try_get_or_compute(key, &self.func)
    }

    /// Turn the memoized function into a plain closure.
    pub fn into_fn(self) -> impl Fn(K) -> V
    where
        F: Fn(K) -> V,
    {
        move |key| self.call(key)
    }

    /// Borrow the memoized function as a plain closure.
    pub fn as_fn(&self) -> impl Fn(K) -> V + '_
    where
        F: Fn(K) -> V,
    {
        move |key| self.call(key)
    }

    /// Look up `key` or produce its value with `compute`.
    ///
    /// The cache is not borrowed while `compute` runs, so it may call back
    /// into this memo with other keys.
    pub(crate) fn get_or_compute(&self, key: K, compute: impl FnOnce(K) -> V) -> V {
        if let Some(value) = self.cache.borrow().get(&key) {
            outcome::record(Outcome::Hit, self.len());
            return value.clone();
        }

        let value = compute(key.clone());

        let mut cache = self.cache.borrow_mut();
        let value = cache.entry(key).or_insert(value).clone();
        let entries = cache.len();
        drop(cache);

        outcome::record(Outcome::Miss, entries);
        value
    }

    /// Look up `key` or produce its value with a fallible `compute`.
    pub(crate) fn try_get_or_compute<E>(
        &self,
        key: K,
        compute: impl FnOnce(K) -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.cache.borrow().get(&key) {
            outcome::record(Outcome::Hit, self.len());
            return Ok(value.clone());
        }

        let value = match compute(key.clone()) {
            Ok(value) => value,
            Err(err) => {
                outcome::record_failure();
                return Err(err);
            }
        };

        let mut cache = self.cache.borrow_mut();
        let value = cache.entry(key).or_insert(value).clone();
        let entries = cache.len();
        drop(cache);

        outcome::record(Outcome::Miss, entries);
        Ok(value)
    }
}

impl<K, V, F> Debug for Memo<K, V, F> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Memo").field("entries", &self.len()).finish_non_exhaustive()
    }
}
