use std::fmt::{self, Debug, Formatter};
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::outcome::{self, Outcome};

/// Wrap a pure function in a memo that can be shared between threads.
///
/// Concurrent calls with the same uncached argument run `func` only once:
/// the first caller computes while the others wait for its result.
pub fn memoize_sync<K, V, F>(func: F) -> SyncMemo<K, V, F>
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: Fn(K) -> V,
{
    SyncMemo::new(func)
}

/// Wrap a fallible pure function in a memo that can be shared between
/// threads. Errors are never cached.
pub fn try_memoize_sync<K, V, E, F>(func: F) -> SyncMemo<K, V, F>
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: Fn(K) -> Result<V, E>,
{
    SyncMemo::new(func)
}

/// A memoized function that can be called from many threads at once.
///
/// Each key owns a write-once slot. A key counts as cached once its slot
/// holds a value; until then, at most one caller runs the wrapped function
/// for it.
///
/// # Reentrancy
/// The wrapped function must not call the same `SyncMemo` with the key it is
/// currently computing. Such a call waits for itself and never returns.
/// Calls with other keys are fine.
pub struct SyncMemo<K, V, F> {
    /// The wrapped function.
    func: F,
    /// The per-key result slots.
    slots: SlotMap<K, V>,
}

impl<K, V, F> SyncMemo<K, V, F> {
    /// Wrap a function with an empty cache.
    pub fn new(func: F) -> Self {
        Self { func, slots: SlotMap::new() }
    }

    /// The number of cached results.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V, F> SyncMemo<K, V, F>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Call the memoized function.
    ///
    /// If another thread is already computing the value for `key`, waits for
    /// it instead of computing it again.
    pub fn call(&self, key: K) -> V
    where
        F: Fn(K) -> V,
    {
        self.slots.get_or_init(key, &self.func)
    }

    /// Call the memoized fallible function.
    ///
    /// An `Err` goes to the caller whose computation failed and leaves the
    /// key uncached. A caller that was waiting on the failed computation
    /// then runs the function itself.
    pub fn try_call<E>(&self, key: K) -> Result<V, E>
    where
        F: Fn(K) -> Result<V, E>,
    {
        self.slots.get_or_try_init(key, &self.func)
    }

    /// Whether a result for `key` is cached.
    pub fn contains(&self, key: &K) -> bool {
        self.slots.lookup(key).is_some()
    }

    /// The cached result for `key`, without computing it.
    pub fn cached(&self, key: &K) -> Option<V> {
        self.slots.lookup(key)
    }
}

impl<K, V, F> Debug for SyncMemo<K, V, F> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("SyncMemo").field("entries", &self.len()).finish_non_exhaustive()
    }
}

/// A write-once cell per key.
///
/// Empty slots belong to computations that are in flight. A slot whose
/// computation failed is removed again unless another caller is waiting on
/// it. The map lock is only held to find, create or remove a slot, never
/// while a value is being computed.
pub(crate) struct SlotMap<K, V> {
    /// Maps from keys to their slots.
    slots: Mutex<FxHashMap<K, Arc<OnceCell<V>>>>,
    /// How many slots hold a value.
    filled: AtomicUsize,
}

impl<K, V> SlotMap<K, V> {
    /// Create an empty slot map.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(FxHashMap::default()),
            filled: AtomicUsize::new(0),
        }
    }

    /// The number of filled slots.
    pub fn len(&self) -> usize {
        self.filled.load(Ordering::Relaxed)
    }

    /// The number of slots, filled or not.
    #[cfg(test)]
    fn slots(&self) -> usize {
        self.slots.lock().len()
    }
}

impl<K, V> SlotMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// The value in `key`'s slot, if it is filled.
    pub fn lookup(&self, key: &K) -> Option<V> {
        self.slots.lock().get(key)?.get().cloned()
    }

    /// Return the value for `key`, computing it if its slot is empty.
    pub fn get_or_init(&self, key: K, compute: impl FnOnce(K) -> V) -> V {
        let slot = self.slot(&key);
        if let Some(value) = slot.get() {
            outcome::record(Outcome::Hit, self.len());
            return value.clone();
        }

        let mut computed = false;
        let value = slot
            .get_or_init(|| {
                computed = true;
                compute(key)
            })
            .clone();

        outcome::record(self.settle(computed), self.len());
        value
    }

    /// Return the value for `key`, computing it with a fallible function if
    /// its slot is empty.
    pub fn get_or_try_init<E>(
        &self,
        key: K,
        compute: impl FnOnce(K) -> Result<V, E>,
    ) -> Result<V, E> {
        let slot = self.slot(&key);
        if let Some(value) = slot.get() {
            outcome::record(Outcome::Hit, self.len());
            return Ok(value.clone());
        }

        let mut computed = false;
        let result = slot.get_or_try_init(|| {
            computed = true;
            compute(key.clone())
        });

        match result {
            Ok(value) => {
                let value = value.clone();
                outcome::record(self.settle(computed), self.len());
                Ok(value)
            }
            Err(err) => {
                self.discard(&key, &slot);
                outcome::record_failure();
                Err(err)
            }
        }
    }

    /// Count a freshly filled slot and classify the lookup.
    fn settle(&self, computed: bool) -> Outcome {
        if computed {
            self.filled.fetch_add(1, Ordering::Relaxed);
            Outcome::Miss
        } else {
            Outcome::Hit
        }
    }

    /// Find or create the slot for `key`.
    fn slot(&self, key: &K) -> Arc<OnceCell<V>> {
        let mut map = self.slots.lock();
        if let Some(slot) = map.get(key) {
            return Arc::clone(slot);
        }

        let slot = Arc::new(OnceCell::new());
        map.insert(key.clone(), Arc::clone(&slot));
        slot
    }

    /// Remove the empty slot of a failed computation.
    ///
    /// Slots that other callers still hold stay in place so that a waiting
    /// caller and any later caller agree on the same slot.
    fn discard(&self, key: &K, slot: &Arc<OnceCell<V>>) {
        let mut map = self.slots.lock();
        let unshared = map.get(key).is_some_and(|current| {
            Arc::ptr_eq(current, slot) && Arc::strong_count(slot) == 2
        });

        if unshared && slot.get().is_none() {
            map.remove(key);
        }
    }
}
