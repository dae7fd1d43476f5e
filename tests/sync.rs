use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Barrier, LazyLock};
use std::thread;
use std::time::Duration;

use memoizer::{SyncMemo, memoize_sync, try_memoize_sync};

const THREADS: usize = 8;

#[test]
fn test_same_key_computes_once() {
    let calls = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);
    let slow = memoize_sync(|x: u64| {
        calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        x * 3
    });

    let results: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    slow.call(14)
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert!(results.iter().all(|&result| result == 42));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(slow.len(), 1);
}

#[test]
fn test_distinct_keys_across_threads() {
    let calls = AtomicUsize::new(0);
    let square = memoize_sync(|x: usize| {
        calls.fetch_add(1, Ordering::SeqCst);
        x * x
    });

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for x in 0..32 {
                    assert_eq!(square.call(x), x * x);
                }
            });
        }
    });

    assert_eq!(square.len(), 32);
    assert_eq!(calls.load(Ordering::SeqCst), 32);
    assert_eq!(square.cached(&5), Some(25));
    assert!(!square.contains(&32));
}

#[test]
fn test_falsy_values_are_cached() {
    let calls = AtomicUsize::new(0);
    let empty = memoize_sync(|_: u8| {
        calls.fetch_add(1, Ordering::SeqCst);
        String::new()
    });

    assert_eq!(empty.call(0), "");
    assert_eq!(empty.call(0), "");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_errors_are_not_cached() {
    let calls = AtomicUsize::new(0);
    let checked = try_memoize_sync(|x: u32| {
        calls.fetch_add(1, Ordering::SeqCst);
        if x == 1 { Err(format!("cannot compute {x}")) } else { Ok(x) }
    });

    assert!(checked.try_call(1).is_err());
    assert!(checked.try_call(1).is_err());
    assert!(!checked.contains(&1));
    assert!(checked.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    assert_eq!(checked.try_call(2), Ok(2));
    assert_eq!(checked.try_call(2), Ok(2));
    assert_eq!(checked.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_waiter_retries_after_failure() {
    let calls = AtomicUsize::new(0);
    let barrier = Barrier::new(2);
    let flaky = try_memoize_sync(|x: u32| {
        let nr = calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        if nr == 0 { Err("first attempt fails") } else { Ok(x) }
    });

    let results: Vec<Result<u32, &str>> = thread::scope(|s| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    flaky.try_call(9)
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    // Exactly one caller observed the failure, the other one retried.
    assert_eq!(results.iter().filter(|result| result.is_err()).count(), 1);
    assert!(results.contains(&Ok(9)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(flaky.cached(&9), Some(9));
}

#[test]
fn test_memo_calling_another_memo() {
    let calls = AtomicUsize::new(0);
    let outer = memoize_sync(|x: u32| {
        calls.fetch_add(1, Ordering::SeqCst);
        x + 100
    });
    let wrapper = memoize_sync(|x: u32| outer.call(x) + outer.call(x + 1));

    assert_eq!(wrapper.call(1), 203);
    assert_eq!(wrapper.call(2), 205);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_panic_leaves_key_uncached() {
    let calls = AtomicUsize::new(0);
    let fragile = memoize_sync(|x: u32| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("first computation of {x} panics");
        }
        x * 10
    });

    let result = panic::catch_unwind(AssertUnwindSafe(|| fragile.call(4)));
    assert!(result.is_err());
    assert!(!fragile.contains(&4));
    assert!(fragile.is_empty());

    assert_eq!(fragile.call(4), 40);
    assert_eq!(fragile.call(4), 40);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

/// Shared Fibonacci memo whose function recurses through the memo itself.
static FIB: LazyLock<SyncMemo<u64, u64, fn(u64) -> u64>> =
    LazyLock::new(|| SyncMemo::new(fib_step));

static FIB_CALLS: AtomicUsize = AtomicUsize::new(0);

fn fib_step(n: u64) -> u64 {
    FIB_CALLS.fetch_add(1, Ordering::SeqCst);
    if n <= 2 { 1 } else { FIB.call(n - 1) + FIB.call(n - 2) }
}

#[test]
fn test_recursion_through_same_memo() {
    let results: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS).map(|_| s.spawn(|| FIB.call(60))).collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert!(results.iter().all(|&result| result == 1_548_008_755_920));
    assert_eq!(FIB.len(), 60);
    assert_eq!(FIB.cached(&30), Some(832_040));

    // Every key from 1 to 60 was computed by exactly one thread.
    assert_eq!(FIB_CALLS.load(Ordering::SeqCst), 60);
}
