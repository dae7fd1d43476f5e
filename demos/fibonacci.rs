//! This example compares the different ways of memoizing a naive Fibonacci
//! function. Run it with `RUST_LOG=memoizer=trace` to see every cache hit and
//! miss.

use std::thread;

use memoizer::{Recurse, memoize, memoize_recursive, memoize_sync, try_memoize};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Wrapping the plain function only caches the outermost calls.
    let wrapped = memoize(fibonacci);
    println!("wrapped: fib(30) = {}", wrapped.call(30));
    println!("wrapped: fib(30) = {} (cached)", wrapped.call(30));

    // Recursing through the cache makes every intermediate result reusable.
    let recursive = memoize_recursive(|fib: &dyn Recurse<u64, u64>, n: u64| {
        if n <= 2 { 1 } else { fib.recurse(n - 1) + fib.recurse(n - 2) }
    });
    println!("recursive: fib(90) = {}", recursive.call(90));
    println!("recursive: {} cached results", recursive.len());

    // Overflowing inputs are reported and never cached.
    let checked = try_memoize(checked_fibonacci);
    println!("checked: fib(93) = {}", checked.try_call(93)?);
    if let Err(err) = checked.try_call(94) {
        println!("checked: {err}");
    }

    // Threads share one cache and compute each key only once.
    let shared = memoize_sync(fibonacci);
    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| println!("shared: fib(32) = {}", shared.call(32)));
        }
    });

    Ok(())
}

/// Naive recursive Fibonacci.
fn fibonacci(n: u64) -> u64 {
    if n <= 2 { 1 } else { fibonacci(n - 1) + fibonacci(n - 2) }
}

/// Iterative Fibonacci that fails instead of overflowing.
fn checked_fibonacci(n: u64) -> anyhow::Result<u64> {
    if n == 0 {
        return Ok(0);
    }

    let (mut a, mut b) = (0u64, 1u64);
    for _ in 1..n {
        let next = a
            .checked_add(b)
            .ok_or_else(|| anyhow::anyhow!("fib({n}) does not fit into 64 bits"))?;
        a = b;
        b = next;
    }
    Ok(b)
}
