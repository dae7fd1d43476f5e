//! This example memoizes free functions with the `#[memoize]` attribute and
//! shows which results end up in their caches.

use std::num::ParseIntError;
use std::sync::atomic::{AtomicUsize, Ordering};

use memoizer::memoize;

static FIB_RUNS: AtomicUsize = AtomicUsize::new(0);
static PARSE_RUNS: AtomicUsize = AtomicUsize::new(0);

fn main() {
    // [Miss] Computes fib(1) up to fib(50), each exactly once.
    println!("fib(50) = {}", fib(50));
    // [Hit] Every smaller number is cached by now.
    println!("fib(25) = {}", fib(25));
    println!("fib ran {} times", FIB_RUNS.load(Ordering::Relaxed));

    // [Miss] Zero is a perfectly good result.
    println!("vowels in 'rhythm': {}", vowels("rhythm"));
    // [Hit] And it is cached like any other.
    println!("vowels in 'rhythm': {}", vowels("rhythm"));

    // [Miss] Errors go back to the caller and are not cached ...
    println!("parse('x1') = {:?}", parse_hex("x1"));
    // [Miss] ... so the same input is parsed again.
    println!("parse('x1') = {:?}", parse_hex("x1"));
    // [Miss] [Hit] Successful results are cached.
    println!("parse('ff') = {:?}", parse_hex("ff"));
    println!("parse('ff') = {:?}", parse_hex("ff"));
    println!("parse ran {} times", PARSE_RUNS.load(Ordering::Relaxed));
}

/// Compute a Fibonacci number, recursing through the cache.
#[memoize]
fn fib(n: u64) -> u64 {
    FIB_RUNS.fetch_add(1, Ordering::Relaxed);
    if n <= 2 { 1 } else { fib(n - 1) + fib(n - 2) }
}

/// Count the vowels in a word.
#[memoize]
fn vowels(word: &str) -> usize {
    word.chars().filter(|c| "aeiou".contains(*c)).count()
}

/// Parse a hexadecimal number.
#[memoize]
fn parse_hex(text: &str) -> Result<u32, ParseIntError> {
    PARSE_RUNS.fetch_add(1, Ordering::Relaxed);
    u32::from_str_radix(text, 16)
}
