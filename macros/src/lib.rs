extern crate proc_macro;

macro_rules! bail {
    ($item:expr, $fmt:literal $($tts:tt)*) => {
        return Err(Error::new_spanned(
            &$item,
            format!(concat!("memoizer: ", $fmt) $($tts)*)
        ))
    }
}

mod memoize;

use proc_macro::TokenStream;
use quote::quote;
use syn::{Error, Result, parse_quote};

/// Memoize a pure function.
///
/// Every annotated function gets its own cache, shared by all threads. The
/// arguments are hashed to find a cached result, so they must implement
/// `Hash`. The return type must be `Clone + Send + Sync + 'static`.
///
/// If the return type is a `Result`, only `Ok` values are cached and errors
/// are returned to the caller as is. The check looks at how the return type
/// is spelled: its last path segment must be named `Result`, as in
/// `Result<T, E>` or `io::Result<T>`. A return type behind an alias with
/// another name, such as `type Parsed = Result<u32, Error>`, is treated like
/// any other value and its errors are cached too.
///
/// ```ignore
/// #[memoize]
/// fn fib(n: u64) -> u64 {
///     if n <= 2 { 1 } else { fib(n - 1) + fib(n - 2) }
/// }
///
/// assert_eq!(fib(80), 23416728348467685);
/// ```
///
/// Methods, generic functions, `impl Trait` arguments and async functions
/// are not supported.
#[proc_macro_attribute]
pub fn memoize(_: TokenStream, stream: TokenStream) -> TokenStream {
    let func = syn::parse_macro_input!(stream as syn::ItemFn);
    memoize::expand(func)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
