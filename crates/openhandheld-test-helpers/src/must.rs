//! Unwrap helpers with good error messages.
//!
//! These replace `unwrap()` and `expect()` in test code; `#[track_caller]`
//! keeps the panic location at the call site.

use std::fmt::Debug;
use std::str::FromStr;

/// Unwrap a `Result`, panicking with the error value.
///
/// # Example
///
/// ```rust
/// use openhandheld_test_helpers::must;
///
/// let result: Result<i32, &str> = Ok(42);
/// assert_eq!(must(result), 42);
/// ```
///
/// # Panics
///
/// Panics if the result is `Err`.
#[track_caller]
pub fn must<T, E: Debug>(result: Result<T, E>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("must: unexpected Err: {e:?}"),
    }
}

/// Unwrap an `Option`, panicking with `msg` if `None`.
///
/// # Example
///
/// ```rust
/// use openhandheld_test_helpers::must_some;
///
/// assert_eq!(must_some(Some(42), "expected a value"), 42);
/// ```
///
/// # Panics
///
/// Panics if the option is `None`.
#[track_caller]
pub fn must_some<T>(option: Option<T>, msg: &str) -> T {
    match option {
        Some(v) => v,
        None => panic!("must_some: {msg}"),
    }
}

/// Unwrap a `Result` with a context message.
///
/// # Panics
///
/// Panics if the result is `Err`, with the context and error value.
#[track_caller]
pub fn must_with<T, E: Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("must_with: {context}: {e:?}"),
    }
}

/// Parse a string, panicking on failure.
///
/// # Panics
///
/// Panics if parsing fails.
#[track_caller]
pub fn must_parse<T: FromStr>(s: &str) -> T
where
    T::Err: Debug,
{
    s.parse()
        .unwrap_or_else(|e| panic!("must_parse: failed to parse {s:?}: {e:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn must_passes_through_ok() {
        let result: Result<u8, String> = Ok(3);
        assert_eq!(must(result), 3);
        assert_eq!(must_with(Ok::<_, ()>(4), "ctx"), 4);
        let parsed: u16 = must_parse("513");
        assert_eq!(parsed, 513);
    }

    #[test]
    #[should_panic(expected = "must_some: missing")]
    fn must_some_panics_with_message() {
        let value: Option<u8> = None;
        must_some(value, "missing");
    }

    #[test]
    #[should_panic(expected = "must_with: opening: \"denied\"")]
    fn must_with_includes_context() {
        let result: Result<(), &str> = Err("denied");
        must_with(result, "opening");
    }
}
