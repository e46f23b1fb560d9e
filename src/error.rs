//! The error returned when calling an empty [`Function`](crate::Function).

/// Error returned by [`Function::call`](crate::Function::call) when the
/// container holds no callable.
///
/// The container stays empty and usable after the failed call. Errors and
/// panics raised by a stored callable are never wrapped in this type; they
/// reach the caller unchanged.
///
/// # Examples
///
/// ```
/// use callbox::{EmptyCall, Function};
///
/// let mut function: Function<fn(u32) -> u32> = Function::empty();
/// assert_eq!(function.call((1,)), Err(EmptyCall));
/// assert_eq!(EmptyCall.to_string(), "called an empty function");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, thiserror::Error)]
#[error("called an empty function")]
pub struct EmptyCall;
