//! Marker types selecting the ownership semantics of a [`Function`].
//!
//! The second type parameter of [`Function<S, O, WORDS>`](crate::Function)
//! decides which operations the container offers, and which callables it
//! accepts:
//!
//! | Marker       | Accepts                 | [`Clone`] | [`assign_from`] / [`take`] / [`swap`] |
//! |--------------|-------------------------|:---------:|---------------------------------------|
//! | [`Copyable`] | `Callable + Clone`      |     ✓     | relocate the payload                  |
//! | [`MoveOnly`] | `Callable`              |           | relocate the payload                  |
//! | [`CopyOnly`] | `Callable + Clone`      |     ✓     | clone the payload, then clear         |
//!
//! The constraints encoded by these markers are enforced at construction
//! time. A `Function<_, MoveOnly>` never asks its payload to clone itself,
//! because its vtable has no entry for cloning, and the operations of a
//! `Function<_, CopyOnly>` never hand its payload over to another container.
//! Moving a container by value still moves an inline payload along with it.
//!
//! # Examples
//!
//! ```
//! use callbox::{Function, markers};
//!
//! let mut count = 0;
//! let counter = move || {
//!     count += 1;
//!     count
//! };
//!
//! let mut copyable: Function<fn() -> i32, markers::Copyable> = Function::new(counter);
//! let mut copy = copyable.clone();
//! assert_eq!(copyable.call(()), Ok(1));
//! assert_eq!(copy.call(()), Ok(1));
//!
//! let mut move_only: Function<fn() -> i32, markers::MoveOnly> = copyable.into_move_only();
//! assert_eq!(move_only.call(()), Ok(2));
//! ```
//!
//! [`Function`]: crate::Function
//! [`assign_from`]: crate::Function::assign_from
//! [`take`]: crate::Function::take
//! [`swap`]: crate::Function::swap

use callbox_internals::{
    RawFunction,
    signature::{Callable, Signature},
};
pub use callbox_internals::ownership::{CopyOnly, Copyable, MoveOnly, Ownership};

/// Ownership markers whose containers can store a callable of type `F` with
/// the signature `S`.
///
/// This is the bound behind [`Function::new`](crate::Function::new):
///
/// - [`Copyable`] and [`CopyOnly`] accept `F: Callable<S> + Clone`.
/// - [`MoveOnly`] accepts `F: Callable<S>`.
pub trait Accepts<S: Signature, F>: Ownership {
    /// Places `callable` into a new raw container.
    #[doc(hidden)]
    fn store<'a, const WORDS: usize>(callable: F) -> RawFunction<'a, S, Self, WORDS>
    where
        F: 'a;
}

impl<S, F> Accepts<S, F> for Copyable
where
    S: Signature,
    F: Callable<S> + Clone,
{
    #[inline]
    fn store<'a, const WORDS: usize>(callable: F) -> RawFunction<'a, S, Self, WORDS>
    where
        F: 'a,
    {
        RawFunction::<'a, S, Self, WORDS>::new(callable)
    }
}

impl<S, F> Accepts<S, F> for MoveOnly
where
    S: Signature,
    F: Callable<S>,
{
    #[inline]
    fn store<'a, const WORDS: usize>(callable: F) -> RawFunction<'a, S, Self, WORDS>
    where
        F: 'a,
    {
        RawFunction::<'a, S, Self, WORDS>::new(callable)
    }
}

impl<S, F> Accepts<S, F> for CopyOnly
where
    S: Signature,
    F: Callable<S> + Clone,
{
    #[inline]
    fn store<'a, const WORDS: usize>(callable: F) -> RawFunction<'a, S, Self, WORDS>
    where
        F: 'a,
    {
        RawFunction::<'a, S, Self, WORDS>::new(callable)
    }
}
