//! The type-erased function container and its three ownership variants.

mod copy_only;
mod copyable;
mod move_only;

use core::{any::type_name, fmt};

use callbox_internals::{
    DEFAULT_INLINE_WORDS, Placement, RawFunction, ownership::Ownership, signature::Signature,
};

use crate::{
    EmptyCall,
    markers::{Accepts, CopyOnly, Copyable, MoveOnly},
};

/// A container owning at most one callable with the call signature `S`.
///
/// The concrete type of the callable is erased: any closure, function item or
/// other [`FnMut`] whose signature matches `S` exactly can be stored, and two
/// containers holding different callables have the same type.
///
/// # Type Parameters
///
/// - **Lifetime (`'a`)**: how long the callable may borrow data for. A
///   closure capturing locals by reference is accepted, and the container
///   cannot outlive those locals.
/// - **Signature (`S`)**: a function pointer type such as `fn(u32) -> bool`,
///   naming the argument types and the result type of every call.
/// - **Ownership (`O`)**: which operations the container offers
///   - [`Copyable`]: cloneable, and transfers by relocating the payload
///     (default)
///   - [`MoveOnly`]: accepts callables that are not [`Clone`], and cannot be
///     cloned itself
///   - [`CopyOnly`]: cloneable, and transfers by cloning the payload and
///     clearing the source
/// - **Inline capacity (`WORDS`)**: the size of the inline buffer in
///   pointer-widths. Callables that are larger, or more strictly aligned than
///   a pointer, are boxed.
///
/// With the default capacity, every variant is four pointer-widths large.
///
/// A [`Function`] is neither [`Send`] nor [`Sync`], because it can hold
/// callables that are neither.
///
/// # Examples
///
/// ```
/// use callbox::{EmptyCall, Function};
///
/// let mut total = 0;
/// let mut accumulate: Function<fn(i32) -> i32> = Function::new(move |x: i32| {
///     total += x;
///     total
/// });
///
/// assert_eq!(accumulate.call((2,)), Ok(2));
/// assert_eq!(accumulate.call((3,)), Ok(5));
///
/// accumulate.clear();
/// assert_eq!(accumulate.call((3,)), Err(EmptyCall));
/// ```
///
/// Captured state can also be borrowed:
///
/// ```
/// use std::cell::Cell;
///
/// use callbox::Function;
///
/// let hits = Cell::new(0);
/// let mut hit: Function<fn()> = Function::new(|| hits.set(hits.get() + 1));
/// hit.call(()).unwrap();
/// hit.call(()).unwrap();
/// assert_eq!(hits.get(), 2);
/// ```
#[repr(transparent)]
pub struct Function<
    'a,
    S: Signature,
    O: Ownership = Copyable,
    const WORDS: usize = DEFAULT_INLINE_WORDS,
> {
    raw: RawFunction<'a, S, O, WORDS>,
}

/// A [`Function`] for callables that cannot be cloned.
pub type MoveFunction<'a, S, const WORDS: usize = DEFAULT_INLINE_WORDS> =
    Function<'a, S, MoveOnly, WORDS>;

/// A [`Function`] that hands its callable over by cloning it.
pub type CopyFunction<'a, S, const WORDS: usize = DEFAULT_INLINE_WORDS> =
    Function<'a, S, CopyOnly, WORDS>;

impl<'a, S: Signature, O: Ownership, const WORDS: usize> Function<'a, S, O, WORDS> {
    /// Creates a container holding `callable`.
    ///
    /// The callable is stored inline if it fits into `WORDS` pointer-widths
    /// and is at most pointer-aligned, and boxed otherwise. Which callables
    /// are accepted depends on the ownership marker, see [`Accepts`].
    ///
    /// # Examples
    ///
    /// ```
    /// use callbox::{Function, MoveFunction, Placement};
    ///
    /// let small: Function<fn() -> usize> = Function::new(|| 1usize);
    /// assert_eq!(small.placement(), Some(Placement::Inline));
    ///
    /// let data = [0u8; 100];
    /// let large: MoveFunction<fn() -> usize> = Function::new(move || data.len());
    /// assert_eq!(large.placement(), Some(Placement::Heap));
    /// ```
    #[must_use]
    pub fn new<F>(callable: F) -> Self
    where
        O: Accepts<S, F>,
        F: 'a,
    {
        let raw = O::store::<WORDS>(callable);
        tracing::trace!(
            callable = type_name::<F>(),
            placement = ?raw.placement(),
            "stored callable"
        );
        Self { raw }
    }

    /// Creates an empty container. Calling it fails with [`EmptyCall`].
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            raw: RawFunction::empty(),
        }
    }

    /// Invokes the stored callable with `args` and returns its result.
    ///
    /// Arguments are passed as a tuple: `()` for no arguments, `(a,)` for
    /// one, `(a, b)` for two and so on.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyCall`] if the container holds no callable. The
    /// container stays empty and usable.
    ///
    /// # Panics
    ///
    /// Panics raised by the callable are not caught. The callable stays in
    /// the container.
    #[inline]
    pub fn call(&mut self, args: S::Args) -> Result<S::Output, EmptyCall> {
        self.raw.call(args).map_err(|_args| {
            tracing::debug!(signature = type_name::<S>(), "called an empty function");
            EmptyCall
        })
    }

    /// Returns `true` if the container holds no callable.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns whether the stored callable lives inline or on the heap, or
    /// `None` when empty.
    #[inline]
    #[must_use]
    pub fn placement(&self) -> Option<Placement> {
        self.raw.placement()
    }

    /// Returns the type name of the stored callable, or `None` when empty.
    ///
    /// The name is meant for diagnostics only, see [`core::any::type_name`].
    #[inline]
    #[must_use]
    pub fn callable_type_name(&self) -> Option<&'static str> {
        self.raw.callable_type_name()
    }

    /// Destroys the stored callable, if any, leaving the container empty.
    ///
    /// If the callable's destructor panics, the container is still empty
    /// afterwards.
    #[inline]
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Emits a trace event if the callable this container just cloned lives
    /// on the heap.
    fn trace_clone(&self) {
        if self.raw.placement() == Some(Placement::Heap) {
            tracing::trace!(
                callable = self.raw.callable_type_name(),
                "cloned boxed callable"
            );
        }
    }
}

impl<S: Signature, O: Ownership, const WORDS: usize> Default for Function<'_, S, O, WORDS> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Signature, O: Ownership, const WORDS: usize> fmt::Debug for Function<'_, S, O, WORDS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("signature", &type_name::<S>())
            .field("callable", &self.raw.callable_type_name())
            .field("placement", &self.raw.placement())
            .finish()
    }
}
