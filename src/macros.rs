/// Computes the [`Capability`] of a type.
///
/// The classification is resolved by the compiler from the [`Clone`] and
/// [`Unpin`] implementations of the type, so the expansion is a constant.
///
/// Inside generic code the macro only sees the bounds declared on a type
/// parameter, not the capabilities of the type it is later instantiated with.
///
/// [`Capability`]: crate::Capability
///
/// # Examples
///
/// ```
/// use std::{cell::RefCell, marker::PhantomPinned};
///
/// use callbox::{Capability, classify};
///
/// assert_eq!(classify!(Vec<u8>), Capability::Copyable);
/// assert_eq!(classify!(Box<RefCell<u8>>), Capability::Copyable);
/// assert_eq!(classify!(std::fs::File), Capability::MoveOnly);
/// assert_eq!(classify!(PhantomPinned), Capability::CopyOnly);
/// assert!(!classify!((std::fs::File, PhantomPinned)).is_storable());
/// ```
#[macro_export]
macro_rules! classify {
    ($type:ty $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::__private::kind::{CopyOnlyKind, CopyableKind, MoveOnlyKind, PinnedKind};
        (&&&&$crate::__private::kind::TypeTag::<$type>::new()).capability()
    }};
}

/// Stores a callable in the container variant that matches its capabilities,
/// or in an explicitly named variant.
///
/// With two arguments, the signature and the callable, the variant is chosen
/// at compile time with the same rules as [`classify!`]:
///
/// - `Clone + Unpin` callables go into a [`Function<S, Copyable>`].
/// - `Unpin` callables that are not [`Clone`] go into a
///   [`Function<S, MoveOnly>`].
/// - [`Clone`] callables that are not [`Unpin`] go into a
///   [`Function<S, CopyOnly>`].
/// - Callables that are neither are rejected with a compile error.
///
/// The capabilities are read from the type of the callable at the place the
/// macro is expanded. That works for function items and for closures returned
/// from another function as `impl FnMut(..)`, whose declared bounds decide
/// [`Clone`]. A closure written in the same function body as the macro call
/// has no known [`Clone`] implementation yet and is always treated as
/// copyable.
///
/// With three arguments, the first one names the ownership marker and the
/// remaining ones are the signature and the callable. The marker's bounds are
/// checked by [`Accepts`]. This is the form to use for closures written
/// inline.
///
/// The container uses the default inline capacity. Closure parameters need
/// type annotations, since the signature is only checked once the container
/// variant has been chosen.
///
/// [`Function<S, Copyable>`]: crate::Function
/// [`Function<S, MoveOnly>`]: crate::Function
/// [`Function<S, CopyOnly>`]: crate::Function
/// [`Accepts`]: crate::markers::Accepts
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
///
/// use callbox::{Function, make_function, markers};
///
/// fn double(x: i32) -> i32 {
///     x * 2
/// }
///
/// fn recorder() -> impl FnMut(&'static str) -> usize {
///     let mut lines = Vec::new();
///     move |line: &'static str| {
///         lines.push(line);
///         lines.len()
///     }
/// }
///
/// let mut doubler: Function<fn(i32) -> i32, markers::Copyable> =
///     make_function!(fn(i32) -> i32, double);
/// assert_eq!(doubler.call((5,)), Ok(10));
///
/// let mut record: Function<fn(&'static str) -> usize, markers::MoveOnly> =
///     make_function!(fn(&'static str) -> usize, recorder());
/// assert_eq!(record.call(("first",)), Ok(1));
/// assert_eq!(record.call(("second",)), Ok(2));
///
/// let hits = Cell::new(0);
/// let mut hit = make_function!(markers::CopyOnly, fn(), || hits.set(hits.get() + 1));
/// hit.call(()).unwrap();
/// assert_eq!(hits.get(), 1);
/// ```
///
/// Pinned callables are rejected:
///
/// ```compile_fail
/// use std::marker::PhantomPinned;
///
/// use callbox::make_function;
///
/// struct Unique;
///
/// fn pinned() -> impl FnMut() {
///     let state = (Unique, PhantomPinned);
///     move || {
///         let _state = &state;
///     }
/// }
///
/// let _function = make_function!(fn(), pinned());
/// ```
#[macro_export]
macro_rules! make_function {
    ($signature:ty, $callable:expr $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::__private::kind::{CopyOnlySelect, CopyableSelect, MoveOnlySelect};
        let callable = $callable;
        let ownership = (&&&$crate::__private::kind::Wrap(&callable)).ownership();
        $crate::__private::kind::macro_helper_new_function::<$signature, _, _>(ownership, callable)
    }};
    ($ownership:ty, $signature:ty, $callable:expr $(,)?) => {
        $crate::Function::<$signature, $ownership>::new($callable)
    };
}
