#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![forbid(unsafe_code)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Type-erased callables with inline storage and selectable ownership.
//!
//! ## Overview
//!
//! A [`Function`] owns one callable of any type, as long as the callable can
//! be invoked with a fixed call signature. Small callables live directly
//! inside the container, larger ones are boxed. Unlike `Box<dyn FnMut>`, a
//! [`Function`] never allocates for a small closure, and unlike a generic
//! parameter `F: FnMut`, two containers holding different closures have the
//! same type and can be stored side by side.
//!
//! ## Quick Example
//!
//! ```
//! use callbox::prelude::*;
//!
//! let mut handlers: Vec<Function<fn(&'static str) -> usize>> = Vec::new();
//! handlers.push(Function::new(|s: &'static str| s.len()));
//! handlers.push(Function::new(|s: &'static str| s.split(' ').count()));
//!
//! let results: Vec<usize> = handlers
//!     .iter_mut()
//!     .map(|handler| handler.call(("hello type erasure",)))
//!     .collect::<Result<_, EmptyCall>>()?;
//! assert_eq!(results, [18, 3]);
//! # Ok::<(), EmptyCall>(())
//! ```
//!
//! ## Ownership Variants
//!
//! The second type parameter of [`Function`] selects what the container can
//! do with its callable, and therefore which callables it accepts:
//!
//! - **[`Copyable`]** (default): the callable must be [`Clone`]. The container
//!   is [`Clone`], and [`assign_from`], [`take`] and [`swap`] hand the callable
//!   over without cloning it.
//! - **[`MoveOnly`]**: any callable is accepted. The container cannot be
//!   cloned.
//! - **[`CopyOnly`]**: the callable must be [`Clone`], and is never handed
//!   from one container to another. [`assign_from`], [`take`] and [`swap`]
//!   clone it and clear the source instead.
//!
//! A copyable container converts into either of the others with
//! [`Function::into_move_only`] and [`Function::into_copy_only`], or
//! [`From`].
//!
//! When the right variant is not known up front, [`make_function!`] picks it
//! from the [`Capability`] of the callable, and [`classify!`] reports that
//! capability.
//!
//! ```
//! use callbox::{Capability, Function, classify, make_function, markers};
//!
//! struct Connection;
//!
//! fn sender(connection: Connection) -> impl FnMut(u8) -> bool {
//!     move |byte: u8| {
//!         let _connection = &connection;
//!         byte != 0
//!     }
//! }
//!
//! let mut send: Function<fn(u8) -> bool, markers::MoveOnly> =
//!     make_function!(fn(u8) -> bool, sender(Connection));
//! assert_eq!(send.call((1,)), Ok(true));
//! assert_eq!(classify!(Connection), Capability::MoveOnly);
//! ```
//!
//! ## Borrowed State
//!
//! The first parameter of [`Function`] is the lifetime of the data its
//! callable may borrow, so closures capturing locals by reference can be
//! stored as long as the container does not outlive them:
//!
//! ```
//! use std::cell::Cell;
//!
//! use callbox::Function;
//!
//! let first = Cell::new(0);
//! let second = Cell::new(0);
//! let mut handlers: [Function<fn(i32)>; 2] = [
//!     Function::new(|x: i32| first.set(first.get() + x)),
//!     Function::new(|x: i32| second.set(second.get() - x)),
//! ];
//! for handler in &mut handlers {
//!     handler.call((3,)).unwrap();
//! }
//! assert_eq!((first.get(), second.get()), (3, -3));
//! ```
//!
//! Argument and result types must be `'static`: a signature such as
//! `fn(&str) -> usize`, which borrows its argument for the duration of the
//! call only, is not supported. Pass owned values or `&'static` references
//! instead.
//!
//! ## Inline Capacity
//!
//! The third type parameter is the size of the inline buffer in
//! pointer-widths, [`DEFAULT_INLINE_WORDS`] by default. A callable is stored
//! inline when [`fits_inline`] holds for it, and [`Function::placement`]
//! reports where it ended up. With the default capacity every container is
//! four pointer-widths large.
//!
//! ## Errors and Logging
//!
//! Calling an empty container returns [`EmptyCall`]. Errors and panics raised
//! by the stored callable are passed through unchanged, and a panicking
//! clone or destructor never leaves a container in a half-initialized state.
//!
//! Construction, heap clones and empty calls emit [`tracing`] events at the
//! `trace` and `debug` levels. No subscriber is installed by this crate.
//!
//! For implementation details, see the [`callbox-internals`] crate.
//!
//! [`callbox-internals`]: callbox_internals
//! [`Copyable`]: crate::markers::Copyable
//! [`MoveOnly`]: crate::markers::MoveOnly
//! [`CopyOnly`]: crate::markers::CopyOnly
//! [`assign_from`]: Function::assign_from
//! [`take`]: Function::take
//! [`swap`]: Function::swap
//! [`tracing`]: https://docs.rs/tracing

extern crate alloc;

#[macro_use]
mod macros;

pub mod capability;
pub mod markers;
pub mod prelude;

mod error;
mod function;

pub use callbox_internals::{
    DEFAULT_INLINE_WORDS, Placement, fits_inline,
    signature::{Callable, Signature},
};

pub use self::{
    capability::Capability,
    error::EmptyCall,
    function::{CopyFunction, Function, MoveFunction},
};

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    pub mod kind {
        use core::marker::PhantomData;

        use callbox_internals::signature::Signature;

        use crate::{
            Capability, Function,
            markers::{self, Accepts},
        };

        #[doc(hidden)]
        pub struct TypeTag<T>(PhantomData<fn() -> T>);

        impl<T> TypeTag<T> {
            #[doc(hidden)]
            #[inline(always)]
            #[must_use]
            pub const fn new() -> Self {
                Self(PhantomData)
            }

            #[doc(hidden)]
            #[inline(always)]
            #[must_use]
            pub const fn of(_value: &T) -> Self {
                Self(PhantomData)
            }
        }

        #[doc(hidden)]
        pub trait CopyableKind {
            #[inline(always)]
            fn capability(&self) -> Capability {
                Capability::Copyable
            }
        }

        impl<T> CopyableKind for &&&TypeTag<T> where T: Clone + Unpin {}

        #[doc(hidden)]
        pub trait MoveOnlyKind {
            #[inline(always)]
            fn capability(&self) -> Capability {
                Capability::MoveOnly
            }
        }

        impl<T> MoveOnlyKind for &&TypeTag<T> where T: Unpin {}

        #[doc(hidden)]
        pub trait CopyOnlyKind {
            #[inline(always)]
            fn capability(&self) -> Capability {
                Capability::CopyOnly
            }
        }

        impl<T> CopyOnlyKind for &TypeTag<T> where T: Clone {}

        #[doc(hidden)]
        pub trait PinnedKind {
            #[inline(always)]
            fn capability(&self) -> Capability {
                Capability::Pinned
            }
        }

        impl<T> PinnedKind for TypeTag<T> {}

        #[doc(hidden)]
        pub struct Wrap<'a, T>(pub &'a T);

        #[doc(hidden)]
        pub trait CopyableSelect {
            #[inline(always)]
            fn ownership(&self) -> markers::Copyable {
                markers::Copyable
            }
        }

        impl<T> CopyableSelect for &&Wrap<'_, T> where T: Clone + Unpin {}

        #[doc(hidden)]
        pub trait MoveOnlySelect {
            #[inline(always)]
            fn ownership(&self) -> markers::MoveOnly {
                markers::MoveOnly
            }
        }

        impl<T> MoveOnlySelect for &Wrap<'_, T> where T: Unpin {}

        #[doc(hidden)]
        pub trait CopyOnlySelect {
            #[inline(always)]
            fn ownership(&self) -> markers::CopyOnly {
                markers::CopyOnly
            }
        }

        impl<T> CopyOnlySelect for Wrap<'_, T> where T: Clone {}

        #[doc(hidden)]
        #[must_use]
        pub fn macro_helper_new_function<'a, S, O, F>(
            _ownership: O,
            callable: F,
        ) -> Function<'a, S, O>
        where
            S: Signature,
            O: Accepts<S, F>,
            F: 'a,
        {
            Function::new(callable)
        }
    }
}
