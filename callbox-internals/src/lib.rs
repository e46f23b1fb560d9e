#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`callbox`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased storage and the unsafe
//! operations that power the [`callbox`] function containers. It provides a
//! container that owns one callable of an unknown type, keeps it inline when
//! it is small enough and boxes it otherwise.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`callbox`] crate, not this one.
//!
//! # Architecture
//!
//! - **[`signature`]**: Call signatures spelled as `fn(A, B) -> R`
//!   - [`Signature`]: Splits a signature into its argument tuple and output
//!   - [`Callable`]: Implemented by every matching [`FnMut`]
//!
//! - **[`ownership`]**: Markers selecting the operations of a container
//!   - [`Copyable`], [`MoveOnly`] and [`CopyOnly`]
//!   - [`Ownership`]: Maps each marker to its vtable shape
//!
//! - **`function`**: Type-erased storage
//!   - [`RawFunction`]: Owned container with an inline buffer of `WORDS`
//!     pointer-widths, holding a callable that may borrow data for `'a`
//!   - `Storage`: The inline buffer, overlapping the pointer of a boxed payload
//!   - `CopyableVtable`, `MoveOnlyVtable`, `CopyOnlyVtable`: Function pointers
//!     for type-erased dispatch, one shape per marker
//!
//! # Safety Strategy
//!
//! Once a callable has been stored, the container only knows its vtable. Every
//! vtable is created for one concrete payload type and one capacity, and the
//! placement of the payload is derived from the same [`fits_inline`] constant
//! that the vtable's destroy operation uses. This keeps the invariant of
//! [`RawFunction`] local to a single file: if a vtable is attached, a payload
//! of its type lives where the vtable says.
//!
//! Operations a marker does not support are absent from its vtable shape
//! rather than stored as empty entries, so asking a move-only payload to clone
//! itself does not type-check.
//!
//! [`callbox`]: https://docs.rs/callbox/latest/callbox/
//! [`Signature`]: signature::Signature
//! [`Callable`]: signature::Callable
//! [`Copyable`]: ownership::Copyable
//! [`MoveOnly`]: ownership::MoveOnly
//! [`CopyOnly`]: ownership::CopyOnly
//! [`Ownership`]: ownership::Ownership

extern crate alloc;

mod function;
pub mod ownership;
pub mod signature;
mod util;

pub use function::{DEFAULT_INLINE_WORDS, Placement, RawFunction, fits_inline};
