//! Ownership markers selecting which operations a function container offers.
//!
//! Every marker maps to a vtable shape through the sealed [`Ownership`]
//! trait:
//!
//! | Marker       | invoke | destroy | clone | relocate |
//! |--------------|:------:|:-------:|:-----:|:--------:|
//! | [`Copyable`] |   ✓    |    ✓    |   ✓   |    ✓     |
//! | [`MoveOnly`] |   ✓    |    ✓    |       |    ✓     |
//! | [`CopyOnly`] |   ✓    |    ✓    |   ✓   |          |
//!
//! An operation that is missing from a shape is not stored as an empty slot;
//! the vtable type simply has no field for it, so no code path can ask a
//! move-only payload to clone itself. The `relocate` column only concerns the
//! operations that hand a payload from one container to another; a Rust move
//! of the container moves an inline payload with it regardless of the marker.

use crate::{
    function::vtable::{CopyOnlyVtable, CopyableVtable, ErasedVtable, MoveOnlyVtable},
    signature::Signature,
};

/// Payloads that can be both cloned and relocated.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Copyable;

/// Payloads that can be relocated but not cloned.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct MoveOnly;

/// Payloads that can be cloned but that container operations never hand from
/// one container to another.
///
/// Moving the container itself still moves the bytes of an inline payload.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct CopyOnly;

/// Module preventing downstream implementations of [`Ownership`].
mod sealed {
    /// Supertrait only implemented for the markers in this module.
    pub trait Sealed {}

    impl Sealed for super::Copyable {}
    impl Sealed for super::MoveOnly {}
    impl Sealed for super::CopyOnly {}
}

/// Maps an ownership marker to the vtable shape used by containers with that
/// marker.
///
/// This trait is sealed and implemented for [`Copyable`], [`MoveOnly`] and
/// [`CopyOnly`] only.
pub trait Ownership: sealed::Sealed + Sized + 'static {
    /// The vtable shape for the signature `S`.
    #[doc(hidden)]
    type Vtable<S: Signature>: ErasedVtable<S>;
}

impl Ownership for Copyable {
    type Vtable<S: Signature> = CopyableVtable<S>;
}

impl Ownership for MoveOnly {
    type Vtable<S: Signature> = MoveOnlyVtable<S>;
}

impl Ownership for CopyOnly {
    type Vtable<S: Signature> = CopyOnlyVtable<S>;
}
