//! Classification of callables by what their owner may do with them.
//!
//! Every container variant relies on a different set of abilities of its
//! payload: a [`Copyable`](crate::markers::Copyable) container clones and
//! relocates it, a [`MoveOnly`](crate::markers::MoveOnly) container only
//! relocates it, and a [`CopyOnly`](crate::markers::CopyOnly) container only
//! clones it. [`Capability`] names these classes, and the [`classify!`] macro
//! computes the class of a concrete type.
//!
//! In Rust, cloning is [`Clone`] and relocation is allowed for every type
//! that is [`Unpin`]. A `!Unpin` type can still be moved before it has been
//! pinned, but is treated as one that does not want to be handed from owner
//! to owner.
//!
//! [`classify!`]: crate::classify

/// The ownership class of a callable type.
///
/// The four classes are mutually exclusive and cover every type:
///
/// | Class        | [`Clone`] | [`Unpin`] |
/// |--------------|:---------:|:---------:|
/// | [`Copyable`] |     ✓     |     ✓     |
/// | [`MoveOnly`] |           |     ✓     |
/// | [`CopyOnly`] |     ✓     |           |
/// | [`Pinned`]   |           |           |
///
/// [`Copyable`]: Capability::Copyable
/// [`MoveOnly`]: Capability::MoveOnly
/// [`CopyOnly`]: Capability::CopyOnly
/// [`Pinned`]: Capability::Pinned
///
/// # Examples
///
/// ```
/// use std::marker::PhantomPinned;
///
/// use callbox::{Capability, classify};
///
/// struct Unique;
///
/// assert_eq!(classify!(u32), Capability::Copyable);
/// assert_eq!(classify!(Unique), Capability::MoveOnly);
/// assert_eq!(classify!(PhantomPinned), Capability::CopyOnly);
/// assert_eq!(classify!((Unique, PhantomPinned)), Capability::Pinned);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Capability {
    /// Can be cloned and relocated.
    Copyable,
    /// Can be relocated but not cloned.
    MoveOnly,
    /// Can be cloned but should not be relocated.
    CopyOnly,
    /// Supports neither. No container variant accepts it.
    Pinned,
}

impl Capability {
    /// Returns `true` for the classes whose values can be cloned.
    #[inline]
    #[must_use]
    pub const fn can_clone(self) -> bool {
        matches!(self, Self::Copyable | Self::CopyOnly)
    }

    /// Returns `true` for the classes whose values can be relocated.
    #[inline]
    #[must_use]
    pub const fn can_relocate(self) -> bool {
        matches!(self, Self::Copyable | Self::MoveOnly)
    }

    /// Returns `true` if some container variant accepts values of this class.
    #[inline]
    #[must_use]
    pub const fn is_storable(self) -> bool {
        !matches!(self, Self::Pinned)
    }
}
