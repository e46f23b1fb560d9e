//! Inline buffer and heap pointer storage for function payloads.
//!
//! This module encapsulates the fields of [`Storage`]. A [`Storage`] does not
//! know what it holds: the owning [`RawFunction`] tracks whether a payload is
//! alive, and the payload's vtable records whether it lives in the inline
//! buffer or behind the heap pointer. Both decisions come from the same
//! [`fits_inline`] constant, which is what keeps placement and disposal in
//! agreement.
//!
//! [`RawFunction`]: crate::RawFunction

use core::{
    cell::UnsafeCell,
    mem::{ManuallyDrop, MaybeUninit},
    ptr::NonNull,
};

use crate::util::Erased;

/// The default inline capacity of a function container, in pointer-widths.
///
/// With the vtable pointer this makes a default container exactly four
/// pointer-widths large.
pub const DEFAULT_INLINE_WORDS: usize = 3;

/// Returns whether a payload of type `T` is stored inline in a container with
/// a capacity of `WORDS` pointer-widths.
///
/// A payload fits if both its size and its alignment fit the pointer-aligned
/// buffer. Payloads that do not fit are boxed.
///
/// # Examples
///
/// ```
/// use callbox_internals::fits_inline;
///
/// assert!(fits_inline::<[usize; 3], 3>());
/// assert!(!fits_inline::<[usize; 4], 3>());
/// assert!(fits_inline::<(), 0>());
/// ```
#[inline]
#[must_use]
pub const fn fits_inline<T, const WORDS: usize>() -> bool {
    size_of::<T>() <= WORDS * size_of::<usize>() && align_of::<T>() <= align_of::<usize>()
}

/// Where the payload of a function container lives.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Placement {
    /// The payload is stored in the container's inline buffer.
    Inline,
    /// The payload was too large or too strictly aligned for the inline
    /// buffer and is stored in its own heap allocation.
    Heap,
}

/// Storage for a single payload: either the payload bytes themselves or a
/// pointer to a boxed payload.
///
/// Which field is active is not recorded here; see the module documentation.
///
/// The inline bytes sit in an [`UnsafeCell`]: cloning an inline payload only
/// borrows the source container, but the payload's `clone` may still mutate
/// it through interior mutability.
#[repr(C)]
pub(crate) union Storage<const WORDS: usize> {
    /// Inline payload bytes. Zeroed while no inline payload is alive.
    inline: ManuallyDrop<UnsafeCell<[MaybeUninit<usize>; WORDS]>>,
    /// Pointer obtained from [`Box::into_raw`] for a boxed payload.
    ///
    /// [`Box::into_raw`]: alloc::boxed::Box::into_raw
    heap: NonNull<Erased>,
}

impl<const WORDS: usize> Storage<WORDS> {
    /// Creates storage with every inline byte set to zero.
    #[inline]
    pub(crate) const fn zeroed() -> Self {
        Self {
            inline: ManuallyDrop::new(UnsafeCell::new([MaybeUninit::new(0); WORDS])),
        }
    }

    /// Zeroes the inline bytes.
    ///
    /// This does not drop anything. Whatever lived in the storage must have
    /// been destroyed or moved out before.
    #[inline]
    pub(crate) fn reset(&mut self) {
        *self = Self::zeroed();
    }

    /// Returns a pointer to the start of the inline buffer derived from a
    /// shared borrow.
    ///
    /// Writes through it are only allowed from inside the payload, through
    /// interior mutability.
    #[inline]
    pub(crate) fn inline_ptr(&self) -> NonNull<Erased> {
        NonNull::from(self).cast::<Erased>()
    }

    /// Returns a pointer to the start of the inline buffer that may be used
    /// for writes.
    #[inline]
    pub(crate) fn inline_ptr_mut(&mut self) -> NonNull<Erased> {
        NonNull::from(self).cast::<Erased>()
    }

    /// Returns the stored heap pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The last write to this storage was [`Storage::set_heap`].
    #[inline]
    pub(crate) unsafe fn heap_ptr(&self) -> NonNull<Erased> {
        // SAFETY: The `heap` field was the last field written, as guaranteed by
        // the caller, so it holds an initialized pointer.
        unsafe { self.heap }
    }

    /// Stores a heap pointer, overwriting the inline bytes.
    #[inline]
    pub(crate) fn set_heap(&mut self, ptr: NonNull<Erased>) {
        self.heap = ptr;
    }
}
