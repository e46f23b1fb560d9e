//! Type-erased function container.
//!
//! This module encapsulates the `vtable` and `storage` fields of
//! [`RawFunction`], ensuring they are only visible within this module. This
//! visibility restriction guarantees the safety invariant: **when `vtable` is
//! `Some`, the storage holds exactly one live payload of the type the vtable
//! was created for, placed the way that vtable says**.
//!
//! # Safety Invariant
//!
//! The `vtable` field is only set to `Some` right after a payload has been
//! written to the storage with the placement chosen by [`fits_inline`], using a
//! vtable created for the same payload type and capacity. Every operation that
//! runs payload code which may unwind (a destructor or a clone) first detaches
//! the vtable, so a panic leaves the container empty instead of pointing at a
//! half-destroyed payload.
//!
//! # Type Erasure
//!
//! The payload type is not part of the type of [`RawFunction`]. Only the
//! lifetime `'a` the payload may borrow for, the call signature `S`, the
//! ownership marker `O` and the inline capacity `WORDS` are. The vtable
//! provides the operations needed to invoke, clone, relocate and destroy the
//! payload without knowing its type.

use alloc::boxed::Box;
use core::{marker::PhantomData, ptr::NonNull};

use crate::{
    function::{
        storage::{Placement, Storage, fits_inline},
        vtable::{
            BaseOps, CloneVtable, CopyOnlyVtable, CopyableVtable, ErasedVtable, MoveOnlyVtable,
            RelocateVtable,
        },
    },
    ownership::{CopyOnly, Copyable, MoveOnly, Ownership},
    signature::{Callable, Signature},
    util::Erased,
};

/// A container that owns at most one callable matching the signature `S`,
/// stored inline when it fits into `WORDS` pointer-widths and boxed
/// otherwise.
///
/// Which operations are available depends on the ownership marker `O`:
/// [`assign_clone`](Self::assign_clone) requires a cloning vtable shape and
/// [`assign_move`](Self::assign_move) a relocating one.
///
/// The payload must outlive `'a`. The container is neither [`Send`] nor
/// [`Sync`], since the payload type is unknown.
pub struct RawFunction<'a, S: Signature, O: Ownership, const WORDS: usize> {
    /// The vtable of the stored payload, or `None` when empty.
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. If `Some`, the vtable was created for some payload type `F: 'a` and
    ///    the capacity `WORDS`.
    /// 2. If `Some`, `storage` holds exactly one initialized `F`: in the inline
    ///    buffer if `fits_inline::<F, WORDS>()`, otherwise behind a pointer
    ///    obtained from [`Box::into_raw`].
    /// 3. If `None`, no payload is alive in `storage`.
    vtable: Option<&'static O::Vtable<S>>,
    /// The inline buffer or the heap pointer of the payload.
    storage: Storage<WORDS>,
    /// Marker for the signature and ownership parameters and for the data the
    /// payload borrows.
    _marker: PhantomData<(S, O, &'a ())>,
}

impl<'a, S: Signature, O: Ownership, const WORDS: usize> RawFunction<'a, S, O, WORDS> {
    /// Creates an empty container. The inline buffer is zeroed.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            vtable: None,
            storage: Storage::zeroed(),
            _marker: PhantomData,
        }
    }

    /// Places `callable` into a new container.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `vtable` was created for the payload type `F` and the capacity
    ///    `WORDS`.
    #[inline]
    unsafe fn from_parts<F: 'a>(callable: F, vtable: &'static O::Vtable<S>) -> Self {
        debug_assert_eq!(vtable.base().is_inline(), fits_inline::<F, WORDS>());

        let mut this = Self::empty();
        if fits_inline::<F, WORDS>() {
            let dst: NonNull<F> = this.storage.inline_ptr_mut().cast::<F>();
            // SAFETY: `fits_inline` guarantees that the buffer is large enough and
            // sufficiently aligned for `F`, and the buffer holds no live value.
            unsafe { dst.write(callable) };
        } else {
            let ptr: *mut F = Box::into_raw(Box::new(callable));
            // SAFETY: `Box::into_raw` returns a non-null pointer
            let ptr: NonNull<F> = unsafe { NonNull::new_unchecked(ptr) };
            this.storage.set_heap(ptr.cast::<Erased>());
        }

        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. Guaranteed by the caller
        // 2. The payload was just placed according to `fits_inline::<F, WORDS>()`
        // 3. Not applicable
        this.vtable = Some(vtable);
        this
    }

    /// Returns `true` if the container holds no callable.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vtable.is_none()
    }

    /// Returns where the stored callable lives, or `None` when empty.
    #[inline]
    #[must_use]
    pub fn placement(&self) -> Option<Placement> {
        let vtable = self.vtable?;
        if vtable.base().is_inline() {
            Some(Placement::Inline)
        } else {
            Some(Placement::Heap)
        }
    }

    /// Returns the [`core::any::type_name`] of the stored callable, or `None`
    /// when empty.
    #[inline]
    #[must_use]
    pub fn callable_type_name(&self) -> Option<&'static str> {
        self.vtable.map(|vtable| vtable.base().type_name())
    }

    /// Invokes the stored callable.
    ///
    /// Returns the arguments back as the error when the container is empty.
    #[inline]
    pub fn call(&mut self, args: S::Args) -> Result<S::Output, S::Args> {
        let Some(vtable) = self.vtable else {
            return Err(args);
        };
        let base = vtable.base();

        // SAFETY:
        // 1. A payload is stored and `base` belongs to its vtable.
        let ptr = unsafe { self.payload_ptr_mut(base) };

        // SAFETY:
        // 1. `ptr` points to the initialized payload the vtable was created for.
        // 2. `ptr` was derived from `&mut self`, so no other reference exists.
        Ok(unsafe { base.invoke(ptr, args) })
    }

    /// Destroys the stored callable, if any, and zeroes the inline buffer.
    #[inline]
    pub fn clear(&mut self) {
        if let Some(vtable) = self.vtable.take() {
            let base = vtable.base();

            // SAFETY:
            // 1. A payload is stored and `base` belongs to its vtable. Detaching
            //    the vtable did not touch the storage.
            let ptr = unsafe { self.payload_ptr_mut(base) };

            // SAFETY:
            // 1. `ptr` points to the initialized payload the vtable was created for.
            // 2. `ptr` is the inline buffer derived from `&mut self`, or the pointer
            //    obtained from `Box::into_raw` when the payload is boxed.
            // 3. The vtable has been detached, so the payload cannot be reached
            //    again, even if its destructor unwinds.
            unsafe { base.destroy(ptr) };
        }
        self.storage.reset();
    }

    /// Returns a read-only pointer to the stored payload.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. A payload is stored and `base` belongs to the vtable it was stored
    ///    with.
    #[inline]
    unsafe fn payload_ptr(&self, base: &BaseOps<S>) -> NonNull<Erased> {
        if base.is_inline() {
            self.storage.inline_ptr()
        } else {
            // SAFETY: The payload is boxed, so the heap pointer was the last
            // write to the storage.
            unsafe { self.storage.heap_ptr() }
        }
    }

    /// Returns a pointer to the stored payload that may be used for writes.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. A payload is stored and `base` belongs to the vtable it was stored
    ///    with.
    #[inline]
    unsafe fn payload_ptr_mut(&mut self, base: &BaseOps<S>) -> NonNull<Erased> {
        if base.is_inline() {
            self.storage.inline_ptr_mut()
        } else {
            // SAFETY: The payload is boxed, so the heap pointer was the last
            // write to the storage.
            unsafe { self.storage.heap_ptr() }
        }
    }

    /// Moves the payload into a container with a different ownership marker.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `map` returns a vtable created for the same payload type and
    ///    capacity as the vtable it is given.
    #[inline]
    unsafe fn convert<P: Ownership>(
        mut self,
        map: impl FnOnce(&'static O::Vtable<S>) -> &'static P::Vtable<S>,
    ) -> RawFunction<'a, S, P, WORDS> {
        let mut converted = RawFunction::<S, P, WORDS>::empty();
        if let Some(vtable) = self.vtable.take() {
            converted.storage = core::mem::replace(&mut self.storage, Storage::zeroed());

            // SAFETY: We must uphold the safety invariants of the vtable field:
            // 1. Guaranteed by the caller
            // 2. The storage bytes were moved over unchanged, and the placement of a
            //    payload depends only on its type and the capacity.
            // 3. Not applicable
            converted.vtable = Some(map(vtable));
        }
        converted
    }
}

impl<'a, S: Signature, O: Ownership, const WORDS: usize> RawFunction<'a, S, O, WORDS>
where
    O::Vtable<S>: CloneVtable<S>,
{
    /// Destroys the stored callable and replaces it with a clone of the one
    /// stored in `source`.
    ///
    /// An inline payload is cloned into this container's buffer, a boxed
    /// payload into a new box. If the clone panics, this container is left
    /// empty.
    pub fn assign_clone(&mut self, source: &Self) {
        self.clear();
        let Some(vtable) = source.vtable else {
            return;
        };
        let base = vtable.base();
        let clone = vtable.clone_ops();

        // SAFETY:
        // 1. A payload is stored in `source` and `base` belongs to its vtable.
        let src = unsafe { source.payload_ptr(base) };

        if base.is_inline() {
            let dst = self.storage.inline_ptr_mut();
            // SAFETY:
            // 1. `src` points to the initialized payload the vtable was created for.
            // 2. The payload type fits inline for `WORDS`, so the zeroed buffer of
            //    this container is large and aligned enough, and it holds no live
            //    value after `clear`.
            unsafe { clone.clone_into(src, dst) };
        } else {
            // SAFETY:
            // 1. `src` points to the initialized payload the vtable was created for.
            // 2. The payload is boxed for `WORDS`.
            let ptr = unsafe { clone.clone_new(src) };
            self.storage.set_heap(ptr);
        }

        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. The vtable of `source` was created for the same capacity `WORDS`
        // 2. The clone was placed exactly as the original
        // 3. Not applicable
        self.vtable = Some(vtable);
    }

    /// Creates an independent copy of this container.
    #[must_use]
    pub fn clone_function(&self) -> Self {
        let mut this = Self::empty();
        this.assign_clone(self);
        this
    }
}

impl<'a, S: Signature, O: Ownership, const WORDS: usize> RawFunction<'a, S, O, WORDS>
where
    O::Vtable<S>: RelocateVtable<S>,
{
    /// Destroys the stored callable and takes over the one stored in
    /// `source`, which is left empty.
    ///
    /// An inline payload is relocated into this container's buffer; a boxed
    /// payload changes owner without being touched.
    pub fn assign_move(&mut self, source: &mut Self) {
        self.clear();
        let Some(vtable) = source.vtable.take() else {
            return;
        };

        if vtable.base().is_inline() {
            let src = source.storage.inline_ptr_mut();
            let dst = self.storage.inline_ptr_mut();
            // SAFETY:
            // 1. `src` points to the initialized payload the vtable was created for
            //    and was derived from `&mut source`.
            // 2. `dst` is this container's zeroed buffer, which has the same size and
            //    alignment as the source buffer and holds no live value.
            // 3. The vtable has been detached from `source` and its storage is reset
            //    below, so the moved-out payload is never reached again.
            unsafe { vtable.relocate_ops().move_into(src, dst) };
        } else {
            // SAFETY: The payload is boxed, so the heap pointer was the last write to
            // the storage of `source`.
            let ptr = unsafe { source.storage.heap_ptr() };
            self.storage.set_heap(ptr);
        }
        source.storage.reset();

        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. The vtable of `source` was created for the same capacity `WORDS`
        // 2. The payload was relocated inline, or its box pointer was transferred
        // 3. Not applicable
        self.vtable = Some(vtable);
    }
}

impl<'a, S: Signature, const WORDS: usize> RawFunction<'a, S, Copyable, WORDS> {
    /// Creates a container holding `callable`.
    #[must_use]
    pub fn new<F>(callable: F) -> Self
    where
        F: Callable<S> + Clone + 'a,
    {
        // SAFETY:
        // 1. The vtable is created for `F` and `WORDS`.
        unsafe { Self::from_parts(callable, CopyableVtable::<S>::new::<F, WORDS>()) }
    }

    /// Converts the container into a move-only container holding the same
    /// callable.
    #[must_use]
    pub fn into_move_only(self) -> RawFunction<'a, S, MoveOnly, WORDS> {
        // SAFETY:
        // 1. The linked move-only vtable was created for the same payload and
        //    capacity.
        unsafe { self.convert::<MoveOnly>(|vtable| vtable.move_only()) }
    }

    /// Converts the container into a copy-only container holding the same
    /// callable.
    #[must_use]
    pub fn into_copy_only(self) -> RawFunction<'a, S, CopyOnly, WORDS> {
        // SAFETY:
        // 1. The linked copy-only vtable was created for the same payload and
        //    capacity.
        unsafe { self.convert::<CopyOnly>(|vtable| vtable.copy_only()) }
    }
}

impl<'a, S: Signature, const WORDS: usize> RawFunction<'a, S, MoveOnly, WORDS> {
    /// Creates a container holding `callable`.
    #[must_use]
    pub fn new<F>(callable: F) -> Self
    where
        F: Callable<S> + 'a,
    {
        // SAFETY:
        // 1. The vtable is created for `F` and `WORDS`.
        unsafe { Self::from_parts(callable, MoveOnlyVtable::<S>::new::<F, WORDS>()) }
    }
}

impl<'a, S: Signature, const WORDS: usize> RawFunction<'a, S, CopyOnly, WORDS> {
    /// Creates a container holding `callable`.
    #[must_use]
    pub fn new<F>(callable: F) -> Self
    where
        F: Callable<S> + Clone + 'a,
    {
        // SAFETY:
        // 1. The vtable is created for `F` and `WORDS`.
        unsafe { Self::from_parts(callable, CopyOnlyVtable::<S>::new::<F, WORDS>()) }
    }
}

impl<S: Signature, O: Ownership, const WORDS: usize> core::ops::Drop
    for RawFunction<'_, S, O, WORDS>
{
    #[inline]
    fn drop(&mut self) {
        self.clear();
    }
}
