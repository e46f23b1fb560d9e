//! Vtables for type-erased function payloads.
//!
//! A vtable is the operation table of one payload type `F` stored in a
//! container with a capacity of `WORDS` pointer-widths. It is built once per
//! `(F, WORDS)` pair in a `const` block and handed out as a `&'static`
//! reference, so creating a container never allocates a vtable.
//!
//! The operations are grouped by capability:
//!
//! - [`BaseOps`]: invoke and destroy, present in every shape.
//! - [`CloneOps`]: clone into a new box or into a given inline slot.
//! - [`RelocateOps`]: move into a given inline slot.
//!
//! [`CopyableVtable`], [`MoveOnlyVtable`] and [`CopyOnlyVtable`] combine the
//! groups their ownership marker supports. The fields of all of these types
//! are private to this module, which guarantees the safety invariant: **the
//! function pointers of a vtable were instantiated with the payload type and
//! capacity the vtable was created for**.
//!
//! # Placement
//!
//! Every payload type knows at compile time whether it lives inline or on the
//! heap, through [`fits_inline`]. The `inline` flag of [`BaseOps`] and the
//! disposal path of [`destroy`] are both derived from that constant, so a
//! payload is always released the way it was placed.
//!
//! # Lifetimes
//!
//! The payload type never appears in the type of a vtable or of its function
//! pointers. A payload that borrows local data therefore still gets a
//! `&'static` vtable; keeping the borrow alive is the job of the container.

use alloc::boxed::Box;
use core::ptr::NonNull;

use crate::{
    function::storage::fits_inline,
    signature::{Callable, Signature},
    util::Erased,
};

/// Access to the operations every vtable shape provides.
///
/// Implemented by the three vtable shapes of this module only.
pub trait ErasedVtable<S: Signature>: 'static {
    /// Returns the invoke and destroy operations.
    fn base(&self) -> &BaseOps<S>;
}

/// Vtable shapes that can clone their payload.
pub trait CloneVtable<S: Signature>: ErasedVtable<S> {
    /// Returns the clone operations.
    fn clone_ops(&self) -> &CloneOps;
}

/// Vtable shapes that can relocate their payload into another container.
pub trait RelocateVtable<S: Signature>: ErasedVtable<S> {
    /// Returns the relocate operation.
    fn relocate_ops(&self) -> &RelocateOps;
}

/// Operations shared by all vtable shapes.
///
/// # Safety Invariant
///
/// The fields `invoke` and `destroy` point to the functions [`invoke`] and
/// [`destroy`] below instantiated with the payload type `F` and capacity
/// `WORDS` this [`BaseOps`] was created for, and `inline` equals
/// `fits_inline::<F, WORDS>()`.
pub struct BaseOps<S: Signature> {
    /// Returns [`core::any::type_name`] of the payload.
    type_name: fn() -> &'static str,
    /// Whether the payload lives in the inline buffer.
    inline: bool,
    /// Invokes the payload behind the pointer.
    invoke: unsafe fn(NonNull<Erased>, S::Args) -> S::Output,
    /// Drops the payload behind the pointer and releases its box if it has
    /// one.
    destroy: unsafe fn(NonNull<Erased>),
}

impl<S: Signature> BaseOps<S> {
    /// Creates the base operations for the payload type `F` in a container
    /// with a capacity of `WORDS` pointer-widths.
    const fn new<F: Callable<S>, const WORDS: usize>() -> Self {
        Self {
            type_name: core::any::type_name::<F>,
            inline: fits_inline::<F, WORDS>(),
            invoke: invoke::<S, F>,
            destroy: destroy::<F, WORDS>,
        }
    }

    /// Returns [`core::any::type_name`] of the payload this vtable was created
    /// for.
    #[inline]
    pub(crate) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Returns whether payloads of this vtable live in the inline buffer.
    #[inline]
    pub(crate) fn is_inline(&self) -> bool {
        self.inline
    }

    /// Invokes the payload behind `ptr` with `args`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` points to an initialized payload of the type this vtable was
    ///    created for.
    /// 2. No other reference to the payload is alive for the duration of the
    ///    call, and `ptr` was derived from a mutable borrow.
    #[inline]
    pub(crate) unsafe fn invoke(&self, ptr: NonNull<Erased>, args: S::Args) -> S::Output {
        // SAFETY: We know that `self.invoke` points to the function `invoke::<S, F>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.invoke)(ptr, args) }
    }

    /// Destroys the payload behind `ptr`, dropping it in place if it is
    /// inline and freeing its box otherwise.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` points to an initialized payload of the type this vtable was
    ///    created for.
    /// 2. If the payload is inline, `ptr` is the address of the inline buffer
    ///    holding it and was derived from a mutable borrow. Otherwise `ptr` was
    ///    obtained from [`Box::into_raw`].
    /// 3. The payload is not used afterwards, and has not been destroyed or
    ///    moved out before.
    #[inline]
    pub(crate) unsafe fn destroy(&self, ptr: NonNull<Erased>) {
        // SAFETY: We know that `self.destroy` points to the function
        // `destroy::<F, WORDS>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe { (self.destroy)(ptr) }
    }
}

/// Clone operations.
///
/// # Safety Invariant
///
/// The fields point to [`clone_new`] and [`clone_into`] below instantiated
/// with the payload type this [`CloneOps`] was created for.
#[derive(Clone, Copy)]
pub struct CloneOps {
    /// Clones the payload into a new box.
    clone_new: unsafe fn(NonNull<Erased>) -> NonNull<Erased>,
    /// Clones the payload into the given inline slot.
    clone_into: unsafe fn(NonNull<Erased>, NonNull<Erased>),
}

impl CloneOps {
    /// Creates the clone operations for the payload type `F`.
    const fn new<F: Clone>() -> Self {
        Self {
            clone_new: clone_new::<F>,
            clone_into: clone_into::<F>,
        }
    }

    /// Clones the payload behind `ptr` into a new box and returns the pointer
    /// obtained from [`Box::into_raw`].
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` points to an initialized payload of the type this vtable was
    ///    created for.
    /// 2. The payload type is stored on the heap for the capacity in use.
    #[inline]
    pub(crate) unsafe fn clone_new(&self, ptr: NonNull<Erased>) -> NonNull<Erased> {
        // SAFETY: We know that `self.clone_new` points to the function
        // `clone_new::<F>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.clone_new)(ptr) }
    }

    /// Writes a clone of the payload behind `src` to `dst`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `src` points to an initialized payload of the type this vtable was
    ///    created for.
    /// 2. `dst` is valid for writes of the payload type, suitably aligned, and
    ///    does not hold a live value.
    #[inline]
    pub(crate) unsafe fn clone_into(&self, src: NonNull<Erased>, dst: NonNull<Erased>) {
        // SAFETY: We know that `self.clone_into` points to the function
        // `clone_into::<F>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.clone_into)(src, dst) }
    }
}

/// Relocate operation.
///
/// # Safety Invariant
///
/// The field points to [`move_into`] below instantiated with the payload type
/// this [`RelocateOps`] was created for.
#[derive(Clone, Copy)]
pub struct RelocateOps {
    /// Moves the payload into the given inline slot.
    move_into: unsafe fn(NonNull<Erased>, NonNull<Erased>),
}

impl RelocateOps {
    /// Creates the relocate operation for the payload type `F`.
    const fn new<F>() -> Self {
        Self {
            move_into: move_into::<F>,
        }
    }

    /// Moves the payload behind `src` to `dst`.
    ///
    /// Afterwards `src` is logically uninitialized: the payload must neither
    /// be used nor destroyed through it again.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `src` points to an initialized payload of the type this vtable was
    ///    created for, and was derived from a mutable borrow.
    /// 2. `dst` is valid for writes of the payload type, suitably aligned, and
    ///    does not hold a live value.
    /// 3. `src` is treated as uninitialized after this call.
    #[inline]
    pub(crate) unsafe fn move_into(&self, src: NonNull<Erased>, dst: NonNull<Erased>) {
        // SAFETY: We know that `self.move_into` points to the function
        // `move_into::<F>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe { (self.move_into)(src, dst) }
    }
}

/// Vtable of a payload that can be cloned and relocated.
///
/// Also links to the move-only and copy-only vtables of the same payload, so
/// a copyable container can be turned into either of the other shapes after
/// its payload type has been erased.
pub struct CopyableVtable<S: Signature> {
    /// Invoke and destroy.
    base: BaseOps<S>,
    /// Clone into a new box or an inline slot.
    clone: CloneOps,
    /// Move into an inline slot.
    relocate: RelocateOps,
    /// The move-only vtable of the same payload and capacity.
    move_only: &'static MoveOnlyVtable<S>,
    /// The copy-only vtable of the same payload and capacity.
    copy_only: &'static CopyOnlyVtable<S>,
}

impl<S: Signature> CopyableVtable<S> {
    /// Creates the vtable for the payload type `F` in a container with a
    /// capacity of `WORDS` pointer-widths.
    pub(crate) const fn new<F, const WORDS: usize>() -> &'static Self
    where
        F: Callable<S> + Clone,
    {
        const {
            &Self {
                base: BaseOps::<S>::new::<F, WORDS>(),
                clone: CloneOps::new::<F>(),
                relocate: RelocateOps::new::<F>(),
                move_only: MoveOnlyVtable::<S>::new::<F, WORDS>(),
                copy_only: CopyOnlyVtable::<S>::new::<F, WORDS>(),
            }
        }
    }

    /// Returns the move-only vtable of the same payload and capacity.
    #[inline]
    pub(crate) fn move_only(&self) -> &'static MoveOnlyVtable<S> {
        self.move_only
    }

    /// Returns the copy-only vtable of the same payload and capacity.
    #[inline]
    pub(crate) fn copy_only(&self) -> &'static CopyOnlyVtable<S> {
        self.copy_only
    }
}

impl<S: Signature> ErasedVtable<S> for CopyableVtable<S> {
    #[inline]
    fn base(&self) -> &BaseOps<S> {
        &self.base
    }
}

impl<S: Signature> CloneVtable<S> for CopyableVtable<S> {
    #[inline]
    fn clone_ops(&self) -> &CloneOps {
        &self.clone
    }
}

impl<S: Signature> RelocateVtable<S> for CopyableVtable<S> {
    #[inline]
    fn relocate_ops(&self) -> &RelocateOps {
        &self.relocate
    }
}

/// Vtable of a payload that can be relocated but not cloned.
pub struct MoveOnlyVtable<S: Signature> {
    /// Invoke and destroy.
    base: BaseOps<S>,
    /// Move into an inline slot.
    relocate: RelocateOps,
}

impl<S: Signature> MoveOnlyVtable<S> {
    /// Creates the vtable for the payload type `F` in a container with a
    /// capacity of `WORDS` pointer-widths.
    pub(crate) const fn new<F, const WORDS: usize>() -> &'static Self
    where
        F: Callable<S>,
    {
        const {
            &Self {
                base: BaseOps::<S>::new::<F, WORDS>(),
                relocate: RelocateOps::new::<F>(),
            }
        }
    }
}

impl<S: Signature> ErasedVtable<S> for MoveOnlyVtable<S> {
    #[inline]
    fn base(&self) -> &BaseOps<S> {
        &self.base
    }
}

impl<S: Signature> RelocateVtable<S> for MoveOnlyVtable<S> {
    #[inline]
    fn relocate_ops(&self) -> &RelocateOps {
        &self.relocate
    }
}

/// Vtable of a payload that can be cloned but is never relocated.
pub struct CopyOnlyVtable<S: Signature> {
    /// Invoke and destroy.
    base: BaseOps<S>,
    /// Clone into a new box or an inline slot.
    clone: CloneOps,
}

impl<S: Signature> CopyOnlyVtable<S> {
    /// Creates the vtable for the payload type `F` in a container with a
    /// capacity of `WORDS` pointer-widths.
    pub(crate) const fn new<F, const WORDS: usize>() -> &'static Self
    where
        F: Callable<S> + Clone,
    {
        const {
            &Self {
                base: BaseOps::<S>::new::<F, WORDS>(),
                clone: CloneOps::new::<F>(),
            }
        }
    }
}

impl<S: Signature> ErasedVtable<S> for CopyOnlyVtable<S> {
    #[inline]
    fn base(&self) -> &BaseOps<S> {
        &self.base
    }
}

impl<S: Signature> CloneVtable<S> for CopyOnlyVtable<S> {
    #[inline]
    fn clone_ops(&self) -> &CloneOps {
        &self.clone
    }
}

/// Invokes the payload behind the pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `ptr` points to an initialized `F`.
/// 2. No other reference to the payload is alive for the duration of the call,
///    and `ptr` was derived from a mutable borrow.
unsafe fn invoke<S: Signature, F: Callable<S>>(ptr: NonNull<Erased>, args: S::Args) -> S::Output {
    let mut ptr: NonNull<F> = ptr.cast::<F>();
    // SAFETY: The pointer is non-null, aligned and points to an initialized `F`
    // as guaranteed by the caller, and the caller also guarantees exclusive
    // access.
    let callable: &mut F = unsafe { ptr.as_mut() };
    callable.invoke(args)
}

/// Destroys the `F` behind the pointer using the disposal path selected by
/// [`fits_inline`].
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `ptr` points to an initialized `F`.
/// 2. If `fits_inline::<F, WORDS>()`, `ptr` was derived from a mutable borrow
///    of the inline buffer holding it. Otherwise `ptr` was obtained from
///    [`Box::into_raw`] on a `Box<F>`.
/// 3. The payload is not used afterwards, and has not been destroyed or moved
///    out before.
unsafe fn destroy<F, const WORDS: usize>(ptr: NonNull<Erased>) {
    let ptr: *mut F = ptr.cast::<F>().as_ptr();
    if fits_inline::<F, WORDS>() {
        // SAFETY: The pointer is valid for reads and writes, aligned, points to an
        // initialized `F` that is not used again, as guaranteed by the caller.
        unsafe { core::ptr::drop_in_place(ptr) }
    } else {
        // SAFETY: The pointer came from `Box::into_raw` on a `Box<F>` and ownership
        // is transferred to us, as guaranteed by the caller.
        let boxed: Box<F> = unsafe { Box::from_raw(ptr) };
        core::mem::drop(boxed);
    }
}

/// Clones the `F` behind the pointer into a new box.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `ptr` points to an initialized `F`.
/// 2. `F` does not fit inline for the capacity in use.
unsafe fn clone_new<F: Clone>(ptr: NonNull<Erased>) -> NonNull<Erased> {
    // SAFETY: The pointer points to an initialized `F` as guaranteed by the caller.
    // Only shared access is needed.
    let callable: &F = unsafe { ptr.cast::<F>().as_ref() };
    let boxed: Box<F> = Box::new(callable.clone());
    let ptr: *mut F = Box::into_raw(boxed);

    // SAFETY: `Box::into_raw` returns a non-null pointer
    let ptr: NonNull<F> = unsafe { NonNull::new_unchecked(ptr) };
    ptr.cast::<Erased>()
}

/// Writes a clone of the `F` behind `src` to `dst`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `src` points to an initialized `F`.
/// 2. `dst` is valid for writes of `F`, aligned for `F`, and does not hold a
///    live value.
unsafe fn clone_into<F: Clone>(src: NonNull<Erased>, dst: NonNull<Erased>) {
    // SAFETY: The pointer points to an initialized `F` as guaranteed by the caller.
    // Only shared access is needed.
    let callable: &F = unsafe { src.cast::<F>().as_ref() };
    let clone: F = callable.clone();

    // SAFETY: `dst` is valid for writes and aligned, as guaranteed by the caller.
    // Nothing is overwritten that would need dropping.
    unsafe { dst.cast::<F>().write(clone) }
}

/// Moves the `F` behind `src` to `dst`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `src` points to an initialized `F` and was derived from a mutable borrow.
/// 2. `dst` is valid for writes of `F`, aligned for `F`, and does not hold a
///    live value.
/// 3. `src` is treated as uninitialized afterwards.
unsafe fn move_into<F>(src: NonNull<Erased>, dst: NonNull<Erased>) {
    // SAFETY: `src` points to an initialized `F`, and the caller guarantees that it
    // is treated as uninitialized afterwards, so the value is not duplicated.
    let value: F = unsafe { src.cast::<F>().read() };

    // SAFETY: `dst` is valid for writes and aligned, as guaranteed by the caller.
    // Nothing is overwritten that would need dropping.
    unsafe { dst.cast::<F>().write(value) }
}
