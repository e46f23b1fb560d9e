//! Internal utility types.

/// Marker type used as the pointee of type-erased payload pointers.
///
/// A `NonNull<Erased>` points at a callable whose concrete type is only known
/// to the vtable that was created alongside it. Using a distinct marker type
/// (rather than `()` or `u8`) makes it obvious in signatures that the pointer
/// must never be dereferenced without first casting it to the right type.
pub(crate) struct Erased;
