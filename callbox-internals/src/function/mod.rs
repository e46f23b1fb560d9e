//! Module containing the type-erased function container

pub(crate) mod raw;
pub(crate) mod storage;
pub(crate) mod vtable;

pub use self::{
    raw::RawFunction,
    storage::{DEFAULT_INLINE_WORDS, Placement, fits_inline},
};
