//! Commonly used items for convenient importing.
//!
//! # Usage
//!
//! ```rust
//! use callbox::prelude::*;
//!
//! fn run_twice(function: &mut Function<fn(u32) -> u32>) -> Result<u32, EmptyCall> {
//!     let first = function.call((1,))?;
//!     function.call((first,))
//! }
//!
//! let mut double = Function::new(|x: u32| x * 2);
//! assert_eq!(run_twice(&mut double), Ok(4));
//!
//! let mut nothing = Function::empty();
//! assert_eq!(run_twice(&mut nothing), Err(EmptyCall));
//! ```
//!
//! # What's Included
//!
//! - **[`Function`]**, **[`MoveFunction`]** and **[`CopyFunction`]**: the
//!   containers
//! - **[`EmptyCall`]**: the error returned when calling an empty container
//! - **[`make_function!`]** and **[`classify!`]**: variant selection
//! - **[`markers`]**: the ownership markers

pub use crate::{
    Capability, CopyFunction, EmptyCall, Function, MoveFunction, classify, make_function, markers,
};
