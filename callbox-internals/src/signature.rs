//! Call signatures and the callables that satisfy them.
//!
//! A call signature is spelled as a function pointer type such as
//! `fn(u32, String) -> bool`. The [`Signature`] trait extracts the argument
//! tuple and the output type from it, and [`Callable`] is the contract every
//! payload stored in a function container has to fulfil.
//!
//! [`Callable`] is implemented for every closure or function item whose
//! [`FnMut`] signature matches exactly, for up to eight arguments. The result
//! type must be the declared output type, not merely convertible to it.

/// A call signature with a fixed, ordered list of argument types and a single
/// result type.
///
/// Implemented for `fn(A1, .., An) -> R` with `n <= 8`. All argument types and
/// the result type must be `'static`, because the vtables built for a
/// signature are `'static` as well.
///
/// Signatures whose arguments borrow for any caller-chosen lifetime, such as
/// `fn(&str) -> usize`, are not supported. Pass owned values or `&'static`
/// references instead.
///
/// # Examples
///
/// ```
/// use callbox_internals::signature::Signature;
///
/// fn args_of<S: Signature>() -> &'static str {
///     core::any::type_name::<S::Args>()
/// }
///
/// assert_eq!(args_of::<fn(u8, bool) -> u32>(), "(u8, bool)");
/// ```
pub trait Signature: 'static {
    /// The arguments of the call, as a tuple.
    type Args: 'static;
    /// The result of the call.
    type Output: 'static;
}

/// A value that can be invoked with the arguments of the signature `S` and
/// produces exactly `S::Output`.
///
/// Errors and panics raised by the invocation are not intercepted.
pub trait Callable<S: Signature> {
    /// Invokes the callable, moving each argument into the call exactly once.
    fn invoke(&mut self, args: S::Args) -> S::Output;
}

/// Implements [`Signature`] for a function pointer type of one arity and
/// [`Callable`] for every matching [`FnMut`].
macro_rules! impl_signature {
    ($($arg:ident),*) => {
        impl<R: 'static, $($arg: 'static),*> Signature for fn($($arg),*) -> R {
            type Args = ($($arg,)*);
            type Output = R;
        }

        impl<F, R: 'static, $($arg: 'static),*> Callable<fn($($arg),*) -> R> for F
        where
            F: FnMut($($arg),*) -> R,
        {
            #[inline]
            #[allow(non_snake_case)]
            fn invoke(&mut self, ($($arg,)*): ($($arg,)*)) -> R {
                self($($arg),*)
            }
        }
    };
}

impl_signature!();
impl_signature!(A1);
impl_signature!(A1, A2);
impl_signature!(A1, A2, A3);
impl_signature!(A1, A2, A3, A4);
impl_signature!(A1, A2, A3, A4, A5);
impl_signature!(A1, A2, A3, A4, A5, A6);
impl_signature!(A1, A2, A3, A4, A5, A6, A7);
impl_signature!(A1, A2, A3, A4, A5, A6, A7, A8);

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};

    use super::*;

    fn invoke_as<S: Signature, F: Callable<S>>(mut f: F, args: S::Args) -> S::Output {
        f.invoke(args)
    }

    #[test]
    fn test_invoke_arities() {
        assert_eq!(invoke_as::<fn() -> u8, _>(|| 7u8, ()), 7);
        assert_eq!(invoke_as::<fn(u8) -> u8, _>(|x: u8| x + 1, (1,)), 2);
        assert_eq!(
            invoke_as::<fn(u8, u16) -> u32, _>(|a: u8, b: u16| u32::from(a) + u32::from(b), (1, 2)),
            3
        );
        assert_eq!(
            invoke_as::<fn(u8, u8, u8, u8, u8, u8, u8, u8) -> u8, _>(
                |a: u8, b: u8, c: u8, d: u8, e: u8, f: u8, g: u8, h: u8| {
                    a + b + c + d + e + f + g + h
                },
                (1, 1, 1, 1, 1, 1, 1, 1)
            ),
            8
        );
    }

    #[test]
    fn test_invoke_moves_arguments() {
        let mut collected: Vec<String> = Vec::new();
        let push = |s: String| collected.push(s);
        invoke_as::<fn(String), _>(push, (String::from("moved"),));
        assert_eq!(collected, ["moved"]);
    }

    #[test]
    fn test_function_items_are_callable() {
        fn double(x: i64) -> i64 {
            x * 2
        }
        assert_eq!(invoke_as::<fn(i64) -> i64, _>(double, (21,)), 42);
    }

    #[test]
    fn test_state_persists_between_invocations() {
        let mut count = 0u32;
        let mut counter = move || {
            count += 1;
            count
        };
        assert_eq!(Callable::<fn() -> u32>::invoke(&mut counter, ()), 1);
        assert_eq!(Callable::<fn() -> u32>::invoke(&mut counter, ()), 2);
    }

    #[test]
    fn test_signature_types() {
        static_assertions::assert_type_eq_all!(<fn() as Signature>::Args, ());
        static_assertions::assert_type_eq_all!(<fn() as Signature>::Output, ());
        static_assertions::assert_type_eq_all!(<fn(u8) -> bool as Signature>::Args, (u8,));
        static_assertions::assert_type_eq_all!(
            <fn(u8, String) -> bool as Signature>::Args,
            (u8, String)
        );
    }
}
