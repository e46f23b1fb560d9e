use callbox_internals::signature::Signature;

use crate::{
    Function,
    markers::{CopyOnly, Copyable, MoveOnly},
};

impl<'a, S: Signature, const WORDS: usize> Function<'a, S, Copyable, WORDS> {
    /// Destroys the stored callable and takes over the one stored in
    /// `source`, leaving `source` empty.
    ///
    /// A boxed callable changes owner without being touched; an inline one is
    /// relocated into this container's buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use callbox::Function;
    ///
    /// let mut target: Function<fn() -> &'static str> = Function::new(|| "target");
    /// let mut source: Function<fn() -> &'static str> = Function::new(|| "source");
    ///
    /// target.assign_from(&mut source);
    /// assert_eq!(target.call(()), Ok("source"));
    /// assert!(source.is_empty());
    /// ```
    #[inline]
    pub fn assign_from(&mut self, source: &mut Self) {
        self.raw.assign_move(&mut source.raw);
    }

    /// Moves the stored callable into a new container, leaving this one
    /// empty.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        let mut taken = Self::empty();
        taken.raw.assign_move(&mut self.raw);
        taken
    }

    /// Exchanges the callables of two containers.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.raw, &mut other.raw);
    }

    /// Converts into a container that can no longer be cloned.
    ///
    /// The stored callable, including its current state, is moved over.
    #[inline]
    #[must_use]
    pub fn into_move_only(self) -> Function<'a, S, MoveOnly, WORDS> {
        Function {
            raw: self.raw.into_move_only(),
        }
    }

    /// Converts into a container that transfers its callable by cloning it.
    ///
    /// The stored callable, including its current state, is moved over.
    #[inline]
    #[must_use]
    pub fn into_copy_only(self) -> Function<'a, S, CopyOnly, WORDS> {
        Function {
            raw: self.raw.into_copy_only(),
        }
    }
}

impl<S: Signature, const WORDS: usize> Clone for Function<'_, S, Copyable, WORDS> {
    /// Creates a container holding a clone of the stored callable.
    ///
    /// The clone is independent: calling one container does not affect the
    /// state of the other, unless the callable shares state through
    /// references or reference counting.
    #[inline]
    fn clone(&self) -> Self {
        let clone = Self {
            raw: self.raw.clone_function(),
        };
        clone.trace_clone();
        clone
    }

    /// Destroys the stored callable and replaces it with a clone of the one
    /// stored in `source`.
    ///
    /// If cloning panics, this container is left empty.
    #[inline]
    fn clone_from(&mut self, source: &Self) {
        self.raw.assign_clone(&source.raw);
        self.trace_clone();
    }
}

impl<'a, S: Signature, const WORDS: usize> From<Function<'a, S, Copyable, WORDS>>
    for Function<'a, S, MoveOnly, WORDS>
{
    #[inline]
    fn from(function: Function<'a, S, Copyable, WORDS>) -> Self {
        function.into_move_only()
    }
}

impl<'a, S: Signature, const WORDS: usize> From<Function<'a, S, Copyable, WORDS>>
    for Function<'a, S, CopyOnly, WORDS>
{
    #[inline]
    fn from(function: Function<'a, S, Copyable, WORDS>) -> Self {
        function.into_copy_only()
    }
}

#[cfg(test)]
mod tests {
    use core::cell::{Cell, RefCell};

    use super::*;
    use crate::Placement;

    type Step = fn();

    #[test]
    fn test_copyable_function_size() {
        static_assertions::assert_eq_size!(Function<'static, fn()>, [usize; 4]);
        static_assertions::assert_eq_size!(
            Function<'static, fn(u64, u64) -> u64, Copyable, 5>,
            [usize; 6]
        );
    }

    #[test]
    fn test_copyable_function_traits() {
        static_assertions::assert_impl_all!(Function<'static, fn()>: Clone, Default, Unpin, core::fmt::Debug);
        static_assertions::assert_not_impl_any!(Function<'static, fn()>: Send, Sync);
    }

    #[test]
    fn test_counter_sequence() {
        let i = Cell::new(0);
        let l = || i.set(i.get() + 1);
        l();
        assert_eq!(i.get(), 1);

        let mut j = Function::<Step>::new(l);
        j.call(()).unwrap();
        assert_eq!(i.get(), 2);

        let mut k = Function::<Step>::new(l);
        k.call(()).unwrap();
        assert_eq!(i.get(), 3);

        j.assign_from(&mut k);
        j.call(()).unwrap();
        assert_eq!(i.get(), 4);
        assert!(k.is_empty());

        let mut t = Function::<Step>::new(|| i.set(i.get() - 1));
        t.call(()).unwrap();
        assert_eq!(i.get(), 3);

        j.swap(&mut t);
        j.call(()).unwrap();
        assert_eq!(i.get(), 2);
        t.call(()).unwrap();
        assert_eq!(i.get(), 3);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut count = 0;
        let mut original = Function::<fn() -> i32>::new(move || {
            count += 1;
            count
        });
        assert_eq!(original.call(()), Ok(1));

        let mut copy = original.clone();
        assert_eq!(copy.call(()), Ok(2));
        assert_eq!(copy.call(()), Ok(3));
        assert_eq!(original.call(()), Ok(2));

        copy.clone_from(&original);
        assert_eq!(copy.call(()), Ok(3));
        assert_eq!(original.call(()), Ok(3));
    }

    #[test]
    fn test_clone_inline_refcell() {
        let state = RefCell::new(1u8);
        let original = Function::<fn() -> u8>::new(move || *state.borrow());
        assert_eq!(original.placement(), Some(Placement::Inline));

        let mut copy = original.clone();
        let mut assigned = Function::<fn() -> u8>::empty();
        assigned.clone_from(&original);
        assert_eq!(copy.call(()), Ok(1));
        assert_eq!(assigned.call(()), Ok(1));
    }

    #[test]
    fn test_clone_from_empty() {
        let mut function = Function::<fn() -> i32>::new(|| 7i32);
        function.clone_from(&Function::empty());
        assert!(function.is_empty());
    }

    #[test]
    fn test_take() {
        let data = [3u64; 8];
        let mut source = Function::<fn() -> u64>::new(move || data.iter().sum::<u64>());
        assert_eq!(source.placement(), Some(Placement::Heap));

        let mut taken = source.take();
        assert!(source.is_empty());
        assert_eq!(taken.call(()), Ok(24));

        let mut twice = source.take();
        assert!(twice.is_empty());
        assert!(twice.call(()).is_err());
    }

    #[test]
    fn test_conversions() {
        let mut count = 0;
        let mut function = Function::<fn() -> i32>::new(move || {
            count += 1;
            count
        });
        assert_eq!(function.call(()), Ok(1));

        let mut copy_only: Function<fn() -> i32, CopyOnly> = function.clone().into();
        assert_eq!(copy_only.call(()), Ok(2));

        let mut move_only: Function<fn() -> i32, MoveOnly> = function.into();
        assert_eq!(move_only.call(()), Ok(2));
        assert_eq!(move_only.placement(), Some(Placement::Inline));
    }
}
