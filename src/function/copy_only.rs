use callbox_internals::signature::Signature;

use crate::{Function, markers::CopyOnly};

impl<S: Signature, const WORDS: usize> Function<'_, S, CopyOnly, WORDS> {
    /// Replaces the stored callable with a clone of the one stored in
    /// `source`, then clears `source`.
    ///
    /// The callable is never handed from one container to the other. If
    /// cloning panics, this container is left empty and `source` keeps its
    /// callable.
    ///
    /// # Examples
    ///
    /// ```
    /// use callbox::CopyFunction;
    ///
    /// let mut target = CopyFunction::<fn() -> u8>::empty();
    /// let mut source = CopyFunction::<fn() -> u8>::new(|| 1u8);
    ///
    /// target.assign_from(&mut source);
    /// assert_eq!(target.call(()), Ok(1));
    /// assert!(source.is_empty());
    /// ```
    #[inline]
    pub fn assign_from(&mut self, source: &mut Self) {
        self.raw.assign_clone(&source.raw);
        self.trace_clone();
        source.raw.clear();
    }

    /// Clones the stored callable into a new container, then clears this
    /// one.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        let taken = self.clone();
        self.raw.clear();
        taken
    }

    /// Exchanges the callables of two containers by cloning each of them.
    ///
    /// Both clones are made before either container changes, so if a clone
    /// panics both containers keep their callables.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        let from_other = other.clone();
        let from_self = self.clone();
        *self = from_other;
        *other = from_self;
    }
}

impl<S: Signature, const WORDS: usize> Clone for Function<'_, S, CopyOnly, WORDS> {
    #[inline]
    fn clone(&self) -> Self {
        let clone = Self {
            raw: self.raw.clone_function(),
        };
        clone.trace_clone();
        clone
    }

    #[inline]
    fn clone_from(&mut self, source: &Self) {
        self.raw.assign_clone(&source.raw);
        self.trace_clone();
    }
}
