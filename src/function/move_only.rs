use callbox_internals::signature::Signature;

use crate::{Function, markers::MoveOnly};

impl<S: Signature, const WORDS: usize> Function<'_, S, MoveOnly, WORDS> {
    /// Destroys the stored callable and takes over the one stored in
    /// `source`, leaving `source` empty.
    ///
    /// A boxed callable changes owner without being touched; an inline one is
    /// relocated into this container's buffer.
    #[inline]
    pub fn assign_from(&mut self, source: &mut Self) {
        self.raw.assign_move(&mut source.raw);
    }

    /// Moves the stored callable into a new container, leaving this one
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use callbox::{EmptyCall, MoveFunction};
    ///
    /// let name = String::from("payload");
    /// let mut source: MoveFunction<fn() -> usize> = MoveFunction::new(move || name.len());
    ///
    /// let mut target = source.take();
    /// assert_eq!(target.call(()), Ok(7));
    /// assert_eq!(source.call(()), Err(EmptyCall));
    /// ```
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
}
