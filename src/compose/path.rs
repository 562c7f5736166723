use std::fmt;

/// Two-way mapping between a parent action enum and one of its cases.
pub struct ActionPath<P, C> {
    extract: fn(&P) -> Option<C>,
    embed: fn(C) -> P,
}

impl<P, C> ActionPath<P, C> {
    /// `extract` returns the child action when `P` is the matching case;
    /// `embed` wraps a child action back into `P` (usually the variant
    /// constructor itself).
    pub fn new(extract: fn(&P) -> Option<C>, embed: fn(C) -> P) -> Self {
        Self { extract, embed }
    }

    pub fn extract(&self, action: &P) -> Option<C> {
        (self.extract)(action)
    }

    pub fn embed(&self, action: C) -> P {
        (self.embed)(action)
    }

    pub(crate) fn embedder(&self) -> fn(C) -> P {
        self.embed
    }
}

impl<P, C> Clone for ActionPath<P, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, C> Copy for ActionPath<P, C> {}

impl<P, C> fmt::Debug for ActionPath<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionPath").finish_non_exhaustive()
    }
}
