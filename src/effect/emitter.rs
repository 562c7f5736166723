use std::fmt;
use std::sync::Arc;

/// Handle handed to running effects for feeding actions back into a store.
///
/// Emitting after the owning effect was cancelled is silently dropped.
pub struct Emitter<A> {
    sink: Arc<dyn Fn(A) + Send + Sync>,
}

impl<A: Send + 'static> Emitter<A> {
    pub(crate) fn new(sink: impl Fn(A) + Send + Sync + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Feed an action back into the store that started this effect.
    pub fn emit(&self, action: A) {
        (self.sink)(action);
    }

    /// Adapt this emitter so that child actions are embedded into `A`.
    pub(crate) fn contramap<B: Send + 'static>(
        self,
        embed: Arc<dyn Fn(B) -> A + Send + Sync>,
    ) -> Emitter<B> {
        Emitter::new(move |action| (self.sink)(embed(action)))
    }
}

impl<A> Clone for Emitter<A> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<A> fmt::Debug for Emitter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter").finish_non_exhaustive()
    }
}
