use std::sync::Arc;

use super::changes::StateChanges;
use super::store::Store;
use super::task::StoreTask;
use crate::mvi::Reducer;

/// Read/write projection of a parent [`Store`].
///
/// A scoped store holds no state of its own: reads project the parent's
/// current state and sends are embedded into parent actions and run through
/// the parent's pipeline, so a write is visible through the parent as soon
/// as `send` returns.
pub struct ScopedStore<R: Reducer, S, A> {
    store: Store<R>,
    to_state: Arc<dyn Fn(&R::State) -> S + Send + Sync>,
    from_action: Arc<dyn Fn(A) -> R::Action + Send + Sync>,
}

impl<R: Reducer, S, A> Clone for ScopedStore<R, S, A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            to_state: Arc::clone(&self.to_state),
            from_action: Arc::clone(&self.from_action),
        }
    }
}

impl<R: Reducer, S: 'static, A: 'static> ScopedStore<R, S, A> {
    pub(crate) fn new(
        store: Store<R>,
        to_state: Arc<dyn Fn(&R::State) -> S + Send + Sync>,
        from_action: Arc<dyn Fn(A) -> R::Action + Send + Sync>,
    ) -> Self {
        Self {
            store,
            to_state,
            from_action,
        }
    }

    /// The current child state, projected from the parent.
    pub fn state(&self) -> S {
        self.store.project(|state| (self.to_state)(state))
    }

    pub fn with_state<T>(&self, read: impl FnOnce(&S) -> T) -> T {
        read(&self.state())
    }

    /// Send a child action through the parent pipeline.
    pub fn send(&self, action: A) -> StoreTask {
        self.store.send((self.from_action)(action))
    }

    /// Stream of child states that skips parent updates which leave the
    /// projected slice unchanged.
    pub fn changes(&self) -> StateChanges<R::State, S>
    where
        S: Clone + PartialEq + Unpin,
    {
        StateChanges::new(self.store.subscribe(), Arc::clone(&self.to_state))
    }

    /// Project further into a grandchild.
    pub fn scope<S2, A2>(
        &self,
        state: impl Fn(&S) -> S2 + Send + Sync + 'static,
        action: impl Fn(A2) -> A + Send + Sync + 'static,
    ) -> ScopedStore<R, S2, A2>
    where
        S2: 'static,
        A2: 'static,
    {
        let to_state = Arc::clone(&self.to_state);
        let from_action = Arc::clone(&self.from_action);
        ScopedStore::new(
            self.store.clone(),
            Arc::new(move |parent: &R::State| state(&to_state(parent))),
            Arc::new(move |child: A2| from_action(action(child))),
        )
    }
}
