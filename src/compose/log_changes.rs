use tracing::Level;

use crate::dependencies::Dependencies;
use crate::diff::diff;
use crate::effect::Effect;
use crate::mvi::Reducer;

/// Reducer wrapper that traces every action and the state change it caused.
pub struct LogChanges<R> {
    inner: R,
    name: String,
}

impl<R> LogChanges<R> {
    pub(super) fn new(inner: R, name: String) -> Self {
        Self { inner, name }
    }
}

impl<R: Reducer> Reducer for LogChanges<R> {
    type State = R::State;
    type Action = R::Action;

    fn reduce(
        &self,
        state: &mut R::State,
        action: R::Action,
        deps: &Dependencies,
    ) -> Effect<R::Action> {
        if !tracing::enabled!(Level::DEBUG) {
            return self.inner.reduce(state, action, deps);
        }

        let before = state.clone();
        tracing::debug!(reducer = %self.name, action = ?action, "received action");
        let effect = self.inner.reduce(state, action, deps);
        match diff(&before, &*state) {
            Some(changes) => {
                tracing::debug!(reducer = %self.name, "state changed:\n{}", changes)
            }
            None => tracing::debug!(reducer = %self.name, "no state change"),
        }
        effect
    }
}
